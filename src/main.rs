// ==========================================
// Porter Rota - CLI entry point
// ==========================================
// Usage:
//   porter-rota [YYYY-MM-DD]
//
// Prints rotation state, staffing shortfalls and the daily assignments for
// the given date (today when omitted). Database location follows
// PORTER_ROTA_DB_PATH / the user data directory.
// ==========================================

use std::process::ExitCode;

use chrono::Local;
use porter_rota::app::{get_default_db_path, AppState};
use porter_rota::domain::ShiftCategory;
use porter_rota::{logging, APP_NAME, VERSION};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    tracing::info!("{} v{}", APP_NAME, VERSION);

    let date = std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());

    let db_path = get_default_db_path();
    let state = AppState::new(db_path).await.map_err(anyhow::Error::msg)?;
    let api = &state.rota_api;

    println!("{} - {}", APP_NAME, date);
    println!();

    for category in ShiftCategory::ALL {
        let groups = api.resolve_working_group(category.as_str(), &date)?;
        let status = api.calculate_shift_status(&groups.working_group, &date)?;
        println!(
            "{:<6} on: {:<14} off: {:<14} (cycle day {})",
            category.title(),
            groups.working_group,
            groups.off_group,
            status.cycle_day
        );
    }
    println!();

    let summary = api.get_staffing_summary(&date).await?;
    if summary.is_empty() {
        println!("No departments operating.");
    } else {
        println!("Staffing");
        for line in &summary {
            let flag = if line.shortfall > 0 { "  SHORT" } else { "" };
            println!(
                "  {:<28} {:<6} {}/{}{}",
                line.department_name,
                line.shift_type.title(),
                line.assigned,
                line.required,
                flag
            );
        }
    }
    println!();

    let details = api.get_daily_assignments_with_details(&date, None).await?;
    println!("Assignments ({})", details.len());
    for item in &details {
        let porter = item
            .porter
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("(unfilled)");
        let cover = item
            .cover_porter
            .as_ref()
            .map(|p| format!(" covered by {}", p.name))
            .unwrap_or_default();
        println!(
            "  {:<28} {:<6} {}{}",
            item.department.name,
            item.record.shift_type.title(),
            porter,
            cover
        );
    }

    Ok(())
}
