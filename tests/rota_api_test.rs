// ==========================================
// RotaApi integration tests
// ==========================================
// Full AppState over a temp database: input validation, error mapping,
// staffing rollups and configuration-driven behaviour.
// ==========================================

mod helpers;

use chrono::NaiveTime;
use helpers::test_data_builder::{assign, DepartmentBuilder, PorterBuilder};
use porter_rota::api::ApiError;
use porter_rota::app::AppState;
use porter_rota::config::{config_keys, ConfigManager};
use porter_rota::domain::{DepartmentCategory, ShiftCategory};
use porter_rota::logging;
use test_helpers::{create_test_db, create_test_state, d};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// ==========================================
// Rotation
// ==========================================

#[tokio::test]
async fn test_shift_status_and_input_errors() {
    logging::init_test();

    let (_temp_file, state) = create_test_state().await;
    let api = &state.rota_api;

    let info = api.calculate_shift_status("Day Shift A", "2025-05-31").unwrap();
    assert_eq!(info.shift_group, "Day Shift A");
    assert_eq!(info.date, d(2025, 5, 31));
    assert!(!info.is_working);
    assert_eq!(info.cycle_day, 5);
    assert_eq!(info.shift_type, ShiftCategory::Day);

    let info = api.calculate_shift_status(" Night Shift B ", "2025-05-31").unwrap();
    assert_eq!(info.shift_group, "Night Shift B");
    assert!(info.is_working);

    assert!(matches!(
        api.calculate_shift_status("Day Shift A", "31/05/2025"),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        api.calculate_shift_status("", "2025-05-31"),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        api.calculate_shift_status("PTS A", "2025-05-31"),
        Err(ApiError::UnknownShiftGroup(ref g)) if g == "PTS A"
    ));
}

#[tokio::test]
async fn test_working_group_and_schedule() {
    let (_temp_file, state) = create_test_state().await;
    let api = &state.rota_api;

    let groups = api.resolve_working_group("night", "2025-05-27").unwrap();
    assert_eq!(groups.working_group, "Night Shift A");
    assert_eq!(groups.off_group, "Night Shift B");

    let groups = api.resolve_working_group("day", "2025-06-01").unwrap();
    assert_eq!(groups.working_group, "Day Shift B");

    assert!(matches!(
        api.resolve_working_group("evening", "2025-05-27"),
        Err(ApiError::InvalidInput(_))
    ));

    let schedule = api
        .get_shift_schedule("2025-05-27", "2025-06-09", Some("Day Shift B"))
        .unwrap();
    assert_eq!(schedule.len(), 14);
    let working_days = schedule.iter().filter(|day| day.shifts[0].is_working).count();
    assert_eq!(working_days, 6);

    let err = api
        .get_shift_schedule("2025-06-09", "2025-05-27", None)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidDateRange(_)));

    let err = api
        .get_shift_schedule("0001-01-01", "9999-12-31", None)
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidDateRange(ref msg) if msg.contains("366 days")));
}

#[tokio::test]
async fn test_working_and_off_duty_porters() {
    let (_temp_file, state) = create_test_state().await;
    let store = &state.store;

    PorterBuilder::new("Ada").shift_group("Day Shift A").insert(store);
    PorterBuilder::new("Bea").shift_group("Day Shift B").insert(store);
    PorterBuilder::new("Nia").shift_group("Night Shift A").insert(store);
    PorterBuilder::new("Rex").relief().insert(store);

    let working = state
        .rota_api
        .get_working_porters("2025-05-27", Some("day"))
        .await
        .unwrap();
    assert_eq!(working.len(), 1);
    assert_eq!(working[0].name, "Ada");

    let off = state
        .rota_api
        .get_off_duty_porters("2025-05-27", None)
        .await
        .unwrap();
    let names: Vec<&str> = off.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bea"]);
}

// ==========================================
// Daily assignments
// ==========================================

#[tokio::test]
async fn test_daily_assignment_operations() {
    let (_temp_file, state) = create_test_state().await;
    let store = &state.store;
    let api = &state.rota_api;

    let ae = DepartmentBuilder::new("A&E", DepartmentCategory::Emergency24h).insert(store);
    let amy = PorterBuilder::new("Amy").insert(store);
    let rex = PorterBuilder::new("Rex").relief().insert(store);
    assign(store, &amy, &ae, d(2025, 1, 1));

    let records = api.get_daily_assignments("2025-06-02", None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].porter_id, Some(amy.id));

    let night = api
        .get_daily_assignments("2025-06-02", Some("night"))
        .await
        .unwrap();
    assert!(night.is_empty());

    let record = api
        .set_daily_assignment("2025-06-02", ae.id, Some(amy.id), Some(rex.id), "day")
        .await
        .unwrap();
    assert_eq!(record.id, records[0].id);
    assert_eq!(record.cover_porter_id, Some(rex.id));

    let details = api
        .get_daily_assignments_with_details("2025-06-02", Some("day"))
        .await
        .unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].department.name, "A&E");
    assert_eq!(details[0].cover_porter.as_ref().map(|p| p.id), Some(rex.id));

    assert!(api.remove_daily_assignment(record.id).await.unwrap());
    assert!(!api.remove_daily_assignment(record.id).await.unwrap());
}

#[tokio::test]
async fn test_set_daily_assignment_validation() {
    let (_temp_file, state) = create_test_state().await;
    let store = &state.store;
    let api = &state.rota_api;

    let ae = DepartmentBuilder::new("A&E", DepartmentCategory::Emergency24h).insert(store);
    let amy = PorterBuilder::new("Amy").insert(store);

    let err = api
        .set_daily_assignment("2025-06-02", ae.id, Some(amy.id), Some(amy.id), "day")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api
        .set_daily_assignment("2025-06-02", 0, None, None, "day")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api
        .set_daily_assignment("2025-06-02", ae.id, None, None, "late")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api
        .set_daily_assignment("2025-06-02", 4_242, None, None, "day")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::DataIntegrity(_)));

    let err = api
        .set_daily_assignment("2025-06-02", ae.id, Some(4_242), None, "day")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // an empty slot is a valid override
    let record = api
        .set_daily_assignment("2025-06-02", ae.id, None, None, "night")
        .await
        .unwrap();
    assert!(record.porter_id.is_none());

    assert!(matches!(
        api.remove_daily_assignment(-1).await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        api.get_eligible_porters(4_242, None).await,
        Err(ApiError::NotFound(_))
    ));
}

// ==========================================
// Staffing
// ==========================================

#[tokio::test]
async fn test_staffing_summary_and_utilization() {
    let (_temp_file, state) = create_test_state().await;
    let store = &state.store;
    let api = &state.rota_api;

    let ae = DepartmentBuilder::new("A&E", DepartmentCategory::Emergency24h)
        .shift_support()
        .min_porters(2)
        .display_order(1)
        .insert(store);
    let pharmacy = DepartmentBuilder::new("Pharmacy", DepartmentCategory::StandardHours)
        .hours(&[1, 2, 3, 4, 5], (9, 0), (17, 0))
        .display_order(2)
        .insert(store);
    DepartmentBuilder::new("Outpatients", DepartmentCategory::StandardHours)
        .hours(&[0, 6], (9, 0), (13, 0))
        .display_order(3)
        .insert(store);

    let amy = PorterBuilder::new("Amy").insert(store);
    let ben = PorterBuilder::new("Ben").insert(store);
    let nia = PorterBuilder::new("Nia").shift_group("Night Shift A").insert(store);
    PorterBuilder::new("Rex").relief().insert(store);
    PorterBuilder::new("Gus").inactive().insert(store);
    assign(store, &amy, &ae, d(2025, 1, 1));
    assign(store, &ben, &pharmacy, d(2025, 1, 1));
    assign(store, &nia, &ae, d(2025, 1, 1));

    // 2025-06-02 is a Monday
    let summary = api.get_staffing_summary("2025-06-02").await.unwrap();
    let lines: Vec<(&str, ShiftCategory, u32, u32, u32)> = summary
        .iter()
        .map(|l| {
            (
                l.department_name.as_str(),
                l.shift_type,
                l.assigned,
                l.required,
                l.shortfall,
            )
        })
        .collect();
    assert_eq!(
        lines,
        vec![
            ("A&E", ShiftCategory::Day, 1, 2, 1),
            ("A&E", ShiftCategory::Night, 1, 2, 1),
            ("Pharmacy", ShiftCategory::Day, 1, 1, 0),
        ]
    );

    let utilization = api.get_porter_utilization(Some("2025-06-02")).await.unwrap();
    assert_eq!(utilization.total, 4);
    assert_eq!(utilization.assigned, 3);
    assert_eq!(utilization.available, 1);
    assert_eq!(utilization.by_category["Regular"].assigned, 3);
    assert_eq!(utilization.by_category["Relief"].total, 1);
    assert_eq!(utilization.by_category["Relief"].assigned, 0);

    let sunday: Vec<String> = api
        .list_departments_operating_on("2025-06-01")
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(sunday, vec!["A&E".to_string(), "Outpatients".to_string()]);

    let support = api.list_departments_requiring_shift_support().await.unwrap();
    assert_eq!(support.len(), 1);
    assert_eq!(support[0].id, ae.id);
}

// ==========================================
// Shift hours and configuration
// ==========================================

#[tokio::test]
async fn test_porter_shift_hours_defaults() {
    let (_temp_file, state) = create_test_state().await;
    let store = &state.store;
    let api = &state.rota_api;

    let amy = PorterBuilder::new("Amy")
        .contracted_hours("0800-2000", 60)
        .insert(store);
    let nia = PorterBuilder::new("Nia").shift_group("Night Shift A").insert(store);
    let rex = PorterBuilder::new("Rex").relief().insert(store);

    let hours = api.get_porter_shift_hours(amy.id).await.unwrap().unwrap();
    assert_eq!((hours.start, hours.end), (t(8, 0), t(20, 0)));
    assert_eq!(hours.working_minutes, 660);
    assert_eq!(hours.label, "11h");
    assert!(hours.from_contract);
    assert!(!hours.is_night);

    let hours = api.get_porter_shift_hours(nia.id).await.unwrap().unwrap();
    assert_eq!((hours.start, hours.end), (t(19, 0), t(7, 0)));
    assert_eq!(hours.break_minutes, 30);
    assert_eq!(hours.working_minutes, 690);
    assert_eq!(hours.label, "11h 30m");
    assert!(!hours.from_contract);
    assert!(hours.is_night);

    assert!(api.get_porter_shift_hours(rex.id).await.unwrap().is_none());
    assert!(matches!(
        api.get_porter_shift_hours(4_242).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_configuration_drives_phases_and_hours() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let config = ConfigManager::new(&db_path).expect("Failed to create config");
        config
            .set_value(config_keys::ROTATION_REFERENCE_DATE, "2025-06-01")
            .unwrap();
        config.set_value(config_keys::DAY_SHIFT_START, "08:00").unwrap();
        config.set_value(config_keys::NIGHT_SHIFT_START, "20:00").unwrap();
        config.set_value(config_keys::DEFAULT_BREAK_MINUTES, "45").unwrap();
    }

    let state = AppState::new(db_path.clone()).await.expect("Failed to create AppState");
    let api = &state.rota_api;

    let info = api.calculate_shift_status("Day Shift A", "2025-06-01").unwrap();
    assert!(info.is_working);
    assert_eq!(info.cycle_day, 1);

    let porter = PorterBuilder::new("Dee").shift_group("Day Shift B").insert(&state.store);
    let hours = api.get_porter_shift_hours(porter.id).await.unwrap().unwrap();
    assert_eq!((hours.start, hours.end), (t(8, 0), t(20, 0)));
    assert_eq!(hours.break_minutes, 45);
    assert_eq!(hours.working_minutes, 675);

    // snapshot round trip through the shared manager
    let snapshot = state.config_manager.get_config_snapshot().unwrap();
    state
        .config_manager
        .set_value(config_keys::DEFAULT_BREAK_MINUTES, "15")
        .unwrap();
    let written = state
        .config_manager
        .restore_config_from_snapshot(&snapshot)
        .unwrap();
    assert_eq!(written, 4);
    assert_eq!(
        state
            .config_manager
            .get_global_config_value(config_keys::DEFAULT_BREAK_MINUTES)
            .unwrap()
            .as_deref(),
        Some("45")
    );

    // phases are seeded once; a later reference date does not move them
    state
        .config_manager
        .set_value(config_keys::ROTATION_REFERENCE_DATE, "2025-07-01")
        .unwrap();
    drop(state);
    let reopened = AppState::new(db_path).await.expect("Failed to reopen AppState");
    let info = reopened
        .rota_api
        .calculate_shift_status("Day Shift A", "2025-06-01")
        .unwrap();
    assert_eq!(info.cycle_day, 1);
}
