// ==========================================
// Repository integration tests
// ==========================================
// Repositories over one shared file connection, read back through the
// RotaStore adapter.
// ==========================================

mod helpers;

use helpers::test_data_builder::{DepartmentBuilder, PorterBuilder};
use porter_rota::domain::{
    DailyAssignmentRecord, DepartmentCategory, PermanentAssignment, ShiftCategory,
};
use porter_rota::engine::{RotaStore, SqliteRotaStore};
use porter_rota::logging;
use porter_rota::repository::RepositoryError;
use test_helpers::{create_seeded_store, create_test_db, d, open_shared_connection};

#[tokio::test]
async fn test_store_reads_what_repositories_wrote() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let store = create_seeded_store(&db_path);

    let second = DepartmentBuilder::new("X-Ray", DepartmentCategory::StandardHours)
        .display_order(2)
        .insert(&store);
    let first = DepartmentBuilder::new("Night Shift A", DepartmentCategory::ShiftRotation)
        .display_order(1)
        .insert(&store);
    PorterBuilder::new("Zoe").insert(&store);
    PorterBuilder::new("Abe").shift_group("Night Shift A").insert(&store);
    PorterBuilder::new("Mo").inactive().insert(&store);

    let departments = store.list_departments().await.unwrap();
    let ids: Vec<i64> = departments.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(departments[0].rotation_category, Some(ShiftCategory::Night));
    assert_eq!(departments[1].rotation_category, None);

    // inactive porters stay visible to the store
    let porters = store.list_porters().await.unwrap();
    let names: Vec<&str> = porters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Abe", "Mo", "Zoe"]);
    assert_eq!(porters[0].shift_category, Some(ShiftCategory::Night));

    assert_eq!(store.porter_repo.list_active().unwrap().len(), 2);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let (porter_id, department_id) = {
        let store = create_seeded_store(&db_path);
        let porter = PorterBuilder::new("Amy")
            .contracted_hours("20:00-08:00", 45)
            .insert(&store);
        let department = DepartmentBuilder::new("Pharmacy", DepartmentCategory::StandardHours)
            .hours(&[1, 2, 3], (9, 0), (17, 30))
            .insert(&store);
        store
            .assignment_repo
            .insert(&PermanentAssignment::new(0, porter.id, department.id, d(2025, 1, 1)))
            .unwrap();
        store
            .persist_daily_assignments(
                d(2025, 6, 2),
                vec![DailyAssignmentRecord::pending(
                    d(2025, 6, 2),
                    department.id,
                    Some(porter.id),
                    ShiftCategory::Day,
                )],
            )
            .await
            .unwrap();
        store.persist_daily_assignments(d(2025, 6, 3), vec![]).await.unwrap();
        (porter.id, department.id)
    };

    let store = SqliteRotaStore::from_connection(open_shared_connection(&db_path));

    let porter = store.porter_repo.find_by_id(porter_id).unwrap().unwrap();
    assert_eq!(porter.contracted_hours.as_deref(), Some("20:00-08:00"));
    assert_eq!(porter.break_duration_minutes, 45);
    assert_eq!(porter.shift_working_minutes(), Some(675));

    let department = store.department_repo.find_by_id(department_id).unwrap().unwrap();
    assert_eq!(department.operating_schedule.days_of_week, vec![1, 2, 3]);
    assert_eq!(
        department.operating_schedule.describe(),
        "Mon, Tue, Wed 09:00-17:30"
    );

    let assignments = store.list_permanent_assignments().await.unwrap();
    assert_eq!(assignments.len(), 1);
    assert!(assignments[0].end_date.is_none());

    let records = store.load_daily_assignments(d(2025, 6, 2)).await.unwrap().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].porter_id, Some(porter_id));
    // computed but empty, versus never computed
    assert_eq!(store.load_daily_assignments(d(2025, 6, 3)).await.unwrap(), Some(vec![]));
    assert!(store.load_daily_assignments(d(2025, 6, 4)).await.unwrap().is_none());

    assert_eq!(store.list_shift_group_phases().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_assignment_lifecycle() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let store = create_seeded_store(&db_path);

    let porter = PorterBuilder::new("Amy").insert(&store);
    let department = DepartmentBuilder::new("A&E", DepartmentCategory::Emergency24h).insert(&store);
    let id = store
        .assignment_repo
        .insert(&PermanentAssignment::new(0, porter.id, department.id, d(2025, 1, 1)))
        .unwrap();

    store.assignment_repo.end_assignment(id, d(2025, 3, 31)).unwrap();
    let stored = store.assignment_repo.list_by_porter(porter.id).unwrap();
    assert_eq!(stored[0].end_date, Some(d(2025, 3, 31)));
    assert!(!stored[0].is_active_on(d(2025, 4, 1)));

    let err = store.assignment_repo.end_assignment(9_999, d(2025, 3, 31)).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));

    let removed = store
        .assignment_repo
        .delete_by_porter_and_department(porter.id, department.id)
        .unwrap();
    assert_eq!(removed, 1);
    assert!(store.assignment_repo.list_by_department(department.id).unwrap().is_empty());
}

#[tokio::test]
async fn test_upsert_and_remove_through_store() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let store = create_seeded_store(&db_path);
    let date = d(2025, 6, 2);

    let created = store
        .upsert_daily_assignment(date, 1, ShiftCategory::Night, Some(5), None)
        .await
        .unwrap();
    let updated = store
        .upsert_daily_assignment(date, 1, ShiftCategory::Night, Some(6), Some(7))
        .await
        .unwrap();
    assert_eq!(created.id, updated.id);

    let found = store.find_daily_assignment(created.id).await.unwrap().unwrap();
    assert_eq!(found.porter_id, Some(6));
    assert_eq!(found.cover_porter_id, Some(7));

    assert!(store.remove_daily_assignment(created.id).await.unwrap());
    assert!(store.find_daily_assignment(created.id).await.unwrap().is_none());
    assert!(!store.remove_daily_assignment(created.id).await.unwrap());
}
