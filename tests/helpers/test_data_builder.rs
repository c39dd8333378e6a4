// ==========================================
// Test data builders - integration tests
// ==========================================

use chrono::{NaiveDate, NaiveTime};
use porter_rota::domain::{
    Department, DepartmentCategory, OperatingSchedule, PermanentAssignment, Porter,
    PorterCategory,
};
use porter_rota::engine::SqliteRotaStore;

// ==========================================
// Porter builder
// ==========================================

pub struct PorterBuilder {
    name: String,
    porter_category: PorterCategory,
    shift_group: Option<String>,
    contracted_hours: Option<(String, u32)>,
    is_active: bool,
}

impl PorterBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            porter_category: PorterCategory::Regular,
            shift_group: None,
            contracted_hours: None,
            is_active: true,
        }
    }

    pub fn relief(mut self) -> Self {
        self.porter_category = PorterCategory::Relief;
        self
    }

    pub fn supervisor(mut self) -> Self {
        self.porter_category = PorterCategory::Supervisor;
        self
    }

    pub fn shift_group(mut self, group: &str) -> Self {
        self.shift_group = Some(group.to_string());
        self
    }

    pub fn contracted_hours(mut self, hours: &str, break_minutes: u32) -> Self {
        self.contracted_hours = Some((hours.to_string(), break_minutes));
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> Porter {
        let mut porter = Porter::new(0, &self.name, self.porter_category);
        porter.assign_shift_group(self.shift_group.as_deref());
        if let Some((hours, break_minutes)) = self.contracted_hours {
            porter = porter.with_contracted_hours(&hours, break_minutes);
        }
        porter.is_active = self.is_active;
        porter
    }

    /// Insert into the store and return the porter with its id.
    pub fn insert(self, store: &SqliteRotaStore) -> Porter {
        let mut porter = self.build();
        porter.id = store.porter_repo.insert(&porter).expect("Failed to insert porter");
        porter
    }
}

// ==========================================
// Department builder
// ==========================================

pub struct DepartmentBuilder {
    name: String,
    category: DepartmentCategory,
    schedule: OperatingSchedule,
    min_porters_required: u32,
    display_order: i32,
}

impl DepartmentBuilder {
    pub fn new(name: &str, category: DepartmentCategory) -> Self {
        Self {
            name: name.to_string(),
            category,
            schedule: OperatingSchedule::round_the_clock(),
            min_porters_required: 1,
            display_order: 0,
        }
    }

    /// Fixed hours on the given days (0 = Sunday).
    pub fn hours(mut self, days: &[u32], start: (u32, u32), end: (u32, u32)) -> Self {
        self.schedule = OperatingSchedule::hours(
            days,
            NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        );
        self
    }

    pub fn shift_support(mut self) -> Self {
        self.schedule = self.schedule.with_shift_support();
        self
    }

    pub fn min_porters(mut self, count: u32) -> Self {
        self.min_porters_required = count;
        self
    }

    pub fn display_order(mut self, order: i32) -> Self {
        self.display_order = order;
        self
    }

    pub fn build(self) -> Department {
        Department::new(
            0,
            &self.name,
            self.category,
            self.schedule,
            self.min_porters_required,
        )
        .with_display_order(self.display_order)
    }

    pub fn insert(self, store: &SqliteRotaStore) -> Department {
        let mut department = self.build();
        department.id = store
            .department_repo
            .insert(&department)
            .expect("Failed to insert department");
        department
    }
}

// ==========================================
// Permanent assignment helper
// ==========================================

pub fn assign(
    store: &SqliteRotaStore,
    porter: &Porter,
    department: &Department,
    start_date: NaiveDate,
) -> PermanentAssignment {
    let mut assignment = PermanentAssignment::new(0, porter.id, department.id, start_date);
    assignment.id = store
        .assignment_repo
        .insert(&assignment)
        .expect("Failed to insert assignment");
    assignment
}
