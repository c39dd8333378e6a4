// ==========================================
// Porter Rota - Domain type definitions
// ==========================================
// Enumerations shared by porters, departments and shift phases.
// Stored in SQLite as their `as_str` form.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Shift category (day / night)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftCategory {
    Day,
    Night,
}

impl ShiftCategory {
    pub const ALL: [ShiftCategory; 2] = [ShiftCategory::Day, ShiftCategory::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftCategory::Day => "day",
            ShiftCategory::Night => "night",
        }
    }

    /// Label used in group names ("Day Shift A").
    pub fn title(&self) -> &'static str {
        match self {
            ShiftCategory::Day => "Day",
            ShiftCategory::Night => "Night",
        }
    }

    /// Derive the category of a porter's shift group name.
    ///
    /// Only the "Day" / "Night" tokens count; groups such as "PTS A" have no
    /// category of their own.
    pub fn from_group_name(name: &str) -> Option<Self> {
        if name.contains("Night") {
            Some(ShiftCategory::Night)
        } else if name.contains("Day") {
            Some(ShiftCategory::Day)
        } else {
            None
        }
    }
}

impl fmt::Display for ShiftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShiftCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(ShiftCategory::Day),
            "night" => Ok(ShiftCategory::Night),
            other => Err(format!("unknown shift category: {}", other)),
        }
    }
}

// ==========================================
// Group label (A / B)
// ==========================================
// A and B of one category always run opposite phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupLabel {
    A,
    B,
}

impl GroupLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupLabel::A => "A",
            GroupLabel::B => "B",
        }
    }

    pub fn partner(&self) -> Self {
        match self {
            GroupLabel::A => GroupLabel::B,
            GroupLabel::B => GroupLabel::A,
        }
    }

    /// Trailing " A" / " B" token of a group name.
    pub fn from_group_name(name: &str) -> Option<Self> {
        match name.trim().rsplit(' ').next() {
            Some("A") => Some(GroupLabel::A),
            Some("B") => Some(GroupLabel::B),
            _ => None,
        }
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(GroupLabel::A),
            "B" => Ok(GroupLabel::B),
            other => Err(format!("unknown group label: {}", other)),
        }
    }
}

// ==========================================
// Porter category
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PorterCategory {
    Regular,
    Relief,
    Supervisor,
}

impl PorterCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PorterCategory::Regular => "Regular",
            PorterCategory::Relief => "Relief",
            PorterCategory::Supervisor => "Supervisor",
        }
    }

    /// Regular and Relief porters staff departments directly.
    pub fn is_direct_staff(&self) -> bool {
        matches!(self, PorterCategory::Regular | PorterCategory::Relief)
    }
}

impl fmt::Display for PorterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PorterCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Regular" => Ok(PorterCategory::Regular),
            "Relief" => Ok(PorterCategory::Relief),
            "Supervisor" => Ok(PorterCategory::Supervisor),
            other => Err(format!("unknown porter category: {}", other)),
        }
    }
}

// ==========================================
// Department category
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepartmentCategory {
    #[serde(rename = "shift_rotation")]
    ShiftRotation, // Day/Night Shift A/B, PTS A/B
    #[serde(rename = "relief")]
    Relief, // cover pool
    #[serde(rename = "emergency_24h")]
    Emergency24h, // A&E, may borrow on-duty shift porters
    #[serde(rename = "standard_hours")]
    StandardHours, // fixed days/hours
    #[serde(rename = "on_demand")]
    OnDemand, // Ad-Hoc, Training
}

impl DepartmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepartmentCategory::ShiftRotation => "shift_rotation",
            DepartmentCategory::Relief => "relief",
            DepartmentCategory::Emergency24h => "emergency_24h",
            DepartmentCategory::StandardHours => "standard_hours",
            DepartmentCategory::OnDemand => "on_demand",
        }
    }
}

impl fmt::Display for DepartmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DepartmentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "shift_rotation" => Ok(DepartmentCategory::ShiftRotation),
            "relief" => Ok(DepartmentCategory::Relief),
            "emergency_24h" => Ok(DepartmentCategory::Emergency24h),
            "standard_hours" => Ok(DepartmentCategory::StandardHours),
            "on_demand" => Ok(DepartmentCategory::OnDemand),
            other => Err(format!("unknown department category: {}", other)),
        }
    }
}
