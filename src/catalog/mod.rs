//! Fixed directory vocabularies.
//!
//! The role, team, status, and gender label sets are declared once here and
//! shared by gateway validation, the catalog endpoints, and any embedding UI.
//! Stored member records reference these labels by value.

/// Role labels offered by the directory.
pub const ROLES: &[&str] = &[
    "Sales Representative",
    "Software Engineer",
    "Product Manager",
    "Data Scientist",
    "Marketing Manager",
    "Operations Manager",
    "UX Designer",
    "HR Specialist",
    "Financial Analyst",
    "Legal Advisor",
    "Frontend Developer",
    "Backend Developer",
];

/// Team labels a member may belong to.
pub const TEAMS: &[&str] = &[
    "Design",
    "Product",
    "Marketing",
    "Finance",
    "Engineering",
    "Sales",
];

/// Membership status labels.
pub const STATUSES: &[&str] = &["Active", "Inactive"];

/// Gender labels offered on the profile form.
pub const GENDERS: &[&str] = &["Male", "Female", "Other"];

/// True when `value` is one of the fixed role labels.
pub fn is_role(value: &str) -> bool {
    ROLES.contains(&value)
}

/// True when `value` is one of the fixed team labels.
pub fn is_team(value: &str) -> bool {
    TEAMS.contains(&value)
}

/// True when `value` is one of the fixed status labels.
pub fn is_status(value: &str) -> bool {
    STATUSES.contains(&value)
}
