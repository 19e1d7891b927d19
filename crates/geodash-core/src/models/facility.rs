//! Facility records entered through the admin portal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a facility record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacilityId(pub i64);

/// A point facility (school, health center, well, voting office...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub province: String,
    pub commune: String,

    /// Facility category, free text (e.g. "ecole", "puits")
    pub kind: String,

    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// Input for facility creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFacility {
    pub province: String,
    pub commune: String,
    pub kind: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}
