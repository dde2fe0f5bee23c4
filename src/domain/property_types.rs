//! Property type domain types
//!
//! Categories a property belongs to (house, apartment, ...). Property types
//! are never physically removed; deleting one marks it inactive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Property type status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyTypeStatus {
    #[default]
    Active,
    Inactive,
}

impl PropertyTypeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Parse a stored status value. Anything unrecognised is treated as active.
    pub fn from_db(s: &str) -> Self {
        match s {
            "INACTIVE" => Self::Inactive,
            _ => Self::Active,
        }
    }
}

/// Property type entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyType {
    pub id: i64,
    pub description: String,
    pub status: PropertyTypeStatus,
}

impl PropertyType {
    pub fn is_active(&self) -> bool {
        self.status != PropertyTypeStatus::Inactive
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// A property type that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewPropertyType {
    pub description: String,
    pub status: PropertyTypeStatus,
}

impl NewPropertyType {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            status: PropertyTypeStatus::default(),
        }
    }
}

/// Request DTO for creating or updating a property type
///
/// An absent `id` inserts a new row. An absent `status` keeps the stored
/// value on update and defaults to active on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavePropertyTypeRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub description: String,
    #[serde(default)]
    pub status: Option<PropertyTypeStatus>,
}

/// Response DTO for property type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyTypeResponse {
    pub id: i64,
    pub description: String,
    pub status: PropertyTypeStatus,
}

impl From<PropertyType> for PropertyTypeResponse {
    fn from(t: PropertyType) -> Self {
        Self {
            id: t.id,
            description: t.description,
            status: t.status,
        }
    }
}

/// Data backing the create/edit form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyTypeFormView {
    pub property_type: Option<PropertyTypeResponse>,
}
