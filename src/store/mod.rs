//! Storage for property types and properties
//!
//! Handlers only see the repository traits. `PgStore` backs them with
//! PostgreSQL, `InMemoryStore` with a process-local map.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewPropertyType, Property, PropertyInput, PropertyType};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("property type {0} does not exist")]
    MissingPropertyType(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Case-insensitive substring match used by every search
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Selects property types for listing. Inactive types are always excluded.
#[derive(Debug, Clone, Default)]
pub struct PropertyTypeFilter {
    /// Matched against the description
    pub term: Option<String>,
}

impl PropertyTypeFilter {
    pub fn matching(term: Option<String>) -> Self {
        Self { term }
    }

    pub fn matches(&self, property_type: &PropertyType) -> bool {
        property_type.is_active()
            && self
                .term
                .as_deref()
                .map_or(true, |term| contains_ignore_case(&property_type.description, term))
    }
}

/// Selects properties for listing
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    /// Matched against the neighborhood or the ad code
    pub term: Option<String>,
}

impl PropertyFilter {
    pub fn matching(term: Option<String>) -> Self {
        Self { term }
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.term.as_deref().map_or(true, |term| {
            contains_ignore_case(&property.neighborhood, term)
                || contains_ignore_case(&property.ad_code, term)
        })
    }
}

#[async_trait]
pub trait PropertyTypeRepository: Send + Sync {
    /// Number of stored property types, inactive ones included
    async fn count_property_types(&self) -> Result<i64, StoreError>;

    async fn find_property_type(&self, id: i64) -> Result<Option<PropertyType>, StoreError>;

    /// Rows matching `filter`, in id order
    async fn list_property_types(
        &self,
        filter: &PropertyTypeFilter,
    ) -> Result<Vec<PropertyType>, StoreError>;

    async fn insert_property_type(
        &self,
        input: &NewPropertyType,
    ) -> Result<PropertyType, StoreError>;

    /// Overwrite every field of an existing row. `None` if the id is unknown.
    async fn update_property_type(
        &self,
        property_type: &PropertyType,
    ) -> Result<Option<PropertyType>, StoreError>;
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn find_property(&self, id: i64) -> Result<Option<Property>, StoreError>;

    /// Rows matching `filter`, in id order
    async fn list_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>, StoreError>;

    /// First property using `ad_code`, skipping the row `excluding_id` if given
    async fn find_property_by_ad_code(
        &self,
        ad_code: &str,
        excluding_id: Option<i64>,
    ) -> Result<Option<Property>, StoreError>;

    async fn insert_property(&self, input: &PropertyInput) -> Result<Property, StoreError>;

    /// `None` if the id is unknown
    async fn update_property(
        &self,
        id: i64,
        input: &PropertyInput,
    ) -> Result<Option<Property>, StoreError>;

    /// Permanently remove a property. Returns `true` if a row was removed.
    async fn delete_property(&self, id: i64) -> Result<bool, StoreError>;
}

/// Everything the application needs from storage
#[async_trait]
pub trait Storage: PropertyTypeRepository + PropertyRepository + Send + Sync {
    /// Cheap connectivity probe
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyTypeStatus;

    fn property_type(description: &str, status: PropertyTypeStatus) -> PropertyType {
        PropertyType {
            id: 1,
            description: description.to_string(),
            status,
        }
    }

    #[test]
    fn type_filter_excludes_inactive() {
        let filter = PropertyTypeFilter::default();
        assert!(filter.matches(&property_type("CASA", PropertyTypeStatus::Active)));
        assert!(!filter.matches(&property_type("CASA", PropertyTypeStatus::Inactive)));
    }

    #[test]
    fn type_filter_matches_term_case_insensitively() {
        let filter = PropertyTypeFilter::matching(Some("cas".to_string()));
        assert!(filter.matches(&property_type("CASA", PropertyTypeStatus::Active)));
        assert!(!filter.matches(&property_type("CHALÉ", PropertyTypeStatus::Active)));
        assert!(!filter.matches(&property_type("CASA", PropertyTypeStatus::Inactive)));

        let accented = PropertyTypeFilter::matching(Some("chalé".to_string()));
        assert!(accented.matches(&property_type("CHALÉ", PropertyTypeStatus::Active)));
    }

    #[test]
    fn empty_term_matches_everything_active() {
        let filter = PropertyTypeFilter::matching(Some(String::new()));
        assert!(filter.matches(&property_type("APARTAMENTO", PropertyTypeStatus::Active)));
    }

    #[test]
    fn property_filter_checks_neighborhood_and_ad_code() {
        let property = Property {
            id: 7,
            ad_code: "AB-123".to_string(),
            neighborhood: "Jardim Botânico".to_string(),
            room_count: 3,
            internal_area: 90.0,
            external_area: 0.0,
            property_type: property_type("CASA", PropertyTypeStatus::Active),
        };

        assert!(PropertyFilter::default().matches(&property));
        assert!(PropertyFilter::matching(Some("jardim".to_string())).matches(&property));
        assert!(PropertyFilter::matching(Some("ab-1".to_string())).matches(&property));
        assert!(!PropertyFilter::matching(Some("centro".to_string())).matches(&property));
    }
}
