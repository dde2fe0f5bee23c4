//! Startup data
//!
//! Fresh installations start with a fixed set of property types so the
//! property form has something to choose from.

use crate::domain::NewPropertyType;
use crate::store::{PropertyTypeRepository, StoreError};

/// Property types inserted into an empty installation, in insertion order
pub const DEFAULT_PROPERTY_TYPES: [&str; 3] = ["CASA", "APARTAMENTO", "CHALÉ"];

/// Insert the default property types if none exist yet.
///
/// Returns how many rows were inserted: all of them on an empty table, zero
/// otherwise. Inactive rows count as existing.
pub async fn seed_property_types<R>(repo: &R) -> Result<usize, StoreError>
where
    R: PropertyTypeRepository + ?Sized,
{
    let existing = repo.count_property_types().await?;
    if existing > 0 {
        tracing::debug!(existing, "Property types present, skipping seed");
        return Ok(0);
    }

    for description in DEFAULT_PROPERTY_TYPES {
        let seeded = repo
            .insert_property_type(&NewPropertyType::new(description))
            .await?;
        tracing::debug!(id = seeded.id, description = %seeded.description, "Seeded property type");
    }

    tracing::info!(
        inserted = DEFAULT_PROPERTY_TYPES.len(),
        "Seeded default property types"
    );
    Ok(DEFAULT_PROPERTY_TYPES.len())
}
