//! Domain types and DTOs
//!
//! These types define the data structures for listing entities.

pub mod properties;
pub mod property_types;

// Re-export commonly used types
pub use properties::*;
pub use property_types::*;
