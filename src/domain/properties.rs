//! Property domain types
//!
//! Listed properties. Each one belongs to exactly one property type and is
//! identified to the public by its ad code.

use serde::{Deserialize, Serialize};

use crate::api::Flash;
use crate::domain::property_types::{PropertyType, PropertyTypeResponse};

/// Shown when a save is rejected because another property already uses the ad code
pub const DUPLICATE_AD_CODE_MESSAGE: &str = "A property with this ad code already exists!";

/// Property entity
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: i64,
    pub ad_code: String,
    pub neighborhood: String,
    pub room_count: i32,
    pub internal_area: f64,
    pub external_area: f64,
    pub property_type: PropertyType,
}

impl Property {
    /// Internal plus external area. Never stored.
    pub fn total_area(&self) -> f64 {
        self.internal_area + self.external_area
    }
}

/// Writable property fields, shared by insert and update
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInput {
    pub ad_code: String,
    pub neighborhood: String,
    pub room_count: i32,
    pub internal_area: f64,
    pub external_area: f64,
    pub property_type_id: i64,
}

/// Request DTO for creating or updating a property
///
/// Echoed back verbatim when the save is rejected so the form keeps what the
/// user typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavePropertyRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub ad_code: String,
    pub neighborhood: String,
    #[serde(default)]
    pub room_count: i32,
    #[serde(default)]
    pub internal_area: f64,
    #[serde(default)]
    pub external_area: f64,
    pub property_type_id: i64,
}

impl SavePropertyRequest {
    pub fn input(&self) -> PropertyInput {
        PropertyInput {
            ad_code: self.ad_code.clone(),
            neighborhood: self.neighborhood.clone(),
            room_count: self.room_count,
            internal_area: self.internal_area,
            external_area: self.external_area,
            property_type_id: self.property_type_id,
        }
    }
}

/// Response DTO for property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyResponse {
    pub id: i64,
    pub ad_code: String,
    pub neighborhood: String,
    pub room_count: i32,
    pub internal_area: f64,
    pub external_area: f64,
    pub total_area: f64,
    pub property_type: PropertyTypeResponse,
}

impl From<Property> for PropertyResponse {
    fn from(p: Property) -> Self {
        Self {
            id: p.id,
            total_area: p.total_area(),
            ad_code: p.ad_code,
            neighborhood: p.neighborhood,
            room_count: p.room_count,
            internal_area: p.internal_area,
            external_area: p.external_area,
            property_type: p.property_type.into(),
        }
    }
}

/// Data backing the create/edit form
///
/// `property` is set when editing. `flash` and `submitted` are only present
/// when a save was rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFormView {
    pub property: Option<PropertyResponse>,
    pub property_types: Vec<PropertyTypeResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<SavePropertyRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property_types::PropertyTypeStatus;

    fn apartment() -> PropertyType {
        PropertyType {
            id: 2,
            description: "APARTAMENTO".to_string(),
            status: PropertyTypeStatus::Active,
        }
    }

    #[test]
    fn total_area_sums_both_areas() {
        let p = Property {
            id: 1,
            ad_code: "AP-100".to_string(),
            neighborhood: "Centro".to_string(),
            room_count: 4,
            internal_area: 72.5,
            external_area: 10.25,
            property_type: apartment(),
        };
        assert_eq!(p.total_area(), 82.75);

        let response = PropertyResponse::from(p);
        assert_eq!(response.total_area, 82.75);
        assert_eq!(response.property_type.description, "APARTAMENTO");
    }

    #[test]
    fn request_converts_to_input() {
        let req: SavePropertyRequest = serde_json::from_str(
            r#"{"ad_code":"C-1","neighborhood":"Lagoa","property_type_id":1}"#,
        )
        .unwrap();
        assert_eq!(req.id, None);

        let input = req.input();
        assert_eq!(input.ad_code, "C-1");
        assert_eq!(input.room_count, 0);
        assert_eq!(input.internal_area, 0.0);
        assert_eq!(input.property_type_id, 1);
    }

    #[test]
    fn form_view_omits_flash_unless_rejected() {
        let view = PropertyFormView {
            property: None,
            property_types: vec![apartment().into()],
            flash: None,
            submitted: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("flash").is_none());
        assert!(json.get("submitted").is_none());
        assert!(json["property"].is_null());
    }
}
