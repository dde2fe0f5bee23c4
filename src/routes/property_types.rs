//! Property type routes
//!
//! Registration, search and soft removal of property types.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use std::sync::Arc;

use crate::api::{DataResponse, ListResponse, SearchParams};
use crate::app::AppState;
use crate::domain::{
    NewPropertyType, PropertyType, PropertyTypeFormView, PropertyTypeResponse,
    PropertyTypeStatus, SavePropertyTypeRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::store::PropertyTypeFilter;

fn detail_location(id: i64) -> String {
    format!("/property-types/{}", id)
}

/// GET /property-types/new
///
/// Empty creation form.
pub async fn form() -> Json<PropertyTypeFormView> {
    Json(PropertyTypeFormView {
        property_type: None,
    })
}

/// GET /property-types?term=
///
/// Active property types, optionally filtered by description.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(search): Query<SearchParams>,
) -> ApiResult<ListResponse<PropertyTypeResponse>> {
    let filter = PropertyTypeFilter::matching(search.term.clone());
    let property_types = state.store.list_property_types(&filter).await?;

    tracing::debug!(
        term = ?search.term,
        count = property_types.len(),
        "Listing property types"
    );

    Ok(ListResponse::new(
        property_types.into_iter().map(Into::into).collect(),
        search.term,
    ))
}

/// GET /property-types/:id
///
/// `data` is null when the id is unknown.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<DataResponse<Option<PropertyTypeResponse>>> {
    let property_type = state.store.find_property_type(id).await?;
    Ok(DataResponse::new(property_type.map(Into::into)))
}

/// GET /property-types/:id/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PropertyTypeFormView>> {
    let property_type = state.store.find_property_type(id).await?;
    Ok(Json(PropertyTypeFormView {
        property_type: property_type.map(Into::into),
    }))
}

/// POST /property-types
///
/// Insert or update without validation, then redirect to the detail view.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SavePropertyTypeRequest>,
) -> ApiResult<Redirect> {
    let saved = match req.id {
        None => {
            let input = NewPropertyType {
                description: req.description,
                status: req.status.unwrap_or_default(),
            };
            state.store.insert_property_type(&input).await?
        }
        Some(id) => {
            let existing = state
                .store
                .find_property_type(id)
                .await?
                .ok_or_else(|| ApiError::not_found("Property type not found"))?;

            let updated = PropertyType {
                id,
                description: req.description,
                status: req.status.unwrap_or(existing.status),
            };
            state
                .store
                .update_property_type(&updated)
                .await?
                .ok_or_else(|| ApiError::not_found("Property type not found"))?
        }
    };

    tracing::info!(
        property_type_id = saved.id,
        description = %saved.description,
        status = saved.status.as_str(),
        "Property type saved"
    );

    Ok(Redirect::to(&detail_location(saved.id)))
}

/// DELETE /property-types/:id
///
/// Marks the type inactive; the row is kept. Unknown ids are ignored.
pub async fn soft_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Redirect> {
    if let Some(mut property_type) = state.store.find_property_type(id).await? {
        property_type.status = PropertyTypeStatus::Inactive;
        state.store.update_property_type(&property_type).await?;
        tracing::info!(property_type_id = id, "Property type deactivated");
    } else {
        tracing::debug!(property_type_id = id, "Property type to deactivate not found");
    }

    Ok(Redirect::to("/property-types"))
}
