//! Property routes
//!
//! Registration, search and removal of listed properties. Ad codes must be
//! unique, which is checked whenever a property is saved.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use crate::api::{DataResponse, Flash, ListResponse, SearchParams};
use crate::app::AppState;
use crate::domain::{
    PropertyFormView, PropertyResponse, PropertyTypeResponse, SavePropertyRequest,
    DUPLICATE_AD_CODE_MESSAGE,
};
use crate::error::{ApiError, ApiResult};
use crate::store::{PropertyFilter, PropertyTypeFilter};

fn detail_location(id: i64) -> String {
    format!("/properties/{}", id)
}

/// Options for the property type selector
async fn active_property_types(state: &AppState) -> ApiResult<Vec<PropertyTypeResponse>> {
    let property_types = state
        .store
        .list_property_types(&PropertyTypeFilter::default())
        .await?;
    Ok(property_types.into_iter().map(Into::into).collect())
}

/// GET /properties/new
///
/// Empty creation form with the active property types.
pub async fn form(State(state): State<Arc<AppState>>) -> ApiResult<Json<PropertyFormView>> {
    Ok(Json(PropertyFormView {
        property: None,
        property_types: active_property_types(&state).await?,
        flash: None,
        submitted: None,
    }))
}

/// GET /properties?term=
///
/// All properties, optionally filtered by neighborhood or ad code.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(search): Query<SearchParams>,
) -> ApiResult<ListResponse<PropertyResponse>> {
    let filter = PropertyFilter::matching(search.term.clone());
    let properties = state.store.list_properties(&filter).await?;

    tracing::debug!(
        term = ?search.term,
        count = properties.len(),
        "Listing properties"
    );

    Ok(ListResponse::new(
        properties.into_iter().map(Into::into).collect(),
        search.term,
    ))
}

/// GET /properties/:id
///
/// `data` is null when the id is unknown.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<DataResponse<Option<PropertyResponse>>> {
    let property = state.store.find_property(id).await?;
    Ok(DataResponse::new(property.map(Into::into)))
}

/// GET /properties/:id/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PropertyFormView>> {
    let property = state.store.find_property(id).await?;
    Ok(Json(PropertyFormView {
        property: property.map(Into::into),
        property_types: active_property_types(&state).await?,
        flash: None,
        submitted: None,
    }))
}

/// POST /properties
///
/// Rejects the save when another property already uses the ad code: nothing
/// is written and the form (creation or edit, depending on `id`) comes back
/// with 409, an error flash and the submitted values. Otherwise inserts or
/// updates and redirects to the detail view.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SavePropertyRequest>,
) -> ApiResult<Response> {
    let duplicate = state
        .store
        .find_property_by_ad_code(&req.ad_code, req.id)
        .await?;

    if let Some(existing) = duplicate {
        tracing::warn!(
            ad_code = %req.ad_code,
            property_id = ?req.id,
            existing_id = existing.id,
            "Rejected property save, ad code already in use"
        );

        let property = match req.id {
            Some(id) => state.store.find_property(id).await?.map(Into::into),
            None => None,
        };
        let view = PropertyFormView {
            property,
            property_types: active_property_types(&state).await?,
            flash: Some(Flash::error(DUPLICATE_AD_CODE_MESSAGE)),
            submitted: Some(req),
        };
        return Ok((StatusCode::CONFLICT, Json(view)).into_response());
    }

    if state
        .store
        .find_property_type(req.property_type_id)
        .await?
        .is_none()
    {
        return Err(ApiError::bad_request(format!(
            "Property type {} does not exist",
            req.property_type_id
        )));
    }

    let input = req.input();
    let saved = match req.id {
        None => state.store.insert_property(&input).await?,
        Some(id) => state
            .store
            .update_property(id, &input)
            .await?
            .ok_or_else(|| ApiError::not_found("Property not found"))?,
    };

    tracing::info!(
        property_id = saved.id,
        ad_code = %saved.ad_code,
        property_type_id = saved.property_type.id,
        "Property saved"
    );

    Ok(Redirect::to(&detail_location(saved.id)).into_response())
}

/// DELETE /properties/:id
///
/// Permanently removes the property. Unknown ids are ignored.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Redirect> {
    if state.store.delete_property(id).await? {
        tracing::info!(property_id = id, "Property deleted");
    } else {
        tracing::debug!(property_id = id, "Property to delete not found");
    }

    Ok(Redirect::to("/properties"))
}
