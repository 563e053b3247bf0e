use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::info;

use crate::CareError;
use crate::db::donations::NewRequirement;
use crate::db::models::DbOrphanage;
use crate::middleware::{CareJson, SessionAccount};
use crate::router::CareState;
use crate::service::validate::present;
use crate::types::auth::MessageResponse;
use crate::types::donation::{Category, CategoryQuery, RequirementRequest, RequirementView, Unit};

/// The orphanage at `id`, provided the session owns it.
async fn owned_orphanage(
    state: &CareState,
    session: &SessionAccount,
    id: i64,
) -> Result<DbOrphanage, CareError> {
    let orphanage = state
        .storage
        .find_orphanage_by_id(id)
        .await?
        .ok_or_else(|| CareError::not_found("Orphanage not found"))?;
    if orphanage.account_id != session.account.id {
        return Err(CareError::forbidden(
            "Only the orphanage can manage its requirements",
        ));
    }
    Ok(orphanage)
}

pub(crate) fn parse_category(raw: &str) -> Result<Category, CareError> {
    raw.parse().map_err(CareError::Validation)
}

/// GET /orphanages/{id}/requirements?category=
pub async fn list_requirements(
    State(state): State<CareState>,
    Path(id): Path<i64>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<RequirementView>>, CareError> {
    let category = present(&query.category).map(parse_category).transpose()?;
    if state.storage.find_orphanage_by_id(id).await?.is_none() {
        return Err(CareError::not_found("Orphanage not found"));
    }
    let rows = state.storage.list_requirements(id, category).await?;
    Ok(Json(rows.into_iter().map(RequirementView::from).collect()))
}

/// POST /orphanages/{id}/requirements -> records a need posted by the orphanage.
pub async fn add_requirement(
    State(state): State<CareState>,
    Path(id): Path<i64>,
    session: SessionAccount,
    CareJson(req): CareJson<RequirementRequest>,
) -> Result<(StatusCode, Json<RequirementView>), CareError> {
    let orphanage = owned_orphanage(&state, &session, id).await?;

    let (Some(name), Some(quantity)) = (present(&req.name), req.quantity.as_ref()) else {
        return Err(CareError::validation("Please fill all fields"));
    };
    let quantity = quantity
        .as_f64()
        .filter(|q| q.is_finite() && *q > 0.0)
        .ok_or_else(|| CareError::validation("Quantity must be a positive number"))?;
    let unit = match present(&req.unit) {
        Some(raw) => raw
            .parse::<Unit>()
            .map_err(|_| CareError::validation("Unit must be one of kgs, litres, pcs"))?,
        None => Unit::Kgs,
    };
    let category = match present(&req.category) {
        Some(raw) => parse_category(raw)?,
        None => Category::General,
    };

    let row = state
        .storage
        .insert_requirement(
            NewRequirement {
                orphanage_id: orphanage.id,
                category,
                name,
                quantity,
                unit,
            },
            Utc::now(),
        )
        .await?;
    info!(orphanage_id = orphanage.id, requirement_id = row.id, "requirement added");
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// DELETE /orphanages/{id}/requirements/{requirement_id}
pub async fn delete_requirement(
    State(state): State<CareState>,
    Path((id, requirement_id)): Path<(i64, i64)>,
    session: SessionAccount,
) -> Result<Json<MessageResponse>, CareError> {
    let orphanage = owned_orphanage(&state, &session, id).await?;
    if !state
        .storage
        .delete_requirement(orphanage.id, requirement_id)
        .await?
    {
        return Err(CareError::not_found("Requirement not found"));
    }
    Ok(Json(MessageResponse::new("Requirement removed")))
}
