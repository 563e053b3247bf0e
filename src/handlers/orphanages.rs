use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::CareError;
use crate::router::CareState;
use crate::types::donation::RequirementView;
use crate::types::profile::{OrphanageDetail, OrphanageSearch, OrphanageSummary};

/// GET /orphanages?q= -> listings filtered on name or location.
pub async fn list_orphanages(
    State(state): State<CareState>,
    Query(search): Query<OrphanageSearch>,
) -> Result<Json<Vec<OrphanageSummary>>, CareError> {
    let rows = state.storage.list_orphanages(search.q.as_deref()).await?;
    Ok(Json(rows.into_iter().map(OrphanageSummary::from).collect()))
}

/// GET /orphanages/{id} -> one listing with its open requirements.
pub async fn get_orphanage(
    State(state): State<CareState>,
    Path(id): Path<i64>,
) -> Result<Json<OrphanageDetail>, CareError> {
    let orphanage = state
        .storage
        .find_orphanage_by_id(id)
        .await?
        .ok_or_else(|| CareError::not_found("Orphanage not found"))?;
    let requirements = state
        .storage
        .list_requirements(orphanage.id, None)
        .await?
        .into_iter()
        .map(RequirementView::from)
        .collect();
    Ok(Json(OrphanageDetail {
        orphanage: orphanage.into(),
        requirements,
    }))
}
