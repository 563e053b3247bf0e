use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::info;

use crate::CareError;
use crate::db::models::{DbDonationRequest, DbOrphanage};
use crate::handlers::requirements::parse_category;
use crate::middleware::{CareJson, SessionAccount};
use crate::router::CareState;
use crate::service::validate::present;
use crate::types::account::Role;
use crate::types::donation::{DonationRequestInput, DonationRequestView, DonationStatus, StatusQuery};

fn to_views(rows: Vec<DbDonationRequest>) -> Result<Vec<DonationRequestView>, CareError> {
    rows.into_iter()
        .map(|r| DonationRequestView::try_from(r).map_err(CareError::from))
        .collect()
}

/// The orphanage profile behind an orphanage session.
async fn session_orphanage(
    state: &CareState,
    session: &SessionAccount,
) -> Result<DbOrphanage, CareError> {
    session.require_role(Role::Orphanage, "Only orphanages can review donation requests")?;
    state
        .storage
        .find_orphanage_by_account(&session.account.id)
        .await?
        .ok_or_else(|| CareError::not_found("Complete your orphanage profile first"))
}

/// POST /orphanages/{id}/donation-requests -> a donor offers items to an orphanage.
pub async fn submit_donation_request(
    State(state): State<CareState>,
    Path(orphanage_id): Path<i64>,
    session: SessionAccount,
    CareJson(input): CareJson<DonationRequestInput>,
) -> Result<(StatusCode, Json<DonationRequestView>), CareError> {
    session.require_role(Role::Donor, "Only donors can submit donation requests")?;

    let category = present(&input.category)
        .ok_or_else(|| CareError::validation("Category is required"))
        .and_then(parse_category)?;
    let items: Vec<String> = input
        .items
        .unwrap_or_default()
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return Err(CareError::validation("At least one item is required"));
    }

    if state
        .storage
        .find_orphanage_by_id(orphanage_id)
        .await?
        .is_none()
    {
        return Err(CareError::not_found("Orphanage not found"));
    }

    let row = state
        .storage
        .insert_donation_request(
            orphanage_id,
            &session.account.id,
            category,
            &items,
            Utc::now(),
        )
        .await?;
    info!(
        donation_request_id = row.id,
        orphanage_id,
        donor = %session.account.id,
        "donation request submitted"
    );
    Ok((StatusCode::CREATED, Json(DonationRequestView::try_from(row)?)))
}

/// GET /donation-requests?status= -> requests addressed to the caller's orphanage.
pub async fn list_incoming(
    State(state): State<CareState>,
    session: SessionAccount,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<DonationRequestView>>, CareError> {
    let status = present(&query.status)
        .map(|s| s.parse::<DonationStatus>().map_err(CareError::Validation))
        .transpose()?;
    let orphanage = session_orphanage(&state, &session).await?;
    let rows = state
        .storage
        .list_donations_for_orphanage(orphanage.id, status)
        .await?;
    Ok(Json(to_views(rows)?))
}

/// GET /my/donation-requests -> requests the calling donor submitted.
pub async fn list_mine(
    State(state): State<CareState>,
    session: SessionAccount,
) -> Result<Json<Vec<DonationRequestView>>, CareError> {
    session.require_role(Role::Donor, "Only donors have submitted donation requests")?;
    let rows = state
        .storage
        .list_donations_for_donor(&session.account.id)
        .await?;
    Ok(Json(to_views(rows)?))
}

async fn transition(
    state: &CareState,
    session: &SessionAccount,
    id: i64,
    to: DonationStatus,
) -> Result<Json<DonationRequestView>, CareError> {
    let orphanage = session_orphanage(state, session).await?;
    let request = state
        .storage
        .find_donation_request(id)
        .await?
        .ok_or_else(|| CareError::not_found("Donation request not found"))?;
    if request.orphanage_id != orphanage.id {
        return Err(CareError::forbidden(
            "Donation request belongs to another orphanage",
        ));
    }

    let current: DonationStatus = request.status.parse().map_err(CareError::Internal)?;
    if !current.can_transition_to(to) {
        return Err(CareError::conflict("Invalid status transition"));
    }
    // lost a race with another reviewer
    if !state
        .storage
        .transition_donation_status(id, current, to, Utc::now())
        .await?
    {
        return Err(CareError::conflict("Invalid status transition"));
    }
    info!(donation_request_id = id, from = %current, to = %to, "donation request updated");

    let updated = state
        .storage
        .find_donation_request(id)
        .await?
        .ok_or_else(|| CareError::not_found("Donation request not found"))?;
    Ok(Json(DonationRequestView::try_from(updated)?))
}

/// POST /donation-requests/{id}/approve
pub async fn approve(
    State(state): State<CareState>,
    Path(id): Path<i64>,
    session: SessionAccount,
) -> Result<Json<DonationRequestView>, CareError> {
    transition(&state, &session, id, DonationStatus::Approved).await
}

/// POST /donation-requests/{id}/reject
pub async fn reject(
    State(state): State<CareState>,
    Path(id): Path<i64>,
    session: SessionAccount,
) -> Result<Json<DonationRequestView>, CareError> {
    transition(&state, &session, id, DonationStatus::Rejected).await
}

/// POST /donation-requests/{id}/complete
pub async fn complete(
    State(state): State<CareState>,
    Path(id): Path<i64>,
    session: SessionAccount,
) -> Result<Json<DonationRequestView>, CareError> {
    transition(&state, &session, id, DonationStatus::Completed).await
}
