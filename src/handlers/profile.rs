use axum::{Json, extract::State};
use chrono::NaiveDate;
use tracing::info;

use crate::CareError;
use crate::db::models::DbAccount;
use crate::db::profiles::{DonorProfile, OrphanageProfile, Saved};
use crate::handlers::auth::auth_user;
use crate::middleware::{CareJson, MaybeSession, SessionAccount};
use crate::router::CareState;
use crate::service::validate::{all_present, present};
use crate::types::account::Role;
use crate::types::profile::{
    BankDetails, BankDetailsInput, DonorProfileRequest, DonorProfileResponse,
    OrphanageProfileRequest, OrphanageProfileResponse, ProfileView,
};

/// With `require_session`, the caller must hold a session for `account_id`;
/// without it, a session that is presented must still match.
fn ensure_owner(
    state: &CareState,
    session: &Option<SessionAccount>,
    account_id: &str,
) -> Result<(), CareError> {
    match session {
        Some(s) if s.account.id != account_id => Err(CareError::forbidden(
            "Session does not belong to this account",
        )),
        None if state.config.auth.require_session => {
            Err(CareError::unauthorized("Authentication required"))
        }
        _ => Ok(()),
    }
}

/// Load the account and check it may complete a profile of `role`.
async fn profile_account(
    state: &CareState,
    account_id: &str,
    role: Role,
    wrong_role_msg: &str,
) -> Result<DbAccount, CareError> {
    let account = state
        .storage
        .find_account_by_id(account_id)
        .await?
        .ok_or_else(|| CareError::not_found("Invalid account ID"))?;

    if account.role() != Some(role) {
        return Err(CareError::forbidden(wrong_role_msg));
    }
    if !account.is_verified {
        return Err(CareError::forbidden("Account email is not verified"));
    }
    Ok(account)
}

/// POST|PUT /complete-donor-profile -> creates or updates the donor profile.
pub async fn complete_donor_profile(
    State(state): State<CareState>,
    MaybeSession(session): MaybeSession,
    CareJson(req): CareJson<DonorProfileRequest>,
) -> Result<Json<DonorProfileResponse>, CareError> {
    let Some([account_id, donor_name, phone_number]) =
        all_present([&req.account_id, &req.donor_name, &req.phone_number])
    else {
        return Err(CareError::validation(
            "Account ID, donor name, and phone number are required",
        ));
    };

    ensure_owner(&state, &session, account_id)?;
    profile_account(
        &state,
        account_id,
        Role::Donor,
        "Account is not registered as a donor",
    )
    .await?;

    let (donor, saved) = state
        .storage
        .upsert_donor(
            account_id,
            DonorProfile {
                donor_name,
                phone_number,
                donation_pref: present(&req.donation_pref),
            },
        )
        .await?;

    let message = match saved {
        Saved::Created => "Donor profile created successfully",
        Saved::Updated => "Donor profile updated successfully",
    };
    info!(account_id = %account_id, ?saved, "donor profile saved");
    Ok(Json(DonorProfileResponse {
        message: message.to_string(),
        donor,
    }))
}

fn validate_bank_details(input: &BankDetailsInput) -> Result<BankDetails, CareError> {
    let Some([account_name, account_type, account_holder_name, account_number, ifsc_code]) =
        all_present([
            &input.account_name,
            &input.account_type,
            &input.account_holder_name,
            &input.account_number,
            &input.ifsc_code,
        ])
    else {
        return Err(CareError::validation("All bank details are required"));
    };

    if !account_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(CareError::validation("Account number must be numeric"));
    }

    Ok(BankDetails {
        account_name: account_name.to_string(),
        account_type: account_type.to_string(),
        account_holder_name: account_holder_name.to_string(),
        account_number: account_number.to_string(),
        ifsc_code: ifsc_code.to_ascii_uppercase(),
    })
}

fn parse_established_date(raw: &Option<String>) -> Result<Option<NaiveDate>, CareError> {
    present(raw)
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| CareError::validation("Established date must be YYYY-MM-DD"))
        })
        .transpose()
}

/// POST|PUT /complete-orphanage-profile -> creates or updates the orphanage profile
/// together with its bank details.
pub async fn complete_orphanage_profile(
    State(state): State<CareState>,
    MaybeSession(session): MaybeSession,
    CareJson(req): CareJson<OrphanageProfileRequest>,
) -> Result<Json<OrphanageProfileResponse>, CareError> {
    let required = all_present([&req.account_id, &req.orphanage_name, &req.location]);
    let (Some([account_id, orphanage_name, location]), Some(bank_input)) =
        (required, req.bank_details.as_ref())
    else {
        return Err(CareError::validation(
            "Account ID, orphanage name, location, and bank details are required",
        ));
    };

    let bank_details = validate_bank_details(bank_input)?;

    if [req.capacity, req.male_count, req.female_count]
        .into_iter()
        .flatten()
        .any(|n| n < 0)
    {
        return Err(CareError::validation(
            "Capacity and counts must not be negative",
        ));
    }
    let established_date = parse_established_date(&req.established_date)?;

    ensure_owner(&state, &session, account_id)?;
    profile_account(
        &state,
        account_id,
        Role::Orphanage,
        "Account is not registered as an orphanage",
    )
    .await?;

    let (orphanage, saved) = state
        .storage
        .save_orphanage_profile(
            account_id,
            OrphanageProfile {
                orphanage_name,
                location,
                capacity: req.capacity,
                established_date,
                male_count: req.male_count,
                female_count: req.female_count,
                bank_details: &bank_details,
            },
        )
        .await?;

    let message = match saved {
        Saved::Created => "Orphanage profile created successfully",
        Saved::Updated => "Orphanage profile updated successfully",
    };
    info!(account_id = %account_id, orphanage_id = orphanage.id, ?saved, "orphanage profile saved");
    Ok(Json(OrphanageProfileResponse {
        message: message.to_string(),
        orphanage,
    }))
}

/// GET /profile -> the caller's account and whichever profile it has.
pub async fn get_profile(
    State(state): State<CareState>,
    session: SessionAccount,
) -> Result<Json<ProfileView>, CareError> {
    let user = auth_user(&session.account)?;
    let (donor, orphanage) = match user.role {
        Role::Donor => (state.storage.find_donor_by_account(&user.id).await?, None),
        Role::Orphanage => (None, state.storage.find_orphanage_by_account(&user.id).await?),
    };
    Ok(Json(ProfileView {
        user,
        donor,
        orphanage,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> BankDetailsInput {
        BankDetailsInput {
            account_name: Some("Hope Trust".into()),
            account_type: Some("Savings".into()),
            account_holder_name: Some("Hope Children Home".into()),
            account_number: Some("0012345678".into()),
            ifsc_code: Some("sbin0001234".into()),
        }
    }

    #[test]
    fn bank_details_are_normalized() {
        let details = validate_bank_details(&bank()).unwrap();
        assert_eq!(details.account_number, "0012345678");
        assert_eq!(details.ifsc_code, "SBIN0001234");
    }

    #[test]
    fn bank_details_require_every_field() {
        let mut input = bank();
        input.ifsc_code = Some("  ".into());
        let err = validate_bank_details(&input).unwrap_err();
        assert_eq!(err.to_string(), "All bank details are required");
    }

    #[test]
    fn account_number_must_be_digits() {
        let mut input = bank();
        input.account_number = Some("12-34".into());
        let err = validate_bank_details(&input).unwrap_err();
        assert_eq!(err.to_string(), "Account number must be numeric");
    }

    #[test]
    fn established_date_is_optional_iso_date() {
        assert_eq!(parse_established_date(&None).unwrap(), None);
        assert_eq!(parse_established_date(&Some("".into())).unwrap(), None);
        assert_eq!(
            parse_established_date(&Some("1995-06-01".into())).unwrap(),
            NaiveDate::from_ymd_opt(1995, 6, 1)
        );
        assert!(parse_established_date(&Some("01/06/1995".into())).is_err());
    }
}
