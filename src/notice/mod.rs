//! User-facing notices.
//!
//! Core failures are never fatal. Each one maps to a stable notice key that the presentation
//! layer translates; the core itself does no localization.

use crate::errors::Error;

/// The operation a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Locate,
    Submit,
    Login,
    LoadPending,
    Approve,
    Reject,
    ReverseGeocode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    FetchSheltersError,
    LocatingYou,
    UnableToFetchGpsLocation,
    ShelterAddedSuccess,
    FailedToAddShelter,
    FillAllFieldsError,
    MissingFields,
    LoginFailed,
    NoTokenError,
    ShelterApproved,
    ShelterRejected,
    ApproveShelterError,
    RejectShelterError,
    UnknownAddress,
}

impl Notice {
    /// Translation key for this notice.
    pub fn key(&self) -> &'static str {
        match self {
            Notice::FetchSheltersError => "fetch_shelters_error",
            Notice::LocatingYou => "locating_you",
            Notice::UnableToFetchGpsLocation => "unable_to_fetch_gps_location",
            Notice::ShelterAddedSuccess => "shelter_added_success",
            Notice::FailedToAddShelter => "failed_to_add_shelter",
            Notice::FillAllFieldsError => "fill_all_fields_error",
            Notice::MissingFields => "missing_fields",
            Notice::LoginFailed => "login_failed",
            Notice::NoTokenError => "no_token_error",
            Notice::ShelterApproved => "shelter_approved",
            Notice::ShelterRejected => "shelter_rejected",
            Notice::ApproveShelterError => "approve_shelter_error",
            Notice::RejectShelterError => "reject_shelter_error",
            Notice::UnknownAddress => "unknown_address",
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            Notice::ShelterAddedSuccess
                | Notice::ShelterApproved
                | Notice::ShelterRejected
                | Notice::LocatingYou
        )
    }

    /// Notice shown after `operation` succeeded, if any.
    pub fn success(operation: Operation) -> Option<Notice> {
        match operation {
            Operation::Submit => Some(Notice::ShelterAddedSuccess),
            Operation::Approve => Some(Notice::ShelterApproved),
            Operation::Reject => Some(Notice::ShelterRejected),
            _ => None,
        }
    }

    /// Notice shown after `operation` failed with `error`.
    pub fn failure(operation: Operation, error: &Error) -> Notice {
        match (operation, error) {
            (Operation::Refresh, Error::Location(_)) => Notice::LocatingYou,
            (_, Error::Location(_)) => Notice::UnableToFetchGpsLocation,
            (Operation::Login, Error::Validation(_)) => Notice::MissingFields,
            (Operation::Login, _) => Notice::LoginFailed,
            (Operation::Submit, Error::Validation(_)) => Notice::FillAllFieldsError,
            (Operation::Submit, _) => Notice::FailedToAddShelter,
            (Operation::LoadPending | Operation::Approve | Operation::Reject, Error::Auth(_)) => {
                Notice::NoTokenError
            }
            (Operation::Approve, _) => Notice::ApproveShelterError,
            (Operation::Reject, _) => Notice::RejectShelterError,
            (Operation::ReverseGeocode, _) => Notice::UnknownAddress,
            (Operation::Refresh | Operation::Locate | Operation::LoadPending, _) => {
                Notice::FetchSheltersError
            }
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
