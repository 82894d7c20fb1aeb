use thiserror::Error;

use crate::model::{ValidationError, WorkoutId};
use crate::persistence::{CorruptDataError, StoreError};

/// Every failure a ledger or session operation can report.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("workout {0} not found")]
    NotFound(WorkoutId),
    #[error("duplicate workout id {0}")]
    DuplicateId(WorkoutId),
    #[error("workout {0} already has a marker")]
    DuplicateAttachment(WorkoutId),
    #[error("stored ledger is unreadable: {0}")]
    CorruptData(#[from] CorruptDataError),
    #[error("storage: {0}")]
    Storage(#[from] StoreError),
    #[error("another confirmation is already pending")]
    ConfirmationBusy,
    #[error("no confirmation is pending")]
    NoPendingConfirmation,
    #[error("no map location selected")]
    NoLocationSelected,
}
