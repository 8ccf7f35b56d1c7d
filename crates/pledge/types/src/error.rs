use thiserror::Error;

/// Result type for pledge operations.
pub type PledgeResult<T> = Result<T, PledgeError>;

/// Every way a pledge operation can fail.
///
/// All kinds are caller-correctable: bad input, wrong permission or wrong
/// timing. Each is detected before any write happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PledgeError {
    #[error("caller is not authorized for this commitment")]
    NotAuthorized,

    #[error("no such commitment")]
    NoSuchCommitment,

    #[error("no such stage")]
    NoSuchStage,

    #[error("commitment already exists")]
    CommitmentAlreadyExists,

    #[error("stage already exists")]
    StageAlreadyExists,

    #[error("commitment deadline has passed")]
    DeadlinePassed,

    #[error("commitment is already completed")]
    CommitmentCompleted,

    #[error("commitment is not completed yet")]
    CommitmentNotCompleted,

    #[error("no stake left to claim")]
    InsufficientStake,

    #[error("caller is not the validator of this commitment")]
    NotValidator,

    #[error("invalid privacy value")]
    InvalidPrivacy,

    #[error("deadline is already in the past")]
    InvalidDeadline,

    #[error("stage is already completed")]
    StageAlreadyCompleted,

    #[error("stage must be completed before it can be validated")]
    ValidationRequired,

    #[error("validator is locked once validation has begun")]
    ValidatorLocked,

    #[error("{field} exceeds limit of {limit}")]
    TextTooLong { field: &'static str, limit: usize },

    #[error("stake transfer failed: {0}")]
    StakeTransfer(#[from] TransferError),
}

impl PledgeError {
    /// Stable numeric code surfaced at the call boundary.
    pub fn code(&self) -> u32 {
        match self {
            PledgeError::NotAuthorized => 100,
            PledgeError::NoSuchCommitment => 101,
            PledgeError::NoSuchStage => 102,
            PledgeError::CommitmentAlreadyExists => 103,
            PledgeError::StageAlreadyExists => 104,
            PledgeError::DeadlinePassed => 105,
            PledgeError::CommitmentCompleted => 106,
            PledgeError::InsufficientStake => 107,
            PledgeError::NotValidator => 108,
            PledgeError::InvalidPrivacy => 109,
            PledgeError::InvalidDeadline => 110,
            PledgeError::StageAlreadyCompleted => 111,
            PledgeError::ValidationRequired => 112,
            PledgeError::ValidatorLocked => 113,
            PledgeError::CommitmentNotCompleted => 114,
            PledgeError::TextTooLong { .. } => 115,
            PledgeError::StakeTransfer(_) => 116,
        }
    }
}

/// Refusals from the external value-transfer capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: u64 },

    #[error("transfer amount must be positive")]
    ZeroAmount,

    #[error("transfer of {amount} would overflow a balance")]
    Overflow { amount: u64 },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}
