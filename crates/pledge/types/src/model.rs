use serde::{Deserialize, Serialize};

use crate::ids::{BlockHeight, Principal};

/// Visibility tier of a commitment and all of its stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Privacy {
    Public = 1,
    Private = 2,
}

impl Privacy {
    /// Wire code accepted at the call boundary.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Privacy::Public),
            2 => Some(Privacy::Private),
            _ => None,
        }
    }
}

impl From<Privacy> for u8 {
    fn from(privacy: Privacy) -> Self {
        privacy.code()
    }
}

/// Third party allowed to confirm completed stages.
///
/// `Unassigned` never matches any principal, so a missing validator can
/// never be mistaken for a real caller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validator {
    #[default]
    Unassigned,
    Assigned(Principal),
}

impl Validator {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Validator::Assigned(principal) => Some(principal),
            Validator::Unassigned => None,
        }
    }

    /// True iff a validator is assigned and it is `caller`.
    pub fn matches(&self, caller: &Principal) -> bool {
        match self {
            Validator::Assigned(principal) => principal == caller,
            Validator::Unassigned => false,
        }
    }
}

impl From<Option<Principal>> for Validator {
    fn from(value: Option<Principal>) -> Self {
        value.map_or(Validator::Unassigned, Validator::Assigned)
    }
}

/// Lifecycle state of a commitment. There is no way back from `Complete`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitmentStatus {
    Open,
    Complete,
}

/// One commitment record, stored under `(owner, commitment-id)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub title: String,
    pub description: String,
    pub deadline: Option<BlockHeight>,
    pub created_at: BlockHeight,
    pub completed_at: Option<BlockHeight>,
    pub privacy: Privacy,
    pub validator: Validator,
    pub stake_amount: u64,
    pub total_stages: u64,
    pub completed_stages: u64,
}

impl Commitment {
    /// Fresh open record with no stages.
    pub fn open(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: Option<BlockHeight>,
        created_at: BlockHeight,
        privacy: Privacy,
        validator: Validator,
        stake_amount: u64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            deadline,
            created_at,
            completed_at: None,
            privacy,
            validator,
            stake_amount,
            total_stages: 0,
            completed_stages: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn status(&self) -> CommitmentStatus {
        if self.is_complete() {
            CommitmentStatus::Complete
        } else {
            CommitmentStatus::Open
        }
    }

    /// True when a deadline exists and `height` has moved beyond it.
    pub fn deadline_passed(&self, height: BlockHeight) -> bool {
        self.deadline.is_some_and(|deadline| height.is_past(deadline))
    }

    /// True when every declared stage is done and there is at least one.
    pub fn all_stages_completed(&self) -> bool {
        self.total_stages > 0 && self.completed_stages == self.total_stages
    }
}

/// One stage record, stored under `(owner, commitment-id, stage-id)`.
///
/// Stages have no privacy of their own; reads are gated by the parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub completed_at: Option<BlockHeight>,
    pub validated_by: Option<Principal>,
}

impl Stage {
    pub fn pending(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            completed: false,
            completed_at: None,
            validated_by: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privacy_codes_round_trip_and_reject_unknown_values() {
        assert_eq!(Privacy::from_code(Privacy::Public.code()), Some(Privacy::Public));
        assert_eq!(Privacy::from_code(Privacy::Private.code()), Some(Privacy::Private));
        assert_eq!(Privacy::from_code(0), None);
        assert_eq!(Privacy::from_code(3), None);
    }

    #[test]
    fn unassigned_validator_matches_nobody() {
        let validator = Validator::Unassigned;
        assert!(!validator.matches(&Principal::new("")));
        assert!(!validator.matches(&Principal::new("anyone")));
        assert_eq!(validator.principal(), None);
    }

    #[test]
    fn assigned_validator_matches_only_its_principal() {
        let validator = Validator::from(Some(Principal::new("carol")));
        assert!(validator.matches(&Principal::new("carol")));
        assert!(!validator.matches(&Principal::new("dave")));
    }

    #[test]
    fn zero_stage_commitment_is_never_all_completed() {
        let commitment = Commitment::open(
            "run",
            "",
            None,
            BlockHeight::new(1),
            Privacy::Public,
            Validator::Unassigned,
            0,
        );
        assert!(!commitment.all_stages_completed());
        assert_eq!(commitment.status(), CommitmentStatus::Open);
    }

    #[test]
    fn deadline_passed_ignores_missing_deadline() {
        let mut commitment = Commitment::open(
            "run",
            "",
            None,
            BlockHeight::new(1),
            Privacy::Public,
            Validator::Unassigned,
            0,
        );
        assert!(!commitment.deadline_passed(BlockHeight::new(u64::MAX)));

        commitment.deadline = Some(BlockHeight::new(5));
        assert!(!commitment.deadline_passed(BlockHeight::new(5)));
        assert!(commitment.deadline_passed(BlockHeight::new(6)));
    }

    #[test]
    fn commitment_serde_keeps_validator_shape() {
        let commitment = Commitment::open(
            "read",
            "twelve books",
            Some(BlockHeight::new(100)),
            BlockHeight::new(1),
            Privacy::Private,
            Validator::Assigned(Principal::new("carol")),
            50,
        );
        let json = serde_json::to_string(&commitment).unwrap();
        let restored: Commitment = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, commitment);
    }
}
