use pledge_types::{BlockHeight, Principal, Privacy};
use serde::{Deserialize, Serialize};

/// Arguments of `create_commitment`.
///
/// `privacy` is the raw boundary code and is checked by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCommitment {
    pub title: String,
    pub description: String,
    pub deadline: Option<BlockHeight>,
    pub privacy: u8,
    pub validator: Option<Principal>,
    pub stake_amount: u64,
}

impl NewCommitment {
    /// Public, unvalidated, unstaked commitment without a deadline.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            deadline: None,
            privacy: Privacy::Public.code(),
            validator: None,
            stake_amount: 0,
        }
    }

    pub fn with_deadline(mut self, deadline: BlockHeight) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_privacy(mut self, privacy: Privacy) -> Self {
        self.privacy = privacy.code();
        self
    }

    pub fn with_privacy_code(mut self, code: u8) -> Self {
        self.privacy = code;
        self
    }

    pub fn with_validator(mut self, validator: Principal) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_stake(mut self, amount: u64) -> Self {
        self.stake_amount = amount;
        self
    }
}
