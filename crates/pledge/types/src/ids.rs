use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated principal supplied by the execution environment.
///
/// The core trusts this value without re-verification.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic counter standing in for block height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    pub const fn new(height: u64) -> Self {
        Self(height)
    }

    /// True once this height has moved beyond `deadline`.
    pub fn is_past(self, deadline: BlockHeight) -> bool {
        self > deadline
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-owner commitment id. Allocation starts at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitmentId(pub u64);

impl CommitmentId {
    pub const FIRST: CommitmentId = CommitmentId(1);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for CommitmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-commitment stage id. Allocation starts at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StageId(pub u64);

impl StageId {
    pub const FIRST: StageId = StageId(1);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite key of the commitment table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitmentKey {
    pub owner: Principal,
    pub id: CommitmentId,
}

impl CommitmentKey {
    pub fn new(owner: Principal, id: CommitmentId) -> Self {
        Self { owner, id }
    }

    pub fn stage(&self, stage: StageId) -> StageKey {
        StageKey {
            commitment: self.clone(),
            stage,
        }
    }
}

impl fmt::Display for CommitmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.id)
    }
}

/// Composite key of the stage table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StageKey {
    pub commitment: CommitmentKey,
    pub stage: StageId,
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.commitment, self.stage)
    }
}

/// Who is invoking an operation and at which height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: Principal,
    pub height: BlockHeight,
}

impl CallContext {
    pub fn new(caller: Principal, height: BlockHeight) -> Self {
        Self { caller, height }
    }
}
