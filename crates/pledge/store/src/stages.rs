use std::collections::HashMap;

use pledge_types::{
    BlockHeight, CommitmentKey, PledgeError, PledgeResult, Principal, Stage, StageId, StageKey,
};
use tracing::debug;

/// Per-commitment bookkeeping kept next to the stage records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCursor {
    /// Id the next stage of this commitment will receive.
    pub next_id: StageId,
    /// How many stages carry a `validated-by`.
    pub validated: u64,
}

impl Default for StageCursor {
    fn default() -> Self {
        Self {
            next_id: StageId::FIRST,
            validated: 0,
        }
    }
}

/// Stage records keyed by `(owner, commitment-id, stage-id)`.
#[derive(Debug, Clone, Default)]
pub struct StageTable {
    records: HashMap<StageKey, Stage>,
    cursors: HashMap<CommitmentKey, StageCursor>,
}

impl StageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self, parent: &CommitmentKey) -> StageCursor {
        self.cursors.get(parent).copied().unwrap_or_default()
    }

    /// Store `stage` under the next stage id of `parent`.
    pub fn insert(&mut self, parent: &CommitmentKey, stage: Stage) -> PledgeResult<StageId> {
        let id = self.cursor(parent).next_id;
        let key = parent.stage(id);
        if self.records.contains_key(&key) {
            return Err(PledgeError::StageAlreadyExists);
        }

        self.records.insert(key, stage);
        self.cursors.entry(parent.clone()).or_default().next_id = id.next();
        debug!(commitment = %parent, stage_id = %id, "stage record inserted");
        Ok(id)
    }

    /// Look up a record; absence is `NoSuchStage`.
    pub fn fetch(&self, key: &StageKey) -> PledgeResult<&Stage> {
        self.records.get(key).ok_or(PledgeError::NoSuchStage)
    }

    /// Flip `completed` to true and stamp `completed-at`.
    pub fn mark_completed(&mut self, key: &StageKey, height: BlockHeight) -> PledgeResult<()> {
        let stage = self.records.get_mut(key).ok_or(PledgeError::NoSuchStage)?;
        if stage.completed {
            return Err(PledgeError::StageAlreadyCompleted);
        }
        stage.completed = true;
        stage.completed_at = Some(height);
        Ok(())
    }

    /// Record the validator's sign-off. Returns `false` if it was already there.
    pub fn mark_validated(&mut self, key: &StageKey, validator: &Principal) -> PledgeResult<bool> {
        let stage = self.records.get_mut(key).ok_or(PledgeError::NoSuchStage)?;
        if !stage.completed {
            return Err(PledgeError::ValidationRequired);
        }
        if stage.validated_by.is_some() {
            return Ok(false);
        }
        stage.validated_by = Some(validator.clone());
        self.cursors.entry(key.commitment.clone()).or_default().validated += 1;
        Ok(true)
    }

    /// True once any stage of `parent` has been validated.
    pub fn validation_started(&self, parent: &CommitmentKey) -> bool {
        self.cursor(parent).validated > 0
    }
}
