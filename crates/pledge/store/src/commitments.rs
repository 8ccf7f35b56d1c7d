use std::collections::{BTreeMap, HashMap};

use pledge_types::{
    BlockHeight, Commitment, CommitmentId, CommitmentKey, PledgeError, PledgeResult, Principal,
    Privacy, Validator,
};
use tracing::debug;

/// Commitment records keyed by `(owner, id)`.
#[derive(Debug, Clone, Default)]
pub struct CommitmentTable {
    records: BTreeMap<CommitmentKey, Commitment>,
    next_ids: HashMap<Principal, CommitmentId>,
}

impl CommitmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next commitment of `owner` will receive.
    pub fn next_id(&self, owner: &Principal) -> CommitmentId {
        self.next_ids
            .get(owner)
            .copied()
            .unwrap_or(CommitmentId::FIRST)
    }

    /// Number of commitments `owner` has ever created.
    pub fn count(&self, owner: &Principal) -> u64 {
        self.next_id(owner).0 - CommitmentId::FIRST.0
    }

    /// Store `record` under the next id of `owner` and advance the counter.
    pub fn insert(&mut self, owner: &Principal, record: Commitment) -> PledgeResult<CommitmentId> {
        let id = self.next_id(owner);
        let key = CommitmentKey::new(owner.clone(), id);
        if self.records.contains_key(&key) {
            return Err(PledgeError::CommitmentAlreadyExists);
        }

        self.records.insert(key, record);
        self.next_ids.insert(owner.clone(), id.next());
        debug!(owner = %owner, commitment_id = %id, "commitment record inserted");
        Ok(id)
    }

    /// Look up a record; absence is `NoSuchCommitment`.
    pub fn fetch(&self, key: &CommitmentKey) -> PledgeResult<&Commitment> {
        self.records.get(key).ok_or(PledgeError::NoSuchCommitment)
    }

    pub fn contains(&self, key: &CommitmentKey) -> bool {
        self.records.contains_key(key)
    }

    /// Records of one owner in id order.
    pub fn owned_by<'a>(
        &'a self,
        owner: &Principal,
    ) -> impl Iterator<Item = (CommitmentId, &'a Commitment)> + 'a {
        let start = CommitmentKey::new(owner.clone(), CommitmentId(0));
        let end = CommitmentKey::new(owner.clone(), CommitmentId(u64::MAX));
        self.records
            .range(start..=end)
            .map(|(key, record)| (key.id, record))
    }

    /// Replace the privacy field only.
    pub fn set_privacy(&mut self, key: &CommitmentKey, privacy: Privacy) -> PledgeResult<()> {
        self.record_mut(key)?.privacy = privacy;
        Ok(())
    }

    /// Replace the validator field only.
    pub fn set_validator(&mut self, key: &CommitmentKey, validator: Validator) -> PledgeResult<()> {
        self.record_mut(key)?.validator = validator;
        Ok(())
    }

    /// Bump `total-stages`; returns the new total.
    pub fn increment_stage_count(&mut self, key: &CommitmentKey) -> PledgeResult<u64> {
        let record = self.record_mut(key)?;
        record.total_stages += 1;
        Ok(record.total_stages)
    }

    /// Bump `completed-stages`; returns the new count.
    ///
    /// Refuses to move the count beyond `total-stages`.
    pub fn increment_completed_count(&mut self, key: &CommitmentKey) -> PledgeResult<u64> {
        let record = self.record_mut(key)?;
        if record.completed_stages >= record.total_stages {
            return Err(PledgeError::CommitmentCompleted);
        }
        record.completed_stages += 1;
        Ok(record.completed_stages)
    }

    /// Set `completed-at`. Only ever succeeds once per record.
    pub fn mark_completed(&mut self, key: &CommitmentKey, height: BlockHeight) -> PledgeResult<()> {
        let record = self.record_mut(key)?;
        if record.completed_at.is_some() {
            return Err(PledgeError::CommitmentCompleted);
        }
        record.completed_at = Some(height);
        Ok(())
    }

    /// Zero the stake and hand back what was there.
    pub fn take_stake(&mut self, key: &CommitmentKey) -> PledgeResult<u64> {
        let record = self.record_mut(key)?;
        if record.stake_amount == 0 {
            return Err(PledgeError::InsufficientStake);
        }
        Ok(std::mem::take(&mut record.stake_amount))
    }

    fn record_mut(&mut self, key: &CommitmentKey) -> PledgeResult<&mut Commitment> {
        self.records.get_mut(key).ok_or(PledgeError::NoSuchCommitment)
    }
}
