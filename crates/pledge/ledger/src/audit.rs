//! Append-only, hash-linked record of successful mutations.

use pledge_types::{BlockHeight, CommitmentId, Principal, StageId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    CommitmentCreated,
    StageAdded,
    StageCompleted,
    CommitmentCompleted,
    StageValidated,
    PrivacyChanged,
    ValidatorChanged,
    StakeClaimed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub sequence: u64,
    pub height: BlockHeight,
    pub actor: Principal,
    pub action: AuditAction,
    pub owner: Principal,
    pub commitment_id: CommitmentId,
    pub stage_id: Option<StageId>,
    pub previous_hash: Option<String>,
    pub hash: String,
}

#[derive(Clone, Debug, Default)]
pub struct AuditTrail {
    records: Vec<AuditRecord>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    pub fn latest_hash(&self) -> Option<&str> {
        self.records.last().map(|r| r.hash.as_str())
    }

    pub(crate) fn append(
        &mut self,
        height: BlockHeight,
        actor: &Principal,
        action: AuditAction,
        owner: &Principal,
        commitment_id: CommitmentId,
        stage_id: Option<StageId>,
    ) -> Result<&AuditRecord, serde_json::Error> {
        let previous_hash = self.latest_hash().map(str::to_string);
        let mut record = AuditRecord {
            sequence: self.records.len() as u64 + 1,
            height,
            actor: actor.clone(),
            action,
            owner: owner.clone(),
            commitment_id,
            stage_id,
            previous_hash,
            hash: String::new(),
        };
        record.hash = compute_hash(&record)?;
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Recompute every hash and link. False on the first mismatch.
    pub fn verify(&self) -> bool {
        let mut previous: Option<&str> = None;
        for record in &self.records {
            if record.previous_hash.as_deref() != previous {
                return false;
            }
            match compute_hash(record) {
                Ok(hash) if hash == record.hash => {}
                _ => return false,
            }
            previous = Some(&record.hash);
        }
        true
    }
}

fn compute_hash(record: &AuditRecord) -> Result<String, serde_json::Error> {
    let canonical = serde_json::json!({
        "previous_hash": record.previous_hash,
        "sequence": record.sequence,
        "height": record.height,
        "actor": record.actor,
        "action": record.action,
        "owner": record.owner,
        "commitment_id": record.commitment_id,
        "stage_id": record.stage_id,
    });
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal::new("alice")
    }

    fn trail_of(n: u64) -> AuditTrail {
        let mut trail = AuditTrail::new();
        for i in 0..n {
            trail
                .append(
                    BlockHeight::new(i + 1),
                    &alice(),
                    AuditAction::StageAdded,
                    &alice(),
                    CommitmentId(1),
                    Some(StageId(i + 1)),
                )
                .unwrap();
        }
        trail
    }

    #[test]
    fn records_are_linked() {
        let trail = trail_of(3);
        let records = trail.records();
        assert_eq!(records[0].previous_hash, None);
        assert_eq!(records[1].previous_hash.as_deref(), Some(records[0].hash.as_str()));
        assert_eq!(records[2].sequence, 3);
        assert!(trail.verify());
    }

    #[test]
    fn tampering_breaks_verification() {
        let mut trail = trail_of(3);
        trail.records[1].actor = Principal::new("mallory");
        assert!(!trail.verify());
    }

    #[test]
    fn empty_trail_verifies() {
        assert!(AuditTrail::new().verify());
        assert_eq!(AuditTrail::new().latest_hash(), None);
    }

    #[test]
    fn hash_covers_the_serialized_record() {
        let trail = trail_of(1);
        let record = &trail.records()[0];
        let canonical = serde_json::json!({
            "previous_hash": None::<String>,
            "sequence": 1,
            "height": record.height,
            "actor": "alice",
            "action": "StageAdded",
            "owner": "alice",
            "commitment_id": record.commitment_id,
            "stage_id": record.stage_id,
        });
        let bytes = serde_json::to_vec(&canonical).unwrap();
        assert_eq!(record.hash, blake3::hash(&bytes).to_hex().to_string());
        assert_eq!(record.hash.len(), 64);
    }
}
