use pledge_store::CommitmentTable;
use pledge_types::{BlockHeight, CommitmentKey, CommitmentStatus, PledgeResult};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Where a commitment stands after one of its stages completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub completed_stages: u64,
    pub total_stages: u64,
    pub status: CommitmentStatus,
    /// True only for the call that moved the commitment to `Complete`.
    pub transitioned: bool,
}

/// Open -> Complete state machine driven by stage completion.
///
/// Completion is tracked through the running `completed-stages` counter on
/// the parent, so each stage completion costs O(1).
pub(crate) struct Lifecycle;

impl Lifecycle {
    /// Mirror a newly added stage on its parent.
    pub(crate) fn register_stage(
        commitments: &mut CommitmentTable,
        key: &CommitmentKey,
    ) -> PledgeResult<u64> {
        commitments.increment_stage_count(key)
    }

    /// Mirror a newly completed stage on its parent and fire the transition
    /// when it was the last one.
    pub(crate) fn record_completion(
        commitments: &mut CommitmentTable,
        key: &CommitmentKey,
        height: BlockHeight,
    ) -> PledgeResult<CompletionOutcome> {
        let completed_stages = commitments.increment_completed_count(key)?;
        let record = commitments.fetch(key)?;
        let total_stages = record.total_stages;

        let transitioned = record.all_stages_completed();
        if transitioned {
            commitments.mark_completed(key, height)?;
            info!(commitment = %key, height = %height, total_stages, "commitment completed");
        }

        Ok(CompletionOutcome {
            completed_stages,
            total_stages,
            status: commitments.fetch(key)?.status(),
            transitioned,
        })
    }
}
