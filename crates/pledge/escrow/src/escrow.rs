use pledge_auth::require_owner;
use pledge_store::CommitmentTable;
use pledge_types::{
    CallContext, CommitmentId, CommitmentKey, PledgeError, PledgeResult, Principal,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::reserve::{StakeReserve, TransferReceipt};

/// Outcome of a successful claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRelease {
    pub owner: Principal,
    pub commitment_id: CommitmentId,
    pub amount: u64,
    pub receipt: TransferReceipt,
}

/// Stake lock and release rules.
///
/// The escrow owns no state of its own: the stake lives on the commitment
/// record and the tokens live in the reserve.
#[derive(Debug, Clone, Copy, Default)]
pub struct StakeEscrow;

impl StakeEscrow {
    /// Move `amount` from `owner` into the reserve ahead of creating a
    /// commitment. A zero stake moves nothing.
    pub fn lock<R: StakeReserve + ?Sized>(
        reserve: &mut R,
        ctx: &CallContext,
        amount: u64,
    ) -> PledgeResult<Option<TransferReceipt>> {
        if amount == 0 {
            return Ok(None);
        }
        let receipt = reserve.deposit(&ctx.caller, amount, ctx.height)?;
        info!(owner = %ctx.caller, amount, "stake locked");
        Ok(Some(receipt))
    }

    /// Release the whole stake of a completed commitment back to its owner.
    ///
    /// The reserve is asked to move the tokens first; the stake is only
    /// zeroed once that succeeded, so a refused transfer leaves the record
    /// untouched.
    pub fn claim<R: StakeReserve + ?Sized>(
        commitments: &mut CommitmentTable,
        reserve: &mut R,
        ctx: &CallContext,
        owner: &Principal,
        commitment_id: CommitmentId,
    ) -> PledgeResult<StakeRelease> {
        require_owner(&ctx.caller, owner)?;
        let key = CommitmentKey::new(owner.clone(), commitment_id);
        let record = commitments.fetch(&key)?;
        if !record.is_complete() {
            warn!(commitment = %key, "stake claim before completion");
            return Err(PledgeError::CommitmentNotCompleted);
        }
        let amount = record.stake_amount;
        if amount == 0 {
            return Err(PledgeError::InsufficientStake);
        }

        let receipt = reserve.release(owner, amount, ctx.height)?;
        commitments.take_stake(&key)?;
        info!(commitment = %key, amount, "stake released");

        Ok(StakeRelease {
            owner: owner.clone(),
            commitment_id,
            amount,
            receipt,
        })
    }
}
