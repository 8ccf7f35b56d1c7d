//! Shared fixtures for the pledge conformance tests.

#![deny(unsafe_code)]

use pledge_ledger::{
    BlockHeight, CallContext, Commitment, CommitmentId, CommitmentLedger, InMemoryReserve,
    LedgerConfig, Principal, Stage, StageId, TransferError,
};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; later calls are no-ops.
///
/// Honours `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn owner() -> Principal {
    Principal::new("SP-owner")
}

pub fn validator() -> Principal {
    Principal::new("SP-validator")
}

pub fn stranger() -> Principal {
    Principal::new("SP-stranger")
}

pub fn at(caller: &Principal, height: u64) -> CallContext {
    CallContext::new(caller.clone(), BlockHeight::new(height))
}

/// Ledger whose reserve already holds `balance` for each listed principal.
pub fn funded_ledger(
    config: LedgerConfig,
    balances: &[(Principal, u64)],
) -> Result<CommitmentLedger, TransferError> {
    let mut reserve = InMemoryReserve::new();
    for (principal, balance) in balances {
        reserve.fund(principal, *balance)?;
    }
    Ok(CommitmentLedger::with_config(config, reserve))
}

/// Every commitment of `owner` with all of its stages, read as the owner.
pub fn snapshot(
    ledger: &CommitmentLedger,
    owner: &Principal,
) -> Vec<(CommitmentId, Commitment, Vec<Stage>)> {
    ledger
        .list_commitments(owner, owner)
        .into_iter()
        .map(|(id, commitment)| {
            let stages = (1..=commitment.total_stages)
                .filter_map(|stage| ledger.get_stage(owner, owner, id, StageId(stage)).ok())
                .collect();
            (id, commitment, stages)
        })
        .collect()
}
