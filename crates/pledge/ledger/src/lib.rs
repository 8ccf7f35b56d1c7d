//! Pledge Ledger - the authorization-aware commitment record core.
//!
//! # Architecture
//!
//! ```text
//! caller ──> auth predicates ──> commitment table ──┐
//!                    │                               ├──> lifecycle ──> escrow
//!                    └─────────> stage table ────────┘
//! ```
//!
//! Every mutating call checks all of its preconditions before the first
//! write, so a failed call leaves no trace. Stage completion bumps the
//! parent's running counter and flips the commitment to complete when the
//! last stage is done; from then on the owner may claim the stake once.
//!
//! # Key Components
//!
//! - [`CommitmentLedger`]: query and mutating surface
//! - [`LedgerConfig`]: text bounds and audit switch
//! - [`AuditTrail`]: hash-linked record of successful mutations

#![deny(unsafe_code)]

mod audit;
mod config;
mod ledger;
mod lifecycle;
mod request;

pub use audit::{AuditAction, AuditRecord, AuditTrail};
pub use config::LedgerConfig;
pub use ledger::CommitmentLedger;
pub use lifecycle::CompletionOutcome;
pub use request::NewCommitment;

pub use pledge_escrow::{InMemoryReserve, StakeRelease, StakeReserve, TransferReceipt};
pub use pledge_types::{
    BlockHeight, CallContext, Commitment, CommitmentId, CommitmentStatus, PledgeError,
    PledgeResult, Principal, Privacy, Stage, StageId, TransferError, Validator,
};
