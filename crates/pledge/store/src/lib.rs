//! Pledge Store - the two record tables behind the ledger.
//!
//! - [`CommitmentTable`]: one record per `(owner, commitment-id)` plus the
//!   per-owner id counter.
//! - [`StageTable`]: one record per `(owner, commitment-id, stage-id)` plus
//!   the per-commitment stage counter.
//!
//! Both tables only allocate ids themselves; a caller can never pick the id
//! of a new record. The mutators that keep stage counts mirrored on the
//! parent commitment are meant for the ledger's lifecycle code only.

#![deny(unsafe_code)]

mod commitments;
mod stages;

pub use commitments::CommitmentTable;
pub use stages::{StageCursor, StageTable};
