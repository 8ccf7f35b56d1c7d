//! Pledge Types - the record model shared by every pledge crate.
//!
//! A commitment is a goal declared by an owner and keyed by
//! `(owner, commitment-id)`. It is broken down into ordered stages keyed by
//! `(owner, commitment-id, stage-id)`. Commitments may carry a stake held in
//! escrow until every stage is done, and may name a validator who confirms
//! completed stages.

#![deny(unsafe_code)]

mod error;
mod ids;
mod model;

pub use error::{PledgeError, PledgeResult, TransferError};
pub use ids::{BlockHeight, CallContext, CommitmentId, CommitmentKey, Principal, StageId, StageKey};
pub use model::{Commitment, CommitmentStatus, Privacy, Stage, Validator};
