//! Pledge Escrow - stake held against a commitment.
//!
//! The stake recorded on a commitment is claimable exactly once, only by the
//! owner and only after the commitment is complete. Token movement itself is
//! delegated to a [`StakeReserve`] supplied by the environment.

#![deny(unsafe_code)]

mod escrow;
mod reserve;

pub use escrow::{StakeEscrow, StakeRelease};
pub use reserve::{InMemoryReserve, StakeReserve, TransferDirection, TransferReceipt};
