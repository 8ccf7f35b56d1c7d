//! Pledge Auth - who may read or change a commitment.
//!
//! The predicates here are pure. They answer with `bool` and never fail;
//! the `require_*` helpers turn a `false` into the error kind callers see.

#![deny(unsafe_code)]

use pledge_types::{Commitment, PledgeError, PledgeResult, Principal, Privacy};

/// True iff `caller` is `owner`.
pub fn is_owner(caller: &Principal, owner: &Principal) -> bool {
    caller == owner
}

/// True iff the commitment has a validator and it is `caller`.
pub fn is_validator(caller: &Principal, commitment: &Commitment) -> bool {
    commitment.validator.matches(caller)
}

/// Read gate for a commitment and, through it, all of its stages.
///
/// Public records are readable by anyone. Private records only by the owner
/// or the assigned validator; an unassigned validator matches nobody.
pub fn can_read(caller: &Principal, owner: &Principal, commitment: &Commitment) -> bool {
    commitment.privacy == Privacy::Public
        || is_owner(caller, owner)
        || is_validator(caller, commitment)
}

/// True iff `code` names a known privacy tier.
pub fn valid_privacy(code: u8) -> bool {
    Privacy::from_code(code).is_some()
}

pub fn require_owner(caller: &Principal, owner: &Principal) -> PledgeResult<()> {
    if is_owner(caller, owner) {
        Ok(())
    } else {
        Err(PledgeError::NotAuthorized)
    }
}

pub fn require_validator(caller: &Principal, commitment: &Commitment) -> PledgeResult<()> {
    if is_validator(caller, commitment) {
        Ok(())
    } else {
        Err(PledgeError::NotValidator)
    }
}

pub fn require_read(caller: &Principal, owner: &Principal, commitment: &Commitment) -> PledgeResult<()> {
    if can_read(caller, owner, commitment) {
        Ok(())
    } else {
        Err(PledgeError::NotAuthorized)
    }
}

/// Parse a boundary privacy code.
pub fn parse_privacy(code: u8) -> PledgeResult<Privacy> {
    Privacy::from_code(code).ok_or(PledgeError::InvalidPrivacy)
}
