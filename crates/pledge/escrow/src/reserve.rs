//! Value-transfer capability seam and an in-memory reference reserve.

use std::collections::HashMap;

use pledge_types::{BlockHeight, Principal, TransferError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    /// Owner -> reserve.
    Deposit,
    /// Reserve -> owner.
    Release,
}

/// Proof that the reserve moved tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub direction: TransferDirection,
    pub principal: Principal,
    pub amount: u64,
    pub height: BlockHeight,
    pub receipt_id: String,
}

/// Moves tokens into and out of the reserve held for staked commitments.
///
/// Either call moves the full amount or fails without moving anything.
pub trait StakeReserve {
    fn deposit(
        &mut self,
        from: &Principal,
        amount: u64,
        height: BlockHeight,
    ) -> Result<TransferReceipt, TransferError>;

    fn release(
        &mut self,
        to: &Principal,
        amount: u64,
        height: BlockHeight,
    ) -> Result<TransferReceipt, TransferError>;
}

/// Deterministic reserve with per-principal balances.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReserve {
    balances: HashMap<Principal, u64>,
    held: u64,
    receipts: Vec<TransferReceipt>,
}

impl InMemoryReserve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `principal` with spendable tokens.
    pub fn fund(&mut self, principal: &Principal, amount: u64) -> Result<(), TransferError> {
        let balance = self
            .balance_of(principal)
            .checked_add(amount)
            .ok_or(TransferError::Overflow { amount })?;
        self.balances.insert(principal.clone(), balance);
        Ok(())
    }

    pub fn balance_of(&self, principal: &Principal) -> u64 {
        self.balances.get(principal).copied().unwrap_or(0)
    }

    /// Total currently held on behalf of staked commitments.
    pub fn held(&self) -> u64 {
        self.held
    }

    pub fn receipts(&self) -> &[TransferReceipt] {
        &self.receipts
    }

    fn issue(
        &mut self,
        direction: TransferDirection,
        principal: &Principal,
        amount: u64,
        height: BlockHeight,
    ) -> Result<TransferReceipt, TransferError> {
        let sequence = self.receipts.len() as u64 + 1;
        let receipt = TransferReceipt {
            direction,
            principal: principal.clone(),
            amount,
            height,
            receipt_id: receipt_id(direction, principal, amount, height, sequence)?,
        };
        self.receipts.push(receipt.clone());
        debug!(
            direction = ?direction,
            principal = %principal,
            amount,
            receipt_id = %receipt.receipt_id,
            "reserve transfer"
        );
        Ok(receipt)
    }
}

impl StakeReserve for InMemoryReserve {
    fn deposit(
        &mut self,
        from: &Principal,
        amount: u64,
        height: BlockHeight,
    ) -> Result<TransferReceipt, TransferError> {
        if amount == 0 {
            return Err(TransferError::ZeroAmount);
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                required: amount,
                available,
            });
        }

        let held = self
            .held
            .checked_add(amount)
            .ok_or(TransferError::Overflow { amount })?;

        let receipt = self.issue(TransferDirection::Deposit, from, amount, height)?;
        self.balances.insert(from.clone(), available - amount);
        self.held = held;
        Ok(receipt)
    }

    fn release(
        &mut self,
        to: &Principal,
        amount: u64,
        height: BlockHeight,
    ) -> Result<TransferReceipt, TransferError> {
        if amount == 0 {
            return Err(TransferError::ZeroAmount);
        }
        if self.held < amount {
            return Err(TransferError::InsufficientFunds {
                required: amount,
                available: self.held,
            });
        }

        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow { amount })?;

        let receipt = self.issue(TransferDirection::Release, to, amount, height)?;
        self.held -= amount;
        self.balances.insert(to.clone(), balance);
        Ok(receipt)
    }
}

fn receipt_id(
    direction: TransferDirection,
    principal: &Principal,
    amount: u64,
    height: BlockHeight,
    sequence: u64,
) -> Result<String, TransferError> {
    let canonical = serde_json::json!({
        "direction": direction,
        "principal": principal,
        "amount": amount,
        "height": height,
        "sequence": sequence,
    });
    let bytes =
        serde_json::to_vec(&canonical).map_err(|e| TransferError::Rejected(e.to_string()))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}
