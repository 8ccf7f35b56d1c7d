use pledge_auth::{can_read, parse_privacy, require_owner, require_read, require_validator};
use pledge_escrow::{InMemoryReserve, StakeEscrow, StakeRelease, StakeReserve};
use pledge_store::{CommitmentTable, StageTable};
use pledge_types::{
    CallContext, Commitment, CommitmentId, CommitmentKey, CommitmentStatus, PledgeError,
    PledgeResult, Principal, Stage, StageId, Validator,
};
use tracing::{debug, info, warn};

use crate::audit::{AuditAction, AuditRecord, AuditTrail};
use crate::config::LedgerConfig;
use crate::lifecycle::{CompletionOutcome, Lifecycle};
use crate::request::NewCommitment;

/// The commitment ledger.
///
/// Owns both record tables, so every stage mutation and the parent counters
/// it mirrors change together. Each call runs to completion before the next
/// one; the environment serializes invocations.
pub struct CommitmentLedger<R = InMemoryReserve> {
    config: LedgerConfig,
    commitments: CommitmentTable,
    stages: StageTable,
    reserve: R,
    audit: AuditTrail,
}

impl<R: StakeReserve> CommitmentLedger<R> {
    pub fn new(reserve: R) -> Self {
        Self::with_config(LedgerConfig::default(), reserve)
    }

    pub fn with_config(config: LedgerConfig, reserve: R) -> Self {
        Self {
            config,
            commitments: CommitmentTable::new(),
            stages: StageTable::new(),
            reserve,
            audit: AuditTrail::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn reserve(&self) -> &R {
        &self.reserve
    }

    pub fn reserve_mut(&mut self) -> &mut R {
        &mut self.reserve
    }

    pub fn audit_trail(&self) -> &[AuditRecord] {
        self.audit.records()
    }

    pub fn verify_audit_chain(&self) -> bool {
        self.audit.verify()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Read one commitment through the privacy gate.
    pub fn get_commitment(
        &self,
        caller: &Principal,
        owner: &Principal,
        id: CommitmentId,
    ) -> PledgeResult<Commitment> {
        let key = CommitmentKey::new(owner.clone(), id);
        let record = self.commitments.fetch(&key)?;
        if let Err(err) = require_read(caller, owner, record) {
            warn!(caller = %caller, commitment = %key, "read denied");
            return Err(err);
        }
        debug!(caller = %caller, commitment = %key, "commitment read");
        Ok(record.clone())
    }

    /// Read one stage; access is decided by the parent commitment.
    pub fn get_stage(
        &self,
        caller: &Principal,
        owner: &Principal,
        commitment_id: CommitmentId,
        stage_id: StageId,
    ) -> PledgeResult<Stage> {
        let key = CommitmentKey::new(owner.clone(), commitment_id);
        let parent = self.commitments.fetch(&key)?;
        let stage = self.stages.fetch(&key.stage(stage_id))?;
        if let Err(err) = require_read(caller, owner, parent) {
            warn!(caller = %caller, commitment = %key, stage_id = %stage_id, "read denied");
            return Err(err);
        }
        Ok(stage.clone())
    }

    pub fn status(
        &self,
        caller: &Principal,
        owner: &Principal,
        id: CommitmentId,
    ) -> PledgeResult<CommitmentStatus> {
        self.get_commitment(caller, owner, id).map(|c| c.status())
    }

    /// Commitments of `owner` that `caller` may read, in id order.
    pub fn list_commitments(
        &self,
        caller: &Principal,
        owner: &Principal,
    ) -> Vec<(CommitmentId, Commitment)> {
        self.commitments
            .owned_by(owner)
            .filter(|(_, record)| can_read(caller, owner, record))
            .map(|(id, record)| (id, record.clone()))
            .collect()
    }

    /// How many commitments `owner` has ever created.
    pub fn commitment_count(&self, owner: &Principal) -> u64 {
        self.commitments.count(owner)
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Create a commitment owned by the caller and return its new id.
    ///
    /// A non-zero stake is moved into the reserve before the record is
    /// written; if the reserve refuses, nothing is created.
    pub fn create_commitment(
        &mut self,
        ctx: &CallContext,
        request: NewCommitment,
    ) -> PledgeResult<CommitmentId> {
        let privacy = parse_privacy(request.privacy)?;
        if let Some(deadline) = request.deadline {
            if ctx.height.is_past(deadline) {
                return Err(PledgeError::InvalidDeadline);
            }
        }
        self.config.check_text(&request.title, &request.description)?;

        let owner = &ctx.caller;
        let next_key = CommitmentKey::new(owner.clone(), self.commitments.next_id(owner));
        if self.commitments.contains(&next_key) {
            return Err(PledgeError::CommitmentAlreadyExists);
        }

        StakeEscrow::lock(&mut self.reserve, ctx, request.stake_amount)?;

        let record = Commitment::open(
            request.title,
            request.description,
            request.deadline,
            ctx.height,
            privacy,
            Validator::from(request.validator),
            request.stake_amount,
        );
        let id = self.commitments.insert(owner, record)?;

        info!(
            owner = %owner,
            commitment_id = %id,
            stake = request.stake_amount,
            privacy = ?privacy,
            "commitment created"
        );
        self.record(ctx, AuditAction::CommitmentCreated, owner, id, None);
        Ok(id)
    }

    /// Append a stage to an open commitment of `owner`.
    pub fn add_stage(
        &mut self,
        ctx: &CallContext,
        owner: &Principal,
        commitment_id: CommitmentId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> PledgeResult<StageId> {
        self.guard_owner(ctx, owner)?;
        let key = CommitmentKey::new(owner.clone(), commitment_id);
        let parent = self.commitments.fetch(&key)?;
        if parent.is_complete() {
            return Err(PledgeError::CommitmentCompleted);
        }
        if parent.deadline_passed(ctx.height) {
            return Err(PledgeError::DeadlinePassed);
        }

        let stage = Stage::pending(title, description);
        self.config.check_text(&stage.title, &stage.description)?;

        let stage_id = self.stages.insert(&key, stage)?;
        let total = Lifecycle::register_stage(&mut self.commitments, &key)?;

        info!(commitment = %key, stage_id = %stage_id, total_stages = total, "stage added");
        self.record(ctx, AuditAction::StageAdded, owner, commitment_id, Some(stage_id));
        Ok(stage_id)
    }

    /// Mark a stage done and advance the parent's lifecycle.
    pub fn complete_stage(
        &mut self,
        ctx: &CallContext,
        owner: &Principal,
        commitment_id: CommitmentId,
        stage_id: StageId,
    ) -> PledgeResult<CompletionOutcome> {
        self.guard_owner(ctx, owner)?;
        let key = CommitmentKey::new(owner.clone(), commitment_id);
        let stage_key = key.stage(stage_id);
        let parent = self.commitments.fetch(&key)?;
        let stage = self.stages.fetch(&stage_key)?;
        if stage.completed {
            return Err(PledgeError::StageAlreadyCompleted);
        }
        if parent.deadline_passed(ctx.height) {
            return Err(PledgeError::DeadlinePassed);
        }

        self.stages.mark_completed(&stage_key, ctx.height)?;
        let outcome = Lifecycle::record_completion(&mut self.commitments, &key, ctx.height)?;

        info!(
            commitment = %key,
            stage_id = %stage_id,
            completed_stages = outcome.completed_stages,
            total_stages = outcome.total_stages,
            "stage completed"
        );
        self.record(ctx, AuditAction::StageCompleted, owner, commitment_id, Some(stage_id));
        if outcome.transitioned {
            self.record(ctx, AuditAction::CommitmentCompleted, owner, commitment_id, None);
        }
        Ok(outcome)
    }

    /// Validator sign-off on an already completed stage.
    ///
    /// Validating a stage that already carries the sign-off is a no-op.
    pub fn validate_stage(
        &mut self,
        ctx: &CallContext,
        owner: &Principal,
        commitment_id: CommitmentId,
        stage_id: StageId,
    ) -> PledgeResult<()> {
        let key = CommitmentKey::new(owner.clone(), commitment_id);
        let stage_key = key.stage(stage_id);
        let parent = self.commitments.fetch(&key)?;
        if let Err(err) = require_validator(&ctx.caller, parent) {
            warn!(caller = %ctx.caller, commitment = %key, "validation by non-validator");
            return Err(err);
        }
        let stage = self.stages.fetch(&stage_key)?;
        if !stage.completed {
            return Err(PledgeError::ValidationRequired);
        }

        if self.stages.mark_validated(&stage_key, &ctx.caller)? {
            info!(commitment = %key, stage_id = %stage_id, validator = %ctx.caller, "stage validated");
            self.record(ctx, AuditAction::StageValidated, owner, commitment_id, Some(stage_id));
        } else {
            debug!(commitment = %key, stage_id = %stage_id, "stage already validated");
        }
        Ok(())
    }

    /// Change the privacy tier. Every other field is kept as is.
    pub fn set_privacy(
        &mut self,
        ctx: &CallContext,
        owner: &Principal,
        id: CommitmentId,
        privacy_code: u8,
    ) -> PledgeResult<()> {
        self.guard_owner(ctx, owner)?;
        let privacy = parse_privacy(privacy_code)?;
        let key = CommitmentKey::new(owner.clone(), id);
        self.commitments.set_privacy(&key, privacy)?;

        info!(commitment = %key, privacy = ?privacy, "privacy changed");
        self.record(ctx, AuditAction::PrivacyChanged, owner, id, None);
        Ok(())
    }

    /// Replace (or clear) the validator until the first stage is validated.
    pub fn set_validator(
        &mut self,
        ctx: &CallContext,
        owner: &Principal,
        id: CommitmentId,
        validator: Option<Principal>,
    ) -> PledgeResult<()> {
        self.guard_owner(ctx, owner)?;
        let key = CommitmentKey::new(owner.clone(), id);
        self.commitments.fetch(&key)?;
        if self.stages.validation_started(&key) {
            warn!(commitment = %key, "validator change after validation began");
            return Err(PledgeError::ValidatorLocked);
        }

        let validator = Validator::from(validator);
        info!(commitment = %key, validator = ?validator.principal(), "validator changed");
        self.commitments.set_validator(&key, validator)?;
        self.record(ctx, AuditAction::ValidatorChanged, owner, id, None);
        Ok(())
    }

    /// Release the stake of a completed commitment to its owner, once.
    pub fn claim_stake(
        &mut self,
        ctx: &CallContext,
        owner: &Principal,
        id: CommitmentId,
    ) -> PledgeResult<StakeRelease> {
        self.guard_owner(ctx, owner)?;
        let release = StakeEscrow::claim(&mut self.commitments, &mut self.reserve, ctx, owner, id)?;
        self.record(ctx, AuditAction::StakeClaimed, owner, id, None);
        Ok(release)
    }

    fn guard_owner(&self, ctx: &CallContext, owner: &Principal) -> PledgeResult<()> {
        require_owner(&ctx.caller, owner).inspect_err(|_| {
            warn!(caller = %ctx.caller, owner = %owner, "mutation by non-owner");
        })
    }

    fn record(
        &mut self,
        ctx: &CallContext,
        action: AuditAction,
        owner: &Principal,
        commitment_id: CommitmentId,
        stage_id: Option<StageId>,
    ) {
        if !self.config.audit_trail {
            return;
        }
        match self.audit.append(
            ctx.height,
            &ctx.caller,
            action,
            owner,
            commitment_id,
            stage_id,
        ) {
            Ok(entry) => {
                debug!(sequence = entry.sequence, action = ?entry.action, hash = %entry.hash, "audit appended");
            }
            Err(err) => {
                warn!(error = %err, action = ?action, commitment_id = %commitment_id, "audit append failed");
            }
        }
    }
}

impl Default for CommitmentLedger<InMemoryReserve> {
    fn default() -> Self {
        Self::new(InMemoryReserve::new())
    }
}
