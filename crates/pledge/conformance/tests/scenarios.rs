//! End-to-end scenarios across auth, store, lifecycle and escrow.

use pledge_conformance::{at, funded_ledger, init_tracing, owner, snapshot, stranger, validator};
use pledge_ledger::{
    AuditAction, BlockHeight, CommitmentId, CommitmentStatus, LedgerConfig, NewCommitment,
    PledgeError, Privacy, StageId,
};

#[test]
fn staked_commitment_runs_to_claim() {
    init_tracing();
    let mut ledger = funded_ledger(LedgerConfig::default(), &[(owner(), 100)]).unwrap();

    let id = ledger
        .create_commitment(&at(&owner(), 1), NewCommitment::new("Learn Rust", "").with_stake(100))
        .unwrap();
    assert_eq!(ledger.reserve().held(), 100);

    let s1 = ledger.add_stage(&at(&owner(), 2), &owner(), id, "Book", "read it").unwrap();
    let s2 = ledger.add_stage(&at(&owner(), 2), &owner(), id, "Project", "ship it").unwrap();

    let first = ledger.complete_stage(&at(&owner(), 3), &owner(), id, s1).unwrap();
    assert_eq!(first.status, CommitmentStatus::Open);
    assert_eq!(first.completed_stages, 1);

    let second = ledger.complete_stage(&at(&owner(), 4), &owner(), id, s2).unwrap();
    assert_eq!(second.status, CommitmentStatus::Complete);
    let record = ledger.get_commitment(&owner(), &owner(), id).unwrap();
    assert_eq!(record.completed_stages, 2);
    assert_eq!(record.completed_at, Some(BlockHeight::new(4)));

    let release = ledger.claim_stake(&at(&owner(), 5), &owner(), id).unwrap();
    assert_eq!(release.amount, 100);
    assert_eq!(release.owner, owner());
    assert_eq!(ledger.reserve().balance_of(&owner()), 100);
    assert_eq!(ledger.reserve().held(), 0);

    assert_eq!(
        ledger.claim_stake(&at(&owner(), 6), &owner(), id),
        Err(PledgeError::InsufficientStake)
    );
    let record = ledger.get_commitment(&owner(), &owner(), id).unwrap();
    assert_eq!(record.stake_amount, 0);

    let actions: Vec<AuditAction> = ledger.audit_trail().iter().map(|r| r.action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::CommitmentCreated,
            AuditAction::StageAdded,
            AuditAction::StageAdded,
            AuditAction::StageCompleted,
            AuditAction::StageCompleted,
            AuditAction::CommitmentCompleted,
            AuditAction::StakeClaimed,
        ]
    );
    assert!(ledger.verify_audit_chain());
}

#[test]
fn past_deadline_leaves_no_record() {
    init_tracing();
    let mut ledger = funded_ledger(LedgerConfig::default(), &[]).unwrap();
    let result = ledger.create_commitment(
        &at(&owner(), 50),
        NewCommitment::new("Late", "").with_deadline(BlockHeight::new(10)),
    );
    assert_eq!(result, Err(PledgeError::InvalidDeadline));
    assert_eq!(
        ledger.get_commitment(&owner(), &owner(), CommitmentId(1)),
        Err(PledgeError::NoSuchCommitment)
    );
    assert_eq!(ledger.commitment_count(&owner()), 0);
}

#[test]
fn invalid_privacy_leaves_no_record() {
    let mut ledger = funded_ledger(LedgerConfig::default(), &[]).unwrap();
    for code in [0u8, 3, 255] {
        let result = ledger.create_commitment(
            &at(&owner(), 1),
            NewCommitment::new("x", "").with_privacy_code(code),
        );
        assert_eq!(result, Err(PledgeError::InvalidPrivacy));
    }
    assert!(snapshot(&ledger, &owner()).is_empty());
}

#[test]
fn privacy_gate_covers_commitments_and_stages() {
    let mut ledger = funded_ledger(LedgerConfig::default(), &[]).unwrap();
    let id = ledger
        .create_commitment(
            &at(&owner(), 1),
            NewCommitment::new("Secret", "")
                .with_privacy(Privacy::Private)
                .with_validator(validator()),
        )
        .unwrap();
    let stage = ledger.add_stage(&at(&owner(), 1), &owner(), id, "step", "").unwrap();

    for reader in [owner(), validator()] {
        assert!(ledger.get_commitment(&reader, &owner(), id).is_ok());
        assert!(ledger.get_stage(&reader, &owner(), id, stage).is_ok());
    }
    assert_eq!(
        ledger.get_commitment(&stranger(), &owner(), id),
        Err(PledgeError::NotAuthorized)
    );
    assert_eq!(
        ledger.get_stage(&stranger(), &owner(), id, stage),
        Err(PledgeError::NotAuthorized)
    );

    ledger
        .set_privacy(&at(&owner(), 2), &owner(), id, Privacy::Public.code())
        .unwrap();
    assert!(ledger.get_commitment(&stranger(), &owner(), id).is_ok());
    assert!(ledger.get_stage(&stranger(), &owner(), id, stage).is_ok());
}

#[test]
fn clearing_the_validator_revokes_its_read_access() {
    let mut ledger = funded_ledger(LedgerConfig::default(), &[]).unwrap();
    let id = ledger
        .create_commitment(
            &at(&owner(), 1),
            NewCommitment::new("Secret", "")
                .with_privacy(Privacy::Private)
                .with_validator(validator()),
        )
        .unwrap();

    ledger.set_validator(&at(&owner(), 2), &owner(), id, None).unwrap();
    assert_eq!(
        ledger.get_commitment(&validator(), &owner(), id),
        Err(PledgeError::NotAuthorized)
    );
}

#[test]
fn validator_swap_allowed_until_first_sign_off() {
    let mut ledger = funded_ledger(LedgerConfig::default(), &[]).unwrap();
    let id = ledger
        .create_commitment(&at(&owner(), 1), NewCommitment::new("Run", "").with_validator(stranger()))
        .unwrap();
    let s1 = ledger.add_stage(&at(&owner(), 1), &owner(), id, "5k", "").unwrap();
    let s2 = ledger.add_stage(&at(&owner(), 1), &owner(), id, "10k", "").unwrap();

    ledger
        .set_validator(&at(&owner(), 2), &owner(), id, Some(validator()))
        .unwrap();
    let record = ledger.get_commitment(&owner(), &owner(), id).unwrap();
    assert_eq!(record.validator.principal(), Some(&validator()));

    ledger.complete_stage(&at(&owner(), 3), &owner(), id, s1).unwrap();
    assert_eq!(
        ledger.validate_stage(&at(&stranger(), 3), &owner(), id, s1),
        Err(PledgeError::NotValidator)
    );
    ledger.validate_stage(&at(&validator(), 4), &owner(), id, s1).unwrap();

    assert_eq!(
        ledger.set_validator(&at(&owner(), 5), &owner(), id, Some(stranger())),
        Err(PledgeError::ValidatorLocked)
    );
    assert_eq!(
        ledger.validate_stage(&at(&validator(), 5), &owner(), id, s2),
        Err(PledgeError::ValidationRequired)
    );
    assert_eq!(
        ledger.validate_stage(&at(&validator(), 5), &owner(), id, StageId(9)),
        Err(PledgeError::NoSuchStage)
    );
}

#[test]
fn zero_stage_commitment_cannot_be_claimed() {
    let mut ledger = funded_ledger(LedgerConfig::default(), &[(owner(), 40)]).unwrap();
    let id = ledger
        .create_commitment(&at(&owner(), 1), NewCommitment::new("Empty", "").with_stake(40))
        .unwrap();
    assert_eq!(
        ledger.status(&owner(), &owner(), id).unwrap(),
        CommitmentStatus::Open
    );
    assert_eq!(
        ledger.claim_stake(&at(&owner(), 99), &owner(), id),
        Err(PledgeError::CommitmentNotCompleted)
    );
    assert_eq!(ledger.reserve().held(), 40);
}

#[test]
fn owners_have_independent_id_spaces() {
    let mut ledger = funded_ledger(LedgerConfig::default(), &[]).unwrap();
    let mine = ledger
        .create_commitment(&at(&owner(), 1), NewCommitment::new("mine", ""))
        .unwrap();
    let theirs = ledger
        .create_commitment(&at(&stranger(), 1), NewCommitment::new("theirs", ""))
        .unwrap();
    assert_eq!(mine, CommitmentId(1));
    assert_eq!(theirs, CommitmentId(1));

    assert_eq!(
        ledger.add_stage(&at(&owner(), 2), &stranger(), theirs, "hijack", ""),
        Err(PledgeError::NotAuthorized)
    );
    assert_eq!(
        ledger.get_commitment(&owner(), &owner(), mine).unwrap().title,
        "mine"
    );
}

#[test]
fn strict_config_tightens_text_bounds() {
    let mut ledger = funded_ledger(LedgerConfig::strict(), &[]).unwrap();
    let result = ledger.create_commitment(&at(&owner(), 1), NewCommitment::new("t".repeat(65), ""));
    assert!(matches!(
        result,
        Err(PledgeError::TextTooLong { field: "title", limit: 64 })
    ));

    let id = ledger
        .create_commitment(&at(&owner(), 1), NewCommitment::new("ok", ""))
        .unwrap();
    let result = ledger.add_stage(&at(&owner(), 1), &owner(), id, "s", "d".repeat(281));
    assert!(matches!(
        result,
        Err(PledgeError::TextTooLong { field: "description", .. })
    ));
    assert_eq!(ledger.get_commitment(&owner(), &owner(), id).unwrap().total_stages, 0);
}
