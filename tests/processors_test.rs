//! Happy-path and idempotency behavior of the three kind processors,
//! exercised against in-memory stores.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use common::{
    delivered, envelope_bytes, history_payload, personal_payload, position_payload,
    FakeHistoryStore, FakeLedger, FakeProfileStore,
};
use hr_events_service::kafka::processors::{
    HistoryProcessor, PersonalProcessor, PositionProcessor,
};
use hr_events_service::kafka::{KindProcessor, ValidationRules};
use hr_events_service::models::EventKind;

struct Fixture {
    ledger: Arc<FakeLedger>,
    profiles: Arc<FakeProfileStore>,
    history: Arc<FakeHistoryStore>,
    personal: PersonalProcessor,
    position: PositionProcessor,
    history_proc: HistoryProcessor,
}

impl Fixture {
    fn new() -> Self {
        let ledger = Arc::new(FakeLedger::default());
        let profiles = Arc::new(FakeProfileStore::default());
        let history = Arc::new(FakeHistoryStore::default());
        let rules = Arc::new(ValidationRules::default());

        let personal = PersonalProcessor::new(
            ledger.clone(),
            profiles.clone(),
            rules.clone(),
            false,
        );
        let position = PositionProcessor::new(
            ledger.clone(),
            profiles.clone(),
            rules.clone(),
            true,
        );
        let history_proc = HistoryProcessor::new(
            ledger.clone(),
            profiles.clone(),
            history.clone(),
            rules.clone(),
            false,
        );

        Self {
            ledger,
            profiles,
            history,
            personal,
            position,
            history_proc,
        }
    }
}

#[tokio::test]
async fn personal_event_creates_profile_and_audit_row() {
    let fx = Fixture::new();
    let payload = envelope_bytes(
        EventKind::Personal,
        Uuid::new_v4(),
        "e-1",
        personal_payload("e-1", "Anna"),
    );

    let commit = fx
        .personal
        .process(&delivered("hr.personal", 0, "e-1", &payload))
        .await;

    assert!(commit);
    assert_eq!(fx.ledger.audit_count(), 1);
    assert_eq!(fx.ledger.dead_letter_count(), 0);
    let fields = fx.profiles.personal("e-1").unwrap();
    assert_eq!(fields.first_name, "Anna");
    assert_eq!(fields.email, "anna@example.com");
}

#[tokio::test]
async fn duplicate_message_id_applies_effect_once() {
    let fx = Fixture::new();
    let payload = envelope_bytes(
        EventKind::Personal,
        Uuid::new_v4(),
        "e-1",
        personal_payload("e-1", "Anna"),
    );

    let first = fx
        .personal
        .process(&delivered("hr.personal", 0, "e-1", &payload))
        .await;
    let second = fx
        .personal
        .process(&delivered("hr.personal", 1, "e-1", &payload))
        .await;

    // The redelivery still commits, but the effect ran exactly once.
    assert!(first);
    assert!(second);
    assert_eq!(fx.ledger.audit_count(), 1);
    assert_eq!(
        fx.profiles
            .personal_writes
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn later_personal_event_overwrites_earlier_fields() {
    let fx = Fixture::new();
    let first = envelope_bytes(
        EventKind::Personal,
        Uuid::new_v4(),
        "e-1",
        personal_payload("e-1", "Anna"),
    );
    let second = envelope_bytes(
        EventKind::Personal,
        Uuid::new_v4(),
        "e-1",
        personal_payload("e-1", "Maria"),
    );

    assert!(
        fx.personal
            .process(&delivered("hr.personal", 0, "e-1", &first))
            .await
    );
    assert!(
        fx.personal
            .process(&delivered("hr.personal", 1, "e-1", &second))
            .await
    );

    assert_eq!(fx.ledger.audit_count(), 2);
    assert_eq!(fx.profiles.personal("e-1").unwrap().first_name, "Maria");
}

#[tokio::test]
async fn position_event_applies_once_profile_exists() {
    let fx = Fixture::new();
    let personal = envelope_bytes(
        EventKind::Personal,
        Uuid::new_v4(),
        "e-1",
        personal_payload("e-1", "Anna"),
    );
    let position = envelope_bytes(
        EventKind::Position,
        Uuid::new_v4(),
        "e-1",
        position_payload("e-1"),
    );

    assert!(
        fx.personal
            .process(&delivered("hr.personal", 0, "e-1", &personal))
            .await
    );
    assert!(
        fx.position
            .process(&delivered("hr.positions", 0, "e-1", &position))
            .await
    );

    assert_eq!(fx.ledger.audit_count(), 2);
    assert_eq!(fx.ledger.dead_letter_count(), 0);
    let fields = fx.profiles.position("e-1").unwrap();
    assert_eq!(fields.title, "QA Engineer");
    assert_eq!(fields.grade, "Middle");
    // The personal field group is untouched by the position upsert.
    assert_eq!(fx.profiles.personal("e-1").unwrap().first_name, "Anna");
}

#[tokio::test]
async fn history_event_appends_record_for_known_employee() {
    let fx = Fixture::new();
    let personal = envelope_bytes(
        EventKind::Personal,
        Uuid::new_v4(),
        "e-1",
        personal_payload("e-1", "Anna"),
    );
    let history = envelope_bytes(
        EventKind::History,
        Uuid::new_v4(),
        "e-1",
        history_payload("e-1"),
    );

    assert!(
        fx.personal
            .process(&delivered("hr.personal", 0, "e-1", &personal))
            .await
    );
    assert!(
        fx.history_proc
            .process(&delivered("hr.history", 0, "e-1", &history))
            .await
    );

    assert_eq!(fx.history.record_count(), 1);
    let records = fx.history.records.lock().unwrap();
    assert_eq!(records[0].company, "Acme");
    assert_eq!(records[0].stack, vec!["Rust", "Postgres"]);
}

#[tokio::test]
async fn repeated_history_event_does_not_double_append() {
    let fx = Fixture::new();
    fx.profiles.seed_personal("e-1", Default::default());
    let history = envelope_bytes(
        EventKind::History,
        Uuid::new_v4(),
        "e-1",
        history_payload("e-1"),
    );

    assert!(
        fx.history_proc
            .process(&delivered("hr.history", 0, "e-1", &history))
            .await
    );
    assert!(
        fx.history_proc
            .process(&delivered("hr.history", 1, "e-1", &history))
            .await
    );

    assert_eq!(fx.history.record_count(), 1);
}

#[tokio::test]
async fn effect_failure_after_audit_holds_offset_then_skips_on_redelivery() {
    let fx = Fixture::new();
    let payload = envelope_bytes(
        EventKind::Personal,
        Uuid::new_v4(),
        "e-1",
        personal_payload("e-1", "Anna"),
    );

    fx.profiles.set_failing(true);
    let commit = fx
        .personal
        .process(&delivered("hr.personal", 0, "e-1", &payload))
        .await;

    // Audit is written before the effect, so the failed upsert holds the
    // offset while the ledger already has the row.
    assert!(!commit);
    assert_eq!(fx.ledger.audit_count(), 1);
    assert_eq!(fx.ledger.dead_letter_count(), 0);

    fx.profiles.set_failing(false);
    let commit = fx
        .personal
        .process(&delivered("hr.personal", 0, "e-1", &payload))
        .await;

    // Redelivery is treated as a duplicate: committed, effect skipped.
    assert!(commit);
    assert_eq!(fx.ledger.audit_count(), 1);
    assert!(fx.profiles.personal("e-1").is_none());
}
