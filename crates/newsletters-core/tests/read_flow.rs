//! Integration tests for the subscription, state and read-state flow.
//!
//! These tests use in-memory collaborators in place of the document store.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use newsletters_firestore::{Document, Value};
use proptest::prelude::*;
use tokio::sync::{Notify, RwLock, mpsc};

use newsletters_core::newsletter::{NYT_OTHER, TODAY_GROUP_ORDER, fields, vendor_name};
use newsletters_core::{
    Context, NewsletterId, NewsletterRecord, NewsletterState, ReadStateWriter, Subscription,
    ToggleOutcome, build_view, classify, toggle_read,
};

fn date(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

fn doc(id: &str, sender: &str, subject: &str, is_read: bool) -> Document {
    Document::new(format!("projects/p/databases/(default)/documents/NewsletterMetadata/{id}"))
        .with_field(fields::SENDER, sender)
        .with_field(fields::SUBJECT, subject)
        .with_field(fields::NEWSLETTER_DATE, date(9))
        .with_field(fields::IS_READ, is_read)
}

/// Writer that records every call and always succeeds.
#[derive(Default)]
struct RecordingWriter {
    calls: Mutex<Vec<(String, bool)>>,
}

impl ReadStateWriter for RecordingWriter {
    async fn update_is_read(&self, id: &NewsletterId, value: bool) -> newsletters_core::Result<()> {
        self.calls.lock().unwrap().push((id.to_string(), value));
        Ok(())
    }
}

/// Writer that holds each write until released.
#[derive(Default)]
struct GatedWriter {
    entered: Notify,
    release: Notify,
}

impl ReadStateWriter for GatedWriter {
    async fn update_is_read(&self, _id: &NewsletterId, _value: bool) -> newsletters_core::Result<()> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

#[tokio::test]
async fn test_subscription_deliveries_replace_state() {
    let (tx, rx) = mpsc::channel(4);
    let mut subscription = Subscription::from_receiver(rx);
    let mut state = NewsletterState::new();

    tx.send(Ok(vec![doc("a", "Morning Brew <c@mb.com>", "Hi", false)]))
        .await
        .unwrap();
    tx.send(Ok(vec![
        doc("a", "Morning Brew <c@mb.com>", "Hi", true),
        doc("b", "HEATED <e@heated.world>", "Heat", false),
    ]))
    .await
    .unwrap();
    drop(tx);

    while let Some(delivery) = subscription.next().await {
        state.apply_snapshot(&delivery.unwrap()).unwrap();
    }

    assert_eq!(state.generation(), 2);
    assert_eq!(state.len(), 2);
    assert!(state.get(&"a".into()).unwrap().is_read());
}

#[tokio::test]
async fn test_malformed_batch_keeps_previous_state() {
    let mut state = NewsletterState::new();
    state
        .apply_snapshot(&[doc("a", "HEATED <e@heated.world>", "One", false)])
        .unwrap();

    let broken = Document::new("NewsletterMetadata/c")
        .with_field(fields::SENDER, "X <x@x>")
        .with_field(fields::SUBJECT, Value::Boolean(true))
        .with_field(fields::NEWSLETTER_DATE, date(9));
    let batch = vec![doc("b", "Sigma Xi <s@sx.org>", "Two", false), broken];

    assert!(state.apply_snapshot(&batch).is_err());
    assert_eq!(state.generation(), 1);
    assert_eq!(state.records()[0].subject, "One");
}

#[tokio::test]
async fn test_toggle_mirrors_by_id_after_concurrent_replace() {
    let writer = GatedWriter::default();
    let mut initial = NewsletterState::new();
    initial
        .apply_snapshot(&[
            doc("a", "HEATED <e@heated.world>", "One", false),
            doc("b", "HEATED <e@heated.world>", "Two", false),
        ])
        .unwrap();
    let state = RwLock::new(initial);
    let record = state.read().await.get(&"b".into()).unwrap().clone();

    let toggle = toggle_read(&writer, &state, &record);
    let replace = async {
        writer.entered.notified().await;
        // b moves to the front while the write is in flight
        state
            .write()
            .await
            .apply_snapshot(&[
                doc("b", "HEATED <e@heated.world>", "Two", false),
                doc("c", "HEATED <e@heated.world>", "Three", false),
            ])
            .unwrap();
        writer.release.notify_one();
    };
    let (outcome, ()) = tokio::join!(toggle, replace);

    assert!(outcome.is_updated());
    let state = state.read().await;
    assert!(state.get(&"b".into()).unwrap().is_read());
    assert!(!state.get(&"c".into()).unwrap().is_read());
}

#[tokio::test]
async fn test_toggle_of_removed_record_is_not_mirrored() {
    let writer = RecordingWriter::default();
    let state = RwLock::new(NewsletterState::new());
    let record = NewsletterRecord::new("A <a@a>", "gone", date(9)).with_id("gone");

    let outcome = toggle_read(&writer, &state, &record).await;

    assert_eq!(
        outcome,
        ToggleOutcome::Updated {
            id: "gone".into(),
            is_read: true,
            mirrored: false,
        }
    );
}

#[tokio::test]
async fn test_toggling_stale_snapshot_twice_writes_same_value() {
    let writer = RecordingWriter::default();
    let mut initial = NewsletterState::new();
    initial
        .apply_snapshot(&[doc("a", "HEATED <e@heated.world>", "One", false)])
        .unwrap();
    let state = RwLock::new(initial);
    let stale = state.read().await.records()[0].clone();

    toggle_read(&writer, &state, &stale).await;
    toggle_read(&writer, &state, &stale).await;

    // Both toggles negate the snapshot value, not the remote one.
    let calls = writer.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![("a".to_string(), true), ("a".to_string(), true)]);
}

#[tokio::test]
async fn test_toggling_fresh_record_alternates() {
    let writer = RecordingWriter::default();
    let mut initial = NewsletterState::new();
    initial
        .apply_snapshot(&[doc("a", "HEATED <e@heated.world>", "One", false)])
        .unwrap();
    let state = RwLock::new(initial);

    for _ in 0..2 {
        let fresh = state.read().await.records()[0].clone();
        toggle_read(&writer, &state, &fresh).await;
    }

    let calls = writer.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![("a".to_string(), true), ("a".to_string(), false)]);
    assert!(!state.read().await.records()[0].is_read());
}

fn arb_sender() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("The New York Times <nytdirect@nytimes.com>".to_string()),
        Just("Morning Brew <crew@morningbrew.com>".to_string()),
        Just("Emerging Tech Brew <crew@morningbrew.com>".to_string()),
        Just("IT Brew <crew@morningbrew.com>".to_string()),
        Just("Sigma Xi SmartBrief <sigmaxi@smartbrief.com>".to_string()),
        Just("HEATED <heated@substack.com>".to_string()),
        "[A-Za-z ]{0,12}( <[a-z]{1,6}@[a-z]{1,6}\\.com>)?",
    ]
}

fn arb_subject() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("The Morning: markets rally".to_string()),
        Just("Breaking News: storm".to_string()),
        Just("The Evening - recap".to_string()),
        "[A-Za-z :-]{0,30}",
    ]
}

prop_compose! {
    fn arb_record()(
        sender in arb_sender(),
        subject in arb_subject(),
        hour in 0_u32..24,
        day in 1_u32..4,
        read in proptest::option::of(any::<bool>()),
    ) -> NewsletterRecord {
        let date = Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap();
        let mut record = NewsletterRecord::new(sender, subject, date);
        record.is_read = read;
        record
    }
}

proptest! {
    #[test]
    fn vendor_name_has_no_angle_bracket_tail(sender in "[^<]{0,20}<[^<>]{0,20}>") {
        let vendor = vendor_name(&sender);
        prop_assert!(!vendor.contains('<'));
        prop_assert_eq!(vendor, vendor.trim());
    }

    #[test]
    fn views_partition_records(records in proptest::collection::vec(arb_record(), 0..30)) {
        let records: Vec<NewsletterRecord> = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.with_id(format!("n{i:02}")))
            .collect();
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 18, 0, 0).unwrap();
        let today = build_view(&records, Context::Today, &now);
        let historical = build_view(&records, Context::Historical, &now);

        let mut seen: Vec<NewsletterId> = [&today, &historical]
            .iter()
            .flat_map(|view| &view.groups)
            .flat_map(|group| &group.items)
            .filter_map(|r| r.id.clone())
            .collect();
        seen.sort();
        let mut expected: Vec<NewsletterId> = records.iter().filter_map(|r| r.id.clone()).collect();
        expected.sort();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn today_group_key_is_fixed_or_vendor(sender in arb_sender(), subject in arb_subject()) {
        let c = classify(&sender, &subject, Context::Today);
        prop_assert!(
            TODAY_GROUP_ORDER.contains(&c.group_key.as_str()) || c.group_key == c.vendor_name,
            "unexpected key {:?} for vendor {:?}",
            c.group_key,
            c.vendor_name
        );
    }

    #[test]
    fn classification_is_deterministic(sender in arb_sender(), subject in arb_subject()) {
        for context in [Context::Today, Context::Historical] {
            prop_assert_eq!(
                classify(&sender, &subject, context),
                classify(&sender, &subject, context)
            );
        }
    }

    #[test]
    fn nyt_without_edition_falls_back(subject in "[0-9 #]{0,20}") {
        let c = classify("The New York Times <nyt@nytimes.com>", &subject, Context::Historical);
        prop_assert_eq!(c.group_key, NYT_OTHER);
    }

    #[test]
    fn group_keys_are_unique_within_a_view(records in proptest::collection::vec(arb_record(), 0..30)) {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 18, 0, 0).unwrap();
        for context in [Context::Today, Context::Historical] {
            let view = build_view(&records, context, &now);
            let mut keys = view.keys();
            let total = keys.len();
            keys.sort_unstable();
            keys.dedup();
            prop_assert_eq!(keys.len(), total);
        }
    }
}
