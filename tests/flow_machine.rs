use anyhow::{anyhow, Result};
use port_flow::{
    donation::DonationSink,
    flow::{Flow, FlowRequest, ResumePayload},
    logsink::LogSink,
    model::{DataFrame, DdpFiletype, Language, NamedTables, Translatable, ValidationResult},
    platform::Platform,
    session::{FlowSession, TurnOutcome},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

struct MockPlatform {
    name: &'static str,
    scripted: Mutex<VecDeque<(ValidationResult, NamedTables)>>,
}

impl MockPlatform {
    fn new(
        name: &'static str,
        scripted: Vec<(ValidationResult, NamedTables)>,
    ) -> Box<dyn Platform> {
        Box::new(Self {
            name,
            scripted: Mutex::new(scripted.into()),
        })
    }
}

impl Platform for MockPlatform {
    fn name(&self) -> &str {
        self.name
    }

    fn extract(&self, _raw: &[u8]) -> Result<(ValidationResult, NamedTables)> {
        self.scripted
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted extraction left"))
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl DonationSink for RecordingSink {
    fn donate(&self, key: &str, payload: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((key.to_string(), payload.to_string()));
        Ok(())
    }
}

impl RecordingSink {
    fn data_calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| !k.ends_with("-tracking"))
            .cloned()
            .collect()
    }

    fn tracking_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k.ends_with("-tracking"))
            .map(|(_, p)| p.clone())
            .collect()
    }
}

struct FailingSink;

impl DonationSink for FailingSink {
    fn donate(&self, _key: &str, _payload: &str) -> Result<()> {
        Err(anyhow!("sink unavailable"))
    }
}

fn recognized() -> ValidationResult {
    ValidationResult::recognized(Language::En, DdpFiletype::Json)
}

fn mk_tables(keys: &[&str]) -> NamedTables {
    let mut tables = NamedTables::new();
    for key in keys {
        tables.insert(
            key,
            Translatable::new(*key, *key),
            DataFrame::single_column("Value", vec!["x".to_string()]),
        );
    }
    tables
}

fn mk_flow(platforms: Vec<Box<dyn Platform>>, sink: &RecordingSink) -> Flow {
    Flow::new(
        platforms,
        FlowSession::with_id("test-session"),
        LogSink::new(),
        Box::new(sink.clone()),
    )
}

#[test]
fn twitter_consent_accepted_donates_once() {
    let sink = RecordingSink::default();
    let platforms = vec![MockPlatform::new(
        "Twitter",
        vec![(recognized(), mk_tables(&["interests", "account_created_at"]))],
    )];
    let mut flow = mk_flow(platforms, &sink);

    assert!(matches!(
        flow.current_request(),
        Some(FlowRequest::FileInput { .. })
    ));
    flow.resume(ResumePayload::FileSelected(b"{}".to_vec()));

    let Some(FlowRequest::ConsentForm { form, .. }) = flow.current_request() else {
        panic!("expected consent form");
    };
    let keys: Vec<_> = form.tables.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["Twitter_interests", "Twitter_account_created_at"]);

    flow.resume(ResumePayload::ConsentAccepted("accepted-tables".to_string()));
    assert!(matches!(flow.current_request(), Some(FlowRequest::EndPage)));

    let data = sink.data_calls();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].0, "Twitter");
    assert_eq!(data[0].1, "accepted-tables");
    assert!((flow.progress() - 100.0).abs() < 1e-9);
}

#[test]
fn retry_then_valid_empty_shows_placeholder_table() {
    let sink = RecordingSink::default();
    let platforms = vec![MockPlatform::new(
        "YouTube",
        vec![
            (ValidationResult::unrecognized(), NamedTables::new()),
            (recognized(), NamedTables::new()),
        ],
    )];
    let mut flow = mk_flow(platforms, &sink);

    flow.resume(ResumePayload::FileSelected(b"bad".to_vec()));
    let progress_at_retry = flow.progress();
    assert!(matches!(
        flow.current_request(),
        Some(FlowRequest::Confirm { .. })
    ));

    flow.resume(ResumePayload::ConfirmYes);
    assert!(matches!(
        flow.current_request(),
        Some(FlowRequest::FileInput { .. })
    ));
    assert_eq!(flow.progress(), progress_at_retry);

    flow.resume(ResumePayload::FileSelected(b"{}".to_vec()));
    let Some(FlowRequest::ConsentForm { form, .. }) = flow.current_request() else {
        panic!("expected consent form after retry");
    };
    assert_eq!(form.tables.len(), 1);
    assert_eq!(form.tables[0].key, "YouTube_empty");
    assert_eq!(form.tables[0].data.rows.len(), 1);
}

#[test]
fn declined_retry_ends_turn_skipped_without_consent() {
    let sink = RecordingSink::default();
    let platforms = vec![MockPlatform::new(
        "Facebook",
        vec![(ValidationResult::unrecognized(), NamedTables::new())],
    )];
    let mut flow = mk_flow(platforms, &sink);

    flow.resume(ResumePayload::FileSelected(b"bad".to_vec()));
    assert!(matches!(
        flow.current_request(),
        Some(FlowRequest::Confirm { .. })
    ));

    flow.resume(ResumePayload::ConfirmNo);
    assert!(matches!(flow.current_request(), Some(FlowRequest::EndPage)));
    assert!(sink.data_calls().is_empty());

    let report = flow.report();
    assert_eq!(report.turns.len(), 1);
    assert_eq!(report.turns[0].outcome, TurnOutcome::Skipped);
    assert_eq!(report.turns[0].retries, 0);
}

#[test]
fn skip_at_file_select_never_reaches_consent() {
    let sink = RecordingSink::default();
    let platforms = vec![
        MockPlatform::new("Twitter", vec![]),
        MockPlatform::new("Instagram", vec![(recognized(), mk_tables(&["interests"]))]),
    ];
    let mut flow = mk_flow(platforms, &sink);

    flow.resume(ResumePayload::Skipped);
    // Straight to the next platform's file prompt.
    let Some(FlowRequest::FileInput { platform, .. }) = flow.current_request() else {
        panic!("expected next file prompt");
    };
    assert_eq!(platform, "Instagram");
    assert!(sink.data_calls().is_empty());
}

#[test]
fn consent_declined_donates_no_data_but_logs_were_donated() {
    let sink = RecordingSink::default();
    let platforms = vec![MockPlatform::new(
        "Twitter",
        vec![(recognized(), mk_tables(&["interests"]))],
    )];
    let mut flow = mk_flow(platforms, &sink);

    flow.resume(ResumePayload::FileSelected(b"{}".to_vec()));
    flow.resume(ResumePayload::ConsentDeclined);

    assert!(matches!(flow.current_request(), Some(FlowRequest::EndPage)));
    assert!(sink.data_calls().is_empty());
    assert!(!sink.tracking_calls().is_empty());
}

#[test]
fn log_donation_payload_is_never_empty() {
    let sink = RecordingSink::default();
    let platforms = vec![MockPlatform::new("Twitter", vec![])];
    let mut flow = mk_flow(platforms, &sink);
    flow.resume(ResumePayload::Skipped);

    // No subscriber feeds the sink in this test, so every donation carries
    // the placeholder.
    let tracking = sink.tracking_calls();
    assert!(!tracking.is_empty());
    for payload in tracking {
        let lines: Vec<String> = serde_json::from_str(&payload).unwrap();
        assert!(!lines.is_empty());
        assert_eq!(lines, vec!["no logs".to_string()]);
    }
}

#[test]
fn all_skipped_reaches_end_with_full_progress() {
    let sink = RecordingSink::default();
    let platforms = vec![
        MockPlatform::new("Twitter", vec![]),
        MockPlatform::new("Instagram", vec![]),
        MockPlatform::new("Facebook", vec![]),
        MockPlatform::new("YouTube", vec![]),
    ];
    let mut flow = mk_flow(platforms, &sink);

    for _ in 0..4 {
        assert!(matches!(
            flow.current_request(),
            Some(FlowRequest::FileInput { .. })
        ));
        flow.resume(ResumePayload::Skipped);
    }

    assert!(matches!(flow.current_request(), Some(FlowRequest::EndPage)));
    assert!((flow.progress() - 100.0).abs() < 1e-9);
    assert!(sink.data_calls().is_empty());
    assert_eq!(flow.report().turns.len(), 4);
}

#[test]
fn progress_totals_100_for_odd_platform_counts() {
    for n in [1usize, 3, 5] {
        let sink = RecordingSink::default();
        let platforms = (0..n).map(|_| MockPlatform::new("Twitter", vec![])).collect();
        let mut flow = mk_flow(platforms, &sink);

        let mut last = 0.0;
        while let Some(request) = flow.current_request() {
            assert!(flow.progress() >= last, "progress regressed");
            last = flow.progress();
            match request {
                FlowRequest::EndPage => break,
                _ => flow.resume(ResumePayload::Skipped),
            }
        }
        assert!((flow.progress() - 100.0).abs() < 1e-9, "n={n}");
    }
}

#[test]
fn malformed_payload_takes_conservative_branch() {
    let sink = RecordingSink::default();
    let platforms = vec![MockPlatform::new(
        "Twitter",
        vec![(recognized(), mk_tables(&["interests"]))],
    )];
    let mut flow = mk_flow(platforms, &sink);

    flow.resume(ResumePayload::FileSelected(b"{}".to_vec()));
    assert!(matches!(
        flow.current_request(),
        Some(FlowRequest::ConsentForm { .. })
    ));

    // A file payload at the consent prompt counts as a decline.
    flow.resume(ResumePayload::FileSelected(b"{}".to_vec()));
    assert!(matches!(flow.current_request(), Some(FlowRequest::EndPage)));
    assert!(sink.data_calls().is_empty());
}

#[test]
fn wrong_payload_at_file_prompt_counts_as_skip() {
    let sink = RecordingSink::default();
    let platforms = vec![MockPlatform::new(
        "Twitter",
        vec![(recognized(), mk_tables(&["interests"]))],
    )];
    let mut flow = mk_flow(platforms, &sink);

    flow.resume(ResumePayload::ConfirmYes);
    assert!(matches!(flow.current_request(), Some(FlowRequest::EndPage)));
    assert_eq!(flow.report().turns[0].outcome, TurnOutcome::Skipped);
}

#[test]
fn sink_failures_never_block_the_flow() {
    let platforms = vec![MockPlatform::new(
        "Twitter",
        vec![(recognized(), mk_tables(&["interests"]))],
    )];
    let mut flow = Flow::new(
        platforms,
        FlowSession::with_id("test-session"),
        LogSink::new(),
        Box::new(FailingSink),
    );

    flow.resume(ResumePayload::FileSelected(b"{}".to_vec()));
    flow.resume(ResumePayload::ConsentAccepted("tables".to_string()));
    assert!(matches!(flow.current_request(), Some(FlowRequest::EndPage)));

    flow.resume(ResumePayload::Skipped);
    assert!(flow.is_done());
    assert!(flow.current_request().is_none());
}

#[test]
fn retry_count_is_reported() {
    let sink = RecordingSink::default();
    let platforms = vec![MockPlatform::new(
        "YouTube",
        vec![
            (ValidationResult::unrecognized(), NamedTables::new()),
            (ValidationResult::unrecognized(), NamedTables::new()),
            (recognized(), mk_tables(&["watch_history"])),
        ],
    )];
    let mut flow = mk_flow(platforms, &sink);

    flow.resume(ResumePayload::FileSelected(b"a".to_vec()));
    flow.resume(ResumePayload::ConfirmYes);
    flow.resume(ResumePayload::FileSelected(b"b".to_vec()));
    flow.resume(ResumePayload::ConfirmYes);
    flow.resume(ResumePayload::FileSelected(b"c".to_vec()));
    flow.resume(ResumePayload::ConsentAccepted("tables".to_string()));

    let report = flow.report();
    assert_eq!(report.turns[0].outcome, TurnOutcome::Donated);
    assert_eq!(report.turns[0].retries, 2);
}
