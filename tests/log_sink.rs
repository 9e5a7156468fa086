use port_flow::logsink::LogSink;
use std::io::Write;
use tracing_subscriber::fmt::MakeWriter;

#[test]
fn lines_snapshot_is_non_destructive() {
    let sink = LogSink::new();
    let mut writer = sink.make_writer();
    writeln!(writer, "line one").unwrap();
    writeln!(writer, "line two").unwrap();

    assert_eq!(sink.lines(), vec!["line one", "line two"]);
    // A second snapshot sees the same history plus later writes.
    writeln!(writer, "line three").unwrap();
    assert_eq!(sink.lines().len(), 3);
}

#[test]
fn empty_sink_donates_placeholder() {
    let sink = LogSink::new();
    assert!(sink.lines().is_empty());
    assert_eq!(sink.donation_payload(), vec!["no logs".to_string()]);
}

#[test]
fn non_empty_sink_donates_its_lines() {
    let sink = LogSink::new();
    writeln!(sink.make_writer(), "something happened").unwrap();
    assert_eq!(
        sink.donation_payload(),
        vec!["something happened".to_string()]
    );
}

#[test]
fn tracing_events_land_in_the_sink() {
    let sink = LogSink::new();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("hello from the flow");
    });

    assert!(sink
        .lines()
        .iter()
        .any(|l| l.contains("hello from the flow")));
}
