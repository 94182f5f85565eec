use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use pretty_assertions::assert_eq;
use scout_core::{LogEvent, ProgressEvent, ReconnectPolicy};
use scout_engine::{
    decode_frame, ClientSettings, EngineEvent, EventSink, EventStreamClient, SseFrame, StreamEvent,
};
use tokio::runtime::Handle;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

fn setup() {
    INIT.call_once(scout_logging::initialize_for_tests);
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<StreamEvent>>,
}

impl RecordingSink {
    fn snapshot(&self) -> Vec<StreamEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        if let EngineEvent::Stream(event) = event {
            self.events.lock().unwrap().push(event);
        }
    }
}

fn settings_for(server: &MockServer) -> ClientSettings {
    let mut settings = ClientSettings::parse(&server.uri(), PathBuf::from("unused")).unwrap();
    settings.reconnect = ReconnectPolicy {
        base_delay: Duration::from_millis(20),
        max_attempts: 3,
    };
    settings
}

async fn wait_for_events(sink: &RecordingSink, count: usize) -> Vec<StreamEvent> {
    for _ in 0..500 {
        let events = sink.snapshot();
        if events.len() >= count {
            return events.into_iter().take(count).collect();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {count} events, got {:?}", sink.snapshot());
}

fn sse(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/event-stream")
}

fn retrying(attempt: u32) -> StreamEvent {
    StreamEvent::Retrying {
        attempt,
        delay: Duration::from_millis(20) * attempt,
    }
}

#[tokio::test]
async fn dispatches_events_in_order_and_drops_malformed_ones() {
    setup();
    let server = MockServer::start().await;
    let body = concat!(
        "event: log\ndata: {\"message\":\"hello\",\"level\":\"info\"}\n\n",
        ": keep-alive\n\n",
        "event: progress\ndata: {\"progress\": 40, \"message\": \"Working\"}\n\n",
        "event: log\ndata: not json\n\n",
        "event: log\ndata: {\"message\":\"second\",\"level\":\"warning\"}\n\n",
    );
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(sse(body))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client = EventStreamClient::new(&settings_for(&server)).unwrap();
    let handle = client.open(&Handle::current(), sink.clone());

    let events = wait_for_events(&sink, 4).await;
    handle.close();

    assert_eq!(
        events,
        vec![
            StreamEvent::Opened,
            StreamEvent::Log(LogEvent::info("hello")),
            StreamEvent::Progress(ProgressEvent {
                progress: Some(40.0),
                message: Some("Working".into()),
                ..ProgressEvent::default()
            }),
            StreamEvent::Log(LogEvent::warning("second")),
        ]
    );
}

#[tokio::test]
async fn recovers_after_three_failed_handshakes() {
    setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(sse("event: log\ndata: {\"message\":\"back\"}\n\n"))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client = EventStreamClient::new(&settings_for(&server)).unwrap();
    let handle = client.open(&Handle::current(), sink.clone());

    let events = wait_for_events(&sink, 5).await;
    handle.close();

    assert_eq!(
        events,
        vec![
            retrying(1),
            retrying(2),
            retrying(3),
            StreamEvent::Opened,
            StreamEvent::Log(LogEvent::info("back")),
        ]
    );
}

#[tokio::test]
async fn gives_up_after_the_fourth_failure() {
    setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client = EventStreamClient::new(&settings_for(&server)).unwrap();
    let mut handle = client.open(&Handle::current(), sink.clone());

    tokio::time::timeout(Duration::from_secs(5), handle.join())
        .await
        .expect("stream task should stop on its own");

    assert!(handle.is_finished());
    assert_eq!(
        sink.snapshot(),
        vec![retrying(1), retrying(2), retrying(3), StreamEvent::Failed]
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn close_stops_a_pending_connection() {
    setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(sse("").set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client = EventStreamClient::new(&settings_for(&server)).unwrap();
    let mut handle = client.open(&Handle::current(), sink.clone());
    tokio::time::sleep(Duration::from_millis(50)).await;

    handle.close();
    tokio::time::timeout(Duration::from_secs(2), handle.join())
        .await
        .expect("closed stream should finish promptly");

    assert!(sink.snapshot().is_empty());
}

#[tokio::test]
async fn reconnect_sends_last_event_id() {
    setup();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .and(header("Last-Event-ID", "7"))
        .respond_with(sse("event: log\ndata: {\"message\":\"resumed\"}\n\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(sse("id: 7\nevent: log\ndata: {\"message\":\"first\"}\n\n"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client = EventStreamClient::new(&settings_for(&server)).unwrap();
    let handle = client.open(&Handle::current(), sink.clone());

    let events = wait_for_events(&sink, 5).await;
    handle.close();

    assert_eq!(
        events,
        vec![
            StreamEvent::Opened,
            StreamEvent::Log(LogEvent::info("first")),
            retrying(1),
            StreamEvent::Opened,
            StreamEvent::Log(LogEvent::info("resumed")),
        ]
    );
}

#[test]
fn unknown_event_names_are_ignored() {
    let frame = SseFrame {
        event: "heartbeat".into(),
        data: "{}".into(),
    };
    assert_eq!(decode_frame(&frame), None);

    let frame = SseFrame {
        event: "progress".into(),
        data: "{\"status\":\"complete\"}".into(),
    };
    assert!(matches!(decode_frame(&frame), Some(StreamEvent::Progress(_))));
}
