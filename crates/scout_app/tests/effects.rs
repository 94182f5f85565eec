use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use scout_app::effects::engine_event_to_msg;
use scout_core::{LogEvent, Msg, ScrapeFailure, TreeNode};
use scout_engine::{EngineEvent, FailureKind, RequestError, StreamEvent};

#[test]
fn stream_events_map_one_to_one() {
    assert_eq!(
        engine_event_to_msg(EngineEvent::Stream(StreamEvent::Opened)),
        Msg::StreamOpened
    );
    assert_eq!(
        engine_event_to_msg(EngineEvent::Stream(StreamEvent::Retrying {
            attempt: 2,
            delay: Duration::from_secs(2),
        })),
        Msg::StreamRetrying {
            attempt: 2,
            delay: Duration::from_secs(2),
        }
    );
    assert_eq!(
        engine_event_to_msg(EngineEvent::Stream(StreamEvent::Failed)),
        Msg::StreamFailed
    );
    assert_eq!(
        engine_event_to_msg(EngineEvent::Stream(StreamEvent::Log(LogEvent::info("hi")))),
        Msg::LogReceived(LogEvent::info("hi"))
    );
}

#[test]
fn request_errors_become_strings() {
    let error = RequestError::new(FailureKind::HttpStatus(500), "500 Internal Server Error");

    assert_eq!(
        engine_event_to_msg(EngineEvent::TreeLoaded {
            request_id: 4,
            result: Err(error.clone()),
        }),
        Msg::TreeLoadFailed {
            request_id: 4,
            error: "http status 500: 500 Internal Server Error".into(),
        }
    );
    assert_eq!(
        engine_event_to_msg(EngineEvent::DownloadFinished {
            name: "a.txt".into(),
            result: Err(error.clone()),
        }),
        Msg::DownloadFinished {
            name: "a.txt".into(),
            result: Err("http status 500: 500 Internal Server Error".into()),
        }
    );
    assert_eq!(
        engine_event_to_msg(EngineEvent::ChatFinished(Err(error))),
        Msg::ChatFailed("http status 500: 500 Internal Server Error".into())
    );
}

#[test]
fn results_pass_through() {
    let root = TreeNode::file("a.txt", "a.txt");
    assert_eq!(
        engine_event_to_msg(EngineEvent::TreeLoaded {
            request_id: 1,
            result: Ok(root.clone()),
        }),
        Msg::TreeLoaded {
            request_id: 1,
            root
        }
    );
    assert_eq!(
        engine_event_to_msg(EngineEvent::DownloadFinished {
            name: "a.txt".into(),
            result: Ok(PathBuf::from("downloads/a.txt")),
        }),
        Msg::DownloadFinished {
            name: "a.txt".into(),
            result: Ok(PathBuf::from("downloads/a.txt")),
        }
    );
    assert_eq!(
        engine_event_to_msg(EngineEvent::ScrapeFinished(Err(ScrapeFailure::Transport(
            "offline".into()
        )))),
        Msg::ScrapeFinished(Err(ScrapeFailure::Transport("offline".into())))
    );
}

#[test]
fn timer_token_is_the_hide_generation() {
    assert_eq!(
        engine_event_to_msg(EngineEvent::TimerElapsed { token: 9 }),
        Msg::ProgressHideElapsed { generation: 9 }
    );
}
