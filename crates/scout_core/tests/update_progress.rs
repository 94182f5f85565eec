use std::sync::Once;

use scout_core::{
    update, AppState, Effect, JobStatus, Msg, ProgressEvent, ProgressStats, PROGRESS_HIDE_DELAY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scout_logging::initialize_for_tests);
}

fn progress(value: f64) -> Msg {
    Msg::ProgressReceived(ProgressEvent {
        progress: Some(value),
        ..ProgressEvent::default()
    })
}

fn complete() -> Msg {
    Msg::ProgressReceived(ProgressEvent {
        status: Some(JobStatus::Complete),
        ..ProgressEvent::default()
    })
}

#[test]
fn percentage_is_always_the_latest_value() {
    init_logging();
    let mut state = AppState::new();
    for value in [10.0, 55.0, 30.0, 30.0, 99.5, 2.0] {
        let (next, _) = update(state, progress(value));
        state = next;
        assert_eq!(state.view().progress.percent, value);
    }
}

#[test]
fn percentage_is_clamped_to_the_bar_range() {
    init_logging();
    let (state, _) = update(AppState::new(), progress(140.0));
    assert_eq!(state.view().progress.percent, 100.0);

    let (state, _) = update(state, progress(-5.0));
    assert_eq!(state.view().progress.percent, 0.0);
}

#[test]
fn complete_keeps_last_values_until_grace_delay_elapses() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::ProgressReceived(ProgressEvent {
            progress: Some(42.0),
            message: Some("scraping page 3".to_string()),
            ..ProgressEvent::default()
        }),
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.progress.visible);
    assert_eq!(view.progress.status_text, "scraping page 3");
    assert_eq!(view.progress.percent, 42.0);

    let (state, effects) = update(state, complete());
    let view = state.view();
    assert!(view.progress.visible);
    assert_eq!(view.progress.status_text, "scraping page 3");
    assert_eq!(view.progress.percent, 42.0);
    assert_eq!(
        effects,
        vec![Effect::ScheduleProgressHide {
            generation: 1,
            delay: PROGRESS_HIDE_DELAY,
        }]
    );

    let (state, effects) = update(state, Msg::ProgressHideElapsed { generation: 1 });
    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.progress.visible);
    assert_eq!(view.progress.percent, 0.0);
}

#[test]
fn running_status_cancels_a_pending_hide() {
    init_logging();
    let (state, _) = update(AppState::new(), complete());
    let (state, _) = update(
        state,
        Msg::ProgressReceived(ProgressEvent {
            progress: Some(5.0),
            status: Some(JobStatus::Running),
            ..ProgressEvent::default()
        }),
    );
    let (state, _) = update(state, Msg::ProgressHideElapsed { generation: 1 });

    assert!(state.view().progress.visible);
    assert_eq!(state.view().progress.percent, 5.0);
}

#[test]
fn only_the_latest_hide_timer_counts() {
    init_logging();
    let (state, first) = update(AppState::new(), complete());
    let (state, second) = update(state, complete());
    assert_ne!(first, second);

    let (state, _) = update(state, Msg::ProgressHideElapsed { generation: 1 });
    assert!(state.view().progress.visible);

    let (state, _) = update(state, Msg::ProgressHideElapsed { generation: 2 });
    assert!(!state.view().progress.visible);
}

#[test]
fn stats_keys_update_independently() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::ProgressReceived(ProgressEvent {
            stats: Some(ProgressStats {
                processed: Some(3),
                successful: Some(2),
                failed: Some(1),
            }),
            ..ProgressEvent::default()
        }),
    );
    let (state, _) = update(
        state,
        Msg::ProgressReceived(ProgressEvent {
            stats: Some(ProgressStats {
                processed: Some(4),
                successful: Some(3),
                failed: None,
            }),
            ..ProgressEvent::default()
        }),
    );

    assert_eq!(
        state.view().progress.stats,
        ProgressStats {
            processed: Some(4),
            successful: Some(3),
            failed: Some(1),
        }
    );
}

#[test]
fn empty_message_keeps_previous_status_text() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::ProgressReceived(ProgressEvent {
            message: Some("fetching".to_string()),
            ..ProgressEvent::default()
        }),
    );
    let (state, _) = update(
        state,
        Msg::ProgressReceived(ProgressEvent {
            message: Some(String::new()),
            progress: Some(12.0),
            ..ProgressEvent::default()
        }),
    );

    assert_eq!(state.view().progress.status_text, "fetching");
}

#[test]
fn progress_events_parse_from_wire_json() {
    let event: ProgressEvent = serde_json::from_str(
        r#"{"progress": null, "status": "complete", "stats": {"failed": 2}}"#,
    )
    .unwrap();
    assert_eq!(event.progress, None);
    assert_eq!(event.status, Some(JobStatus::Complete));
    assert_eq!(event.stats.unwrap().failed, Some(2));
    assert_eq!(event.stats.unwrap().processed, None);

    let event: ProgressEvent = serde_json::from_str(r#"{"status": "queued"}"#).unwrap();
    assert_eq!(event.status, Some(JobStatus::Other("queued".to_string())));
}
