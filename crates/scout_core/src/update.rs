use crate::{
    AppState, ConnectionState, Effect, LogEvent, Msg, ScrapeFailure, PROGRESS_HIDE_DELAY,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionStarted => {
            // Failed is terminal for the session.
            if state.connection() == ConnectionState::Failed {
                return (state, Vec::new());
            }
            state.set_connection(ConnectionState::Connecting);
            vec![Effect::OpenStream]
        }
        Msg::SessionEnded => vec![Effect::CloseStream],
        Msg::StreamOpened => {
            state.set_connection(ConnectionState::Open);
            Vec::new()
        }
        Msg::StreamRetrying { .. } => {
            state.set_connection(ConnectionState::Retrying);
            Vec::new()
        }
        Msg::StreamFailed => {
            state.fail_connection();
            Vec::new()
        }
        Msg::LogReceived(event) => {
            state.append_log(event);
            Vec::new()
        }
        Msg::ProgressReceived(event) => match state.apply_progress(event) {
            Some(generation) => vec![Effect::ScheduleProgressHide {
                generation,
                delay: PROGRESS_HIDE_DELAY,
            }],
            None => Vec::new(),
        },
        Msg::ProgressHideElapsed { generation } => {
            state.progress_hide_elapsed(generation);
            Vec::new()
        }
        Msg::DrawerToggled => state.toggle_drawer(),
        Msg::DrawerClosed => {
            state.close_drawer();
            Vec::new()
        }
        Msg::TreeLoaded { request_id, root } => {
            state.tree_loaded(request_id, root);
            Vec::new()
        }
        Msg::TreeLoadFailed { request_id, error } => {
            state.tree_load_failed(request_id, &error);
            Vec::new()
        }
        Msg::DirectoryToggled { path } => {
            state.toggle_directory(&path);
            Vec::new()
        }
        Msg::DownloadRequested { path } => state.download_effect(&path).into_iter().collect(),
        Msg::DownloadFinished { name, result } => {
            state.download_finished(&name, result.as_deref().map_err(String::as_str));
            Vec::new()
        }
        Msg::PauseToggled => {
            state.toggle_pause();
            Vec::new()
        }
        Msg::CancelRequested => {
            state.request_cancel();
            Vec::new()
        }
        Msg::CancelConfirmed => {
            state.confirm_cancel();
            Vec::new()
        }
        Msg::CancelDismissed => {
            state.dismiss_cancel();
            Vec::new()
        }
        Msg::LogPanelClosed => {
            state.hide_log();
            Vec::new()
        }
        Msg::ChatSubmitted(raw) => match state.submit_chat(&raw) {
            Some(message) => vec![Effect::SendChat { message }],
            None => Vec::new(),
        },
        Msg::ChatReplied(reply) => {
            state.chat_replied(reply.response, reply.websites);
            Vec::new()
        }
        Msg::ChatFailed(error) => {
            state.chat_failed(&error);
            Vec::new()
        }
        Msg::WebsiteToggled { index } => {
            state.toggle_candidate(index);
            Vec::new()
        }
        Msg::ScrapeSubmitted => {
            if state.is_scrape_pending() {
                return (state, Vec::new());
            }
            state.show_log();
            let websites = state.selected_websites();
            if websites.is_empty() {
                state.push_agent_message("Please select at least one website to scrape.");
                return (state, Vec::new());
            }
            state.begin_scrape();
            vec![Effect::SubmitScrape { websites }]
        }
        Msg::ScrapeFinished(result) => {
            state.end_scrape();
            match result {
                Ok(report) => {
                    state.store_results(report.analyzed_data);
                    state.append_log(LogEvent::info("Analysis completed successfully"));
                }
                Err(ScrapeFailure::Rejected(rejection)) => {
                    state.push_agent_message(&format!("Error: {}", rejection.summary()));
                    if rejection.errors.is_empty() {
                        state.append_log(LogEvent::error(format!(
                            "Scraping error: {}",
                            rejection.summary()
                        )));
                    }
                    for source in &rejection.errors {
                        state.append_log(LogEvent::error(format!(
                            "Failed to scrape {}: {}",
                            source.url, source.error
                        )));
                    }
                }
                Err(ScrapeFailure::Transport(error)) => {
                    state.append_log(LogEvent::error(format!("Scraping error: {error}")));
                    state.push_agent_message(
                        "Network error occurred. Please check your connection and try again.",
                    );
                }
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
