use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenStream,
    CloseStream,
    FetchTree { request_id: u64 },
    DownloadFile {
        path: String,
        name: String,
        save_as: String,
    },
    DownloadArchive {
        path: String,
        name: String,
        save_as: String,
    },
    ScheduleProgressHide { generation: u64, delay: Duration },
    SendChat { message: String },
    SubmitScrape { websites: Vec<String> },
}
