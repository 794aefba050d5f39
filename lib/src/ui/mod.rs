use std::path::PathBuf;

#[derive(Debug)]
pub enum UiEvent {
    // Overall mirror operation.
    MirrorStart {
        url: String,
        destination: PathBuf,
    },
    MirrorProgress {
        files_completed: u64,
        files_total: u64,
    },
    MirrorCancelling,
    MirrorComplete {
        exit_code: Option<i32>,
    },

    // Raw output from the mirror tool.
    LogLine {
        text: String,
    },
}

pub trait MirrorUiHandler {
    fn event(&mut self, e: &UiEvent);
}
