use sitemirror::ui::*;

pub struct StderrUiHandler;

impl StderrUiHandler {
    pub fn new() -> Self {
        Self
    }
}

impl MirrorUiHandler for StderrUiHandler {
    fn event(&mut self, e: &UiEvent) {
        match e {
            UiEvent::MirrorStart { url, destination } => {
                eprintln!("=== Mirroring {} -> {} ===", url, destination.display());
            }
            UiEvent::MirrorProgress {
                files_completed,
                files_total,
            } => {
                // Guard against a zero total before computing the percentage.
                if *files_total > 0 {
                    let percent = *files_completed as f64 / *files_total as f64 * 100.0;

                    eprintln!("Progress: {}/{} files ({:.1} %)", files_completed, files_total, percent);
                }
            }
            UiEvent::MirrorCancelling => {
                eprintln!("Cancelling, waiting for the mirror tool to stop...");
            }
            UiEvent::MirrorComplete { exit_code } => {
                if let Some(0) = exit_code {
                    eprintln!("=== Mirror finished successfully ===");
                }
            }
            UiEvent::LogLine { text } => {
                eprintln!("{}", text);
            }
        }
    }
}
