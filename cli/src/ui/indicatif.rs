use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

use sitemirror::ui::*;

static MIRROR_BAR_STYLE: Lazy<ProgressStyle> =
    Lazy::new(|| ProgressStyle::with_template(" {prefix:>8} [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}").unwrap());

pub struct IndicatifUiHandler {
    progress_chars: String,

    mirror_bar: Option<ProgressBar>,
}

impl IndicatifUiHandler {
    pub fn new(progress_chars: String) -> Self {
        Self {
            progress_chars,

            mirror_bar: None,
        }
    }
}

impl MirrorUiHandler for IndicatifUiHandler {
    fn event(&mut self, e: &UiEvent) {
        match e {
            UiEvent::MirrorStart { url, destination } => {
                eprintln!("=== Mirroring {} -> {} ===", url, destination.display());

                let bar = ProgressBar::new(1)
                    .with_style((*MIRROR_BAR_STYLE).clone().progress_chars(&self.progress_chars));

                bar.set_prefix("Mirror");
                bar.set_message("files...");

                self.mirror_bar = Some(bar);
            }
            UiEvent::MirrorProgress {
                files_completed,
                files_total,
            } => {
                if let Some(bar) = &self.mirror_bar {
                    bar.set_length(*files_total);
                    bar.set_position(*files_completed);
                }
            }
            UiEvent::MirrorCancelling => {
                if let Some(bar) = &self.mirror_bar {
                    bar.set_message("cancelling...");
                }
            }
            UiEvent::MirrorComplete { exit_code } => {
                if let Some(bar) = self.mirror_bar.take() {
                    bar.finish_and_clear();
                }

                if let Some(0) = exit_code {
                    eprintln!("=== Mirror finished successfully ===");
                }
            }
            UiEvent::LogLine { text } => {
                if let Some(bar) = &self.mirror_bar {
                    bar.println(text);
                } else {
                    eprintln!("{}", text);
                }
            }
        }
    }
}
