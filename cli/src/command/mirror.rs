use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{error, info};

use sitemirror::event::MirrorEvent;
use sitemirror::supervisor::MirrorSupervisor;
use sitemirror::ui::{MirrorUiHandler, UiEvent};
use sitemirror::util;

use crate::GeneralOptions;

use super::*;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn mirror(
    url: &str,
    destination: &Path,
    general_options: &GeneralOptions,
    ui_handler: &mut dyn MirrorUiHandler,
) -> Result<(), CommandError> {
    let config = load_mirror_config(general_options)?.resolve()?;

    let destination = util::normalize_path(destination);

    // Cancellation boolean.
    let cancel = Arc::new(AtomicBool::new(false));

    let break_cancel = cancel.clone();

    // Set break (Ctrl-C) handler.
    ctrlc::set_handler(move || {
        info!("Cancellation requested by user.");
        break_cancel.store(true, Ordering::SeqCst);
    })
    .unwrap_or_else(|err| error!("Error setting Ctrl-C handler: {}", err));

    let mut supervisor = MirrorSupervisor::new(config);

    supervisor.start(url, &destination)?;

    ui_handler.event(&UiEvent::MirrorStart {
        url: url.to_owned(),
        destination: destination.clone(),
    });

    let mut cancel_requested = false;

    let exit_code = 'poll: loop {
        if cancel.load(Ordering::SeqCst) && !cancel_requested {
            cancel_requested = true;

            supervisor.cancel();
            ui_handler.event(&UiEvent::MirrorCancelling);
        }

        for event in supervisor.try_drain() {
            match event {
                MirrorEvent::Line { text } => ui_handler.event(&UiEvent::LogLine { text }),
                MirrorEvent::Progress {
                    files_completed,
                    files_total,
                } => ui_handler.event(&UiEvent::MirrorProgress {
                    files_completed,
                    files_total,
                }),
                MirrorEvent::Done { exit_code } => break 'poll exit_code,
            }
        }

        thread::sleep(POLL_INTERVAL);
    };

    ui_handler.event(&UiEvent::MirrorComplete { exit_code });

    if cancel_requested {
        return Err(CommandError::new(CommandErrorKind::Cancelled, "Mirror cancelled by user"));
    }

    match exit_code {
        Some(0) => Ok(()),
        Some(code) => Err(CommandError::new(
            CommandErrorKind::Tool,
            format!("Mirror tool exited with code {code}"),
        )),
        None => Err(CommandError::new(
            CommandErrorKind::Tool,
            "Mirror tool was terminated by a signal",
        )),
    }
}
