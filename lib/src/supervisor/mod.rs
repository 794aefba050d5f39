use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{info, warn};
use url::Url;

use crate::config::ResolvedMirrorConfig;
use crate::error::*;
use crate::event::{EventChannel, EventSender, MirrorEvent};
use crate::stats;
use crate::util::pid::PidLock;

pub const CANCEL_MARKER: &str = "=== Download cancelled by user ===";

const PIDLOCK_FILENAME: &str = ".sitemirror.pid";

const GRACE_PERIOD: Duration = Duration::from_secs(3);
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

// Fixed invocation contract: recursive mirror, links converted for offline
// viewing, page requisites included, no ascending above the start path,
// robots directives ignored, one second between requests. The URL and an
// optional CA bundle are appended per job.
const MIRROR_ARGS: &[&str] = &[
    "--verbose",
    "--mirror",
    "--convert-links",
    "--adjust-extension",
    "--page-requisites",
    "--no-parent",
    "-e",
    "robots=off",
    "--wait=1",
];

/// Locate the mirror tool on the search path.
pub fn find_binary(binary: &str) -> Option<PathBuf> {
    which::which(binary).ok()
}

pub fn binary_available(binary: &str) -> bool {
    find_binary(binary).is_some()
}

struct MirrorJob {
    child: Child,

    // Held for the lifetime of the job so no other process mirrors into the
    // same directory concurrently.
    _lock: PidLock,
}

/// Supervises a single mirror process at a time.
///
/// `start` spawns the external mirror tool and a background reader that
/// forwards its combined output as [`MirrorEvent`]s. The consumer polls
/// [`MirrorSupervisor::try_drain`] on its own cadence; it never touches the
/// child process directly. Independent supervisor instances do not interfere
/// with each other.
pub struct MirrorSupervisor {
    config: ResolvedMirrorConfig,
    events: EventChannel,
    job: Arc<Mutex<Option<MirrorJob>>>,
    reader: Option<JoinHandle<()>>,
}

impl MirrorSupervisor {
    pub fn new(config: ResolvedMirrorConfig) -> Self {
        Self {
            config,
            events: EventChannel::new(),
            job: Arc::new(Mutex::new(None)),
            reader: None,
        }
    }

    /// Start mirroring `url` into `output_dir`, creating the directory if
    /// necessary.
    ///
    /// Fails without spawning anything (and without posting any events) if
    /// the mirror tool is not available, the directory cannot be created or
    /// is locked by another process, or a job is already running.
    pub fn start(&mut self, url: &str, output_dir: &Path) -> Result<(), MirrorError> {
        let url = Url::parse(url).map_err(|err| MirrorError::InvalidUrl(err.to_string().into()))?;

        // Check for the tool up front, so a broken environment is reported
        // before any side effects happen.
        let binary_path = find_binary(&self.config.binary)
            .ok_or_else(|| MirrorError::BinaryNotFound(self.config.binary.clone().into()))?;

        let mut job_slot = self.job.lock().unwrap();

        if job_slot.is_some() {
            return Err(MirrorError::AlreadyRunning);
        }

        // The previous job's reader has finished once the slot is empty.
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }

        fs::create_dir_all(output_dir).map_err(MirrorError::CreateOutputDir)?;

        let lock = PidLock::acquire(output_dir.join(PIDLOCK_FILENAME)).ok_or(MirrorError::OutputDirLocked)?;

        info!("Mirror starting: '{}' (into '{}')", url, output_dir.display());

        let mut child = mirror_command(&binary_path, &self.config, &url, output_dir)
            .spawn()
            .map_err(MirrorError::Spawn)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        *job_slot = Some(MirrorJob { child, _lock: lock });
        drop(job_slot);

        let job = Arc::clone(&self.job);
        let events = self.events.sender();

        self.reader = Some(thread::spawn(move || {
            relay_output(stdout, stderr, &events);
            publish_exit(&job, &events);
        }));

        Ok(())
    }

    /// Request termination of the running job, if any.
    ///
    /// Asks the process to stop cooperatively first and force-kills it if it
    /// is still alive after the grace period. The job's `Done` event still
    /// arrives through the reader as usual. No-op when idle; any errors along
    /// the way mean the process is already gone and are ignored.
    pub fn cancel(&self) {
        let pid = {
            let job_slot = self.job.lock().unwrap();

            let Some(job) = job_slot.as_ref() else {
                return;
            };

            // Posted while holding the slot lock, so the marker always
            // precedes the job's Done event.
            self.events.post(MirrorEvent::Line {
                text: CANCEL_MARKER.to_owned(),
            });

            job.child.id()
        };

        info!("Cancelling mirror job (PID {}).", pid);

        request_graceful_stop(pid);

        let deadline = Instant::now() + GRACE_PERIOD;

        while Instant::now() < deadline {
            {
                let mut job_slot = self.job.lock().unwrap();

                let Some(job) = job_slot.as_mut() else {
                    return;
                };

                match job.child.try_wait() {
                    Ok(Some(_)) | Err(_) => return,
                    Ok(None) => {}
                }
            }

            thread::sleep(EXIT_POLL_INTERVAL);
        }

        let mut job_slot = self.job.lock().unwrap();

        if let Some(job) = job_slot.as_mut() {
            warn!("Mirror process did not stop within {:?}, killing it.", GRACE_PERIOD);

            let _ = job.child.kill();
        }
    }

    /// Whether a job is live and its process has not been observed to exit.
    pub fn is_running(&self) -> bool {
        self.job.lock().unwrap().is_some()
    }

    /// Remove and return all pending events for this supervisor's job, oldest
    /// first. Never blocks.
    pub fn try_drain(&self) -> Vec<MirrorEvent> {
        self.events.try_drain()
    }
}

impl Drop for MirrorSupervisor {
    fn drop(&mut self) {
        if self.is_running() {
            self.cancel();
        }

        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
    }
}

fn mirror_command(binary_path: &Path, config: &ResolvedMirrorConfig, url: &Url, output_dir: &Path) -> Command {
    let mut command = Command::new(binary_path);

    command.args(MIRROR_ARGS);

    if let Some(ca_bundle) = &config.ca_bundle {
        command.arg(format!("--ca-certificate={}", ca_bundle.display()));
    }

    command
        .arg(url.as_str())
        .current_dir(output_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    command
}

/// Ask the process to stop without forcing it.
#[cfg(unix)]
fn request_graceful_stop(pid: u32) {
    let _ = Command::new("kill").args(["-TERM", &pid.to_string()]).status();
}

/// Ask the process to stop without forcing it.
#[cfg(windows)]
fn request_graceful_stop(pid: u32) {
    let _ = Command::new("taskkill").args(["/PID", &pid.to_string()]).status();
}

/// Forward the child's combined output to the event channel, one `Line` per
/// line, with a `Progress` event directly after every statistics line.
///
/// Both output streams are funneled through one internal channel, so a single
/// producer posts to the event channel and the ordering contract holds.
fn relay_output(
    stdout: Option<impl io::Read + Send + 'static>,
    stderr: Option<impl io::Read + Send + 'static>,
    events: &EventSender,
) {
    let (line_tx, line_rx) = mpsc::channel();

    let mut pumps = Vec::new();

    if let Some(stream) = stdout {
        let line_tx = line_tx.clone();
        pumps.push(thread::spawn(move || pump_lines(stream, &line_tx)));
    }

    if let Some(stream) = stderr {
        let line_tx = line_tx.clone();
        pumps.push(thread::spawn(move || pump_lines(stream, &line_tx)));
    }

    drop(line_tx);

    let mut files_total: u64 = 0;

    for line in line_rx {
        let progress = stats::parse_stats_line(&line);

        events.post(MirrorEvent::Line { text: line });

        if let Some((completed, remaining)) = progress {
            // The total only ever grows, even if the tool resets its counts.
            files_total = files_total.max(completed + remaining);

            events.post(MirrorEvent::Progress {
                files_completed: completed,
                files_total,
            });
        }
    }

    for pump in pumps {
        let _ = pump.join();
    }
}

fn pump_lines(stream: impl io::Read, lines: &Sender<String>) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();

        // Read failures end the stream the same way end-of-file does.
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        while matches!(buf.last(), Some(&b'\n') | Some(&b'\r')) {
            buf.pop();
        }

        // Replace undecodable bytes rather than failing the whole read.
        if lines.send(String::from_utf8_lossy(&buf).into_owned()).is_err() {
            break;
        }
    }
}

/// Wait for the child to exit, then post the job's final `Done` event and
/// clear the job slot, readying the supervisor for a new `start`.
///
/// Exit is detected by polling, so the slot stays available to `cancel`
/// throughout.
fn publish_exit(job: &Mutex<Option<MirrorJob>>, events: &EventSender) {
    loop {
        {
            let mut job_slot = job.lock().unwrap();

            let Some(running_job) = job_slot.as_mut() else {
                return;
            };

            let exit_code = match running_job.child.try_wait() {
                Ok(Some(status)) => {
                    info!("Mirror process exited: {}", status);

                    Some(status.code())
                }
                Ok(None) => None,
                Err(err) => {
                    warn!("Error waiting for mirror process: {}", err);

                    Some(None)
                }
            };

            if let Some(exit_code) = exit_code {
                events.post(MirrorEvent::Done { exit_code });
                *job_slot = None;

                return;
            }
        }

        thread::sleep(EXIT_POLL_INTERVAL);
    }
}
