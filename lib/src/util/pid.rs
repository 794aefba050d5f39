use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use sysinfo::Pid;
use tracing::debug;

/// Exclusive lock on a directory, held through a PID file.
///
/// The lock is taken by writing our own PID to the file and released by
/// deleting it on drop. A file left behind by a process that is no longer
/// alive is reclaimed.
pub struct PidLock {
    path: PathBuf,
}

impl PidLock {
    pub fn acquire(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Trying to acquire PID lock at {}", path.display());

        if path.exists() {
            if let Some(pid) = read_pid_file(&path) {
                if process_exists(pid) {
                    debug!("Process with PID {} is still alive, cannot get lock.", pid);
                    return None;
                }

                debug!("Reclaiming stale PID lock left by PID {}.", pid);
            }
        }

        let mut file = fs::File::create(&path).ok()?;
        file.write_all(std::process::id().to_string().as_bytes()).ok()?;

        Some(Self { path })
    }
}

impl Drop for PidLock {
    fn drop(&mut self) {
        debug!("Releasing PID lock at {}", self.path.display());

        // Release is best-effort.
        let _ = fs::remove_file(&self.path);
    }
}

fn read_pid_file(path: &Path) -> Option<Pid> {
    let mut contents = String::new();

    fs::File::open(path).ok()?.read_to_string(&mut contents).ok()?;

    contents.trim().parse().ok()
}

fn process_exists(pid: Pid) -> bool {
    use sysinfo::{System, SystemExt};

    System::new_all().process(pid).is_some()
}
