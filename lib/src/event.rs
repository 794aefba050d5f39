use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Clone, Debug)]
pub enum MirrorEvent {
    /// One line of the mirror process' combined output.
    Line { text: String },
    /// Progress extracted from a statistics line. `files_total` is the highest
    /// total observed so far within the job and never decreases.
    Progress { files_completed: u64, files_total: u64 },
    /// The mirror process exited. `None` means it was killed by a signal.
    /// Always the last event of a job.
    Done { exit_code: Option<i32> },
}

/// Unbounded FIFO queue carrying events from a job's reader thread to the
/// consumer's poll loop.
pub struct EventChannel {
    tx: Sender<MirrorEvent>,
    rx: Receiver<MirrorEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        Self { tx, rx }
    }

    /// Get a posting handle for the producer side.
    pub fn sender(&self) -> EventSender {
        EventSender { tx: self.tx.clone() }
    }

    pub fn post(&self, event: MirrorEvent) {
        let _ = self.tx.send(event);
    }

    /// Remove and return all currently pending events, in the order they were
    /// posted. Returns an empty vector if none are pending. Never blocks.
    pub fn try_drain(&self) -> Vec<MirrorEvent> {
        self.rx.try_iter().collect()
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct EventSender {
    tx: Sender<MirrorEvent>,
}

impl EventSender {
    /// Post an event. Never blocks; a gone consumer is silently tolerated.
    pub fn post(&self, event: MirrorEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_events_in_post_order() {
        let channel = EventChannel::new();
        let sender = channel.sender();

        sender.post(MirrorEvent::Line { text: "one".to_owned() });
        sender.post(MirrorEvent::Progress {
            files_completed: 1,
            files_total: 10,
        });
        sender.post(MirrorEvent::Done { exit_code: Some(0) });

        let events = channel.try_drain();

        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], MirrorEvent::Line { text } if text == "one"));
        assert!(matches!(
            events[1],
            MirrorEvent::Progress {
                files_completed: 1,
                files_total: 10
            }
        ));
        assert!(matches!(events[2], MirrorEvent::Done { exit_code: Some(0) }));
    }

    #[test]
    fn drain_removes_events() {
        let channel = EventChannel::new();

        channel.post(MirrorEvent::Line { text: "line".to_owned() });

        assert_eq!(channel.try_drain().len(), 1);
        assert!(channel.try_drain().is_empty());
    }

    #[test]
    fn drain_on_empty_channel_is_empty() {
        let channel = EventChannel::new();

        assert!(channel.try_drain().is_empty());
    }

    #[test]
    fn posting_from_another_thread_preserves_order() {
        let channel = EventChannel::new();
        let sender = channel.sender();

        let producer = std::thread::spawn(move || {
            for i in 0..100 {
                sender.post(MirrorEvent::Progress {
                    files_completed: i,
                    files_total: 100,
                });
            }
        });

        producer.join().unwrap();

        let events = channel.try_drain();

        assert_eq!(events.len(), 100);

        for (i, event) in events.iter().enumerate() {
            assert!(matches!(event, MirrorEvent::Progress { files_completed, .. } if *files_completed == i as u64));
        }
    }
}
