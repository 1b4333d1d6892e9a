use super::request::CueRequest;
use crossbeam_channel::{Receiver, Sender};
use std::cell::RefCell;
use std::rc::Rc;
use std::thread::{self, JoinHandle};

/// Where cue requests go. Implementations must return immediately and keep
/// requests in the order they were enqueued.
pub trait AudioBackend {
    fn enqueue_cue(&mut self, request: CueRequest);
}

/// Plays a single request to completion. Runs on the drain thread.
pub trait CuePlayer {
    fn play(&mut self, request: &CueRequest);
}

/// Fire-and-forget queue in front of a player running on its own thread.
pub struct ChannelBackend {
    sender: Option<Sender<CueRequest>>,
    drain: Option<JoinHandle<()>>,
}

impl ChannelBackend {
    /// Start the drain thread. `make_player` runs on that thread, so the
    /// player itself does not need to be `Send`.
    pub fn spawn<F, P>(make_player: F) -> std::io::Result<Self>
    where
        F: FnOnce() -> P + Send + 'static,
        P: CuePlayer,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let drain = thread::Builder::new()
            .name("clack-audio".to_string())
            .spawn(move || drain_loop(receiver, make_player()))?;

        Ok(Self {
            sender: Some(sender),
            drain: Some(drain),
        })
    }

    /// Stop accepting requests and wait for the queued ones to finish.
    pub fn shutdown(&mut self) {
        // Dropping the sender ends the drain loop once the queue is empty
        self.sender.take();
        if let Some(handle) = self.drain.take() {
            if handle.join().is_err() {
                log::error!("audio drain thread panicked");
            }
        }
    }
}

fn drain_loop<P: CuePlayer>(receiver: Receiver<CueRequest>, mut player: P) {
    log::debug!("audio drain started");
    for request in receiver {
        player.play(&request);
    }
    log::debug!("audio drain finished");
}

impl AudioBackend for ChannelBackend {
    fn enqueue_cue(&mut self, request: CueRequest) {
        let Some(sender) = &self.sender else {
            log::warn!("audio backend is shut down, dropping {request:?}");
            return;
        };
        if let Err(err) = sender.send(request) {
            log::error!("audio drain is gone: {err}");
        }
    }
}

impl Drop for ChannelBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Accepts everything and plays nothing. Used for `--mute`.
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn enqueue_cue(&mut self, request: CueRequest) {
        log::trace!("muted: {request:?}");
    }
}

/// Keeps every request in order. Clones share the same log, so a test can
/// hand one clone to the session and read from the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    requests: Rc<RefCell<Vec<CueRequest>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<CueRequest> {
        self.requests.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.requests.borrow_mut().clear();
    }
}

impl AudioBackend for RecordingBackend {
    fn enqueue_cue(&mut self, request: CueRequest) {
        self.requests.borrow_mut().push(request);
    }
}
