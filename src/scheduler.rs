//! Host ports: frame scheduling and event listeners.
//!
//! The field never talks to a UI framework directly. It asks a
//! [`FrameScheduler`] for "call me back next frame" and gets a [`FrameToken`]
//! it can cancel, and it registers its pointer and resize interest with a
//! [`ListenerHost`]. [`ManualHost`] implements both deterministically.

use std::collections::BTreeMap;

/// Handle for one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Schedules one callback per display refresh.
pub trait FrameScheduler {
    /// Request a callback for the next frame.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a previously requested frame. Unknown tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Host events the field listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    PointerMove,
    Resize,
}

/// Handle for one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Registry of event listeners on the host.
pub trait ListenerHost {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);

    /// Whether any listener of `kind` is registered.
    fn is_listening(&self, kind: ListenerKind) -> bool;
}

/// Listener bookkeeping shared by host implementations.
#[derive(Debug, Default)]
pub struct ListenerSet {
    listeners: BTreeMap<ListenerId, ListenerKind>,
    next_id: u64,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, kind);
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> Option<ListenerKind> {
        self.listeners.remove(&id)
    }

    pub fn contains_kind(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|&k| k == kind)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Deterministic host driven by hand.
///
/// Frame requests queue a single pending token; the driver takes it with
/// [`take_due_frame`](ManualHost::take_due_frame) and passes it to
/// [`ParticleField::on_frame`](crate::ParticleField::on_frame).
#[derive(Debug, Default)]
pub struct ManualHost {
    pending: Option<FrameToken>,
    next_token: u64,
    /// Total frames ever requested.
    pub frames_requested: u64,
    /// Tokens cancelled before they fired.
    pub cancelled: Vec<FrameToken>,
    listeners: ListenerSet,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the pending frame, if any.
    pub fn take_due_frame(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }

    /// Whether a frame is waiting to fire.
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl FrameScheduler for ManualHost {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_token);
        self.next_token += 1;
        self.frames_requested += 1;
        self.pending = Some(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
            self.cancelled.push(token);
        }
    }
}

impl ListenerHost for ManualHost {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        self.listeners.add(kind)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(id);
    }

    fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.contains_kind(kind)
    }
}
