//! Session stack: which host the shell is currently driving.
//!
//! The bottom frame is the player's own host. Each `ssh` pushes a remote
//! frame that remembers where it came from; the remote host's `exit` pops
//! it and control returns to the origin.

use crate::network::HostId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionFrame {
    pub host: HostId,
    /// Host that opened this frame; `None` for the local frame
    pub origin: Option<HostId>,
}

impl SessionFrame {
    pub fn is_remote(&self) -> bool {
        self.origin.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SessionStack {
    frames: Vec<SessionFrame>,
    shutdown: bool,
}

impl SessionStack {
    pub fn new(local: HostId) -> Self {
        Self {
            frames: vec![SessionFrame {
                host: local,
                origin: None,
            }],
            shutdown: false,
        }
    }

    pub fn current(&self) -> Option<SessionFrame> {
        self.frames.last().copied()
    }

    pub fn current_host(&self) -> Option<HostId> {
        self.current().map(|f| f.host)
    }

    /// Whether the top frame is a remote session.
    pub fn is_remote(&self) -> bool {
        self.current().map(|f| f.is_remote()).unwrap_or(false)
    }

    /// Whether `host` already has a frame on the stack.
    pub fn contains(&self, host: HostId) -> bool {
        self.frames.iter().any(|f| f.host == host)
    }

    pub fn push_remote(&mut self, host: HostId, origin: HostId) {
        self.frames.push(SessionFrame {
            host,
            origin: Some(origin),
        });
    }

    pub fn pop(&mut self) -> Option<SessionFrame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Stop the interactive loop without unwinding or saving.
    pub fn request_shutdown(&mut self) {
        self.shutdown = true;
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }
}
