//! Lossy render update channel.
//!
//! A 2-slot `embassy-sync` channel shared between the control loop and the
//! render thread. The producer side never waits: when the channel is full
//! the oldest entry is discarded to make room, so the newest request always
//! gets through.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::debug;

use super::RenderRequest;

/// Channel depth for render requests.
pub const UPDATE_DEPTH: usize = 2;

pub struct UpdateChannel {
    inner: Channel<CriticalSectionRawMutex, RenderRequest, UPDATE_DEPTH>,
}

impl UpdateChannel {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Enqueue without blocking. Returns `true` if an older entry was
    /// discarded to make room.
    ///
    /// A full channel is retried once before evicting, so a consumer that
    /// frees a slot in the meantime costs no entry. An eviction can still
    /// race the consumer's own receive; the entry it removes is then one
    /// the consumer would have skipped as stale anyway. `true` always
    /// means exactly one entry was discarded.
    pub fn push(&self, request: RenderRequest) -> bool {
        let mut pending = request;
        let mut dropped = false;
        let mut retried = false;
        loop {
            match self.inner.try_send(pending) {
                Ok(()) => return dropped,
                Err(TrySendError::Full(back)) if !retried => {
                    pending = back;
                    retried = true;
                }
                Err(TrySendError::Full(back)) => {
                    pending = back;
                    retried = false;
                    if let Ok(old) = self.inner.try_receive() {
                        debug!("render: dropped stale update {:?}", old);
                        dropped = true;
                    }
                }
            }
        }
    }

    /// Wait for the next request.
    pub async fn pop(&self) -> RenderRequest {
        self.inner.receive().await
    }

    /// Block the calling thread until a request arrives.
    pub fn pop_blocking(&self) -> RenderRequest {
        futures_lite::future::block_on(self.pop())
    }

    /// Take a request if one is queued.
    pub fn try_pop(&self) -> Option<RenderRequest> {
        self.inner.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for UpdateChannel {
    fn default() -> Self {
        Self::new()
    }
}
