//! Render task: the consumer side of the update channel.
//!
//! Owns the display handle for its whole lifetime. Blocks indefinitely on
//! the channel, so display latency never reaches the control loop.

use log::{debug, info};

use super::channel::UpdateChannel;
use super::screen::Screen;
use super::RenderRequest;
use crate::app::ports::Display;

pub struct RenderTask<D: Display> {
    updates: &'static UpdateChannel,
    display: D,
    frames: u64,
}

impl<D: Display> RenderTask<D> {
    pub fn new(updates: &'static UpdateChannel, display: D) -> Self {
        Self {
            updates,
            display,
            frames: 0,
        }
    }

    /// Wait for the next request, skip anything older than the newest
    /// queued one, and draw it. Returns the request that was drawn.
    pub async fn render_next(&mut self) -> RenderRequest {
        let mut request = self.updates.pop().await;
        while let Some(newer) = self.updates.try_pop() {
            debug!("render: superseded {:?}", request);
            request = newer;
        }
        self.draw(&request);
        request
    }

    /// Draw whatever is queued without waiting. Returns `None` if the
    /// channel was empty.
    pub fn render_pending(&mut self) -> Option<RenderRequest> {
        let mut request = self.updates.try_pop()?;
        while let Some(newer) = self.updates.try_pop() {
            request = newer;
        }
        self.draw(&request);
        Some(request)
    }

    /// Run forever on the calling thread.
    pub fn run(mut self) -> ! {
        info!("render task started");
        loop {
            futures_lite::future::block_on(self.render_next());
        }
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    fn draw(&mut self, request: &RenderRequest) {
        let screen = Screen::layout(request);
        self.display.show(&screen);
        self.frames += 1;
    }
}
