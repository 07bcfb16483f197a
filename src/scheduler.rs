use std::time::Instant;

use iced::Point;

use crate::config::Parameters;
use crate::field::Field;
use crate::render::{self, Surface};

/// Pointer position while the pointer is absent, far outside any surface.
pub const POINTER_SENTINEL: Point = Point {
    x: -1000.0,
    y: -1000.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub u64);

/// The host's per-frame callback primitive.
pub trait FrameHost {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame host backed by a periodic tick: a frame is due whenever one is
/// pending, so cancelling only has to forget the handle.
#[derive(Debug, Default)]
pub struct Ticker {
    next: u64,
}

impl FrameHost for Ticker {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        FrameHandle(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        tracing::trace!(?handle, "Frame cancelled");
    }
}

/// Owns everything the frame loop reads: the population, the surface bounds,
/// the pointer and the pending frame. Each signal has exactly one entry point.
///
/// The scheduler is Running while a frame is pending and Stopped otherwise.
pub struct Scheduler<H> {
    host: H,
    field: Field,
    parameters: Parameters,
    width: u32,
    height: u32,
    pointer: Point,
    pending: Option<FrameHandle>,
}

impl<H: FrameHost> Scheduler<H> {
    /// Starts in the Running state with the first frame already requested.
    pub fn start(mut host: H, field: Field, parameters: Parameters, width: u32, height: u32) -> Self {
        let pending = Some(host.request_frame());
        tracing::info!(particles = field.len(), width, height, "Animation started");
        Scheduler {
            host,
            field,
            parameters,
            width,
            height,
            pointer: POINTER_SENTINEL,
            pending,
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    #[cfg(test)]
    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    #[cfg(test)]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    #[cfg(test)]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            if self.pending.is_none() {
                self.pending = Some(self.host.request_frame());
                tracing::debug!("Animation resumed");
            }
        } else if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
            tracing::debug!("Animation paused");
        }
    }

    pub fn pointer_moved(&mut self, position: Point) {
        self.pointer = position;
    }

    pub fn pointer_left(&mut self) {
        self.pointer = POINTER_SENTINEL;
    }

    /// Particles are left where they are; anything now out of bounds wraps
    /// back in on the next advance.
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "Surface resized");
        self.width = width;
        self.height = height;
    }

    /// Runs the frame identified by `handle`: clear, advance, paint, request
    /// the next frame. Returns `false` for a handle that is no longer pending.
    pub fn run_frame<S: Surface + ?Sized>(&mut self, handle: FrameHandle, surface: &mut S) -> bool {
        if self.pending != Some(handle) {
            tracing::trace!(?handle, "Ignoring stale frame");
            return false;
        }
        self.pending = None;

        let start = Instant::now();

        surface.clear();
        self.field.advance(
            self.width as f32,
            self.height as f32,
            self.pointer,
            &self.parameters,
        );
        render::paint(&self.field, &self.parameters, surface);

        self.pending = Some(self.host.request_frame());

        tracing::trace!(duration = ?start.elapsed(), "Frame drawn");
        true
    }
}
