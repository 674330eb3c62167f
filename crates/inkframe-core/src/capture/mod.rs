//! Camera frame processing.
//!
//! # Threads
//!
//! - The capture source calls [`FrameSender::deliver`] from its own thread.
//!   Delivery never blocks: the queue holds a single frame by default and
//!   late frames are dropped and counted.
//! - One worker thread owns the [`FramePipeline`] (detector, region
//!   classifier, settings) and processes frames in arrival order.
//! - Results go to the UI thread as [`UiUpdate`] messages on a bounded
//!   queue. The worker never waits on the UI: while the queue is full new
//!   updates are dropped, so the UI should drain it every display frame.
//! - [`CaptureSession::set_device_orientation`] can be called from any
//!   thread; later frames are tagged with the matching video orientation.
//!
//! Each piece of pipeline state has exactly one writer, so no locks are
//! involved.

mod orientation;
mod pipeline;
mod session;

pub use orientation::{DeviceOrientation, VideoOrientation};
pub use pipeline::FramePipeline;
pub use session::{CaptureSession, FrameSender};

use crate::detect::Overlay;

/// A change for the UI thread to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Clear the classification label.
    ClearLabel,
    /// Show classification text for one region.
    Label(String),
    /// Replace all highlight overlays.
    Overlays(Vec<Overlay>),
    /// Show a non-fatal status message.
    Status(String),
}
