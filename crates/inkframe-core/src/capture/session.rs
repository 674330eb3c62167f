use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use tracing::{debug, error, info, warn};

use super::{DeviceOrientation, FramePipeline, UiUpdate, VideoOrientation};
use crate::bitmap::CameraFrame;
use crate::config::DetectionConfig;
use crate::error::{Error, Result};

/// Hands camera frames to the processing worker without ever blocking.
///
/// Cheap to clone; every clone feeds the same queue.
#[derive(Debug, Clone)]
pub struct FrameSender {
    frames: Sender<CameraFrame>,
    running: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
    video_orientation: Arc<AtomicU8>,
}

impl FrameSender {
    /// Offer a frame to the worker.
    ///
    /// Returns `true` if the frame was queued. A frame arriving while the
    /// queue is full is dropped and counted; frames arriving while the
    /// session is stopped are ignored.
    ///
    /// Once the session has a device orientation, the frame's orientation
    /// tag is replaced by the one that video orientation implies.
    pub fn deliver(&self, mut frame: CameraFrame) -> bool {
        if !self.running.load(Ordering::Acquire) {
            return false;
        }
        if let Some(video) = decode_orientation(self.video_orientation.load(Ordering::Acquire)) {
            frame.orientation = video.frame_orientation();
        }

        match self.frames.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(dropped, "worker busy, frame dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("frame worker has exited");
                false
            }
        }
    }
}

/// A camera session: one processing worker fed by a bounded frame queue,
/// reporting to the UI through [`UiUpdate`] messages.
///
/// Configure once, then start and stop as the view appears and disappears.
/// Restarting a configured session reuses the same worker.
pub struct CaptureSession {
    config: DetectionConfig,
    running: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
    video_orientation: Arc<AtomicU8>,
    ui_tx: Sender<UiUpdate>,
    ui_rx: Receiver<UiUpdate>,
    sender: Option<FrameSender>,
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl CaptureSession {
    pub fn new(config: DetectionConfig) -> Self {
        let (ui_tx, ui_rx) = bounded(config.ui_queue_capacity.max(1));
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            dropped: Arc::new(AtomicU64::new(0)),
            video_orientation: Arc::new(AtomicU8::new(ORIENTATION_UNSET)),
            ui_tx,
            ui_rx,
            sender: None,
            shutdown: None,
            worker: None,
        }
    }

    /// Spawn the processing worker around `pipeline` and return the handle
    /// the frame source delivers to.
    ///
    /// # Errors
    ///
    /// Returns `ResourceUnavailable` if the session is already configured,
    /// the pipeline has no detector, or the worker thread cannot be spawned.
    pub fn configure(&mut self, pipeline: FramePipeline) -> Result<FrameSender> {
        if self.sender.is_some() {
            return Err(Error::ResourceUnavailable("capture session already configured".into()));
        }
        if !pipeline.has_detector() {
            return Err(Error::ResourceUnavailable("no rectangle detector available".into()));
        }

        let (frame_tx, frame_rx) = bounded(self.config.frame_queue_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let ui_tx = self.ui_tx.clone();

        let worker = std::thread::Builder::new()
            .name("inkframe-capture".into())
            .spawn(move || run_worker(pipeline, frame_rx, shutdown_rx, ui_tx))
            .map_err(|e| Error::ResourceUnavailable(format!("cannot start capture worker: {}", e)))?;

        let sender = FrameSender {
            frames: frame_tx,
            running: self.running.clone(),
            dropped: self.dropped.clone(),
            video_orientation: self.video_orientation.clone(),
        };
        self.sender = Some(sender.clone());
        self.shutdown = Some(shutdown_tx);
        self.worker = Some(worker);
        info!(
            queue_capacity = self.config.frame_queue_capacity.max(1),
            "capture session configured"
        );
        Ok(sender)
    }

    /// Begin accepting frames.
    ///
    /// # Errors
    ///
    /// Returns `ResourceUnavailable` if the session was never configured.
    pub fn start(&mut self) -> Result<()> {
        if self.sender.is_none() {
            return Err(Error::ResourceUnavailable("capture session not configured".into()));
        }
        if !self.running.swap(true, Ordering::AcqRel) {
            info!("capture session started");
        }
        Ok(())
    }

    /// Stop accepting frames. Frames already queued are still processed.
    pub fn stop(&mut self) {
        if self.running.swap(false, Ordering::AcqRel) {
            info!("capture session stopped");
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.sender.is_some()
    }

    /// The frame handle, once configured.
    pub fn frame_sender(&self) -> Option<FrameSender> {
        self.sender.clone()
    }

    /// Follow the device's physical orientation. Frames delivered from now
    /// on are tagged for the matching video orientation.
    pub fn set_device_orientation(&self, device: DeviceOrientation) {
        let video = VideoOrientation::from(device);
        self.video_orientation
            .store(encode_orientation(video), Ordering::Release);
        debug!(?device, ?video, "video orientation updated");
    }

    /// Video orientation frames are tagged for, if one has been set.
    pub fn video_orientation(&self) -> Option<VideoOrientation> {
        decode_orientation(self.video_orientation.load(Ordering::Acquire))
    }

    /// Receiver for UI updates. The UI thread drains this; the queue holds
    /// `ui_queue_capacity` updates and newer ones are dropped while it is
    /// full.
    pub fn ui_updates(&self) -> Receiver<UiUpdate> {
        self.ui_rx.clone()
    }

    /// Frames dropped because the worker was busy.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);

        // Signal the worker to stop
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        // Wait for worker thread to finish
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn run_worker(
    mut pipeline: FramePipeline,
    frames: Receiver<CameraFrame>,
    shutdown: Receiver<()>,
    ui: Sender<UiUpdate>,
) {
    debug!("capture worker starting");
    loop {
        select! {
            recv(shutdown) -> _ => break,
            recv(frames) -> msg => match msg {
                Ok(frame) => process_frame(&mut pipeline, &frame, &ui),
                Err(_) => break,
            },
        }
    }
    debug!("capture worker exiting");
}

/// Process one frame, turning errors and panics into log lines so the
/// worker keeps going.
fn process_frame(pipeline: &mut FramePipeline, frame: &CameraFrame, ui: &Sender<UiUpdate>) {
    match panic::catch_unwind(AssertUnwindSafe(|| pipeline.process(frame))) {
        Ok(Ok(updates)) => {
            for update in updates {
                post(ui, update);
            }
        }
        Ok(Err(e)) => {
            warn!(error = %e, "frame processing failed");
            if matches!(e, Error::ResourceUnavailable(_)) {
                post(ui, UiUpdate::Status(e.to_string()));
            }
        }
        Err(_) => error!("frame processing panicked, frame skipped"),
    }
}

/// Hand an update to the UI without blocking the worker.
fn post(ui: &Sender<UiUpdate>, update: UiUpdate) {
    if let Err(TrySendError::Full(update)) = ui.try_send(update) {
        warn!(?update, "UI queue full, update dropped");
    }
}

const ORIENTATION_UNSET: u8 = 0;

fn encode_orientation(video: VideoOrientation) -> u8 {
    match video {
        VideoOrientation::Portrait => 1,
        VideoOrientation::PortraitUpsideDown => 2,
        VideoOrientation::LandscapeRight => 3,
        VideoOrientation::LandscapeLeft => 4,
    }
}

fn decode_orientation(value: u8) -> Option<VideoOrientation> {
    match value {
        1 => Some(VideoOrientation::Portrait),
        2 => Some(VideoOrientation::PortraitUpsideDown),
        3 => Some(VideoOrientation::LandscapeRight),
        4 => Some(VideoOrientation::LandscapeLeft),
        _ => None,
    }
}
