//! Frame capture and GIF generation for watching a run unfold

use std::path::Path;
use std::sync::mpsc::{Receiver, Sender, channel};

use image::{Delay, Frame, RgbaImage};
use tracing::debug;

use crate::algorithm::model::Model;
use crate::algorithm::wave::WaveSnapshot;
use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{Result, WfcError, invalid_parameter};
use crate::io::image::render_model;

/// One recorded state of a run
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Index of the recording within the run
    pub index: usize,
    /// Observation steps taken when recorded
    pub step: usize,
    /// Uncertainty map and committed tiles
    pub snapshot: WaveSnapshot,
    /// Rendered grid
    pub image: RgbaImage,
}

impl CapturedFrame {
    /// Record the current state of a model
    pub fn capture(model: &Model, index: usize) -> Self {
        Self {
            index,
            step: model.steps(),
            snapshot: model.snapshot(),
            image: render_model(model),
        }
    }
}

/// Collects frames from a model's step recorder
///
/// The recorder runs inside the model and hands frames over a channel, so
/// the capture can be attached to a model that is later moved to another
/// thread.
pub struct FrameCapture {
    frames: Vec<CapturedFrame>,
    sender: Sender<CapturedFrame>,
    receiver: Receiver<CapturedFrame>,
    limit: usize,
}

impl FrameCapture {
    /// Capture at most `limit` frames per run
    pub fn new(limit: usize) -> Self {
        let (sender, receiver) = channel();
        Self {
            frames: Vec::new(),
            sender,
            receiver,
            limit,
        }
    }

    /// Frame cap per run
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Install the recorder on a model
    pub fn attach(&self, model: &mut Model) {
        let sender = self.sender.clone();
        model.set_step_recorder(
            move |model, index| {
                if sender.send(CapturedFrame::capture(model, index)).is_err() {
                    debug!(frame = index, "frame capture dropped, discarding frame");
                }
            },
            Some(self.limit),
        );
    }

    /// Drop frames recorded by earlier runs
    pub fn clear(&mut self) {
        self.collect();
        self.frames.clear();
    }

    /// Move pending frames into the capture and return all of them
    pub fn collect(&mut self) -> &[CapturedFrame] {
        self.frames.extend(self.receiver.try_iter());
        &self.frames
    }

    /// Every collected frame, consuming the capture
    pub fn into_frames(mut self) -> Vec<CapturedFrame> {
        self.collect();
        self.frames
    }

    /// Export collected frames as a GIF with automatic frame skipping
    ///
    /// If `frame_delay_ms` is faster than viewers reliably play back, only
    /// every n-th frame is kept so the animation keeps its apparent speed.
    /// The final frame is held longer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(
        frames: &[CapturedFrame],
        output_path: &Path,
        frame_delay_ms: u32,
    ) -> Result<()> {
        if frames.is_empty() {
            return Err(invalid_parameter(
                "frames",
                &0,
                &"no frames captured for visualization",
            ));
        }

        let frame_delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        let delay = Delay::from_numer_denom_ms(effective_delay_ms, 1);
        let mut gif_frames: Vec<Frame> = frames
            .iter()
            .step_by(skip_factor)
            .map(|frame| Frame::from_parts(frame.image.clone(), 0, 0, delay))
            .collect();

        // Final frame displays longer for better visibility
        if let Some(last) = frames.last() {
            gif_frames.push(Frame::from_parts(
                last.image.clone(),
                0,
                0,
                Delay::from_numer_denom_ms(effective_delay_ms * 25, 1),
            ));
        }

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WfcError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| WfcError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(gif_frames)
            .map_err(|e| WfcError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }
}
