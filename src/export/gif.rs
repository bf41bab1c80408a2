use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::FrameExporter;
use crate::error::{DqnError, Result};

/// Writes frames as an infinitely looping animated GIF.
#[derive(Debug, Clone)]
pub struct GifExporter {
    path: PathBuf,
    frame_delay_ms: u32,
}

impl GifExporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        GifExporter {
            path: path.as_ref().to_path_buf(),
            frame_delay_ms: 20,
        }
    }

    /// Display time of each frame. GIF stores delays in hundredths of a second.
    pub fn with_frame_delay_ms(mut self, frame_delay_ms: u32) -> Self {
        self.frame_delay_ms = frame_delay_ms;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameExporter for GifExporter {
    fn export(&mut self, frames: &[RgbImage]) -> Result<()> {
        if frames.is_empty() {
            return Err(DqnError::EmptyBuffer("no frames to write to GIF".to_string()));
        }

        let file = BufWriter::new(File::create(&self.path)?);
        let mut encoder = GifEncoder::new(file);
        encoder.set_repeat(Repeat::Infinite)?;

        let delay = Delay::from_numer_denom_ms(self.frame_delay_ms, 1);
        let frames = frames.iter().map(|rgb| {
            let rgba = DynamicImage::ImageRgb8(rgb.clone()).into_rgba8();
            Frame::from_parts(rgba, 0, 0, delay)
        });
        encoder.encode_frames(frames)?;

        tracing::info!(path = %self.path.display(), "wrote replay animation");
        Ok(())
    }
}
