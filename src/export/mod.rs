//! Frame-sequence exporters used by performance replay.

pub mod gif;

use image::RgbImage;

use crate::error::Result;

pub use self::gif::GifExporter;

/// Consumes the ordered frames of a replay and persists them.
pub trait FrameExporter {
    fn export(&mut self, frames: &[RgbImage]) -> Result<()>;
}

/// Exporter that discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullExporter;

impl FrameExporter for NullExporter {
    fn export(&mut self, _frames: &[RgbImage]) -> Result<()> {
        Ok(())
    }
}
