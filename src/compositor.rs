use image::RgbImage;
use log::debug;

use crate::overlay::VectorOverlay;
use crate::paper::Paper;
use crate::raster::RasterBuffer;

/// Flattens background, raster content and overlay into one bitmap.
///
/// Read-only over its inputs, so composing twice without an intervening
/// mutation yields identical bitmaps.
pub struct ExportCompositor<'a> {
    paper: &'a Paper,
    raster: &'a RasterBuffer,
    overlay: &'a VectorOverlay,
}

impl<'a> ExportCompositor<'a> {
    pub fn new(paper: &'a Paper, raster: &'a RasterBuffer, overlay: &'a VectorOverlay) -> Self {
        Self { paper, raster, overlay }
    }

    /// Background, then the raster buffer resampled to paper size, then every
    /// overlay record at its live geometry in creation order.
    pub fn compose(&self) -> RgbImage {
        let (width, height) = self.paper.size();
        let mut canvas = RasterBuffer::new(width, height, self.paper.background());

        if self.raster.width() > 0 && self.raster.height() > 0 {
            canvas.paste_image(self.raster.image());
        }

        for record in self.overlay.records() {
            canvas.apply(record);
        }

        debug!("Composed {}x{} bitmap with {} overlay records", width, height, self.overlay.len());
        canvas.into_image()
    }
}
