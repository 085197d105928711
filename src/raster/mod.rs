//! Persistent pixel storage for a drawing surface.
//!
//! Every committed mark is rasterized here at commit time; this buffer is what
//! gets saved, exported and flood-filled. All primitives clip against the
//! bitmap, so any coordinates (including negative or huge ones) are accepted.

pub mod fill;
pub mod text;

use egui::{Color32, Pos2, Rect};
use image::imageops::{self, FilterType};
use image::RgbImage;
use log::debug;

use crate::color::{from_pixel, to_pixel};
use crate::geometry::{distance_to_segment, pixel_span};
use crate::stroke::{Primitive, StrokeRecord};

/// Filter used whenever the buffer is stretched to a new size
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

#[derive(Clone)]
pub struct RasterBuffer {
    image: RgbImage,
    /// Bumped on every mutation so renderers know when to re-upload
    revision: u64,
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("revision", &self.revision)
            .finish()
    }
}

impl RasterBuffer {
    /// New buffer filled with `fill`. Dimensions are clamped to at least 1.
    pub fn new(width: u32, height: u32, fill: Color32) -> Self {
        Self {
            image: RgbImage::from_pixel(width.max(1), height.max(1), to_pixel(fill)),
            revision: 0,
        }
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image, revision: 0 }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if x < self.width() && y < self.height() {
            Some(from_pixel(*self.image.get_pixel(x, y)))
        } else {
            None
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Paint the whole buffer with one colour
    pub fn clear(&mut self, color: Color32) {
        let pixel = to_pixel(color);
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
        self.touch();
    }

    /// Stretch the content to a new size (lossy). Dimensions are clamped to at least 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == self.dimensions() {
            return;
        }
        debug!("Resampling raster {:?} -> {}x{}", self.dimensions(), width, height);
        self.image = imageops::resize(&self.image, width, height, RESAMPLE_FILTER);
        self.touch();
    }

    /// Replace the content with `source` resampled to the buffer's current size
    pub fn paste_image(&mut self, source: &RgbImage) {
        if source.width() == 0 || source.height() == 0 {
            return;
        }
        let (width, height) = self.dimensions();
        self.image = if source.dimensions() == (width, height) {
            source.clone()
        } else {
            imageops::resize(source, width, height, RESAMPLE_FILTER)
        };
        self.touch();
    }

    /// Make this buffer a copy of `base` resampled to `width` x `height`.
    /// The revision keeps increasing, even though the pixels come from an older snapshot.
    pub fn resample_from(&mut self, base: &RasterBuffer, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        self.image = if base.dimensions() == (width, height) || base.width() == 0 || base.height() == 0 {
            base.image.clone()
        } else {
            imageops::resize(&base.image, width, height, RESAMPLE_FILTER)
        };
        self.touch();
    }

    /// Replace every pixel of colour `from` with `to`, returning how many changed
    pub fn replace_color(&mut self, from: Color32, to: Color32) -> usize {
        let (from, to) = (to_pixel(from), to_pixel(to));
        if from == to {
            return 0;
        }
        let mut changed = 0;
        for p in self.image.pixels_mut() {
            if *p == from {
                *p = to;
                changed += 1;
            }
        }
        if changed > 0 {
            self.touch();
        }
        changed
    }

    /// Thick line with round caps: every pixel within `width / 2` of the segment
    pub fn draw_line(&mut self, from: Pos2, to: Pos2, color: Color32, width: f32) {
        let radius = (width / 2.0).max(0.5);
        let Some((x0, x1)) = pixel_span(from.x.min(to.x) - radius, from.x.max(to.x) + radius, self.width()) else {
            return;
        };
        let Some((y0, y1)) = pixel_span(from.y.min(to.y) - radius, from.y.max(to.y) + radius, self.height()) else {
            return;
        };

        let pixel = to_pixel(color);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Pos2::new(x as f32, y as f32);
                if distance_to_segment(p, from, to) <= radius {
                    self.image.put_pixel(x, y, pixel);
                }
            }
        }
        self.touch();
    }

    /// Ellipse inscribed in `bbox`, optionally filled and/or outlined with `width`
    pub fn draw_ellipse(&mut self, bbox: Rect, fill: Option<Color32>, outline: Option<Color32>, width: f32) {
        if let Some(color) = fill {
            self.ellipse_pixels(bbox, None, color);
        }
        if let Some(color) = outline {
            self.ellipse_pixels(bbox, Some(width.max(1.0)), color);
        }
    }

    /// `ring == None` paints the full disc, otherwise only a band `ring` pixels thick
    fn ellipse_pixels(&mut self, bbox: Rect, ring: Option<f32>, color: Color32) {
        let Some((x0, x1)) = pixel_span(bbox.min.x, bbox.max.x, self.width()) else {
            return;
        };
        let Some((y0, y1)) = pixel_span(bbox.min.y, bbox.max.y, self.height()) else {
            return;
        };

        let center = bbox.center();
        let rx = (bbox.width() / 2.0).max(0.5);
        let ry = (bbox.height() / 2.0).max(0.5);
        let inside = |x: f32, y: f32, rx: f32, ry: f32| {
            let dx = (x - center.x) / rx;
            let dy = (y - center.y) / ry;
            dx * dx + dy * dy <= 1.0
        };
        // Inner radii <= 0 means the band covers the whole disc
        let inner = ring.map(|w| (rx - w, ry - w)).filter(|&(irx, iry)| irx > 0.0 && iry > 0.0);

        let pixel = to_pixel(color);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (fx, fy) = (x as f32, y as f32);
                if !inside(fx, fy, rx, ry) {
                    continue;
                }
                if let Some((irx, iry)) = inner {
                    if inside(fx, fy, irx, iry) {
                        continue;
                    }
                }
                self.image.put_pixel(x, y, pixel);
            }
        }
        self.touch();
    }

    /// Solid rectangle, `bbox` inclusive
    pub fn fill_rect(&mut self, bbox: Rect, color: Color32) {
        let Some((x0, x1)) = pixel_span(bbox.min.x, bbox.max.x, self.width()) else {
            return;
        };
        let Some((y0, y1)) = pixel_span(bbox.min.y, bbox.max.y, self.height()) else {
            return;
        };
        let pixel = to_pixel(color);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.image.put_pixel(x, y, pixel);
            }
        }
        self.touch();
    }

    /// Stamp `text` with its top-left corner at `pos`
    pub fn draw_text(&mut self, pos: Pos2, text: &str, color: Color32) {
        let pixel = to_pixel(color);
        let (ox, oy) = (pos.x.round() as i64, pos.y.round() as i64);
        let (w, h) = (self.width() as i64, self.height() as i64);
        for (dx, dy) in text::glyph_pixels(text) {
            let (x, y) = (ox + dx as i64, oy + dy as i64);
            if (0..w).contains(&x) && (0..h).contains(&y) {
                self.image.put_pixel(x as u32, y as u32, pixel);
            }
        }
        self.touch();
    }

    /// 4-connected region fill. Returns the number of pixels repainted.
    pub fn flood_fill(&mut self, x: u32, y: u32, color: Color32) -> usize {
        let changed = fill::flood_fill(&mut self.image, x, y, to_pixel(color));
        if changed > 0 {
            self.touch();
        }
        changed
    }

    pub fn draw_primitive(&mut self, primitive: &Primitive, color: Color32) {
        match primitive {
            Primitive::Line { from, to, width } => self.draw_line(*from, *to, color, *width),
            Primitive::Ellipse { rect, filled, width } => {
                if *filled {
                    self.draw_ellipse(*rect, Some(color), None, *width);
                } else {
                    self.draw_ellipse(*rect, None, Some(color), *width);
                }
            }
            Primitive::Rect { rect, filled, width } => {
                if *filled {
                    self.fill_rect(*rect, color);
                } else {
                    let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
                    for i in 0..4 {
                        self.draw_line(corners[i], corners[(i + 1) % 4], color, *width);
                    }
                }
            }
            Primitive::Sides { rect, width } => {
                self.draw_line(rect.left_top(), rect.left_bottom(), color, *width);
                self.draw_line(rect.right_top(), rect.right_bottom(), color, *width);
            }
            Primitive::Text { anchor, text } => self.draw_text(*anchor, text, color),
        }
    }

    /// Rasterize a committed record
    pub fn apply(&mut self, record: &StrokeRecord) {
        let color = record.color();
        for primitive in record.primitives() {
            self.draw_primitive(&primitive, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn count(buffer: &RasterBuffer, color: Color32) -> usize {
        buffer.image().pixels().filter(|p| **p == to_pixel(color)).count()
    }

    #[test]
    fn test_new_clamps_zero_dimensions() {
        let buffer = RasterBuffer::new(0, 0, Color32::WHITE);
        assert_eq!(buffer.dimensions(), (1, 1));
        assert_eq!(buffer.pixel(0, 0), Some(Color32::WHITE));
        assert_eq!(buffer.pixel(1, 0), None);
    }

    #[test]
    fn test_line_width() {
        let mut buffer = RasterBuffer::new(50, 50, Color32::WHITE);
        buffer.draw_line(pos2(10.0, 25.0), pos2(40.0, 25.0), Color32::RED, 5.0);
        // Radius 2.5 covers rows 23..=27
        for y in 23..=27 {
            assert_eq!(buffer.pixel(25, y), Some(Color32::RED), "row {}", y);
        }
        assert_eq!(buffer.pixel(25, 22), Some(Color32::WHITE));
        assert_eq!(buffer.pixel(25, 28), Some(Color32::WHITE));
        // Round cap reaches past the end point
        assert_eq!(buffer.pixel(42, 25), Some(Color32::RED));
    }

    #[test]
    fn test_primitives_clip_instead_of_failing() {
        let mut buffer = RasterBuffer::new(10, 10, Color32::WHITE);
        buffer.draw_line(pos2(-100.0, -100.0), pos2(200.0, 200.0), Color32::BLACK, 3.0);
        buffer.draw_ellipse(Rect::from_min_max(pos2(-50.0, -50.0), pos2(-10.0, -10.0)), Some(Color32::RED), None, 1.0);
        buffer.fill_rect(Rect::from_min_max(pos2(8.0, 8.0), pos2(1e9, 1e9)), Color32::BLUE);
        buffer.draw_text(pos2(-1000.0, 5.0), "offscreen", Color32::RED);
        buffer.draw_line(pos2(f32::NAN, 0.0), pos2(1.0, 1.0), Color32::RED, 1.0);

        assert_eq!(buffer.pixel(0, 0), Some(Color32::BLACK));
        assert_eq!(buffer.pixel(9, 9), Some(Color32::BLUE));
        assert_eq!(count(&buffer, Color32::RED), 0);
    }

    #[test]
    fn test_zero_area_bitmap_is_a_noop() {
        let mut buffer = RasterBuffer::from_image(RgbImage::new(0, 0));
        buffer.draw_line(pos2(0.0, 0.0), pos2(5.0, 5.0), Color32::RED, 2.0);
        buffer.fill_rect(Rect::from_min_max(pos2(0.0, 0.0), pos2(5.0, 5.0)), Color32::RED);
        buffer.draw_ellipse(Rect::from_min_max(pos2(0.0, 0.0), pos2(5.0, 5.0)), Some(Color32::RED), None, 1.0);
        assert_eq!(buffer.flood_fill(0, 0, Color32::RED), 0);
        assert_eq!(buffer.dimensions(), (0, 0));
    }

    #[test]
    fn test_filled_and_outlined_ellipse() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(50.0, 30.0));

        let mut filled = RasterBuffer::new(60, 40, Color32::WHITE);
        filled.draw_ellipse(rect, Some(Color32::RED), None, 1.0);
        assert_eq!(filled.pixel(30, 20), Some(Color32::RED));
        assert_eq!(filled.pixel(10, 10), Some(Color32::WHITE));

        let mut outlined = RasterBuffer::new(60, 40, Color32::WHITE);
        outlined.draw_ellipse(rect, None, Some(Color32::RED), 2.0);
        assert_eq!(outlined.pixel(30, 20), Some(Color32::WHITE));
        assert_eq!(outlined.pixel(10, 20), Some(Color32::RED));
        assert_eq!(outlined.pixel(30, 10), Some(Color32::RED));
        assert!(count(&outlined, Color32::RED) < count(&filled, Color32::RED));
    }

    #[test]
    fn test_resize_stretches_content() {
        let mut buffer = RasterBuffer::new(40, 20, Color32::WHITE);
        buffer.fill_rect(Rect::from_min_max(pos2(0.0, 0.0), pos2(19.0, 19.0)), Color32::BLACK);
        buffer.resize(80, 20);
        assert_eq!(buffer.dimensions(), (80, 20));
        // The left half is still dark, the right half still light
        assert!(buffer.pixel(20, 10).map_or(false, |c| c.r() < 64));
        assert!(buffer.pixel(70, 10).map_or(false, |c| c.r() > 192));

        buffer.resize(0, 0);
        assert_eq!(buffer.dimensions(), (1, 1));
    }

    #[test]
    fn test_same_size_resize_keeps_pixels() {
        let mut buffer = RasterBuffer::new(20, 20, Color32::WHITE);
        buffer.draw_line(pos2(2.0, 2.0), pos2(17.0, 9.0), Color32::RED, 3.0);
        let before = buffer.image().clone();
        let revision = buffer.revision();
        buffer.resize(20, 20);
        assert_eq!(buffer.image(), &before);
        assert_eq!(buffer.revision(), revision);
    }

    #[test]
    fn test_paste_image_resamples_to_buffer_size() {
        let mut buffer = RasterBuffer::new(30, 30, Color32::WHITE);
        let source = RgbImage::from_pixel(7, 3, to_pixel(Color32::BLACK));
        buffer.paste_image(&source);
        assert_eq!(buffer.dimensions(), (30, 30));
        assert_eq!(buffer.pixel(15, 15), Some(Color32::BLACK));
    }

    #[test]
    fn test_text_stamp_marks_pixels() {
        let mut buffer = RasterBuffer::new(100, 40, Color32::WHITE);
        buffer.draw_text(pos2(4.0, 4.0), "Hi", Color32::BLUE);
        assert!(count(&buffer, Color32::BLUE) > 0);
        // Nothing above or left of the anchor
        assert!(buffer.image().enumerate_pixels().all(|(x, y, p)| *p != to_pixel(Color32::BLUE) || (x >= 4 && y >= 4)));
    }

    #[test]
    fn test_replace_color() {
        let mut buffer = RasterBuffer::new(10, 10, Color32::WHITE);
        buffer.fill_rect(Rect::from_min_max(pos2(0.0, 0.0), pos2(4.0, 9.0)), Color32::RED);
        assert_eq!(buffer.replace_color(Color32::WHITE, Color32::BLUE), 50);
        assert_eq!(count(&buffer, Color32::RED), 50);
        assert_eq!(buffer.replace_color(Color32::BLUE, Color32::BLUE), 0);
    }
}
