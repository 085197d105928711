//! Live vector overlay: the replayable description of committed marks plus
//! the ephemeral preview of an in-progress shape drag.
//!
//! Each item remembers the geometry it was committed with and the paper size
//! at commit time. Its live geometry is always recomputed from those two and
//! the current paper size, so repeated resizes never accumulate error and a
//! round trip back to the original size restores the exact coordinates.

use egui::{Color32, Pos2};

use crate::stroke::{Primitive, ShapeKind, StrokeRecord, shape_primitives};

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    id: usize,
    committed: StrokeRecord,
    /// Paper size when the record was committed
    origin: (u32, u32),
    /// Resize generation of the overlay when the record was committed
    generation: u64,
    live: StrokeRecord,
}

impl OverlayItem {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Geometry at the current paper size
    pub fn record(&self) -> &StrokeRecord {
        &self.live
    }

    /// Geometry as it was committed
    pub fn committed(&self) -> &StrokeRecord {
        &self.committed
    }

    pub fn origin(&self) -> (u32, u32) {
        self.origin
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn rescale_to(&mut self, size: (u32, u32)) {
        let sx = size.0 as f64 / self.origin.0 as f64;
        let sy = size.1 as f64 / self.origin.1 as f64;
        self.live = self.committed.scaled(sx, sy);
    }
}

/// How a preview part is shown while dragging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStyle {
    DashedOutline,
    TranslucentFill,
}

/// The in-progress shape drag; never persisted or rasterized
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPrimitive {
    pub kind: ShapeKind,
    pub from: Pos2,
    pub to: Pos2,
    pub color: Color32,
    pub width: f32,
    pub filled: bool,
}

impl PreviewPrimitive {
    /// One part per primitive: a single one for lines and ellipses, three for a cylinder
    pub fn parts(&self) -> Vec<(Primitive, PreviewStyle)> {
        let style = if self.filled && self.kind != ShapeKind::Line {
            PreviewStyle::TranslucentFill
        } else {
            PreviewStyle::DashedOutline
        };
        shape_primitives(self.kind, self.from, self.to, self.width, self.filled)
            .into_iter()
            .map(|primitive| (primitive, style))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct VectorOverlay {
    items: Vec<OverlayItem>,
    size: (u32, u32),
    preview: Option<PreviewPrimitive>,
    next_id: usize,
    /// Bumped by every rescale that changes the size
    generation: u64,
}

impl VectorOverlay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            items: Vec::new(),
            size: (width.max(1), height.max(1)),
            preview: None,
            next_id: 1,
            generation: 0,
        }
    }

    /// Paper size the live geometry is expressed in
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Record a committed mark at the current paper size, returning its id
    pub fn push(&mut self, record: StrokeRecord) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(OverlayItem {
            id,
            live: record.clone(),
            committed: record,
            origin: self.size,
            generation: self.generation,
        });
        id
    }

    /// Items in creation order
    pub fn items(&self) -> &[OverlayItem] {
        &self.items
    }

    pub fn records(&self) -> impl Iterator<Item = &StrokeRecord> {
        self.items.iter().map(OverlayItem::record)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-express every item at a new paper size
    pub fn rescale_to(&mut self, width: u32, height: u32) {
        let size = (width.max(1), height.max(1));
        if size != self.size {
            self.generation += 1;
        }
        self.size = size;
        for item in &mut self.items {
            item.rescale_to(self.size);
        }
    }

    /// Current resize generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Items committed since the last size change. Their marks were drawn
    /// into the raster at the current size and never resampled.
    pub fn unresampled(&self) -> impl Iterator<Item = &OverlayItem> {
        self.items.iter().filter(move |item| item.generation == self.generation)
    }

    /// Give every record painted in `from` the colour `to`, returning how many
    /// changed. Alpha is ignored when matching.
    pub fn recolor(&mut self, from: Color32, to: Color32) -> usize {
        let rgb = |c: Color32| [c.r(), c.g(), c.b()];
        if rgb(from) == rgb(to) {
            return 0;
        }
        let mut changed = 0;
        for item in &mut self.items {
            if rgb(item.committed.color()) == rgb(from) {
                item.committed.set_color(to);
                item.live.set_color(to);
                changed += 1;
            }
        }
        changed
    }

    /// Drop every committed item (the preview is left alone)
    pub fn clear_records(&mut self) {
        self.items.clear();
    }

    /// Drop everything, preview included
    pub fn clear(&mut self) {
        self.items.clear();
        self.preview = None;
    }

    pub fn preview(&self) -> Option<&PreviewPrimitive> {
        self.preview.as_ref()
    }

    /// Replace the preview; the newest pointer position always wins
    pub fn set_preview(&mut self, preview: PreviewPrimitive) {
        self.preview = Some(preview);
    }

    pub fn clear_preview(&mut self) {
        self.preview = None;
    }
}
