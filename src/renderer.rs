use egui::{Color32, ColorImage, Painter, Pos2, Rect, Shape, Stroke, TextureHandle, TextureOptions, pos2, vec2};

use crate::overlay::{PreviewPrimitive, PreviewStyle};
use crate::raster::RasterBuffer;
use crate::stroke::{Primitive, StrokeRecord};
use crate::surface::{DrawingSurface, Gesture};
use crate::widgets::ResizeHandle;

const OUTLINE_COLOR: Color32 = Color32::from_gray(120);
const PREVIEW_ALPHA: f32 = 0.35;
const DASH_LENGTH: f32 = 6.0;
const GAP_LENGTH: f32 = 4.0;
/// Points used to approximate a dashed ellipse outline
const ELLIPSE_SEGMENTS: usize = 48;

/// Draws one drawing surface with egui.
///
/// The raster buffer is uploaded as a texture only when its revision changes;
/// overlay records, the shape preview, the paper outline and the resize
/// handles are painted as egui shapes on top.
#[derive(Default)]
pub struct Renderer {
    texture: Option<TextureHandle>,
    /// Raster revision currently held by `texture`
    uploaded_revision: Option<u64>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploaded_revision(&self) -> Option<u64> {
        self.uploaded_revision
    }

    fn sync_texture(&mut self, ctx: &egui::Context, raster: &RasterBuffer) -> egui::TextureId {
        let revision = raster.revision();
        if let Some(handle) = &mut self.texture {
            if self.uploaded_revision != Some(revision) {
                handle.set(to_color_image(raster), TextureOptions::NEAREST);
                self.uploaded_revision = Some(revision);
            }
            return handle.id();
        }

        let handle = ctx.load_texture("raster", to_color_image(raster), TextureOptions::NEAREST);
        let id = handle.id();
        self.texture = Some(handle);
        self.uploaded_revision = Some(revision);
        id
    }

    /// Paint `surface` with the paper's top-left corner at `origin` (screen space)
    pub fn render(&mut self, ctx: &egui::Context, painter: &Painter, origin: Pos2, surface: &DrawingSurface) {
        let paper = surface.paper();
        let paper_rect = paper.rect().translate(origin.to_vec2());

        painter.rect_filled(paper_rect, 0.0, paper.background());
        let texture = self.sync_texture(ctx, surface.raster());
        painter.image(
            texture,
            paper_rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        for record in surface.overlay().records() {
            painter.extend(record_shapes(record, origin));
        }
        if let Some(preview) = surface.overlay().preview() {
            painter.extend(preview_shapes(preview, origin));
        }

        painter.rect_stroke(paper_rect, 0.0, Stroke::new(1.0, OUTLINE_COLOR));

        let active = match surface.gesture() {
            Gesture::Resizing { handle, .. } => Some(*handle),
            _ => None,
        };
        for handle in ResizeHandle::ALL {
            handle.draw(painter, origin, paper, active == Some(handle));
        }
    }
}

fn to_color_image(raster: &RasterBuffer) -> ColorImage {
    let (width, height) = raster.dimensions();
    ColorImage::from_rgb([width as usize, height as usize], raster.image().as_raw())
}

/// Shapes for a committed record at its live geometry.
/// Text marks have no shapes here: the bitmap glyphs are only visible through the raster texture.
pub fn record_shapes(record: &StrokeRecord, origin: Pos2) -> Vec<Shape> {
    let color = record.color();
    record
        .primitives()
        .iter()
        .flat_map(|primitive| solid_shapes(primitive, color, origin))
        .collect()
}

/// Shapes for the in-progress drag
pub fn preview_shapes(preview: &PreviewPrimitive, origin: Pos2) -> Vec<Shape> {
    preview
        .parts()
        .iter()
        .flat_map(|(primitive, style)| match style {
            PreviewStyle::DashedOutline => dashed_shapes(primitive, preview.color, origin),
            PreviewStyle::TranslucentFill => solid_shapes(primitive, preview.color.gamma_multiply(PREVIEW_ALPHA), origin),
        })
        .collect()
}

fn solid_shapes(primitive: &Primitive, color: Color32, origin: Pos2) -> Vec<Shape> {
    let offset = origin.to_vec2();
    match primitive {
        Primitive::Line { from, to, width } => {
            vec![Shape::line_segment([*from + offset, *to + offset], Stroke::new(*width, color))]
        }
        Primitive::Ellipse { rect, filled, width } => {
            let rect = rect.translate(offset);
            let radius = rect.size() / 2.0;
            if *filled {
                vec![Shape::ellipse_filled(rect.center(), radius, color)]
            } else {
                vec![Shape::ellipse_stroke(rect.center(), radius, Stroke::new(*width, color))]
            }
        }
        Primitive::Rect { rect, filled, width } => {
            let rect = rect.translate(offset);
            if *filled {
                vec![Shape::rect_filled(rect, 0.0, color)]
            } else {
                vec![Shape::rect_stroke(rect, 0.0, Stroke::new(*width, color))]
            }
        }
        Primitive::Sides { rect, width } => {
            let rect = rect.translate(offset);
            let stroke = Stroke::new(*width, color);
            vec![
                Shape::line_segment([rect.left_top(), rect.left_bottom()], stroke),
                Shape::line_segment([rect.right_top(), rect.right_bottom()], stroke),
            ]
        }
        Primitive::Text { .. } => Vec::new(),
    }
}

fn dashed_shapes(primitive: &Primitive, color: Color32, origin: Pos2) -> Vec<Shape> {
    let offset = origin.to_vec2();
    let dashed = |points: &[Pos2], width: f32| Shape::dashed_line(points, Stroke::new(width, color), DASH_LENGTH, GAP_LENGTH);
    match primitive {
        Primitive::Line { from, to, width } => dashed(&[*from + offset, *to + offset], *width),
        Primitive::Ellipse { rect, width, .. } => dashed(&ellipse_points(rect.translate(offset)), *width),
        Primitive::Rect { rect, width, .. } => {
            let rect = rect.translate(offset);
            let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom(), rect.left_top()];
            dashed(&corners, *width)
        }
        Primitive::Sides { rect, width } => {
            let rect = rect.translate(offset);
            let mut shapes = dashed(&[rect.left_top(), rect.left_bottom()], *width);
            shapes.extend(dashed(&[rect.right_top(), rect.right_bottom()], *width));
            shapes
        }
        Primitive::Text { .. } => Vec::new(),
    }
}

/// Closed polyline around the ellipse inscribed in `rect`
fn ellipse_points(rect: Rect) -> Vec<Pos2> {
    let center = rect.center();
    let radius = rect.size() / 2.0;
    (0..=ELLIPSE_SEGMENTS)
        .map(|i| {
            let angle = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
            center + vec2(radius.x * angle.cos(), radius.y * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::stroke::ShapeKind;

    fn painter(ctx: &egui::Context) -> Painter {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 200.0));
        Painter::new(ctx.clone(), egui::LayerId::background(), rect)
    }

    #[test]
    fn test_texture_follows_raster_revision() {
        let ctx = egui::Context::default();
        let painter = painter(&ctx);
        let mut session = Session::new();
        let mut surface = DrawingSurface::with_paper(&mut session, 40, 30, Color32::WHITE);
        let mut renderer = Renderer::new();
        assert_eq!(renderer.uploaded_revision(), None);

        renderer.render(&ctx, &painter, pos2(10.0, 10.0), &surface);
        assert_eq!(renderer.uploaded_revision(), Some(surface.raster().revision()));

        surface.clear();
        renderer.render(&ctx, &painter, pos2(10.0, 10.0), &surface);
        assert_eq!(renderer.uploaded_revision(), Some(surface.raster().revision()));
    }

    #[test]
    fn test_cylinder_record_shapes() {
        let record = StrokeRecord::Shape {
            kind: ShapeKind::Cylinder,
            from: pos2(0.0, 0.0),
            to: pos2(40.0, 80.0),
            color: Color32::RED,
            width: 2.0,
            filled: false,
        };
        // Two body sides plus two caps
        assert_eq!(record_shapes(&record, Pos2::ZERO).len(), 4);
    }

    #[test]
    fn test_text_marks_have_no_shapes() {
        let record = StrokeRecord::TextMark {
            anchor: pos2(5.0, 5.0),
            text: "abc".to_owned(),
            color: Color32::BLACK,
        };
        assert!(record_shapes(&record, Pos2::ZERO).is_empty());
    }

    #[test]
    fn test_filled_preview_is_translucent() {
        let preview = PreviewPrimitive {
            kind: ShapeKind::Ellipse,
            from: pos2(0.0, 0.0),
            to: pos2(20.0, 10.0),
            color: Color32::RED,
            width: 1.0,
            filled: true,
        };
        let shapes = preview_shapes(&preview, Pos2::ZERO);
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Ellipse(ellipse) => assert!(ellipse.fill.a() < 255),
            other => panic!("unexpected shape {:?}", other),
        }
    }
}
