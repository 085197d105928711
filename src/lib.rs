#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod codec;
pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod overlay;
pub mod panels;
pub mod paper;
pub mod raster;
pub mod renderer;
pub mod session;
pub mod stroke;
pub mod surface;
pub mod tool;
pub mod widgets;

pub use app::PaintApp;
pub use compositor::ExportCompositor;
pub use config::SurfaceConfig;
pub use error::{SurfaceError, SurfaceResult};
pub use host::{CloseChoice, FileDialogs, FileFilter, HostContainer, IMAGE_FILTERS, Prompts};
pub use overlay::{PreviewPrimitive, VectorOverlay};
pub use paper::Paper;
pub use raster::RasterBuffer;
pub use renderer::Renderer;
pub use session::Session;
pub use stroke::{ShapeKind, StrokeRecord};
pub use surface::{CloseOutcome, DrawingSurface, Gesture, OpenOutcome, SaveOutcome};
pub use tool::{ShapeMode, Tool, ToolState};
