//! Rendering context for an SVG document renderer.
//!
//! [`Renderer`] owns a [`DrawingSurface`] and forwards drawing, clipping,
//! transform and quality-hint calls to it. It also tracks a stack of
//! [`Boundable`] scopes and measures text against the font baseline.
//!
//! Surfaces live in [`backends`]: an in-memory recording surface, a cairo
//! raster surface (feature `cairo`) and an SVG writer (feature `svg`).

pub mod api;
pub mod backends;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod text;

pub use api::{
    Bitmap, Boundable, Brush, Color, CombineMode, CompositingQuality, Dpi, DrawingSurface, FillRule,
    Gradient, GraphicsState, GraphicsUnit, Path, Pen, PixelOffsetMode, Region, RenderingHints,
    SmoothingMode, SurfaceFactory, SurfaceOptions, TextRenderingHint,
};
pub use error::{RenderError, Result};
pub use geometry::{Matrix, MatrixOrder, Point, PointF, RectF, SizeF};
pub use renderer::Renderer;
pub use text::{Font, FontMetrics, FontStyle};
