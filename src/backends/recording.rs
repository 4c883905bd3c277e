use std::cell::Cell;
use std::rc::Rc;

use crate::api::*;
use crate::backends::font_catalog::{FontCatalog, FontFace};
use crate::error::{RenderError, Result};
use crate::geometry::{Matrix, MatrixOrder, Point, RectF};
use crate::text::{Font, FontMetrics};

/// Largest text contrast value accepted by the recording surface.
pub const MAX_TEXT_CONTRAST: u32 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub transform: Matrix,
    pub clip: Region,
    pub hints: RenderingHints,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillPath {
        path: Path,
        brush: Brush,
        state: Snapshot,
    },
    StrokePath {
        path: Path,
        pen: Pen,
        state: Snapshot,
    },
    DrawImageUnscaled {
        source_width: u32,
        source_height: u32,
        location: Point,
        state: Snapshot,
    },
    DrawImage {
        source_width: u32,
        source_height: u32,
        dest: RectF,
        src: RectF,
        unit: GraphicsUnit,
        state: Snapshot,
    },
}

#[derive(Clone, Debug, Default)]
struct RecorderState {
    transform: Matrix,
    clip: Region,
    hints: RenderingHints,
}

/// Shared count of `release` calls, readable after the surface is gone.
#[derive(Clone, Debug, Default)]
pub struct ReleaseTracker(Rc<Cell<u32>>);

impl ReleaseTracker {
    pub fn count(&self) -> u32 {
        self.0.get()
    }
}

/// In-memory surface that keeps a display list of every draw call along
/// with the transform, clip and hints in effect at the time.
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    state: RecorderState,
    stack: Vec<(GraphicsState, RecorderState)>,
    next_state_id: u32,
    dpi: Dpi,
    fonts: FontCatalog,
    target: Option<Bitmap>,
    released: ReleaseTracker,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::with_options(&SurfaceOptions::default())
    }

    pub fn with_options(options: &SurfaceOptions) -> Self {
        Self {
            ops: Vec::new(),
            state: RecorderState {
                hints: options.hints,
                ..RecorderState::default()
            },
            stack: Vec::new(),
            next_state_id: 0,
            dpi: options.dpi,
            fonts: FontCatalog::new(),
            target: None,
            released: ReleaseTracker::default(),
        }
    }

    pub fn register_font(&mut self, face: FontFace) {
        self.fonts.register(face);
    }

    pub fn with_font(mut self, face: FontFace) -> Self {
        self.register_font(face);
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// The bitmap this surface was created over, if any. Pixels are never
    /// written; only the dimensions are meaningful.
    pub fn target(&self) -> Option<&Bitmap> {
        self.target.as_ref()
    }

    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn release_tracker(&self) -> ReleaseTracker {
        self.released.clone()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            transform: self.state.transform,
            clip: self.state.clip.clone(),
            hints: self.state.hints,
        }
    }

    fn record_op(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for RecordingSurface {
    fn fill_path(&mut self, brush: &Brush, path: &Path) -> Result<()> {
        let op = DrawOp::FillPath {
            path: path.clone(),
            brush: brush.clone(),
            state: self.snapshot(),
        };
        self.record_op(op);
        Ok(())
    }

    fn draw_path(&mut self, pen: &Pen, path: &Path) -> Result<()> {
        let op = DrawOp::StrokePath {
            path: path.clone(),
            pen: pen.clone(),
            state: self.snapshot(),
        };
        self.record_op(op);
        Ok(())
    }

    fn draw_image_unscaled(&mut self, image: &Bitmap, location: Point) -> Result<()> {
        let op = DrawOp::DrawImageUnscaled {
            source_width: image.width,
            source_height: image.height,
            location,
            state: self.snapshot(),
        };
        self.record_op(op);
        Ok(())
    }

    fn draw_image(&mut self, image: &Bitmap, dest: RectF, src: RectF, unit: GraphicsUnit) -> Result<()> {
        let op = DrawOp::DrawImage {
            source_width: image.width,
            source_height: image.height,
            dest,
            src,
            unit,
            state: self.snapshot(),
        };
        self.record_op(op);
        Ok(())
    }

    fn clip(&self) -> Result<Region> {
        Ok(self.state.clip.clone())
    }

    fn set_clip(&mut self, region: &Region, mode: CombineMode) -> Result<()> {
        match mode {
            CombineMode::Replace => self.state.clip = region.clone(),
            CombineMode::Intersect => self.state.clip.intersect(region),
        }
        Ok(())
    }

    fn transform(&self) -> Result<Matrix> {
        Ok(self.state.transform)
    }

    fn set_transform(&mut self, matrix: Matrix) -> Result<()> {
        self.state.transform = matrix;
        Ok(())
    }

    fn rotate_transform(&mut self, degrees: f64, order: MatrixOrder) -> Result<()> {
        self.state.transform.rotate(degrees, order);
        Ok(())
    }

    fn translate_transform(&mut self, dx: f64, dy: f64, order: MatrixOrder) -> Result<()> {
        self.state.transform.translate(dx, dy, order);
        Ok(())
    }

    fn scale_transform(&mut self, sx: f64, sy: f64, order: MatrixOrder) -> Result<()> {
        self.state.transform.scale(sx, sy, order);
        Ok(())
    }

    fn smoothing_mode(&self) -> Result<SmoothingMode> {
        Ok(self.state.hints.smoothing_mode)
    }

    fn set_smoothing_mode(&mut self, mode: SmoothingMode) -> Result<()> {
        self.state.hints.smoothing_mode = mode;
        Ok(())
    }

    fn pixel_offset_mode(&self) -> Result<PixelOffsetMode> {
        Ok(self.state.hints.pixel_offset_mode)
    }

    fn set_pixel_offset_mode(&mut self, mode: PixelOffsetMode) -> Result<()> {
        self.state.hints.pixel_offset_mode = mode;
        Ok(())
    }

    fn compositing_quality(&self) -> Result<CompositingQuality> {
        Ok(self.state.hints.compositing_quality)
    }

    fn set_compositing_quality(&mut self, quality: CompositingQuality) -> Result<()> {
        self.state.hints.compositing_quality = quality;
        Ok(())
    }

    fn text_rendering_hint(&self) -> Result<TextRenderingHint> {
        Ok(self.state.hints.text_rendering_hint)
    }

    fn set_text_rendering_hint(&mut self, hint: TextRenderingHint) -> Result<()> {
        self.state.hints.text_rendering_hint = hint;
        Ok(())
    }

    fn text_contrast(&self) -> Result<u32> {
        Ok(self.state.hints.text_contrast)
    }

    fn set_text_contrast(&mut self, contrast: u32) -> Result<()> {
        if contrast > MAX_TEXT_CONTRAST {
            return Err(RenderError::backend(format!(
                "text contrast {} is outside 0..={}",
                contrast, MAX_TEXT_CONTRAST
            )));
        }
        self.state.hints.text_contrast = contrast;
        Ok(())
    }

    fn save(&mut self) -> Result<GraphicsState> {
        let token = GraphicsState(self.next_state_id);
        self.next_state_id += 1;
        self.stack.push((token, self.state.clone()));
        Ok(token)
    }

    fn restore(&mut self, state: GraphicsState) -> Result<()> {
        let pos = self
            .stack
            .iter()
            .rposition(|(token, _)| *token == state)
            .ok_or(RenderError::UnknownGraphicsState)?;
        self.stack.truncate(pos + 1);
        if let Some((_, saved)) = self.stack.pop() {
            self.state = saved;
        }
        Ok(())
    }

    fn dpi(&self) -> Dpi {
        self.dpi
    }

    fn font_metrics(&self, font: &Font) -> Result<FontMetrics> {
        self.fonts.metrics(font)
    }

    fn measure_character_range(&self, text: &str, font: &Font, layout: RectF) -> Result<RectF> {
        let width = self.fonts.advance_width(text, font, self.dpi.x)?;
        let metrics = self.fonts.metrics(font)?;
        let height = font.size_pixels(self.dpi.y) / metrics.em_height * metrics.line_spacing;
        Ok(RectF::new(layout.x, layout.y, width.min(layout.width), height))
    }

    fn release(&mut self) -> Result<()> {
        self.released.0.set(self.released.count() + 1);
        self.target = None;
        Ok(())
    }
}

impl SurfaceFactory for RecordingSurface {
    fn from_bitmap(target: Bitmap, options: &SurfaceOptions) -> Result<Self> {
        let mut surface = Self::with_options(options);
        surface.target = Some(target);
        Ok(surface)
    }
}
