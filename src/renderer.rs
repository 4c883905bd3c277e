//! The rendering context handed to element renderers.
//!
//! A `Renderer` owns one drawing surface and forwards every drawing, clip,
//! transform and hint call to it unchanged. On top of that it keeps a stack of
//! borrowed [`Boundable`]s so nested elements can find the bounding box of the
//! scope they are drawn in, and it measures text against the font baseline.

use crate::api::*;
use crate::error::{RenderError, Result};
use crate::geometry::{Matrix, MatrixOrder, Point, RectF, SizeF};
use crate::text::{Font, baseline_offset_pixels};

/// Layout box used for width measurement; wide enough that typical SVG text
/// runs never wrap.
const MEASURE_LAYOUT: RectF = RectF {
    x: 0.0,
    y: 0.0,
    width: 1000.0,
    height: 1000.0,
};

pub struct Renderer<'b, S: DrawingSurface> {
    surface: Option<S>,
    boundables: Vec<&'b dyn Boundable>,
}

impl<'b, S: DrawingSurface> Renderer<'b, S> {
    /// Wraps an existing surface. The renderer takes ownership and releases
    /// it when disposed or dropped.
    pub fn from_surface(surface: S) -> Self {
        tracing::debug!("renderer created from existing surface");
        Self {
            surface: Some(surface),
            boundables: Vec::new(),
        }
    }

    fn surface_ref(&self) -> Result<&S> {
        self.surface.as_ref().ok_or(RenderError::Disposed)
    }

    fn surface_mut_ref(&mut self) -> Result<&mut S> {
        self.surface.as_mut().ok_or(RenderError::Disposed)
    }

    /// Direct access to the wrapped surface.
    pub fn surface(&self) -> Result<&S> {
        self.surface_ref()
    }

    pub fn surface_mut(&mut self) -> Result<&mut S> {
        self.surface_mut_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.surface.is_none()
    }

    // Boundable scopes

    pub fn push_boundable(&mut self, boundable: &'b dyn Boundable) {
        tracing::trace!(depth = self.boundables.len() + 1, "push boundable");
        self.boundables.push(boundable);
    }

    /// The innermost boundable scope.
    pub fn boundable(&self) -> Result<&'b dyn Boundable> {
        self.boundables.last().copied().ok_or(RenderError::EmptyBoundableStack)
    }

    pub fn pop_boundable(&mut self) -> Result<&'b dyn Boundable> {
        let popped = self.boundables.pop().ok_or(RenderError::EmptyBoundableStack)?;
        tracing::trace!(depth = self.boundables.len(), "pop boundable");
        Ok(popped)
    }

    pub fn boundable_depth(&self) -> usize {
        self.boundables.len()
    }

    /// Runs `f` with `boundable` pushed, popping it again however `f` returns.
    pub fn with_boundable<T>(
        &mut self,
        boundable: &'b dyn Boundable,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let depth = self.boundables.len();
        self.push_boundable(boundable);
        let result = f(self);
        self.boundables.truncate(depth);
        result
    }

    // Drawing

    pub fn fill_path(&mut self, brush: &Brush, path: &Path) -> Result<()> {
        self.surface_mut_ref()?.fill_path(brush, path)
    }

    pub fn draw_path(&mut self, pen: &Pen, path: &Path) -> Result<()> {
        self.surface_mut_ref()?.draw_path(pen, path)
    }

    pub fn draw_image_unscaled(&mut self, image: &Bitmap, location: Point) -> Result<()> {
        self.surface_mut_ref()?.draw_image_unscaled(image, location)
    }

    pub fn draw_image(&mut self, image: &Bitmap, dest: RectF, src: RectF, unit: GraphicsUnit) -> Result<()> {
        self.surface_mut_ref()?.draw_image(image, dest, src, unit)
    }

    // Clipping

    pub fn clip(&self) -> Result<Region> {
        self.surface_ref()?.clip()
    }

    /// Replaces the current clip.
    pub fn set_clip(&mut self, region: &Region) -> Result<()> {
        self.surface_mut_ref()?.set_clip(region, CombineMode::Replace)
    }

    /// Intersects the current clip with `region`.
    pub fn add_clip(&mut self, region: &Region) -> Result<()> {
        self.surface_mut_ref()?.set_clip(region, CombineMode::Intersect)
    }

    // Transform

    pub fn transform(&self) -> Result<Matrix> {
        self.surface_ref()?.transform()
    }

    pub fn set_transform(&mut self, matrix: Matrix) -> Result<()> {
        self.surface_mut_ref()?.set_transform(matrix)
    }

    /// Appends a rotation of `degrees`.
    pub fn rotate_transform(&mut self, degrees: f64) -> Result<()> {
        self.rotate_transform_ordered(degrees, MatrixOrder::Append)
    }

    pub fn rotate_transform_ordered(&mut self, degrees: f64, order: MatrixOrder) -> Result<()> {
        self.surface_mut_ref()?.rotate_transform(degrees, order)
    }

    /// Appends a translation.
    pub fn translate_transform(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.translate_transform_ordered(dx, dy, MatrixOrder::Append)
    }

    pub fn translate_transform_ordered(&mut self, dx: f64, dy: f64, order: MatrixOrder) -> Result<()> {
        self.surface_mut_ref()?.translate_transform(dx, dy, order)
    }

    /// Appends a scale.
    pub fn scale_transform(&mut self, sx: f64, sy: f64) -> Result<()> {
        self.scale_transform_ordered(sx, sy, MatrixOrder::Append)
    }

    pub fn scale_transform_ordered(&mut self, sx: f64, sy: f64, order: MatrixOrder) -> Result<()> {
        self.surface_mut_ref()?.scale_transform(sx, sy, order)
    }

    // Rendering hints

    pub fn smoothing_mode(&self) -> Result<SmoothingMode> {
        self.surface_ref()?.smoothing_mode()
    }

    pub fn set_smoothing_mode(&mut self, mode: SmoothingMode) -> Result<()> {
        self.surface_mut_ref()?.set_smoothing_mode(mode)
    }

    pub fn pixel_offset_mode(&self) -> Result<PixelOffsetMode> {
        self.surface_ref()?.pixel_offset_mode()
    }

    pub fn set_pixel_offset_mode(&mut self, mode: PixelOffsetMode) -> Result<()> {
        self.surface_mut_ref()?.set_pixel_offset_mode(mode)
    }

    pub fn compositing_quality(&self) -> Result<CompositingQuality> {
        self.surface_ref()?.compositing_quality()
    }

    pub fn set_compositing_quality(&mut self, quality: CompositingQuality) -> Result<()> {
        self.surface_mut_ref()?.set_compositing_quality(quality)
    }

    pub fn text_rendering_hint(&self) -> Result<TextRenderingHint> {
        self.surface_ref()?.text_rendering_hint()
    }

    pub fn set_text_rendering_hint(&mut self, hint: TextRenderingHint) -> Result<()> {
        self.surface_mut_ref()?.set_text_rendering_hint(hint)
    }

    pub fn text_contrast(&self) -> Result<u32> {
        self.surface_ref()?.text_contrast()
    }

    pub fn set_text_contrast(&mut self, contrast: u32) -> Result<()> {
        self.surface_mut_ref()?.set_text_contrast(contrast)
    }

    // State

    /// Checkpoints transform, clip and hints.
    pub fn save(&mut self) -> Result<GraphicsState> {
        let state = self.surface_mut_ref()?.save()?;
        tracing::trace!(?state, "saved graphics state");
        Ok(state)
    }

    pub fn restore(&mut self, state: GraphicsState) -> Result<()> {
        tracing::trace!(?state, "restoring graphics state");
        self.surface_mut_ref()?.restore(state)
    }

    // Text

    /// Size of `text` in `font`: the typographic advance width (trailing
    /// whitespace included) and the baseline offset as height.
    ///
    /// The height is the font's cell ascent in device pixels. It depends only
    /// on the font and the surface's vertical DPI, never on the text.
    pub fn measure_string(&self, text: &str, font: &Font) -> Result<SizeF> {
        let surface = self.surface_ref()?;
        let metrics = surface.font_metrics(font)?;
        let height = baseline_offset_pixels(font, &metrics, surface.dpi().y);

        let width = if text.is_empty() {
            0.0
        } else {
            surface.measure_character_range(text, font, MEASURE_LAYOUT)?.width
        };
        Ok(SizeF::new(width, height))
    }

    // Disposal

    /// Releases the surface. Later calls are no-ops.
    pub fn dispose(&mut self) -> Result<()> {
        match self.surface.take() {
            Some(mut surface) => {
                tracing::debug!(boundables = self.boundables.len(), "disposing renderer");
                self.boundables.clear();
                surface.release()
            }
            None => Ok(()),
        }
    }

    /// Hands the surface back without releasing it.
    pub fn into_surface(mut self) -> Result<S> {
        self.surface.take().ok_or(RenderError::Disposed)
    }
}

impl<'b, S: SurfaceFactory> Renderer<'b, S> {
    /// Renders into `target` with default surface options.
    pub fn from_image(target: Bitmap) -> Result<Self> {
        Self::from_image_with_options(target, &SurfaceOptions::default())
    }

    pub fn from_image_with_options(target: Bitmap, options: &SurfaceOptions) -> Result<Self> {
        tracing::debug!(width = target.width, height = target.height, "renderer created from image");
        let surface = S::from_bitmap(target, options)?;
        Ok(Self {
            surface: Some(surface),
            boundables: Vec::new(),
        })
    }

    /// Renderer over a throwaway 1x1 bitmap, for measurement and layout.
    pub fn from_null() -> Result<Self> {
        Self::from_null_with_options(&SurfaceOptions::default())
    }

    pub fn from_null_with_options(options: &SurfaceOptions) -> Result<Self> {
        Self::from_image_with_options(Bitmap::new(1, 1), options)
    }
}

impl<S: DrawingSurface> Drop for Renderer<'_, S> {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            tracing::warn!(%err, "failed to release drawing surface");
        }
    }
}
