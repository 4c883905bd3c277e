//! Cairo raster surface behind the optional `cairo` crate feature.
//!
//! Transforms, clipping and antialiasing map onto the cairo context. Hints
//! that cairo has no equivalent for (pixel offset mode, compositing quality,
//! text contrast) are kept on the surface and read back unchanged.
//!
//! Fonts go through cairo's toy font API, which picks a fallback face for
//! families it cannot find instead of failing. `font_metrics` therefore only
//! reports `MetricsUnavailable` when cairo cannot produce extents at all; an
//! unknown family measures with whatever face fontconfig substitutes.

use cairo::{
    Antialias, Context, Extend, FillRule as CairoFillRule, Filter, FontSlant, FontWeight, Format,
    ImageSurface, LineCap as CairoLineCap, LineJoin as CairoLineJoin, SurfacePattern,
};

use crate::api::*;
use crate::error::{RenderError, Result};
use crate::geometry::{Matrix, MatrixOrder, Point, RectF};
use crate::text::{Font, FontMetrics, FontStyle};

/// Nominal em size used to read cairo's scalable font extents back as design units.
const DESIGN_EM: f64 = 2048.0;

#[derive(Clone, Debug)]
struct MirroredState {
    clip: Region,
    hints: RenderingHints,
}

/// Adapter that forwards surface calls to a cairo context over an ARGB32 image.
pub struct CairoSurface {
    ctx: Context,
    target: ImageSurface,
    state: MirroredState,
    stack: Vec<(GraphicsState, MirroredState)>,
    next_state_id: u32,
    dpi: Dpi,
}

impl CairoSurface {
    /// Blank transparent surface of the given size.
    pub fn new(width: u32, height: u32, options: &SurfaceOptions) -> Result<Self> {
        let target = ImageSurface::create(Format::ARgb32, width as i32, height as i32)?;
        Self::with_target(target, options)
    }

    fn with_target(target: ImageSurface, options: &SurfaceOptions) -> Result<Self> {
        let ctx = Context::new(&target)?;
        let mut surface = Self {
            ctx,
            target,
            state: MirroredState {
                clip: Region::infinite(),
                hints: RenderingHints::default(),
            },
            stack: Vec::new(),
            next_state_id: 0,
            dpi: options.dpi,
        };
        surface.set_smoothing_mode(options.hints.smoothing_mode)?;
        surface.set_text_rendering_hint(options.hints.text_rendering_hint)?;
        surface.state.hints = options.hints;
        Ok(surface)
    }

    /// Consumes the surface and reads its pixels back as straight-alpha RGBA.
    pub fn into_bitmap(self) -> Result<Bitmap> {
        let CairoSurface {
            ctx, mut target, ..
        } = self;
        drop(ctx);
        target.flush();
        let width = target.width() as u32;
        let height = target.height() as u32;
        let stride = target.stride() as usize;
        let data = target.data()?;

        let mut out = Vec::with_capacity(width as usize * height as usize * 4);
        for row in 0..height as usize {
            let line = &data[row * stride..row * stride + width as usize * 4];
            for px in line.chunks_exact(4) {
                // native-endian premultiplied BGRA on little-endian
                let (b, g, r, a) = (px[0] as u16, px[1] as u16, px[2] as u16, px[3] as u16);
                let unpremultiply = |c: u16| if a == 0 { 0 } else { ((c * 255 + a / 2) / a).min(255) as u8 };
                out.extend_from_slice(&[unpremultiply(r), unpremultiply(g), unpremultiply(b), a as u8]);
            }
        }
        Bitmap::from_rgba(width, height, out)
    }

    fn image_surface_from_bitmap(image: &Bitmap) -> Result<ImageSurface> {
        image.validate()?;
        let width = image.width;
        let height = image.height;
        let stride = Format::ARgb32.stride_for_width(width)? as usize;

        let mut buf = vec![0u8; stride * height as usize];
        for (i, chunk) in image.data.chunks_exact(4).enumerate() {
            let r = chunk[0] as u16;
            let g = chunk[1] as u16;
            let b = chunk[2] as u16;
            let a = chunk[3] as u16;
            let pr = (r * a + 127) / 255;
            let pg = (g * a + 127) / 255;
            let pb = (b * a + 127) / 255;
            let row = i / width as usize;
            let col = i % width as usize;
            let idx = row * stride + col * 4;
            // Cairo ARgb32 expects premultiplied alpha with native-endian (BGRA on little-endian).
            buf[idx] = pb as u8;
            buf[idx + 1] = pg as u8;
            buf[idx + 2] = pr as u8;
            buf[idx + 3] = a as u8;
        }

        let surface = ImageSurface::create_for_data(buf, Format::ARgb32, width as i32, height as i32, stride as i32)?;
        Ok(surface)
    }

    fn make_image_pattern(&self, surface: &ImageSurface) -> SurfacePattern {
        let pattern = SurfacePattern::create(surface);
        let filter = match self.state.hints.smoothing_mode {
            SmoothingMode::None | SmoothingMode::HighSpeed => Filter::Fast,
            SmoothingMode::HighQuality | SmoothingMode::AntiAlias => Filter::Best,
            SmoothingMode::Default => Filter::Good,
        };
        pattern.set_filter(filter);
        pattern.set_extend(Extend::None);
        pattern
    }

    fn apply_brush(&self, brush: &Brush) -> Result<()> {
        match brush {
            Brush::Solid(color) => {
                let (r, g, b, a) = color.to_f64();
                self.ctx.set_source_rgba(r, g, b, a);
            }
            Brush::Gradient(grad) => match &grad.kind {
                GradientKind::Linear { start, end } => {
                    let pattern = cairo::LinearGradient::new(start.x, start.y, end.x, end.y);
                    for stop in &grad.stops {
                        let (r, g, b, a) = stop.color.to_f64();
                        pattern.add_color_stop_rgba(stop.offset, r, g, b, a);
                    }
                    self.ctx.set_source(&pattern)?;
                }
                GradientKind::Radial {
                    center,
                    radius,
                    focus,
                } => {
                    let pattern = cairo::RadialGradient::new(focus.x, focus.y, 0.0, center.x, center.y, *radius);
                    for stop in &grad.stops {
                        let (r, g, b, a) = stop.color.to_f64();
                        pattern.add_color_stop_rgba(stop.offset, r, g, b, a);
                    }
                    self.ctx.set_source(&pattern)?;
                }
            },
        }
        Ok(())
    }

    fn append_path(&self, path: &Path) -> Result<()> {
        for cmd in &path.commands {
            match cmd {
                PathCommand::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathCommand::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathCommand::CubicTo { c1, c2, to } => self.ctx.curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y),
                PathCommand::QuadTo { c, to } => {
                    let (sx, sy) = self.ctx.current_point()?;
                    self.ctx.curve_to(
                        sx + 2.0 / 3.0 * (c.x - sx),
                        sy + 2.0 / 3.0 * (c.y - sy),
                        to.x + 2.0 / 3.0 * (c.x - to.x),
                        to.y + 2.0 / 3.0 * (c.y - to.y),
                        to.x,
                        to.y,
                    );
                }
                PathCommand::Rect(r) => self.ctx.rectangle(r.x, r.y, r.width, r.height),
                PathCommand::Ellipse(r) => {
                    if r.width > 0.0 && r.height > 0.0 {
                        let matrix = self.ctx.matrix();
                        self.ctx.translate(r.x + r.width / 2.0, r.y + r.height / 2.0);
                        self.ctx.scale(r.width / 2.0, r.height / 2.0);
                        self.ctx.new_sub_path();
                        self.ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
                        self.ctx.close_path();
                        self.ctx.set_matrix(matrix);
                    }
                }
                PathCommand::Close => self.ctx.close_path(),
            }
        }
        self.ctx.set_fill_rule(map_fill_rule(path.fill_rule));
        Ok(())
    }

    fn clip_to_region(&self, region: &Region) -> Result<()> {
        for shape in region.shapes() {
            self.ctx.new_path();
            match shape {
                RegionShape::Rect(r) => {
                    self.ctx.rectangle(r.x, r.y, r.width, r.height);
                    self.ctx.set_fill_rule(CairoFillRule::Winding);
                }
                RegionShape::Path(p) => self.append_path(p)?,
            }
            self.ctx.clip();
        }
        Ok(())
    }

    fn compose(&mut self, op: &Matrix, order: MatrixOrder) -> Result<()> {
        let mut current = self.transform()?;
        current.compose(op, order);
        self.set_transform(current)
    }

    fn select_font(&self, font: &Font) {
        let slant = if font.style.is_italic() {
            FontSlant::Italic
        } else {
            FontSlant::Normal
        };
        let weight = if font.style.is_bold() {
            FontWeight::Bold
        } else {
            FontWeight::Normal
        };
        self.ctx.select_font_face(&font.family, slant, weight);
    }
}

impl DrawingSurface for CairoSurface {
    fn fill_path(&mut self, brush: &Brush, path: &Path) -> Result<()> {
        self.ctx.new_path();
        self.append_path(path)?;
        self.apply_brush(brush)?;
        self.ctx.fill()?;
        Ok(())
    }

    fn draw_path(&mut self, pen: &Pen, path: &Path) -> Result<()> {
        self.ctx.new_path();
        self.append_path(path)?;
        self.apply_brush(&pen.brush)?;
        self.ctx.set_line_width(pen.width);
        self.ctx.set_line_cap(map_line_cap(pen.line_cap));
        self.ctx.set_line_join(map_line_join(pen.line_join));
        self.ctx.set_miter_limit(pen.miter_limit);
        self.ctx.set_dash(&pen.dash_pattern, pen.dash_offset);
        self.ctx.stroke()?;
        Ok(())
    }

    fn draw_image_unscaled(&mut self, image: &Bitmap, location: Point) -> Result<()> {
        let surface = Self::image_surface_from_bitmap(image)?;
        let pattern = self.make_image_pattern(&surface);
        let (dx, dy) = (location.x as f64, location.y as f64);

        self.ctx.save()?;
        self.ctx.translate(dx, dy);
        self.ctx.set_source(&pattern)?;
        self.ctx.new_path();
        self.ctx.rectangle(0.0, 0.0, image.width as f64, image.height as f64);
        self.ctx.clip();
        self.ctx.paint()?;
        self.ctx.restore()?;
        Ok(())
    }

    fn draw_image(&mut self, image: &Bitmap, dest: RectF, src: RectF, unit: GraphicsUnit) -> Result<()> {
        let src = unit.rect_to_pixels(src, self.dpi);
        if src.is_empty() || dest.is_empty() {
            return Ok(());
        }
        let surface = Self::image_surface_from_bitmap(image)?;
        let pattern = self.make_image_pattern(&surface);
        let scale_x = dest.width / src.width;
        let scale_y = dest.height / src.height;

        self.ctx.save()?;
        self.ctx.new_path();
        self.ctx.rectangle(dest.x, dest.y, dest.width, dest.height);
        self.ctx.clip();
        self.ctx.translate(dest.x, dest.y);
        self.ctx.scale(scale_x, scale_y);
        self.ctx.translate(-src.x, -src.y);
        self.ctx.set_source(&pattern)?;
        self.ctx.paint()?;
        self.ctx.restore()?;
        Ok(())
    }

    fn clip(&self) -> Result<Region> {
        Ok(self.state.clip.clone())
    }

    fn set_clip(&mut self, region: &Region, mode: CombineMode) -> Result<()> {
        match mode {
            CombineMode::Replace => {
                self.ctx.reset_clip();
                self.state.clip = region.clone();
            }
            CombineMode::Intersect => self.state.clip.intersect(region),
        }
        self.clip_to_region(region)?;
        self.ctx.new_path();
        Ok(())
    }

    fn transform(&self) -> Result<Matrix> {
        let m = self.ctx.matrix();
        Ok(Matrix::new(m.xx(), m.yx(), m.xy(), m.yy(), m.x0(), m.y0()))
    }

    fn set_transform(&mut self, matrix: Matrix) -> Result<()> {
        let [xx, yx, xy, yy, x0, y0] = matrix.elements;
        self.ctx.set_matrix(cairo::Matrix::new(xx, yx, xy, yy, x0, y0));
        self.ctx.status()?;
        Ok(())
    }

    fn rotate_transform(&mut self, degrees: f64, order: MatrixOrder) -> Result<()> {
        self.compose(&Matrix::rotation(degrees), order)
    }

    fn translate_transform(&mut self, dx: f64, dy: f64, order: MatrixOrder) -> Result<()> {
        self.compose(&Matrix::translation(dx, dy), order)
    }

    fn scale_transform(&mut self, sx: f64, sy: f64, order: MatrixOrder) -> Result<()> {
        self.compose(&Matrix::scaling(sx, sy), order)
    }

    fn smoothing_mode(&self) -> Result<SmoothingMode> {
        Ok(self.state.hints.smoothing_mode)
    }

    fn set_smoothing_mode(&mut self, mode: SmoothingMode) -> Result<()> {
        self.ctx.set_antialias(map_smoothing(mode));
        self.state.hints.smoothing_mode = mode;
        Ok(())
    }

    fn pixel_offset_mode(&self) -> Result<PixelOffsetMode> {
        Ok(self.state.hints.pixel_offset_mode)
    }

    fn set_pixel_offset_mode(&mut self, mode: PixelOffsetMode) -> Result<()> {
        tracing::trace!(?mode, "pixel offset mode has no cairo equivalent");
        self.state.hints.pixel_offset_mode = mode;
        Ok(())
    }

    fn compositing_quality(&self) -> Result<CompositingQuality> {
        Ok(self.state.hints.compositing_quality)
    }

    fn set_compositing_quality(&mut self, quality: CompositingQuality) -> Result<()> {
        tracing::trace!(?quality, "compositing quality has no cairo equivalent");
        self.state.hints.compositing_quality = quality;
        Ok(())
    }

    fn text_rendering_hint(&self) -> Result<TextRenderingHint> {
        Ok(self.state.hints.text_rendering_hint)
    }

    fn set_text_rendering_hint(&mut self, hint: TextRenderingHint) -> Result<()> {
        let mut options = cairo::FontOptions::new()?;
        options.set_antialias(map_text_hint(hint));
        self.ctx.set_font_options(&options);
        self.state.hints.text_rendering_hint = hint;
        Ok(())
    }

    fn text_contrast(&self) -> Result<u32> {
        Ok(self.state.hints.text_contrast)
    }

    fn set_text_contrast(&mut self, contrast: u32) -> Result<()> {
        self.state.hints.text_contrast = contrast;
        Ok(())
    }

    fn save(&mut self) -> Result<GraphicsState> {
        self.ctx.save()?;
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
        // one cairo restore per checkpoint at or above `pos`
        for _ in pos..self.stack.len() {
            self.ctx.restore()?;
        }
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
        self.ctx.save()?;
        self.ctx.identity_matrix();
        self.select_font(font);
        self.ctx.set_font_size(DESIGN_EM);
        let extents = self.ctx.font_extents();
        self.ctx.restore()?;

        let unavailable = |style: FontStyle| RenderError::MetricsUnavailable {
            family: font.family.clone(),
            style,
        };
        let extents = extents.map_err(|err| {
            tracing::debug!(family = %font.family, %err, "cairo font extents failed");
            unavailable(font.style)
        })?;
        if !(extents.ascent().is_finite() && extents.ascent() > 0.0) {
            return Err(unavailable(font.style));
        }
        Ok(FontMetrics {
            em_height: DESIGN_EM,
            cell_ascent: extents.ascent(),
            cell_descent: extents.descent(),
            line_spacing: extents.height(),
        })
    }

    fn measure_character_range(&self, text: &str, font: &Font, layout: RectF) -> Result<RectF> {
        self.ctx.save()?;
        self.ctx.identity_matrix();
        self.select_font(font);
        self.ctx.set_font_size(font.size_pixels(self.dpi.y));
        let text_extents = self.ctx.text_extents(text);
        let font_extents = self.ctx.font_extents();
        self.ctx.restore()?;

        // x_advance keeps trailing whitespace, unlike the ink width
        let width = text_extents?.x_advance().min(layout.width);
        Ok(RectF::new(layout.x, layout.y, width, font_extents?.height()))
    }

    fn release(&mut self) -> Result<()> {
        self.target.flush();
        self.target.finish();
        Ok(())
    }
}

impl SurfaceFactory for CairoSurface {
    fn from_bitmap(target: Bitmap, options: &SurfaceOptions) -> Result<Self> {
        let surface = Self::image_surface_from_bitmap(&target)?;
        Self::with_target(surface, options)
    }
}

fn map_fill_rule(rule: FillRule) -> CairoFillRule {
    match rule {
        FillRule::Alternate => CairoFillRule::EvenOdd,
        FillRule::Winding => CairoFillRule::Winding,
    }
}

fn map_line_cap(cap: LineCap) -> CairoLineCap {
    match cap {
        LineCap::Flat => CairoLineCap::Butt,
        LineCap::Round => CairoLineCap::Round,
        LineCap::Square => CairoLineCap::Square,
    }
}

fn map_line_join(join: LineJoin) -> CairoLineJoin {
    match join {
        LineJoin::Bevel => CairoLineJoin::Bevel,
        LineJoin::Miter => CairoLineJoin::Miter,
        LineJoin::Round => CairoLineJoin::Round,
    }
}

fn map_smoothing(mode: SmoothingMode) -> Antialias {
    match mode {
        SmoothingMode::Default => Antialias::Default,
        SmoothingMode::HighSpeed => Antialias::Fast,
        SmoothingMode::HighQuality => Antialias::Best,
        SmoothingMode::None => Antialias::None,
        SmoothingMode::AntiAlias => Antialias::Gray,
    }
}

fn map_text_hint(hint: TextRenderingHint) -> Antialias {
    match hint {
        TextRenderingHint::SystemDefault => Antialias::Default,
        TextRenderingHint::SingleBitPerPixelGridFit | TextRenderingHint::SingleBitPerPixel => Antialias::None,
        TextRenderingHint::AntiAliasGridFit | TextRenderingHint::AntiAlias => Antialias::Gray,
        TextRenderingHint::ClearTypeGridFit => Antialias::Subpixel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Renderer;

    fn square(x: f64, y: f64, side: f64) -> Path {
        let mut path = Path::new();
        path.add_rect(RectF::new(x, y, side, side));
        path
    }

    #[test]
    fn fills_into_target_bitmap() {
        let mut s = CairoSurface::from_bitmap(Bitmap::new(8, 8), &SurfaceOptions::default()).unwrap();
        s.fill_path(&Brush::Solid(Color::rgb(255, 0, 0)), &square(0.0, 0.0, 4.0)).unwrap();
        let bmp = s.into_bitmap().unwrap();
        assert_eq!(bmp.pixel(1, 1), Some(Color::rgb(255, 0, 0)));
        assert_eq!(bmp.pixel(6, 6), Some(Color::TRANSPARENT));
    }

    #[test]
    fn clip_limits_fill() {
        let mut s = CairoSurface::new(8, 8, &SurfaceOptions::default()).unwrap();
        s.set_clip(&Region::from_rect(RectF::new(0.0, 0.0, 2.0, 8.0)), CombineMode::Replace)
            .unwrap();
        s.fill_path(&Brush::Solid(Color::rgb(0, 0, 255)), &square(0.0, 0.0, 8.0)).unwrap();
        let bmp = s.into_bitmap().unwrap();
        assert_eq!(bmp.pixel(1, 4), Some(Color::rgb(0, 0, 255)));
        assert_eq!(bmp.pixel(5, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn transform_reads_back_through_cairo() {
        let mut s = CairoSurface::new(4, 4, &SurfaceOptions::default()).unwrap();
        s.translate_transform(3.0, 4.0, MatrixOrder::Append).unwrap();
        s.scale_transform(2.0, 2.0, MatrixOrder::Prepend).unwrap();
        assert!(s.transform().unwrap().approx_eq(&Matrix::new(2.0, 0.0, 0.0, 2.0, 3.0, 4.0), 1e-12));

        let saved = s.save().unwrap();
        s.rotate_transform(90.0, MatrixOrder::Append).unwrap();
        s.set_smoothing_mode(SmoothingMode::None).unwrap();
        s.restore(saved).unwrap();
        assert!(s.transform().unwrap().approx_eq(&Matrix::new(2.0, 0.0, 0.0, 2.0, 3.0, 4.0), 1e-12));
        assert_eq!(s.smoothing_mode().unwrap(), SmoothingMode::Default);
    }

    #[test]
    fn unscaled_image_lands_at_location() {
        let mut s = CairoSurface::new(4, 4, &SurfaceOptions::default()).unwrap();
        let img = Bitmap::from_rgba(1, 1, vec![0, 255, 0, 255]).unwrap();
        s.draw_image_unscaled(&img, Point::new(2, 3)).unwrap();
        let bmp = s.into_bitmap().unwrap();
        assert_eq!(bmp.pixel(2, 3), Some(Color::rgb(0, 255, 0)));
        assert_eq!(bmp.pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn rejects_bitmap_with_oversized_buffer() {
        let mut s = CairoSurface::new(4, 4, &SurfaceOptions::default()).unwrap();
        let img = Bitmap {
            width: 1,
            height: 1,
            data: vec![255; 8],
        };
        assert!(matches!(s.draw_image_unscaled(&img, Point::new(0, 0)), Err(RenderError::Backend(_))));
        let unit = RectF::new(0.0, 0.0, 1.0, 1.0);
        assert!(s.draw_image(&img, unit, unit, GraphicsUnit::Pixel).is_err());
    }

    #[test]
    fn rejects_zero_sized_target_with_data() {
        let target = Bitmap {
            width: 0,
            height: 0,
            data: vec![0; 4],
        };
        let result: Result<Renderer<CairoSurface>> = Renderer::from_image(target);
        assert!(matches!(result, Err(RenderError::Backend(_))));
    }

    fn ascent_at_design_em(family: &str) -> f64 {
        let target = ImageSurface::create(Format::ARgb32, 1, 1).unwrap();
        let ctx = Context::new(&target).unwrap();
        ctx.select_font_face(family, FontSlant::Normal, FontWeight::Normal);
        ctx.set_font_size(DESIGN_EM);
        ctx.font_extents().unwrap().ascent()
    }

    #[test]
    fn measured_height_is_scaled_ascent() {
        let renderer: Renderer<CairoSurface> = Renderer::from_null().unwrap();
        let font = Font::new("Sans", 12.0, FontStyle::Regular);
        let expected = 96.0 / 72.0 * 12.0 * ascent_at_design_em("Sans") / DESIGN_EM;

        let short = renderer.measure_string("a", &font).unwrap();
        let long = renderer.measure_string("Quartz glyph jumble", &font).unwrap();
        assert!((short.height - expected).abs() < 1e-6, "{} vs {}", short.height, expected);
        assert_eq!(short.height, long.height);
        assert!(long.width > short.width);
    }

    #[test]
    fn measured_width_keeps_trailing_spaces() {
        let renderer: Renderer<CairoSurface> = Renderer::from_null().unwrap();
        let font = Font::new("Sans", 12.0, FontStyle::Regular);
        let bare = renderer.measure_string("a", &font).unwrap();
        let padded = renderer.measure_string("a  ", &font).unwrap();
        assert!(padded.width > bare.width);

        let empty = renderer.measure_string("", &font).unwrap();
        assert_eq!(empty.width, 0.0);
        assert_eq!(empty.height, bare.height);
    }

    #[test]
    fn measuring_leaves_transform_alone() {
        let mut renderer: Renderer<CairoSurface> = Renderer::from_null().unwrap();
        let font = Font::new("Sans", 10.0, FontStyle::Bold);
        let plain = renderer.measure_string("abc", &font).unwrap();

        let skewed = Matrix::new(2.0, 0.5, 0.0, 3.0, 7.0, -1.0);
        renderer.set_transform(skewed).unwrap();
        let under_transform = renderer.measure_string("abc", &font).unwrap();

        assert!(renderer.transform().unwrap().approx_eq(&skewed, 1e-12));
        assert!((under_transform.width - plain.width).abs() < 1e-9);
        assert!((under_transform.height - plain.height).abs() < 1e-9);
    }
}
