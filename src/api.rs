//! The drawing-surface seam and the value types passed through it.
//!
//! `DrawingSurface` is the contract every backend implements (raster, vector,
//! recording). The renderer never looks inside these values; it hands them to
//! the surface unchanged.

use crate::error::Result;
use crate::geometry::{Matrix, MatrixOrder, Point, PointF, RectF, SizeF};
use crate::text::{Font, FontMetrics};

/// Straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn to_f64(self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }

    /// `#rrggbb` without alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GradientKind {
    Linear {
        start: PointF,
        end: PointF,
    },
    Radial {
        center: PointF,
        radius: f64,
        focus: PointF,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn linear(start: PointF, end: PointF) -> Self {
        Self {
            kind: GradientKind::Linear { start, end },
            stops: Vec::new(),
        }
    }

    pub fn radial(center: PointF, radius: f64, focus: PointF) -> Self {
        Self {
            kind: GradientKind::Radial {
                center,
                radius,
                focus,
            },
            stops: Vec::new(),
        }
    }

    pub fn add_color_stop(&mut self, offset: f64, color: Color) {
        self.stops.push(GradientStop { offset, color });
    }
}

/// Paint used to fill a path interior.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
    Gradient(Gradient),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Flat,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Paint and line style used to stroke a path outline.
#[derive(Clone, Debug, PartialEq)]
pub struct Pen {
    pub brush: Brush,
    pub width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub dash_pattern: Vec<f64>,
    pub dash_offset: f64,
}

impl Pen {
    pub fn new(brush: Brush, width: f64) -> Self {
        Self {
            brush,
            width,
            line_cap: LineCap::Flat,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            dash_pattern: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    #[default]
    Alternate,
    Winding,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(PointF),
    LineTo(PointF),
    CubicTo {
        c1: PointF,
        c2: PointF,
        to: PointF,
    },
    QuadTo {
        c: PointF,
        to: PointF,
    },
    Rect(RectF),
    Ellipse(RectF),
    Close,
}

/// Path geometry, already resolved by the caller into absolute commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub commands: Vec<PathCommand>,
    pub fill_rule: FillRule,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(PointF::new(x, y)));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.commands.push(PathCommand::LineTo(PointF::new(x, y)));
        self
    }

    pub fn cubic_to(&mut self, c1: PointF, c2: PointF, to: PointF) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { c1, c2, to });
        self
    }

    pub fn quad_to(&mut self, c: PointF, to: PointF) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { c, to });
        self
    }

    pub fn add_rect(&mut self, rect: RectF) -> &mut Self {
        self.commands.push(PathCommand::Rect(rect));
        self
    }

    pub fn add_ellipse(&mut self, bounds: RectF) -> &mut Self {
        self.commands.push(PathCommand::Ellipse(bounds));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Control-point bounds: never smaller than the true geometry.
    pub fn bounds(&self) -> Option<RectF> {
        let mut acc: Option<RectF> = None;
        let mut add = |r: RectF| {
            acc = Some(match acc {
                Some(a) => a.union(&r),
                None => r,
            });
        };
        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => add(RectF::new(p.x, p.y, 0.0, 0.0)),
                PathCommand::CubicTo { c1, c2, to } => {
                    for p in [c1, c2, to] {
                        add(RectF::new(p.x, p.y, 0.0, 0.0));
                    }
                }
                PathCommand::QuadTo { c, to } => {
                    add(RectF::new(c.x, c.y, 0.0, 0.0));
                    add(RectF::new(to.x, to.y, 0.0, 0.0));
                }
                PathCommand::Rect(r) | PathCommand::Ellipse(r) => add(*r),
                PathCommand::Close => {}
            }
        }
        acc
    }
}

/// Straight-alpha RGBA8 pixel buffer, row-major with no padding.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let bitmap = Self {
            width,
            height,
            data,
        };
        bitmap.validate()?;
        Ok(bitmap)
    }

    /// Checks that `data` holds exactly `width * height` RGBA pixels.
    pub fn validate(&self) -> Result<()> {
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| crate::error::RenderError::backend("bitmap dimensions overflow"))?;
        if self.data.len() != expected {
            return Err(crate::error::RenderError::backend(format!(
                "RGBA buffer length {} does not match {}x{}x4",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    pub fn size(&self) -> SizeF {
        SizeF::new(self.width as f64, self.height as f64)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Encodes the bitmap as PNG.
    #[cfg(feature = "svg")]
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.validate()?;
        let mut png_bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_bytes, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.data)?;
            writer.finish()?;
        }
        Ok(png_bytes)
    }

    /// Decodes an 8-bit RGBA or RGB PNG.
    #[cfg(feature = "svg")]
    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info()?;
        let channels = match reader.output_color_type() {
            (png::ColorType::Rgba, png::BitDepth::Eight) => 4,
            (png::ColorType::Rgb, png::BitDepth::Eight) => 3,
            (color, depth) => {
                return Err(crate::error::RenderError::backend(format!(
                    "unsupported PNG format {:?}/{:?}",
                    color, depth
                )));
            }
        };
        let (width, height) = {
            let info = reader.info();
            (info.width, info.height)
        };
        let mut buf = vec![0; width as usize * height as usize * channels];
        let frame = reader.next_frame(&mut buf)?;
        buf.truncate(frame.buffer_size());
        let data = if channels == 4 {
            buf
        } else {
            buf.chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect()
        };
        Self::from_rgba(width, height, data)
    }
}

/// Unit of measure for the source rectangle of a scaled image blit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphicsUnit {
    World,
    Display,
    #[default]
    Pixel,
    Point,
    Inch,
    Document,
    Millimeter,
}

impl GraphicsUnit {
    /// Converts a length in this unit to pixels at `dpi`.
    pub fn to_pixels(self, value: f64, dpi: f64) -> f64 {
        match self {
            GraphicsUnit::World | GraphicsUnit::Display | GraphicsUnit::Pixel => value,
            GraphicsUnit::Point => value * dpi / 72.0,
            GraphicsUnit::Inch => value * dpi,
            GraphicsUnit::Document => value * dpi / 300.0,
            GraphicsUnit::Millimeter => value * dpi / 25.4,
        }
    }

    pub fn rect_to_pixels(self, rect: RectF, dpi: Dpi) -> RectF {
        RectF::new(
            self.to_pixels(rect.x, dpi.x),
            self.to_pixels(rect.y, dpi.y),
            self.to_pixels(rect.width, dpi.x),
            self.to_pixels(rect.height, dpi.y),
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RegionShape {
    Rect(RectF),
    Path(Path),
}

/// Clip region expressed as the intersection of its shapes. No shapes means
/// the region is infinite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Region {
    shapes: Vec<RegionShape>,
}

impl Region {
    pub fn infinite() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: RectF) -> Self {
        Self {
            shapes: vec![RegionShape::Rect(rect)],
        }
    }

    pub fn from_path(path: Path) -> Self {
        Self {
            shapes: vec![RegionShape::Path(path)],
        }
    }

    pub fn shapes(&self) -> &[RegionShape] {
        &self.shapes
    }

    pub fn is_infinite(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes
            .iter()
            .any(|s| matches!(s, RegionShape::Rect(r) if r.is_empty()))
    }

    /// Intersects in place. Shapes already present are skipped, so a region
    /// intersected with itself is unchanged.
    pub fn intersect(&mut self, other: &Region) {
        for shape in &other.shapes {
            match shape {
                RegionShape::Rect(r) => {
                    let existing = self.shapes.iter_mut().find_map(|s| match s {
                        RegionShape::Rect(cur) => Some(cur),
                        RegionShape::Path(_) => None,
                    });
                    match existing {
                        Some(cur) => *cur = cur.intersect(r),
                        None => self.shapes.insert(0, RegionShape::Rect(*r)),
                    }
                }
                RegionShape::Path(_) => {
                    if !self.shapes.contains(shape) {
                        self.shapes.push(shape.clone());
                    }
                }
            }
        }
    }

    /// Bounding rectangle, `None` when infinite.
    pub fn bounds(&self) -> Option<RectF> {
        let mut acc: Option<RectF> = None;
        for shape in &self.shapes {
            let r = match shape {
                RegionShape::Rect(r) => Some(*r),
                RegionShape::Path(p) => p.bounds(),
            };
            if let Some(r) = r {
                acc = Some(match acc {
                    Some(a) => a.intersect(&r),
                    None => r,
                });
            }
        }
        acc
    }
}

/// How a new clip region combines with the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombineMode {
    Replace,
    Intersect,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmoothingMode {
    #[default]
    Default,
    HighSpeed,
    HighQuality,
    None,
    AntiAlias,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelOffsetMode {
    #[default]
    Default,
    HighSpeed,
    HighQuality,
    None,
    Half,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositingQuality {
    #[default]
    Default,
    HighSpeed,
    HighQuality,
    GammaCorrected,
    AssumeLinear,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextRenderingHint {
    #[default]
    SystemDefault,
    SingleBitPerPixelGridFit,
    SingleBitPerPixel,
    AntiAliasGridFit,
    AntiAlias,
    ClearTypeGridFit,
}

/// Independent quality settings carried by a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderingHints {
    pub smoothing_mode: SmoothingMode,
    pub pixel_offset_mode: PixelOffsetMode,
    pub compositing_quality: CompositingQuality,
    pub text_rendering_hint: TextRenderingHint,
    pub text_contrast: u32,
}

impl Default for RenderingHints {
    fn default() -> Self {
        Self {
            smoothing_mode: SmoothingMode::Default,
            pixel_offset_mode: PixelOffsetMode::Default,
            compositing_quality: CompositingQuality::Default,
            text_rendering_hint: TextRenderingHint::SystemDefault,
            text_contrast: 4,
        }
    }
}

/// Device resolution in dots per inch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dpi {
    pub x: f64,
    pub y: f64,
}

impl Dpi {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Dpi {
    fn default() -> Self {
        Self::new(96.0, 96.0)
    }
}

/// Construction-time settings for a drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceOptions {
    pub dpi: Dpi,
    pub hints: RenderingHints,
}

/// Token for a saved graphics state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphicsState(pub(crate) u32);

/// An object that knows its own bounding box, used to track nested
/// coordinate scopes while rendering.
pub trait Boundable {
    fn bounds(&self) -> RectF;

    fn location(&self) -> PointF {
        self.bounds().location()
    }

    fn size(&self) -> SizeF {
        self.bounds().size()
    }
}

impl Boundable for RectF {
    fn bounds(&self) -> RectF {
        *self
    }
}

/// A 2D drawing target with mutable transform, clip and hint state.
pub trait DrawingSurface {
    /// Fills the interior of `path` with `brush`.
    fn fill_path(&mut self, brush: &Brush, path: &Path) -> Result<()>;
    /// Strokes the outline of `path` with `pen`.
    fn draw_path(&mut self, pen: &Pen, path: &Path) -> Result<()>;
    /// Draws `image` at its natural pixel size with its top-left at `location`.
    fn draw_image_unscaled(&mut self, image: &Bitmap, location: Point) -> Result<()>;
    /// Draws the `src` portion of `image`, measured in `unit`, into `dest`.
    fn draw_image(&mut self, image: &Bitmap, dest: RectF, src: RectF, unit: GraphicsUnit) -> Result<()>;

    fn clip(&self) -> Result<Region>;
    fn set_clip(&mut self, region: &Region, mode: CombineMode) -> Result<()>;

    fn transform(&self) -> Result<Matrix>;
    fn set_transform(&mut self, matrix: Matrix) -> Result<()>;
    /// Rotation in degrees.
    fn rotate_transform(&mut self, degrees: f64, order: MatrixOrder) -> Result<()>;
    fn translate_transform(&mut self, dx: f64, dy: f64, order: MatrixOrder) -> Result<()>;
    fn scale_transform(&mut self, sx: f64, sy: f64, order: MatrixOrder) -> Result<()>;

    fn smoothing_mode(&self) -> Result<SmoothingMode>;
    fn set_smoothing_mode(&mut self, mode: SmoothingMode) -> Result<()>;
    fn pixel_offset_mode(&self) -> Result<PixelOffsetMode>;
    fn set_pixel_offset_mode(&mut self, mode: PixelOffsetMode) -> Result<()>;
    fn compositing_quality(&self) -> Result<CompositingQuality>;
    fn set_compositing_quality(&mut self, quality: CompositingQuality) -> Result<()>;
    fn text_rendering_hint(&self) -> Result<TextRenderingHint>;
    fn set_text_rendering_hint(&mut self, hint: TextRenderingHint) -> Result<()>;
    fn text_contrast(&self) -> Result<u32>;
    fn set_text_contrast(&mut self, contrast: u32) -> Result<()>;

    /// Pushes the current transform, clip and hints; returns a token for `restore`.
    fn save(&mut self) -> Result<GraphicsState>;
    /// Returns to `state`, discarding any checkpoints saved after it.
    fn restore(&mut self, state: GraphicsState) -> Result<()>;

    fn dpi(&self) -> Dpi;
    /// Design-unit metrics for the font's family and style.
    fn font_metrics(&self, font: &Font) -> Result<FontMetrics>;
    /// Typographic bounds of the whole string laid out in `layout`,
    /// trailing whitespace included.
    fn measure_character_range(&self, text: &str, font: &Font, layout: RectF) -> Result<RectF>;

    /// Frees backend resources. Called at most once by the renderer.
    fn release(&mut self) -> Result<()>;
}

/// Surfaces that can be created over a target bitmap.
pub trait SurfaceFactory: DrawingSurface + Sized {
    fn from_bitmap(target: Bitmap, options: &SurfaceOptions) -> Result<Self>;
}
