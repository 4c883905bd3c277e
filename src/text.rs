//! Font descriptors and the baseline conversion used by text measurement.

/// Typographic points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: String,
    pub size_points: f64,
    pub style: FontStyle,
}

impl Font {
    pub fn new(family: impl Into<String>, size_points: f64, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            size_points,
            style,
        }
    }

    /// Builds a font from a pixel size at the given vertical resolution.
    pub fn from_pixels(family: impl Into<String>, size_pixels: f64, dpi: f64, style: FontStyle) -> Self {
        Self::new(family, size_pixels * POINTS_PER_INCH / dpi, style)
    }

    pub fn size_pixels(&self, dpi: f64) -> f64 {
        dpi / POINTS_PER_INCH * self.size_points
    }
}

/// Style-specific metrics of a font family, in font design units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    pub em_height: f64,
    pub cell_ascent: f64,
    pub cell_descent: f64,
    pub line_spacing: f64,
}

/// Distance from the top of the glyph cell to the baseline, in points.
pub fn baseline_offset_points(font: &Font, metrics: &FontMetrics) -> f64 {
    font.size_points / metrics.em_height * metrics.cell_ascent
}

/// Baseline offset converted to device pixels at `dpi_y`.
///
/// Only the ascent contributes; descent is deliberately left out so text boxes
/// line up on the baseline.
pub fn baseline_offset_pixels(font: &Font, metrics: &FontMetrics, dpi_y: f64) -> f64 {
    dpi_y / POINTS_PER_INCH * baseline_offset_points(font, metrics)
}
