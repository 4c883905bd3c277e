//! Font faces with design-unit metrics, for surfaces that have no font
//! system of their own.

use std::collections::HashMap;

use crate::error::{RenderError, Result};
use crate::text::{Font, FontMetrics, FontStyle, POINTS_PER_INCH};

/// Cell metrics of one style of a face, in design units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    pub ascent: f64,
    pub descent: f64,
    pub line_spacing: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontFace {
    family: String,
    em_height: f64,
    styles: HashMap<FontStyle, CellMetrics>,
    default_advance: f64,
    advances: HashMap<char, f64>,
}

impl FontFace {
    /// Face with no styles yet; every glyph advances by `default_advance` units.
    pub fn new(family: impl Into<String>, em_height: f64, default_advance: f64) -> Self {
        Self {
            family: family.into(),
            em_height,
            styles: HashMap::new(),
            default_advance,
            advances: HashMap::new(),
        }
    }

    pub fn with_style(mut self, style: FontStyle, metrics: CellMetrics) -> Self {
        self.styles.insert(style, metrics);
        self
    }

    pub fn with_advance(mut self, ch: char, advance: f64) -> Self {
        self.advances.insert(ch, advance);
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn advance(&self, ch: char) -> f64 {
        self.advances.get(&ch).copied().unwrap_or(self.default_advance)
    }
}

/// Case-insensitive registry of font faces.
#[derive(Clone, Debug, Default)]
pub struct FontCatalog {
    faces: HashMap<String, FontFace>,
}

impl FontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, face: FontFace) {
        self.faces.insert(face.family.to_lowercase(), face);
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn face(&self, font: &Font) -> Option<&FontFace> {
        self.faces.get(&font.family.to_lowercase())
    }

    pub fn metrics(&self, font: &Font) -> Result<FontMetrics> {
        let unavailable = || {
            tracing::debug!(family = %font.family, style = ?font.style, "no metrics for font");
            RenderError::MetricsUnavailable {
                family: font.family.clone(),
                style: font.style,
            }
        };
        let face = self.face(font).ok_or_else(unavailable)?;
        let cell = face.styles.get(&font.style).ok_or_else(unavailable)?;
        Ok(FontMetrics {
            em_height: face.em_height,
            cell_ascent: cell.ascent,
            cell_descent: cell.descent,
            line_spacing: cell.line_spacing,
        })
    }

    /// Sum of glyph advances converted to pixels at `dpi_x`.
    pub fn advance_width(&self, text: &str, font: &Font, dpi_x: f64) -> Result<f64> {
        // resolves the style too, so unknown styles fail like metric lookups
        self.metrics(font)?;
        let face = self.face(font).ok_or_else(|| RenderError::MetricsUnavailable {
            family: font.family.clone(),
            style: font.style,
        })?;
        let units: f64 = text.chars().map(|ch| face.advance(ch)).sum();
        let points = font.size_points / face.em_height * units;
        Ok(dpi_x / POINTS_PER_INCH * points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FontCatalog {
        let mut catalog = FontCatalog::new();
        catalog.register(
            FontFace::new("Test Sans", 1000.0, 500.0)
                .with_style(
                    FontStyle::Regular,
                    CellMetrics {
                        ascent: 800.0,
                        descent: 200.0,
                        line_spacing: 1150.0,
                    },
                )
                .with_advance(' ', 250.0),
        );
        catalog
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let font = Font::new("test sans", 10.0, FontStyle::Regular);
        let metrics = catalog().metrics(&font).unwrap();
        assert_eq!(metrics.cell_ascent, 800.0);
    }

    #[test]
    fn missing_style_is_reported() {
        let font = Font::new("Test Sans", 10.0, FontStyle::Bold);
        match catalog().metrics(&font) {
            Err(RenderError::MetricsUnavailable { style, .. }) => assert_eq!(style, FontStyle::Bold),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn advance_width_counts_trailing_spaces() {
        let font = Font::new("Test Sans", 72.0, FontStyle::Regular);
        let catalog = catalog();
        // 72pt at 72dpi: one em is 72px, 'a' is 36px, ' ' is 18px
        assert_eq!(catalog.advance_width("a", &font, 72.0).unwrap(), 36.0);
        assert_eq!(catalog.advance_width("a  ", &font, 72.0).unwrap(), 72.0);
    }
}
