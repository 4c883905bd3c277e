//! SVG surface using a streaming XML writer.
//!
//! Every draw call becomes one element. Clip regions are written as
//! `clipPath` definitions and applied through a wrapping group so the clip
//! stays in the coordinate space it was set in.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::api::*;
use crate::backends::font_catalog::{FontCatalog, FontFace};
use crate::error::{RenderError, Result};
use crate::geometry::{Matrix, MatrixOrder, Point, RectF};
use crate::text::{Font, FontMetrics};

#[derive(Clone, Debug)]
struct SvgState {
    transform: Matrix,
    clip: Region,
    clip_ref: Option<String>,
    hints: RenderingHints,
}

impl Default for SvgState {
    fn default() -> Self {
        Self {
            transform: Matrix::identity(),
            clip: Region::infinite(),
            clip_ref: None,
            hints: RenderingHints::default(),
        }
    }
}

/// SVG surface wrapper around `quick_xml::Writer`.
pub struct SvgSurface<W: Write> {
    writer: Writer<W>,
    open_root: bool,
    state: SvgState,
    stack: Vec<(GraphicsState, SvgState)>,
    next_state_id: u32,
    gradient_counter: usize,
    clip_counter: usize,
    dpi: Dpi,
    fonts: FontCatalog,
}

impl<W: Write> SvgSurface<W> {
    /// Create a new SVG surface that writes into the provided sink, emitting the root `<svg>`.
    /// Width/height are expressed in CSS pixels; a matching `viewBox` is set.
    pub fn new(inner: W, width: f64, height: f64, options: &SurfaceOptions) -> Result<Self> {
        let mut writer = Writer::new_with_indent(inner, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let width_attr = width.to_string();
        let height_attr = height.to_string();
        let view_box_attr = format!("0 0 {} {}", width, height);

        let mut start = BytesStart::new("svg");
        start.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
        start.push_attribute(("version", "1.1"));
        start.push_attribute(("width", width_attr.as_str()));
        start.push_attribute(("height", height_attr.as_str()));
        start.push_attribute(("viewBox", view_box_attr.as_str()));
        writer.write_event(Event::Start(start))?;

        Ok(Self {
            writer,
            open_root: true,
            state: SvgState {
                hints: options.hints,
                ..SvgState::default()
            },
            stack: Vec::new(),
            next_state_id: 0,
            gradient_counter: 0,
            clip_counter: 0,
            dpi: options.dpi,
            fonts: FontCatalog::new(),
        })
    }

    pub fn register_font(&mut self, face: FontFace) {
        self.fonts.register(face);
    }

    /// Closes the root element if still open and returns the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.close_root()?;
        Ok(self.writer.into_inner())
    }

    fn close_root(&mut self) -> Result<()> {
        if self.open_root {
            self.writer.write_event(Event::End(BytesEnd::new("svg")))?;
            self.open_root = false;
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open_root {
            Ok(())
        } else {
            Err(RenderError::backend("SVG document is already closed"))
        }
    }

    fn brush_to_str(&mut self, brush: &Brush) -> Result<(String, Option<f64>)> {
        match brush {
            Brush::Solid(c) => {
                let opacity = (c.a < 255).then(|| c.a as f64 / 255.0);
                Ok((c.to_hex(), opacity))
            }
            Brush::Gradient(g) => {
                let id = format!("grad{}", self.gradient_counter);
                self.gradient_counter += 1;
                self.write_gradient_def(&id, g)?;
                Ok((format!("url(#{})", id), None))
            }
        }
    }

    fn write_gradient_def(&mut self, id: &str, gradient: &Gradient) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new("defs")))?;

        let end_tag = match &gradient.kind {
            GradientKind::Linear { start, end } => {
                let mut elem = BytesStart::new("linearGradient");
                elem.push_attribute(("id", id));
                elem.push_attribute(("gradientUnits", "userSpaceOnUse"));
                elem.push_attribute(("x1", start.x.to_string().as_str()));
                elem.push_attribute(("y1", start.y.to_string().as_str()));
                elem.push_attribute(("x2", end.x.to_string().as_str()));
                elem.push_attribute(("y2", end.y.to_string().as_str()));
                self.writer.write_event(Event::Start(elem))?;
                "linearGradient"
            }
            GradientKind::Radial {
                center,
                radius,
                focus,
            } => {
                let mut elem = BytesStart::new("radialGradient");
                elem.push_attribute(("id", id));
                elem.push_attribute(("gradientUnits", "userSpaceOnUse"));
                elem.push_attribute(("cx", center.x.to_string().as_str()));
                elem.push_attribute(("cy", center.y.to_string().as_str()));
                elem.push_attribute(("r", radius.to_string().as_str()));
                elem.push_attribute(("fx", focus.x.to_string().as_str()));
                elem.push_attribute(("fy", focus.y.to_string().as_str()));
                self.writer.write_event(Event::Start(elem))?;
                "radialGradient"
            }
        };

        for stop in &gradient.stops {
            let mut stop_elem = BytesStart::new("stop");
            stop_elem.push_attribute(("offset", stop.offset.to_string().as_str()));
            stop_elem.push_attribute(("stop-color", stop.color.to_hex().as_str()));
            if stop.color.a < 255 {
                let opacity = (stop.color.a as f64 / 255.0).to_string();
                stop_elem.push_attribute(("stop-opacity", opacity.as_str()));
            }
            self.writer.write_event(Event::Empty(stop_elem))?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(end_tag)))?;
        self.writer.write_event(Event::End(BytesEnd::new("defs")))?;
        Ok(())
    }

    /// Writes one `clipPath` per shape, each clipped by the previous, and
    /// returns the id of the last one.
    fn write_clip_defs(&mut self, region: &Region, parent: Option<String>) -> Result<Option<String>> {
        let mut parent = parent;
        let transform = self.state.transform;
        for shape in region.shapes() {
            let id = format!("clip{}", self.clip_counter);
            self.clip_counter += 1;

            self.writer.write_event(Event::Start(BytesStart::new("defs")))?;
            let mut clip = BytesStart::new("clipPath");
            clip.push_attribute(("id", id.as_str()));
            clip.push_attribute(("clipPathUnits", "userSpaceOnUse"));
            if let Some(p) = &parent {
                clip.push_attribute(("clip-path", format!("url(#{})", p).as_str()));
            }
            self.writer.write_event(Event::Start(clip))?;

            let (d, rule) = match shape {
                RegionShape::Rect(r) => (rect_to_d(r), FillRule::Winding),
                RegionShape::Path(p) => (path_to_d(p), p.fill_rule),
            };
            let mut elem = BytesStart::new("path");
            elem.push_attribute(("d", d.as_str()));
            elem.push_attribute(("clip-rule", fill_rule_attr(rule)));
            push_transform_attr(&mut elem, &transform);
            self.writer.write_event(Event::Empty(elem))?;

            self.writer.write_event(Event::End(BytesEnd::new("clipPath")))?;
            self.writer.write_event(Event::End(BytesEnd::new("defs")))?;
            parent = Some(id);
        }
        Ok(parent)
    }

    /// Writes `elem`, wrapped in a clipping group when a clip is active.
    fn write_clipped(&mut self, mut elem: BytesStart<'_>) -> Result<()> {
        self.ensure_open()?;
        push_transform_attr(&mut elem, &self.state.transform);
        if let Some(rendering) = shape_rendering_attr(self.state.hints.smoothing_mode) {
            elem.push_attribute(("shape-rendering", rendering));
        }
        match self.state.clip_ref.clone() {
            Some(clip) => {
                let mut group = BytesStart::new("g");
                group.push_attribute(("clip-path", format!("url(#{})", clip).as_str()));
                self.writer.write_event(Event::Start(group))?;
                self.writer.write_event(Event::Empty(elem))?;
                self.writer.write_event(Event::End(BytesEnd::new("g")))?;
            }
            None => self.writer.write_event(Event::Empty(elem))?,
        }
        Ok(())
    }

    fn write_image(&mut self, image: &Bitmap, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let href = encode_image_as_data_uri(image)?;
        let mut elem = BytesStart::new("image");
        elem.push_attribute(("x", x.to_string().as_str()));
        elem.push_attribute(("y", y.to_string().as_str()));
        elem.push_attribute(("width", width.to_string().as_str()));
        elem.push_attribute(("height", height.to_string().as_str()));
        elem.push_attribute(("preserveAspectRatio", "none"));
        elem.push_attribute(("href", href.as_str()));
        self.write_clipped(elem)
    }
}

fn encode_image_as_data_uri(image: &Bitmap) -> Result<String> {
    let png_bytes = image.encode_png()?;
    let encoded = BASE64_STANDARD.encode(png_bytes);
    Ok(format!("data:image/png;base64,{}", encoded))
}

fn push_transform_attr(elem: &mut BytesStart<'_>, transform: &Matrix) {
    if !transform.is_identity() {
        let [a, b, c, d, e, f] = transform.elements;
        let transform_attr = format!("matrix({} {} {} {} {} {})", a, b, c, d, e, f);
        elem.push_attribute(("transform", transform_attr.as_str()));
    }
}

fn shape_rendering_attr(mode: SmoothingMode) -> Option<&'static str> {
    match mode {
        SmoothingMode::Default => None,
        SmoothingMode::None | SmoothingMode::HighSpeed => Some("crispEdges"),
        SmoothingMode::AntiAlias | SmoothingMode::HighQuality => Some("geometricPrecision"),
    }
}

fn fill_rule_attr(rule: FillRule) -> &'static str {
    match rule {
        FillRule::Alternate => "evenodd",
        FillRule::Winding => "nonzero",
    }
}

fn rect_to_d(r: &RectF) -> String {
    format!("M {} {} H {} V {} H {} Z", r.x, r.y, r.right(), r.bottom(), r.x)
}

fn path_to_d(path: &Path) -> String {
    let mut parts = Vec::with_capacity(path.commands.len());
    for cmd in &path.commands {
        parts.push(match cmd {
            PathCommand::MoveTo(p) => format!("M {} {}", p.x, p.y),
            PathCommand::LineTo(p) => format!("L {} {}", p.x, p.y),
            PathCommand::CubicTo { c1, c2, to } => {
                format!("C {} {} {} {} {} {}", c1.x, c1.y, c2.x, c2.y, to.x, to.y)
            }
            PathCommand::QuadTo { c, to } => format!("Q {} {} {} {}", c.x, c.y, to.x, to.y),
            PathCommand::Rect(r) => rect_to_d(r),
            PathCommand::Ellipse(r) => {
                let (rx, ry) = (r.width / 2.0, r.height / 2.0);
                let cy = r.y + ry;
                format!(
                    "M {} {} A {} {} 0 1 0 {} {} A {} {} 0 1 0 {} {} Z",
                    r.x,
                    cy,
                    rx,
                    ry,
                    r.right(),
                    cy,
                    rx,
                    ry,
                    r.x,
                    cy
                )
            }
            PathCommand::Close => "Z".to_string(),
        });
    }
    parts.join(" ")
}

impl<W: Write> DrawingSurface for SvgSurface<W> {
    fn fill_path(&mut self, brush: &Brush, path: &Path) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        let (fill, opacity) = self.brush_to_str(brush)?;
        let d = path_to_d(path);
        let mut elem = BytesStart::new("path");
        elem.push_attribute(("d", d.as_str()));
        elem.push_attribute(("fill", fill.as_str()));
        elem.push_attribute(("stroke", "none"));
        elem.push_attribute(("fill-rule", fill_rule_attr(path.fill_rule)));
        if let Some(opacity) = opacity {
            elem.push_attribute(("fill-opacity", opacity.to_string().as_str()));
        }
        self.write_clipped(elem)
    }

    fn draw_path(&mut self, pen: &Pen, path: &Path) -> Result<()> {
        if path.is_empty() {
            return Ok(());
        }
        let (stroke, opacity) = self.brush_to_str(&pen.brush)?;
        let d = path_to_d(path);
        let mut elem = BytesStart::new("path");
        elem.push_attribute(("d", d.as_str()));
        elem.push_attribute(("fill", "none"));
        elem.push_attribute(("stroke", stroke.as_str()));
        elem.push_attribute(("stroke-width", pen.width.to_string().as_str()));
        elem.push_attribute((
            "stroke-linecap",
            match pen.line_cap {
                LineCap::Flat => "butt",
                LineCap::Round => "round",
                LineCap::Square => "square",
            },
        ));
        elem.push_attribute((
            "stroke-linejoin",
            match pen.line_join {
                LineJoin::Round => "round",
                LineJoin::Bevel => "bevel",
                LineJoin::Miter => "miter",
            },
        ));
        if pen.line_join == LineJoin::Miter {
            elem.push_attribute(("stroke-miterlimit", pen.miter_limit.to_string().as_str()));
        }
        if let Some(opacity) = opacity {
            elem.push_attribute(("stroke-opacity", opacity.to_string().as_str()));
        }
        if !pen.dash_pattern.is_empty() {
            let dash = pen
                .dash_pattern
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            elem.push_attribute(("stroke-dasharray", dash.as_str()));
        }
        if pen.dash_offset != 0.0 {
            elem.push_attribute(("stroke-dashoffset", pen.dash_offset.to_string().as_str()));
        }
        self.write_clipped(elem)
    }

    fn draw_image_unscaled(&mut self, image: &Bitmap, location: Point) -> Result<()> {
        self.write_image(
            image,
            location.x as f64,
            location.y as f64,
            image.width as f64,
            image.height as f64,
        )
    }

    fn draw_image(&mut self, image: &Bitmap, dest: RectF, src: RectF, unit: GraphicsUnit) -> Result<()> {
        let src = unit.rect_to_pixels(src, self.dpi);
        if src.is_empty() || dest.is_empty() {
            return Ok(());
        }
        let full = RectF::new(0.0, 0.0, image.width as f64, image.height as f64);
        if src == full {
            return self.write_image(image, dest.x, dest.y, dest.width, dest.height);
        }

        // Nest the sub-rectangle in its own viewport so only `src` shows.
        self.ensure_open()?;
        let href = encode_image_as_data_uri(image)?;
        let view_box = format!("{} {} {} {}", src.x, src.y, src.width, src.height);
        let mut viewport = BytesStart::new("svg");
        viewport.push_attribute(("x", dest.x.to_string().as_str()));
        viewport.push_attribute(("y", dest.y.to_string().as_str()));
        viewport.push_attribute(("width", dest.width.to_string().as_str()));
        viewport.push_attribute(("height", dest.height.to_string().as_str()));
        viewport.push_attribute(("viewBox", view_box.as_str()));
        viewport.push_attribute(("preserveAspectRatio", "none"));

        let mut group = BytesStart::new("g");
        push_transform_attr(&mut group, &self.state.transform);
        if let Some(clip) = &self.state.clip_ref {
            group.push_attribute(("clip-path", format!("url(#{})", clip).as_str()));
        }
        self.writer.write_event(Event::Start(group))?;
        self.writer.write_event(Event::Start(viewport))?;
        let mut img = BytesStart::new("image");
        img.push_attribute(("width", image.width.to_string().as_str()));
        img.push_attribute(("height", image.height.to_string().as_str()));
        img.push_attribute(("href", href.as_str()));
        self.writer.write_event(Event::Empty(img))?;
        self.writer.write_event(Event::End(BytesEnd::new("svg")))?;
        self.writer.write_event(Event::End(BytesEnd::new("g")))?;
        Ok(())
    }

    fn clip(&self) -> Result<Region> {
        Ok(self.state.clip.clone())
    }

    fn set_clip(&mut self, region: &Region, mode: CombineMode) -> Result<()> {
        self.ensure_open()?;
        match mode {
            CombineMode::Replace => {
                self.state.clip = region.clone();
                self.state.clip_ref = self.write_clip_defs(region, None)?;
            }
            CombineMode::Intersect => {
                self.state.clip.intersect(region);
                let parent = self.state.clip_ref.clone();
                self.state.clip_ref = self.write_clip_defs(region, parent)?;
            }
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
        self.close_root()?;
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PointF;

    fn svg_output<F>(f: F) -> String
    where
        F: FnOnce(&mut SvgSurface<Vec<u8>>) -> Result<()>,
    {
        let buf = Vec::new();
        let mut svg = SvgSurface::new(buf, 100.0, 100.0, &SurfaceOptions::default()).expect("create svg");
        f(&mut svg).expect("draw operations");
        let out = svg.finish().expect("finish svg");
        String::from_utf8(out).expect("utf8")
    }

    fn square() -> Path {
        let mut path = Path::new();
        path.add_rect(RectF::new(0.0, 0.0, 10.0, 10.0));
        path
    }

    #[test]
    fn writes_path_fill() {
        let out = svg_output(|svg| svg.fill_path(&Brush::Solid(Color::rgb(255, 0, 0)), &square()));

        assert!(out.contains("<path d=\"M 0 0 H 10 V 10 H 0 Z\" fill=\"#ff0000\" stroke=\"none\" fill-rule=\"evenodd\"/>"));
    }

    #[test]
    fn writes_linear_gradient_defs_and_usage() {
        let out = svg_output(|svg| {
            let mut grad = Gradient::linear(PointF::new(0.0, 0.0), PointF::new(10.0, 0.0));
            grad.add_color_stop(0.0, Color::rgb(255, 0, 0));
            grad.add_color_stop(1.0, Color::rgb(0, 0, 255));
            svg.fill_path(&Brush::Gradient(grad), &square())
        });

        assert!(out.contains("<linearGradient id=\"grad0\" gradientUnits=\"userSpaceOnUse\" x1=\"0\" y1=\"0\" x2=\"10\" y2=\"0\""));
        assert!(out.contains("<stop offset=\"0\" stop-color=\"#ff0000\"/>"));
        assert!(out.contains("<stop offset=\"1\" stop-color=\"#0000ff\"/>"));
        assert!(out.contains("fill=\"url(#grad0)\""));
    }

    #[test]
    fn applies_transform_to_stroke() {
        let out = svg_output(|svg| {
            svg.translate_transform(5.0, 6.0, MatrixOrder::Append)?;
            svg.draw_path(&Pen::new(Brush::Solid(Color::BLACK), 1.5), &square())
        });

        assert!(out.contains("stroke-width=\"1.5\""));
        assert!(out.contains("transform=\"matrix(1 0 0 1 5 6)\""));
    }

    #[test]
    fn clip_wraps_elements_in_group() {
        let out = svg_output(|svg| {
            svg.set_clip(&Region::from_rect(RectF::new(0.0, 0.0, 5.0, 5.0)), CombineMode::Replace)?;
            svg.set_clip(&Region::from_path(square()), CombineMode::Intersect)?;
            svg.fill_path(&Brush::Solid(Color::BLACK), &square())
        });

        assert!(out.contains("<clipPath id=\"clip0\" clipPathUnits=\"userSpaceOnUse\">"));
        assert!(out.contains("<clipPath id=\"clip1\" clipPathUnits=\"userSpaceOnUse\" clip-path=\"url(#clip0)\">"));
        assert!(out.contains("<g clip-path=\"url(#clip1)\">"));
    }

    #[test]
    fn draw_image_inlines_png_data_uri() {
        let img = Bitmap::from_rgba(1, 1, vec![255, 0, 0, 255]).unwrap();
        let out = svg_output(|svg| svg.draw_image_unscaled(&img, Point::new(2, 3)));

        assert!(out.contains("<image"));
        assert!(out.contains("x=\"2\" y=\"3\" width=\"1\" height=\"1\""));
        assert!(out.contains("href=\"data:image/png;base64,"));
    }

    #[test]
    fn restore_rewinds_to_checkpoint() {
        let mut svg = SvgSurface::new(Vec::new(), 10.0, 10.0, &SurfaceOptions::default()).unwrap();
        svg.translate_transform(1.0, 2.0, MatrixOrder::Append).unwrap();
        let outer = svg.save().unwrap();
        svg.scale_transform(3.0, 3.0, MatrixOrder::Append).unwrap();
        let inner = svg.save().unwrap();
        svg.rotate_transform(30.0, MatrixOrder::Append).unwrap();

        svg.restore(inner).unwrap();
        assert_eq!(svg.transform().unwrap(), Matrix::new(3.0, 0.0, 0.0, 3.0, 3.0, 6.0));
        svg.restore(outer).unwrap();
        assert_eq!(svg.transform().unwrap(), Matrix::translation(1.0, 2.0));
        assert!(matches!(svg.restore(inner), Err(RenderError::UnknownGraphicsState)));
    }

    #[test]
    fn release_closes_document() {
        let mut svg = SvgSurface::new(Vec::new(), 10.0, 10.0, &SurfaceOptions::default()).unwrap();
        svg.release().unwrap();
        assert!(svg.fill_path(&Brush::Solid(Color::BLACK), &square()).is_err());
        let out = String::from_utf8(svg.finish().unwrap()).unwrap();
        assert!(out.trim_end().ends_with("</svg>"));
    }
}
