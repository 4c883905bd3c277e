use svg_render_context::backends::font_catalog::{CellMetrics, FontFace};
use svg_render_context::backends::recording::{DrawOp, RecordingSurface};
use svg_render_context::{
    Bitmap, Boundable, Brush, Color, CompositingQuality, Dpi, Font, FontStyle, GraphicsUnit, Matrix,
    MatrixOrder, Path, PixelOffsetMode, Point, RectF, Region, RenderError, Renderer, SmoothingMode,
    SurfaceOptions, TextRenderingHint,
};

fn assert_almost_eq(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}

fn test_face() -> FontFace {
    let regular = CellMetrics {
        ascent: 1854.0,
        descent: 434.0,
        line_spacing: 2355.0,
    };
    let bold = CellMetrics {
        ascent: 1900.0,
        descent: 450.0,
        line_spacing: 2400.0,
    };
    FontFace::new("Test Sans", 2048.0, 1100.0)
        .with_style(FontStyle::Regular, regular)
        .with_style(FontStyle::Bold, bold)
        .with_advance(' ', 512.0)
}

fn renderer_with_fonts<'b>(dpi: Dpi) -> Renderer<'b, RecordingSurface> {
    let options = SurfaceOptions {
        dpi,
        ..SurfaceOptions::default()
    };
    Renderer::from_surface(RecordingSurface::with_options(&options).with_font(test_face()))
}

struct Element {
    name: &'static str,
    bounds: RectF,
}

impl Boundable for Element {
    fn bounds(&self) -> RectF {
        self.bounds
    }
}

#[test]
fn measured_height_ignores_text() {
    let renderer = renderer_with_fonts(Dpi::default());
    let font = Font::new("Test Sans", 10.0, FontStyle::Regular);
    let heights: Vec<f64> = ["", "a", "a much longer run of text", "   "]
        .iter()
        .map(|text| renderer.measure_string(text, &font).unwrap().height)
        .collect();
    for h in &heights {
        assert_almost_eq(*h, heights[0]);
    }
    // 10pt / 2048 * 1854 at 96 dpi
    assert_almost_eq(heights[0], 96.0 / 72.0 * (10.0 / 2048.0 * 1854.0));
}

#[test]
fn measured_height_follows_style_and_dpi() {
    let font = Font::new("Test Sans", 10.0, FontStyle::Bold);
    let at_96 = renderer_with_fonts(Dpi::default()).measure_string("x", &font).unwrap();
    let at_144 = renderer_with_fonts(Dpi::new(96.0, 144.0))
        .measure_string("x", &font)
        .unwrap();
    assert_almost_eq(at_96.height, 96.0 / 72.0 * (10.0 / 2048.0 * 1900.0));
    assert_almost_eq(at_144.height, at_96.height * 1.5);
    assert_almost_eq(at_144.width, at_96.width);
}

#[test]
fn empty_string_has_zero_width() {
    let renderer = renderer_with_fonts(Dpi::default());
    for style in [FontStyle::Regular, FontStyle::Bold] {
        let size = renderer
            .measure_string("", &Font::new("Test Sans", 24.0, style))
            .unwrap();
        assert_eq!(size.width, 0.0);
        assert!(size.height > 0.0);
    }
}

#[test]
fn trailing_whitespace_is_measured() {
    let renderer = renderer_with_fonts(Dpi::new(72.0, 72.0));
    let font = Font::new("Test Sans", 2048.0 / 100.0, FontStyle::Regular);
    let bare = renderer.measure_string("ab", &font).unwrap().width;
    let padded = renderer.measure_string("ab  ", &font).unwrap().width;
    assert_almost_eq(padded - bare, 2.0 * 512.0 / 100.0);
}

#[test]
fn unknown_font_reports_metrics_unavailable() {
    let renderer = renderer_with_fonts(Dpi::default());
    match renderer.measure_string("x", &Font::new("Nope", 10.0, FontStyle::Regular)) {
        Err(RenderError::MetricsUnavailable { family, style }) => {
            assert_eq!(family, "Nope");
            assert_eq!(style, FontStyle::Regular);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn boundables_pop_in_reverse_order() {
    let elements = [
        Element {
            name: "svg",
            bounds: RectF::new(0.0, 0.0, 200.0, 100.0),
        },
        Element {
            name: "g",
            bounds: RectF::new(10.0, 10.0, 50.0, 50.0),
        },
        Element {
            name: "rect",
            bounds: RectF::new(12.0, 14.0, 3.0, 4.0),
        },
    ];
    let mut renderer = Renderer::from_surface(RecordingSurface::new());
    for e in &elements {
        renderer.push_boundable(e);
    }
    assert_eq!(renderer.boundable().unwrap().bounds(), elements[2].bounds);

    for e in elements.iter().rev() {
        let popped = renderer.pop_boundable().unwrap();
        assert_eq!(popped.bounds(), e.bounds, "expected {}", e.name);
    }
    assert!(matches!(renderer.pop_boundable(), Err(RenderError::EmptyBoundableStack)));
    assert!(matches!(renderer.boundable(), Err(RenderError::EmptyBoundableStack)));
}

#[test]
fn boundable_reports_location_and_size() {
    let element = Element {
        name: "image",
        bounds: RectF::new(3.0, 4.0, 30.0, 40.0),
    };
    let mut renderer = Renderer::from_surface(RecordingSurface::new());
    renderer.push_boundable(&element);
    let top = renderer.boundable().unwrap();
    assert_eq!(top.location().x, 3.0);
    assert_eq!(top.size().height, 40.0);
}

#[test]
fn rotation_round_trip_restores_matrix() {
    let mut renderer = Renderer::from_surface(RecordingSurface::new());
    let start = Matrix::new(2.0, 0.5, -0.25, 1.5, 10.0, 20.0);
    renderer.set_transform(start).unwrap();
    for angle in [0.0, 17.5, 90.0, 181.0, -45.0] {
        renderer.rotate_transform(angle).unwrap();
        renderer.rotate_transform(-angle).unwrap();
        assert!(renderer.transform().unwrap().approx_eq(&start, 1e-9), "angle {}", angle);
    }
}

#[test]
fn ordered_transforms_compose_as_requested() {
    let mut renderer = Renderer::from_surface(RecordingSurface::new());
    renderer.translate_transform(10.0, 0.0).unwrap();
    renderer.scale_transform_ordered(2.0, 3.0, MatrixOrder::Prepend).unwrap();
    assert_eq!(renderer.transform().unwrap(), Matrix::new(2.0, 0.0, 0.0, 3.0, 10.0, 0.0));

    renderer.scale_transform(2.0, 3.0).unwrap();
    assert_eq!(renderer.transform().unwrap(), Matrix::new(4.0, 0.0, 0.0, 9.0, 20.0, 0.0));

    renderer.translate_transform_ordered(1.0, 1.0, MatrixOrder::Prepend).unwrap();
    assert_eq!(renderer.transform().unwrap().offset_x(), 24.0);
    assert_eq!(renderer.transform().unwrap().offset_y(), 9.0);

    renderer
        .rotate_transform_ordered(90.0, MatrixOrder::Prepend)
        .unwrap();
    assert_eq!(renderer.transform().unwrap().offset_x(), 24.0);
}

#[test]
fn replace_then_intersect_same_region_is_replace() {
    let mut triangle = Path::new();
    triangle.move_to(0.0, 0.0).line_to(20.0, 0.0).line_to(0.0, 20.0).close();
    let regions = [
        Region::from_rect(RectF::new(1.0, 2.0, 30.0, 40.0)),
        Region::from_path(triangle),
    ];

    for region in &regions {
        let mut replaced = Renderer::from_surface(RecordingSurface::new());
        replaced.set_clip(region).unwrap();

        let mut combined = Renderer::from_surface(RecordingSurface::new());
        combined.set_clip(region).unwrap();
        combined.add_clip(region).unwrap();

        assert_eq!(combined.clip().unwrap(), replaced.clip().unwrap());
    }
}

#[test]
fn intersect_narrows_clip() {
    let mut renderer = Renderer::from_surface(RecordingSurface::new());
    assert!(renderer.clip().unwrap().is_infinite());
    renderer
        .set_clip(&Region::from_rect(RectF::new(0.0, 0.0, 10.0, 10.0)))
        .unwrap();
    renderer
        .add_clip(&Region::from_rect(RectF::new(5.0, 5.0, 10.0, 10.0)))
        .unwrap();
    assert_eq!(renderer.clip().unwrap().bounds(), Some(RectF::new(5.0, 5.0, 5.0, 5.0)));
}

#[test]
fn dispose_releases_exactly_once() {
    let surface = RecordingSurface::new();
    let tracker = surface.release_tracker();
    let mut renderer = Renderer::from_surface(surface);

    renderer.dispose().unwrap();
    assert_eq!(tracker.count(), 1);
    renderer.dispose().unwrap();
    drop(renderer);
    assert_eq!(tracker.count(), 1);
}

#[test]
fn drop_releases_on_error_paths() {
    fn render_and_fail(renderer: &mut Renderer<'_, RecordingSurface>) -> Result<(), RenderError> {
        renderer.set_text_contrast(100)?;
        Ok(())
    }

    let surface = RecordingSurface::new();
    let tracker = surface.release_tracker();
    {
        let mut renderer = Renderer::from_surface(surface);
        assert!(matches!(render_and_fail(&mut renderer), Err(RenderError::Backend(_))));
    }
    assert_eq!(tracker.count(), 1);
}

#[test]
fn into_surface_skips_release() {
    let surface = RecordingSurface::new();
    let tracker = surface.release_tracker();
    let renderer = Renderer::from_surface(surface);
    let surface = renderer.into_surface().unwrap();
    assert_eq!(tracker.count(), 0);
    drop(surface);
    assert_eq!(tracker.count(), 0);
}

#[test]
fn throwaway_renderer_measures_before_dispose() {
    let mut renderer = Renderer::<RecordingSurface>::from_null().unwrap();
    assert_eq!(renderer.surface().unwrap().target().map(|t| (t.width, t.height)), Some((1, 1)));
    renderer.surface_mut().unwrap().register_font(test_face());

    let size = renderer
        .measure_string("hello", &Font::new("Test Sans", 12.0, FontStyle::Regular))
        .unwrap();
    assert!(size.width > 0.0);
    assert!(size.height > 0.0);

    renderer.dispose().unwrap();
    assert!(matches!(
        renderer.measure_string("hello", &Font::new("Test Sans", 12.0, FontStyle::Regular)),
        Err(RenderError::Disposed)
    ));
}

#[test]
fn from_image_draws_with_snapshot_state() {
    let mut renderer = Renderer::<RecordingSurface>::from_image(Bitmap::new(32, 16)).unwrap();
    renderer.set_smoothing_mode(SmoothingMode::AntiAlias).unwrap();
    renderer.set_pixel_offset_mode(PixelOffsetMode::Half).unwrap();
    renderer.set_compositing_quality(CompositingQuality::HighQuality).unwrap();
    renderer.set_text_rendering_hint(TextRenderingHint::ClearTypeGridFit).unwrap();
    renderer.set_text_contrast(0).unwrap();

    let img = Bitmap::new(4, 4);
    renderer.draw_image_unscaled(&img, Point::new(2, 2)).unwrap();
    renderer
        .draw_image(&img, RectF::new(0.0, 0.0, 8.0, 8.0), RectF::new(0.0, 0.0, 4.0, 4.0), GraphicsUnit::Pixel)
        .unwrap();
    let mut path = Path::new();
    path.add_rect(RectF::new(0.0, 0.0, 1.0, 1.0));
    renderer.fill_path(&Brush::Solid(Color::rgb(1, 2, 3)), &path).unwrap();

    assert_eq!(renderer.smoothing_mode().unwrap(), SmoothingMode::AntiAlias);
    assert_eq!(renderer.pixel_offset_mode().unwrap(), PixelOffsetMode::Half);
    assert_eq!(renderer.compositing_quality().unwrap(), CompositingQuality::HighQuality);
    assert_eq!(renderer.text_rendering_hint().unwrap(), TextRenderingHint::ClearTypeGridFit);
    assert_eq!(renderer.text_contrast().unwrap(), 0);

    let ops = renderer.into_surface().unwrap().into_ops();
    assert_eq!(ops.len(), 3);
    for op in &ops {
        let state = match op {
            DrawOp::FillPath { state, .. }
            | DrawOp::StrokePath { state, .. }
            | DrawOp::DrawImageUnscaled { state, .. }
            | DrawOp::DrawImage { state, .. } => state,
        };
        assert_eq!(state.hints.smoothing_mode, SmoothingMode::AntiAlias);
        assert_eq!(state.hints.text_contrast, 0);
    }
}

#[test]
fn save_and_restore_round_trip() {
    let mut renderer = Renderer::from_surface(RecordingSurface::new());
    let checkpoint = renderer.save().unwrap();
    renderer.translate_transform(4.0, 4.0).unwrap();
    renderer
        .set_clip(&Region::from_rect(RectF::new(0.0, 0.0, 1.0, 1.0)))
        .unwrap();
    renderer.restore(checkpoint).unwrap();
    assert!(renderer.transform().unwrap().is_identity());
    assert!(renderer.clip().unwrap().is_infinite());
    assert!(matches!(renderer.restore(checkpoint), Err(RenderError::UnknownGraphicsState)));
}
