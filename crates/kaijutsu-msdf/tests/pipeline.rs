//! End-to-end generation from kurbo outlines.

use kurbo::{BezPath, Circle, Rect, Shape as _};
use pretty_assertions::assert_eq;
use tracing_subscriber::{EnvFilter, fmt};

use kaijutsu_msdf::coloring::is_corner;
use kaijutsu_msdf::{
    Contour, Edge, EdgeColor, EdgeSegment, MsdfBitmap, MsdfConfig, MsdfError, MsdfGenerator,
    Projection, Range, SdfBitmap, Shape, Vector2, color_edges_simple, correct_errors,
    generate_msdf, generate_sdf,
};

/// Route spans to the test harness; `RUST_LOG=msdf=debug` to see them.
fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Reverse contours as needed so the first winds clockwise (filled) and
/// the rest counter-clockwise (holes).
fn orient(mut shape: Shape) -> Shape {
    for (i, contour) in shape.contours.iter_mut().enumerate() {
        let want = if i == 0 { 1 } else { -1 };
        if contour.winding() != want {
            contour.reverse();
        }
    }
    shape
}

/// A ring: outer radius 10, hole radius 5, centered on the origin.
fn letter_o() -> Shape {
    let mut path = Circle::new((0.0, 0.0), 10.0).to_path(0.01);
    path.extend(Circle::new((0.0, 0.0), 5.0).to_path(0.01));
    orient(Shape::from(&path))
}

fn star(points: usize, outer: f64, inner: f64) -> Shape {
    let mut path = BezPath::new();
    for i in 0..points * 2 {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = i as f64 * std::f64::consts::PI / points as f64;
        let p = (radius * angle.cos(), radius * angle.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    orient(Shape::from(&path))
}

fn pixel_of(projection: &Projection, x: f64, y: f64) -> (u32, u32) {
    let p = projection.project(Vector2::new(x, y));
    (p.x.floor() as u32, p.y.floor() as u32)
}

#[test]
fn letter_o_hole_reads_outside() {
    init_tracing();
    let generator = MsdfGenerator::new(MsdfConfig::default()).unwrap();
    let mut shape = letter_o();
    let result = generator.generate(&mut shape, 48, 48).unwrap();
    let projection = &result.framing.projection;

    let (hx, hy) = pixel_of(projection, 0.0, 0.0);
    assert!(result.bitmap.median_at(hx, hy) < 0.5);

    let (rx, ry) = pixel_of(projection, 7.5, 0.0);
    assert!(result.bitmap.median_at(rx, ry) > 0.5);

    assert!(result.bitmap.median_at(0, 0) < 0.5);
    assert_eq!(result.bitmap.to_rgba8().len(), 48 * 48 * 4);
}

#[test]
fn square_median_sign_matches_true_distance() {
    init_tracing();
    let mut shape = orient(Shape::from(&Rect::new(2.0, 2.0, 14.0, 14.0).to_path(0.1)));
    color_edges_simple(&mut shape, 3.0, 0);
    let projection = Projection::default();

    let mut msdf = MsdfBitmap::new(16, 16).unwrap();
    generate_msdf(&mut msdf, &shape, &projection, 4.0).unwrap();
    correct_errors(&mut msdf, Vector2::new(1.001 / 4.0, 1.001 / 4.0));
    let mut sdf = SdfBitmap::new(16, 16).unwrap();
    generate_sdf(&mut sdf, &shape, &projection, 4.0).unwrap();

    for y in 0..16 {
        for x in 0..16 {
            let [truth] = sdf.pixel(x, y);
            assert_eq!(
                msdf.median_at(x, y) > 0.5,
                truth > 0.5,
                "pixel ({x}, {y})"
            );
        }
    }
}

#[test]
fn corner_keeps_pseudo_distance_sharpness() {
    let mut shape = orient(Shape::from(&Rect::new(2.0, 2.0, 14.0, 14.0).to_path(0.1)));
    color_edges_simple(&mut shape, 3.0, 7);
    let mut msdf = MsdfBitmap::new(16, 16).unwrap();
    generate_msdf(&mut msdf, &shape, &Projection::default(), 4.0).unwrap();

    // Pixel (15, 15) samples (15.5, 15.5), diagonally past the corner at
    // (14, 14): 1.5 units from both edge lines, 2.12 from the corner point.
    let median = msdf.median_at(15, 15);
    assert!((median - (0.5 - 1.5 / 4.0)).abs() < 1e-5, "{median}");
}

#[test]
fn corners_never_share_a_color() {
    for shape in [star(5, 10.0, 4.0), star(3, 8.0, 2.0), letter_o()] {
        let mut shape = shape;
        color_edges_simple(&mut shape, 3.0, 42);
        let cross_threshold = 3.0f64.sin();
        for contour in &shape.contours {
            let n = contour.len();
            for i in 0..n {
                let prev = &contour.edges[(i + n - 1) % n];
                let edge = &contour.edges[i];
                assert_ne!(edge.color, EdgeColor::Black);
                let corner = is_corner(
                    prev.direction(1.0).normalize(),
                    edge.direction(0.0).normalize(),
                    cross_threshold,
                );
                if corner {
                    assert_ne!(prev.color, edge.color, "corner at edge {i}");
                }
            }
        }
    }
}

#[test]
fn same_seed_same_bitmap() {
    let generator = MsdfGenerator::new(MsdfConfig {
        seed: 99,
        ..MsdfConfig::default()
    })
    .unwrap();
    let a = generator.generate(&mut star(5, 10.0, 4.0), 32, 32).unwrap();
    let b = generator.generate(&mut star(5, 10.0, 4.0), 32, 32).unwrap();
    assert_eq!(a.bitmap, b.bitmap);
    assert_eq!(a.clashes, b.clashes);
}

#[test]
fn flip_override_reverses_rows() {
    let upright = MsdfConfig::from_ron("(flip_y: Some(false))").unwrap();
    let flipped = MsdfConfig::from_ron("(flip_y: Some(true))").unwrap();

    let a = MsdfGenerator::new(upright).unwrap().generate(&mut star(3, 8.0, 2.0), 20, 24).unwrap();
    let b = MsdfGenerator::new(flipped).unwrap().generate(&mut star(3, 8.0, 2.0), 20, 24).unwrap();
    for y in 0..24 {
        assert_eq!(a.bitmap.row(y), b.bitmap.row(23 - y));
    }
}

#[test]
fn empty_shape_reads_outside_everywhere() {
    let generator = MsdfGenerator::default();

    let mut square = orient(Shape::from(&Rect::new(0.0, 0.0, 4.0, 4.0).to_path(0.1)));
    let filled = generator.generate(&mut square, 16, 16).unwrap();
    assert!(filled.bitmap.median_at(8, 8) > 0.5);
    let exterior = filled.bitmap.median_at(0, 0);
    assert!(exterior < 0.5);

    let result = generator.generate(&mut Shape::new(), 16, 16).unwrap();
    for y in 0..16 {
        for x in 0..16 {
            let median = result.bitmap.median_at(x, y);
            assert!(median < 0.5, "pixel ({x}, {y}) reads inside: {median}");
            assert!(median <= exterior);
        }
    }
    assert_eq!(result.clashes.total(), 0);
}

#[test]
fn open_contour_rejected() {
    let contour = Contour::from_edges([
        Edge::new(EdgeSegment::linear(Vector2::new(0.0, 0.0), Vector2::new(4.0, 0.0))),
        Edge::new(EdgeSegment::linear(Vector2::new(4.0, 1.0), Vector2::new(0.0, 0.0))),
    ]);
    let mut shape = Shape::from_contours([contour]);
    let err = MsdfGenerator::default().generate(&mut shape, 16, 16).unwrap_err();
    assert!(matches!(err, MsdfError::OpenContour { contour: 0, .. }));
}

#[test]
fn range_too_wide_cannot_fit() {
    let err = MsdfGenerator::default()
        .generate(&mut letter_o(), 4, 4)
        .unwrap_err();
    assert!(matches!(err, MsdfError::CannotFit { width: 4, height: 4 }));
}

#[test]
fn explicit_projection_resolves_range() {
    let units = MsdfGenerator::new(MsdfConfig {
        range: Range::Units(2.0),
        ..MsdfConfig::default()
    })
    .unwrap();
    let projection = Projection::uniform(2.0, Vector2::new(12.0, 12.0));
    let result = units
        .generate_with_projection(&mut letter_o(), 48, 48, projection)
        .unwrap();
    assert_eq!(result.framing.range, 2.0);
    assert_eq!(result.framing.projection, projection);

    let pixels = MsdfGenerator::default();
    let projection = Projection::new(Vector2::new(2.0, 4.0), Vector2::new(12.0, 6.0));
    let result = pixels
        .generate_with_projection(&mut letter_o(), 48, 48, projection)
        .unwrap();
    assert!((result.framing.range - 4.0 / 3.0).abs() < 1e-12);
}

#[test]
fn disabled_correction_reports_nothing() {
    let generator = MsdfGenerator::new(MsdfConfig {
        edge_threshold: 0.0,
        ..MsdfConfig::default()
    })
    .unwrap();
    let result = generator.generate(&mut star(5, 10.0, 4.0), 32, 32).unwrap();
    assert_eq!(result.clashes.total(), 0);
}
