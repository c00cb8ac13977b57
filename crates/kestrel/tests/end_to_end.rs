use kestrel::math::point;
use kestrel::path::{Category, FillRule, Path, SelfIntersect};
use kestrel::raster::{Coverage, Rasterizer, SpanBuffer};
use kestrel::tessellation::Triangulator;

fn square() -> Path {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(100.0, 0.0)).unwrap();
    path.line_to(point(100.0, 100.0)).unwrap();
    path.line_to(point(0.0, 100.0)).unwrap();
    path.close(true).unwrap();

    path
}

#[test]
fn square_end_to_end() {
    let path = square();

    let mut rasterizer = Rasterizer::new(100, 100).unwrap();
    rasterizer.set_quality(4).unwrap();
    rasterizer.set_fill_rule(FillRule::NonZero);
    let mut spans = SpanBuffer::new();
    rasterizer.rasterize(&path, &mut spans).unwrap();

    assert_eq!(spans.len(), 100);
    for (row, span) in spans.iter().enumerate() {
        assert_eq!(span.row, row as u32);
        assert_eq!((span.x, span.len), (0, 100));
        assert_eq!(span.coverage, Coverage::Opaque(255));
    }

    let triangulation = Triangulator::new().triangulate(&path).unwrap();
    assert_eq!(triangulation.num_triangles(), 2);

    assert!(!SelfIntersect::new(&path).unwrap().is_self_intersecting().unwrap());
    assert_eq!(path.category(), Ok(Category::Convex));
}

#[test]
fn dashed_outline() {
    let mut line = Path::new();
    line.move_to(point(0.0, 10.0)).unwrap();
    line.line_to(point(100.0, 10.0)).unwrap();

    let mut dashed = Path::new();
    line.create_dash(&mut dashed, 0.0, &[10.0, 10.0], -1.0).unwrap();

    let mut stroke = dashed.clone();
    stroke.set_style(kestrel::path::StrokeStyle::DEFAULT.with_line_width(4.0));
    let mut outline = Path::new();
    stroke.create_outline(&mut outline, 0.25, 0).unwrap();

    let mut rasterizer = Rasterizer::new(100, 20).unwrap();
    let mut spans = SpanBuffer::new();
    rasterizer.rasterize(&outline, &mut spans).unwrap();

    // Dashes cover [0, 10), [20, 30)...
    for dash in 0..5 {
        assert_eq!(spans.coverage_at(dash * 20 + 5, 10), 255);
        assert_eq!(spans.coverage_at(dash * 20 + 15, 10), 0);
    }
    assert_eq!(spans.coverage_at(5, 5), 0);
}

#[test]
fn square_with_hole() {
    let mut path = square();
    path.move_to(point(25.0, 25.0)).unwrap();
    path.line_to(point(25.0, 75.0)).unwrap();
    path.line_to(point(75.0, 75.0)).unwrap();
    path.line_to(point(75.0, 25.0)).unwrap();
    path.close(true).unwrap();

    assert_eq!(path.category(), Ok(Category::Complex));

    let mut rasterizer = Rasterizer::new(100, 100).unwrap();
    let mut spans = SpanBuffer::new();
    rasterizer.rasterize(&path, &mut spans).unwrap();
    assert_eq!(spans.coverage_at(50, 50), 0);
    assert_eq!(spans.coverage_at(10, 50), 255);
    assert_eq!(spans.total_coverage(), 255 * (10_000 - 2_500));

    let triangulation = Triangulator::new().triangulate(&path).unwrap();
    let mut area = 0.0;
    for [a, b, c] in triangulation.triangles() {
        area += (b - a).cross(c - a) as f64 * 0.5;
    }
    assert!((area - 7_500.0).abs() < 1e-3);
}
