use crate::math::{point, Point};
use crate::path::geom::Box2D;
use crate::path::{FillRule, Path};
use crate::{Coverage, RasterError, RasterOptions, Rasterizer, Span, SpanBuffer, MAX_SPAN_BATCH};

use alloc::vec::Vec;
use rand::{Rng, SeedableRng};

fn rectangle(path: &mut Path, x0: f32, y0: f32, x1: f32, y1: f32) {
    path.move_to(point(x0, y0)).unwrap();
    path.line_to(point(x1, y0)).unwrap();
    path.line_to(point(x1, y1)).unwrap();
    path.line_to(point(x0, y1)).unwrap();
    path.close(true).unwrap();
}

fn region(x0: i32, y0: i32, x1: i32, y1: i32) -> Box2D<i32> {
    Box2D::new((x0, y0).into(), (x1, y1).into())
}

fn rasterize(rasterizer: &mut Rasterizer, path: &Path) -> SpanBuffer {
    let mut spans = SpanBuffer::new();
    rasterizer.rasterize(path, &mut spans).unwrap();

    spans
}

#[test]
fn test_square_end_to_end() {
    let mut path = Path::new();
    rectangle(&mut path, 0.0, 0.0, 100.0, 100.0);

    let mut rasterizer = Rasterizer::new(100, 100).unwrap();
    rasterizer.set_quality(4).unwrap();
    rasterizer.set_fill_rule(FillRule::NonZero);
    let spans = rasterize(&mut rasterizer, &path);

    assert_eq!(spans.len(), 100);
    for (row, span) in spans.iter().enumerate() {
        assert_eq!(span.row, row as u32);
        assert_eq!(span.x, 0);
        assert_eq!(span.len, 100);
        assert_eq!(span.coverage, Coverage::Opaque(255));
    }
}

#[test]
fn test_aligned_square_at_all_qualities() {
    let mut path = Path::new();
    rectangle(&mut path, 10.0, 20.0, 50.0, 60.0);

    for &quality in &[1, 2, 4, 8, 16] {
        let mut rasterizer = Rasterizer::new(64, 64).unwrap();
        rasterizer.set_quality(quality).unwrap();
        let spans = rasterize(&mut rasterizer, &path);

        assert_eq!(spans.len(), 40, "quality {}", quality);
        for span in spans.iter() {
            assert!(span.row >= 20 && span.row < 60);
            assert_eq!(span.x, 10);
            assert_eq!(span.len, 40);
            assert_eq!(span.coverage, Coverage::Opaque(255));
        }
    }
}

#[test]
fn test_invalid_quality() {
    let mut rasterizer = Rasterizer::new(16, 16).unwrap();
    for &quality in &[0, 3, 12, 32] {
        assert!(matches!(
            rasterizer.set_quality(quality),
            Err(RasterError::InvalidArgument(_))
        ));
    }
    assert_eq!(rasterizer.options().quality, RasterOptions::DEFAULT_QUALITY);
}

#[test]
fn test_degenerate_paths() {
    let mut rasterizer = Rasterizer::new(32, 32).unwrap();

    assert!(rasterize(&mut rasterizer, &Path::new()).is_empty());

    // Goes back and forth along a line.
    let mut line = Path::new();
    line.move_to(point(1.0, 1.0)).unwrap();
    line.line_to(point(20.0, 25.0)).unwrap();
    line.close(true).unwrap();
    assert!(rasterize(&mut rasterizer, &line).is_empty());

    let mut horizontal = Path::new();
    horizontal.move_to(point(1.0, 5.0)).unwrap();
    horizontal.line_to(point(20.0, 5.0)).unwrap();
    horizontal.line_to(point(30.0, 5.0)).unwrap();
    assert!(rasterize(&mut rasterizer, &horizontal).is_empty());

    // Zero height.
    let mut flat = Path::new();
    rectangle(&mut flat, 2.0, 3.0, 10.0, 3.0);
    assert!(rasterize(&mut rasterizer, &flat).is_empty());
}

#[test]
fn test_partial_coverage() {
    let mut path = Path::new();
    rectangle(&mut path, 0.5, 0.0, 10.5, 4.0);

    let mut rasterizer = Rasterizer::new(16, 4).unwrap();
    let spans = rasterize(&mut rasterizer, &path);

    for row in 0..4 {
        assert_eq!(spans.coverage_at(0, row), 128);
        for x in 1..10 {
            assert_eq!(spans.coverage_at(x, row), 255);
        }
        assert_eq!(spans.coverage_at(10, row), 128);
        assert_eq!(spans.coverage_at(11, row), 0);
    }

    let first_row: Vec<Span> = spans.iter().filter(|s| s.row == 0).collect();
    assert_eq!(first_row.len(), 3);
    assert_eq!(first_row[0].coverage, Coverage::Mask(&[128]));
    assert_eq!(first_row[1].coverage, Coverage::Opaque(255));
    assert_eq!((first_row[1].x, first_row[1].len), (1, 9));
    assert_eq!(first_row[2].x, 10);
}

#[test]
fn test_half_row() {
    // Covers the top half of row 1.
    let mut path = Path::new();
    rectangle(&mut path, 0.0, 0.0, 8.0, 1.5);

    let mut rasterizer = Rasterizer::new(8, 4).unwrap();
    for &quality in &[2, 4, 16] {
        rasterizer.set_quality(quality).unwrap();
        let spans = rasterize(&mut rasterizer, &path);
        assert_eq!(spans.coverage_at(3, 0), 255);
        assert_eq!(spans.coverage_at(3, 1), 128);
        assert_eq!(spans.coverage_at(3, 2), 0);
    }
}

#[test]
fn test_fill_rules() {
    // Two nested squares going in the same direction.
    let mut path = Path::new();
    rectangle(&mut path, 0.0, 0.0, 20.0, 20.0);
    rectangle(&mut path, 5.0, 5.0, 15.0, 15.0);

    let mut rasterizer = Rasterizer::new(20, 20).unwrap();

    rasterizer.set_fill_rule(FillRule::NonZero);
    let spans = rasterize(&mut rasterizer, &path);
    assert_eq!(spans.coverage_at(2, 2), 255);
    assert_eq!(spans.coverage_at(10, 10), 255);

    rasterizer.set_fill_rule(FillRule::EvenOdd);
    let spans = rasterize(&mut rasterizer, &path);
    assert_eq!(spans.coverage_at(2, 2), 255);
    assert_eq!(spans.coverage_at(10, 10), 0);
    // Rows crossing the hole have two spans.
    assert_eq!(spans.iter().filter(|s| s.row == 10).count(), 2);
}

#[test]
fn test_region() {
    let mut path = Path::new();
    rectangle(&mut path, 0.0, 0.0, 100.0, 100.0);

    let mut rasterizer = Rasterizer::new(100, 100).unwrap();
    rasterizer.set_region(region(10, 10, 20, 30));
    let spans = rasterize(&mut rasterizer, &path);

    assert_eq!(spans.len(), 20);
    for span in spans.iter() {
        assert!(span.row >= 10 && span.row < 30);
        assert_eq!((span.x, span.len), (10, 10));
        assert_eq!(span.coverage, Coverage::Opaque(255));
    }

    // Clipped to the size of the rasterizer.
    rasterizer.set_region(region(-50, 90, 500, 500));
    assert_eq!(rasterizer.region(), region(0, 90, 100, 100));
    assert_eq!(rasterize(&mut rasterizer, &path).len(), 10);

    rasterizer.set_region(region(200, 200, 300, 300));
    assert!(rasterize(&mut rasterizer, &path).is_empty());
}

#[test]
fn test_outside_of_the_sides() {
    let mut rasterizer = Rasterizer::new(100, 10).unwrap();

    let mut right = Path::new();
    rectangle(&mut right, 50.0, 0.0, 200.0, 10.0);
    let spans = rasterize(&mut rasterizer, &right);
    assert_eq!(spans.len(), 10);
    for span in spans.iter() {
        assert_eq!((span.x, span.len), (50, 50));
    }

    let mut left = Path::new();
    rectangle(&mut left, -50.0, 0.0, 20.0, 10.0);
    let spans = rasterize(&mut rasterizer, &left);
    assert_eq!(spans.len(), 10);
    for span in spans.iter() {
        assert_eq!((span.x, span.len), (0, 20));
    }

    let mut outside = Path::new();
    rectangle(&mut outside, -50.0, -20.0, -10.0, 30.0);
    assert!(rasterize(&mut rasterizer, &outside).is_empty());
}

#[test]
fn test_limits() {
    let mut path = Path::new();
    rectangle(&mut path, 0.0, 0.0, 1.0e8, 10.0);

    let mut rasterizer = Rasterizer::new(16, 16).unwrap();
    let mut spans = SpanBuffer::new();
    assert_eq!(rasterizer.rasterize(&path, &mut spans), Err(RasterError::LimitExceeded));

    assert!(matches!(Rasterizer::new(1 << 23, 1), Err(RasterError::LimitExceeded)));
}

#[test]
fn test_near_horizontal_edge() {
    // The top edge drops by a fraction of a sub-row over four million pixels.
    let mut path = Path::new();
    path.move_to(point(0.0, 0.1249999)).unwrap();
    path.line_to(point(4_000_000.0, 0.1250001)).unwrap();
    path.line_to(point(0.0, 10.0)).unwrap();
    path.close(true).unwrap();

    let mut rasterizer = Rasterizer::new(100, 100).unwrap();
    rasterizer.set_quality(4).unwrap();
    let spans = rasterize(&mut rasterizer, &path);

    for row in 1..9 {
        assert_eq!(spans.coverage_at(50, row), 255, "row {}", row);
    }
    assert_eq!(spans.coverage_at(50, 20), 0);
}

#[test]
fn test_batches() {
    // One hundred one pixel wide bars.
    let mut path = Path::new();
    for i in 0..100 {
        let x = (i * 2) as f32;
        rectangle(&mut path, x, 0.0, x + 1.0, 2.0);
    }

    let mut rasterizer = Rasterizer::new(256, 2).unwrap();
    let mut batches = Vec::new();
    let mut previous: Option<(u32, u32)> = None;
    rasterizer
        .rasterize(&path, &mut |spans: &[Span]| {
            batches.push(spans.len());
            for span in spans {
                if let Some((row, x)) = previous {
                    assert!(span.row > row || (span.row == row && span.x > x));
                }
                previous = Some((span.row, span.x));
            }
        })
        .unwrap();

    assert!(batches.iter().all(|&len| len > 0 && len <= MAX_SPAN_BATCH));
    assert_eq!(batches.iter().sum::<usize>(), 200);
    assert_eq!(batches.len(), 4);
}

fn triangle_area(p: &[Point; 3]) -> f32 {
    ((p[1] - p[0]).cross(p[2] - p[0]) * 0.5).abs()
}

#[test]
fn test_random_triangles_coverage() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let mut rasterizer = Rasterizer::new(128, 128).unwrap();
    rasterizer.set_quality(16).unwrap();

    for _ in 0..100 {
        let mut p = [point(0.0, 0.0); 3];
        for v in &mut p {
            *v = point(rng.gen_range(0.0..128.0), rng.gen_range(0.0..128.0));
        }
        let area = triangle_area(&p);
        if area < 1.0 {
            continue;
        }

        let mut path = Path::new();
        path.move_to(p[0]).unwrap();
        path.line_to(p[1]).unwrap();
        path.line_to(p[2]).unwrap();
        path.close(true).unwrap();

        let spans = rasterize(&mut rasterizer, &path);
        let covered = spans.total_coverage() as f32 / 255.0;
        let perimeter = (p[1] - p[0]).length() + (p[2] - p[1]).length() + (p[0] - p[2]).length();
        assert!(
            (covered - area).abs() <= area * 0.01 + perimeter * 0.25 + 1.0,
            "covered {} area {}",
            covered,
            area
        );
    }
}
