use crate::math::{point, Point};
use crate::path::geom::utils::orient2d;
use crate::path::Path;
use crate::{Triangulation, TriangulationError, Triangulator, TriangulatorOptions};

use alloc::vec::Vec;
use rand::{Rng, SeedableRng};

fn polygon(path: &mut Path, points: &[Point]) {
    path.move_to(points[0]).unwrap();
    for &p in &points[1..] {
        path.line_to(p).unwrap();
    }
    path.close(true).unwrap();
}

fn polygon_area(points: &[Point]) -> f64 {
    let mut area = 0.0;
    for i in 1..points.len() - 1 {
        area += orient2d(points[0], points[i], points[i + 1]);
    }

    (area * 0.5).abs()
}

// Checks that every triangle is counter-clockwise and returns the total area.
fn check_triangles(triangulation: &Triangulation) -> f64 {
    assert_eq!(triangulation.indices.len() % 3, 0);
    for &i in &triangulation.indices {
        assert!((i as usize) < triangulation.vertices.len());
    }

    let mut area = 0.0;
    for [a, b, c] in triangulation.triangles() {
        let doubled = orient2d(a, b, c);
        assert!(doubled > 0.0, "triangle {:?} {:?} {:?} is not counter-clockwise", a, b, c);
        area += doubled * 0.5;
    }

    area
}

fn test_polygon(points: &[Point]) -> Triangulation {
    let mut path = Path::new();
    polygon(&mut path, points);

    let triangulation = Triangulator::new().triangulate(&path).unwrap();
    let area = check_triangles(&triangulation);
    let expected = polygon_area(points);
    assert!(
        (area - expected).abs() <= expected * 1e-5,
        "area {} expected {}",
        area,
        expected
    );
    assert_eq!(triangulation.num_triangles(), points.len() - 2);

    triangulation
}

#[test]
fn test_square() {
    let triangulation = test_polygon(&[
        point(0.0, 0.0),
        point(100.0, 0.0),
        point(100.0, 100.0),
        point(0.0, 100.0),
    ]);
    assert_eq!(triangulation.vertices.len(), 4);
    assert_eq!(triangulation.indices.len(), 6);
}

#[test]
fn test_clockwise_square() {
    test_polygon(&[
        point(0.0, 0.0),
        point(0.0, 100.0),
        point(100.0, 100.0),
        point(100.0, 0.0),
    ]);
}

#[test]
fn test_concave_arrow() {
    test_polygon(&[
        point(0.0, 0.0),
        point(10.0, 5.0),
        point(0.0, 10.0),
        point(4.0, 5.0),
    ]);
}

#[test]
fn test_notches() {
    // Split and merge vertices on both sides.
    test_polygon(&[
        point(0.0, 0.0),
        point(4.0, 1.0),
        point(8.0, 0.0),
        point(12.0, 3.0),
        point(8.0, 5.0),
        point(12.0, 8.0),
        point(8.0, 10.0),
        point(4.0, 9.0),
        point(0.0, 10.0),
        point(3.0, 5.0),
    ]);
}

#[test]
fn test_comb() {
    test_polygon(&[
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(8.0, 10.0),
        point(8.0, 2.0),
        point(6.0, 2.0),
        point(6.0, 10.0),
        point(4.0, 10.0),
        point(4.0, 2.0),
        point(2.0, 2.0),
        point(2.0, 10.0),
        point(0.0, 10.0),
    ]);
}

#[test]
fn test_spiral() {
    test_polygon(&[
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(2.0, 10.0),
        point(2.0, 4.0),
        point(6.0, 4.0),
        point(6.0, 6.0),
        point(4.0, 6.0),
        point(4.0, 8.0),
        point(8.0, 8.0),
        point(8.0, 2.0),
        point(0.0, 2.0),
    ]);
}

#[test]
fn test_touching_triangles() {
    // Two triangles meeting at a single vertex.
    let mut path = Path::new();
    polygon(
        &mut path,
        &[
            point(0.0, 0.0),
            point(5.0, 5.0),
            point(10.0, 0.0),
            point(10.0, 10.0),
            point(5.0, 5.0),
            point(0.0, 10.0),
        ],
    );

    let triangulation = Triangulator::new().triangulate(&path).unwrap();
    assert_eq!(triangulation.num_triangles(), 2);
    assert_eq!(triangulation.vertices.len(), 5);
    assert!((check_triangles(&triangulation) - 50.0).abs() < 1e-6);
}

#[test]
fn test_random_star_shaped_polygons() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);

    for _ in 0..200 {
        let n = rng.gen_range(3..40);
        let mut angles: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0..core::f32::consts::TAU)).collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
        angles.dedup();

        let points: Vec<Point> = angles
            .iter()
            .map(|&a| {
                let r = rng.gen_range(30.0..100.0);
                point(500.0 + r * a.cos(), 500.0 + r * a.sin())
            })
            .collect();

        if points.len() < 3 || polygon_area(&points) < 1.0 {
            continue;
        }

        test_polygon(&points);
    }
}

#[test]
fn test_square_with_hole() {
    let mut path = Path::new();
    polygon(
        &mut path,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0)],
    );
    polygon(
        &mut path,
        &[point(3.0, 3.0), point(7.0, 3.0), point(7.0, 7.0), point(3.0, 7.0)],
    );

    let triangulation = Triangulator::new().triangulate(&path).unwrap();
    assert!((check_triangles(&triangulation) - 84.0).abs() < 1e-6);
    assert_eq!(triangulation.num_triangles(), 8);

    // No triangle covers the hole.
    let center = point(5.0, 5.0);
    for [a, b, c] in triangulation.triangles() {
        let inside = orient2d(a, b, center) > 0.0 && orient2d(b, c, center) > 0.0 && orient2d(c, a, center) > 0.0;
        assert!(!inside);
    }
}

#[test]
fn test_disjoint_sub_paths() {
    let mut path = Path::new();
    polygon(
        &mut path,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0)],
    );
    polygon(
        &mut path,
        &[point(20.0, 0.0), point(30.0, 0.0), point(25.0, 10.0)],
    );

    let triangulation = Triangulator::new().triangulate(&path).unwrap();
    assert!((check_triangles(&triangulation) - 150.0).abs() < 1e-6);
    assert_eq!(triangulation.num_triangles(), 3);

    let options = TriangulatorOptions::DEFAULT.with_merge_sub_paths(false);
    assert!(matches!(
        Triangulator::with_options(options).triangulate(&path),
        Err(TriangulationError::InvalidInput(_))
    ));
}

#[test]
fn test_self_intersecting() {
    let mut path = Path::new();
    polygon(
        &mut path,
        &[point(0.0, 0.0), point(10.0, 10.0), point(10.0, 0.0), point(0.0, 10.0)],
    );

    assert!(matches!(
        Triangulator::new().triangulate(&path),
        Err(TriangulationError::InvalidInput(_))
    ));
}

#[test]
fn test_overlapping_sub_paths() {
    let mut path = Path::new();
    polygon(
        &mut path,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0)],
    );
    polygon(
        &mut path,
        &[point(5.0, 5.0), point(15.0, 5.0), point(15.0, 15.0), point(5.0, 15.0)],
    );

    let mut triangulator = Triangulator::new();
    assert!(triangulator.triangulate(&path).is_err());
    assert!(path.merge_failed());
    assert!(triangulator.triangulate(&path).is_err());
}

#[test]
fn test_degenerate_paths() {
    let mut triangulator = Triangulator::new();

    let empty = Path::new();
    let triangulation = triangulator.triangulate(&empty).unwrap();
    assert!(triangulation.indices.is_empty());

    let mut line = Path::new();
    polygon(&mut line, &[point(0.0, 0.0), point(5.0, 5.0), point(10.0, 10.0)]);
    let triangulation = triangulator.triangulate(&line).unwrap();
    assert!(triangulation.indices.is_empty());
}

#[test]
fn test_reuse_output() {
    let mut path = Path::new();
    polygon(
        &mut path,
        &[point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), point(0.0, 10.0)],
    );

    let mut triangulator = Triangulator::new();
    let mut output = Triangulation::new();
    triangulator.triangulate_into(&path, &mut output).unwrap();
    triangulator.triangulate_into(&path, &mut output).unwrap();
    assert_eq!(output.num_triangles(), 2);
}
