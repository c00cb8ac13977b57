use crate::math::{point, vector, Box2D, Point};
use crate::{Category, FillRule, LineCap, LineJoin, Path, PathError, Primitive, StrokeStyle};

use alloc::vec::Vec;

fn polygon(points: &[Point]) -> Path {
    let mut path = Path::new();
    path.move_to(points[0]).unwrap();
    for p in &points[1..] {
        path.line_to(*p).unwrap();
    }
    path.close(true).unwrap();

    path
}

fn square(size: f32) -> Path {
    polygon(&[
        point(0.0, 0.0),
        point(size, 0.0),
        point(size, size),
        point(0.0, size),
    ])
}

#[test]
fn operations_before_move_to() {
    let mut path = Path::new();
    assert_eq!(path.line_to(point(1.0, 1.0)), Err(PathError::InvalidState));
    assert_eq!(path.warp_to(point(1.0, 1.0)), Err(PathError::InvalidState));
    assert_eq!(
        path.quadratic_bezier_to(point(1.0, 1.0), point(2.0, 0.0), 0.25),
        Err(PathError::InvalidState)
    );
    assert_eq!(path.close(true), Err(PathError::InvalidState));
    assert_eq!(path.close(false), Err(PathError::InvalidState));
    assert!(path.is_empty());
    assert!(!path.is_started());
}

#[test]
fn no_op_moves() {
    let mut path = Path::new();
    path.move_to(point(1.0, 1.0)).unwrap();
    // Moving again without drawing replaces the start.
    path.move_to(point(2.0, 2.0)).unwrap();
    assert_eq!(path.num_lines(), 0);
    assert_eq!(path.current_position(), Some(point(2.0, 2.0)));

    path.line_to(point(3.0, 2.0)).unwrap();
    // Moving to the current position does nothing.
    path.move_to(point(3.0, 2.0)).unwrap();
    assert_eq!(path.num_lines(), 1);
    assert!(!path.has_multiple_sub_paths());

    // Same for warps.
    path.warp_to(point(3.0, 2.0)).unwrap();
    assert_eq!(path.num_lines(), 1);
}

#[test]
fn move_to_starts_a_sub_path() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(1.0, 0.0)).unwrap();
    path.line_to(point(1.0, 1.0)).unwrap();
    path.move_to(point(5.0, 5.0)).unwrap();

    assert!(path.has_multiple_sub_paths());
    // Invisible closing segment, then a warp.
    assert_eq!(path.num_lines(), 4);
    assert!(path.is_line_close(2));
    assert!(!path.is_line_visible(2));
    assert!(path.is_line_warp(3));
    assert_eq!(path.last_sub_path_start(), 4);
    assert_eq!(path.category(), Ok(Category::Complex));
}

#[test]
fn consecutive_warps_are_merged() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(1.0, 0.0)).unwrap();
    path.warp_to(point(2.0, 0.0)).unwrap();
    path.warp_to(point(3.0, 0.0)).unwrap();

    assert_eq!(path.num_lines(), 2);
    assert_eq!(path.line(1).to, point(3.0, 0.0));
}

#[test]
fn close_and_remove_last_line() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(10.0, 10.0)).unwrap();
    assert!(!path.is_closed());

    path.close(true).unwrap();
    assert!(path.is_closed());
    assert_eq!(path.num_lines(), 3);
    assert!(path.is_line_close(2));
    assert!(path.is_line_visible(2));

    // Closing a closed path does nothing.
    path.close(true).unwrap();
    assert_eq!(path.num_lines(), 3);

    assert!(path.remove_last_line());
    assert_eq!(path.num_lines(), 2);
    assert!(!path.is_closed());
    assert_eq!(path.current_position(), Some(point(10.0, 10.0)));

    assert!(path.remove_last_line());
    assert!(path.remove_last_line());
    assert!(!path.remove_last_line());
    assert!(path.is_closed());
}

#[test]
fn close_explicitly_closed_path() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(10.0, 0.0)).unwrap();
    path.line_to(point(10.0, 10.0)).unwrap();
    path.line_to(point(0.0, 0.0)).unwrap();
    assert!(path.is_closed());

    path.close(true).unwrap();
    assert_eq!(path.num_lines(), 3);
    assert!(path.is_line_close(2));
}

#[test]
fn bounding_box_and_lengths() {
    let mut path = square(10.0);
    assert_eq!(path.bounding_box(), Box2D::new(point(0.0, 0.0), point(10.0, 10.0)));
    for i in 0..path.num_lines() {
        assert_eq!(path.line_length(i), 10.0);
    }

    path.line_to(point(20.0, 0.0)).unwrap();
    assert_eq!(path.bounding_box().max, point(20.0, 10.0));
    assert_eq!(path.line_length(4), 20.0);
}

#[test]
fn copy_keeps_everything() {
    let mut path = square(10.0);
    path.set_style(StrokeStyle::DEFAULT.with_line_width(3.0));
    assert_eq!(path.category(), Ok(Category::Convex));

    let mut copy = Path::new();
    copy.copy_from(&path).unwrap();
    assert_eq!(copy.points(), path.points());
    assert_eq!(copy.num_lines(), path.num_lines());
    assert_eq!(copy.style().line_width, 3.0);
    assert!(copy.is_closed());
}

#[test]
fn append_primitives() {
    let mut path = Path::new();
    path.append_primitive(&Primitive::Rect(Box2D::new(point(1.0, 2.0), point(5.0, 6.0))))
        .unwrap();
    assert_eq!(path.num_lines(), 4);
    assert!(path.is_closed());
    assert_eq!(path.bounding_box(), Box2D::new(point(1.0, 2.0), point(5.0, 6.0)));

    let mut rounded = Path::new();
    rounded
        .append_primitive(&Primitive::RoundedRect {
            rect: Box2D::new(point(0.0, 0.0), point(100.0, 50.0)),
            radii: vector(10.0, 10.0),
            flatness: 0.1,
        })
        .unwrap();
    assert!(rounded.is_closed());
    assert!(rounded.num_lines() > 8);
    let bbox = rounded.bounding_box();
    assert!((bbox.min - point(0.0, 0.0)).length() < 1e-3);
    assert!((bbox.max - point(100.0, 50.0)).length() < 1e-3);
    assert!(!rounded.is_point_inside(point(0.5, 0.5), FillRule::NonZero));
    assert!(rounded.is_point_inside(point(50.0, 25.0), FillRule::NonZero));
    assert_eq!(rounded.category(), Ok(Category::Convex));
}

#[test]
fn arcs() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.arc_to(point(20.0, 0.0), vector(10.0, 10.0), 0.0, false, true, 0.1)
        .unwrap();
    assert_eq!(path.current_position(), Some(point(20.0, 0.0)));
    assert!(path.num_lines() > 4);
    for p in path.points() {
        let d = (*p - point(10.0, 0.0)).length();
        assert!((d - 10.0).abs() < 1e-2);
    }

    // Zero radii draw a straight line.
    let mut straight = Path::new();
    straight.move_to(point(0.0, 0.0)).unwrap();
    straight
        .arc_to(point(20.0, 0.0), vector(0.0, 0.0), 0.0, false, true, 0.1)
        .unwrap();
    assert_eq!(straight.num_lines(), 1);
}

#[test]
fn dash_a_line() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(100.0, 0.0)).unwrap();

    let mut dashed = Path::new();
    path.create_dash(&mut dashed, 0.0, &[10.0, 10.0], -1.0).unwrap();

    let visible = (0..dashed.num_lines()).filter(|&i| dashed.is_line_visible(i)).count();
    let warps = (0..dashed.num_lines()).filter(|&i| dashed.is_line_warp(i)).count();
    assert_eq!(visible, 5);
    assert_eq!(warps, 5);
    assert_eq!(dashed.line(0), crate::geom::LineSegment::new(point(0.0, 0.0), point(10.0, 0.0)));
    assert_eq!(dashed.current_position(), Some(point(100.0, 0.0)));
}

#[test]
fn dash_offset_and_scale() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(100.0, 0.0)).unwrap();

    // Starting in the middle of the first dash.
    let mut dashed = Path::new();
    path.create_dash(&mut dashed, 5.0, &[10.0, 10.0], -1.0).unwrap();
    assert_eq!(dashed.line(0).to, point(5.0, 0.0));

    // A negative offset starts in the gap.
    path.create_dash(&mut dashed, -5.0, &[10.0, 10.0], -1.0).unwrap();
    assert!(dashed.is_line_warp(0));
    assert_eq!(dashed.line(0).to, point(5.0, 0.0));

    // The path is declared as 50 units long: the pattern is doubled.
    path.create_dash(&mut dashed, 0.0, &[10.0, 10.0], 50.0).unwrap();
    assert_eq!(dashed.line(0).to, point(20.0, 0.0));

    assert!(path.create_dash(&mut dashed, 0.0, &[10.0, 10.0], 0.0).is_err());
    assert!(path.create_dash(&mut dashed, 0.0, &[10.0, -1.0], -1.0).is_err());
}

#[test]
fn dash_zero_pattern_on_long_line() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(3000.0, 0.0)).unwrap();

    // An empty pattern falls back to tiny dashes, scaled to the length of the path.
    let mut dashed = Path::new();
    path.create_dash(&mut dashed, 0.0, &[0.0, 0.0], -1.0).unwrap();

    let visible: Vec<usize> = (0..dashed.num_lines()).filter(|&i| dashed.is_line_visible(i)).collect();
    assert!(visible.len() >= 4999 && visible.len() <= 5001, "{} dashes", visible.len());
    for &i in &visible[..visible.len() - 1] {
        assert!((dashed.line_length(i) - 0.3).abs() < 0.01);
    }
    assert_eq!(dashed.current_position(), Some(point(3000.0, 0.0)));

    // Dashes much shorter than the coordinates still advance.
    let mut short = Path::new();
    short.move_to(point(100_000.0, 0.0)).unwrap();
    short.line_to(point(100_010.0, 0.0)).unwrap();
    short.create_dash(&mut dashed, 0.0, &[0.001, 0.001], -1.0).unwrap();
    assert!(dashed.num_lines() >= 2);
    assert_eq!(dashed.current_position(), Some(point(100_010.0, 0.0)));
}

#[test]
fn dash_closed_path() {
    let path = square(10.0);
    let mut dashed = Path::new();
    path.create_dash(&mut dashed, 0.0, &[3.0, 1.0], -1.0).unwrap();
    assert!(dashed.is_closed());
    assert!(dashed.num_lines() > 10);
}

#[test]
fn categories() {
    let convex = polygon(&[
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(15.0, 5.0),
        point(10.0, 10.0),
        point(0.0, 10.0),
    ]);
    assert_eq!(convex.category(), Ok(Category::Convex));

    let concave = polygon(&[
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(5.0, 5.0),
        point(10.0, 10.0),
        point(0.0, 10.0),
    ]);
    assert_eq!(concave.category(), Ok(Category::Simple));

    let pentagram = polygon(&[
        point(50.0, 0.0),
        point(79.0, 90.0),
        point(2.0, 35.0),
        point(98.0, 35.0),
        point(21.0, 90.0),
    ]);
    assert_eq!(pentagram.category(), Ok(Category::Complex));

    // The cache is reset by mutations.
    let mut path = convex.clone();
    path.force_convex();
    path.transform(&crate::math::Transform::scale(2.0, 2.0));
    assert_eq!(path.category(), Ok(Category::Convex));
}

#[test]
fn random_convex_polygons() {
    use rand::{Rng, SeedableRng};

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let n = rng.gen_range(3..20);
        let mut angles: Vec<f32> = (0..n).map(|_| rng.gen_range(0.0..core::f32::consts::TAU)).collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
        angles.dedup();

        let radius = rng.gen_range(1.0..1000.0f32);
        let points: Vec<Point> = angles
            .iter()
            .map(|a| point(radius * a.cos(), radius * a.sin()))
            .collect();
        let path = polygon(&points);
        assert_eq!(path.category(), Ok(Category::Convex));
    }
}

#[test]
fn outline_of_a_square() {
    let mut path = square(10.0);
    path.set_style(
        StrokeStyle::DEFAULT
            .with_line_width(2.0)
            .with_line_join(LineJoin::Miter),
    );

    let mut outline = Path::new();
    path.create_outline(&mut outline, 0.1, 0).unwrap();
    assert!(outline.num_lines() > 0);
    assert_eq!(outline.style().line_width, 2.0);

    let bbox = outline.bounding_box();
    assert!((bbox.min - point(-1.0, -1.0)).length() < 1e-4);
    assert!((bbox.max - point(11.0, 11.0)).length() < 1e-4);

    assert!(outline.is_point_inside(point(0.0, 5.0), FillRule::NonZero));
    assert!(outline.is_point_inside(point(-0.9, 5.0), FillRule::NonZero));
    assert!(outline.is_point_inside(point(10.5, 5.0), FillRule::NonZero));
    assert!(!outline.is_point_inside(point(5.0, 5.0), FillRule::NonZero));
    assert!(!outline.is_point_inside(point(-1.5, 5.0), FillRule::NonZero));
}

#[test]
fn outline_of_a_line() {
    let mut path = Path::new();
    path.move_to(point(0.0, 0.0)).unwrap();
    path.line_to(point(10.0, 0.0)).unwrap();

    for &(cap, min_x, max_x) in &[
        (LineCap::Butt, 0.0, 10.0),
        (LineCap::Square, -2.0, 12.0),
        (LineCap::Round, -2.0, 12.0),
    ] {
        path.set_style(StrokeStyle::DEFAULT.with_line_width(4.0).with_line_cap(cap));
        let mut outline = Path::new();
        path.create_outline(&mut outline, 0.05, 0).unwrap();

        let bbox = outline.bounding_box();
        assert!((bbox.min.x - min_x).abs() < 1e-3, "{:?} {:?}", cap, bbox);
        assert!((bbox.max.x - max_x).abs() < 1e-3, "{:?} {:?}", cap, bbox);
        assert!((bbox.min.y + 2.0).abs() < 1e-3);
        assert!((bbox.max.y - 2.0).abs() < 1e-3);
        assert!(outline.is_point_inside(point(5.0, 1.0), FillRule::NonZero));
    }
}

#[test]
fn outline_first_line_out_of_range() {
    let mut path = square(10.0);
    let mut outline = Path::new();
    let n = path.num_lines();
    assert!(matches!(
        path.create_outline(&mut outline, 0.1, n),
        Err(PathError::InvalidArgument(_))
    ));
}
