//! Closed outlines built from plain points.

use rmscene_core::scene::Point;

use crate::cli::Shape;

/// Point width used for every vertex (the nominal stroke width scales it).
const POINT_WIDTH: f32 = 2.0;

impl Shape {
    pub fn points(self, x: f32, y: f32, size: f32) -> Vec<Point> {
        match self {
            Shape::Rectangle => rectangle(x, y, size, size),
            Shape::Triangle => triangle(x, y, size),
        }
    }
}

/// Five points, last equal to first.
pub fn rectangle(x: f32, y: f32, w: f32, h: f32) -> Vec<Point> {
    closed(&[(x, y), (x + w, y), (x + w, y + h), (x, y + h)])
}

/// Isosceles triangle standing on its base, four points.
pub fn triangle(x: f32, y: f32, size: f32) -> Vec<Point> {
    closed(&[(x + size / 2.0, y), (x + size, y + size), (x, y + size)])
}

fn closed(corners: &[(f32, f32)]) -> Vec<Point> {
    corners
        .iter()
        .chain(corners.first())
        .map(|&(x, y)| Point::new(x, y, POINT_WIDTH))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_is_closed_with_five_points() {
        let pts = rectangle(0.0, 0.0, 10.0, 5.0);
        assert_eq!(pts.len(), 5);
        assert_eq!(pts.first(), pts.last());
        assert_eq!((pts[2].x, pts[2].y), (10.0, 5.0));
    }

    #[test]
    fn triangle_is_closed_with_four_points() {
        let pts = Shape::Triangle.points(0.0, 0.0, 8.0);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts.first(), pts.last());
        assert_eq!(pts[0].x, 4.0);
    }
}
