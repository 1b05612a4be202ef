use inkboard_shared::Point;

/// Signed extent of a drag. Width and height keep their sign so a drag in
/// any of the four directions produces the same rectangle on every peer.
pub struct RectBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub fn rect_bounds(anchor: Point, end: Point) -> RectBounds {
    RectBounds {
        x: anchor.x,
        y: anchor.y,
        width: end.x - anchor.x,
        height: end.y - anchor.y,
    }
}

/// The ellipse tool draws a circle centered on the anchor whose radius is
/// the Euclidean distance to the drag end.
pub fn circle_radius(anchor: Point, end: Point) -> f64 {
    let dx = end.x - anchor.x;
    let dy = end.y - anchor.y;
    (dx * dx + dy * dy).sqrt()
}

/// Third triangle vertex: the end point mirrored horizontally about the
/// anchor, sitting on the end point's baseline.
pub fn triangle_third_vertex(anchor: Point, end: Point) -> Point {
    Point::new(2.0 * anchor.x - end.x, end.y)
}

/// Text scales with the brush, not the drag distance.
pub fn text_font_px(brush_size: f64) -> f64 {
    (brush_size * 4.0).max(12.0)
}

pub fn normalize_point(point: Point) -> Option<Point> {
    if point.is_finite() {
        Some(point)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_supports_a_negative_direction_drag() {
        let bounds = rect_bounds(Point::new(0.0, 0.0), Point::new(-20.0, -10.0));
        assert_eq!(bounds.width, -20.0);
        assert_eq!(bounds.height, -10.0);
        // The occupied span is x in [-20, 0], y in [-10, 0].
        assert_eq!(bounds.x.min(bounds.x + bounds.width), -20.0);
        assert_eq!(bounds.x.max(bounds.x + bounds.width), 0.0);
        assert_eq!(bounds.y.min(bounds.y + bounds.height), -10.0);
        assert_eq!(bounds.y.max(bounds.y + bounds.height), 0.0);
    }

    #[test]
    fn circle_radius_is_the_euclidean_distance() {
        let radius = circle_radius(Point::new(1.0, 2.0), Point::new(4.0, 6.0));
        assert_eq!(radius, 5.0);
    }

    #[test]
    fn triangle_mirrors_the_end_point_about_the_anchor() {
        let third = triangle_third_vertex(Point::new(10.0, 0.0), Point::new(14.0, 8.0));
        assert_eq!(third, Point::new(6.0, 8.0));
    }

    #[test]
    fn text_has_a_legible_floor() {
        assert_eq!(text_font_px(1.0), 12.0);
        assert_eq!(text_font_px(10.0), 40.0);
    }

    #[test]
    fn non_finite_points_are_rejected() {
        assert!(normalize_point(Point::new(f64::NAN, 0.0)).is_none());
        assert!(normalize_point(Point::new(0.0, f64::INFINITY)).is_none());
        assert!(normalize_point(Point::new(3.0, 4.0)).is_some());
    }
}
