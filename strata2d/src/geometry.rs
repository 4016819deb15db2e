//! Axis-aligned rectangles and points.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point{{{}, {}}}", self.x, self.y)
    }
}

/// Integer rectangle handed to render targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Axis-aligned rectangle: `(x, y)` is the minimum corner.
///
/// The rectangle is a plain value; every "modifying" operation returns a new
/// rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Rounds every field to the nearest integer.
    pub fn to_pixel_rect(&self) -> PixelRect {
        PixelRect {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            w: self.width.round() as i32,
            h: self.height.round() as i32,
        }
    }

    /// Shrinks the height, moving the bottom edge up.
    pub fn raise_bottom(&self, amount: f64) -> Self {
        Self {
            height: self.height - amount,
            ..*self
        }
    }

    /// Shrinks the height, moving the top edge down. The bottom edge stays.
    pub fn lower_top(&self, amount: f64) -> Self {
        Self {
            y: self.y + amount,
            height: self.height - amount,
            ..*self
        }
    }

    /// Shrinks the width, moving the right edge left.
    pub fn narrow_right(&self, amount: f64) -> Self {
        Self {
            width: self.width - amount,
            ..*self
        }
    }

    /// Shrinks the width, moving the left edge right. The right edge stays.
    pub fn narrow_left(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            width: self.width - amount,
            ..*self
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_rect(point, self)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rectangle ({}, {}, {} x {})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// The smallest rectangle enclosing both inputs.
pub fn join(a: &Rectangle, b: &Rectangle) -> Rectangle {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    Rectangle {
        x,
        y,
        width: a.right().max(b.right()) - x,
        height: a.bottom().max(b.bottom()) - y,
    }
}

/// Inclusive point containment: points on an edge are inside.
pub fn point_in_rect(point: Point, rect: &Rectangle) -> bool {
    point.x >= rect.x
        && point.x <= rect.right()
        && point.y >= rect.y
        && point.y <= rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_operations_leave_original_untouched() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.raise_bottom(2.0), Rectangle::new(0.0, 0.0, 10.0, 8.0));
        assert_eq!(r.lower_top(2.0), Rectangle::new(0.0, 2.0, 10.0, 8.0));
        assert_eq!(r.lower_top(2.0).bottom(), r.bottom());
        assert_eq!(r.narrow_right(3.0), Rectangle::new(0.0, 0.0, 7.0, 10.0));
        assert_eq!(r.narrow_left(3.0), Rectangle::new(3.0, 0.0, 7.0, 10.0));
        assert_eq!(r.narrow_left(3.0).right(), r.right());
        assert_eq!(r, Rectangle::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn join_covers_both_rectangles() {
        let a = Rectangle::new(0.0, 0.0, 2.0, 2.0);
        let b = Rectangle::new(5.0, -1.0, 1.0, 1.0);
        assert_eq!(join(&a, &b), Rectangle::new(0.0, -1.0, 6.0, 3.0));
        assert_eq!(join(&b, &a), join(&a, &b));
    }

    #[test]
    fn edges_count_as_inside() {
        let r = Rectangle::new(1.0, 1.0, 4.0, 4.0);
        assert!(point_in_rect(Point::new(1.0, 5.0), &r));
        assert!(r.contains(Point::new(3.0, 3.0)));
        assert!(!r.contains(Point::new(5.5, 3.0)));
    }

    #[test]
    fn pixel_rect_rounds() {
        let r = Rectangle::new(0.4, 0.6, 9.5, 2.2);
        assert_eq!(
            r.to_pixel_rect(),
            PixelRect {
                x: 0,
                y: 1,
                w: 10,
                h: 2
            }
        );
    }

    #[test]
    fn rectangle_reads_from_scene_json() {
        let json = serde_json::json!({ "x": 1, "y": 2, "width": 10, "height": 10 });
        let rect: Rectangle = serde_json::from_value(json).unwrap();
        assert_eq!(rect, Rectangle::new(1.0, 2.0, 10.0, 10.0));
    }
}
