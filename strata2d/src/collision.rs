//! Collision detection over rectangles and pixel surfaces.
//!
//! Everything here is a pure function of its inputs. Rectangles follow the
//! screen convention (`y` grows downwards) except for [`detect_box_collision`],
//! whose side names follow the physics convention where "bottom" is the
//! minimum-`y` edge.

use serde::{Deserialize, Serialize};

use crate::geometry::{point_in_rect, Point, Rectangle};
use crate::math::Vector;
use crate::render::PixelSurface;

/// Which side (if any) of a rectangle a collision happened on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionType {
    None,
    General,
    OnX,
    OnY,
    Left,
    Right,
    Top,
    Bottom,
}

impl CollisionType {
    pub fn is_side(&self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Top | Self::Bottom)
    }
}

impl std::fmt::Display for CollisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::General => "General",
            Self::OnX => "OnX",
            Self::OnY => "OnY",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Top => "Top",
            Self::Bottom => "Bottom",
        };
        f.write_str(name)
    }
}

/// Spatial relation between two rectangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Outside,
    Inside,
    Touch,
}

/// What kind of thing was hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionClass {
    Unknown,
    Wall,
    Projectile,
    Entity,
    Bitmap,
}

/// Whether a [`PixelCollision`] carries a point or a tangent line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionVectorType {
    Point,
    Line,
}

/// How [`detect_box_collision`] picks its representative point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepresentativePointMethod {
    /// Project the centre of `b` onto the struck edge of `a`.
    #[default]
    Simple,
    /// Centre of the overlap rectangle.
    IntersectionRectangle,
}

/// Policy for [`detect_box_collision`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxCollisionOptions {
    pub method: RepresentativePointMethod,
    /// On a tie between a horizontal and a vertical side, report the
    /// horizontal one.
    pub prefer_left_right: bool,
}

impl Default for BoxCollisionOptions {
    fn default() -> Self {
        Self {
            method: RepresentativePointMethod::Simple,
            prefer_left_right: true,
        }
    }
}

/// Result of a box-vs-box test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCollision {
    pub side: CollisionType,
    pub normal: Vector,
    pub representative_point: Point,
}

/// A hit found by scanning a pixel surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelCollision {
    pub side: CollisionType,
    /// The pixel hit (for `Point`) or a direction along the surface (for `Line`).
    pub point_or_tangent: Vector,
    pub vector_type: CollisionVectorType,
}

impl std::fmt::Display for PixelCollision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.side, self.point_or_tangent)
    }
}

/// Overlap test on minimum bounding rectangles. Touching edges overlap.
pub fn detect_mbr_collision(r1: &Rectangle, r2: &Rectangle) -> CollisionType {
    if r1.bottom() < r2.top() || r2.bottom() < r1.top() {
        return CollisionType::None;
    }
    if r1.right() < r2.left() || r2.right() < r1.left() {
        return CollisionType::None;
    }
    CollisionType::General
}

/// Reports the first side on which `inner` pokes out of `outer`, checked
/// left, right, top, bottom.
pub fn detect_mbr_collision_interior(inner: &Rectangle, outer: &Rectangle) -> CollisionType {
    if inner.x < outer.x {
        CollisionType::Left
    } else if inner.right() > outer.right() {
        CollisionType::Right
    } else if inner.y < outer.y {
        CollisionType::Top
    } else if inner.bottom() > outer.bottom() {
        CollisionType::Bottom
    } else {
        CollisionType::None
    }
}

/// Moves `inner` back inside `outer` across the given side.
pub fn resolve_interior_collision(
    inner: &Rectangle,
    outer: &Rectangle,
    side: CollisionType,
) -> Rectangle {
    match side {
        CollisionType::Left => Rectangle { x: outer.x, ..*inner },
        CollisionType::Right => Rectangle {
            x: outer.right() - inner.width,
            ..*inner
        },
        CollisionType::Top => Rectangle { y: outer.y, ..*inner },
        CollisionType::Bottom => Rectangle {
            y: outer.bottom() - inner.height,
            ..*inner
        },
        _ => *inner,
    }
}

pub fn mbr_relate(r1: &Rectangle, r2: &Rectangle) -> Relation {
    if detect_mbr_collision(r1, r2) != CollisionType::None {
        Relation::Touch
    } else if detect_mbr_collision_interior(r1, r2) != CollisionType::None {
        Relation::Outside
    } else {
        Relation::Inside
    }
}

pub fn mbr_relate_point(x: f64, y: f64, rect: &Rectangle) -> Relation {
    if point_in_rect(Point::new(x, y), rect) {
        Relation::Inside
    } else {
        Relation::Outside
    }
}

/// Finds which side of `a` is struck by `b`, using the side of least
/// penetration.
///
/// Both axes must overlap strictly; touching boxes do not collide.
pub fn detect_box_collision(
    a: &Rectangle,
    b: &Rectangle,
    method: RepresentativePointMethod,
    prefer_left_right: bool,
) -> Option<BoxCollision> {
    let (a_xmin, a_xmax, a_ymin, a_ymax) = (a.x, a.right(), a.y, a.bottom());
    let (b_xmin, b_xmax, b_ymin, b_ymax) = (b.x, b.right(), b.y, b.bottom());

    let overlap_x = a_xmin < b_xmax && a_xmax > b_xmin;
    let overlap_y = a_ymin < b_ymax && a_ymax > b_ymin;
    if !overlap_x || !overlap_y {
        return None;
    }

    let left = b_xmax - a_xmin;
    let right = a_xmax - b_xmin;
    let bottom = b_ymax - a_ymin;
    let top = a_ymax - b_ymin;
    let min = left.min(right).min(bottom).min(top);

    let vertical_allowed = !prefer_left_right || (min != left && min != right);
    let mut side = CollisionType::None;
    let mut normal = Vector::ZERO;
    if min == left {
        side = CollisionType::Left;
        normal = Vector::new(-1.0, 0.0);
    }
    if min == right {
        side = CollisionType::Right;
        normal = Vector::new(1.0, 0.0);
    }
    if min == bottom && vertical_allowed {
        side = CollisionType::Bottom;
        normal = Vector::new(0.0, -1.0);
    }
    if min == top && vertical_allowed {
        side = CollisionType::Top;
        normal = Vector::new(0.0, 1.0);
    }

    let representative_point = match method {
        RepresentativePointMethod::Simple => {
            let centre = b.center();
            match side {
                CollisionType::Right => Point::new(a_xmax, centre.y.clamp(a_ymin, a_ymax)),
                CollisionType::Left => Point::new(a_xmin, centre.y.clamp(a_ymin, a_ymax)),
                CollisionType::Top => Point::new(centre.x.clamp(a_xmin, a_xmax), a_ymax),
                CollisionType::Bottom => Point::new(centre.x.clamp(a_xmin, a_xmax), a_ymin),
                _ => Point::default(),
            }
        }
        RepresentativePointMethod::IntersectionRectangle => {
            let ix_min = a_xmin.max(b_xmin);
            let iy_min = a_ymin.max(b_ymin);
            let ix_max = a_xmax.min(b_xmax);
            let iy_max = a_ymax.min(b_ymax);
            Point::new((ix_min + ix_max) * 0.5, (iy_min + iy_max) * 0.5)
        }
    };

    Some(BoxCollision {
        side,
        normal,
        representative_point,
    })
}

/// [`detect_box_collision`] driven by a policy value.
pub fn detect_box_collision_with(
    a: &Rectangle,
    b: &Rectangle,
    options: BoxCollisionOptions,
) -> Option<BoxCollision> {
    detect_box_collision(a, b, options.method, options.prefer_left_right)
}

// Scan bounds use truncation toward zero for the starting row/column and
// compare the running index against the unrounded rectangle edges.

fn solid_at<S: PixelSurface + ?Sized>(surface: &S, x: i64, y: i64) -> bool {
    surface.contains(x, y) && surface.is_solid(x as u32, y as u32)
}

fn hit(x: i64, y: i64) -> Vector {
    Vector::new3(x as f64, y as f64, 0.0)
}

fn scan_top<S: PixelSurface + ?Sized>(rect: &Rectangle, surface: &S) -> Option<Vector> {
    let mut y = (rect.y + rect.height / 2.0) as i64;
    while y as f64 >= rect.y {
        let mut x = rect.x as i64;
        while (x as f64) < rect.right() {
            if solid_at(surface, x, y) {
                return Some(hit(x, y));
            }
            x += 1;
        }
        y -= 1;
    }
    None
}

fn scan_bottom<S: PixelSurface + ?Sized>(rect: &Rectangle, surface: &S) -> Option<Vector> {
    let mut y = (rect.y + rect.height / 2.0) as i64;
    while y as f64 <= rect.bottom() {
        let mut x = rect.x as i64;
        while (x as f64) < rect.right() {
            if solid_at(surface, x, y) {
                return Some(hit(x, y));
            }
            x += 1;
        }
        y += 1;
    }
    None
}

fn scan_left<S: PixelSurface + ?Sized>(rect: &Rectangle, surface: &S) -> Option<Vector> {
    let mut x = (rect.x + rect.width / 2.0) as i64;
    while x as f64 >= rect.x {
        let mut y = rect.y as i64;
        while (y as f64) < rect.bottom() {
            if solid_at(surface, x, y) {
                return Some(hit(x, y));
            }
            y += 1;
        }
        x -= 1;
    }
    None
}

fn scan_right<S: PixelSurface + ?Sized>(rect: &Rectangle, surface: &S) -> Option<Vector> {
    let mut x = (rect.x + rect.width / 2.0) as i64;
    while (x as f64) < rect.right() {
        let mut y = rect.y as i64;
        while (y as f64) < rect.bottom() {
            if solid_at(surface, x, y) {
                return Some(hit(x, y));
            }
            y += 1;
        }
        x += 1;
    }
    None
}

fn scan_side<S: PixelSurface + ?Sized>(
    side: CollisionType,
    rect: &Rectangle,
    surface: &S,
) -> Option<Vector> {
    match side {
        CollisionType::Top => scan_top(rect, surface),
        CollisionType::Bottom => scan_bottom(rect, surface),
        CollisionType::Left => scan_left(rect, surface),
        CollisionType::Right => scan_right(rect, surface),
        _ => None,
    }
}

fn point_collision(side: CollisionType, point: Vector) -> PixelCollision {
    PixelCollision {
        side,
        point_or_tangent: point,
        vector_type: CollisionVectorType::Point,
    }
}

/// Scans all four halves of `rect` for solid pixels.
///
/// Results come in the order bottom, top, left, right.
pub fn detect_bitmap_collisions<S: PixelSurface + ?Sized>(
    rect: &Rectangle,
    surface: &S,
) -> Vec<PixelCollision> {
    [
        CollisionType::Bottom,
        CollisionType::Top,
        CollisionType::Left,
        CollisionType::Right,
    ]
    .into_iter()
    .filter_map(|side| scan_side(side, rect, surface).map(|p| point_collision(side, p)))
    .collect()
}

/// Scans caller-supplied regions, one side per region.
pub fn detect_bitmap_collisions_in<S: PixelSurface + ?Sized>(
    regions: &[(CollisionType, Rectangle)],
    surface: &S,
) -> Vec<PixelCollision> {
    let mut collisions = Vec::new();
    for (side, rect) in regions {
        if !side.is_side() {
            log::warn!("Unsupported collision type \"{side}\" in bitmap scan");
            continue;
        }
        if let Some(point) = scan_side(*side, rect, surface) {
            collisions.push(point_collision(*side, point));
        }
    }
    collisions
}

/// Like [`detect_bitmap_collisions_in`], but reports a tangent for every
/// pair of adjacent sides that both hit.
pub fn detect_bitmap_collisions_with_tangents<S: PixelSurface + ?Sized>(
    regions: &[(CollisionType, Rectangle)],
    surface: &S,
) -> Vec<PixelCollision> {
    use CollisionType::{Bottom, Left, Right, Top};

    let points = detect_bitmap_collisions_in(regions, surface);
    let find = |side: CollisionType| {
        points
            .iter()
            .find(|c| c.side == side)
            .map(|c| c.point_or_tangent)
    };

    const PAIRS: [(CollisionType, CollisionType); 8] = [
        (Bottom, Right),
        (Bottom, Left),
        (Top, Right),
        (Top, Left),
        (Right, Top),
        (Right, Bottom),
        (Left, Top),
        (Left, Bottom),
    ];

    PAIRS
        .iter()
        .filter_map(|&(first, second)| {
            let from = find(first)?;
            let to = find(second)?;
            Some(PixelCollision {
                side: first,
                point_or_tangent: to - from,
                vector_type: CollisionVectorType::Line,
            })
        })
        .collect()
}
