//! Viewing rectangle, zoom, and world-to-screen transforms.

use crate::geometry::{Point, Rectangle};
use crate::math::Vector;

/// A 2D camera: the world rectangle currently in view plus a zoom factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    view: Rectangle,
    zoom: f64,
}

impl Camera {
    /// A camera at the world origin showing `width` x `height` at zoom 1.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            view: Rectangle::new(0.0, 0.0, width, height),
            zoom: 1.0,
        }
    }

    /// Builder form of [`set_zoom`](Self::set_zoom).
    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.set_zoom(zoom);
        self
    }

    /// Top-left corner of the view in world coordinates.
    pub fn position(&self) -> Point {
        Point::new(self.view.x, self.view.y)
    }

    /// Moves the view without any clamping.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.view.x = x;
        self.view.y = y;
    }

    /// Unzoomed view width, normally the viewport width.
    pub fn width(&self) -> f64 {
        self.view.width
    }

    /// Unzoomed view height.
    pub fn height(&self) -> f64 {
        self.view.height
    }

    /// Resizes the view, keeping its position.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.view.width = width;
        self.view.height = height;
    }

    /// Current zoom factor; above 1 magnifies.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom factor. Non-positive or non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        } else {
            log::warn!("Ignoring invalid camera zoom {zoom}");
        }
    }

    /// Adds `delta` to the zoom, subject to the same checks as `set_zoom`.
    pub fn zoom_by(&mut self, delta: f64) {
        self.set_zoom(self.zoom + delta);
    }

    /// Position and unzoomed size. See [`visible_world`](Self::visible_world)
    /// for the area actually on screen.
    pub fn viewing_rectangle(&self) -> Rectangle {
        self.view
    }

    /// The world area that ends up on screen once zoom is applied.
    pub fn visible_world(&self) -> Rectangle {
        Rectangle::new(
            self.view.x,
            self.view.y,
            self.view.width / self.zoom,
            self.view.height / self.zoom,
        )
    }

    /// Centres the visible world on `target`.
    ///
    /// Offsets and clamp limits use the zoomed size from
    /// [`visible_world`](Self::visible_world). With `outer_bounds`, the view is
    /// pushed back so it does not show anything beyond the bounds (the
    /// left/top edge wins when the view is larger than the bounds).
    pub fn center(&mut self, target: &Rectangle, outer_bounds: Option<&Rectangle>) {
        let centre = target.center();
        let visible_width = self.view.width / self.zoom;
        let visible_height = self.view.height / self.zoom;
        self.view.x = centre.x - visible_width / 2.0;
        self.view.y = centre.y - visible_height / 2.0;

        if let Some(bounds) = outer_bounds {
            if self.view.x + visible_width > bounds.right() {
                self.view.x = bounds.right() - visible_width;
            }
            if self.view.x < bounds.x {
                self.view.x = bounds.x;
            }

            if self.view.y + visible_height > bounds.bottom() {
                self.view.y = bounds.bottom() - visible_height;
            }
            if self.view.y < bounds.y {
                self.view.y = bounds.y;
            }
        }
    }
}

/// Maps a world rectangle into screen space.
///
/// The camera position is subtracted, then position and size are scaled by
/// the zoom. With `flip_y` the result is reflected about the viewport height
/// (`y' = viewport_height - y - h`) for y-up content.
pub fn to_screen_coords(
    camera: &Camera,
    rect: &Rectangle,
    _viewport_width: f64,
    viewport_height: f64,
    flip_y: bool,
) -> Rectangle {
    let zoom = camera.zoom();
    let origin = camera.position();
    let mut screen = Rectangle::new(
        (rect.x - origin.x) * zoom,
        (rect.y - origin.y) * zoom,
        rect.width * zoom,
        rect.height * zoom,
    );
    if flip_y {
        screen.y = viewport_height - screen.y - screen.height;
    }
    screen
}

/// Point version of [`to_screen_coords`].
pub fn point_to_screen_coords(
    camera: &Camera,
    point: Vector,
    viewport_height: f64,
    flip_y: bool,
) -> Vector {
    let zoom = camera.zoom();
    let origin = camera.position();
    let mut screen = Vector::new((point.x - origin.x) * zoom, (point.y - origin.y) * zoom);
    if flip_y {
        screen.y = viewport_height - screen.y;
    }
    screen
}

/// Inverse of [`point_to_screen_coords`]: maps a window position (e.g. the
/// mouse) back into world coordinates.
pub fn window_to_local(
    camera: &Camera,
    window_point: Vector,
    viewport_height: f64,
    flip_y: bool,
) -> Vector {
    let zoom = camera.zoom();
    let origin = camera.position();
    let y = if flip_y {
        viewport_height - window_point.y
    } else {
        window_point.y
    };
    Vector::new(window_point.x / zoom + origin.x, y / zoom + origin.y)
}
