use glam::{DVec2, DVec4};
use serde::{Deserialize, Serialize};

/// Homogeneous vector used for positions, velocities and collision data.
///
/// Scene content is 2D, so `z` is usually zero and `w` is the homogeneous
/// coordinate (zero for directions, kept as written for points).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub w: f64,
}

impl Vector {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 0.0,
    };

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            w: 0.0,
        }
    }

    pub fn new3(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 0.0 }
    }

    pub fn to_glam(&self) -> DVec4 {
        DVec4::new(self.x, self.y, self.z, self.w)
    }

    /// The planar part of the vector.
    pub fn xy(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Length over the spatial components (`w` is ignored).
    pub fn length(&self) -> f64 {
        self.to_glam().truncate().length()
    }

    /// Returns a unit vector, or zero if the vector has no length.
    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Self::ZERO
        } else {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
                w: self.w,
            }
        }
    }

    /// Dot product over the spatial components.
    pub fn dot(self, rhs: Self) -> f64 {
        self.to_glam().truncate().dot(rhs.to_glam().truncate())
    }

    pub fn distance(self, rhs: Self) -> f64 {
        (self - rhs).length()
    }
}

impl From<(f64, f64)> for Vector {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<DVec2> for Vector {
    fn from(value: DVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl std::ops::Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w,
        }
    }
}

impl std::ops::AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            w: self.w,
        }
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
            w: self.w,
        }
    }
}

impl std::ops::Div<f64> for Vector {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
            w: self.w,
        }
    }
}

impl std::ops::Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizing_zero_stays_zero() {
        assert_eq!(Vector::ZERO.normalized(), Vector::ZERO);
    }

    #[test]
    fn length_ignores_homogeneous_coordinate() {
        let v = Vector {
            x: 3.0,
            y: 4.0,
            z: 0.0,
            w: 1.0,
        };
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.normalized().w, 1.0);
    }

    #[test]
    fn subtraction_gives_direction_between_points() {
        let a = Vector::new(6.0, 5.0);
        let b = Vector::new(5.0, 6.0);
        assert_eq!(a - b, Vector::new(1.0, -1.0));
        assert_eq!(a.distance(b), 2f64.sqrt());
    }
}
