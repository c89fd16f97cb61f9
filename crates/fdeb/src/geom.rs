//! Plane vectors shared by both simulation phases.

use crate::error::DegenerateGeometry;

pub type Unit = euclid::UnknownUnit;

pub type Vector2D = euclid::Vector2D<f64, Unit>;

/// Distances and magnitudes at or below this are treated as zero.
pub const EPSILON: f64 = 1e-6;

pub fn vector(x: f64, y: f64) -> Vector2D {
    euclid::vec2(x, y)
}

/// Vector of the given magnitude pointing at `angle` radians from the x axis.
pub fn polar(magnitude: f64, angle: f64) -> Vector2D {
    vector(magnitude * angle.cos(), magnitude * angle.sin())
}

pub fn midpoint(a: Vector2D, b: Vector2D) -> Vector2D {
    (a + b) / 2.0
}

/// Unit vector from `from` towards `to`, together with the distance between them.
pub fn unit_between(
    from: Vector2D,
    to: Vector2D,
) -> std::result::Result<(Vector2D, f64), DegenerateGeometry> {
    let delta = to - from;
    let distance = delta.length();
    if distance > EPSILON {
        Ok((delta / distance, distance))
    } else {
        Err(DegenerateGeometry::CoincidentPoints)
    }
}

/// Orthogonal projection of `point` onto the infinite line through `a` and `b`.
pub fn project_onto_line(
    point: Vector2D,
    a: Vector2D,
    b: Vector2D,
) -> std::result::Result<Vector2D, DegenerateGeometry> {
    let line = b - a;
    let length_sq = line.square_length();
    if length_sq <= EPSILON * EPSILON {
        return Err(DegenerateGeometry::ZeroLengthEdge);
    }
    let r = (point - a).dot(line) / length_sq;
    Ok(a + line * r)
}

/// Polar-coordinate helpers on top of euclid's vector.
pub trait VectorExt: Sized {
    /// `atan2(y, x)`.
    fn polar_angle(self) -> f64;

    /// Same direction, new magnitude. A zero vector points along +x afterwards.
    fn with_magnitude(self, magnitude: f64) -> Self;

    /// Same magnitude, new direction.
    fn with_polar_angle(self, angle: f64) -> Self;

    fn rotated(self, angle: f64) -> Self;

    fn unit_vector(self) -> std::result::Result<Self, DegenerateGeometry>;

    fn distance_to(self, other: Self) -> f64;
}

impl VectorExt for Vector2D {
    fn polar_angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    fn with_magnitude(self, magnitude: f64) -> Self {
        polar(magnitude, self.polar_angle())
    }

    fn with_polar_angle(self, angle: f64) -> Self {
        polar(self.length(), angle)
    }

    fn rotated(self, angle: f64) -> Self {
        self.with_polar_angle(self.polar_angle() + angle)
    }

    fn unit_vector(self) -> std::result::Result<Self, DegenerateGeometry> {
        let length = self.length();
        if length > EPSILON {
            Ok(self / length)
        } else {
            Err(DegenerateGeometry::ZeroLengthEdge)
        }
    }

    fn distance_to(self, other: Self) -> f64 {
        (other - self).length()
    }
}
