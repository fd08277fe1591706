use glam::{Mat4, Vec2, Vec3, Vec4};

/// A decomposed 2D transform as scale -> rotation -> translation (TRS).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// The offset in the parent's coordinate space.
    pub translation: Vec2,
    /// The counterclockwise rotation about the Z axis in degrees.
    pub rotation: f32,
    /// The uniform scale factor.
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
    };

    /// The matrix that maps points in the local space of this transform
    /// to its parent's space.
    pub fn to_matrix(self) -> Mat4 {
        let mut matrix = Mat4::from_translation(self.translation.extend(0.0));

        // Skipping identity values doesn't change the result.
        if self.rotation != 0.0 {
            matrix *= Mat4::from_rotation_z(self.rotation.to_radians());
        }
        if self.scale != 1.0 {
            matrix *= Mat4::from_scale(Vec3::splat(self.scale));
        }

        matrix
    }

    /// Blend each field linearly with `rhs` by `factor`.
    ///
    /// The rotation is blended as a plain scalar in degrees
    /// rather than along the shortest arc.
    pub fn lerp(self, rhs: Self, factor: f32) -> Self {
        Self {
            translation: lerp_vec2(self.translation, rhs.translation, factor),
            rotation: lerp(self.rotation, rhs.rotation, factor),
            scale: lerp(self.scale, rhs.scale, factor),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// Weight both endpoints so factors of exactly 0.0 and 1.0 return the endpoints.
pub(crate) fn lerp(a: f32, b: f32, factor: f32) -> f32 {
    a * (1.0 - factor) + b * factor
}

pub(crate) fn lerp_vec2(a: Vec2, b: Vec2, factor: f32) -> Vec2 {
    a * (1.0 - factor) + b * factor
}

pub(crate) fn lerp_vec4(a: Vec4, b: Vec4, factor: f32) -> Vec4 {
    a * (1.0 - factor) + b * factor
}

#[cfg(test)]
mod tests {
    use super::*;

    use glam::{vec2, vec4};

    use crate::assert_matrix_relative_eq;

    #[test]
    fn identity_to_matrix() {
        assert_eq!(Mat4::IDENTITY, Transform::IDENTITY.to_matrix());
    }

    #[test]
    fn translation_to_matrix() {
        assert_eq!(
            Mat4::from_cols_array_2d(&[
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [1.0, 2.0, 0.0, 1.0],
            ]),
            Transform {
                translation: vec2(1.0, 2.0),
                ..Transform::IDENTITY
            }
            .to_matrix()
        );
    }

    #[test]
    fn transform_to_matrix() {
        // Scale, then rotate 90 degrees, then translate.
        assert_matrix_relative_eq!(
            Mat4::from_cols_array_2d(&[
                [0.0, 2.0, 0.0, 0.0],
                [-2.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 2.0, 0.0],
                [1.0, 2.0, 0.0, 1.0],
            ]),
            Transform {
                translation: vec2(1.0, 2.0),
                rotation: 90.0,
                scale: 2.0,
            }
            .to_matrix()
        );
    }

    #[test]
    fn transform_point_trs_order() {
        let point = Transform {
            translation: vec2(1.0, 0.0),
            rotation: 90.0,
            scale: 3.0,
        }
        .to_matrix()
            * vec4(1.0, 0.0, 0.0, 1.0);

        approx::assert_relative_eq!(1.0, point.x, epsilon = 0.0001);
        approx::assert_relative_eq!(3.0, point.y, epsilon = 0.0001);
        assert_eq!(1.0, point.w);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Transform {
            translation: vec2(0.3, -0.7),
            rotation: 33.3,
            scale: 0.9,
        };
        let b = Transform {
            translation: vec2(-1.1, 0.25),
            rotation: -170.0,
            scale: 1.7,
        };
        assert_eq!(a, a.lerp(b, 0.0));
        assert_eq!(b, a.lerp(b, 1.0));
    }

    #[test]
    fn lerp_halfway() {
        let a = Transform {
            translation: vec2(0.0, 2.0),
            rotation: 10.0,
            scale: 1.0,
        };
        let b = Transform {
            translation: vec2(4.0, -2.0),
            rotation: 50.0,
            scale: 2.0,
        };
        assert_eq!(
            Transform {
                translation: vec2(2.0, 0.0),
                rotation: 30.0,
                scale: 1.5,
            },
            a.lerp(b, 0.5)
        );
    }

    #[test]
    fn lerp_rotation_not_shortest_arc() {
        // 350 and 10 degrees are 20 degrees apart but blend through 180 degrees.
        let a = Transform {
            rotation: 350.0,
            ..Transform::IDENTITY
        };
        let b = Transform {
            rotation: 10.0,
            ..Transform::IDENTITY
        };
        assert_eq!(180.0, a.lerp(b, 0.5).rotation);
    }
}
