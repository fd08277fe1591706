use glam::Mat4;

use crate::{Pose, error::BindPoseError};

/// Compute the inverse of each joint's model space transform in `bind_pose`.
///
/// These matrices convert a point in bind pose model space
/// to the local space of each joint.
/// This only needs to be computed once for a given bind pose.
pub fn bind_pose_inverses(bind_pose: &Pose) -> Result<Vec<Mat4>, BindPoseError> {
    bind_pose
        .world_transforms()
        .into_iter()
        .enumerate()
        .map(|(i, transform)| {
            let singular = || BindPoseError::SingularTransform {
                joint: i,
                name: bind_pose.joints()[i].name.clone(),
            };

            let determinant = transform.determinant();
            if determinant == 0.0 || !determinant.is_finite() {
                return Err(singular());
            }

            let inverse = transform.inverse();
            if inverse.is_finite() {
                Ok(inverse)
            } else {
                Err(singular())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use glam::{Vec4, vec2, vec3};

    use crate::{Joint, Transform, assert_matrix_relative_eq};

    #[test]
    fn bind_pose_inverses_child_translation() {
        let pose = Pose::new(vec![
            Joint::new("root", Transform::IDENTITY, Vec4::ONE, None),
            Joint::new(
                "child",
                Transform {
                    translation: vec2(1.0, 0.0),
                    ..Transform::IDENTITY
                },
                Vec4::ONE,
                Some(0),
            ),
        ])
        .unwrap();

        let inverses = bind_pose_inverses(&pose).unwrap();
        assert_eq!(Mat4::IDENTITY, inverses[0]);
        assert_eq!(Mat4::from_translation(vec3(-1.0, 0.0, 0.0)), inverses[1]);
    }

    #[test]
    fn bind_pose_inverses_undo_world_transforms() {
        let pose = Pose::new(vec![
            Joint::new(
                "root",
                Transform {
                    translation: vec2(0.0, -0.75),
                    rotation: 90.0,
                    scale: 1.0,
                },
                Vec4::ONE,
                None,
            ),
            Joint::new(
                "child",
                Transform {
                    translation: vec2(0.25, 0.0),
                    rotation: 90.0,
                    scale: 0.5,
                },
                Vec4::ONE,
                Some(0),
            ),
        ])
        .unwrap();

        let inverses = bind_pose_inverses(&pose).unwrap();
        for (world, inverse) in pose.world_transforms().iter().zip(&inverses) {
            assert_matrix_relative_eq!(Mat4::IDENTITY, *world * *inverse);
        }
    }

    #[test]
    fn bind_pose_inverses_zero_scale() {
        let pose = Pose::new(vec![
            Joint::new("root", Transform::IDENTITY, Vec4::ONE, None),
            Joint::new(
                "flat",
                Transform {
                    scale: 0.0,
                    ..Transform::IDENTITY
                },
                Vec4::ONE,
                Some(0),
            ),
        ])
        .unwrap();

        assert_eq!(
            Err(BindPoseError::SingularTransform {
                joint: 1,
                name: "flat".to_string()
            }),
            bind_pose_inverses(&pose)
        );
    }
}
