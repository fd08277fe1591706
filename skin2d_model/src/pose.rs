use glam::{Mat4, Vec4};
use log::warn;

use crate::{
    error::{CreatePoseError, InterpolatePoseError},
    transform::{Transform, lerp_vec4},
};

/// A single node in the joint hierarchy for one [Pose].
#[derive(Debug, PartialEq, Clone)]
pub struct Joint {
    /// The name used for debugging and error messages.
    pub name: String,
    /// The local transform of the joint relative to its parent.
    pub transform: Transform,
    /// The RGBA color used for the joint overlay and vertex tinting.
    pub color: Vec4,
    /// The index of the parent [Joint] in the same [Pose]
    /// or `None` if this is a root joint.
    pub parent_index: Option<usize>,
}

impl Joint {
    pub fn new(name: &str, transform: Transform, color: Vec4, parent_index: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            transform,
            color,
            parent_index,
        }
    }
}

/// A complete assignment of local transforms to every joint in the hierarchy.
///
/// Parents are stored as indices into the same pose,
/// so poses can be cloned or moved without invalidating the hierarchy.
#[derive(Debug, PartialEq, Clone)]
pub struct Pose {
    joints: Vec<Joint>,
    // Joint indices sorted so that parents appear before their children.
    order: Vec<usize>,
}

impl Pose {
    /// Validate the parenting of `joints` and create a new pose.
    pub fn new(joints: Vec<Joint>) -> Result<Self, CreatePoseError> {
        for (i, joint) in joints.iter().enumerate() {
            if let Some(parent) = joint.parent_index
                && parent >= joints.len()
            {
                return Err(CreatePoseError::ParentOutOfRange {
                    joint: i,
                    parent,
                    joint_count: joints.len(),
                });
            }
        }

        let depths = (0..joints.len())
            .map(|i| joint_depth(&joints, i))
            .collect::<Result<Vec<_>, _>>()?;

        // A stable sort preserves the authored order for joints at the same depth.
        let mut order: Vec<_> = (0..joints.len()).collect();
        order.sort_by_key(|i| depths[*i]);

        let root_count = depths.iter().filter(|d| **d == 0).count();
        if root_count > 1 {
            warn!("Pose contains {root_count} root joints.");
        }

        Ok(Self { joints, order })
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// The parent of the joint at `index` in this pose.
    /// Returns `None` for root joints or if `index` is out of range.
    pub fn parent(&self, index: usize) -> Option<&Joint> {
        self.joints
            .get(index)?
            .parent_index
            .and_then(|p| self.joints.get(p))
    }

    /// The transform from the joint at `index` to its parent's space.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn local_transform(&self, index: usize) -> Mat4 {
        self.joints[index].transform.to_matrix()
    }

    /// The transform from the joint at `index` to model space
    /// by recursively applying the parent transforms.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn world_transform(&self, index: usize) -> Mat4 {
        let local = self.local_transform(index);
        match self.joints[index].parent_index {
            Some(parent) => self.world_transform(parent) * local,
            None => local,
        }
    }

    /// The model space transform for every joint.
    ///
    /// This matches [Pose::world_transform] for each joint
    /// but only computes each transform once.
    pub fn world_transforms(&self) -> Vec<Mat4> {
        let mut transforms = vec![Mat4::IDENTITY; self.joints.len()];
        for &i in &self.order {
            let local = self.local_transform(i);
            transforms[i] = match self.joints[i].parent_index {
                Some(parent) => transforms[parent] * local,
                None => local,
            };
        }
        transforms
    }

    pub fn colors(&self) -> Vec<Vec4> {
        self.joints.iter().map(|j| j.color).collect()
    }

    /// Check that `other` has the same joint count and parenting as this pose.
    pub fn check_hierarchy(&self, other: &Pose) -> Result<(), InterpolatePoseError> {
        if self.joints.len() != other.joints.len() {
            return Err(InterpolatePoseError::JointCountMismatch {
                expected: self.joints.len(),
                found: other.joints.len(),
            });
        }

        for (i, (a, b)) in self.joints.iter().zip(&other.joints).enumerate() {
            if a.parent_index != b.parent_index {
                return Err(InterpolatePoseError::ParentMismatch {
                    joint: i,
                    expected: a.parent_index,
                    found: b.parent_index,
                });
            }
        }

        Ok(())
    }

    pub fn has_same_hierarchy(&self, other: &Pose) -> bool {
        self.check_hierarchy(other).is_ok()
    }

    /// Blend the translation, rotation, scale, and color of each joint
    /// from `a` at a `factor` of 0.0 to `b` at a `factor` of 1.0.
    ///
    /// The `factor` is not clamped.
    /// The result has its own hierarchy and does not reference `a` or `b`.
    pub fn interpolate(a: &Pose, b: &Pose, factor: f32) -> Result<Pose, InterpolatePoseError> {
        a.check_hierarchy(b)?;

        let joints = a
            .joints
            .iter()
            .zip(&b.joints)
            .map(|(ja, jb)| Joint {
                name: ja.name.clone(),
                transform: ja.transform.lerp(jb.transform, factor),
                color: lerp_vec4(ja.color, jb.color, factor),
                parent_index: ja.parent_index,
            })
            .collect();

        Ok(Pose {
            joints,
            order: a.order.clone(),
        })
    }
}

fn joint_depth(joints: &[Joint], joint: usize) -> Result<usize, CreatePoseError> {
    // A chain without cycles visits each joint at most once.
    let mut depth = 0;
    let mut current = joints[joint].parent_index;
    while let Some(parent) = current {
        depth += 1;
        if depth >= joints.len() {
            return Err(CreatePoseError::CyclicParent { joint });
        }
        current = joints[parent].parent_index;
    }
    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    use glam::{Vec3, vec2, vec3, vec4};
    use pretty_assertions::assert_eq;

    use crate::assert_matrix_relative_eq;

    fn joint(translation: [f32; 2], rotation: f32, parent_index: Option<usize>) -> Joint {
        Joint::new(
            "joint",
            Transform {
                translation: translation.into(),
                rotation,
                scale: 1.0,
            },
            Vec4::ONE,
            parent_index,
        )
    }

    fn chain() -> Pose {
        Pose::new(vec![
            joint([0.0, 0.0], 0.0, None),
            joint([1.0, 0.0], 90.0, Some(0)),
            joint([2.0, 0.0], 0.0, Some(1)),
        ])
        .unwrap()
    }

    #[test]
    fn new_empty() {
        let pose = Pose::new(Vec::new()).unwrap();
        assert!(pose.is_empty());
        assert!(pose.world_transforms().is_empty());
    }

    #[test]
    fn new_parent_out_of_range() {
        assert_eq!(
            Err(CreatePoseError::ParentOutOfRange {
                joint: 1,
                parent: 2,
                joint_count: 2
            }),
            Pose::new(vec![
                joint([0.0, 0.0], 0.0, None),
                joint([0.0, 0.0], 0.0, Some(2))
            ])
        );
    }

    #[test]
    fn new_self_parent() {
        assert_eq!(
            Err(CreatePoseError::CyclicParent { joint: 0 }),
            Pose::new(vec![joint([0.0, 0.0], 0.0, Some(0))])
        );
    }

    #[test]
    fn new_cycle() {
        assert_eq!(
            Err(CreatePoseError::CyclicParent { joint: 1 }),
            Pose::new(vec![
                joint([0.0, 0.0], 0.0, None),
                joint([0.0, 0.0], 0.0, Some(2)),
                joint([0.0, 0.0], 0.0, Some(3)),
                joint([0.0, 0.0], 0.0, Some(1)),
            ])
        );
    }

    #[test]
    fn new_forest() {
        let pose = Pose::new(vec![
            joint([1.0, 0.0], 0.0, None),
            joint([0.0, 1.0], 0.0, None),
        ])
        .unwrap();
        assert_eq!(
            vec![
                Mat4::from_translation(vec3(1.0, 0.0, 0.0)),
                Mat4::from_translation(vec3(0.0, 1.0, 0.0))
            ],
            pose.world_transforms()
        );
    }

    #[test]
    fn parent_resolves_within_pose() {
        let pose = chain();
        assert!(pose.parent(0).is_none());
        assert!(std::ptr::eq(&pose.joints()[0], pose.parent(1).unwrap()));
        assert!(std::ptr::eq(&pose.joints()[1], pose.parent(2).unwrap()));
    }

    #[test]
    fn parent_index_out_of_range() {
        let pose = chain();
        assert!(pose.parent(3).is_none());
        assert!(pose.parent(usize::MAX).is_none());
    }

    #[test]
    #[should_panic]
    fn world_transform_index_out_of_range() {
        chain().world_transform(3);
    }

    #[test]
    fn world_transform_parent_after_child() {
        // Joint 1 is the parent of joint 0.
        let pose = Pose::new(vec![
            joint([0.0, 1.0], 0.0, Some(1)),
            joint([1.0, 0.0], 0.0, None),
        ])
        .unwrap();

        let expected = Mat4::from_translation(vec3(1.0, 1.0, 0.0));
        assert_eq!(expected, pose.world_transform(0));
        assert_eq!(expected, pose.world_transforms()[0]);
    }

    #[test]
    fn world_transforms_chain() {
        let pose = chain();
        let transforms = pose.world_transforms();

        assert_eq!(Mat4::IDENTITY, transforms[0]);
        assert_matrix_relative_eq!(
            Mat4::from_translation(vec3(1.0, 0.0, 0.0)) * Mat4::from_rotation_z(90f32.to_radians()),
            transforms[1]
        );
        // The child offset is rotated by the parent.
        assert_matrix_relative_eq!(
            Mat4::from_translation(vec3(1.0, 2.0, 0.0)) * Mat4::from_rotation_z(90f32.to_radians()),
            transforms[2]
        );
    }

    #[test]
    fn world_transforms_match_recursive() {
        let pose = Pose::new(vec![
            joint([0.0, -0.5], 15.0, Some(3)),
            joint([0.2, 0.1], -40.0, Some(0)),
            joint([0.3, 0.0], 75.0, Some(1)),
            joint([0.1, 0.4], 180.0, None),
        ])
        .unwrap();

        let transforms = pose.world_transforms();
        for (i, transform) in transforms.iter().enumerate() {
            assert_eq!(pose.world_transform(i), *transform);
        }
    }

    #[test]
    fn world_transform_scale_affects_children() {
        let pose = Pose::new(vec![
            Joint::new(
                "root",
                Transform {
                    scale: 2.0,
                    ..Transform::IDENTITY
                },
                Vec4::ONE,
                None,
            ),
            joint([1.0, 0.0], 0.0, Some(0)),
        ])
        .unwrap();

        let point = pose.world_transform(1).transform_point3(Vec3::ZERO);
        assert_eq!(vec3(2.0, 0.0, 0.0), point);
    }

    #[test]
    fn interpolate_boundaries() {
        let a = chain();
        let mut joints = a.joints().to_vec();
        joints[1].transform.rotation = -120.0;
        joints[2].transform.translation = vec2(-0.3, 0.7);
        joints[2].transform.scale = 0.25;
        joints[0].color = vec4(0.1, 0.2, 0.3, 0.4);
        let b = Pose::new(joints).unwrap();

        assert_eq!(a, Pose::interpolate(&a, &b, 0.0).unwrap());
        assert_eq!(b, Pose::interpolate(&a, &b, 1.0).unwrap());
    }

    #[test]
    fn interpolate_halfway() {
        let a = Pose::new(vec![Joint::new(
            "a",
            Transform {
                translation: vec2(1.0, 2.0),
                rotation: 20.0,
                scale: 1.0,
            },
            vec4(1.0, 0.0, 0.0, 1.0),
            None,
        )])
        .unwrap();
        let b = Pose::new(vec![Joint::new(
            "b",
            Transform {
                translation: vec2(3.0, -2.0),
                rotation: 100.0,
                scale: 3.0,
            },
            vec4(0.0, 1.0, 0.0, 0.5),
            None,
        )])
        .unwrap();

        let pose = Pose::interpolate(&a, &b, 0.5).unwrap();
        assert_eq!(
            &Joint::new(
                "a",
                Transform {
                    translation: vec2(2.0, 0.0),
                    rotation: 60.0,
                    scale: 2.0,
                },
                vec4(0.5, 0.5, 0.0, 0.75),
                None,
            ),
            &pose.joints()[0]
        );
    }

    #[test]
    fn interpolate_parents_resolve_within_result() {
        let a = chain();
        let b = chain();
        let pose = Pose::interpolate(&a, &b, 0.3).unwrap();

        for i in 0..pose.len() {
            let mut current = i;
            while let Some(parent) = pose.parent(current) {
                assert!(pose.joints().iter().any(|j| std::ptr::eq(j, parent)));
                assert!(!a.joints().iter().any(|j| std::ptr::eq(j, parent)));
                assert!(!b.joints().iter().any(|j| std::ptr::eq(j, parent)));
                current = pose.joints()[current].parent_index.unwrap();
            }
        }
    }

    #[test]
    fn interpolate_joint_count_mismatch() {
        let a = chain();
        let b = Pose::new(vec![joint([0.0, 0.0], 0.0, None)]).unwrap();
        assert_eq!(
            Err(InterpolatePoseError::JointCountMismatch {
                expected: 3,
                found: 1
            }),
            Pose::interpolate(&a, &b, 0.5)
        );
    }

    #[test]
    fn interpolate_parent_mismatch() {
        let a = chain();
        let b = Pose::new(vec![
            joint([0.0, 0.0], 0.0, None),
            joint([1.0, 0.0], 0.0, Some(0)),
            joint([2.0, 0.0], 0.0, Some(0)),
        ])
        .unwrap();
        assert_eq!(
            Err(InterpolatePoseError::ParentMismatch {
                joint: 2,
                expected: Some(1),
                found: Some(0)
            }),
            Pose::interpolate(&a, &b, 0.5)
        );
        assert!(!a.has_same_hierarchy(&b));
    }
}
