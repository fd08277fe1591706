//! A small hand authored character with three poses.
//!
//! The character is a stick figure with a pelvis, spine, head, and two arms
//! made of an upper arm and a forearm each.
//! Coordinates are chosen to fit in the -1.0 to 1.0 range.
use glam::{Vec4, vec2, vec4};

use crate::{
    Joint, Pose, SkinVertex, SkinnedMesh, SkinningContext, Transform, error::CreateDemoError,
};

pub const PELVIS: usize = 0;
pub const SPINE: usize = 1;
pub const HEAD: usize = 2;
pub const UPPER_ARM_L: usize = 3;
pub const FOREARM_L: usize = 4;
pub const UPPER_ARM_R: usize = 5;
pub const FOREARM_R: usize = 6;

pub const JOINT_COUNT: usize = 7;

/// The names of the poses returned by [poses] in order.
pub const POSE_NAMES: [&str; 3] = ["bind", "wave", "flex"];

const JOINT_NAMES: [&str; JOINT_COUNT] = [
    "pelvis",
    "spine",
    "head",
    "upper_arm_l",
    "forearm_l",
    "upper_arm_r",
    "forearm_r",
];

const PARENTS: [Option<usize>; JOINT_COUNT] = [
    None,
    Some(PELVIS),
    Some(SPINE),
    Some(SPINE),
    Some(UPPER_ARM_L),
    Some(SPINE),
    Some(UPPER_ARM_R),
];

const COLORS: [Vec4; JOINT_COUNT] = [
    vec4(0.9, 0.9, 0.9, 1.0),
    vec4(0.2, 0.6, 1.0, 1.0),
    vec4(1.0, 0.85, 0.4, 1.0),
    vec4(0.3, 0.9, 0.3, 1.0),
    vec4(0.1, 0.6, 0.1, 1.0),
    vec4(1.0, 0.4, 0.3, 1.0),
    vec4(0.7, 0.15, 0.1, 1.0),
];

/// The bind pose followed by the other poses named in [POSE_NAMES].
pub fn poses() -> Result<Vec<Pose>, CreateDemoError> {
    let bind = [
        trs([0.0, -0.4], 0.0, 1.0),
        trs([0.0, 0.35], 0.0, 1.0),
        trs([0.0, 0.3], 0.0, 1.0),
        trs([-0.1, 0.2], 0.0, 1.0),
        trs([-0.3, 0.0], 0.0, 1.0),
        trs([0.1, 0.2], 0.0, 1.0),
        trs([0.3, 0.0], 0.0, 1.0),
    ];

    // Lower the left arm and raise the right forearm.
    let wave = [
        trs([0.0, -0.4], 0.0, 1.0),
        trs([0.0, 0.35], -8.0, 1.0),
        trs([0.0, 0.3], 12.0, 1.0),
        trs([-0.1, 0.2], 50.0, 1.0),
        trs([-0.3, 0.0], 10.0, 1.0),
        trs([0.1, 0.2], 60.0, 1.0),
        trs([0.3, 0.0], 70.0, 1.0),
    ];
    let mut wave_colors = COLORS;
    wave_colors[FOREARM_R] = vec4(1.0, 0.9, 0.2, 1.0);

    // Crouch slightly with both arms raised and bent inwards.
    let flex = [
        trs([0.0, -0.5], 0.0, 1.0),
        trs([0.0, 0.35], 6.0, 1.0),
        trs([0.0, 0.3], -15.0, 1.15),
        trs([-0.1, 0.2], -45.0, 1.0),
        trs([-0.3, 0.0], -80.0, 1.0),
        trs([0.1, 0.2], 45.0, 1.0),
        trs([0.3, 0.0], 80.0, 1.0),
    ];
    let mut flex_colors = COLORS;
    flex_colors[SPINE] = vec4(0.5, 0.3, 1.0, 1.0);
    flex_colors[UPPER_ARM_L] = vec4(0.6, 1.0, 0.3, 1.0);
    flex_colors[UPPER_ARM_R] = vec4(1.0, 0.6, 0.3, 1.0);

    Ok(vec![
        pose(&bind, &COLORS)?,
        pose(&wave, &wave_colors)?,
        pose(&flex, &flex_colors)?,
    ])
}

/// The character mesh in bind pose model space.
pub fn mesh() -> Result<SkinnedMesh, CreateDemoError> {
    let (s, hd) = (SPINE as u32, HEAD as u32);
    let (p, ul, fl) = (PELVIS as u32, UPPER_ARM_L as u32, FOREARM_L as u32);
    let (ur, fr) = (UPPER_ARM_R as u32, FOREARM_R as u32);

    let vertices = vec![
        // Torso
        rigid([-0.12, -0.5], p),
        rigid([0.12, -0.5], p),
        blend2([-0.12, -0.05], p, s, 0.5),
        blend2([0.12, -0.05], p, s, 0.5),
        blend3([-0.12, 0.2], [s, ul, p], [0.6, 0.3, 0.1]),
        blend3([0.12, 0.2], [s, ur, p], [0.6, 0.3, 0.1]),
        // Neck
        blend2([-0.04, 0.2], s, hd, 0.5),
        blend2([0.04, 0.2], s, hd, 0.5),
        // Head
        rigid([-0.1, 0.25], hd),
        rigid([0.1, 0.25], hd),
        rigid([-0.1, 0.45], hd),
        rigid([0.1, 0.45], hd),
        // Left arm
        blend2([-0.1, 0.2], s, ul, 0.7),
        blend2([-0.1, 0.1], s, ul, 0.7),
        blend2([-0.4, 0.2], ul, fl, 0.5),
        blend2([-0.4, 0.1], ul, fl, 0.5),
        rigid([-0.65, 0.2], fl),
        rigid([-0.65, 0.1], fl),
        // Right arm
        blend2([0.1, 0.2], s, ur, 0.7),
        blend2([0.1, 0.1], s, ur, 0.7),
        blend2([0.4, 0.2], ur, fr, 0.5),
        blend2([0.4, 0.1], ur, fr, 0.5),
        rigid([0.65, 0.2], fr),
        rigid([0.65, 0.1], fr),
    ];

    let indices = vec![
        // Torso
        0, 1, 3, 0, 3, 2, 2, 3, 5, 2, 5, 4, //
        // Neck
        6, 7, 9, 6, 9, 8, //
        // Head
        8, 9, 11, 8, 11, 10, //
        // Left arm
        12, 13, 15, 12, 15, 14, 14, 15, 17, 14, 17, 16, //
        // Right arm
        18, 19, 21, 18, 21, 20, 20, 21, 23, 20, 23, 22,
    ];

    Ok(SkinnedMesh::new(vertices, indices, JOINT_COUNT)?)
}

/// The skinning context for the demo poses.
pub fn context() -> Result<SkinningContext, CreateDemoError> {
    Ok(SkinningContext::new(poses()?)?)
}

fn trs(translation: [f32; 2], rotation: f32, scale: f32) -> Transform {
    Transform {
        translation: translation.into(),
        rotation,
        scale,
    }
}

fn pose(
    transforms: &[Transform; JOINT_COUNT],
    colors: &[Vec4; JOINT_COUNT],
) -> Result<Pose, CreateDemoError> {
    let joints = (0..JOINT_COUNT)
        .map(|i| Joint::new(JOINT_NAMES[i], transforms[i], colors[i], PARENTS[i]))
        .collect();
    Ok(Pose::new(joints)?)
}

fn rigid(position: [f32; 2], joint: u32) -> SkinVertex {
    SkinVertex::rigid(vec2(position[0], position[1]), joint)
}

// Blend from joint a to joint b with `weight_b` going to b.
fn blend2(position: [f32; 2], a: u32, b: u32, weight_b: f32) -> SkinVertex {
    SkinVertex {
        position: vec2(position[0], position[1]),
        joint_indices: [a, b, a],
        joint_weights: [1.0 - weight_b, weight_b, 0.0],
    }
}

fn blend3(position: [f32; 2], joints: [u32; 3], weights: [f32; 3]) -> SkinVertex {
    SkinVertex {
        position: vec2(position[0], position[1]),
        joint_indices: joints,
        joint_weights: weights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{PoseBlend, bind_pose_inverses, skin_vertices};

    #[test]
    fn poses_share_hierarchy() {
        let poses = poses().unwrap();
        assert_eq!(POSE_NAMES.len(), poses.len());
        for pose in &poses {
            assert_eq!(JOINT_COUNT, pose.len());
            assert!(poses[0].has_same_hierarchy(pose));
        }
    }

    #[test]
    fn single_root() {
        let poses = poses().unwrap();
        let roots = poses[0]
            .joints()
            .iter()
            .filter(|j| j.parent_index.is_none())
            .count();
        assert_eq!(1, roots);
    }

    #[test]
    fn mesh_is_valid() {
        let mesh = mesh().unwrap();
        assert_eq!(24, mesh.vertices().len());
        assert_eq!(16, mesh.triangle_count());
        assert_eq!(JOINT_COUNT, mesh.joint_count());
        assert!(mesh.vertices().iter().any(|v| v.influences().count() == 3));
    }

    #[test]
    fn bind_pose_reproduces_mesh() {
        let poses = poses().unwrap();
        let mesh = mesh().unwrap();
        let inverses = bind_pose_inverses(&poses[0]).unwrap();

        let skinned = skin_vertices(
            mesh.vertices(),
            &inverses,
            &poses[0].world_transforms(),
            &poses[0].colors(),
        );
        for (vertex, skinned) in mesh.vertices().iter().zip(&skinned) {
            assert_relative_eq!(vertex.position.x, skinned.position.x, epsilon = 0.0001);
            assert_relative_eq!(vertex.position.y, skinned.position.y, epsilon = 0.0001);
        }
    }

    #[test]
    fn hand_follows_forearm() {
        let mut context = context().unwrap();
        let mesh = mesh().unwrap();

        context.update_pose(PoseBlend::single(1)).unwrap();
        let skinned = context.skin_mesh(&mesh).unwrap();

        // The right hand is rigidly attached to the right forearm.
        let world = context.current_pose().world_transforms();
        let hand = world[FOREARM_R]
            * context.bind_pose_inverses()[FOREARM_R]
            * glam::vec4(0.65, 0.2, 0.0, 1.0);
        assert_relative_eq!(hand.x, skinned[22].position.x, epsilon = 0.0001);
        assert_relative_eq!(hand.y, skinned[22].position.y, epsilon = 0.0001);
        assert_ne!(0.2, skinned[22].position.y);
    }
}
