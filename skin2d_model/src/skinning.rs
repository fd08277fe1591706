//! Linear blend skinning on the CPU.
//!
//! The same calculation runs in the vertex shader of `skin2d_wgpu`.
//! This implementation serves as a reference and a fallback path.
use glam::{Mat4, Vec2, Vec4};

/// The maximum number of joints influencing a single vertex.
pub const MAX_INFLUENCES: usize = 3;

/// A vertex in bind pose model space with its joint influences.
///
/// Unused influences should have a weight of 0.0.
/// Weights for used influences should sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinVertex {
    pub position: Vec2,
    pub joint_indices: [u32; MAX_INFLUENCES],
    pub joint_weights: [f32; MAX_INFLUENCES],
}

impl SkinVertex {
    /// A vertex fully influenced by the joint at `joint_index`.
    pub fn rigid(position: Vec2, joint_index: u32) -> Self {
        Self {
            position,
            joint_indices: [joint_index, joint_index, joint_index],
            joint_weights: [1.0, 0.0, 0.0],
        }
    }

    /// The used (index, weight) pairs.
    pub fn influences(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.joint_indices
            .iter()
            .zip(self.joint_weights.iter())
            .filter(|(_, w)| **w != 0.0)
            .map(|(i, w)| (*i as usize, *w))
    }
}

/// The deformed vertex in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinnedVertex {
    pub position: Vec4,
    pub color: Vec4,
}

/// Deform `vertex` by the weighted sum of its influencing joint transforms.
///
/// Each influence maps the bind pose position into the joint's local space with
/// `bind_pose_inverses` and back to model space with `world_transforms`.
/// Influences with a weight of exactly 0.0 contribute nothing regardless of their index.
///
/// # Panics
/// Panics if a weighted joint index is out of range for the provided transforms.
/// [SkinnedMesh::new](crate::SkinnedMesh::new) rejects such vertices.
pub fn skin_vertex(
    vertex: &SkinVertex,
    bind_pose_inverses: &[Mat4],
    world_transforms: &[Mat4],
    colors: &[Vec4],
) -> SkinnedVertex {
    let bind_position = vertex.position.extend(0.0).extend(1.0);

    let mut position = Vec4::ZERO;
    let mut color = Vec4::ZERO;
    for (joint, weight) in vertex.influences() {
        position += weight * (world_transforms[joint] * bind_pose_inverses[joint] * bind_position);
        color += weight * colors[joint];
    }

    SkinnedVertex { position, color }
}

/// Apply [skin_vertex] to each of `vertices`.
pub fn skin_vertices(
    vertices: &[SkinVertex],
    bind_pose_inverses: &[Mat4],
    world_transforms: &[Mat4],
    colors: &[Vec4],
) -> Vec<SkinnedVertex> {
    vertices
        .iter()
        .map(|v| skin_vertex(v, bind_pose_inverses, world_transforms, colors))
        .collect()
}

/// Compute the matrix for each joint that transforms a vertex
/// in bind pose model space to its posed position in model space.
pub fn skinning_transforms(world_transforms: &[Mat4], bind_pose_inverses: &[Mat4]) -> Vec<Mat4> {
    world_transforms
        .iter()
        .zip(bind_pose_inverses)
        .map(|(world, inverse)| *world * *inverse)
        .collect()
}
