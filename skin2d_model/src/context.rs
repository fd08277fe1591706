use glam::{Mat4, Vec4};
use log::debug;

use crate::{
    PoseBlend, SkinVertex, SkinnedMesh, SkinnedVertex,
    bind_pose::bind_pose_inverses,
    error::{CreateContextError, CreateMeshError, SkinMeshError, UpdatePoseError},
    pose::Pose,
    skinning::skin_vertices,
};

/// The per frame joint data needed to skin a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTransforms {
    /// The model space transform of each joint in the current pose.
    pub world_transforms: Vec<Mat4>,
    /// The color of each joint in the current pose.
    pub colors: Vec<Vec4>,
    /// The parent of each joint for drawing the skeleton.
    pub parent_indices: Vec<Option<usize>>,
}

/// The poses and precomputed data for skinning a mesh.
///
/// The first pose is the bind pose and is never modified.
/// The current pose changes only in response to [SkinningContext::update_pose].
#[derive(Debug, Clone)]
pub struct SkinningContext {
    poses: Vec<Pose>,
    current_pose: Pose,
    bind_pose_inverses: Vec<Mat4>,
}

impl SkinningContext {
    /// Check that all `poses` share the hierarchy of the bind pose in `poses[0]`
    /// and precompute the bind pose inverses.
    pub fn new(poses: Vec<Pose>) -> Result<Self, CreateContextError> {
        let bind_pose = poses.first().ok_or(CreateContextError::MissingBindPose)?;

        for (index, pose) in poses.iter().enumerate().skip(1) {
            bind_pose
                .check_hierarchy(pose)
                .map_err(|source| CreateContextError::Hierarchy { index, source })?;
        }

        let bind_pose_inverses = bind_pose_inverses(bind_pose)?;
        let current_pose = bind_pose.clone();

        debug!(
            "Created skinning context with {} poses and {} joints",
            poses.len(),
            current_pose.len()
        );

        Ok(Self {
            poses,
            current_pose,
            bind_pose_inverses,
        })
    }

    pub fn bind_pose(&self) -> &Pose {
        &self.poses[0]
    }

    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    pub fn current_pose(&self) -> &Pose {
        &self.current_pose
    }

    /// The inverse of the model space transform of each joint in the bind pose.
    pub fn bind_pose_inverses(&self) -> &[Mat4] {
        &self.bind_pose_inverses
    }

    /// Recompute the current pose by interpolating the selected poses.
    pub fn update_pose(&mut self, blend: PoseBlend) -> Result<(), UpdatePoseError> {
        let left = self.pose(blend.left)?;
        let right = self.pose(blend.right)?;
        self.current_pose = Pose::interpolate(left, right, blend.factor)?;
        Ok(())
    }

    /// The joint transforms and colors for rendering the current pose.
    pub fn frame_transforms(&self) -> FrameTransforms {
        FrameTransforms {
            world_transforms: self.current_pose.world_transforms(),
            colors: self.current_pose.colors(),
            parent_indices: self
                .current_pose
                .joints()
                .iter()
                .map(|j| j.parent_index)
                .collect(),
        }
    }

    /// Validate a mesh against the joints of this context's skeleton.
    pub fn create_mesh(
        &self,
        vertices: Vec<SkinVertex>,
        indices: Vec<u16>,
    ) -> Result<SkinnedMesh, CreateMeshError> {
        SkinnedMesh::new(vertices, indices, self.current_pose.len())
    }

    /// Skin the vertices of `mesh` on the CPU using the current pose.
    pub fn skin_mesh(&self, mesh: &SkinnedMesh) -> Result<Vec<SkinnedVertex>, SkinMeshError> {
        self.skin_mesh_frame(mesh, &self.frame_transforms())
    }

    /// Skin the vertices of `mesh` on the CPU using transforms
    /// already calculated with [SkinningContext::frame_transforms].
    ///
    /// The mesh must have been validated for the same number of joints as the skeleton.
    pub fn skin_mesh_frame(
        &self,
        mesh: &SkinnedMesh,
        frame: &FrameTransforms,
    ) -> Result<Vec<SkinnedVertex>, SkinMeshError> {
        let joint_count = self.bind_pose_inverses.len();
        if mesh.joint_count() != joint_count {
            return Err(SkinMeshError::MeshJointCount {
                expected: joint_count,
                found: mesh.joint_count(),
            });
        }

        for found in [frame.world_transforms.len(), frame.colors.len()] {
            if found != joint_count {
                return Err(SkinMeshError::FrameJointCount {
                    expected: joint_count,
                    found,
                });
            }
        }

        Ok(skin_vertices(
            mesh.vertices(),
            &self.bind_pose_inverses,
            &frame.world_transforms,
            &frame.colors,
        ))
    }

    fn pose(&self, index: usize) -> Result<&Pose, UpdatePoseError> {
        self.poses
            .get(index)
            .ok_or(UpdatePoseError::PoseIndexOutOfRange {
                index,
                pose_count: self.poses.len(),
            })
    }
}
