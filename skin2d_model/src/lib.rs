//! # skin2d_model
//! skin2d_model provides the joint hierarchy and linear blend skinning math
//! for deforming a 2D mesh by a blend of hand authored poses.
//!
//! The typical flow is to create a [SkinningContext] from a list of [Pose]
//! where the first pose is the bind pose,
//! update the current pose whenever the blend input changes,
//! and request [FrameTransforms] each frame for rendering.
//!
//! ```rust
//! use skin2d_model::{PoseBlend, demo};
//!
//! let mut context = demo::context().unwrap();
//! let mesh = demo::mesh().unwrap();
//!
//! context.update_pose(PoseBlend::from_cursor(0.25, context.poses().len())).unwrap();
//! let vertices = context.skin_mesh(&mesh).unwrap();
//! assert_eq!(mesh.vertices().len(), vertices.len());
//! ```

pub use bind_pose::bind_pose_inverses;
pub use blend::PoseBlend;
pub use context::{FrameTransforms, SkinningContext};
pub use mesh::SkinnedMesh;
pub use pose::{Joint, Pose};
pub use skinning::{SkinVertex, SkinnedVertex, skin_vertex, skin_vertices, skinning_transforms};
pub use transform::Transform;

mod bind_pose;
mod blend;
mod context;
pub mod demo;
pub mod error;
pub mod mesh;
mod pose;
pub mod skinning;
mod transform;

#[cfg(test)]
#[macro_export]
macro_rules! assert_matrix_relative_eq {
    ($a:expr, $b:expr) => {
        assert!(
            $a.to_cols_array()
                .iter()
                .zip($b.to_cols_array().iter())
                .all(|(a, b)| approx::relative_eq!(a, b, epsilon = 0.0001f32)),
            "Matrices not equal to within 0.0001.\nleft = {:?}\nright = {:?}",
            $a,
            $b
        )
    };
}
