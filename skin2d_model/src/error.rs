use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CreatePoseError {
    #[error("parent {parent} of joint {joint} is out of range for {joint_count} joints")]
    ParentOutOfRange {
        joint: usize,
        parent: usize,
        joint_count: usize,
    },

    #[error("parent chain of joint {joint} contains a cycle")]
    CyclicParent { joint: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum InterpolatePoseError {
    #[error("expected {expected} joints but found {found}")]
    JointCountMismatch { expected: usize, found: usize },

    #[error("joint {joint} has parent {expected:?} in one pose and {found:?} in the other")]
    ParentMismatch {
        joint: usize,
        expected: Option<usize>,
        found: Option<usize>,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum BindPoseError {
    #[error("bind pose world transform for joint {joint} {name:?} is not invertible")]
    SingularTransform { joint: usize, name: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum CreateMeshError {
    #[error("index count {index_count} is not a multiple of 3")]
    IncompleteTriangle { index_count: usize },

    #[error("index {index} is out of range for {vertex_count} vertices")]
    VertexIndexOutOfRange { index: u16, vertex_count: usize },

    #[error("vertex {vertex} has joint index {joint_index} out of range for {joint_count} joints")]
    JointIndexOutOfRange {
        vertex: usize,
        joint_index: u32,
        joint_count: usize,
    },

    #[error("vertex {vertex} has invalid joint weight {weight}")]
    InvalidWeight { vertex: usize, weight: f32 },

    #[error("vertex {vertex} has joint weights summing to {sum} instead of 1.0")]
    WeightSum { vertex: usize, sum: f32 },

    #[error("vertex {vertex} has a non finite position")]
    InvalidPosition { vertex: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum CreateContextError {
    #[error("expected at least one pose for the bind pose")]
    MissingBindPose,

    #[error("pose {index} does not match the bind pose hierarchy")]
    Hierarchy {
        index: usize,
        #[source]
        source: InterpolatePoseError,
    },

    #[error("error computing bind pose inverses")]
    BindPose(#[from] BindPoseError),
}

#[derive(Debug, Error, PartialEq)]
pub enum UpdatePoseError {
    #[error("pose index {index} is out of range for {pose_count} poses")]
    PoseIndexOutOfRange { index: usize, pose_count: usize },

    #[error("error interpolating poses")]
    Interpolate(#[from] InterpolatePoseError),
}

#[derive(Debug, Error, PartialEq)]
pub enum SkinMeshError {
    #[error("mesh was validated for {found} joints but the skeleton has {expected} joints")]
    MeshJointCount { expected: usize, found: usize },

    #[error("expected transforms for {expected} joints but found {found}")]
    FrameJointCount { expected: usize, found: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum CreateDemoError {
    #[error("error creating demo pose")]
    Pose(#[from] CreatePoseError),

    #[error("error creating demo mesh")]
    Mesh(#[from] CreateMeshError),

    #[error("error creating demo skinning context")]
    Context(#[from] CreateContextError),
}
