use crate::{error::CreateMeshError, skinning::SkinVertex};

/// The allowed difference from 1.0 for the sum of a vertex's joint weights.
pub const WEIGHT_SUM_EPSILON: f32 = 1e-4;

/// An indexed triangle list with per vertex joint influences.
///
/// The data is validated once on creation and never modified afterwards.
#[derive(Debug, PartialEq, Clone)]
pub struct SkinnedMesh {
    vertices: Vec<SkinVertex>,
    indices: Vec<u16>,
    joint_count: usize,
}

impl SkinnedMesh {
    /// Validate the triangles and joint influences against a hierarchy with `joint_count` joints.
    ///
    /// Out of range joint indices are rejected even for unused influences
    /// since the renderer may still read them.
    pub fn new(
        vertices: Vec<SkinVertex>,
        indices: Vec<u16>,
        joint_count: usize,
    ) -> Result<Self, CreateMeshError> {
        if indices.len() % 3 != 0 {
            return Err(CreateMeshError::IncompleteTriangle {
                index_count: indices.len(),
            });
        }

        if let Some(index) = indices.iter().find(|i| **i as usize >= vertices.len()) {
            return Err(CreateMeshError::VertexIndexOutOfRange {
                index: *index,
                vertex_count: vertices.len(),
            });
        }

        for (i, vertex) in vertices.iter().enumerate() {
            validate_vertex(i, vertex, joint_count)?;
        }

        Ok(Self {
            vertices,
            indices,
            joint_count,
        })
    }

    pub fn vertices(&self) -> &[SkinVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The number of joints in the hierarchy used to validate the joint indices.
    pub fn joint_count(&self) -> usize {
        self.joint_count
    }
}

fn validate_vertex(
    index: usize,
    vertex: &SkinVertex,
    joint_count: usize,
) -> Result<(), CreateMeshError> {
    if !vertex.position.is_finite() {
        return Err(CreateMeshError::InvalidPosition { vertex: index });
    }

    if let Some(joint_index) = vertex
        .joint_indices
        .iter()
        .find(|j| **j as usize >= joint_count)
    {
        return Err(CreateMeshError::JointIndexOutOfRange {
            vertex: index,
            joint_index: *joint_index,
            joint_count,
        });
    }

    if let Some(weight) = vertex
        .joint_weights
        .iter()
        .find(|w| !w.is_finite() || **w < 0.0)
    {
        return Err(CreateMeshError::InvalidWeight {
            vertex: index,
            weight: *weight,
        });
    }

    let sum: f32 = vertex.joint_weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
        return Err(CreateMeshError::WeightSum { vertex: index, sum });
    }

    Ok(())
}
