/// The pair of poses to blend and how far to blend from `left` to `right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseBlend {
    pub left: usize,
    pub right: usize,
    pub factor: f32,
}

impl PoseBlend {
    /// Show the pose at `index` without blending.
    pub fn single(index: usize) -> Self {
        Self {
            left: index,
            right: index,
            factor: 0.0,
        }
    }

    /// Map a normalized cursor position `x` onto consecutive pairs of `pose_count` poses.
    ///
    /// Moving from 0.0 to 1.0 sweeps from the first pose to the last pose.
    /// Values outside 0.0 to 1.0 are clamped.
    pub fn from_cursor(x: f32, pose_count: usize) -> Self {
        if pose_count < 2 {
            return Self::single(0);
        }

        let segment_count = pose_count - 1;
        let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
        let position = x * segment_count as f32;

        let left = (position.floor() as usize).min(segment_count - 1);
        Self {
            left,
            right: left + 1,
            factor: position - left as f32,
        }
    }
}
