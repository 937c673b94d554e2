//! Hand landmark model and normalization
//!
//! Frames arrive as 21 camera-space points per hand. Matching runs on a
//! fixed 11-point signature subset, normalized so that where the hand sits
//! in the frame and how large it appears do not affect distances.

/// Points in a complete hand frame
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Landmark indices used for matching: wrist, thumb joints, finger bases
/// and fingertips
pub const SIGNATURE_INDICES: [usize; 11] = [0, 1, 4, 5, 8, 9, 12, 13, 16, 17, 20];

/// One hand landmark in camera-normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another landmark
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// Center and scale landmarks relative to the whole hand.
///
/// The bounding box is taken over x/y only; z stays out of the extent but
/// is scaled along with the other axes. A degenerate box (all points
/// coincident) is centered and left unscaled.
pub fn normalize_landmarks(landmarks: &[Landmark]) -> Vec<Landmark> {
    if landmarks.is_empty() {
        return Vec::new();
    }

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for lm in landmarks {
        min_x = min_x.min(lm.x);
        max_x = max_x.max(lm.x);
        min_y = min_y.min(lm.y);
        max_y = max_y.max(lm.y);
    }

    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;
    let scale = (max_x - min_x).max(max_y - min_y);

    landmarks
        .iter()
        .map(|lm| {
            let mut p = Landmark::new(lm.x - center_x, lm.y - center_y, lm.z);
            if scale > 0.0 {
                p.x /= scale;
                p.y /= scale;
                p.z /= scale;
            }
            p
        })
        .collect()
}

/// Normalize a full hand frame and select the signature subset.
///
/// Returns `None` for incomplete detections (fewer than
/// [`HAND_LANDMARK_COUNT`] points).
pub fn signature_keypoints(landmarks: &[Landmark]) -> Option<Vec<Landmark>> {
    if landmarks.len() < HAND_LANDMARK_COUNT {
        return None;
    }
    let normalized = normalize_landmarks(landmarks);
    Some(SIGNATURE_INDICES.iter().map(|&i| normalized[i]).collect())
}
