//! Facial landmarks and per-feature adjustment parameters
//!
//! Landmarks are named groups of ordered points in source-image space,
//! produced by an external detector. Parameters describe how each
//! adjustable feature should be reshaped relative to its own centroid;
//! identity parameters (`size = 1`, `width = height = 1`, `position = 0`)
//! leave the feature untouched.
//!
//! Per-feature tuning constants live in a data table ([`FeatureProfile`])
//! keyed by [`FeatureId`] rather than in branching logic, so adding a
//! feature means adding a table row.

use crate::geom::Point;

/// Identifier for a landmark group / adjustable feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureId {
    LeftEye,
    RightEye,
    Mouth,
    Nose,
    /// Jawline landmarks carry no adjustable parameters; they are kept for
    /// future anchoring use and ignored by the deformation engine.
    Jawline,
}

impl FeatureId {
    /// The features that carry adjustment parameters, in processing order
    pub const ADJUSTABLE: [FeatureId; 4] = [
        FeatureId::LeftEye,
        FeatureId::RightEye,
        FeatureId::Mouth,
        FeatureId::Nose,
    ];

    /// Stable index of an adjustable feature, for table lookups
    ///
    /// Jawline has no adjustable slot and returns `None`.
    #[inline]
    pub fn adjustable_index(self) -> Option<usize> {
        match self {
            FeatureId::LeftEye => Some(0),
            FeatureId::RightEye => Some(1),
            FeatureId::Mouth => Some(2),
            FeatureId::Nose => Some(3),
            FeatureId::Jawline => None,
        }
    }

    /// Short lowercase name, used in diagnostics
    pub fn name(self) -> &'static str {
        match self {
            FeatureId::LeftEye => "left_eye",
            FeatureId::RightEye => "right_eye",
            FeatureId::Mouth => "mouth",
            FeatureId::Nose => "nose",
            FeatureId::Jawline => "jawline",
        }
    }
}

/// Detected facial landmarks, grouped by feature
///
/// Groups are ordered point sequences in source-image coordinate space and
/// are immutable for the duration of one warp invocation. Any group may be
/// empty; features with fewer than two points are skipped by the control
/// point generator.
#[derive(Debug, Clone, Default)]
pub struct FaceLandmarks {
    pub left_eye: Vec<Point>,
    pub right_eye: Vec<Point>,
    pub mouth: Vec<Point>,
    pub nose: Vec<Point>,
    pub jawline: Vec<Point>,
}

impl FaceLandmarks {
    /// Create an empty landmark set
    pub fn new() -> Self {
        Self::default()
    }

    /// The point group for a feature
    pub fn group(&self, feature: FeatureId) -> &[Point] {
        match feature {
            FeatureId::LeftEye => &self.left_eye,
            FeatureId::RightEye => &self.right_eye,
            FeatureId::Mouth => &self.mouth,
            FeatureId::Nose => &self.nose,
            FeatureId::Jawline => &self.jawline,
        }
    }

    /// Replace the point group for a feature
    pub fn set_group(&mut self, feature: FeatureId, points: Vec<Point>) {
        match feature {
            FeatureId::LeftEye => self.left_eye = points,
            FeatureId::RightEye => self.right_eye = points,
            FeatureId::Mouth => self.mouth = points,
            FeatureId::Nose => self.nose = points,
            FeatureId::Jawline => self.jawline = points,
        }
    }
}

const IDENTITY_TOL: f32 = 1e-6;

/// Adjustment parameters for an eye: uniform scale plus translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeParams {
    /// Uniform scale about the eye centroid; 1.0 is identity
    pub size: f32,
    /// Horizontal translation, in landmark-space units before gain
    pub position_x: f32,
    /// Vertical translation, in landmark-space units before gain
    pub position_y: f32,
}

impl Default for EyeParams {
    fn default() -> Self {
        Self {
            size: 1.0,
            position_x: 0.0,
            position_y: 0.0,
        }
    }
}

impl EyeParams {
    /// True when the parameters leave the eye untouched
    pub fn is_identity(&self) -> bool {
        (self.size - 1.0).abs() < IDENTITY_TOL
            && self.position_x.abs() < IDENTITY_TOL
            && self.position_y.abs() < IDENTITY_TOL
    }
}

/// Adjustment parameters for mouth or nose: per-axis scale plus translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouthNoseParams {
    /// Horizontal scale about the feature centroid; 1.0 is identity
    pub width: f32,
    /// Vertical scale about the feature centroid; 1.0 is identity
    pub height: f32,
    /// Horizontal translation, in landmark-space units before gain
    pub position_x: f32,
    /// Vertical translation, in landmark-space units before gain
    pub position_y: f32,
}

impl Default for MouthNoseParams {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            position_x: 0.0,
            position_y: 0.0,
        }
    }
}

impl MouthNoseParams {
    /// True when the parameters leave the feature untouched
    pub fn is_identity(&self) -> bool {
        (self.width - 1.0).abs() < IDENTITY_TOL
            && (self.height - 1.0).abs() < IDENTITY_TOL
            && self.position_x.abs() < IDENTITY_TOL
            && self.position_y.abs() < IDENTITY_TOL
    }
}

/// Adjustment parameters for all adjustable features
///
/// `Default` is the identity for every feature.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceParams {
    pub left_eye: EyeParams,
    pub right_eye: EyeParams,
    pub mouth: MouthNoseParams,
    pub nose: MouthNoseParams,
}

impl FaceParams {
    /// Per-axis scale factors for a feature, or `None` for features
    /// without parameters
    pub fn scale(&self, feature: FeatureId) -> Option<(f32, f32)> {
        match feature {
            FeatureId::LeftEye => Some((self.left_eye.size, self.left_eye.size)),
            FeatureId::RightEye => Some((self.right_eye.size, self.right_eye.size)),
            FeatureId::Mouth => Some((self.mouth.width, self.mouth.height)),
            FeatureId::Nose => Some((self.nose.width, self.nose.height)),
            FeatureId::Jawline => None,
        }
    }

    /// Translation for a feature before the per-feature gain is applied,
    /// or `None` for features without parameters
    pub fn position(&self, feature: FeatureId) -> Option<Point> {
        match feature {
            FeatureId::LeftEye => Some(Point::new(
                self.left_eye.position_x,
                self.left_eye.position_y,
            )),
            FeatureId::RightEye => Some(Point::new(
                self.right_eye.position_x,
                self.right_eye.position_y,
            )),
            FeatureId::Mouth => Some(Point::new(self.mouth.position_x, self.mouth.position_y)),
            FeatureId::Nose => Some(Point::new(self.nose.position_x, self.nose.position_y)),
            FeatureId::Jawline => None,
        }
    }

    /// True when a single feature's parameters are identity
    pub fn is_feature_identity(&self, feature: FeatureId) -> bool {
        match feature {
            FeatureId::LeftEye => self.left_eye.is_identity(),
            FeatureId::RightEye => self.right_eye.is_identity(),
            FeatureId::Mouth => self.mouth.is_identity(),
            FeatureId::Nose => self.nose.is_identity(),
            FeatureId::Jawline => true,
        }
    }

    /// True when every feature's parameters are identity
    pub fn is_identity(&self) -> bool {
        FeatureId::ADJUSTABLE
            .iter()
            .all(|&f| self.is_feature_identity(f))
    }
}

/// Per-feature tuning constants
///
/// Multipliers favor isolation: the nose gets the smallest influence zone,
/// the mouth the largest. Translation gains are tuned so a moved feature
/// does not clip into its neighbors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureProfile {
    /// Influence radius multiplier applied to the half-diagonal of the
    /// feature's landmark bounding box
    pub radius_multiplier: f32,
    /// Fraction of the requested translation actually applied
    pub translation_gain: f32,
    /// Hard upper bound on the feature's influence radius, in pixels
    pub max_radius: f32,
    /// Fraction of the influence radius with full deformation strength
    pub core_zone_ratio: f32,
    /// Fraction of the influence radius where strength reaches zero
    pub gradient_zone_ratio: f32,
}

const EYE_PROFILE: FeatureProfile = FeatureProfile {
    radius_multiplier: 0.6,
    translation_gain: 0.5,
    max_radius: 80.0,
    core_zone_ratio: 0.5,
    gradient_zone_ratio: 1.0,
};

const MOUTH_PROFILE: FeatureProfile = FeatureProfile {
    radius_multiplier: 0.8,
    translation_gain: 0.3,
    max_radius: 100.0,
    core_zone_ratio: 0.6,
    gradient_zone_ratio: 1.0,
};

// Nose max_radius must stay strictly below the eye and mouth bounds so a
// nose edit never reaches into either neighbor.
const NOSE_PROFILE: FeatureProfile = FeatureProfile {
    radius_multiplier: 0.4,
    translation_gain: 0.4,
    max_radius: 60.0,
    core_zone_ratio: 0.4,
    gradient_zone_ratio: 0.9,
};

const NEUTRAL_PROFILE: FeatureProfile = FeatureProfile {
    radius_multiplier: 1.0,
    translation_gain: 0.0,
    max_radius: 0.0,
    core_zone_ratio: 0.0,
    gradient_zone_ratio: 0.0,
};

impl FeatureProfile {
    /// Look up the profile for a feature
    pub const fn of(feature: FeatureId) -> &'static FeatureProfile {
        match feature {
            FeatureId::LeftEye | FeatureId::RightEye => &EYE_PROFILE,
            FeatureId::Mouth => &MOUTH_PROFILE,
            FeatureId::Nose => &NOSE_PROFILE,
            FeatureId::Jawline => &NEUTRAL_PROFILE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_identity() {
        let params = FaceParams::default();
        assert!(params.is_identity());
        for f in FeatureId::ADJUSTABLE {
            assert!(params.is_feature_identity(f));
        }
    }

    #[test]
    fn test_non_identity_detected() {
        let mut params = FaceParams::default();
        params.left_eye.size = 1.5;
        assert!(!params.is_identity());
        assert!(!params.is_feature_identity(FeatureId::LeftEye));
        assert!(params.is_feature_identity(FeatureId::RightEye));
    }

    #[test]
    fn test_scale_per_feature() {
        let mut params = FaceParams::default();
        params.mouth.width = 1.2;
        params.mouth.height = 0.9;
        assert_eq!(params.scale(FeatureId::Mouth), Some((1.2, 0.9)));
        assert_eq!(params.scale(FeatureId::LeftEye), Some((1.0, 1.0)));
        assert_eq!(params.scale(FeatureId::Jawline), None);
    }

    #[test]
    fn test_profile_isolation_ordering() {
        let eye = FeatureProfile::of(FeatureId::LeftEye);
        let mouth = FeatureProfile::of(FeatureId::Mouth);
        let nose = FeatureProfile::of(FeatureId::Nose);

        // Nose is the most isolated feature
        assert!(nose.radius_multiplier < eye.radius_multiplier);
        assert!(eye.radius_multiplier < mouth.radius_multiplier);
        assert!(nose.max_radius < eye.max_radius);
        assert!(nose.max_radius < mouth.max_radius);
    }

    #[test]
    fn test_landmark_groups() {
        let mut lm = FaceLandmarks::new();
        lm.set_group(FeatureId::Nose, vec![Point::new(1.0, 2.0)]);
        assert_eq!(lm.group(FeatureId::Nose).len(), 1);
        assert!(lm.group(FeatureId::Mouth).is_empty());
    }
}
