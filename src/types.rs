//! Core data types for Yeti Pose
//!
//! These types define the data structures flowing through the pose pipeline:
//! interaction state from the form → effective behavior → pose → bound scene.

use serde::{Deserialize, Serialize};

use crate::error::PoseError;

/// Longest input length the eyes track; anything longer looks at the far edge
pub const MAX_INPUT_LENGTH: u32 = 30;

/// Snapshot of the login form's interaction signals for one evaluation.
///
/// Owned by the form collaborator and passed in by value each cycle. The
/// failure and success flags must never both be set; see [`InteractionState::validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionState {
    /// Length of the currently relevant text field, clamped by the caller to 0..=30
    pub input_length: u32,
    pub is_username_focused: bool,
    pub is_password_focused: bool,
    /// Password reveal toggle
    pub is_password_visible: bool,
    pub is_auth_failed: bool,
    pub is_auth_succeeded: bool,
}

impl InteractionState {
    /// Idle state: nothing focused, no outcome
    pub fn idle() -> Self {
        Self::default()
    }

    /// Check the outcome mutual-exclusion precondition
    pub fn validate(&self) -> Result<(), PoseError> {
        if self.is_auth_failed && self.is_auth_succeeded {
            return Err(PoseError::ConflictingOutcome);
        }
        Ok(())
    }

    /// Input length clamped to the tracked range
    pub fn clamped_length(&self) -> u32 {
        self.input_length.min(MAX_INPUT_LENGTH)
    }
}

/// Covering/peeking request after override precedence has been applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveBehavior {
    pub covering: bool,
    pub peeking: bool,
}

impl EffectiveBehavior {
    pub const IDLE: Self = Self {
        covering: false,
        peeking: false,
    };

    /// True when either hand is up in front of the face
    pub fn hands_up(&self) -> bool {
        self.covering || self.peeking
    }
}

/// Pupil translation shared by both eyes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeOffset {
    pub x: f64,
    pub y: f64,
}

impl EyeOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Translation of a hand relative to its resting position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HandTransform {
    pub dx: f64,
    pub dy: f64,
}

impl HandTransform {
    pub const REST: Self = Self { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// Named hand poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandPosture {
    /// Both hands down at the bottom of the frame
    Resting,
    /// Both hands raised over both eyes
    Covering,
    /// Left hand lowered to uncover one eye, right hand still covering
    Peeking,
    /// Both hands up and spread outward
    Celebrating,
}

impl HandPosture {
    /// Left and right hand transforms for this posture
    pub fn transforms(self) -> (HandTransform, HandTransform) {
        match self {
            HandPosture::Resting => (HandTransform::REST, HandTransform::REST),
            HandPosture::Covering => (
                HandTransform::new(25.0, -75.0),
                HandTransform::new(-25.0, -75.0),
            ),
            HandPosture::Peeking => (
                HandTransform::new(25.0, -30.0),
                HandTransform::new(-25.0, -75.0),
            ),
            HandPosture::Celebrating => (
                HandTransform::new(-25.0, -60.0),
                HandTransform::new(25.0, -60.0),
            ),
        }
    }
}

/// Mouth expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouthShape {
    /// Standard smile
    Neutral,
    /// Asymmetric smile while hands are up
    Quirky,
    /// Inverted arch
    Sad,
    /// Wide open smile
    Joyful,
}

/// Complete set of visual parameters derived from one interaction state.
///
/// A value type: recomputed on every evaluation and never stored by the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub eye_offset: EyeOffset,
    pub hands: HandPosture,
    pub left_hand: HandTransform,
    pub right_hand: HandTransform,
    pub mouth: MouthShape,
    pub shaking: bool,
}

impl Pose {
    /// Assemble a pose from its parts, deriving hand transforms from the posture
    pub fn new(eye_offset: EyeOffset, hands: HandPosture, mouth: MouthShape, shaking: bool) -> Self {
        let (left_hand, right_hand) = hands.transforms();
        Self {
            eye_offset,
            hands,
            left_hand,
            right_hand,
            mouth,
            shaking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_rejects_both_outcomes() {
        let state = InteractionState {
            is_auth_failed: true,
            is_auth_succeeded: true,
            ..InteractionState::idle()
        };
        assert!(matches!(state.validate(), Err(PoseError::ConflictingOutcome)));

        let failed_only = InteractionState {
            is_auth_failed: true,
            ..InteractionState::idle()
        };
        assert!(failed_only.validate().is_ok());
    }

    #[test]
    fn test_clamped_length() {
        let state = InteractionState {
            input_length: 45,
            ..InteractionState::idle()
        };
        assert_eq!(state.clamped_length(), 30);
    }

    #[test]
    fn test_state_json_defaults_missing_fields() {
        let state: InteractionState =
            serde_json::from_str(r#"{"is_password_focused": true}"#).unwrap();
        assert_eq!(
            state,
            InteractionState {
                is_password_focused: true,
                ..InteractionState::idle()
            }
        );
    }

    #[test]
    fn test_state_json_rejects_unknown_fields() {
        let result = serde_json::from_str::<InteractionState>(r#"{"is_pasword_focused": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_posture_transforms() {
        let (left, right) = HandPosture::Peeking.transforms();
        assert_eq!(left, HandTransform::new(25.0, -30.0));
        assert_eq!(right, HandTransform::new(-25.0, -75.0));

        // Celebration spreads outward, covering converges inward
        let (left, right) = HandPosture::Celebrating.transforms();
        assert!(left.dx < 0.0 && right.dx > 0.0);
        let (left, right) = HandPosture::Covering.transforms();
        assert!(left.dx > 0.0 && right.dx < 0.0);
    }

    #[test]
    fn test_mouth_serializes_snake_case() {
        let json = serde_json::to_string(&MouthShape::Joyful).unwrap();
        assert_eq!(json, "\"joyful\"");
    }
}
