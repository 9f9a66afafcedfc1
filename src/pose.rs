//! Pose calculation
//!
//! Derives gaze, hand posture, mouth shape and shake flag from the
//! interaction state and its effective behavior. Pure and total: every
//! branch ends in an explicit default.

use crate::normalizer::SignalNormalizer;
use crate::rules::{first_match, Rule};
use crate::types::{
    EffectiveBehavior, EyeOffset, HandPosture, InteractionState, MouthShape, Pose, MAX_INPUT_LENGTH,
};

/// Horizontal pupil travel either side of center
pub const MAX_EYE_TRAVEL_X: f64 = 14.0;

/// Vertical gaze targets
const EYE_Y_JOY: f64 = -4.0;
const EYE_Y_SAD: f64 = 10.0;
const EYE_Y_READING: f64 = 6.0;
const EYE_Y_NEUTRAL: f64 = 0.0;

/// Everything a pose rule may look at
#[derive(Debug, Clone, Copy)]
pub struct Signals {
    pub state: InteractionState,
    pub behavior: EffectiveBehavior,
}

fn succeeded(s: &Signals) -> bool {
    s.state.is_auth_succeeded
}

fn failed(s: &Signals) -> bool {
    s.state.is_auth_failed
}

fn covering(s: &Signals) -> bool {
    s.behavior.covering
}

fn peeking(s: &Signals) -> bool {
    s.behavior.peeking
}

fn hands_up(s: &Signals) -> bool {
    s.behavior.hands_up()
}

/// Reading the username or the revealed password
fn reading(s: &Signals) -> bool {
    s.state.is_username_focused || s.behavior.peeking
}

const GAZE_Y: &[Rule<Signals, f64>] = &[
    Rule::new("success", succeeded, EYE_Y_JOY),
    Rule::new("failure", failed, EYE_Y_SAD),
    Rule::new("reading", reading, EYE_Y_READING),
];

const HANDS: &[Rule<Signals, HandPosture>] = &[
    Rule::new("success", succeeded, HandPosture::Celebrating),
    Rule::new("covering", covering, HandPosture::Covering),
    Rule::new("peeking", peeking, HandPosture::Peeking),
];

const MOUTH: &[Rule<Signals, MouthShape>] = &[
    Rule::new("success", succeeded, MouthShape::Joyful),
    Rule::new("failure", failed, MouthShape::Sad),
    Rule::new("hands_up", hands_up, MouthShape::Quirky),
];

/// Calculator mapping signals to a pose
pub struct PoseCalculator;

impl PoseCalculator {
    /// Compute the full pose for a state and its effective behavior
    pub fn compute(state: &InteractionState, behavior: EffectiveBehavior) -> Pose {
        let signals = Signals {
            state: *state,
            behavior,
        };

        let eye_offset = EyeOffset::new(Self::eye_x(&signals), Self::eye_y(&signals));
        let hands = first_match(HANDS, &signals, HandPosture::Resting);
        let mouth = first_match(MOUTH, &signals, MouthShape::Neutral);

        Pose::new(eye_offset, hands, mouth, state.is_auth_failed)
    }

    /// Horizontal gaze: follows the caret across ±14 while reading, else centered
    fn eye_x(signals: &Signals) -> f64 {
        if !reading(signals) || signals.behavior.covering || signals.state.is_auth_succeeded {
            return 0.0;
        }

        // Clamp again here; callers are expected to clamp but are not trusted to
        let normalized = signals.state.clamped_length() as f64 / MAX_INPUT_LENGTH as f64;
        -MAX_EYE_TRAVEL_X + normalized * (MAX_EYE_TRAVEL_X * 2.0)
    }

    fn eye_y(signals: &Signals) -> f64 {
        first_match(GAZE_Y, signals, EYE_Y_NEUTRAL)
    }
}

/// Run the full core: normalize, then compute the pose
pub fn evaluate(state: &InteractionState) -> Pose {
    let behavior = SignalNormalizer::normalize(state);
    PoseCalculator::compute(state, behavior)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn username_typing(len: u32) -> InteractionState {
        InteractionState {
            input_length: len,
            is_username_focused: true,
            ..InteractionState::idle()
        }
    }

    fn all_states() -> Vec<InteractionState> {
        let mut states = Vec::new();
        for bits in 0u8..32 {
            for len in [0, 7, 15, 30, 40] {
                states.push(InteractionState {
                    input_length: len,
                    is_username_focused: bits & 1 != 0,
                    is_password_focused: bits & 2 != 0,
                    is_password_visible: bits & 4 != 0,
                    is_auth_failed: bits & 8 != 0,
                    is_auth_succeeded: bits & 16 != 0,
                });
            }
        }
        states
    }

    #[test]
    fn test_scenario_typing_username_from_empty() {
        let pose = evaluate(&username_typing(0));
        assert_eq!(pose.eye_offset, EyeOffset::new(-14.0, 6.0));
        assert_eq!(pose.hands, HandPosture::Resting);
        assert_eq!(pose.mouth, MouthShape::Neutral);
        assert!(!pose.shaking);
    }

    #[test]
    fn test_scenario_covering_hidden_password() {
        let state = InteractionState {
            input_length: 8,
            is_password_focused: true,
            ..InteractionState::idle()
        };
        let pose = evaluate(&state);
        assert_eq!(pose.eye_offset, EyeOffset::new(0.0, 0.0));
        assert_eq!(pose.hands, HandPosture::Covering);
        assert_eq!(pose.mouth, MouthShape::Quirky);
        assert!(!pose.shaking);
    }

    #[test]
    fn test_scenario_peeking_tracks_password() {
        let state = InteractionState {
            input_length: 30,
            is_password_focused: true,
            is_password_visible: true,
            ..InteractionState::idle()
        };
        let pose = evaluate(&state);
        assert_eq!(pose.eye_offset, EyeOffset::new(14.0, 6.0));
        assert_eq!(pose.hands, HandPosture::Peeking);
        assert_eq!(pose.mouth, MouthShape::Quirky);
    }

    #[test]
    fn test_scenario_success_overrides_everything() {
        for state in all_states() {
            let mut state = state;
            state.is_auth_succeeded = true;
            state.is_auth_failed = false;

            let pose = evaluate(&state);
            assert_eq!(pose.eye_offset, EyeOffset::new(0.0, -4.0));
            assert_eq!(pose.hands, HandPosture::Celebrating);
            assert_eq!(pose.mouth, MouthShape::Joyful);
            assert!(!pose.shaking);
        }
    }

    #[test]
    fn test_scenario_failure_while_covering() {
        let state = InteractionState {
            input_length: 6,
            is_password_focused: true,
            is_auth_failed: true,
            ..InteractionState::idle()
        };
        let pose = evaluate(&state);
        assert_eq!(pose.hands, HandPosture::Resting);
        assert_eq!(pose.mouth, MouthShape::Sad);
        assert_eq!(pose.eye_offset.y, 10.0);
        assert!(pose.shaking);
    }

    #[test]
    fn test_failure_never_raises_hands() {
        for state in all_states() {
            let mut state = state;
            state.is_auth_failed = true;
            state.is_auth_succeeded = false;

            let pose = evaluate(&state);
            assert_eq!(pose.hands, HandPosture::Resting, "state {state:?}");
            assert!(pose.shaking);
        }
    }

    #[test]
    fn test_shake_follows_failure_flag_even_with_success() {
        // Outside the outcome precondition: precedence picks the success pose,
        // the shake flag still mirrors the failure flag
        let state = InteractionState {
            is_auth_failed: true,
            is_auth_succeeded: true,
            ..InteractionState::idle()
        };
        let pose = evaluate(&state);
        assert_eq!(pose.hands, HandPosture::Celebrating);
        assert_eq!(pose.mouth, MouthShape::Joyful);
        assert!(pose.shaking);
    }

    #[test]
    fn test_eye_x_is_linear_across_range() {
        assert_eq!(evaluate(&username_typing(0)).eye_offset.x, -14.0);
        assert_eq!(evaluate(&username_typing(15)).eye_offset.x, 0.0);
        assert_eq!(evaluate(&username_typing(30)).eye_offset.x, 14.0);

        let mut previous = f64::NEG_INFINITY;
        for len in 0..=45 {
            let x = evaluate(&username_typing(len)).eye_offset.x;
            assert!(x >= previous, "eye x decreased at length {len}");
            previous = x;
        }
    }

    #[test]
    fn test_eye_x_clamps_over_length_input() {
        assert_eq!(
            evaluate(&username_typing(40)).eye_offset.x,
            evaluate(&username_typing(30)).eye_offset.x
        );
        assert_eq!(evaluate(&username_typing(u32::MAX)).eye_offset.x, 14.0);
    }

    #[test]
    fn test_idle_is_neutral() {
        let pose = evaluate(&InteractionState::idle());
        assert_eq!(
            pose,
            Pose::new(
                EyeOffset::default(),
                HandPosture::Resting,
                MouthShape::Neutral,
                false
            )
        );
    }

    #[test]
    fn test_compute_is_deterministic() {
        for state in all_states() {
            assert_eq!(evaluate(&state), evaluate(&state));
        }
    }

    #[test]
    fn test_compute_uses_given_behavior() {
        // Calculator trusts the behavior it is handed; it does not re-derive it
        let state = username_typing(30);
        let covering = EffectiveBehavior {
            covering: true,
            peeking: false,
        };
        let pose = PoseCalculator::compute(&state, covering);
        assert_eq!(pose.eye_offset, EyeOffset::new(0.0, 6.0));
        assert_eq!(pose.hands, HandPosture::Covering);
    }
}
