//! Signal normalization
//!
//! Resolves the raw covering/peeking request from the form into the
//! effective behavior, applying override precedence:
//! success → failure → covering/peeking → idle.

use crate::rules::{first_match, matching_rule, Rule};
use crate::types::{EffectiveBehavior, InteractionState};

const COVERING: EffectiveBehavior = EffectiveBehavior {
    covering: true,
    peeking: false,
};

const PEEKING: EffectiveBehavior = EffectiveBehavior {
    covering: false,
    peeking: true,
};

fn auth_succeeded(state: &InteractionState) -> bool {
    state.is_auth_succeeded
}

fn auth_failed(state: &InteractionState) -> bool {
    state.is_auth_failed
}

fn password_hidden(state: &InteractionState) -> bool {
    state.is_password_focused && !state.is_password_visible
}

fn password_revealed(state: &InteractionState) -> bool {
    state.is_password_focused && state.is_password_visible
}

/// Override precedence, highest first. Success clears everything; failure
/// drops the hands so the sad face shows.
const PRECEDENCE: &[Rule<InteractionState, EffectiveBehavior>] = &[
    Rule::new("success", auth_succeeded, EffectiveBehavior::IDLE),
    Rule::new("failure", auth_failed, EffectiveBehavior::IDLE),
    Rule::new("covering", password_hidden, COVERING),
    Rule::new("peeking", password_revealed, PEEKING),
];

/// Normalizer for raw interaction signals
pub struct SignalNormalizer;

impl SignalNormalizer {
    /// Apply override precedence to the raw covering/peeking request
    pub fn normalize(state: &InteractionState) -> EffectiveBehavior {
        first_match(PRECEDENCE, state, EffectiveBehavior::IDLE)
    }

    /// Name of the precedence rule that decided the behavior ("idle" if none)
    pub fn deciding_rule(state: &InteractionState) -> &'static str {
        matching_rule(PRECEDENCE, state).map_or("idle", |rule| rule.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn password_focused(visible: bool) -> InteractionState {
        InteractionState {
            is_password_focused: true,
            is_password_visible: visible,
            ..InteractionState::idle()
        }
    }

    /// Direct boolean form of the override: covering/peeking survive only
    /// when hands are shown and the login has not succeeded.
    fn reference(state: &InteractionState) -> EffectiveBehavior {
        let show_hands = !state.is_auth_failed || state.is_auth_succeeded;
        let raw_covering = state.is_password_focused && !state.is_password_visible;
        let raw_peeking = state.is_password_focused && state.is_password_visible;
        EffectiveBehavior {
            covering: raw_covering && show_hands && !state.is_auth_succeeded,
            peeking: raw_peeking && show_hands && !state.is_auth_succeeded,
        }
    }

    #[test]
    fn test_hidden_password_covers() {
        let behavior = SignalNormalizer::normalize(&password_focused(false));
        assert_eq!(behavior, COVERING);
    }

    #[test]
    fn test_visible_password_peeks() {
        let behavior = SignalNormalizer::normalize(&password_focused(true));
        assert_eq!(behavior, PEEKING);
    }

    #[test]
    fn test_failure_suppresses_hands() {
        let mut state = password_focused(false);
        state.is_auth_failed = true;
        assert_eq!(SignalNormalizer::normalize(&state), EffectiveBehavior::IDLE);
        assert_eq!(SignalNormalizer::deciding_rule(&state), "failure");

        state.is_password_visible = true;
        assert_eq!(SignalNormalizer::normalize(&state), EffectiveBehavior::IDLE);
    }

    #[test]
    fn test_success_clears_everything() {
        let mut state = password_focused(true);
        state.is_auth_succeeded = true;
        assert_eq!(SignalNormalizer::normalize(&state), EffectiveBehavior::IDLE);
        assert_eq!(SignalNormalizer::deciding_rule(&state), "success");
    }

    #[test]
    fn test_username_focus_is_idle() {
        let state = InteractionState {
            is_username_focused: true,
            input_length: 12,
            ..InteractionState::idle()
        };
        assert_eq!(SignalNormalizer::normalize(&state), EffectiveBehavior::IDLE);
        assert_eq!(SignalNormalizer::deciding_rule(&state), "idle");
    }

    #[test]
    fn test_matches_boolean_form_for_all_flag_combinations() {
        for bits in 0u8..32 {
            let state = InteractionState {
                input_length: 5,
                is_username_focused: bits & 1 != 0,
                is_password_focused: bits & 2 != 0,
                is_password_visible: bits & 4 != 0,
                is_auth_failed: bits & 8 != 0,
                is_auth_succeeded: bits & 16 != 0,
            };
            assert_eq!(
                SignalNormalizer::normalize(&state),
                reference(&state),
                "state {state:?}"
            );
        }
    }
}
