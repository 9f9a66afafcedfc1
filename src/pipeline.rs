//! Pipeline orchestration
//!
//! Public entry points wiring the stages together:
//! state JSON → validate → normalize → calculate → bind → frame JSON.

use tracing::debug;

use crate::encoder::{FrameEncoder, PoseFrame};
use crate::error::PoseError;
use crate::form::{FormEvent, FormState};
use crate::normalizer::SignalNormalizer;
use crate::pose::PoseCalculator;
use crate::scene::render_svg;
use crate::types::{InteractionState, Pose};

/// Parse and validate an interaction state from JSON
pub fn parse_state(json: &str) -> Result<InteractionState, PoseError> {
    let state: InteractionState = serde_json::from_str(json)?;
    state.validate()?;
    Ok(state)
}

/// Convert interaction state JSON to a pose frame JSON (stateless, one-shot).
///
/// # Example
/// ```ignore
/// let frame_json = state_to_pose_json(r#"{"is_username_focused": true}"#)?;
/// ```
pub fn state_to_pose_json(state_json: &str) -> Result<String, PoseError> {
    let mut processor = PoseProcessor::new();
    let frame = processor.process_state(&parse_state(state_json)?);
    FrameEncoder::to_json(&frame, true)
}

/// Convert interaction state JSON straight to an SVG document
pub fn state_to_svg(state_json: &str) -> Result<String, PoseError> {
    let state = parse_state(state_json)?;
    Ok(render_svg(&crate::pose::evaluate(&state)))
}

/// Stateful processor that numbers frames and remembers the previous target
/// pose, so a renderer can skip re-applying identical poses.
pub struct PoseProcessor {
    encoder: FrameEncoder,
    last_pose: Option<Pose>,
    frames_emitted: u64,
}

impl Default for PoseProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseProcessor {
    pub fn new() -> Self {
        Self {
            encoder: FrameEncoder::new(),
            last_pose: None,
            frames_emitted: 0,
        }
    }

    /// Create a processor whose frames carry a fixed instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self {
            encoder: FrameEncoder::with_instance_id(instance_id),
            last_pose: None,
            frames_emitted: 0,
        }
    }

    /// Evaluate one state and produce its frame.
    ///
    /// The caller guarantees the outcome invariant; use [`PoseProcessor::process`]
    /// for unvalidated input.
    pub fn process_state(&mut self, state: &InteractionState) -> PoseFrame {
        // Stage 1: Resolve override precedence
        let behavior = SignalNormalizer::normalize(state);

        // Stage 2: Derive pose
        let pose = PoseCalculator::compute(state, behavior);

        let changed = self.last_pose != Some(pose);
        debug!(
            rule = SignalNormalizer::deciding_rule(state),
            hands = ?pose.hands,
            mouth = ?pose.mouth,
            changed,
            "pose evaluated"
        );

        // Stage 3: Bind and wrap
        let frame = self
            .encoder
            .encode(state, behavior, &pose, self.frames_emitted, changed);

        self.last_pose = Some(pose);
        self.frames_emitted += 1;
        frame
    }

    /// Process interaction state JSON and return frame JSON (single line)
    pub fn process(&mut self, state_json: &str) -> Result<String, PoseError> {
        let state = parse_state(state_json)?;
        let frame = self.process_state(&state);
        FrameEncoder::to_json(&frame, false)
    }

    /// Apply form events in order, emitting one frame per event
    pub fn replay(&mut self, form: &mut FormState, events: &[FormEvent]) -> Vec<PoseFrame> {
        events
            .iter()
            .map(|event| {
                form.apply(event);
                self.process_state(&form.snapshot())
            })
            .collect()
    }

    /// Most recently emitted target pose
    pub fn last_pose(&self) -> Option<&Pose> {
        self.last_pose.as_ref()
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    /// Forget the previous pose; the next frame is always reported as changed
    pub fn reset(&mut self) {
        self.last_pose = None;
    }
}
