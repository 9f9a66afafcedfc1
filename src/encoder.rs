//! Pose frame encoder
//!
//! Wraps an evaluated pose and its bound scene parameters into a JSON frame
//! with producer metadata, ready for a renderer on the other side of a pipe
//! or FFI boundary.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PoseError;
use crate::scene::{SceneBinding, SceneParams};
use crate::types::{EffectiveBehavior, InteractionState, Pose};
use crate::{PRODUCER_NAME, YETI_VERSION};

/// Current frame format version
pub const FRAME_VERSION: &str = "1.0.0";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// One emitted pose frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    pub frame_version: String,
    pub producer: FrameProducer,
    pub computed_at_utc: String,
    /// Position of this frame in the producer's output
    pub sequence: u64,
    /// Whether the target pose differs from the previous frame's
    pub changed: bool,
    pub state: InteractionState,
    pub behavior: EffectiveBehavior,
    pub pose: Pose,
    pub scene: SceneParams,
}

/// Frame encoder
pub struct FrameEncoder {
    instance_id: String,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode(
        &self,
        state: &InteractionState,
        behavior: EffectiveBehavior,
        pose: &Pose,
        sequence: u64,
        changed: bool,
    ) -> PoseFrame {
        PoseFrame {
            frame_version: FRAME_VERSION.to_string(),
            producer: FrameProducer {
                name: PRODUCER_NAME.to_string(),
                version: YETI_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            sequence,
            changed,
            state: *state,
            behavior,
            pose: *pose,
            scene: SceneBinding::bind(pose),
        }
    }

    /// Serialize a frame, compact (one line) or pretty-printed
    pub fn to_json(frame: &PoseFrame, pretty: bool) -> Result<String, PoseError> {
        let json = if pretty {
            serde_json::to_string_pretty(frame)
        } else {
            serde_json::to_string(frame)
        };
        json.map_err(|e| PoseError::EncodingError(e.to_string()))
    }
}
