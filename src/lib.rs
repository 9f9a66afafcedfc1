//! Yeti Pose - Deterministic pose engine for an animated login-form mascot
//!
//! Yeti Pose maps the interaction state of a login form (focus, reveal toggle,
//! input length, authentication outcome) to the character's target pose
//! through a pure pipeline: signal normalization → pose calculation →
//! scene binding.
//!
//! ## Modules
//!
//! - **Core**: [`normalizer`], [`pose`] and the [`rules`] tables they evaluate
//! - **Boundary**: [`form`] state, [`scene`] binding/SVG, [`encoder`] frames, [`ffi`]

pub mod encoder;
pub mod error;
pub mod form;
pub mod normalizer;
pub mod pipeline;
pub mod pose;
pub mod rules;
pub mod scene;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::PoseError;
pub use form::{AuthOutcome, Field, FormEvent, FormState};
pub use normalizer::SignalNormalizer;
pub use pipeline::{state_to_pose_json, state_to_svg, PoseProcessor};
pub use pose::{evaluate, PoseCalculator};
pub use scene::{render_svg, SceneBinding, SceneParams};
pub use types::{
    EffectiveBehavior, EyeOffset, HandPosture, HandTransform, InteractionState, MouthShape, Pose,
};

/// Yeti version embedded in all frames
pub const YETI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for frames
pub const PRODUCER_NAME: &str = "yeti-pose";
