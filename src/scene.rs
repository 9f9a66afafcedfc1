//! Pose-to-visual binding
//!
//! Applies a [`Pose`] to the fixed yeti geometry: pupil and hand transforms,
//! mouth path data and the shake class. This is a lookup step only; every
//! decision has already been made by the pose calculator.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::types::{HandTransform, MouthShape, Pose};

/// CSS class on the root element
pub const BASE_CLASS: &str = "yeti";

/// CSS class that plays the failure oscillation
pub const SHAKE_CLASS: &str = "shake-animation";

/// SVG path data for each mouth shape
pub fn mouth_path(shape: MouthShape) -> &'static str {
    match shape {
        MouthShape::Neutral => "M 85 140 Q 100 155 115 140",
        MouthShape::Quirky => "M 88 150 Q 100 160 112 145",
        MouthShape::Sad => "M 85 150 Q 100 130 115 150",
        MouthShape::Joyful => "M 75 135 Q 100 175 125 135",
    }
}

/// Concrete render parameters for one pose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneParams {
    pub pupil_transform: String,
    pub left_hand_transform: String,
    pub right_hand_transform: String,
    pub mouth_path: String,
    pub svg_class: String,
}

/// Binds poses onto the scene graph
pub struct SceneBinding;

impl SceneBinding {
    pub fn bind(pose: &Pose) -> SceneParams {
        let svg_class = if pose.shaking {
            format!("{BASE_CLASS} {SHAKE_CLASS}")
        } else {
            BASE_CLASS.to_string()
        };

        SceneParams {
            pupil_transform: translate(pose.eye_offset.x, pose.eye_offset.y),
            left_hand_transform: hand_transform(pose.left_hand),
            right_hand_transform: hand_transform(pose.right_hand),
            mouth_path: mouth_path(pose.mouth).to_string(),
            svg_class,
        }
    }
}

fn hand_transform(hand: HandTransform) -> String {
    translate(hand.dx, hand.dy)
}

fn translate(x: f64, y: f64) -> String {
    format!("translate({}px, {}px)", px(x), px(y))
}

/// Format a coordinate, collapsing negative zero
fn px(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Render the complete character as a standalone SVG document
pub fn render_svg(pose: &Pose) -> String {
    let scene = SceneBinding::bind(pose);
    let mut svg = String::with_capacity(4096);

    // Writing into a String cannot fail
    let _ = write!(
        svg,
        r##"<svg viewBox="0 0 200 200" class="{class}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="furGradient" x1="0%" y1="0%" x2="0%" y2="100%">
      <stop offset="0%" stop-color="#f1f5f9"/>
      <stop offset="100%" stop-color="#cbd5e1"/>
    </linearGradient>
    <clipPath id="leftEyeClip"><circle cx="70" cy="90" r="18"/></clipPath>
    <clipPath id="rightEyeClip"><circle cx="130" cy="90" r="18"/></clipPath>
  </defs>
  <path d="M 50 180 L 150 180 Q 180 180 180 130 Q 180 50 100 50 Q 20 50 20 130 Q 20 180 50 180 Z" fill="url(#furGradient)" stroke="#94a3b8" stroke-width="2"/>
  <path d="M 25 90 Q 5 80 15 60 Q 35 50 40 75" fill="#cbd5e1" stroke="#94a3b8" stroke-width="2"/>
  <path d="M 175 90 Q 195 80 185 60 Q 165 50 160 75" fill="#cbd5e1" stroke="#94a3b8" stroke-width="2"/>
  <ellipse cx="100" cy="135" rx="40" ry="25" fill="#ffffff" opacity="0.6"/>
  <ellipse cx="100" cy="125" rx="8" ry="5" fill="#334155"/>
  <path d="{mouth}" fill="none" stroke="#334155" stroke-width="3" stroke-linecap="round" stroke-linejoin="round" class="yeti-transition"/>
"##,
        class = scene.svg_class,
        mouth = scene.mouth_path,
    );

    svg.push_str("  <g class=\"yeti-transition\">\n");
    push_eye(&mut svg, "leftEyeClip", 70, &scene.pupil_transform);
    push_eye(&mut svg, "rightEyeClip", 130, &scene.pupil_transform);
    svg.push_str("  </g>\n");

    push_hand(&mut svg, 20, &scene.left_hand_transform);
    push_hand(&mut svg, 130, &scene.right_hand_transform);

    svg.push_str("</svg>\n");
    svg
}

/// One clipped eye centered at (`cx`, 90): sclera, pupil with highlight, raised lid, rim
fn push_eye(svg: &mut String, clip: &str, cx: i32, pupil_transform: &str) {
    let left = cx - 18;
    let _ = write!(
        svg,
        r##"    <g clip-path="url(#{clip})">
      <rect x="{left}" y="72" width="36" height="36" fill="white"/>
      <g class="pupil-transition" style="transform: {pupil_transform}">
        <circle cx="{cx}" cy="90" r="7" fill="#1e293b"/>
        <circle cx="{hx}" cy="87" r="2" fill="white"/>
      </g>
      <rect x="{left}" y="72" width="36" height="36" fill="#cbd5e1" class="yeti-transition" style="transform: translateY(-36px)"/>
    </g>
    <circle cx="{cx}" cy="90" r="18" fill="none" stroke="#e2e8f0" stroke-width="2"/>
"##,
        hx = cx + 3,
    );
}

/// One hand whose left edge sits at `x` in the resting position
fn push_hand(svg: &mut String, x: i32, transform: &str) {
    let _ = write!(
        svg,
        r##"  <g class="yeti-transition" style="transform: {transform}">
    <path d="M {x} 250 L {x} 180 Q {x} 140 {mid} 140 Q {right} 140 {right} 180 L {right} 250 Z" fill="url(#furGradient)" stroke="#94a3b8" stroke-width="2"/>
"##,
        mid = x + 25,
        right = x + 50,
    );
    for (finger_x, top) in [(x + 15, 142), (x + 25, 140), (x + 35, 142)] {
        let _ = writeln!(
            svg,
            r##"    <path d="M {finger_x} {top} L {finger_x} 155" stroke="#94a3b8" stroke-width="2" stroke-linecap="round"/>"##
        );
    }
    svg.push_str("  </g>\n");
}
