//! Login form state
//!
//! The collaborator that owns focus, field text, the reveal toggle and the
//! authentication outcome. It applies form events and hands out
//! [`InteractionState`] snapshots, keeping the outcome flags mutually
//! exclusive and clearing them whenever a tracked field is edited.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::PoseError;
use crate::types::{InteractionState, MAX_INPUT_LENGTH};

/// Form text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Username,
    Password,
}

/// Result of a submit, decided outside this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthOutcome {
    Success,
    Failure,
}

/// A single user interaction with the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    Focus { field: Field },
    Blur { field: Field },
    Input { field: Field, value: String },
    ToggleVisibility,
    Submit { outcome: AuthOutcome },
}

impl FormEvent {
    /// Parse NDJSON (one event per line, blank lines skipped)
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<FormEvent>, PoseError> {
        let mut events = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<FormEvent>(trimmed) {
                Ok(event) => events.push(event),
                Err(e) => {
                    return Err(PoseError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(events)
    }
}

/// Mutable state of the login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    username: String,
    password: String,
    focused: Option<Field>,
    password_visible: bool,
    outcome: Option<AuthOutcome>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event
    pub fn apply(&mut self, event: &FormEvent) {
        match event {
            FormEvent::Focus { field } => self.focused = Some(*field),
            FormEvent::Blur { field } => {
                if self.focused == Some(*field) {
                    self.focused = None;
                }
            }
            FormEvent::Input { field, value } => {
                match field {
                    Field::Username => self.username.clone_from(value),
                    Field::Password => self.password.clone_from(value),
                }
                self.outcome = None;
            }
            FormEvent::ToggleVisibility => self.password_visible = !self.password_visible,
            FormEvent::Submit { outcome } => self.outcome = Some(*outcome),
        }
        trace!(?event, focused = ?self.focused, outcome = ?self.outcome, "form event applied");
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn focused(&self) -> Option<Field> {
        self.focused
    }

    pub fn outcome(&self) -> Option<AuthOutcome> {
        self.outcome
    }

    /// Length the eyes should track: the password while it is focused, else the username
    pub fn tracked_length(&self) -> u32 {
        let text = if self.focused == Some(Field::Password) {
            &self.password
        } else {
            &self.username
        };
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        chars.min(MAX_INPUT_LENGTH)
    }

    /// Snapshot for one pose evaluation
    pub fn snapshot(&self) -> InteractionState {
        InteractionState {
            input_length: self.tracked_length(),
            is_username_focused: self.focused == Some(Field::Username),
            is_password_focused: self.focused == Some(Field::Password),
            is_password_visible: self.password_visible,
            is_auth_failed: self.outcome == Some(AuthOutcome::Failure),
            is_auth_succeeded: self.outcome == Some(AuthOutcome::Success),
        }
    }
}
