#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod capabilities;
pub mod event;
pub mod model;

pub use app::{App, FeedbackView, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{
    DraftTrail, Feedback, FeedbackKind, FormPhase, ImageBlob, Model, TrailRecord, ValidatedDraft,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a success or error message stays visible before auto-dismissing.
pub const FEEDBACK_DURATION_MS: u64 = 3_000;

/// Upper bound on a whole submission (distance lookup plus storage write).
/// When it elapses the submission is treated as a persistence failure, so the
/// form can never sit in `Submitting` forever on a hung collaborator.
pub const SUBMIT_TIMEOUT_MS: u64 = 30_000;

pub const FORM_TITLE: &str = "Add Your New Trail";
pub const NAME_PLACEHOLDER: &str = "Enter trail name";
pub const FROM_PLACEHOLDER: &str = "Enter starting location";
pub const TO_PLACEHOLDER: &str = "Enter destination location";
pub const MAP_IMAGE_URL: &str =
    "https://www.groovypost.com/wp-content/uploads/2020/11/my-maps3.jpg";

pub const MSG_MISSING_FIELDS: &str = "Please fill out all the fields to add the trail.";
pub const MSG_SAVE_FAILED: &str = "Failed to save the trail. Please try again.";

#[must_use]
pub fn success_message(trail_name: &str) -> String {
    format!("Trail \"{trail_name}\" added successfully!")
}

#[must_use]
pub fn distance_label(distance: &str) -> String {
    format!("Distance: {distance}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredField {
    Name,
    FromLocation,
    ToLocation,
}

impl RequiredField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FromLocation => "from_location",
            Self::ToLocation => "to_location",
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a draft is submitted with required fields still empty. Local
/// and recoverable: no collaborator is contacted and the draft is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required fields are empty: {missing:?}")]
pub struct ValidationError {
    pub missing: Vec<RequiredField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_message_quotes_trail_name() {
        assert_eq!(
            success_message("Ridge Trail"),
            "Trail \"Ridge Trail\" added successfully!"
        );
    }

    #[test]
    fn distance_label_prefixes_value() {
        assert_eq!(distance_label("10 km"), "Distance: 10 km");
    }

    #[test]
    fn validation_error_lists_missing_fields() {
        let err = ValidationError {
            missing: vec![RequiredField::Name, RequiredField::ToLocation],
        };
        let text = err.to_string();
        assert!(text.contains("Name"));
        assert!(text.contains("ToLocation"));
    }
}
