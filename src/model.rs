use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capabilities::TimerId;
use crate::{RequiredField, ValidationError};

/// User-supplied image captured as an opaque in-memory blob. Encoding and
/// storage strategy are the shell's concern.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlob {
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep raw bytes out of logs.
        f.debug_struct("ImageBlob")
            .field("len", &self.data.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// In-progress, mutable form state. Owned and mutated exclusively by
/// [`crate::App::update`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTrail {
    pub name: String,
    pub from_location: String,
    pub to_location: String,
    pub image: Option<ImageBlob>,
    pub preview_distance: Option<String>,
}

impl DraftTrail {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.from_location.is_empty()
            && self.to_location.is_empty()
            && self.image.is_none()
            && self.preview_distance.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The only way to obtain a [`ValidatedDraft`], and therefore the only
    /// path to a [`TrailRecord`].
    pub fn validate(&self) -> Result<ValidatedDraft, ValidationError> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(RequiredField::Name);
        }
        if self.from_location.is_empty() {
            missing.push(RequiredField::FromLocation);
        }
        if self.to_location.is_empty() {
            missing.push(RequiredField::ToLocation);
        }

        if missing.is_empty() {
            Ok(ValidatedDraft {
                name: self.name.clone(),
                from_location: self.from_location.clone(),
                to_location: self.to_location.clone(),
            })
        } else {
            Err(ValidationError { missing })
        }
    }
}

/// Submit-time snapshot of a draft whose required fields are all non-empty.
/// Taken before any collaborator is contacted, so edits made while a submit is
/// in flight cannot leak into the stored record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedDraft {
    name: String,
    from_location: String,
    to_location: String,
}

impl ValidatedDraft {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn from_location(&self) -> &str {
        &self.from_location
    }

    #[must_use]
    pub fn to_location(&self) -> &str {
        &self.to_location
    }
}

/// Finalized, immutable record handed to the Storage Service and published on
/// the event bus. Constructible only from a [`ValidatedDraft`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailRecord {
    name: String,
    distance: String,
}

impl TrailRecord {
    #[must_use]
    pub fn new(draft: &ValidatedDraft, distance: impl Into<String>) -> Self {
        Self {
            name: draft.name.clone(),
            distance: distance.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn distance(&self) -> &str {
        &self.distance
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Empty,
    Editing,
    Previewing,
    Submitting,
    Succeeded,
    Failed,
}

impl FormPhase {
    #[must_use]
    pub const fn is_submitting(self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// `Succeeded` and `Failed` are transient: the controller passes through
    /// them and settles on `Empty` or `Editing` within the same update.
    #[must_use]
    pub const fn valid_transitions(self) -> &'static [FormPhase] {
        match self {
            Self::Empty => &[Self::Editing, Self::Previewing],
            Self::Editing => &[Self::Empty, Self::Previewing, Self::Submitting],
            Self::Previewing => &[Self::Empty, Self::Editing, Self::Submitting],
            Self::Submitting => &[Self::Succeeded, Self::Failed],
            Self::Succeeded => &[Self::Empty],
            Self::Failed => &[Self::Editing],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        self == to || self.valid_transitions().contains(&to)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Transient user-facing notification. At most one exists at a time; raising
/// a new one cancels the previous expiry timer, so a stale timer can never
/// clear a later message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
    pub timer: TimerId,
}

/// Monotonic issue counter for one kind of overlapping async request. Only a
/// completion carrying the most recently issued generation is applied;
/// anything earlier is stale and dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    #[must_use]
    pub const fn latest(self) -> u64 {
        self.latest
    }

    #[must_use]
    pub const fn is_current(self, generation: u64) -> bool {
        generation == self.latest
    }
}

/// Bookkeeping for a submission between validation and the storage outcome.
/// Dropped when the submission settles or times out; a completion that finds
/// no pending submit (or a mismatched generation) is stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSubmit {
    pub generation: u64,
    pub draft: ValidatedDraft,
    pub record: Option<TrailRecord>,
    pub timeout_timer: TimerId,
}

#[derive(Debug, Default)]
pub struct Model {
    pub phase: FormPhase,
    pub draft: DraftTrail,
    pub feedback: Option<Feedback>,
    pub image_reads: RequestGeneration,
    pub distance_previews: RequestGeneration,
    pub submits: RequestGeneration,
    pub pending_submit: Option<PendingSubmit>,
    timer_seq: u64,
}

impl Model {
    pub fn next_timer_id(&mut self) -> TimerId {
        self.timer_seq += 1;
        TimerId(self.timer_seq)
    }
}
