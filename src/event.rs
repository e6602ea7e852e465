use serde::{Deserialize, Serialize};

use crate::capabilities::{DistanceResult, FileHandle, MediaResult, StorageResult, TimerId};

/// Everything that can happen to the add-trail form: user interactions from
/// the shell, plus completions of capability requests. Async completions carry
/// the generation they were issued under so stale ones can be dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Field edits
    NameChanged { value: String },
    FromLocationChanged { value: String },
    ToLocationChanged { value: String },

    // Image selection & preview
    ImageSelected { file: Option<FileHandle> },
    ImageRead { generation: u64, result: Box<MediaResult> },

    // Distance preview
    CalculateDistanceRequested,
    DistancePreviewComputed { generation: u64, result: DistanceResult },

    // Submission
    SubmitRequested,
    SubmitDistanceComputed { generation: u64, result: DistanceResult },
    TrailStored { generation: u64, result: StorageResult },
    SubmitTimedOut { timer: TimerId },

    // Feedback expiry
    FeedbackExpired { timer: TimerId },

    // Navigation
    BackToMainRequested,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_size_is_reasonable() {
        // Image payloads are boxed to keep the enum small.
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 128,
            "Event enum is {size} bytes, box more variants"
        );
    }
}
