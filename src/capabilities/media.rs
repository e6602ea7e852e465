use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ImageBlob;

/// Shells should refuse reads past this size rather than hand the core an
/// arbitrarily large blob.
pub const MAX_IMAGE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Opaque handle to a file the user picked in the shell's file chooser. Only
/// the shell can dereference it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHandle(pub String);

/// Reads a user-selected file into memory so the draft can hold the image and
/// the view can show a preview.
#[derive(Clone)]
pub struct Media<E> {
    context: CapabilityContext<MediaOperation, E>,
}

impl<Ev> Capability<Ev> for Media<Ev> {
    type Operation = MediaOperation;
    type MappedSelf<MappedEv> = Media<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Media::new(self.context.map_event(f))
    }
}

impl<E> Media<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<MediaOperation, E>) -> Self {
        Self { context }
    }

    pub fn read_file<F>(&self, file: FileHandle, make_event: F)
    where
        F: FnOnce(MediaResult) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(MediaOperation::ReadFile { file })
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaOperation {
    ReadFile { file: FileHandle },
}

impl Operation for MediaOperation {
    type Output = MediaResult;
}

pub type MediaResult = Result<ImageBlob, MediaError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum MediaError {
    #[error("file read failed: {reason}")]
    ReadFailed { reason: String },

    #[error("file is {size} bytes, larger than the {max} byte limit")]
    TooLarge { size: u64, max: u64 },
}
