use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TrailRecord;

/// The Storage Service collaborator: durably saves a finalized trail record.
/// Persistence format and engine are entirely the shell's concern; the core
/// only sees success or failure.
#[derive(Clone)]
pub struct Storage<E> {
    context: CapabilityContext<StorageOperation, E>,
}

impl<Ev> Capability<Ev> for Storage<Ev> {
    type Operation = StorageOperation;
    type MappedSelf<MappedEv> = Storage<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Storage::new(self.context.map_event(f))
    }
}

impl<E> Storage<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<StorageOperation, E>) -> Self {
        Self { context }
    }

    pub fn store_trail<F>(&self, record: TrailRecord, make_event: F)
    where
        F: FnOnce(StorageResult) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(StorageOperation::StoreTrail { record })
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageOperation {
    StoreTrail { record: TrailRecord },
}

impl Operation for StorageOperation {
    type Output = StorageResult;
}

pub type StorageResult = Result<StorageOutput, StorageError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageOutput {
    Stored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum StorageError {
    #[error("storage rejected the record: {reason}")]
    Rejected { reason: String },

    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },
}
