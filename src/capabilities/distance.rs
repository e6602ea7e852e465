use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The Distance Service collaborator: resolves two location strings into a
/// displayable distance. The current shell implementation is a stub returning
/// a fixed value, but the core treats every lookup as asynchronous and
/// fallible.
#[derive(Clone)]
pub struct Distance<E> {
    context: CapabilityContext<DistanceOperation, E>,
}

impl<Ev> Capability<Ev> for Distance<Ev> {
    type Operation = DistanceOperation;
    type MappedSelf<MappedEv> = Distance<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Distance::new(self.context.map_event(f))
    }
}

impl<E> Distance<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<DistanceOperation, E>) -> Self {
        Self { context }
    }

    /// Empty location strings are legal input; the shell decides what they
    /// resolve to.
    pub fn compute<F>(&self, from: String, to: String, make_event: F)
    where
        F: FnOnce(DistanceResult) -> E + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(DistanceOperation::Compute { from, to })
                .await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceOperation {
    Compute { from: String, to: String },
}

impl Operation for DistanceOperation {
    type Output = DistanceResult;
}

pub type DistanceResult = Result<DistanceOutput, DistanceError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceOutput {
    Computed { distance: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum DistanceError {
    #[error("location could not be resolved: {location}")]
    Unresolved { location: String },

    #[error("distance service unavailable: {reason}")]
    Unavailable { reason: String },
}
