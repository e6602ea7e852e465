use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::model::TrailRecord;

/// Application event bus. Publishing is fire-and-forget with no
/// acknowledgment; delivery semantics beyond a synchronous hand-off to the
/// shell are out of scope. The bus handle is injected through `Capabilities`
/// rather than looked up as a process-wide singleton.
#[derive(Clone)]
pub struct Bus<E> {
    context: CapabilityContext<BusOperation, E>,
}

impl<Ev> Capability<Ev> for Bus<Ev> {
    type Operation = BusOperation;
    type MappedSelf<MappedEv> = Bus<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Bus::new(self.context.map_event(f))
    }
}

impl<E> Bus<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<BusOperation, E>) -> Self {
        Self { context }
    }

    pub fn publish_trail_stored(&self, record: TrailRecord) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context
                .notify_shell(BusOperation::Publish {
                    topic: Topic::TrailStored,
                    record,
                })
                .await;
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    TrailStored,
}

impl Topic {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrailStored => "trail_stored",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusOperation {
    Publish { topic: Topic, record: TrailRecord },
}

impl Operation for BusOperation {
    type Output = ();
}
