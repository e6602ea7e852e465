use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

/// Page Navigator collaborator: asks the shell to swap the currently
/// displayed full-page view. The core only navigates away explicitly, never
/// as part of the submit flow.
#[derive(Clone)]
pub struct Nav<E> {
    context: CapabilityContext<NavOperation, E>,
}

impl<Ev> Capability<Ev> for Nav<Ev> {
    type Operation = NavOperation;
    type MappedSelf<MappedEv> = Nav<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Nav::new(self.context.map_event(f))
    }
}

impl<E> Nav<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<NavOperation, E>) -> Self {
        Self { context }
    }

    pub fn show(&self, page: Page) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(NavOperation::Show { page }).await;
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Main,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavOperation {
    Show { page: Page },
}

impl Operation for NavOperation {
    type Output = ();
}
