mod bus;
mod distance;
mod media;
mod nav;
mod storage;
mod timer;

pub use self::bus::{Bus, BusOperation, Topic};
pub use self::distance::{
    Distance, DistanceError, DistanceOperation, DistanceOutput, DistanceResult,
};
pub use self::media::{
    FileHandle, Media, MediaError, MediaOperation, MediaResult, MAX_IMAGE_SIZE_BYTES,
};
pub use self::nav::{Nav, NavOperation, Page};
pub use self::storage::{Storage, StorageError, StorageOperation, StorageOutput, StorageResult};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};

use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

pub type AppRender = Render<Event>;
pub type AppStorage = Storage<Event>;
pub type AppDistance = Distance<Event>;
pub type AppMedia = Media<Event>;
pub type AppTimer = Timer<Event>;
pub type AppBus = Bus<Event>;
pub type AppNav = Nav<Event>;

// Field types are spelled out: the Effect derive needs to see the event
// parameter on each capability, so the `AppX` aliases are for external use
// only.
#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub storage: Storage<Event>,
    pub distance: Distance<Event>,
    pub media: Media<Event>,
    pub timer: Timer<Event>,
    pub bus: Bus<Event>,
    pub nav: Nav<Event>,
}
