pub mod event_dispatcher;
pub mod mpsc_event_queue;

pub use event_dispatcher::EventDispatcher;
pub use mpsc_event_queue::{MpscEventQueue, MpscEventReceiver};
