pub mod counter;
pub mod registry;
pub mod session;

pub use counter::{CounterService, Observer, SessionGuard};
pub use registry::{ObserverId, SubscriberRegistry};
