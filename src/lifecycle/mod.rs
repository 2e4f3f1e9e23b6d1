pub mod poller;
pub mod setup;

pub use setup::Controller;
