//! Asynchronous SQL jobs: submit once, poll until done or out of attempts

pub mod accumulator;
pub mod poller;

pub use accumulator::Accumulator;
pub use poller::{JobPoller, PollObserver, PollProgress};
