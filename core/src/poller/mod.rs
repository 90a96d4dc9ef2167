//! Vendor-agnostic task poller.
//!
//! Separates "task still running" (no error, keep polling) from "cannot talk
//! to the service" (error, bounded by a consecutive-failure ceiling).

mod options;
mod run;

pub use options::{PollOptions, PollOutcome, PollState};
pub use run::{wait_for_task, Poller};
