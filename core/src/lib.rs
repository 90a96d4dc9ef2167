//! Core of framecast: the video provider contract, the task poller and the
//! provider registry. Concrete vendor integrations live in `framecast-plugins`.

pub mod api;
pub mod config;
pub mod error;
pub mod poller;
pub mod provider;
pub mod registry;
