pub mod cli;
pub mod provider;
pub mod task;
