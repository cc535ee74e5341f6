pub mod config;
pub mod connect;
pub mod cutoff;
pub mod dashboard;
pub mod error;
pub mod experiments;
pub mod render;
pub mod runner;
pub mod scheduler;
