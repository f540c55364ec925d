pub mod alerting;
pub mod api;
pub mod app;
pub mod config;
pub mod entities;
pub mod metrics;
pub mod migrator;
pub mod performance;
pub mod telemetry;

pub use sea_orm;
