//! Maritime imports dashboard: a read-only transaction dataset, progressive
//! filtering over it, and the aggregates the dashboard renders.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
