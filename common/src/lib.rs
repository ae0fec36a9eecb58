// Common library for shared code across the catalog and ad-slot functions

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod errors;
pub mod event;
pub mod models;
pub mod storage;
pub mod telemetry;
pub mod validation;
