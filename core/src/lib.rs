pub mod aggregate;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod generator;
pub mod kpi;
pub mod rng;
pub mod snapshot;
pub mod types;
