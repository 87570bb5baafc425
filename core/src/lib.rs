pub mod alert;
pub mod budget;
pub mod calendar;
pub mod capacity;
pub mod config;
pub mod demo;
pub mod department;
pub mod engine;
pub mod error;
pub mod model;
pub mod pool;
pub mod relative_week;
pub mod rng;
pub mod snapshot;
pub mod source;
pub mod statistics;
pub mod store;
pub mod talent;
pub mod types;
pub mod utilization;
pub mod workload;
