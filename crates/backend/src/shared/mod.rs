pub mod aggregation;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod presentation;
pub mod sql;
