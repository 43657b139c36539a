pub mod aggregation;
pub mod filter;
pub mod repository;
pub mod service;
pub mod view;
