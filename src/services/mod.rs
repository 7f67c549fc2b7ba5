// src/services/mod.rs
pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod forecast;
pub mod normalize;
pub mod regression;
