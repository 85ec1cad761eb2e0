//! Route Handlers

pub mod filters;
pub mod map_data;
pub mod metrics;
pub mod summary;
