//! Notification aggregation and quintile bucketing.
//!
//! This module explodes each send event into its recipient locations,
//! counts notifications per ISO week, averages them per location, and
//! splits locations into equal-frequency buckets.

pub mod aggregate;
pub mod analyzer;
pub mod bucket;
pub mod types;
pub mod utility;
