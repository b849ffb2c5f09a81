//! Table definitions. Primary keys are text so legacy non-UUID keys survive.

pub mod activity;
pub mod prospect;
pub mod reminder;
pub mod salesperson;
pub mod user;
