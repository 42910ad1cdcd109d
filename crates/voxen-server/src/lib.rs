//! Headless server runner: drives scenario sessions and reports tick timings.

pub mod report;
pub mod runner;
pub mod scenes;
