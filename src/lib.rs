//! SurveyTally - satisfaction survey aggregation for academic services.
//!
//! The [`analysis`] module holds the aggregation core: pure functions that
//! turn an ordered question list and a set of K/C/B/BS survey responses into
//! per-question distributions and one pooled satisfaction score.
//! [`store`] loads and saves the content document those inputs come from,
//! [`registry`] edits the question list, and [`report`] renders results.

pub mod analysis;
pub mod models;
pub mod registry;
pub mod report;
pub mod store;
