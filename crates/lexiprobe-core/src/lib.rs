//! lexiprobe-core: adaptive leveling and vocabulary estimation engine.
//!
//! This crate defines the answer model, the adaptive tier search, the flat
//! survey, and the statistics that turn sample counts into vocabulary
//! estimates. Word-list loading, configuration and reports live here too so
//! front ends only have to render words and forward key presses.

pub mod config;
pub mod error;
pub mod estimator;
pub mod leveler;
pub mod model;
pub mod report;
pub mod round;
pub mod sampler;
pub mod survey;
pub mod wordlist;
