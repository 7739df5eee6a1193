//! Radiology report entity extraction and BI-RADS classification.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod nlp;
pub mod record;
pub mod report;
pub mod store;
pub mod workflow;
