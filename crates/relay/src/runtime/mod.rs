//! Runtime — boot sequence and the periodic fetch-parse-send loop.

pub mod boot;
pub mod run;
