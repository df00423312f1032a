//! Core domain types
//!
//! These types describe the resources the scheduler manipulates. They are
//! plain values with no identity beyond the job name and map one-to-one onto
//! the scheduler's JSON payloads.

pub mod job;
