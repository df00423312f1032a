//! Chronos Core
//!
//! Core types for talking to a Chronos job scheduler.
//!
//! This crate contains:
//! - Domain types: the job resource as the scheduler sees it (Job, Container)
//! - Schedule: the ISO-8601 recurrence string encoder

pub mod domain;
pub mod schedule;
