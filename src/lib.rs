//! Roommate compatibility matching and bed allocation for university
//! hostels: a three-tier pairwise scorer, a greedy group former, and an
//! atomically committed allocation runner over a pluggable housing store.

pub mod config;
pub mod demo;
pub mod error;
pub mod telemetry;
pub mod workflows;
