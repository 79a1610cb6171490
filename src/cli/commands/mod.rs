pub mod config;
pub mod diagnose;
pub mod industries;
pub mod legacy;
pub mod parallel;
