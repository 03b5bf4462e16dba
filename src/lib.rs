//! System Health
//!
//! Health check providers reporting host uptime and kernel system
//! information, for use with a health-check aggregator.

/// Report configuration (profiles, output format, enabled providers)
pub mod config;

/// Provider contract, check records, and the built-in providers
pub mod health;
