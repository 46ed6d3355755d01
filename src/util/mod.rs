//! Shared utilities (hex dump formatting, audit logging, evidence discovery).

#[cfg(feature = "cli")]
pub mod audit;
#[cfg(feature = "cli")]
pub mod fs;
pub mod hex;
