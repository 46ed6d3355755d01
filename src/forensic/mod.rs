//! Forensic analysis and header repair.
//!
//! Two independent owners of a byte buffer live here:
//!
//! - [`inspector::FileInspector`] holds a read-only buffer and answers
//!   questions about it (type, strings, hex views, reports).
//! - [`repair::HeaderRepairEngine`] holds a mutable buffer and patches its
//!   leading bytes with a canonical signature before writing it out.
//!
//! They share only the read-only tables in [`signature`] and the byte
//! predicates in [`text`].

pub mod buffer;
pub mod inspector;
pub mod repair;
pub mod signature;
pub mod strings;
pub mod text;
