//! Shared data model of the reporting engine: report types, query
//! descriptors, filter rules, view state, wire request/response types
//! and the normalized aggregate summary. Pure and serializable; no I/O.

pub mod reports;
