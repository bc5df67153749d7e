//! # av-core
//!
//! Core types, ID generation, and error types for AVault.
//!
//! This crate provides the foundational types shared across all AVault crates:
//! - Entity structs for the inventory collections (categories, items, terms, sessions, counts, users)
//! - `TermType` and the academic calendar
//! - ID prefix constants
//! - Cross-cutting error types
//! - The latest-count resolver, the single place where count precedence is decided
//! - Report computations built on top of the resolver
//! - Import document types and response types shared by the CLI and HTTP surface

pub mod calendar;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod import;
pub mod report;
pub mod resolve;
pub mod responses;
