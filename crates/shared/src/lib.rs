//! Shared utilities and common types for the Pagecraft backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Slug and content validation logic
//! - Cursor-based pagination for listings
//! - Hashing utilities for credential verification

pub mod crypto;
pub mod pagination;
pub mod validation;
