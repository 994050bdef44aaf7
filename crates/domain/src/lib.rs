//! Domain layer for the Pagecraft backend.
//!
//! This crate contains:
//! - Domain models (Page, PlatformSettings)
//! - Store contracts consumed by the renderer and admin surface
//! - Business logic services: visibility evaluation, content
//!   classification, HTML sanitization, render planning, and the
//!   public view controller

pub mod models;
pub mod services;
pub mod store;
