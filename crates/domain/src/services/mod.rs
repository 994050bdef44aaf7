//! Business logic services.

pub mod classifier;
pub mod controller;
pub mod renderer;
pub mod sanitizer;
pub mod visibility;
