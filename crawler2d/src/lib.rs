//! Procedural multi-legged crawler: a spine chain that chases a pointer, two-bone IK legs
//! stepping in a tripod gait, and a renderer-agnostic draw list.
//!
//! The crate has no platform dependencies. The browser host lives in `crawler2d-web`.

#![forbid(unsafe_code)]

mod config;
mod error;
mod geometry;
mod render;
mod runtime;

pub mod effects;

#[cfg(feature = "json")]
pub mod json;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use render::*;
pub use runtime::*;

#[cfg(test)]
mod geometry_tests;



#[cfg(all(test, feature = "json"))]
mod json_tests;
