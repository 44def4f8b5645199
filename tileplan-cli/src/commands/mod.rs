//! CLI command implementations.
//!
//! - [`info`] - Describe a plan's levels and markers
//! - [`order`] - Show the ring order a load pass would submit
//! - [`view`] - Headless session running scripted pans and zooms

pub mod common;
pub mod info;
pub mod order;
pub mod view;
