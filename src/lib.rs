//! fbkeys library
//!
//! This library provides the on-screen keyboard core: screen geometry
//! resolution, touch coordinate mapping, composition and blitting into a
//! framebuffer, and the touch event loop. Device access sits behind the
//! traits in [`device`].

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod device;
pub mod engine;
pub mod models;
