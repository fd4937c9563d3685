//! X11/RandR-specific implementation.
//!
//! This module provides the concrete backend for the
//! [`DisplayServer`](crate::traits::DisplayServer) trait, powered by the
//! RandR extension over an x11rb connection.
//!
//! Nothing outside this module should reference X11 directly.

pub mod server;

pub use server::{XrandrError, XrandrServer};
