//! Upstream content service adapters.
//!
//! This module provides the reqwest implementation of the `UpstreamSource`
//! port.

mod dto;
mod http_source;

pub use http_source::UpstreamHttpSource;
