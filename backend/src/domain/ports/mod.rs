//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod fallback_source;
mod upstream_source;

#[cfg(test)]
pub use fallback_source::MockFallbackSource;
pub use fallback_source::{FallbackSource, FallbackSourceError};
#[cfg(test)]
pub use upstream_source::MockUpstreamSource;
pub use upstream_source::{
    FixtureUpstreamSource, UpstreamMethod, UpstreamRequest, UpstreamSource, UpstreamSourceError,
};
