//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **upstream**: reqwest client for the upstream content service
//! - **fallback**: the bundled fallback dataset, or none when disabled
//!
//! Adapters are thin translators between domain requests and transport
//! representations. They contain no gateway policy.

pub mod fallback;
pub mod upstream;
