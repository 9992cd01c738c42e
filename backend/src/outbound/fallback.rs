//! Fallback dataset adapters backed by the `fallback-data` registry.

use fallback_data::FallbackRegistry;
use serde_json::Value;

use crate::domain::ResourceKind;
use crate::domain::ports::{FallbackSource, FallbackSourceError};

#[derive(Debug)]
enum Dataset {
    Bundled,
    Loaded(FallbackRegistry),
}

/// Serves records from a [`FallbackRegistry`].
#[derive(Debug)]
pub struct RegistryFallback {
    dataset: Dataset,
}

impl RegistryFallback {
    /// Serve the dataset compiled into the binary.
    #[must_use]
    pub const fn bundled() -> Self {
        Self {
            dataset: Dataset::Bundled,
        }
    }

    /// Serve an already loaded registry, e.g. one read from disk at startup.
    #[must_use]
    pub const fn from_registry(registry: FallbackRegistry) -> Self {
        Self {
            dataset: Dataset::Loaded(registry),
        }
    }

    fn registry(&self) -> Result<&FallbackRegistry, FallbackSourceError> {
        match &self.dataset {
            Dataset::Bundled => FallbackRegistry::bundled()
                .map_err(|err| FallbackSourceError::unavailable(err.to_string())),
            Dataset::Loaded(registry) => Ok(registry),
        }
    }
}

impl FallbackSource for RegistryFallback {
    fn records(&self, kind: ResourceKind) -> Result<Vec<Value>, FallbackSourceError> {
        Ok(self.registry()?.records(kind.collection()).to_vec())
    }

    fn record(&self, kind: ResourceKind, id: i64) -> Result<Option<Value>, FallbackSourceError> {
        Ok(self.registry()?.find(kind.collection(), id).cloned())
    }
}

/// Fallback source used when fallback serving is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledFallback;

impl FallbackSource for DisabledFallback {
    fn records(&self, _kind: ResourceKind) -> Result<Vec<Value>, FallbackSourceError> {
        Err(FallbackSourceError::disabled())
    }

    fn record(&self, _kind: ResourceKind, _id: i64) -> Result<Option<Value>, FallbackSourceError> {
        Err(FallbackSourceError::disabled())
    }
}
