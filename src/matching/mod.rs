//! Exposure matching backends
//!
//! The core abstraction is the [`MatchingService`] trait: the capability that
//! ingests a batch of diagnosis key files. Two implementations are provided:
//!
//! - [`CliMatchingService`]: runs an external `key-matcher` binary per batch
//! - [`NoOpMatchingService`]: stub used when no backend is available
//!
//! Use [`from_config`] to pick one from a [`MatcherConfig`].

mod cli;
mod noop;
mod traits;

pub use cli::{CliMatchingService, DEFAULT_MATCHER_BINARY};
pub use noop::NoOpMatchingService;
pub use traits::MatchingService;

use crate::config::MatcherConfig;
use std::sync::Arc;

/// Select a matching backend based on configuration
///
/// An explicit `binary_path` wins. Otherwise PATH is searched for
/// [`DEFAULT_MATCHER_BINARY`] when `search_path` is set. If neither yields a
/// binary, the [`NoOpMatchingService`] is used.
pub fn from_config(config: &MatcherConfig) -> Arc<dyn MatchingService> {
    let service: Arc<dyn MatchingService> = if let Some(ref binary_path) = config.binary_path {
        Arc::new(CliMatchingService::new(binary_path.clone()).with_args(config.extra_args.clone()))
    } else if config.search_path {
        CliMatchingService::from_path()
            .map(|s| Arc::new(s.with_args(config.extra_args.clone())) as Arc<dyn MatchingService>)
            .unwrap_or_else(|| Arc::new(NoOpMatchingService))
    } else {
        Arc::new(NoOpMatchingService)
    };

    tracing::info!(matching_service = service.name(), "Matching service initialized");
    service
}
