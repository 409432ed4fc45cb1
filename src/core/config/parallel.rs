//! Parallel page processing configuration.

use serde::{Deserialize, Serialize};

/// Controls how batches of pages are spread over the rayon thread pool.
///
/// Pages are independent, so the only knobs are how many threads to use and
/// how small a batch must be to stay on the calling thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParallelPolicy {
    /// Maximum number of threads to use for parallel processing.
    /// If None, rayon will use the default thread pool size (typically number of CPU cores).
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Batches with at most this many pages are resolved sequentially.
    /// Default: 4
    #[serde(default = "ParallelPolicy::default_page_threshold")]
    pub page_threshold: usize,
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of threads.
    pub fn with_max_threads(mut self, max_threads: Option<usize>) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set the sequential page threshold.
    pub fn with_page_threshold(mut self, threshold: usize) -> Self {
        self.page_threshold = threshold;
        self
    }

    /// Returns true when a batch of `pages` pages should be resolved in parallel.
    pub fn should_parallelize(&self, pages: usize) -> bool {
        pages > self.page_threshold
    }

    /// Install the global rayon thread pool with the configured number of threads.
    ///
    /// Call once at application startup, before any batch is resolved.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the thread pool was successfully configured
    /// - `Ok(false)` if `max_threads` is None (no configuration needed)
    /// - `Err` if the thread pool has already been initialized
    pub fn install_global_thread_pool(&self) -> Result<bool, rayon::ThreadPoolBuildError> {
        if let Some(num_threads) = self.max_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn default_page_threshold() -> usize {
        4
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            max_threads: None,
            page_threshold: Self::default_page_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parallelize_above_threshold() {
        let policy = ParallelPolicy::new().with_page_threshold(2);
        assert!(!policy.should_parallelize(2));
        assert!(policy.should_parallelize(3));
    }

    #[test]
    fn test_default_policy_leaves_thread_pool_alone() {
        assert!(!ParallelPolicy::default().install_global_thread_pool().unwrap());
    }

    #[test]
    fn test_deserialize_uses_defaults() {
        let policy: ParallelPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(policy, ParallelPolicy::default());
    }
}
