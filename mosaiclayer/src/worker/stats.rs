//! Reprojection instrumentation.

use std::fmt;
use std::time::Duration;

use crate::cache::CacheStats;

/// Counters and timings for one `reproject` call.
///
/// Returned alongside the bitmap rather than accumulated in shared state.
#[derive(Debug, Clone, Default)]
pub struct ReprojectStats {
    /// Worker that produced these stats.
    pub worker: usize,
    /// Images whose unprojected rectangle overlapped the request.
    pub candidates: usize,
    /// Candidates that loaded and were reprojected.
    pub drawn: usize,
    /// Candidates skipped because their load failed.
    pub load_failures: usize,
    /// Destination pixels written (counted once per writing image).
    pub pixels_written: u64,
    /// Time spent in cache lookups and fetches.
    pub load_time: Duration,
    /// Time spent in the per-pixel loop.
    pub reproject_time: Duration,
    /// Cache state after the call.
    pub cache: CacheStats,
}

impl ReprojectStats {
    pub fn total_time(&self) -> Duration {
        self.load_time + self.reproject_time
    }
}

impl fmt::Display for ReprojectStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "worker {}: {}/{} images drawn ({} failed), load {:?}, reproject {:?}",
            self.worker,
            self.drawn,
            self.candidates,
            self.load_failures,
            self.load_time,
            self.reproject_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_time() {
        let stats = ReprojectStats {
            load_time: Duration::from_millis(10),
            reproject_time: Duration::from_millis(5),
            ..Default::default()
        };
        assert_eq!(stats.total_time(), Duration::from_millis(15));
    }
}
