/*!
 * Memory Sampling
 * Point-in-time estimates of process memory usage
 *
 * Readings race with concurrent allocation, so a sample is an estimate,
 * not a snapshot. `heap_used <= heap_total` holds
 * only on a best-effort basis and is never asserted.
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Memory sampler result
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Memory sampler errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplerError {
    #[error("Memory statistics unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed memory statistics: {0}")]
    Malformed(String),
}

/// Memory usage reading in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySample {
    /// Resident set size
    pub rss: u64,
    pub heap_total: u64,
    pub heap_used: u64,
    /// Memory held outside the heap; not tracked, always 0
    pub external: u64,
}

impl MemorySample {
    pub fn new(rss: u64, heap_total: u64, heap_used: u64) -> Self {
        Self {
            rss,
            heap_total,
            heap_used,
            external: 0,
        }
    }

    /// Whether `heap_used <= heap_total` held at sampling time
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.heap_used <= self.heap_total
    }
}

/// Source of memory usage readings
pub trait MemorySampler: Send + Sync {
    /// Read current usage
    fn try_sample(&self) -> SamplerResult<MemorySample>;

    /// Read current usage, falling back to a zero sample when unavailable
    fn sample(&self) -> MemorySample {
        match self.try_sample() {
            Ok(sample) => {
                if !sample.is_consistent() {
                    debug!(
                        heap_used = sample.heap_used,
                        heap_total = sample.heap_total,
                        "Memory sample reports heap_used above heap_total"
                    );
                }
                sample
            }
            Err(e) => {
                warn!(error = %e, "Memory sampling failed, reporting zero usage");
                MemorySample::default()
            }
        }
    }
}

/// Sampler reading the OS view of this process
#[derive(Debug, Clone, Copy, Default)]
pub struct OsMemorySampler;

impl OsMemorySampler {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "linux")]
impl MemorySampler for OsMemorySampler {
    fn try_sample(&self) -> SamplerResult<MemorySample> {
        let statm = std::fs::read_to_string("/proc/self/statm")
            .map_err(|e| SamplerError::Unavailable(e.to_string()))?;
        parse_statm(&statm, page_size())
    }
}

#[cfg(not(target_os = "linux"))]
impl MemorySampler for OsMemorySampler {
    fn try_sample(&self) -> SamplerResult<MemorySample> {
        debug!("No memory statistics source on this platform");
        Ok(MemorySample::default())
    }
}

#[cfg(target_os = "linux")]
fn page_size() -> u64 {
    use nix::unistd::{sysconf, SysconfVar};

    match sysconf(SysconfVar::PAGE_SIZE) {
        Ok(Some(size)) if size > 0 => size as u64,
        _ => 4096,
    }
}

/// Parse `/proc/self/statm`: `size resident shared text lib data dt`, in pages
///
/// rss = resident, heap_total = size, heap_used = data.
pub fn parse_statm(contents: &str, page_size: u64) -> SamplerResult<MemorySample> {
    let fields = contents
        .split_whitespace()
        .map(|field| {
            field
                .parse::<u64>()
                .map_err(|e| SamplerError::Malformed(format!("{}: {}", field, e)))
        })
        .collect::<SamplerResult<Vec<u64>>>()?;

    if fields.len() < 7 {
        return Err(SamplerError::Malformed(format!(
            "expected 7 fields, found {}",
            fields.len()
        )));
    }

    let (size, resident, data) = (fields[0], fields[1], fields[5]);
    Ok(MemorySample::new(
        resident.saturating_mul(page_size),
        size.saturating_mul(page_size),
        data.saturating_mul(page_size),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statm() {
        let sample = parse_statm("1000 200 50 10 0 300 0\n", 4096).unwrap();
        assert_eq!(sample.rss, 200 * 4096);
        assert_eq!(sample.heap_total, 1000 * 4096);
        assert_eq!(sample.heap_used, 300 * 4096);
        assert_eq!(sample.external, 0);
        assert!(sample.is_consistent());
    }

    #[test]
    fn test_parse_statm_rejects_short_input() {
        assert!(matches!(
            parse_statm("1 2 3", 4096),
            Err(SamplerError::Malformed(_))
        ));
        assert!(matches!(
            parse_statm("1 2 x 4 5 6 7", 4096),
            Err(SamplerError::Malformed(_))
        ));
    }

    #[test]
    fn test_inconsistent_sample_is_tolerated() {
        let sample = MemorySample::new(10, 5, 8);
        assert!(!sample.is_consistent());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_os_sampler_reads_nonzero_rss() {
        let sample = OsMemorySampler::new().sample();
        assert!(sample.rss > 0);
        assert!(sample.heap_total > 0);
    }
}
