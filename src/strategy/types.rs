use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::{ConfigResult, UploadConfigError};

pub const MIB: u64 = 1024 * 1024;

/// Transfer strategy chosen for a single file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Lone small file, sent as-is
    Direct,
    /// Small file sent in a bounded-concurrency cohort
    Batched,
    /// Large file sent whole, one at a time
    SerialLarge,
    /// Huge file split into ordered chunks
    Chunked,
}

impl Lane {
    pub fn is_small(&self) -> bool {
        matches!(self, Lane::Direct | Lane::Batched)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Direct => "direct",
            Lane::Batched => "batched",
            Lane::SerialLarge => "serial_large",
            Lane::Chunked => "chunked",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds and limits driving lane selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Files at or below this size go to the small lane
    pub small_threshold: u64,
    /// Files above this size are chunked
    pub huge_threshold: u64,
    /// Chunk size for the chunked lane
    pub chunk_size: u64,
    /// Maximum in-flight transfers in the small lane
    pub batch_concurrency: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            small_threshold: 50 * MIB,
            huge_threshold: 200 * MIB,
            chunk_size: 5 * MIB,
            batch_concurrency: 3,
        }
    }
}

impl UploadConfig {
    pub fn new(
        small_threshold: u64,
        huge_threshold: u64,
        chunk_size: u64,
        batch_concurrency: usize,
    ) -> Self {
        Self {
            small_threshold,
            huge_threshold,
            chunk_size,
            batch_concurrency,
        }
    }

    /// Parse a (possibly partial) JSON config, falling back to defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunk_size == 0 {
            return Err(UploadConfigError::ZeroChunkSize);
        }
        if self.batch_concurrency == 0 {
            return Err(UploadConfigError::ZeroConcurrency);
        }
        if self.small_threshold > self.huge_threshold {
            return Err(UploadConfigError::ThresholdOrder {
                small: self.small_threshold,
                huge: self.huge_threshold,
            });
        }
        Ok(())
    }
}

/// File indices grouped per lane, each in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanePlan {
    /// Small-lane files and the label they run under
    pub small: Vec<usize>,
    pub small_lane: Option<Lane>,
    /// SerialLarge and Chunked files interleaved in submission order
    pub large: Vec<(usize, Lane)>,
}

impl LanePlan {
    pub fn count(&self, lane: Lane) -> usize {
        match lane {
            Lane::Direct | Lane::Batched if self.small_lane == Some(lane) => self.small.len(),
            Lane::Direct | Lane::Batched => 0,
            _ => self.large.iter().filter(|(_, l)| *l == lane).count(),
        }
    }

    pub fn len(&self) -> usize {
        self.small.len() + self.large.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
