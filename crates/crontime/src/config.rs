//! Forward-search limits for the chunked day walk.

use serde::{Deserialize, Serialize};

use crate::error::{CronTimeError, Result};

/// Bounds for [`Schedule::future_open_instant`](crate::Schedule::future_open_instant)
/// and [`Schedule::next_open_days`](crate::Schedule::next_open_days).
///
/// Each chunk walks `chunk_days + 1` days inclusive; the next chunk starts
/// `stride_days` after the previous start. Searches give up after
/// `max_chunks` chunks, so schedules that never reopen still terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub chunk_days: u32,
    pub stride_days: u32,
    pub max_chunks: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            chunk_days: 7,
            stride_days: 8,
            max_chunks: 1000,
        }
    }
}

impl SearchLimits {
    /// Load limits from JSON; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns `CronTimeError::InvalidArgument` on malformed JSON or invalid limits.
    pub fn from_json(json: &str) -> Result<Self> {
        let limits: SearchLimits = serde_json::from_str(json)
            .map_err(|e| CronTimeError::invalid(format!("invalid search limits: {}", e)))?;
        limits.validate()?;
        Ok(limits)
    }

    /// Reject limits that would make a search walk nothing or stand still.
    pub fn validate(&self) -> Result<()> {
        if self.max_chunks == 0 {
            return Err(CronTimeError::invalid("max_chunks must be at least 1"));
        }
        if self.stride_days == 0 {
            return Err(CronTimeError::invalid("stride_days must be at least 1"));
        }
        Ok(())
    }
}
