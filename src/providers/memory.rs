//! # Memory provider.
//!
//! Reads `MemTotal` and `MemFree` (kB) from a meminfo-style file and renders
//! `Mem: {free} Mb of {total} Mb`, both figures divided by 1024 (integer).
//! Nothing is rendered unless both fields are present and nonzero.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::buffer::LineBuffer;
use crate::config::Affix;
use crate::error::ProviderError;
use crate::providers::provider::decorated;
use crate::providers::{Provider, RenderContext};

/// Memory figures in kB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemInfo {
    pub total_kb: u64,
    pub free_kb: u64,
}

impl MemInfo {
    /// Extracts `MemTotal` / `MemFree` from meminfo text.
    pub fn parse(text: &str) -> Result<Self, ProviderError> {
        let mut total = 0;
        let mut free = 0;
        for line in text.lines() {
            if total != 0 && free != 0 {
                break;
            }
            if let Some(v) = field(line, "MemTotal:") {
                total = v;
            } else if let Some(v) = field(line, "MemFree:") {
                free = v;
            }
        }
        if total == 0 || free == 0 {
            return Err(ProviderError::Unavailable {
                what: "MemTotal/MemFree",
            });
        }
        Ok(Self {
            total_kb: total,
            free_kb: free,
        })
    }
}

/// Value of a `Key:   1234 kB` line.
fn field(line: &str, key: &str) -> Option<u64> {
    line.strip_prefix(key)?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

/// Memory usage provider.
#[derive(Clone, Debug)]
pub struct Memory {
    path: PathBuf,
    affix: Affix,
}

impl Memory {
    pub fn new(path: impl Into<PathBuf>, affix: Affix) -> Self {
        Self {
            path: path.into(),
            affix,
        }
    }

    async fn sample(&self) -> Result<MemInfo, ProviderError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        MemInfo::parse(&text)
    }
}

#[async_trait]
impl Provider for Memory {
    fn name(&self) -> &str {
        "memory"
    }

    async fn render(&self, _ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize {
        let Ok(m) = self.sample().await else {
            return 0;
        };
        decorated(
            out,
            &self.affix,
            format_args!("Mem: {} Mb of {} Mb", m.free_kb / 1024, m.total_kb / 1024),
        )
    }
}
