//! # CPU frequency provider.
//!
//! Reads the first nonzero `cpu MHz` line of a cpuinfo-style file and renders
//! `CPU: {mhz / 1024:.6} mhz`.
//!
//! The value is already in MHz; the extra division by 1024 is kept so the
//! rendered figure stays identical to what existing bar setups expect.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::buffer::LineBuffer;
use crate::config::Affix;
use crate::error::ProviderError;
use crate::providers::provider::decorated;
use crate::providers::{Provider, RenderContext};

/// First nonzero `cpu MHz` reading of cpuinfo text.
pub fn parse_mhz(text: &str) -> Result<f64, ProviderError> {
    text.lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key.trim() == "cpu MHz").then(|| value.trim().parse::<f64>().ok())?
        })
        .find(|mhz| *mhz != 0.0)
        .ok_or(ProviderError::Unavailable { what: "cpu MHz" })
}

/// CPU frequency provider.
#[derive(Clone, Debug)]
pub struct Cpu {
    path: PathBuf,
    affix: Affix,
}

impl Cpu {
    pub fn new(path: impl Into<PathBuf>, affix: Affix) -> Self {
        Self {
            path: path.into(),
            affix,
        }
    }

    async fn sample(&self) -> Result<f64, ProviderError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_mhz(&text)
    }
}

#[async_trait]
impl Provider for Cpu {
    fn name(&self) -> &str {
        "cpu"
    }

    async fn render(&self, _ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize {
        let Ok(mhz) = self.sample().await else {
            return 0;
        };
        decorated(out, &self.affix, format_args!("CPU: {:.6} mhz", mhz / 1024.0))
    }
}
