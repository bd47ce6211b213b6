//! # Volume provider.
//!
//! Renders the playback volume as an integer percentage: `volume * 100 / max`
//! while the playback switch is on, `0%` while it is off (muted).
//!
//! ## Mixer collaborator
//! The [`Mixer`] trait is the boundary. [`Amixer`] implements it by running
//! `amixer get <element>` and reading:
//!
//! ```text
//! Simple mixer control 'Master',0
//!   Limits: Playback 0 - 87                       ← range (min, max)
//!   Mono: Playback 48 [55%] [-29.25dB] [on]       ← first channel: value, switch
//! ```
//!
//! An element without a playback switch reads as muted.

use async_trait::async_trait;
use tokio::process::Command;

use crate::buffer::LineBuffer;
use crate::config::{Affix, MixerConfig};
use crate::error::ProviderError;
use crate::providers::provider::decorated;
use crate::providers::{Provider, RenderContext};

/// One mixer sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MixerReading {
    pub volume: i64,
    pub min: i64,
    pub max: i64,
    pub muted: bool,
}

impl MixerReading {
    /// Combines the volume element's controls with the playback switch of the
    /// mute element.
    ///
    /// The switch is "on" while audible, so `muted` is its negation; an element
    /// without a switch reads as muted.
    pub fn from_controls(volume: &Controls, switch: Option<bool>) -> Result<Self, ProviderError> {
        let (min, max) = volume.range.ok_or(ProviderError::Unavailable {
            what: "playback range",
        })?;
        let value = volume.value.ok_or(ProviderError::Unavailable {
            what: "playback volume",
        })?;
        Ok(Self {
            volume: value,
            min,
            max,
            muted: !switch.unwrap_or(false),
        })
    }

    /// Integer percentage, `0` when muted, `None` when the range is unusable.
    pub fn percent(&self) -> Option<i64> {
        if self.max == 0 {
            return None;
        }
        Some(if self.muted {
            0
        } else {
            self.volume * 100 / self.max
        })
    }
}

/// Source of mixer readings.
#[async_trait]
pub trait Mixer: Send + Sync + 'static {
    async fn read(&self) -> Result<MixerReading, ProviderError>;
}

/// Controls of one `amixer get` dump.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub range: Option<(i64, i64)>,
    pub value: Option<i64>,
    pub switch: Option<bool>,
}

impl Controls {
    /// Parses the output of `amixer get <element>`.
    pub fn parse(text: &str) -> Self {
        let mut controls = Controls::default();
        for line in text.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("Limits:") {
                let rest = rest.trim();
                let rest = rest.strip_prefix("Playback").unwrap_or(rest);
                if let Some((lo, hi)) = rest.split_once('-') {
                    if let (Ok(lo), Ok(hi)) = (lo.trim().parse(), hi.trim().parse()) {
                        controls.range = Some((lo, hi));
                    }
                }
            } else if controls.value.is_none() && controls.switch.is_none() {
                let Some((_, rest)) = line.split_once(": Playback ") else {
                    continue;
                };
                controls.value = rest
                    .split_whitespace()
                    .next()
                    .and_then(|v| v.parse().ok());
                controls.switch = if rest.contains("[on]") {
                    Some(true)
                } else if rest.contains("[off]") {
                    Some(false)
                } else {
                    None
                };
            }
        }
        controls
    }
}

/// [`Mixer`] backed by the `amixer` command line tool.
#[derive(Clone, Debug)]
pub struct Amixer {
    cfg: MixerConfig,
}

impl Amixer {
    pub fn new(cfg: MixerConfig) -> Self {
        Self { cfg }
    }

    async fn get(element: &str) -> Result<Controls, ProviderError> {
        let out = Command::new("amixer")
            .arg("get")
            .arg(element)
            .kill_on_drop(true)
            .output()
            .await?;
        if !out.status.success() {
            return Err(ProviderError::Protocol {
                detail: format!("amixer get {element}: {}", out.status),
            });
        }
        Ok(Controls::parse(&String::from_utf8_lossy(&out.stdout)))
    }
}

#[async_trait]
impl Mixer for Amixer {
    async fn read(&self) -> Result<MixerReading, ProviderError> {
        let volume = Self::get(&self.cfg.volume_element).await?;
        let switch = if self.cfg.mute_element == self.cfg.volume_element {
            volume.switch
        } else {
            Self::get(&self.cfg.mute_element).await?.switch
        };
        MixerReading::from_controls(&volume, switch)
    }
}

/// Volume provider over any [`Mixer`].
#[derive(Clone, Debug)]
pub struct Volume<M = Amixer> {
    mixer: M,
    affix: Affix,
}

impl<M: Mixer> Volume<M> {
    pub fn new(mixer: M, affix: Affix) -> Self {
        Self { mixer, affix }
    }
}

#[async_trait]
impl<M: Mixer> Provider for Volume<M> {
    fn name(&self) -> &str {
        "volume"
    }

    async fn render(&self, _ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize {
        let Some(pct) = self.mixer.read().await.ok().and_then(|r| r.percent()) else {
            return 0;
        };
        decorated(out, &self.affix, format_args!("{pct}%"))
    }
}
