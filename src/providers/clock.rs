//! # Clock provider.
//!
//! Renders local time with a strftime-style format (`%a %d %b %H:%M`, ...).
//! An invalid format renders nothing.

use std::fmt::{self, Write as _};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};

use crate::buffer::LineBuffer;
use crate::config::Affix;
use crate::providers::provider::decorated;
use crate::providers::{Provider, RenderContext};

/// Formats `at` with `format`, `None` if the format is invalid.
pub fn format_time<Tz>(format: &str, at: &DateTime<Tz>) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut text = String::new();
    write!(text, "{}", at.format(format)).ok()?;
    Some(text)
}

/// Wall clock provider.
#[derive(Clone, Debug)]
pub struct Clock {
    format: String,
    affix: Affix,
}

impl Clock {
    pub fn new(format: impl Into<String>, affix: Affix) -> Self {
        Self {
            format: format.into(),
            affix,
        }
    }
}

#[async_trait]
impl Provider for Clock {
    fn name(&self) -> &str {
        "clock"
    }

    async fn render(&self, _ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize {
        let Some(text) = format_time(&self.format, &Local::now()) else {
            return 0;
        };
        decorated(out, &self.affix, format_args!("{text}"))
    }
}
