//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to **stderr**
//! (stdout carries the status lines).
//!
//! ## Example output
//! ```text
//! [desktops-updated] bytes=118
//! [desktops-rejected] reason="parse_unknown_desktop: desktop id 9 out of range (have 5 names)"
//! [provider-silent] provider="music"
//! [provider-recovered] provider="music" bytes=42
//! [line-saturated] skipped=3
//! [input-closed]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders one event as a log line, without the trailing newline.
    pub fn format(e: &Event) -> String {
        let source = e.source.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::DesktopsUpdated => {
                format!("[desktops-updated] bytes={}", e.bytes.unwrap_or(0))
            }
            EventKind::DesktopsRejected => format!("[desktops-rejected] reason={reason:?}"),
            EventKind::InputClosed => "[input-closed]".to_string(),
            EventKind::ProviderSilent => format!("[provider-silent] provider={source:?}"),
            EventKind::ProviderRecovered => format!(
                "[provider-recovered] provider={source:?} bytes={}",
                e.bytes.unwrap_or(0)
            ),
            EventKind::LineSaturated => {
                format!("[line-saturated] skipped={}", e.skipped.unwrap_or(0))
            }
            EventKind::SubscriberOverflow => {
                format!("[subscriber-overflow] subscriber={source} reason={reason}")
            }
            EventKind::SubscriberPanicked => {
                format!("[subscriber-panicked] subscriber={source} info={reason}")
            }
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        eprintln!("{}", Self::format(e));
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
