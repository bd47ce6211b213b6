//! # Desktop token grammar.
//!
//! One token describes one desktop as colon-separated unsigned integers:
//!
//! ```text
//! single monitor:  desktop:windows:mode:current:urgent
//! multi monitor:   monitor:monitor_current:desktop:windows:mode:current:urgent
//! ```
//!
//! A token matches only with the exact field count and every field a valid
//! `u32`. Anything else is a non-match, which is how the window manager marks
//! the end of a line.

use crate::config::Grammar;

/// One desktop as reported by the window manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Desktop {
    /// Monitor identifier (always 0 for the single-monitor grammar).
    pub monitor: u32,
    /// Whether the monitor holds the input focus (always `true` for the single-monitor grammar).
    pub monitor_current: bool,
    /// Index into the desktop name table.
    pub id: u32,
    pub windows: u32,
    /// Index into the layout name table.
    pub mode: u32,
    /// Current desktop of its monitor.
    pub current: bool,
    pub urgent: bool,
}

impl Desktop {
    /// Current desktop of the focused monitor; decides the layout shown.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.current && self.monitor_current
    }

    /// Current desktop of a monitor without focus.
    #[inline]
    pub fn is_unfocused(&self) -> bool {
        self.current && !self.monitor_current
    }
}

impl Grammar {
    /// Decodes one token, `None` when it does not match.
    ///
    /// # Example
    /// ```
    /// use statusfeed::Grammar;
    ///
    /// let d = Grammar::SingleMonitor.parse("1:2:0:1:0").expect("match");
    /// assert_eq!((d.id, d.windows, d.current), (1, 2, true));
    /// assert!(Grammar::SingleMonitor.parse("fail").is_none());
    /// assert!(Grammar::MultiMonitor.parse("1:2:0:1:0").is_none());
    /// ```
    pub fn parse(self, token: &str) -> Option<Desktop> {
        match self {
            Grammar::SingleMonitor => {
                let [id, windows, mode, current, urgent] = fields::<5>(token)?;
                Some(Desktop {
                    monitor: 0,
                    monitor_current: true,
                    id,
                    windows,
                    mode,
                    current: current != 0,
                    urgent: urgent != 0,
                })
            }
            Grammar::MultiMonitor => {
                let [monitor, monitor_current, id, windows, mode, current, urgent] =
                    fields::<7>(token)?;
                Some(Desktop {
                    monitor,
                    monitor_current: monitor_current != 0,
                    id,
                    windows,
                    mode,
                    current: current != 0,
                    urgent: urgent != 0,
                })
            }
        }
    }
}

/// Splits `token` into exactly `N` unsigned fields.
fn fields<const N: usize>(token: &str) -> Option<[u32; N]> {
    let mut out = [0u32; N];
    let mut parts = token.split(':');
    for slot in out.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    parts.next().is_none().then_some(out)
}
