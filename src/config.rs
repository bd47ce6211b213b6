//! # Feed configuration.
//!
//! Provides [`Config`], the single settings bundle of the status feed.
//! It is built at compile time (`Config::default()` plus whatever the binary
//! overrides) and is not reloaded at runtime.
//!
//! Config is used in three places:
//! 1. **Provider list**: [`providers::from_config`](crate::providers::from_config) turns
//!    [`Config::slots`] into the ordered provider sequence.
//! 2. **Desktop parser**: [`DesktopParser::new`](crate::DesktopParser::new) takes the
//!    grammar, name tables and [`DesktopTheme`].
//! 3. **Cycle driver**: [`Bar`](crate::Bar) reads capacities and the wait timeout.
//!
//! ## Sentinel values
//! - `timeout = 0s` → clamped to 1ms (the loop never spins without waiting)
//! - `line_capacity = 0` → clamped to 1 (room for the terminator)
//! - `bus_capacity = 0` → clamped to 1 by the bus
//!
//! ## Example
//! ```
//! use std::time::Duration;
//! use statusfeed::{Config, Slot};
//!
//! let mut cfg = Config::default();
//! cfg.timeout = Duration::from_millis(500);
//! cfg.slots = vec![Slot::Desktops, Slot::AlignRight, Slot::Clock];
//!
//! assert_eq!(cfg.wait_timeout(), Duration::from_millis(500));
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Default capacity of one status line, terminator included.
pub const DEFAULT_LINE_CAPACITY: usize = 8192;

/// Prefix/suffix pair wrapped around a fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Affix {
    pub prefix: String,
    pub suffix: String,
}

impl Affix {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

/// Decoration strings of the line-level providers.
///
/// The defaults speak lemonbar markup (`%{l}`, `%{F#rrggbb}`, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decorations {
    /// Left alignment marker.
    pub left: String,
    /// Center alignment marker.
    pub center: String,
    /// Right alignment marker.
    pub right: String,
    /// Full separator text (prefix, glyph and suffix in one).
    pub separator: String,
    pub memory: Affix,
    pub cpu: Affix,
    pub volume: Affix,
    pub clock: Affix,
    /// Wraps the whole music fragment (song or stopped text).
    pub music: Affix,
    pub title: Affix,
    pub artist: Affix,
    /// Shown (inside `music`) when the player has no current song.
    pub stopped: String,
    /// Wraps the desktop store contents.
    pub desktops: Affix,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            left: "%{l}".into(),
            center: "%{c}".into(),
            right: "%{r}".into(),
            separator: " %{F#555555}|%{F-} ".into(),
            memory: Affix::new("", ""),
            cpu: Affix::new("", ""),
            volume: Affix::new("Vol: ", ""),
            clock: Affix::new("", " "),
            music: Affix::new("", ""),
            title: Affix::new("%{F#e0e0e0}", "%{F-}"),
            artist: Affix::new(" by %{F#a0a0a0}", "%{F-}"),
            stopped: "stopped".into(),
            desktops: Affix::new("", ""),
        }
    }
}

/// Markers used when rendering one desktop entry.
///
/// Entry template:
/// ```text
/// [current | unfocused] [urgent] desktop.prefix NAME [window_zero] window.prefix COUNT window.suffix desktop.suffix
/// ```
/// followed, once per line, by `layout.prefix LAYOUT layout.suffix`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesktopTheme {
    /// Current desktop on the focused monitor.
    pub current: String,
    /// Current desktop of a monitor that is not focused (multi-monitor only).
    pub unfocused: String,
    pub urgent: String,
    pub desktop: Affix,
    pub window: Affix,
    /// Inserted after the name when the desktop holds no window.
    pub window_zero: String,
    pub layout: Affix,
}

impl Default for DesktopTheme {
    fn default() -> Self {
        Self {
            current: "%{+u}%{F#ffffff}".into(),
            unfocused: "%{F#8a8a8a}".into(),
            urgent: "%{B#802020}".into(),
            desktop: Affix::new(" ", " %{B-}%{F-}%{-u}"),
            window: Affix::new(" ", ""),
            window_zero: "%{F#606060}".into(),
            layout: Affix::new(" [", "]"),
        }
    }
}

/// Token grammar spoken by the window manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grammar {
    /// `desktop:windows:mode:current:urgent`
    SingleMonitor,
    /// `monitor:monitor_current:desktop:windows:mode:current:urgent`
    MultiMonitor,
}

impl Grammar {
    /// Number of colon-separated fields of one token.
    #[inline]
    pub fn field_count(self) -> usize {
        match self {
            Grammar::SingleMonitor => 5,
            Grammar::MultiMonitor => 7,
        }
    }
}

impl Default for Grammar {
    /// `MultiMonitor` when built with the `multi-monitor` feature, `SingleMonitor` otherwise.
    fn default() -> Self {
        if cfg!(feature = "multi-monitor") {
            Grammar::MultiMonitor
        } else {
            Grammar::SingleMonitor
        }
    }
}

/// One position of the status line. The order of [`Config::slots`] is the visual order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    AlignLeft,
    AlignCenter,
    AlignRight,
    Separator,
    Memory,
    Cpu,
    Music,
    Volume,
    Clock,
    Desktops,
}

/// Mixer element names queried by the volume provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixerConfig {
    /// Element carrying the playback volume.
    pub volume_element: String,
    /// Element carrying the playback switch.
    pub mute_element: String,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            volume_element: "Master".into(),
            mute_element: "Master".into(),
        }
    }
}

/// Settings of the status feed.
///
/// ## Field semantics
/// - `line_capacity`: bytes per emitted line, `\n` included
/// - `store_capacity`: bytes of rendered desktop state kept between cycles
/// - `input_capacity`: longest accepted desktop-state line, terminator excluded
/// - `timeout`: how long one cycle waits for desktop-state input
/// - `bus_capacity`: event bus ring buffer size
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of one status line, terminator included.
    pub line_capacity: usize,

    /// Capacity of the desktop state store.
    pub store_capacity: usize,

    /// Longest desktop-state input line; longer lines are discarded and rejected.
    pub input_capacity: usize,

    /// Wait timeout per cycle. A line is emitted at least this often.
    pub timeout: Duration,

    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,

    /// Ordered provider slots.
    pub slots: Vec<Slot>,

    /// Token grammar of the desktop-state input.
    pub grammar: Grammar,

    /// Desktop display names, indexed by desktop identifier.
    pub desktop_names: Vec<String>,

    /// Layout names, indexed by mode code.
    pub layout_names: Vec<String>,

    pub decorations: Decorations,

    pub desktop_theme: DesktopTheme,

    /// Memory statistics source.
    pub meminfo: PathBuf,

    /// CPU information source.
    pub cpuinfo: PathBuf,

    pub mixer: MixerConfig,

    /// Per-step timeout when talking to the music daemon.
    pub music_timeout: Duration,

    /// strftime-style clock format.
    pub clock_format: String,
}

impl Config {
    /// Wait timeout, clamped to at least 1ms.
    #[inline]
    pub fn wait_timeout(&self) -> Duration {
        self.timeout.max(Duration::from_millis(1))
    }

    /// Line capacity, clamped to at least 1 byte (the terminator).
    #[inline]
    pub fn line_capacity_clamped(&self) -> usize {
        self.line_capacity.max(1)
    }

    /// Bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `line_capacity = 8192`, `store_capacity = input_capacity = 8192 / 3`
    /// - `timeout = 1s`
    /// - `bus_capacity = 256`
    /// - desktops left, music centered, system figures and clock right
    /// - `/proc/meminfo`, `/proc/cpuinfo`, mixer element `Master`
    /// - `music_timeout = 1s`
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            line_capacity: DEFAULT_LINE_CAPACITY,
            store_capacity: DEFAULT_LINE_CAPACITY / 3,
            input_capacity: DEFAULT_LINE_CAPACITY / 3,
            timeout: Duration::from_secs(1),
            bus_capacity: 256,
            slots: vec![
                Slot::AlignLeft,
                Slot::Desktops,
                Slot::AlignCenter,
                Slot::Music,
                Slot::AlignRight,
                Slot::Memory,
                Slot::Separator,
                Slot::Cpu,
                Slot::Separator,
                Slot::Volume,
                Slot::Separator,
                Slot::Clock,
            ],
            grammar: Grammar::default(),
            desktop_names: names(&["web", "term", "code", "chat", "media"]),
            layout_names: names(&["tile", "monocle", "bstack", "grid", "float"]),
            decorations: Decorations::default(),
            desktop_theme: DesktopTheme::default(),
            meminfo: PathBuf::from("/proc/meminfo"),
            cpuinfo: PathBuf::from("/proc/cpuinfo"),
            mixer: MixerConfig::default(),
            music_timeout: Duration::from_millis(1000),
            clock_format: "%a %d %b %H:%M".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_clamped() {
        let mut cfg = Config::default();
        cfg.timeout = Duration::ZERO;
        cfg.line_capacity = 0;
        cfg.bus_capacity = 0;

        assert_eq!(cfg.wait_timeout(), Duration::from_millis(1));
        assert_eq!(cfg.line_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn test_grammar_field_counts() {
        assert_eq!(Grammar::SingleMonitor.field_count(), 5);
        assert_eq!(Grammar::MultiMonitor.field_count(), 7);
    }

    #[test]
    fn test_default_store_is_a_third_of_the_line() {
        let cfg = Config::default();
        assert_eq!(cfg.store_capacity, 2730);
        assert_eq!(cfg.input_capacity, 2730);
        assert!(cfg.slots.contains(&Slot::Desktops));
    }
}
