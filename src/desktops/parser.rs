//! # Desktop-state line parser.
//!
//! Turns one line from the window manager into the rendered desktop fragment.
//!
//! ## Line shape
//! ```text
//! 0:0:0:1:0 1:2:0:0:0 2:0:0:0:1 fail
//! └───────── desktop tokens ──────┘ └── sentinel (never matches the grammar)
//! ```
//!
//! ## Rules
//! - Tokens are separated by spaces; runs of spaces and the line terminator are ignored.
//! - Desktop entries are rendered in token order, each with the [`DesktopTheme`] template.
//! - The active desktop (current, on the focused monitor) picks the layout; the last one wins.
//! - The first non-matching token ends the line and must be the last token.
//! - The layout name is appended once, after the sentinel, if any desktop was active.
//! - Output is bounded by the target buffer; truncation is silent.
//! - Any error leaves the caller to discard the partial output.

use crate::buffer::LineBuffer;
use crate::config::{Config, DesktopTheme, Grammar};
use crate::desktops::Desktop;
use crate::error::ParseError;

/// Renders desktop-state lines with a fixed grammar, name tables and theme.
#[derive(Clone, Debug)]
pub struct DesktopParser {
    grammar: Grammar,
    names: Vec<String>,
    layouts: Vec<String>,
    theme: DesktopTheme,
}

impl DesktopParser {
    /// Builds a parser from the desktop-related parts of `cfg`.
    pub fn new(cfg: &Config) -> Self {
        Self::with_tables(
            cfg.grammar,
            cfg.desktop_names.clone(),
            cfg.layout_names.clone(),
            cfg.desktop_theme.clone(),
        )
    }

    pub fn with_tables(
        grammar: Grammar,
        names: Vec<String>,
        layouts: Vec<String>,
        theme: DesktopTheme,
    ) -> Self {
        Self {
            grammar,
            names,
            layouts,
            theme,
        }
    }

    #[inline]
    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    /// Renders `line` into `out`.
    ///
    /// On error `out` holds a partial rendering and must be discarded.
    pub fn render(&self, line: &str, out: &mut LineBuffer) -> Result<(), ParseError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let mut tokens = line.split(' ').filter(|t| !t.is_empty()).enumerate().peekable();
        let mut layout: Option<u32> = None;

        while let Some((position, token)) = tokens.next() {
            let Some(desktop) = self.grammar.parse(token) else {
                if tokens.peek().is_some() {
                    return Err(ParseError::MalformedToken {
                        position,
                        token: token.to_string(),
                    });
                }
                if let Some(mode) = layout {
                    self.render_layout(mode, out)?;
                }
                return Ok(());
            };

            if desktop.is_active() {
                layout = Some(desktop.mode);
            }
            self.render_desktop(&desktop, out)?;
        }

        Err(ParseError::MissingSentinel)
    }

    fn render_desktop(&self, d: &Desktop, out: &mut LineBuffer) -> Result<usize, ParseError> {
        let name = self
            .names
            .get(d.id as usize)
            .ok_or(ParseError::UnknownDesktop {
                id: d.id,
                known: self.names.len(),
            })?;

        let t = &self.theme;
        let state = if d.is_active() {
            t.current.as_str()
        } else if d.is_unfocused() {
            t.unfocused.as_str()
        } else {
            ""
        };
        let urgent = if d.urgent { t.urgent.as_str() } else { "" };
        let empty = if d.windows == 0 {
            t.window_zero.as_str()
        } else {
            ""
        };

        Ok(out.push_fmt(format_args!(
            "{state}{urgent}{}{name}{empty}{}{}{}{}",
            t.desktop.prefix, t.window.prefix, d.windows, t.window.suffix, t.desktop.suffix,
        )))
    }

    fn render_layout(&self, mode: u32, out: &mut LineBuffer) -> Result<usize, ParseError> {
        let name = self
            .layouts
            .get(mode as usize)
            .ok_or(ParseError::UnknownLayout {
                mode,
                known: self.layouts.len(),
            })?;
        let affix = &self.theme.layout;
        Ok(out.push_fmt(format_args!("{}{name}{}", affix.prefix, affix.suffix)))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Affix;

    pub(crate) fn plain_theme() -> DesktopTheme {
        DesktopTheme {
            current: "*".into(),
            unfocused: "~".into(),
            urgent: "!".into(),
            desktop: Affix::new("<", ">"),
            window: Affix::new("(", ")"),
            window_zero: "_".into(),
            layout: Affix::new("[", "]"),
        }
    }

    pub(crate) fn parser(grammar: Grammar) -> DesktopParser {
        DesktopParser::with_tables(
            grammar,
            vec!["a".into(), "b".into(), "c".into()],
            vec!["tile".into(), "monocle".into()],
            plain_theme(),
        )
    }

    fn render(p: &DesktopParser, line: &str) -> Result<String, ParseError> {
        let mut out = LineBuffer::new(256);
        p.render(line, &mut out)?;
        Ok(String::from_utf8(out.as_bytes().to_vec()).unwrap())
    }

    #[test]
    fn test_single_monitor_line() {
        let p = parser(Grammar::SingleMonitor);
        let got = render(&p, "0:0:0:1:0 1:2:0:0:0 2:0:0:0:1 fail").unwrap();
        assert_eq!(got, "*<a_(0)><b(2)>!<c_(0)>[tile]");
    }

    #[test]
    fn test_trailing_newline_and_repeated_spaces_are_ignored() {
        let p = parser(Grammar::SingleMonitor);
        let got = render(&p, "0:1:1:1:0  1:0:0:0:0 end\n").unwrap();
        assert_eq!(got, "*<a(1)><b_(0)>[monocle]");
    }

    #[test]
    fn test_layout_omitted_without_current_desktop() {
        let p = parser(Grammar::SingleMonitor);
        let got = render(&p, "0:1:1:0:0 1:0:0:0:0 x").unwrap();
        assert_eq!(got, "<a(1)><b_(0)>");
    }

    #[test]
    fn test_last_active_desktop_picks_layout() {
        let p = parser(Grammar::SingleMonitor);
        let got = render(&p, "0:1:0:1:0 1:1:1:1:0 x").unwrap();
        assert!(got.ends_with("[monocle]"), "{got}");
    }

    #[test]
    fn test_sentinel_only_renders_nothing() {
        let p = parser(Grammar::SingleMonitor);
        assert_eq!(render(&p, "fail").unwrap(), "");
    }

    #[test]
    fn test_multi_monitor_line() {
        let p = parser(Grammar::MultiMonitor);
        let line = "0:1:0:1:1:1:0 0:1:1:0:0:0:0 1:0:2:3:0:1:0 x";
        let got = render(&p, line).unwrap();
        assert_eq!(got, "*<a(1)><b_(0)>~<c(3)>[monocle]");
    }

    #[test]
    fn test_unfocused_monitor_does_not_pick_layout() {
        let p = parser(Grammar::MultiMonitor);
        let got = render(&p, "1:0:2:3:1:1:0 x").unwrap();
        assert_eq!(got, "~<c(3)>");
    }

    #[test]
    fn test_malformed_token_before_the_end_is_rejected() {
        let p = parser(Grammar::SingleMonitor);
        let err = render(&p, "0:0:0:1:0 oops 1:2:0:0:0 fail").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedToken {
                position: 1,
                token: "oops".into()
            }
        );
    }

    #[test]
    fn test_missing_sentinel_is_rejected() {
        let p = parser(Grammar::SingleMonitor);
        assert_eq!(
            render(&p, "0:0:0:1:0 1:2:0:0:0\n").unwrap_err(),
            ParseError::MissingSentinel
        );
        assert_eq!(render(&p, "").unwrap_err(), ParseError::MissingSentinel);
    }

    #[test]
    fn test_out_of_range_desktop_id_is_an_error() {
        let p = parser(Grammar::SingleMonitor);
        assert_eq!(
            render(&p, "3:0:0:0:0 fail").unwrap_err(),
            ParseError::UnknownDesktop { id: 3, known: 3 }
        );
    }

    #[test]
    fn test_out_of_range_layout_is_an_error() {
        let p = parser(Grammar::SingleMonitor);
        assert_eq!(
            render(&p, "0:0:2:1:0 fail").unwrap_err(),
            ParseError::UnknownLayout { mode: 2, known: 2 }
        );
    }

    #[test]
    fn test_output_is_bounded_by_the_buffer() {
        let p = parser(Grammar::SingleMonitor);
        let mut out = LineBuffer::new(10);
        p.render("0:0:0:1:0 1:2:0:0:0 2:0:0:0:1 fail", &mut out)
            .unwrap();
        assert_eq!(out.as_bytes(), b"*<a_(0)><b");
    }
}
