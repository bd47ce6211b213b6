//! # Bar: the cycle driver.
//!
//! [`Bar`] owns the desktop store, the parser, the [`Composer`] and the event
//! plumbing, and runs the feed loop:
//!
//! ```text
//! loop:
//!   wait ── line ready ──► DesktopStore::update ──► DesktopsUpdated | DesktopsRejected
//!     │ ── timeout ──────► (keep the stored state)
//!     │ ── end of input ─► InputClosed, later waits are plain sleeps
//!     ▼
//!   Composer::compose(RenderContext { &store })
//!     ▼
//!   write line + flush
//! ```
//!
//! Events take the same route as everywhere else in the crate:
//! `publish ──► Bus ──► listener (spawned in new) ──► SubscriberSet::emit`.
//!
//! ## Rules
//! - Parsing always finishes before composition in the same cycle.
//! - Bytes of an unfinished input line are kept across timeouts.
//! - Input lines longer than `Config::input_capacity` are discarded and rejected.
//! - A read error or a write error ends [`Bar::run`] with a [`RuntimeError`].
//! - Cancelling the token ends [`Bar::run`] with `Ok(())` at the next wait.
//!
//! ## Example
//! ```no_run
//! use tokio::io::BufReader;
//! use tokio_util::sync::CancellationToken;
//! use statusfeed::{Bar, Config};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), statusfeed::RuntimeError> {
//!     let mut bar = Bar::new(Config::default(), Vec::new());
//!     let stdin = BufReader::new(tokio::io::stdin());
//!     bar.run(stdin, tokio::io::stdout(), CancellationToken::new()).await
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::Composer;
use crate::core::input::{Line, LineReader};
use crate::desktops::{DesktopParser, DesktopStore};
use crate::error::{ParseError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::providers::{self, ProviderRef, RenderContext};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Outcome of one wait on the desktop-state input.
enum Wait {
    Line(Vec<u8>),
    Overlong(usize),
    Timeout,
    Closed,
}

/// Status feed driver.
pub struct Bar {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    parser: DesktopParser,
    store: DesktopStore,
    composer: Composer,
}

impl Bar {
    /// Creates a bar whose providers follow `cfg.slots`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(cfg: Config, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let providers = providers::from_config(&cfg);
        Self::with_providers(cfg, providers, subscribers)
    }

    /// Creates a bar with an explicit provider list; `cfg.slots` is ignored.
    pub fn with_providers(
        cfg: Config,
        providers: Vec<ProviderRef>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
        let composer = Composer::new(providers, cfg.line_capacity_clamped(), bus.clone());

        let bar = Self {
            parser: DesktopParser::new(&cfg),
            store: DesktopStore::new(cfg.store_capacity),
            composer,
            cfg,
            bus,
            subs,
        };
        bar.subscriber_listener();
        bar
    }

    /// Event bus shared by the driver, the composer and the subscriber workers.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Current rendered desktop fragment.
    pub fn desktops(&self) -> &DesktopStore {
        &self.store
    }

    /// Runs the feed until `token` is cancelled or input/output fails.
    pub async fn run<R, W>(
        &mut self,
        input: R,
        mut output: W,
        token: CancellationToken,
    ) -> Result<(), RuntimeError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let timeout = self.cfg.wait_timeout();
        let mut input = Some(LineReader::new(input, self.cfg.input_capacity));

        loop {
            let waited = tokio::select! {
                biased;
                _ = token.cancelled() => return Ok(()),
                res = wait(&mut input, timeout) => res?,
            };

            match waited {
                Wait::Line(line) => self.apply(&line),
                Wait::Overlong(len) => self.reject(ParseError::LineTooLong {
                    len,
                    limit: self.cfg.input_capacity,
                }),
                Wait::Closed => self.bus.publish(Event::new(EventKind::InputClosed)),
                Wait::Timeout => {}
            }

            let ctx = RenderContext::new(&self.store);
            let line = self.composer.compose(&ctx).await;
            output.write_all(line).await.map_err(RuntimeError::Output)?;
            output.flush().await.map_err(RuntimeError::Output)?;
        }
    }

    /// Feeds one input line to the store and reports the outcome.
    fn apply(&mut self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        match self.store.update(&self.parser, &line) {
            Ok(n) => self
                .bus
                .publish(Event::new(EventKind::DesktopsUpdated).with_bytes(n)),
            Err(e) => self.reject(e),
        }
    }

    fn reject(&self, err: ParseError) {
        self.bus
            .publish(Event::new(EventKind::DesktopsRejected).with_reason(err.as_message()));
    }

    /// Subscribes to the bus and forwards events to the subscriber set (fire-and-forget).
    fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

/// Waits up to `timeout` for one complete line.
///
/// End of input drops the reader; every later call sleeps.
async fn wait<R>(input: &mut Option<LineReader<R>>, timeout: Duration) -> Result<Wait, RuntimeError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(reader) = input.as_mut() else {
        time::sleep(timeout).await;
        return Ok(Wait::Timeout);
    };

    match time::timeout(timeout, reader.next_line()).await {
        Err(_elapsed) => Ok(Wait::Timeout),
        Ok(Err(e)) => Err(RuntimeError::Input(e)),
        Ok(Ok(Line::Complete(line))) => Ok(Wait::Line(line)),
        Ok(Ok(Line::Overlong { len })) => Ok(Wait::Overlong(len)),
        Ok(Ok(Line::Eof)) => {
            *input = None;
            Ok(Wait::Closed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Affix, Grammar};
    use crate::desktops::parser::tests::plain_theme;
    use crate::providers::{Desktops, Marker};
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, DuplexStream, ReadBuf};
    use tokio::task::JoinHandle;

    fn test_config() -> Config {
        Config {
            grammar: Grammar::SingleMonitor,
            desktop_names: vec!["a".into(), "b".into(), "c".into()],
            layout_names: vec!["tile".into(), "monocle".into()],
            desktop_theme: plain_theme(),
            ..Config::default()
        }
    }

    fn test_bar() -> Bar {
        let providers: Vec<ProviderRef> = vec![
            Arc::new(Marker::new("left", "|")),
            Arc::new(Desktops::new(Affix::new("", ""))),
        ];
        Bar::with_providers(test_config(), providers, Vec::new())
    }

    struct Harness {
        input: Option<DuplexStream>,
        output: BufReader<DuplexStream>,
        events: tokio::sync::broadcast::Receiver<Event>,
        token: CancellationToken,
        handle: JoinHandle<Result<(), RuntimeError>>,
    }

    impl Harness {
        fn start(mut bar: Bar) -> Self {
            let (input, bar_in) = tokio::io::duplex(1024);
            let (bar_out, output) = tokio::io::duplex(1024);
            let events = bar.bus().subscribe();
            let token = CancellationToken::new();
            let child = token.clone();
            let handle = tokio::spawn(async move {
                bar.run(BufReader::new(bar_in), bar_out, child).await
            });
            Self {
                input: Some(input),
                output: BufReader::new(output),
                events,
                token,
                handle,
            }
        }

        async fn send(&mut self, text: &str) {
            let input = self.input.as_mut().unwrap();
            input.write_all(text.as_bytes()).await.unwrap();
        }

        async fn line(&mut self) -> String {
            let mut line = String::new();
            self.output.read_line(&mut line).await.unwrap();
            line
        }

        async fn event(&mut self) -> Event {
            loop {
                let ev = self.events.recv().await.unwrap();
                if matches!(
                    ev.kind,
                    EventKind::DesktopsUpdated | EventKind::DesktopsRejected | EventKind::InputClosed
                ) {
                    return ev;
                }
            }
        }

        async fn stop(self) {
            self.token.cancel();
            assert!(self.handle.await.unwrap().is_ok());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_parsed_line_shows_up_in_the_next_line() {
        let mut h = Harness::start(test_bar());
        h.send("0:0:0:1:0 1:2:0:0:0 2:0:0:0:1 fail\n").await;

        assert_eq!(h.line().await, "|*<a_(0)><b(2)>!<c_(0)>[tile]\n");
        let ev = h.event().await;
        assert_eq!(ev.kind, EventKind::DesktopsUpdated);
        assert_eq!(ev.bytes, Some(28));
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_repeat_the_stored_state() {
        let mut h = Harness::start(test_bar());
        assert_eq!(h.line().await, "|\n");

        h.send("1:1:0:1:0 x\n").await;
        let updated = h.line().await;
        assert_eq!(updated, "|*<b(1)>[tile]\n");

        for _ in 0..3 {
            assert_eq!(h.line().await, updated);
        }
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_line_keeps_previous_state() {
        let mut h = Harness::start(test_bar());
        h.send("0:0:0:1:0 x\n").await;
        let good = h.line().await;
        assert_eq!(h.event().await.kind, EventKind::DesktopsUpdated);

        h.send("7:0:0:0:0 x\n").await;
        assert_eq!(h.line().await, good);
        let ev = h.event().await;
        assert_eq!(ev.kind, EventKind::DesktopsRejected);
        assert!(ev.reason.as_deref().unwrap().starts_with("parse_unknown_desktop"));
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlong_line_is_rejected_and_discarded() {
        let mut h = Harness::start(test_bar());
        h.send("0:0:0:1:0 x\n").await;
        let good = h.line().await;
        assert_eq!(h.event().await.kind, EventKind::DesktopsUpdated);

        let flood = format!("{}\n", "1:1:0:1:0 ".repeat(1000));
        h.send(&flood).await;
        assert_eq!(h.line().await, good);
        let ev = h.event().await;
        assert_eq!(ev.kind, EventKind::DesktopsRejected);
        assert_eq!(
            ev.reason.as_deref(),
            Some("parse_line_too_long: line of 10000 bytes exceeds the 2730 byte input limit")
        );

        // The next line starts cleanly after the discarded one.
        h.send("2:0:0:1:0 x\n").await;
        assert_eq!(h.line().await, "|*<c_(0)>[tile]\n");
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_line_is_completed_after_a_timeout() {
        let mut h = Harness::start(test_bar());
        h.send("0:0:0:1:0").await;
        assert_eq!(h.line().await, "|\n");

        h.send(" x\n").await;
        assert_eq!(h.line().await, "|*<a_(0)>[tile]\n");
        h.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_of_input_keeps_emitting() {
        let mut h = Harness::start(test_bar());
        h.send("2:3:1:1:0 x\n").await;
        let last = h.line().await;
        assert_eq!(h.event().await.kind, EventKind::DesktopsUpdated);

        h.input = None;
        assert_eq!(h.line().await, last);
        assert_eq!(h.event().await.kind, EventKind::InputClosed);
        assert_eq!(h.line().await, last);
        assert_eq!(h.line().await, last);
        h.stop().await;
    }

    struct Broken;

    impl AsyncRead for Broken {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::other("device gone")))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_error_is_fatal() {
        let mut bar = test_bar();
        let res = bar
            .run(BufReader::new(Broken), tokio::io::sink(), CancellationToken::new())
            .await;
        assert!(matches!(res, Err(RuntimeError::Input(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_error_is_fatal() {
        let mut bar = test_bar();
        let (bar_out, reader) = tokio::io::duplex(64);
        drop(reader);
        let res = bar
            .run(tokio::io::empty(), bar_out, CancellationToken::new())
            .await;
        assert!(matches!(res, Err(RuntimeError::Output(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_stops_before_the_first_line() {
        let mut bar = test_bar();
        let token = CancellationToken::new();
        token.cancel();
        let mut out = Vec::new();
        bar.run(tokio::io::empty(), &mut out, token).await.unwrap();
        assert!(out.is_empty());
    }
}
