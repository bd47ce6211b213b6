//! # Music provider (MPD).
//!
//! Talks to a music player daemon over its line protocol and renders the
//! current song:
//!
//! ```text
//! connect ──► "OK MPD 0.23.5"               (greeting)
//!   [password "secret"] ──► "OK" | "ACK ..."
//!   currentsong ──► "Title: ..." / "Artist: ..." / "Track: ..." ... "OK"
//! ```
//!
//! ## Outcomes
//! - song playing: `music.prefix title.prefix TITLE title.suffix artist.prefix ARTIST artist.suffix music.suffix`
//!   (the track number stands in for a missing title)
//! - daemon reachable, no current song or the query failed: `music.prefix STOPPED music.suffix`
//! - daemon unreachable, bad greeting or password rejected: nothing
//!
//! Every step is bounded by the configured timeout.
//!
//! ## Addressing
//! `MPD_HOST` is either a host name or, with a leading `/`, the path of the
//! daemon's Unix socket. Both forms accept a `password@` prefix; an explicit
//! `MPD_PASSWORD` takes precedence over it.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time;

use crate::buffer::LineBuffer;
use crate::config::{Affix, Decorations};
use crate::error::ProviderError;
use crate::providers::{Provider, RenderContext};

/// Default daemon host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default daemon port.
pub const DEFAULT_PORT: u16 = 6600;

/// Where and how to reach the daemon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MpdSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl Default for MpdSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            password: None,
        }
    }
}

impl MpdSettings {
    /// Reads `MPD_HOST`, `MPD_PORT` and `MPD_PASSWORD`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    ///
    /// An unparsable or zero port falls back to [`DEFAULT_PORT`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let raw = lookup("MPD_HOST").unwrap_or_default();
        let (embedded, host) = match raw.split_once('@') {
            Some((password, host)) if !password.is_empty() => {
                (Some(password.to_string()), host.to_string())
            }
            _ => (None, raw),
        };
        let host = if host.is_empty() {
            DEFAULT_HOST.to_string()
        } else {
            host
        };
        let port = lookup("MPD_PORT")
            .and_then(|p| p.trim().parse::<u16>().ok())
            .filter(|p| *p != 0)
            .unwrap_or(DEFAULT_PORT);
        Self {
            host,
            port,
            password: lookup("MPD_PASSWORD").or(embedded),
        }
    }

    /// `true` when `host` names a Unix socket path; `port` is unused then.
    pub fn is_socket(&self) -> bool {
        self.host.starts_with('/')
    }
}

/// Tags of the current song.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Song {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub track: Option<String>,
}

impl Song {
    /// Title, or the track number when the title tag is absent.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.track.as_deref())
            .unwrap_or_default()
    }
}

/// One open connection to the daemon.
struct Session<S> {
    conn: BufReader<S>,
    line: String,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn open(stream: S) -> Result<Self, ProviderError> {
        let mut session = Self {
            conn: BufReader::new(stream),
            line: String::new(),
        };
        let greeting = session.read_line().await?;
        if !greeting.starts_with("OK MPD ") {
            return Err(ProviderError::Protocol { detail: greeting });
        }
        Ok(session)
    }

    async fn read_line(&mut self) -> Result<String, ProviderError> {
        self.line.clear();
        if self.conn.read_line(&mut self.line).await? == 0 {
            return Err(ProviderError::Protocol {
                detail: "connection closed".into(),
            });
        }
        Ok(self.line.trim_end_matches(['\n', '\r']).to_string())
    }

    async fn command(&mut self, cmd: &str) -> Result<(), ProviderError> {
        let stream = self.conn.get_mut();
        stream.write_all(cmd.as_bytes()).await?;
        stream.write_all(b"\n").await?;
        Ok(())
    }

    /// Reads `key: value` lines until `OK`; `ACK` is an error.
    async fn response(&mut self) -> Result<Vec<(String, String)>, ProviderError> {
        let mut pairs = Vec::new();
        loop {
            let line = self.read_line().await?;
            if line == "OK" {
                return Ok(pairs);
            }
            if line.starts_with("ACK") {
                return Err(ProviderError::Protocol { detail: line });
            }
            if let Some((key, value)) = line.split_once(": ") {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
    }

    async fn password(&mut self, password: &str) -> Result<(), ProviderError> {
        self.command(&format!("password {}", quote(password))).await?;
        self.response().await.map(|_| ())
    }

    async fn current_song(&mut self) -> Result<Option<Song>, ProviderError> {
        self.command("currentsong").await?;
        let pairs = self.response().await?;
        if pairs.is_empty() {
            return Ok(None);
        }
        let mut song = Song::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "Title" => &mut song.title,
                "Artist" => &mut song.artist,
                "Track" => &mut song.track,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        Ok(Some(song))
    }
}

/// Quotes a command argument.
fn quote(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

async fn bounded<T>(
    timeout: Duration,
    fut: impl Future<Output = Result<T, ProviderError>>,
) -> Result<T, ProviderError> {
    time::timeout(timeout, fut)
        .await
        .unwrap_or(Err(ProviderError::Timeout { timeout }))
}

/// Now-playing provider.
#[derive(Clone, Debug)]
pub struct Music {
    settings: MpdSettings,
    timeout: Duration,
    music: Affix,
    title: Affix,
    artist: Affix,
    stopped: String,
}

impl Music {
    pub fn new(settings: MpdSettings, timeout: Duration, deco: &Decorations) -> Self {
        Self {
            settings,
            timeout,
            music: deco.music.clone(),
            title: deco.title.clone(),
            artist: deco.artist.clone(),
            stopped: deco.stopped.clone(),
        }
    }

    /// `Ok(None)` when the daemon is reachable but nothing is current.
    async fn sample(&self) -> Result<Option<Song>, ProviderError> {
        if self.settings.is_socket() {
            return self.sample_socket().await;
        }
        let addr = (self.settings.host.as_str(), self.settings.port);
        let stream = bounded(self.timeout, async {
            Ok(TcpStream::connect(addr).await?)
        })
        .await?;
        self.query(stream).await
    }

    #[cfg(unix)]
    async fn sample_socket(&self) -> Result<Option<Song>, ProviderError> {
        let path = self.settings.host.as_str();
        let stream = bounded(self.timeout, async {
            Ok(tokio::net::UnixStream::connect(path).await?)
        })
        .await?;
        self.query(stream).await
    }

    #[cfg(not(unix))]
    async fn sample_socket(&self) -> Result<Option<Song>, ProviderError> {
        Err(ProviderError::Unavailable {
            what: "unix socket",
        })
    }

    async fn query<S>(&self, stream: S) -> Result<Option<Song>, ProviderError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut session = bounded(self.timeout, Session::open(stream)).await?;
        if let Some(password) = &self.settings.password {
            bounded(self.timeout, session.password(password)).await?;
        }
        Ok(bounded(self.timeout, session.current_song())
            .await
            .unwrap_or(None))
    }
}

#[async_trait]
impl Provider for Music {
    fn name(&self) -> &str {
        "music"
    }

    async fn render(&self, _ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize {
        let Ok(song) = self.sample().await else {
            return 0;
        };
        let m = &self.music;
        match song {
            Some(song) => out.push_fmt(format_args!(
                "{}{}{}{}{}{}{}{}",
                m.prefix,
                self.title.prefix,
                song.display_title(),
                self.title.suffix,
                self.artist.prefix,
                song.artist.as_deref().unwrap_or_default(),
                self.artist.suffix,
                m.suffix,
            )),
            None => out.push_fmt(format_args!("{}{}{}", m.prefix, self.stopped, m.suffix)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktops::DesktopStore;
    use tokio::net::TcpListener;

    fn deco() -> Decorations {
        Decorations {
            music: Affix::new("<", ">"),
            title: Affix::new("", ""),
            artist: Affix::new(" - ", ""),
            stopped: "stopped".into(),
            ..Decorations::default()
        }
    }

    /// Answers each command from `script` in order.
    async fn serve<S>(stream: S, script: Vec<(&'static str, &'static str)>)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut conn = BufReader::new(stream);
        conn.get_mut().write_all(b"OK MPD 0.23.5\n").await.unwrap();
        for (expect, reply) in script {
            let mut line = String::new();
            conn.read_line(&mut line).await.unwrap();
            assert_eq!(line.trim_end(), expect);
            conn.get_mut().write_all(reply.as_bytes()).await.unwrap();
        }
    }

    /// Serves one TCP connection on a free local port.
    async fn fake_daemon(script: Vec<(&'static str, &'static str)>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            serve(stream, script).await;
        });
        port
    }

    async fn render(settings: MpdSettings) -> Vec<u8> {
        let store = DesktopStore::new(8);
        let ctx = RenderContext::new(&store);
        let mut out = LineBuffer::new(256);
        let music = Music::new(settings, Duration::from_secs(1), &deco());
        let n = music.render(&ctx, &mut out).await;
        assert_eq!(n, out.len());
        out.as_bytes().to_vec()
    }

    fn local(port: u16, password: Option<&str>) -> MpdSettings {
        MpdSettings {
            host: "127.0.0.1".into(),
            port,
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_current_song() {
        let port = fake_daemon(vec![(
            "currentsong",
            "file: a.flac\nArtist: Nina Simone\nTitle: Sinnerman\nTrack: 4\nOK\n",
        )])
        .await;
        assert_eq!(render(local(port, None)).await, b"<Sinnerman - Nina Simone>");
    }

    #[tokio::test]
    async fn test_track_stands_in_for_missing_title() {
        let port = fake_daemon(vec![("currentsong", "file: a.flac\nTrack: 7\nOK\n")]).await;
        assert_eq!(render(local(port, None)).await, b"<7 - >");
    }

    #[tokio::test]
    async fn test_no_current_song_renders_stopped() {
        let port = fake_daemon(vec![("currentsong", "OK\n")]).await;
        assert_eq!(render(local(port, None)).await, b"<stopped>");
    }

    #[tokio::test]
    async fn test_password_is_sent_quoted() {
        let port = fake_daemon(vec![
            (r#"password "se\"cret""#, "OK\n"),
            ("currentsong", "OK\n"),
        ])
        .await;
        assert_eq!(
            render(local(port, Some("se\"cret"))).await,
            b"<stopped>"
        );
    }

    #[tokio::test]
    async fn test_rejected_password_writes_nothing() {
        let port = fake_daemon(vec![(
            r#"password "nope""#,
            "ACK [3@0] {password} incorrect password\n",
        )])
        .await;
        assert!(render(local(port, Some("nope"))).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_daemon_writes_nothing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        assert!(render(local(port, None)).await.is_empty());
    }

    #[test]
    fn test_settings_from_lookup() {
        let s = MpdSettings::from_lookup(|_| None);
        assert_eq!(s, MpdSettings::default());

        let s = MpdSettings::from_lookup(|key| match key {
            "MPD_HOST" => Some("music.lan".into()),
            "MPD_PORT" => Some("6601".into()),
            "MPD_PASSWORD" => Some("pw".into()),
            _ => None,
        });
        assert_eq!(s.host, "music.lan");
        assert_eq!(s.port, 6601);
        assert_eq!(s.password.as_deref(), Some("pw"));

        let s = MpdSettings::from_lookup(|key| (key == "MPD_PORT").then(|| "garbage".into()));
        assert_eq!(s.port, DEFAULT_PORT);
    }

    #[test]
    fn test_password_prefix_in_host() {
        let s =
            MpdSettings::from_lookup(|key| (key == "MPD_HOST").then(|| "hunter2@music.lan".into()));
        assert_eq!(s.host, "music.lan");
        assert_eq!(s.password.as_deref(), Some("hunter2"));
        assert!(!s.is_socket());

        let s = MpdSettings::from_lookup(|key| match key {
            "MPD_HOST" => Some("hunter2@music.lan".into()),
            "MPD_PASSWORD" => Some("explicit".into()),
            _ => None,
        });
        assert_eq!(s.password.as_deref(), Some("explicit"));

        let s = MpdSettings::from_lookup(|key| (key == "MPD_HOST").then(|| "pw@".into()));
        assert_eq!(s.host, DEFAULT_HOST);
        assert_eq!(s.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_socket_path_host() {
        let host = "pw@/run/mpd/socket";
        let s = MpdSettings::from_lookup(|key| (key == "MPD_HOST").then(|| host.into()));
        assert!(s.is_socket());
        assert_eq!(s.host, "/run/mpd/socket");
        assert_eq!(s.password.as_deref(), Some("pw"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_current_song_over_unix_socket() {
        let path =
            std::env::temp_dir().join(format!("statusfeed-mpd-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let listener = tokio::net::UnixListener::bind(&path).unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            serve(
                stream,
                vec![
                    (r#"password "pw""#, "OK\n"),
                    ("currentsong", "Artist: Can\nTitle: Vitamin C\nOK\n"),
                ],
            )
            .await;
        });

        let settings = MpdSettings {
            host: path.to_string_lossy().into_owned(),
            port: DEFAULT_PORT,
            password: Some("pw".into()),
        };
        let out = render(settings).await;
        let _ = std::fs::remove_file(&path);
        assert_eq!(out, b"<Vitamin C - Can>");
    }
}
