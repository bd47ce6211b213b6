use std::sync::Arc;

use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

use statusfeed::{Bar, Config, Subscribe};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    #[allow(unused_mut)]
    let mut subs: Vec<Arc<dyn Subscribe>> = Vec::new();
    #[cfg(feature = "logging")]
    subs.push(Arc::new(statusfeed::LogWriter::new()));

    let mut bar = Bar::new(Config::default(), subs);
    let stdin = BufReader::new(tokio::io::stdin());
    bar.run(stdin, tokio::io::stdout(), CancellationToken::new())
        .await?;
    Ok(())
}
