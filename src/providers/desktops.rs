//! Desktops provider: re-emits the desktop store contents.

use async_trait::async_trait;

use crate::buffer::LineBuffer;
use crate::config::Affix;
use crate::providers::{Provider, RenderContext};

/// Wraps the current [`DesktopStore`](crate::DesktopStore) fragment in its decoration.
#[derive(Clone, Debug)]
pub struct Desktops {
    affix: Affix,
}

impl Desktops {
    pub fn new(affix: Affix) -> Self {
        Self { affix }
    }
}

#[async_trait]
impl Provider for Desktops {
    fn name(&self) -> &str {
        "desktops"
    }

    async fn render(&self, ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize {
        out.push_str(&self.affix.prefix)
            + out.push_bytes(ctx.desktops.as_bytes())
            + out.push_str(&self.affix.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Grammar;
    use crate::desktops::DesktopStore;
    use crate::desktops::parser::tests::parser;

    #[tokio::test]
    async fn test_reemits_store_contents() {
        let mut store = DesktopStore::new(64);
        store
            .update(&parser(Grammar::SingleMonitor), "1:3:0:0:0 x")
            .unwrap();
        let ctx = RenderContext::new(&store);

        let mut out = LineBuffer::new(64);
        let n = Desktops::new(Affix::new("{", "}")).render(&ctx, &mut out).await;
        assert_eq!(out.as_bytes(), b"{<b(3)>}");
        assert_eq!(n, 8);
    }

    #[tokio::test]
    async fn test_empty_store_renders_only_decoration() {
        let store = DesktopStore::new(64);
        let ctx = RenderContext::new(&store);
        let mut out = LineBuffer::new(64);
        let n = Desktops::new(Affix::default()).render(&ctx, &mut out).await;
        assert_eq!(n, 0);
    }
}
