//! Fixed-text providers: alignment markers and separators.

use async_trait::async_trait;

use crate::buffer::LineBuffer;
use crate::providers::{Provider, RenderContext};

/// Emits the same text every cycle.
#[derive(Clone, Debug)]
pub struct Marker {
    name: &'static str,
    text: String,
}

impl Marker {
    pub fn new(name: &'static str, text: impl Into<String>) -> Self {
        Self {
            name,
            text: text.into(),
        }
    }
}

#[async_trait]
impl Provider for Marker {
    fn name(&self) -> &str {
        self.name
    }

    async fn render(&self, _ctx: &RenderContext<'_>, out: &mut LineBuffer) -> usize {
        out.push_str(&self.text)
    }
}
