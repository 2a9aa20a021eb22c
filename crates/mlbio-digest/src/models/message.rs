//! Slack Incoming-Webhook payload.

use serde::{Deserialize, Serialize};

/// The rendered digest: a plain-text fallback plus Block Kit blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestMessage {
    /// Fallback text for notifications and clients without blocks.
    pub text: String,

    /// Block Kit layout.
    pub blocks: Vec<Block>,
}

impl DigestMessage {
    /// Text of every mrkdwn section, in order.
    pub fn section_texts(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Section { text } => Some(text.text()),
            _ => None,
        })
    }
}

/// Block Kit block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Large bold heading.
    Header {
        /// Plain text only.
        text: TextObject,
    },
    /// Horizontal rule.
    Divider,
    /// Paragraph.
    Section {
        /// Body text.
        text: TextObject,
    },
    /// Small grey line.
    Context {
        /// Inline elements.
        elements: Vec<TextObject>,
    },
}

impl Block {
    #[must_use]
    pub fn header(text: impl Into<String>) -> Self {
        Self::Header { text: TextObject::plain(text) }
    }

    #[must_use]
    pub fn section(text: impl Into<String>) -> Self {
        Self::Section { text: TextObject::mrkdwn(text) }
    }

    #[must_use]
    pub fn context(text: impl Into<String>) -> Self {
        Self::Context { elements: vec![TextObject::mrkdwn(text)] }
    }
}

/// Block Kit text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TextObject {
    #[serde(rename = "plain_text")]
    PlainText {
        text: String,
        #[serde(default)]
        emoji: bool,
    },
    #[serde(rename = "mrkdwn")]
    Mrkdwn { text: String },
}

impl TextObject {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into(), emoji: true }
    }

    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    /// Raw text regardless of kind.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text, .. } | Self::Mrkdwn { text } => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_block_wire_shape() {
        let message = DigestMessage {
            text: "fallback".to_string(),
            blocks: vec![Block::header("Digest"), Block::Divider, Block::section("*1.* item")],
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "text": "fallback",
                "blocks": [
                    {"type": "header", "text": {"type": "plain_text", "text": "Digest", "emoji": true}},
                    {"type": "divider"},
                    {"type": "section", "text": {"type": "mrkdwn", "text": "*1.* item"}}
                ]
            })
        );
    }
}
