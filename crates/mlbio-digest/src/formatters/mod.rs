//! Output formatting for the digest message.

mod slack;

pub use slack::{escape_mrkdwn, format_item_line, format_popularity, render_digest};
