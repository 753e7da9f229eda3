//! Rendering of reconstructed threads and story digests.

use chrono::NaiveDate;
use deunicode::deunicode;

use crate::contract::Story;
use crate::thread::CommentNode;

pub const HN_ITEM_BASE_URL: &str = "https://news.ycombinator.com";

/// Longest slug kept in a digest filename.
pub const MAX_SLUG_CHARS: usize = 50;

pub fn hn_item_url(story_id: u64) -> String {
    format!("{HN_ITEM_BASE_URL}/item?id={story_id}")
}

/// Numbered list of root comments, each followed by its replies as indented bullets.
///
/// Every entry ends its first line with a newline, so a root without replies
/// is followed by an empty line.
pub fn render_comments(roots: &[CommentNode]) -> String {
    roots
        .iter()
        .enumerate()
        .map(|(i, root)| {
            let replies = root
                .replies
                .iter()
                .map(|reply| format!("    - {}", reply.text))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}. {}\n{}", i + 1, root.text, replies)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn to_json(roots: &[CommentNode], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(roots)
    } else {
        serde_json::to_string(roots)
    }
}

/// Lowercase ASCII slug of `input`, separated by `-`.
///
/// Typed apostrophes split words while apostrophes produced by
/// transliteration are dropped, and thousands separators inside numbers are
/// removed, so titles slug the same way as the filenames already stored in
/// the knowledge base.
pub fn slugify(input: &str) -> String {
    let split_quotes = input.replace('\'', "-");
    let ascii = deunicode(&split_quotes).replace('\'', "");
    slug::dashed(&strip_digit_commas(&ascii))
}

mod slug {
    use slugify_rs::slugify;

    pub(super) fn dashed(text: &str) -> String {
        slugify!(text)
    }
}

/// Drops every comma that sits between two digits (`1,000` becomes `1000`).
fn strip_digit_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let between_digits = i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit);
            !(c == ',' && between_digits)
        })
        .map(|(_, &c)| c)
        .collect()
}

/// `{day}-{slug}.md` for link posts, `{day}-{id}.md` for text posts.
pub fn digest_filename(day: NaiveDate, story: &Story) -> String {
    let stem = match story.url {
        Some(_) => slugify(&story.title).chars().take(MAX_SLUG_CHARS).collect(),
        None => story.id.to_string(),
    };
    format!("{}-{}.md", day.format("%Y-%m-%d"), stem)
}

pub fn render_digest(story: &Story, resolved_url: &str, summary: Option<&str>) -> String {
    let mut md = format!(
        "# {}\n\n- Score: {} | [HN]({}) | Link: {}\n\n",
        story.title,
        story.score,
        hn_item_url(story.id),
        resolved_url
    );
    if let Some(summary) = summary {
        md.push('\n');
        md.push_str(summary);
        md.push_str("\n\n");
    }
    md
}
