use chrono::NaiveDate;
use hn_digest_core::contract::Story;
use hn_digest_core::digest::{
    digest_filename, hn_item_url, render_comments, render_digest, slugify, to_json,
};
use hn_digest_core::thread::{reconstruct, CommentRecord, ReconstructPolicy};

fn story(url: Option<&str>) -> Story {
    Story {
        id: 4242,
        title: "Show HN: A Tiny, Fast JSON Parser (in Rust!)".to_string(),
        url: url.map(str::to_string),
        score: 321,
        utc_day: "2025-01-31T00:00:00Z".to_string(),
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
}

#[test]
fn test_render_comments_numbers_roots_and_indents_replies() {
    let roots = reconstruct(
        vec![
            CommentRecord::new(0, Some("a"), "first"),
            CommentRecord::new(1, Some("b"), "reply one"),
            CommentRecord::new(1, Some("c"), "reply two"),
            CommentRecord::new(0, Some("d"), "second"),
        ],
        &ReconstructPolicy::default(),
    );

    let rendered = render_comments(&roots);

    assert_eq!(
        rendered,
        "1. first\n    - reply one\n    - reply two\n2. second\n"
    );
}

#[test]
fn test_render_comments_of_empty_thread_is_empty() {
    assert_eq!(render_comments(&[]), "");
}

#[test]
fn test_to_json_compact_and_pretty() {
    let roots = reconstruct(
        vec![CommentRecord::new(0, None, "only")],
        &ReconstructPolicy::default(),
    );

    let compact = to_json(&roots, false).unwrap();
    assert_eq!(
        compact,
        r#"[{"author":null,"text":"only","depth":0,"replies":[]}]"#
    );
    let pretty = to_json(&roots, true).unwrap();
    assert!(pretty.contains('\n'));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&pretty).unwrap(),
        serde_json::from_str::<serde_json::Value>(&compact).unwrap()
    );
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("  Don't   panic -- 42 "), "don-t-panic-42");
    assert_eq!(slugify("***"), "");
}

#[test]
fn test_slugify_transliterates_non_ascii_titles() {
    assert_eq!(slugify("Café in Zürich"), "cafe-in-zurich");
    assert_eq!(slugify("Don\u{2019}t panic"), "dont-panic");
}

#[test]
fn test_slugify_drops_thousands_separators() {
    assert_eq!(slugify("Scaling to 1,000 nodes"), "scaling-to-1000-nodes");
    assert_eq!(slugify("1,000,000 rows, 3 tables"), "1000000-rows-3-tables");
}

#[test]
fn test_digest_filename_for_non_ascii_title() {
    let mut story = story(Some("https://a.example"));
    story.title = "Über 9,000 Café Reviews".to_string();
    assert_eq!(
        digest_filename(day(), &story),
        "2025-01-31-uber-9000-cafe-reviews.md"
    );
}

#[test]
fn test_digest_filename_for_link_post_uses_truncated_slug() {
    let name = digest_filename(day(), &story(Some("https://example.com")));
    assert_eq!(name, "2025-01-31-show-hn-a-tiny-fast-json-parser-in-rust.md");

    let mut long = story(Some("https://example.com"));
    long.title = "a".repeat(80);
    let name = digest_filename(day(), &long);
    assert_eq!(name, format!("2025-01-31-{}.md", "a".repeat(50)));
}

#[test]
fn test_digest_filename_for_text_post_uses_id() {
    assert_eq!(digest_filename(day(), &story(None)), "2025-01-31-4242.md");
}

#[test]
fn test_render_digest_with_and_without_summary() {
    let s = story(Some("https://example.com/post"));

    let bare = render_digest(&s, "https://example.com/post", None);
    assert_eq!(
        bare,
        "# Show HN: A Tiny, Fast JSON Parser (in Rust!)\n\n- Score: 321 | [HN](https://news.ycombinator.com/item?id=4242) | Link: https://example.com/post\n\n"
    );

    let full = render_digest(&s, "https://example.com/post", Some("## Summary\nGood."));
    assert!(full.starts_with(&bare));
    assert!(full.ends_with("\n## Summary\nGood.\n\n"));
}

#[test]
fn test_hn_item_url() {
    assert_eq!(hn_item_url(1), "https://news.ycombinator.com/item?id=1");
}
