use hn_digest_core::ingest::{extract_records, parse_thread, IngestError};
use hn_digest_core::thread::{CommentRecord, ReconstructPolicy};

fn comment_row(indent: Option<&str>, author: Option<&str>, text_html: Option<&str>) -> String {
    let ind = match indent {
        Some(value) => format!(r#"<td class="ind" indent="{value}"><img src="s.gif" height="1" width="0"></td>"#),
        None => String::new(),
    };
    let user = match author {
        Some(name) => format!(r#"<a href="user?id={name}" class="hnuser">{name}</a> "#),
        None => String::new(),
    };
    let text = match text_html {
        Some(body) => format!(r#"<div class="comment"><div class="commtext c00">{body}</div></div>"#),
        None => String::new(),
    };
    format!(
        r#"<tr class="athing comtr" id="1"><td><table border="0"><tr>{ind}<td class="votelinks"></td><td class="default"><div style="margin-top:2px; margin-bottom:-10px;"><span class="comhead">{user}<span class="age">1 hour ago</span></span></div><br>{text}</td></tr></table></td></tr>"#
    )
}

fn page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="fatitem"><tr class="athing submission"><td>story</td></tr></table><table class="comment-tree">{}</table></body></html>"#,
        rows.concat()
    )
}

#[test]
fn test_extracts_rows_in_document_order() {
    let html = page(&[
        comment_row(Some("0"), Some("alice"), Some("First <i>root</i> comment")),
        comment_row(Some("1"), Some("bob"), Some("A reply")),
        comment_row(Some("0"), Some("dave"), Some("Second root")),
    ]);

    let records = extract_records(&html).expect("selectors are valid");

    assert_eq!(
        records,
        vec![
            CommentRecord::new(0, Some("alice"), "First root comment"),
            CommentRecord::new(1, Some("bob"), "A reply"),
            CommentRecord::new(0, Some("dave"), "Second root"),
        ]
    );
}

#[test]
fn test_text_is_flattened_with_single_spaces() {
    let html = page(&[comment_row(
        Some("0"),
        Some("alice"),
        Some("  line one  <p>line two</p><p>  <a href=\"https://x\">link</a> end</p>"),
    )]);

    let records = extract_records(&html).unwrap();

    assert_eq!(records[0].text, "line one line two link end");
}

#[test]
fn test_missing_elements_fall_back_to_defaults() {
    let html = page(&[
        comment_row(None, Some("alice"), Some("no indent cell")),
        comment_row(Some("1"), None, Some("no author")),
        comment_row(Some("1"), Some("carol"), None),
        comment_row(Some("abc"), Some("dan"), Some("bad indent")),
    ]);

    let records = extract_records(&html).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].depth, 0);
    assert_eq!(records[1].author, None);
    assert_eq!(records[1].depth, 1);
    assert_eq!(records[2].text, "");
    assert_eq!(records[2].author.as_deref(), Some("carol"));
    assert_eq!(records[3].depth, 0);
}

#[test]
fn test_page_without_comments_yields_nothing() {
    let records = extract_records("<html><body><p>No comments yet</p></body></html>").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_parse_thread_applies_policy() {
    let html = page(&[
        comment_row(Some("0"), Some("alice"), Some("root1")),
        comment_row(Some("1"), Some("bob"), Some("reply1")),
        comment_row(Some("2"), Some("carol"), Some("subreply")),
        comment_row(Some("0"), Some("dave"), Some("root2")),
    ]);

    let roots = parse_thread(&html, &ReconstructPolicy::default()).unwrap();

    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].replies.len(), 1);
    assert_eq!(roots[0].replies[0].text, "reply1");
    assert!(roots[0].replies[0].replies.is_empty());
    assert!(roots[1].replies.is_empty());
}

#[test]
fn test_ingest_error_names_the_selector() {
    let err = IngestError::Selector {
        selector: "td..ind".to_string(),
        message: "unexpected token".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "invalid thread selector td..ind: unexpected token"
    );
}
