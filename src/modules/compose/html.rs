// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::LazyLock;

use regex::Regex;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }
}

// Order matters: tag specific rules run before the catch-all.
static TAG_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?i)</p\s*>\s*<br\s*/?>", "\n"),
        Rule::new(r"(?i)<br\s*/?>", "\n"),
        Rule::new(r"(?i)</p\s*>", "\n"),
        Rule::new(r"(?i)<p(\s[^>]*)?>", ""),
        Rule::new(r"(?i)</?strong(\s[^>]*)?>", ""),
        Rule::new(r"<[^>]*>", ""),
    ]
});

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n(\s*\n)+").unwrap());

// `&amp;` goes last so `&amp;lt;` stays `&lt;`.
const ENTITIES: [(&str, &str); 5] = [
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&amp;", "&"),
];

/// Degrades an HTML fragment to plain text.
///
/// This is a fixed sequence of substitutions, not an HTML parser: block and
/// line-break tags become newlines, every other tag is dropped, a handful of named
/// entities are decoded, and runs of blank lines collapse to a single blank line.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();
    for rule in TAG_RULES.iter() {
        text = rule
            .pattern
            .replace_all(&text, rule.replacement)
            .into_owned();
    }
    for (entity, decoded) in ENTITIES {
        text = text.replace(entity, decoded);
    }
    BLANK_RUNS
        .replace_all(&text, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::html_to_text;

    #[test]
    fn paragraph_then_break() {
        assert_eq!(
            html_to_text("<p>Hi <strong>there</strong></p><br>Bye"),
            "Hi there\nBye"
        );
    }

    #[test]
    fn break_variants() {
        assert_eq!(html_to_text("a<br>b<br/>c<br />d<BR>e"), "a\nb\nc\nd\ne");
    }

    #[test]
    fn paragraphs_and_attributes() {
        assert_eq!(
            html_to_text(r#"<P class="lead">One</P><p>Two</p>"#),
            "One\nTwo"
        );
        assert_eq!(
            html_to_text(r#"<strong style="x">bold</STRONG> text"#),
            "bold text"
        );
    }

    #[test]
    fn other_tags_are_dropped() {
        assert_eq!(
            html_to_text(r#"<div><a href="https://x.com">link</a> <em>it</em></div>"#),
            "link it"
        );
    }

    #[test]
    fn entities_decoded_after_tags() {
        assert_eq!(
            html_to_text("1&nbsp;&lt;&nbsp;2 &amp;&amp; &quot;q&quot; &gt; 0"),
            "1 < 2 && \"q\" > 0"
        );
        assert_eq!(html_to_text("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
        // An escaped tag is text, not a tag.
        assert_eq!(html_to_text("&lt;p&gt;x"), "<p>x");
    }

    #[test]
    fn blank_runs_collapse() {
        assert_eq!(html_to_text("a\n\n\nb"), "a\n\nb");
        assert_eq!(html_to_text("a\n  \n \t\n\n\nb"), "a\n\nb");
        assert_eq!(html_to_text("<p>a</p><p></p><p></p><p>b</p>"), "a\n\nb");
        assert_eq!(html_to_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn empty_and_whitespace() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("  <br>  "), "");
    }
}
