//! Background-document normalization.
//!
//! The summary may arrive as HTML, Markdown, JSON, or plain text. The
//! oracle prompts want plain text, so anything coded is stripped down
//! before the session starts. Normalization is idempotent: already
//! plain text passes through unchanged.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref XML_DECL: Regex = Regex::new(r"(?i)<\?xml[^>]*\?>").unwrap();
    static ref SCRIPT_STYLE: Regex =
        Regex::new(r"(?is)<(style|script)[^>]*>.*?</(style|script)>").unwrap();
    static ref BLOCK_BREAK: Regex =
        Regex::new(r"(?i)<(?:br\s*/?|/?p[^>]*|/?div[^>]*|/?h[1-6][^>]*|/?[ou]l[^>]*|/li|/?tr[^>]*|/?table[^>]*)>")
            .unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"(?i)<li[^>]*>").unwrap();
    static ref ANY_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref ENTITY: Regex = Regex::new(r"&(?:[a-zA-Z]+|#\d+);").unwrap();
    static ref MD_HEADER: Regex = Regex::new(r"(?m)^#{1,6}\s*(.+)$").unwrap();
    static ref MD_BOLD: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref MD_ITALIC: Regex = Regex::new(r"\*(.+?)\*").unwrap();
    static ref MD_CODE_BLOCK: Regex = Regex::new(r"```[\s\S]*?```").unwrap();
    static ref MD_CODE_SPAN: Regex = Regex::new(r"`(.+?)`").unwrap();
    static ref MD_TABLE_RULE: Regex = Regex::new(r"(?m)^[-\s|]+$").unwrap();
    static ref JSON_SYNTAX: Regex = Regex::new(r#"[{}\[\]"]"#).unwrap();
    static ref JSON_SEP: Regex = Regex::new(r"[:,]").unwrap();
    static ref MANY_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
    static ref RUN_OF_SPACES: Regex = Regex::new(r"[ \t]+").unwrap();
    static ref SPACE_AT_EDGES: Regex = Regex::new(r"(?m)^[ \t]+|[ \t]+$").unwrap();
}

/// Convert coded content (HTML, XML, Markdown, JSON) to plain text.
///
/// Already-plain input is returned unchanged. If stripping would lose
/// more than ~90% of the content, the aggressive pass is abandoned and
/// only tags/entities are removed.
pub fn normalize(content: &str) -> String {
    let has_html = content.contains('<') && content.contains('>');
    let has_json = (content.contains('{') && content.contains('}'))
        || (content.contains('[') && content.contains(']'));
    let has_markdown = ["##", "**", "```", "---", "|"]
        .iter()
        .any(|m| content.contains(m));

    if !(has_html || has_json || has_markdown) {
        return content.to_string();
    }

    debug!(has_html, has_json, has_markdown, "normalizing coded content");

    let mut text = content.to_string();

    if has_markdown {
        text = MD_CODE_BLOCK.replace_all(&text, "").into_owned();
        text = MD_HEADER.replace_all(&text, "$1").into_owned();
        text = MD_BOLD.replace_all(&text, "$1").into_owned();
        text = MD_ITALIC.replace_all(&text, "$1").into_owned();
        text = MD_CODE_SPAN.replace_all(&text, "$1").into_owned();
        text = MD_TABLE_RULE.replace_all(&text, "").into_owned();
        text = text.replace('|', " ");
    }

    if has_html {
        text = XML_DECL.replace_all(&text, "").into_owned();
        text = SCRIPT_STYLE.replace_all(&text, "").into_owned();
        text = LIST_ITEM.replace_all(&text, "\u{2022} ").into_owned();
        text = BLOCK_BREAK.replace_all(&text, "\n").into_owned();
        text = ANY_TAG.replace_all(&text, "").into_owned();
        text = decode_entities(&text);
    }

    if has_json && !has_html {
        // JSON syntax only when the braces are not HTML attribute noise
        text = JSON_SYNTAX.replace_all(&text, "").into_owned();
        text = JSON_SEP.replace_all(&text, " ").into_owned();
    }

    text = tidy_whitespace(&text);

    // Over-reduction guard: keep structure if the strip went too far
    if text.chars().count() < content.chars().count() / 10 {
        debug!("normalization too aggressive, keeping tag-strip only");
        let mut fallback = ANY_TAG.replace_all(content, "").into_owned();
        fallback = decode_entities(&fallback);
        return tidy_whitespace(&fallback);
    }

    text
}

fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    ENTITY.replace_all(&text, "").into_owned()
}

fn tidy_whitespace(text: &str) -> String {
    let text = RUN_OF_SPACES.replace_all(text, " ");
    let text = SPACE_AT_EDGES.replace_all(&text, "");
    let text = MANY_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
