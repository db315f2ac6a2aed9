//! Minimal HTML scanning
//!
//! Case-insensitive tag-block scanning over raw page text. Blocks do not
//! nest: a block ends at the first matching close tag. Good enough for the
//! flat tables and headings the adapters read.

/// ASCII-only lowercase; keeps byte offsets valid for the original string
#[must_use]
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

fn is_tag_boundary(byte: Option<&u8>) -> bool {
    matches!(byte, Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
}

/// Find the next `<tag` (for any of `tags`) at or after `from`
fn find_open(lc: &str, tags: &[String], from: usize) -> Option<(usize, usize)> {
    let mut at = from;
    while let Some(rel) = lc.get(at..)?.find('<') {
        let start = at + rel;
        let rest = &lc[start + 1..];
        for (i, tag) in tags.iter().enumerate() {
            if rest.starts_with(tag.as_str()) && is_tag_boundary(rest.as_bytes().get(tag.len())) {
                return Some((start, i));
            }
        }
        at = start + 1;
    }
    None
}

/// All `<tag ...>...</tag>` blocks for any of `tags`, in document order
#[must_use]
pub fn tag_blocks_any<'a>(html: &'a str, tags: &[&str]) -> Vec<&'a str> {
    let lc = to_lower(html);
    let tags: Vec<String> = tags.iter().map(|t| to_lower(t)).collect();
    let mut blocks = Vec::new();
    let mut from = 0;

    while let Some((start, which)) = find_open(&lc, &tags, from) {
        let Some(open_end) = lc[start..].find('>').map(|i| start + i + 1) else {
            break;
        };
        let close = format!("</{}>", tags[which]);
        let Some(end) = lc[open_end..].find(&close).map(|i| open_end + i + close.len()) else {
            break;
        };
        blocks.push(&html[start..end]);
        from = end;
    }
    blocks
}

/// All `<tag ...>...</tag>` blocks
#[must_use]
pub fn tag_blocks<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
    tag_blocks_any(html, &[tag])
}

/// First `<tag ...>...</tag>` block
#[must_use]
pub fn first_tag_block<'a>(html: &'a str, tag: &str) -> Option<&'a str> {
    tag_blocks(html, tag).into_iter().next()
}

/// Opening tags `<tag ...>` without requiring a close tag
#[must_use]
pub fn open_tags<'a>(html: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = to_lower(html);
    let tags = [to_lower(tag)];
    let mut out = Vec::new();
    let mut from = 0;
    while let Some((start, _)) = find_open(&lc, &tags, from) {
        let Some(end) = lc[start..].find('>').map(|i| start + i + 1) else {
            break;
        };
        out.push(&html[start..end]);
        from = end;
    }
    out
}

/// The opening tag of a block
#[must_use]
pub fn open_tag(block: &str) -> &str {
    block.find('>').map_or(block, |end| &block[..=end])
}

/// Content between the opening tag and the final close tag
#[must_use]
pub fn inner_html(block: &str) -> &str {
    match (block.find('>'), block.rfind('<')) {
        (Some(open_end), Some(close_start)) if close_start > open_end => {
            &block[open_end + 1..close_start]
        }
        _ => "",
    }
}

/// Attribute value from an opening tag, entity-decoded
#[must_use]
pub fn attr(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let name = to_lower(name);
    let bytes = lc.as_bytes();
    let mut from = 0;

    while let Some(rel) = lc.get(from..)?.find(&name) {
        let start = from + rel;
        from = start + name.len();

        if start == 0 || !bytes[start - 1].is_ascii_whitespace() {
            continue;
        }
        let mut i = from;
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            continue;
        }
        i += 1;
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }

        let rest = &open_tag[i..];
        let value = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => rest[1..].split(quote).next().unwrap_or_default(),
            _ => rest
                .split(|c: char| c.is_whitespace() || c == '>')
                .next()
                .unwrap_or_default(),
        };
        return Some(decode_entities(value));
    }
    None
}

/// True if the opening tag's `class` list contains `class`
#[must_use]
pub fn has_class(open_tag: &str, class: &str) -> bool {
    attr(open_tag, "class").is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
}

/// First `href` of an `<a>` tag in `html`
#[must_use]
pub fn first_href(html: &str) -> Option<String> {
    open_tags(html, "a")
        .into_iter()
        .find_map(|tag| attr(tag, "href"))
        .map(|href| href.trim().to_string())
}

/// Decode the handful of entities feeds actually use
#[must_use]
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&ndash;", "\u{2013}")
        .replace("&amp;", "&")
}

/// Collapse whitespace runs and trim
#[must_use]
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Text content with tags removed, entities decoded and whitespace collapsed
#[must_use]
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}

/// Text of a block's content
#[must_use]
pub fn block_text(block: &str) -> String {
    strip_tags(inner_html(block))
}

fn remove_blocks(html: &str, tag: &str) -> String {
    let mut out = html.to_string();
    for block in tag_blocks(html, tag) {
        out = out.replacen(block, "", 1);
    }
    out
}

/// Page text split at every tag, one trimmed non-empty line per text run
///
/// Script and style bodies are dropped.
#[must_use]
pub fn text_lines(html: &str) -> Vec<String> {
    let html = remove_blocks(&remove_blocks(html, "script"), "style");
    let mut raw = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                raw.push('\n');
            }
            '>' => in_tag = false,
            _ if !in_tag => raw.push(ch),
            _ => {}
        }
    }

    raw.lines()
        .map(|line| normalize_ws(&decode_entities(line)))
        .filter(|line| !line.is_empty())
        .collect()
}

/// [`text_lines`] joined with newlines, for regex searches
#[must_use]
pub fn page_text(html: &str) -> String {
    text_lines(html).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"<TABLE class="x"><tr><TH>Name</th><td>Loc</td></tr>
        <tr><td><a HREF="https://a.org/?x=1&amp;y=2">A</a></td><td>Paris&nbsp;FR</td></tr></table>"#;

    #[test]
    fn blocks_are_case_insensitive() {
        let table = first_tag_block(TABLE, "table").unwrap();
        let rows = tag_blocks(table, "tr");
        assert_eq!(rows.len(), 2);
        let cells = tag_blocks_any(rows[0], &["td", "th"]);
        assert_eq!(cells.len(), 2);
        assert_eq!(block_text(cells[0]), "Name");
        assert_eq!(block_text(cells[1]), "Loc");
    }

    #[test]
    fn tag_prefixes_do_not_match() {
        let html = "<thead><th>A</th></thead><track></track><tr><td>x</td></tr>";
        assert_eq!(tag_blocks(html, "th").len(), 1);
        assert_eq!(tag_blocks(html, "tr").len(), 1);
    }

    #[test]
    fn href_is_decoded() {
        assert_eq!(first_href(TABLE).as_deref(), Some("https://a.org/?x=1&y=2"));
        assert_eq!(first_href("<abbr>no link</abbr>"), None);
    }

    #[test]
    fn attr_forms() {
        assert_eq!(attr(r#"<td data-key="2026-01-30">"#, "data-key").as_deref(), Some("2026-01-30"));
        assert_eq!(attr("<td data-key=2026-01-30>", "data-key").as_deref(), Some("2026-01-30"));
        assert_eq!(attr("<td key='k' data-key='d'>", "key").as_deref(), Some("k"));
        assert_eq!(attr("<td data-key='d'>", "key"), None);
        assert!(has_class(r#"<span class="badge tag">"#, "tag"));
        assert!(!has_class(r#"<span class="tags">"#, "tag"));
    }

    #[test]
    fn strip_tags_collapses() {
        assert_eq!(strip_tags("<b>Security</b>&amp;<i>Privacy</i>\n x"), "Security & Privacy x");
        assert_eq!(inner_html("<td></td>"), "");
    }

    #[test]
    fn text_lines_split_on_tags() {
        let html = "<html><head><title>T</title><script>var a = '<b>';</script></head>\
                    <body><h1>ICC&nbsp;2026</h1><p>June 8-12, 2026 | Glasgow</p></body></html>";
        assert_eq!(text_lines(html), vec!["T", "ICC 2026", "June 8-12, 2026 | Glasgow"]);
    }
}
