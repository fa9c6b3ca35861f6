// src/core/html.rs
use scraper::Html;

use super::sanitize::normalize_ws;
use super::vischars::VisChars;

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(oe) = block.find('>') {
        if let Some(cs) = block.rfind('<') {
            if cs > oe {
                return block[oe + 1..cs].to_string();
            }
        }
    }
    s!()
}

/// Visible text of a fragment, entities decoded, whitespace collapsed.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let text: String = VisChars::new(s.as_ref()).collect();
    normalize_ws(&text)
}

/// Visible text split on `<br>` and block boundaries. Blank lines are kept, so
/// `<br><br>` shows up as an empty entry.
pub fn layout_lines(s: &str) -> Vec<String> {
    let text: String = VisChars::lines(s).collect();
    text.split('\n').map(normalize_ws).collect()
}

/* ---------------- Markup repair ---------------- */

/// Rebuild a page through the HTML5 tree builder and serialize it back.
///
/// yoweb omits end tags (`<td>1<td>2<tr>`) and leaves `<font>` wrappers
/// open. The block scanner below needs every element closed explicitly, so
/// the page parsers in `specs` run on the output of this, never on the raw body.
pub fn normalize_markup(page: &str) -> String {
    Html::parse_document(page).root_element().html()
}

/* ---------------- Balanced tag blocks ---------------- */

/// Position of the next `<tag` opener in `lc` at or after `from`, honoring the
/// tag-name boundary so that `<th` does not match `<thead`.
fn find_opener(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let pat = join!("<", tag);
    let mut pos = from;
    loop {
        let at = lc.get(pos..)?.find(&pat)? + pos;
        let after = lc.as_bytes().get(at + pat.len()).copied();
        match after {
            Some(b) if b.is_ascii_whitespace() || b == b'>' || b == b'/' => return Some(at),
            None => return None,
            _ => pos = at + pat.len(),
        }
    }
}

/// Iterator over the top-level `<tag>` blocks of a fragment.
pub struct Blocks<'a> {
    s: &'a str,
    lc: String,
    tag: String,
    pos: usize,
}

impl<'a> Blocks<'a> {
    pub fn new(s: &'a str, tag: &str) -> Self {
        Self { s, lc: to_lower(s), tag: to_lower(tag), pos: 0 }
    }

    fn seek(&self, from: usize) -> Option<(usize, usize)> {
        let close = join!("</", &self.tag);
        let start = find_opener(&self.lc, &self.tag, from)?;
        let mut cursor = self.s[start..].find('>')? + start + 1;
        let mut depth = 1usize;

        while depth > 0 {
            let next_close = self.lc.get(cursor..)?.find(&close)? + cursor;
            match find_opener(&self.lc, &self.tag, cursor) {
                Some(o) if o < next_close => {
                    depth += 1;
                    cursor = o + 1;
                }
                _ => {
                    depth -= 1;
                    cursor = self.s[next_close..].find('>')? + next_close + 1;
                }
            }
        }
        Some((start, cursor))
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a str;
    fn next(&mut self) -> Option<Self::Item> {
        let (start, end) = self.seek(self.pos)?;
        self.pos = end;
        Some(&self.s[start..end])
    }
}

/// Shorthand for `Blocks::new`.
pub fn blocks_ci<'a>(s: &'a str, tag: &str) -> Blocks<'a> {
    Blocks::new(s, tag)
}

/* ---------------- Tables ---------------- */

/// Tables that contain no nested table, in document order. Layout tables are
/// peeled away so callers only see the tables that actually hold data rows.
pub fn leaf_tables(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for table in blocks_ci(s, "table") {
        let body = table.find('>').map(|e| &table[e + 1..]).unwrap_or("");
        if find_opener(&to_lower(body), "table", 0).is_some() {
            out.extend(leaf_tables(body));
        } else {
            out.push(table);
        }
    }
    out
}

/// A row made only of `<th>` cells (or carrying any `<th>`) is a header row.
pub fn is_header_row(row: &str) -> bool {
    find_opener(&to_lower(row), "th", 0).is_some()
}

/// Visible text of each `<td>` of a row.
pub fn row_cells(row: &str) -> Vec<String> {
    blocks_ci(row, "td").map(|td| strip_tags(inner_after_open_tag(td))).collect()
}

/* ---------------- Attributes & links ---------------- */

/// Value of `name=` inside an opening tag; quotes optional in source.
pub fn attr_value(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let pat = join!(&to_lower(name), "=");
    let mut from = 0usize;
    let hp = loop {
        let at = lc.get(from..)?.find(&pat)? + from;
        // avoid matching `data-href=` when asking for `href=`
        let prev = lc.as_bytes().get(at.wrapping_sub(1)).copied();
        if at == 0 || prev.is_some_and(|b| b.is_ascii_whitespace()) {
            break at;
        }
        from = at + pat.len();
    };

    let val = open_tag[hp + pat.len()..].trim_start();
    let (quote, start_off) = match val.as_bytes().first() {
        Some(b'"') => ('"', 1),
        Some(b'\'') => ('\'', 1),
        _ => ('\0', 0),
    };
    let end = if quote != '\0' {
        val[start_off..].find(quote).map(|e| start_off + e)
    } else {
        val.find(|c: char| c.is_ascii_whitespace() || c == '>')
    }
    .unwrap_or(val.len());
    Some(val[start_off..end].to_string())
}

/// Numeric query parameter from an href: `query_param("info.wm?crewid=12&x", "crewid")` → 12.
pub fn query_param(href: &str, key: &str) -> Option<u64> {
    let lc = to_lower(href);
    let pat = join!(&to_lower(key), "=");
    let idx = lc.find(&pat)? + pat.len();
    let digits: String = href[idx..].chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// One `<a href=…>text</a>` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
    /// Byte offset of the opener within the searched fragment.
    pub at: usize,
}

/// All anchors of a fragment in document order.
pub fn anchors(s: &str) -> Vec<Anchor> {
    let blocks = Blocks::new(s, "a");
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((start, end)) = blocks.seek(pos) {
        let block = &s[start..end];
        let opener_end = block.find('>').map(|e| e + 1).unwrap_or(block.len());
        out.push(Anchor {
            href: attr_value(&block[..opener_end], "href").unwrap_or_default(),
            text: strip_tags(inner_after_open_tag(block)),
            at: start,
        });
        pos = end;
    }
    out
}
