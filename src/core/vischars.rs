// src/core/vischars.rs
// Visible-text character iterator over an HTML fragment.
// Skips tags (<...>), decodes common entities, collapses ASCII whitespace to a single ' '.
// In line mode, <br> and block-level tags yield '\n' so callers can split on layout lines.

use super::sanitize::decode_entity;

const BREAK_TAGS: &[&str] = &[
    "br", "p", "div", "center", "table", "tr", "td", "th", "li", "ul", "h1", "h2", "h3", "hr",
];

pub struct VisChars<'a> {
    s: &'a str,
    b: &'a [u8],
    i: usize,
    n: usize,
    breaks: bool,
}

impl<'a> VisChars<'a> {
    pub fn new(s: &'a str) -> Self { Self { s, b: s.as_bytes(), i: 0, n: s.len(), breaks: false } }

    /// Like `new`, but emits '\n' at `<br>` and block tag boundaries.
    pub fn lines(s: &'a str) -> Self { Self { breaks: true, ..Self::new(s) } }

    /// Skip the tag at `self.i` (a '<'), returning its lowercase name without any leading '/'.
    #[inline]
    fn skip_tag(&mut self) -> String {
        self.i += 1;
        if self.b.get(self.i) == Some(&b'/') { self.i += 1; }
        let name_start = self.i;
        while self.i < self.n && self.b[self.i].is_ascii_alphanumeric() { self.i += 1; }
        let name = self.s[name_start..self.i].to_ascii_lowercase();

        let mut in_s = false; // '
        let mut in_d = false; // "
        while self.i < self.n {
            match self.b[self.i] {
                b'\'' if !in_d => in_s = !in_s,
                b'"'  if !in_s => in_d = !in_d,
                b'>' if !in_s && !in_d => { self.i += 1; break; }
                _ => {}
            }
            self.i += 1;
        }
        name
    }

    /// Decode the entity at `self.i` (a '&'). A bare '&' passes through unchanged.
    #[inline]
    fn take_entity(&mut self) -> char {
        let rest = &self.s[self.i + 1..];
        let end = rest.bytes().take(10).position(|c| c == b';');
        if let Some(end) = end {
            if let Some(ch) = decode_entity(&rest[..end]) {
                self.i += end + 2;
                return if ch.is_whitespace() { ' ' } else { ch };
            }
        }
        self.i += 1;
        '&'
    }

    #[inline]
    fn next_char(&mut self) -> Option<char> {
        let ch = self.s.get(self.i..)?.chars().next()?;
        self.i += ch.len_utf8();
        Some(ch)
    }
}

impl<'a> Iterator for VisChars<'a> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        while self.i < self.n {
            match self.b[self.i] {
                b'<' => {
                    let name = self.skip_tag();
                    if self.breaks && BREAK_TAGS.contains(&name.as_str()) {
                        return Some('\n');
                    }
                    continue;
                }
                b'&' => return Some(self.take_entity()),
                b' ' | b'\t' | b'\r' | b'\n' => {
                    // collapse consecutive whitespace to a single space
                    while self.i < self.n {
                        match self.b[self.i] { b' ' | b'\t' | b'\r' | b'\n' => self.i += 1, _ => break }
                    }
                    return Some(' ');
                }
                _ => return self.next_char(),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_tags_and_decodes() {
        let s: String = VisChars::new("<b>Fish</b>&nbsp;&amp; <i>Chips</i>").collect();
        assert_eq!(s, "Fish & Chips");
    }

    #[test]
    fn bare_ampersand_survives() {
        let s: String = VisChars::new("Salt & Pepper").collect();
        assert_eq!(s, "Salt & Pepper");
    }

    #[test]
    fn line_mode_breaks_on_br_and_blocks() {
        let s: String = VisChars::lines("Population: 57<br>\n  Located<center>x</center>").collect();
        assert_eq!(s, "Population: 57\n Located\nx\n");
    }

    #[test]
    fn quoted_angle_bracket_inside_attribute() {
        let s: String = VisChars::new(r#"<a title="a>b">link</a>"#).collect();
        assert_eq!(s, "link");
    }
}
