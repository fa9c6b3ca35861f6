// src/core/sanitize.rs

/// Decode a named or numeric entity body (the part between `&` and `;`).
pub fn decode_entity(name: &str) -> Option<char> {
    match name {
        "nbsp" => Some(' '),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Keep ASCII digits only: `"12%"` → `"12"`, `"1,234"` → `"1234"`.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Leading run of digits (commas allowed inside), e.g. `"1,234 pirates"` → 1234.
pub fn leading_count(s: &str) -> Option<u32> {
    let mut digits = s!();
    for ch in s.trim_start().chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            ',' if !digits.is_empty() => {}
            _ => break,
        }
    }
    digits.parse().ok()
}
