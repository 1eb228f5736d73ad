#![forbid(unsafe_code)]

//! ISO-8859-1 re-expression of canonical output, the entity-fix scanner,
//! and the whitespace flattener.

/// Re-express a UTF-8 canonical string in the ISO-8859-1 repertoire.
///
/// Characters above U+00FF are replaced with `?`, matching the lossy
/// utf8→latin1 conversion of the verifiers this output interoperates with.
pub fn to_latin1_string(s: &str) -> String {
    s.chars()
        .map(|ch| if (ch as u32) <= 0xFF { ch } else { '?' })
        .collect()
}

/// The single-byte form of an ISO-8859-1 string; digest input.
///
/// Every char at or below U+00FF becomes one byte. Callers are expected to
/// pass output of [`to_latin1_string`]; anything above U+00FF maps to `?`.
pub fn iso_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|ch| {
            let cp = ch as u32;
            if cp <= 0xFF {
                cp as u8
            } else {
                b'?'
            }
        })
        .collect()
}

/// Restore `&apos;`/`&quot;` entities in element text.
///
/// A two-state scanner over the canonical string: `<` enters tag state,
/// `>` leaves it. Only outside tags (element text) are raw `'` and `"`
/// replaced; attribute values sit inside tags and keep whatever escaping
/// C14N gave them.
pub fn fix_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => {
                in_tag = true;
                out.push(ch);
            }
            '>' => {
                in_tag = false;
                out.push(ch);
            }
            '\'' if !in_tag => out.push_str("&apos;"),
            '"' if !in_tag => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Strip whitespace-only runs between tags, producing one compact line.
pub fn flatten(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_ws = String::new();
    let mut between_tags = false;
    for ch in s.chars() {
        match ch {
            '>' => {
                out.push_str(&pending_ws);
                pending_ws.clear();
                out.push(ch);
                between_tags = true;
            }
            '<' => {
                // Whitespace collected since the last `>` was inter-tag only.
                if !between_tags {
                    out.push_str(&pending_ws);
                }
                pending_ws.clear();
                out.push(ch);
                between_tags = false;
            }
            c if c.is_whitespace() && between_tags => pending_ws.push(c),
            c => {
                out.push_str(&pending_ws);
                pending_ws.clear();
                between_tags = false;
                out.push(c);
            }
        }
    }
    out.push_str(&pending_ws);
    out
}
