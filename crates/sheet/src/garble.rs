//! Repair of text that was UTF-8 but got decoded as Windows-1252 / Latin-1.

/// Literal replacements, applied left to right.
///
/// Longer sequences come before any sequence that is a prefix of them.
pub const GARBLE_REPLACEMENTS: &[(&str, &str)] = &[
    // quotes, dashes, ellipsis
    ("â€œ", "“"),
    ("â€˜", "‘"),
    ("â€™", "’"),
    ("â€“", "–"),
    ("â€”", "—"),
    ("â€¦", "…"),
    ("â€\u{9d}", "”"),
    ("â€", "”"),
    ("â’", "−"),
    // math symbols
    ("Ã—", "×"),
    ("Ã·", "÷"),
    // accented latin letters
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ãª", "ê"),
    ("Ã¡", "á"),
    ("Ã ", "à"),
    ("Ã¢", "â"),
    ("Ã¤", "ä"),
    ("Ã¶", "ö"),
    ("Ã¼", "ü"),
    ("Ã±", "ñ"),
    ("Ã§", "ç"),
    ("Ã³", "ó"),
    ("Ãº", "ú"),
    ("Ã\u{ad}", "í"),
    // stray non-breaking space prefixes
    ("Â\u{a0}", " "),
    ("Â ", " "),
    ("Â", ""),
    ("\u{a0}", " "),
];

/// Replace every known garble sequence in `input`.
///
/// The replacement list is applied until nothing changes, so the result is
/// a fixpoint: `fix_garble(&fix_garble(s)) == fix_garble(s)`. Every
/// replacement is shorter than its pattern, which bounds the loop.
#[must_use]
pub fn fix_garble(input: &str) -> String {
    let mut s = input.to_string();
    loop {
        let before = s.len();
        for (from, to) in GARBLE_REPLACEMENTS {
            if s.contains(from) {
                s = s.replace(from, to);
            }
        }
        if s.len() == before {
            return s;
        }
    }
}
