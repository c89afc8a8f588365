/// Convert text to title case.
///
/// Every alphabetic character that follows a non-alphabetic one (or starts the
/// text) is upper-cased, every other alphabetic character is lower-cased.
/// Non-alphabetic characters pass through unchanged, so separators and
/// whitespace keep their positions.
///
/// A word-initial character whose upper-case form is several letters keeps
/// only the first of them capitalized (`ﬂ` gives `Fl`, `ß` gives `Ss`). Word
/// boundaries are decided on the emitted text, so the result is a fixed point:
/// `title_case(title_case(s)) == title_case(s)`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;

    for c in text.chars() {
        if !c.is_alphabetic() {
            out.push(c);
            word_start = true;
            continue;
        }

        if word_start {
            let mut upper = c.to_uppercase();
            if let Some(first) = upper.next() {
                out.push(first);
            }
            for rest in upper {
                out.extend(rest.to_lowercase());
            }
        } else {
            out.extend(c.to_lowercase());
        }

        // Some mappings end in a combining mark ("İ" lower-cases to "i\u{307}")
        word_start = out.chars().next_back().is_some_and(|last| !last.is_alphabetic());
    }

    out
}

/// Canonical form of a single ingredient name: surrounding whitespace trimmed,
/// then title-cased.
pub fn canonicalize(name: &str) -> String {
    title_case(name.trim())
}
