// src/text/segment.rs
//! Sentence segmentation.
//!
//! A boundary is a run of terminal punctuation (`.`, `!`, `?`, `…`) plus any closing
//! quotes/brackets, followed by whitespace and then an upper-case letter, a digit or an
//! opening quote/bracket (or the end of the text). A blank line is always a boundary.
//!
//! Periods after known abbreviations ("Dr.", "Jan."), single-letter initials ("J. K.")
//! and dotted acronyms ("U.S.") are not boundaries. Decimals never are, because the
//! period is not followed by whitespace.
//!
//! Every non-whitespace character of the input ends up in exactly one sentence, in
//! order. Only surrounding whitespace is trimmed.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "gen", "gov", "sen", "rep",
        "col", "capt", "lt", "sgt", "hon", "rev", "pres", "supt", "insp", "vs", "fig",
        "approx", "dept", "govt", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
        "sept", "oct", "nov", "dec",
    ]
    .into_iter()
    .collect()
});

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '…')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '”' | '’' | ')' | ']')
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit() || matches!(c, '"' | '\'' | '“' | '‘' | '(' | '[')
}

/// Split `text` into trimmed, non-empty sentences in original order.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if c == '\n' && blank_line_follows(&chars, i) {
            push_trimmed(&mut out, &text[start..pos]);
            start = pos;
            i += 1;
            continue;
        }

        if !is_terminal(c) {
            i += 1;
            continue;
        }

        // Swallow the whole terminal run and any closing quotes/brackets.
        let mut j = i + 1;
        while j < chars.len() && (is_terminal(chars[j].1) || is_closing(chars[j].1)) {
            j += 1;
        }
        let end = chars.get(j).map_or(text.len(), |&(p, _)| p);

        if j < chars.len() && !chars[j].1.is_whitespace() {
            i = j;
            continue;
        }

        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }
        let next_opens = k >= chars.len() || opens_sentence(chars[k].1);

        let next = chars.get(k).map(|&(_, n)| n);
        if next_opens && !(c == '.' && is_abbreviation(&text[start..pos], next)) {
            push_trimmed(&mut out, &text[start..end]);
            start = end;
        }
        i = j;
    }

    push_trimmed(&mut out, &text[start..]);
    out
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let t = piece.trim();
    if !t.is_empty() {
        out.push(t.to_string());
    }
}

/// True if the newline at `i` is followed (after horizontal whitespace) by another one.
fn blank_line_follows(chars: &[(usize, char)], i: usize) -> bool {
    chars[i + 1..]
        .iter()
        .map(|&(_, c)| c)
        .take_while(|c| c.is_whitespace())
        .any(|c| c == '\n')
}

/// Inspect the word immediately before a period (`head` ends right before it).
/// `next` is the first character after the following whitespace.
fn is_abbreviation(head: &str, next: Option<char>) -> bool {
    let word = head
        .rsplit(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '“')
        .next()
        .unwrap_or("");
    if word.is_empty() {
        return false;
    }

    // Dotted acronyms and e.g./i.e.: every part is at most two letters.
    if word.contains('.') {
        return word
            .split('.')
            .all(|part| part.chars().count() <= 2 && part.chars().all(char::is_alphabetic));
    }

    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        if first.is_uppercase() {
            return true;
        }
    }

    // "No. 10" but not "he said no. The vote failed."
    if word == "No" {
        return next.is_some_and(|c| c.is_ascii_digit());
    }

    ABBREVIATIONS.contains(word.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_ws(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        let s = split_sentences("The market fell. Was it panic? No! Traders stayed calm.");
        assert_eq!(
            s,
            vec![
                "The market fell.",
                "Was it panic?",
                "No!",
                "Traders stayed calm."
            ]
        );
    }

    #[test]
    fn keeps_decimals_abbreviations_and_initials() {
        let s = split_sentences(
            "Dr. Rao said GDP grew 7.2 percent. J. K. Rowling agreed with the U.S. Treasury. Done.",
        );
        assert_eq!(
            s,
            vec![
                "Dr. Rao said GDP grew 7.2 percent.",
                "J. K. Rowling agreed with the U.S. Treasury.",
                "Done."
            ]
        );
    }

    #[test]
    fn lowercase_continuation_is_not_a_boundary() {
        let s = split_sentences("Prices rose etc. and then fell. Next sentence.");
        assert_eq!(s, vec!["Prices rose etc. and then fell.", "Next sentence."]);
    }

    #[test]
    fn number_abbreviation_needs_capital_and_digit() {
        let s = split_sentences("The minister said no. The vote failed. It was bill No. 12 again.");
        assert_eq!(
            s,
            vec!["The minister said no.", "The vote failed.", "It was bill No. 12 again."]
        );
        let s = split_sentences("Asked about it, he said No. Nobody pressed him.");
        assert_eq!(s, vec!["Asked about it, he said No.", "Nobody pressed him."]);
    }

    #[test]
    fn closing_quotes_stay_with_their_sentence() {
        let s = split_sentences("He said \"we will win.\" The crowd cheered.");
        assert_eq!(s, vec!["He said \"we will win.\"", "The crowd cheered."]);
    }

    #[test]
    fn blank_lines_split_and_trailing_fragment_kept() {
        let s = split_sentences("Headline without stop\n\n  Body starts here. tail fragment");
        assert_eq!(s, vec!["Headline without stop", "Body starts here. tail fragment"]);
    }

    #[test]
    fn partition_of_non_whitespace_content() {
        let text = "  One. Two!  Three?\n\nFour…  Five 3.5% (approx.) Six. ";
        let s = split_sentences(text);
        assert!(s.iter().all(|x| !x.is_empty() && x.trim() == x));
        assert_eq!(non_ws(&s.concat()), non_ws(text));
    }

    #[test]
    fn whitespace_only_yields_nothing() {
        assert!(split_sentences(" \n\t ").is_empty());
    }
}
