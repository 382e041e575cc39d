// src/analyze/ner.rs
//! Rule-based named-entity recognition for people, places and organizations.
//!
//! The recognizer walks runs of capitalized words (allowing lower-case connectors such
//! as "of" between them, e.g. "Reserve Bank of India") and classifies each run with the
//! lexicon in `data/ner_lexicon.json`:
//! - organization: run ends with an org suffix ("Ltd", "Ministry") or starts with an org
//!   head ("University of ..."), or is a bare acronym ("ISRO")
//! - person: run starts with honorifics/titles ("Dr.", "Prime Minister") followed by a
//!   name, or is a 2-4 word name introduced by "according to" / followed by a speech verb
//! - place: gazetteer hit, place suffix ("Uttar Pradesh", "Hudson River"), or a known
//!   place acronym ("US", "UAE")
//!
//! Leading sentence-start stopwords ("The", "In") and calendar words are trimmed from
//! runs before classification.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;

use crate::text::tokenize::{is_stopword, normalize_word, tokenize, Token};

#[derive(Debug, Deserialize)]
struct RawLexicon {
    honorifics: Vec<String>,
    titles: Vec<String>,
    speech_verbs: Vec<String>,
    org_heads: Vec<String>,
    org_suffixes: Vec<String>,
    acronym_stoplist: Vec<String>,
    place_acronyms: Vec<String>,
    place_suffixes: Vec<String>,
    calendar: Vec<String>,
    places: Vec<String>,
}

#[derive(Debug)]
struct Lexicon {
    honorifics: HashSet<String>,
    titles: HashSet<String>,
    speech_verbs: HashSet<String>,
    org_heads: HashSet<String>,
    org_suffixes: HashSet<String>,
    acronym_stoplist: HashSet<String>,
    place_acronyms: HashSet<String>,
    place_suffixes: HashSet<String>,
    calendar: HashSet<String>,
    places: HashSet<String>,
}

fn set(items: Vec<String>) -> HashSet<String> {
    items.into_iter().collect()
}

static LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    let raw = include_str!("../../data/ner_lexicon.json");
    let raw: RawLexicon = serde_json::from_str(raw).expect("valid NER lexicon");
    Lexicon {
        honorifics: set(raw.honorifics),
        titles: set(raw.titles),
        speech_verbs: set(raw.speech_verbs),
        org_heads: set(raw.org_heads),
        org_suffixes: set(raw.org_suffixes),
        acronym_stoplist: set(raw.acronym_stoplist),
        place_acronyms: set(raw.place_acronyms),
        place_suffixes: set(raw.place_suffixes),
        calendar: set(raw.calendar),
        places: set(raw.places),
    }
});

const CONNECTORS: &[&str] = &["of", "for", "de", "da", "del", "la", "von", "van", "bin"];

/// Entities found in a text, each list deduplicated and in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities {
    pub people: Vec<String>,
    pub places: Vec<String>,
    pub organizations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Person,
    Place,
    Organization,
}

/// A capitalized run: token index range `[first, last]` into the token list.
#[derive(Debug)]
struct Run<'a> {
    words: Vec<&'a str>,
    first: usize,
    last: usize,
}

pub fn recognize(text: &str) -> Entities {
    let tokens = tokenize(text);
    let mut out = Entities::default();
    let mut seen: HashSet<(Kind, String)> = HashSet::new();

    for run in capitalized_runs(text, &tokens) {
        let Some((kind, name)) = classify(text, &tokens, &run) else {
            continue;
        };
        if !seen.insert((kind, name.clone())) {
            continue;
        }
        match kind {
            Kind::Person => out.people.push(name),
            Kind::Place => out.places.push(name),
            Kind::Organization => out.organizations.push(name),
        }
    }
    out
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn is_acronym(word: &str) -> bool {
    let n = word.chars().count();
    (2..=6).contains(&n) && word.chars().all(|c| c.is_ascii_uppercase())
}

/// Capitalized first letter, rest lower-case letters or apostrophes/hyphens.
fn is_name_shaped(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next().is_some_and(char::is_uppercase)
        && chars.all(|c| c.is_lowercase() || matches!(c, '\'' | '’' | '-'))
}

fn strip_possessive(word: &str) -> (&str, bool) {
    for suffix in ["'s", "’s"] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return (stem, true);
        }
    }
    (word, false)
}

/// Tokens are joinable when only whitespace separates them; a period is also allowed
/// after an honorific abbreviation ("Dr. Rao").
fn joinable(text: &str, prev: &Token<'_>, next: &Token<'_>) -> bool {
    let gap = &text[prev.end..next.start];
    if gap.is_empty() {
        return false;
    }
    if gap.chars().all(char::is_whitespace) {
        return true;
    }
    LEXICON.honorifics.contains(prev.text)
        && gap.starts_with('.')
        && gap.len() > 1
        && gap[1..].chars().all(char::is_whitespace)
}

fn capitalized_runs<'a>(text: &str, tokens: &[Token<'a>]) -> Vec<Run<'a>> {
    let mut runs = Vec::new();
    let mut i = 0usize;

    while i < tokens.len() {
        if !is_capitalized(tokens[i].text) {
            i += 1;
            continue;
        }

        let mut words = Vec::new();
        let first = i;
        let mut last = i;
        loop {
            let (word, possessive) = strip_possessive(tokens[last].text);
            words.push(word);
            if possessive {
                break;
            }
            let Some(next) = tokens.get(last + 1) else {
                break;
            };
            if !joinable(text, &tokens[last], next) {
                break;
            }
            if is_capitalized(next.text) {
                last += 1;
                continue;
            }
            // Lower-case connector, only if a capitalized word follows it.
            let after = tokens.get(last + 2);
            let bridges = CONNECTORS.contains(&next.text)
                && after.is_some_and(|a| is_capitalized(a.text) && joinable(text, next, a));
            if !bridges {
                break;
            }
            words.push(next.text);
            last += 2;
        }

        runs.push(Run { words, first, last });
        i = last + 1;
    }
    runs
}

fn trim_run<'r, 'a>(run: &'r Run<'a>) -> &'r [&'a str] {
    let mut words = &run.words[..];
    while let Some((head, rest)) = words.split_first() {
        let sentence_start_word = !is_acronym(head) && is_stopword(&normalize_word(head));
        if sentence_start_word || LEXICON.calendar.contains(*head) {
            words = rest;
        } else {
            break;
        }
    }
    while let Some((tail, rest)) = words.split_last() {
        if LEXICON.calendar.contains(*tail) || CONNECTORS.contains(tail) {
            words = rest;
        } else {
            break;
        }
    }
    words
}

fn classify(text: &str, tokens: &[Token<'_>], run: &Run<'_>) -> Option<(Kind, String)> {
    let words = trim_run(run);
    let (&head, &tail) = (words.first()?, words.last()?);
    let joined = words.join(" ");
    let lex = &*LEXICON;

    if words.len() >= 2 && (lex.org_suffixes.contains(tail) || lex.org_heads.contains(head)) {
        return Some((Kind::Organization, joined));
    }

    if words.len() == 1 && is_acronym(head) {
        if lex.place_acronyms.contains(head) {
            return Some((Kind::Place, joined));
        }
        if lex.acronym_stoplist.contains(head) {
            return None;
        }
        return Some((Kind::Organization, joined));
    }

    // Honorifics and titles in front of a name.
    let prefix = words
        .iter()
        .take_while(|w| lex.honorifics.contains(**w) || lex.titles.contains(**w))
        .count();
    if prefix > 0 && prefix < words.len() {
        let name = &words[prefix..];
        if name.len() <= 4 && name.iter().all(|w| is_name_shaped(w)) {
            return Some((Kind::Person, name.join(" ")));
        }
    }

    if lex.places.contains(&joined)
        || lex.place_acronyms.contains(&joined)
        || (words.len() >= 2 && lex.place_suffixes.contains(tail))
    {
        return Some((Kind::Place, joined));
    }

    let plain_name = (2..=4).contains(&words.len())
        && words.iter().all(|w| is_name_shaped(w) && !lex.places.contains(*w));
    if plain_name
        && (followed_by_speech_verb(text, tokens, run) || after_according_to(text, tokens, run))
    {
        return Some((Kind::Person, joined));
    }

    None
}

fn followed_by_speech_verb(text: &str, tokens: &[Token<'_>], run: &Run<'_>) -> bool {
    let Some(next) = tokens.get(run.last + 1) else {
        return false;
    };
    let gap = &text[tokens[run.last].end..next.start];
    gap.chars().all(|c| c.is_whitespace() || c == ',')
        && LEXICON.speech_verbs.contains(&normalize_word(next.text))
}

fn after_according_to(text: &str, tokens: &[Token<'_>], run: &Run<'_>) -> bool {
    let head = text[..tokens[run.first].start].trim_end().to_lowercase();
    head.ends_with("according to")
}
