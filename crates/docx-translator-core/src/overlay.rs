//! Dictionary overlay: whole-word phrase substitution.
//!
//! Used to pre-normalize text before it reaches the remote provider and as
//! the only translation when the provider fails.

use crate::dictionary::PhraseDictionary;

/// A span of the input claimed by one dictionary entry.
#[derive(Debug, Clone, Copy)]
struct Claim {
    start: usize,
    end: usize,
    entry: usize,
}

impl Claim {
    const fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// Replace every whole-word, case-insensitive occurrence of each dictionary
/// phrase with its target phrase.
///
/// Entries are tried in dictionary order and all matching happens against
/// the original input, so text produced by one replacement is never matched
/// again by a later entry. Unmatched text is left untouched.
pub fn apply(text: &str, dictionary: &PhraseDictionary) -> String {
    let mut claims: Vec<Claim> = Vec::new();

    for (entry_idx, entry) in dictionary.entries().iter().enumerate() {
        let mut pos = 0;
        while pos < text.len() {
            let Some(found) = entry.pattern().find_at(text, pos) else {
                break;
            };
            if found.is_empty() {
                break;
            }

            if claims.iter().any(|c| c.overlaps(found.start(), found.end())) {
                // Retry from the next character; a later occurrence may be free
                pos = found.start()
                    + text[found.start()..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
            } else {
                claims.push(Claim {
                    start: found.start(),
                    end: found.end(),
                    entry: entry_idx,
                });
                pos = found.end();
            }
        }
    }

    if claims.is_empty() {
        return text.to_string();
    }

    claims.sort_unstable_by_key(|c| c.start);

    let entries = dictionary.entries();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for claim in &claims {
        out.push_str(&text[cursor..claim.start]);
        out.push_str(entries[claim.entry].target());
        cursor = claim.end;
    }
    out.push_str(&text[cursor..]);
    out
}
