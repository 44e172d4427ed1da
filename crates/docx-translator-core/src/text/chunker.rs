//! Sentence-aligned chunking of source text.
//!
//! Chunks are the unit of translation: each one becomes a single provider
//! request and a single section of the output document.

/// Characters that end a sentence. Runs of them count as one boundary.
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// A bounded, sentence-aligned slice of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the document, starting at 1
    pub index: usize,
    /// Sentences joined by single spaces, terminators removed
    pub text: String,
    /// Length of `text` in characters (not bytes)
    pub char_count: usize,
}

impl Chunk {
    fn new(index: usize, text: String) -> Self {
        let char_count = text.chars().count();
        Self {
            index,
            text,
            char_count,
        }
    }
}

/// Split text into trimmed, non-empty sentences.
///
/// Terminators are dropped, so `"Oui... Non!"` yields `["Oui", "Non"]`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Sentences are accumulated greedily, joined with a single space. A sentence
/// that alone exceeds `max_chars` is emitted whole as its own chunk. Empty
/// input yields no chunks.
pub fn split(text: &str, max_chars: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let sentence_len = sentence.chars().count();
        let joined_len = if current.is_empty() {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };

        if joined_len > max_chars && !current.is_empty() {
            let index = chunks.len() + 1;
            chunks.push(Chunk::new(index, std::mem::take(&mut current)));
            current.push_str(sentence);
            current_len = sentence_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
            current_len = joined_len;
        }
    }

    // Don't forget the last chunk
    if !current.is_empty() {
        let index = chunks.len() + 1;
        chunks.push(Chunk::new(index, current));
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_empty_input_gives_no_chunks() {
        assert!(split("", 100).is_empty());
        assert!(split("   \n\t ", 100).is_empty());
        assert!(split("...!?", 100).is_empty());
    }

    #[test]
    fn test_short_sentences_merge_into_one_chunk() {
        let chunks = split("Bonjour. Comment ça va?", 4000);
        assert_eq!(texts(&chunks), vec!["Bonjour Comment ça va"]);
        assert_eq!(chunks[0].index, 1);
        assert_eq!(chunks[0].char_count, 21);
    }

    #[test]
    fn test_oversized_sentences_are_kept_whole() {
        let chunks = split("Bonjour. Comment allez-vous aujourd'hui?", 10);
        assert_eq!(texts(&chunks), vec!["Bonjour", "Comment allez-vous aujourd'hui"]);
        assert_eq!(chunks[1].index, 2);
        assert!(chunks[1].char_count > 10);
    }

    #[test]
    fn test_terminator_runs_are_one_boundary() {
        let sentences = split_sentences("Quoi?!... Vraiment!!! Oui.");
        assert_eq!(sentences, vec!["Quoi", "Vraiment", "Oui"]);
    }

    #[test]
    fn test_joining_space_counts_toward_limit() {
        // "abcd" + " " + "efghi" = 10 chars fits exactly, one more does not
        assert_eq!(texts(&split("abcd. efghi.", 10)), vec!["abcd efghi"]);
        assert_eq!(texts(&split("abcd. efghij.", 10)), vec!["abcd", "efghij"]);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        // 5 accented characters are 10 bytes in UTF-8
        let chunks = split("ééééé. ààààà.", 11);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].char_count, 11);
    }

    #[test]
    fn test_sentences_are_neither_dropped_nor_duplicated() {
        let text = "Un. Deux deux! Trois trois trois? Quatre. Cinq cinq cinq cinq. Six.";
        for max in [1, 5, 12, 20, 40, 1000] {
            let chunks = split(text, max);
            let rejoined: Vec<&str> = chunks
                .iter()
                .flat_map(|c| c.text.split(' '))
                .collect();
            let expected: Vec<&str> = split_sentences(text)
                .into_iter()
                .flat_map(|s| s.split(' '))
                .collect();
            assert_eq!(rejoined, expected, "max = {max}");
        }
    }

    #[test]
    fn test_chunks_respect_limit_unless_single_sentence() {
        let text = "Le chat dort. La pluie tombe doucement sur la ville endormie. Oui. \
                    Nous partirons demain matin. Il fait beau!";
        for max in [8, 15, 30, 60] {
            for chunk in split(text, max) {
                let single_sentence = split_sentences(text).contains(&chunk.text.as_str());
                assert!(
                    chunk.char_count <= max || single_sentence,
                    "chunk {:?} exceeds {max}",
                    chunk.text
                );
            }
        }
    }

    #[test]
    fn test_indices_are_sequential() {
        let chunks = split("A. B. C. D.", 1);
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }
}
