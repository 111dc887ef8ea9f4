//! Splits slide body text into slide-sized groups of bullet fragments.
//!
//! Text is treated as `". "`-delimited sentences. Fragments accumulate into a
//! chunk until one of three limits would be crossed: bullets per chunk, 50
//! cumulative words, or a single fragment longer than 20 words. Oversized
//! fragments skip the accumulator and get one chunk per sentence.

pub const DEFAULT_MAX_BULLETS: usize = 4;
const MAX_CHUNK_WORDS: usize = 50;
const MAX_FRAGMENT_WORDS: usize = 20;

/// An ordered group of sentence fragments rendered on one slide page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub fragments: Vec<String>,
}

impl Chunk {
    /// A chunk holding one fragment as-is. Title slides always map to this.
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            fragments: vec![text.into()],
        }
    }

    pub fn word_count(&self) -> usize {
        self.fragments.iter().map(|f| word_count(f)).sum()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_bullets: usize,
}

impl Chunker {
    pub fn new() -> Self {
        Self {
            max_bullets: DEFAULT_MAX_BULLETS,
        }
    }

    pub fn with_max_bullets(max_bullets: usize) -> Self {
        Self { max_bullets }
    }

    /// Convert free text into an ordered list of chunks.
    ///
    /// Every fragment of the input ends up in exactly one chunk, in input
    /// order. Empty input produces no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let fragments = split_fragments(text);

        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_words = 0;

        for fragment in fragments {
            let words = word_count(&fragment);

            if current.len() >= self.max_bullets
                || current_words + words > MAX_CHUNK_WORDS
                || words > MAX_FRAGMENT_WORDS
            {
                if !current.is_empty() {
                    chunks.push(Chunk {
                        fragments: std::mem::take(&mut current),
                    });
                    current_words = 0;
                }

                if words > MAX_FRAGMENT_WORDS {
                    // One page per sentence, never merged with neighbors.
                    for sentence in fragment.split_inclusive(". ") {
                        let sentence = sentence.trim();
                        if !sentence.is_empty() {
                            chunks.push(Chunk::single(sentence));
                        }
                    }
                    continue;
                }
            }

            current_words += words;
            current.push(fragment);
        }

        if !current.is_empty() {
            chunks.push(Chunk { fragments: current });
        }

        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text on `". "`, drop empty fragments, and make each fragment end
/// with a period.
pub fn split_fragments(text: &str) -> Vec<String> {
    text.split(". ")
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            if fragment.ends_with('.') {
                fragment.to_string()
            } else {
                format!("{fragment}.")
            }
        })
        .collect()
}

fn word_count(fragment: &str) -> usize {
    fragment.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(chunks: &[Chunk]) -> Vec<String> {
        chunks
            .iter()
            .flat_map(|chunk| chunk.fragments.iter().cloned())
            .collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(Chunker::new().chunk("").is_empty());
        assert!(Chunker::new().chunk("   ").is_empty());
    }

    #[test]
    fn short_points_share_one_chunk() {
        let chunks = Chunker::new().chunk("A short point. Another short point. A third one.");

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].fragments,
            vec![
                "A short point.".to_string(),
                "Another short point.".to_string(),
                "A third one.".to_string(),
            ]
        );
    }

    #[test]
    fn normalizes_missing_period() {
        let chunks = Chunker::new().chunk("No period here");
        assert_eq!(chunks[0].fragments, vec!["No period here.".to_string()]);
    }

    #[test]
    fn trailing_delimiter_leaves_no_empty_fragment() {
        let chunks = Chunker::new().chunk("Only one. ");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].fragments, vec!["Only one.".to_string()]);
    }

    #[test]
    fn max_bullets_starts_a_new_chunk() {
        let text = "One one. Two two. Three three. Four four. Five five. Six six.";
        let chunks = Chunker::new().chunk(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].fragments.len(), 4);
        assert_eq!(chunks[1].fragments.len(), 2);
    }

    #[test]
    fn word_budget_starts_a_new_chunk() {
        let sentence = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let text = vec![sentence; 6].join(". ");
        let chunks = Chunker::with_max_bullets(10).chunk(&text);

        // Ten words per fragment, so the budget allows five per chunk.
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].fragments.len(), 5);
        assert_eq!(chunks[1].fragments.len(), 1);
    }

    #[test]
    fn long_fragment_forms_its_own_chunk() {
        let long = "one two three four five six seven eight nine ten eleven twelve \
                    thirteen fourteen fifteen sixteen seventeen eighteen nineteen \
                    twenty twentyone twentytwo twentythree twentyfour twentyfive";
        let text = format!("Short one. {long}. Short two.");
        let chunks = Chunker::new().chunk(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].fragments, vec!["Short one.".to_string()]);
        assert_eq!(chunks[1].fragments.len(), 1);
        assert!(chunks[1].fragments[0].starts_with("one two"));
        assert_eq!(chunks[2].fragments, vec!["Short two.".to_string()]);
    }

    #[test]
    fn twenty_word_fragment_still_accumulates() {
        let sentence = "w1 w2 w3 w4 w5 w6 w7 w8 w9 w10 w11 w12 w13 w14 w15 w16 w17 w18 w19 w20";
        let chunks = Chunker::new().chunk(&format!("{sentence}. Tail point."));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].fragments.len(), 2);
    }

    #[test]
    fn order_and_content_survive_chunking() {
        let text = "First idea. Second idea. Third idea here. Fourth idea. Fifth idea.";
        let chunks = Chunker::new().chunk(text);

        assert_eq!(flatten(&chunks), split_fragments(text));
    }

    #[test]
    fn title_helper_keeps_full_text() {
        let chunk = Chunk::single("Welcome to the talk");
        assert_eq!(chunk.fragments, vec!["Welcome to the talk".to_string()]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn sentence_strategy() -> impl Strategy<Value = String> {
            prop::collection::vec("[a-z]{1,8}", 1..30).prop_map(|words| words.join(" "))
        }

        fn text_strategy() -> impl Strategy<Value = String> {
            prop::collection::vec(sentence_strategy(), 0..12)
                .prop_map(|sentences| sentences.join(". "))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn prop_fragments_covered_in_order(text in "[a-zA-Z0-9,.!? ]{0,300}") {
                let chunks = Chunker::new().chunk(&text);
                prop_assert_eq!(flatten(&chunks), split_fragments(&text));
            }

            #[test]
            fn prop_chunk_bounds_hold(text in text_strategy(), max_bullets in 1usize..8) {
                let chunks = Chunker::with_max_bullets(max_bullets).chunk(&text);

                for chunk in &chunks {
                    prop_assert!(!chunk.fragments.is_empty());
                    prop_assert!(chunk.fragments.len() <= max_bullets);

                    // Only a single oversized fragment may blow the word budget.
                    if chunk.word_count() > 50 {
                        prop_assert_eq!(chunk.fragments.len(), 1);
                        prop_assert!(chunk.word_count() > 20);
                    }
                }
            }

            #[test]
            fn prop_empty_only_for_empty_input(text in text_strategy()) {
                let chunks = Chunker::new().chunk(&text);
                prop_assert_eq!(chunks.is_empty(), split_fragments(&text).is_empty());
            }
        }
    }
}
