//! Greedy word wrap measured in terminal columns.
//!
//! The output matches classic byte-oriented word wrap for plain ASCII, but
//! widths are counted per grapheme cluster so that wide characters and
//! joined emoji sequences are measured the way a terminal draws them and are
//! never split.

use crate::unicode::{display_width, grapheme_width};
use unicode_segmentation::UnicodeSegmentation;

/// Column width used by [`wrap_default`].
pub const DEFAULT_WRAP_WIDTH: usize = 75;

/// Wrap `text` so that no line exceeds `width` columns where possible.
///
/// Existing occurrences of `break_str` are hard breaks and each resulting
/// line is wrapped on its own. Lines are split on single spaces and packed
/// greedily. A word wider than `width` stays whole unless `cut_long_words`
/// is set, in which case it is split into chunks of at most `width` columns
/// on grapheme boundaries.
///
/// ```
/// use promptkit_core::wrap::wrap;
///
/// assert_eq!(wrap("The quick brown fox", 10, "\n", false), "The quick\nbrown fox");
/// ```
pub fn wrap(text: &str, width: usize, break_str: &str, cut_long_words: bool) -> String {
    if break_str.is_empty() {
        return text.to_string();
    }

    let mut result: Vec<String> = Vec::new();

    for original_line in text.split(break_str) {
        if display_width(original_line) <= width {
            result.push(original_line.to_string());
            continue;
        }

        let words: Vec<&str> = if cut_long_words {
            original_line
                .split(' ')
                .flat_map(|word| cut_word(word, width))
                .collect()
        } else {
            original_line.split(' ').collect()
        };

        let mut line: Option<String> = None;
        let mut line_width = 0;

        for word in words {
            let word_width = display_width(word);

            match line.as_mut() {
                None if word_width <= width => {
                    line = Some(word.to_string());
                    line_width = word_width;
                }
                Some(current) if line_width + 1 + word_width <= width => {
                    current.push(' ');
                    current.push_str(word);
                    line_width += 1 + word_width;
                }
                _ => {
                    // An overflowing first word starts the line on its own.
                    if let Some(done) = line.take() {
                        result.push(done);
                    }
                    line = Some(word.to_string());
                    line_width = word_width;
                }
            }
        }

        if let Some(last) = line.filter(|l| !l.is_empty()) {
            result.push(last);
        }
    }

    result.join(break_str)
}

/// [`wrap`] with the conventional 75 column width, `\n` breaks and no cutting.
pub fn wrap_default(text: &str) -> String {
    wrap(text, DEFAULT_WRAP_WIDTH, "\n", false)
}

/// Wrap and return the individual lines.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    wrap(text, width, "\n", true)
        .split('\n')
        .map(str::to_string)
        .collect()
}

/// Split a word into chunks of at most `width` columns.
///
/// An empty word stays a single empty chunk so that runs of spaces survive.
fn cut_word(word: &str, width: usize) -> Vec<&str> {
    if word.is_empty() {
        return vec![word];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chunk_width = 0;

    for (idx, grapheme) in word.grapheme_indices(true) {
        let w = grapheme_width(grapheme);
        if chunk_width + w > width && idx > start {
            chunks.push(&word[start..idx]);
            start = idx;
            chunk_width = 0;
        }
        chunk_width += w;
    }
    chunks.push(&word[start..]);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const STORY: &str = "This is a story all about how my life got flipped turned upside down and I'd like to take a minute just sit right there I'll tell you how I became the prince of a town called Bel-Air";
    const LONG_WORD_STORY: &str = "This is a story all about how my life got flippppppppppppppppppppppppped turned upside down and I'd like to take a minute just sit right there I'll tell you how I became the prince of a town called Bel-Air";

    /// Byte-oriented word wrap, used as the reference for ASCII input.
    fn byte_wordwrap(text: &str, width: usize, break_str: &str, cut: bool) -> String {
        let text = text.as_bytes();
        let brk = break_str.as_bytes();
        let len = text.len();

        if brk.len() == 1 && !cut {
            let mut out = text.to_vec();
            let (mut last_start, mut last_space) = (0usize, 0usize);
            for current in 0..len {
                if text[current] == brk[0] {
                    last_start = current + 1;
                    last_space = current + 1;
                } else if text[current] == b' ' {
                    if current - last_start >= width {
                        out[current] = brk[0];
                        last_start = current + 1;
                    }
                    last_space = current;
                } else if current - last_start >= width && last_start != last_space {
                    out[last_space] = brk[0];
                    last_start = last_space + 1;
                }
            }
            return String::from_utf8(out).unwrap();
        }

        let mut out: Vec<u8> = Vec::new();
        let (mut last_start, mut last_space) = (0usize, 0usize);
        let mut current = 0;
        while current < len {
            if text[current] == brk[0]
                && current + brk.len() < len
                && text[current..].starts_with(brk)
            {
                out.extend_from_slice(&text[last_start..current + brk.len()]);
                current += brk.len() - 1;
                last_start = current + 1;
                last_space = current + 1;
            } else if text[current] == b' ' {
                if current - last_start >= width {
                    out.extend_from_slice(&text[last_start..current]);
                    out.extend_from_slice(brk);
                    last_start = current + 1;
                }
                last_space = current;
            } else if current - last_start >= width && cut && last_start >= last_space {
                out.extend_from_slice(&text[last_start..current]);
                out.extend_from_slice(brk);
                last_start = current;
                last_space = current;
            } else if current - last_start >= width && last_start < last_space {
                out.extend_from_slice(&text[last_start..last_space]);
                out.extend_from_slice(brk);
                last_start = last_space + 1;
                last_space = last_start;
            }
            current += 1;
        }
        if last_start < len {
            out.extend_from_slice(&text[last_start..]);
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_matches_default_wordwrap() {
        let expected = "This is a story all about how my life got flipped turned upside down and\nI'd like to take a minute just sit right there I'll tell you how I became\nthe prince of a town called Bel-Air";
        assert_eq!(wrap_default(STORY), expected);
        assert_eq!(byte_wordwrap(STORY, 75, "\n", false), expected);
    }

    #[test]
    fn test_matches_on_shorter_lines() {
        let input = "This is a story all\nabout how my life got\nflipped turned upside down and I'd like to take a minute just sit right there I'll tell you how I became the prince of a town called Bel-Air";
        assert_eq!(wrap_default(input), byte_wordwrap(input, 75, "\n", false));
    }

    #[test]
    fn test_matches_on_blank_lines() {
        let input = "This is a story all about how my life got flipped turned upside down and I'd\n\nlike to take a minute just sit right there I'll tell you how I became the prince of a town called Bel-Air";
        let expected = "This is a story all about how my life got flipped turned upside down and\nI'd\n\nlike to take a minute just sit right there I'll tell you how I became the\nprince of a town called Bel-Air";
        assert_eq!(wrap_default(input), expected);
    }

    #[test]
    fn test_cut_long_words() {
        let expected = "This is a story all about\nhow my life got\nflipppppppppppppppppppppp\nppped turned upside down\nand I'd like to take a\nminute just sit right\nthere I'll tell you how I\nbecame the prince of a\ntown called Bel-Air";
        assert_eq!(wrap(LONG_WORD_STORY, 25, "\n", true), expected);
        assert_eq!(byte_wordwrap(LONG_WORD_STORY, 25, "\n", true), expected);
    }

    #[test]
    fn test_long_words_kept_whole_without_cut() {
        let expected = "This is a story all about\nhow my life got\nflippppppppppppppppppppppppped\nturned upside down and\nI'd like to take a minute\njust sit right there I'll\ntell you how I became the\nprince of a town called\nBel-Air";
        assert_eq!(wrap(LONG_WORD_STORY, 25, "\n", false), expected);
    }

    #[test]
    fn test_cut_short_sentence() {
        assert_eq!(
            wrap("A very long woooooooooooord.", 8, "\n", true),
            "A very\nlong\nwooooooo\nooooord."
        );
    }

    #[test]
    fn test_overflowing_first_word_has_no_empty_line() {
        assert_eq!(wrap("abcdefgh ij", 5, "\n", false), "abcdefgh\nij");
    }

    #[test]
    fn test_trailing_space_kept_on_last_line() {
        assert_eq!(wrap("abc def ", 5, "\n", false), "abc\ndef ");
    }

    #[test]
    fn test_no_trailing_empty_line() {
        assert_eq!(wrap("abcde ", 5, "\n", false), "abcde");
    }

    #[test]
    fn test_custom_break_string() {
        assert_eq!(
            wrap("The quick brown fox", 10, "<br>", false),
            "The quick<br>brown fox"
        );
        assert_eq!(wrap("a<br>b", 10, "<br>", false), "a<br>b");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(wrap("", 10, "\n", false), "");
        assert_eq!(wrap("\n", 10, "\n", false), "\n");
    }

    #[test]
    fn test_multibyte_characters() {
        let input = "This is a story all about how my life got flippêd turnêd upsidê down and I'd likê to takê a minutê just sit right thêrê I'll têll you how I bêcamê thê princê of a town callêd Bêl-Air";
        let expected = "This is a story\nall about how my\nlife got flippêd\nturnêd upsidê down\nand I'd likê to\ntakê a minutê just\nsit right thêrê\nI'll têll you how\nI bêcamê thê\nprincê of a town\ncallêd Bêl-Air";
        assert_eq!(wrap(input, 18, "\n", false), expected);
    }

    #[test]
    fn test_emoji() {
        let input = "This is a 📖 all about how my life got 🌀 turned upside ⬇️ and I'd like to take a minute just sit right there I'll tell you how I became the prince of a town called Bel-Air";
        let expected = "This is a 📖\nall about how\nmy life got\n🌀 turned\nupside ⬇️ and\nI'd like to\ntake a minute\njust sit\nright there\nI'll tell you\nhow I became\nthe prince of\na town called\nBel-Air";
        assert_eq!(wrap(input, 13, "\n", false), expected);
    }

    #[test]
    fn test_emoji_and_multibyte_characters() {
        let input = "This is a 📖 all about how my lifê got 🌀 turnêd upsidê ⬇️ and I'd likê to takê a minutê just sit right thêrê I'll têll you how I bêcamê thê princê of a town callêd Bêl-Air";
        let expected = "This is a\n📖 all\nabout how\nmy lifê got\n🌀 turnêd\nupsidê ⬇️\nand I'd\nlikê to\ntakê a\nminutê just\nsit right\nthêrê I'll\ntêll you\nhow I\nbêcamê thê\nprincê of a\ntown callêd\nBêl-Air";
        assert_eq!(wrap(input, 11, "\n", false), expected);
    }

    #[test]
    fn test_combined_emoji_is_never_split() {
        let input = "This is a 📖 all about how my life got 🌀 turned upside ⬇️ and I'd like to take a minute just sit right there I'll tell you how I became the prince of a 👨‍👩‍👧‍👦 called Bel-Air";
        let expected = "This is a 📖\nall about how\nmy life got\n🌀 turned\nupside ⬇️ and\nI'd like to\ntake a minute\njust sit\nright there\nI'll tell you\nhow I became\nthe prince of\na 👨‍👩‍👧‍👦 called\nBel-Air";
        assert_eq!(wrap(input, 13, "\n", false), expected);
        assert_eq!(wrap(input, 13, "\n", true), expected);
    }

    #[test]
    fn test_cut_respects_grapheme_clusters() {
        let family = "👨\u{200d}👩\u{200d}👧\u{200d}👦";
        let word = format!("{family}{family}{family}");
        assert_eq!(
            wrap(&word, 4, "\n", true),
            format!("{family}{family}\n{family}")
        );
        assert_eq!(wrap("中文字符", 3, "\n", true), "中\n文\n字\n符");
    }

    #[test]
    fn test_wrap_lines() {
        assert_eq!(
            wrap_lines("The quick brown fox", 10),
            vec!["The quick".to_string(), "brown fox".to_string()]
        );
    }

    fn ascii_text() -> impl Strategy<Value = String> {
        let word = "[a-zA-Z0-9.,'!-]{1,14}";
        let separator = prop_oneof![4 => Just(" "), 1 => Just("\n")];
        (word, proptest::collection::vec((separator, word), 0..25)).prop_map(|(first, rest)| {
            let mut text = first;
            for (sep, word) in rest {
                text.push_str(sep);
                text.push_str(&word);
            }
            text
        })
    }

    proptest! {
        #[test]
        fn ascii_matches_byte_wordwrap(text in ascii_text(), width in 1usize..30, cut in any::<bool>()) {
            prop_assert_eq!(wrap(&text, width, "\n", cut), byte_wordwrap(&text, width, "\n", cut));
        }

        #[test]
        fn cut_lines_fit_width(text in ascii_text(), width in 1usize..30) {
            for line in wrap(&text, width, "\n", true).split('\n') {
                prop_assert!(display_width(line) <= width);
            }
        }
    }
}
