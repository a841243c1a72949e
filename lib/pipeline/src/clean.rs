use celebmatch_core::TextCleaner;
use regex::Regex;
use std::collections::BTreeMap;

/// Emoticon -> word table embedded at compile time.
const EMOTICON_TABLE: &str = include_str!("emoticons.json");

/// Deterministic tweet normalization.
///
/// Strips @mentions, URLs, hashtags, retweet markers, stray HTML ampersand
/// entities and `'s` suffixes, replaces known emoticons with their word
/// equivalents, drops emoji codepoints and collapses whitespace.
pub struct TweetCleaner {
    strip: Regex,
    spaces: Regex,
    emoticons: BTreeMap<String, String>,
}

impl TweetCleaner {
    pub fn new() -> Self {
        // One alternation, mirroring the order the patterns were curated in:
        // mentions, urls, 's, hashtags, &amp, RT markers, bare www links.
        let strip = Regex::new(
            r"@[^ ]+|https?://[A-Za-z0-9./?=_&%#-]+|'s\b|#\w+|&amp;?\s|\bRT\b|www\.\S+",
        )
        .expect("strip pattern is valid");
        let spaces = Regex::new(r"\s+").expect("spaces pattern is valid");
        let emoticons: BTreeMap<String, String> =
            serde_json::from_str(EMOTICON_TABLE).expect("emoticon table is valid JSON");

        Self {
            strip,
            spaces,
            emoticons,
        }
    }

    fn replace_emoticons(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (emoticon, word) in &self.emoticons {
            if out.contains(emoticon.as_str()) {
                out = out.replace(emoticon.as_str(), &format!(" {word} "));
            }
        }
        out
    }

    fn strip_emoji(text: &str) -> String {
        text.chars()
            .map(|c| if is_emoji(c) { ' ' } else { c })
            .collect()
    }
}

impl Default for TweetCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCleaner for TweetCleaner {
    fn clean(&self, text: &str) -> String {
        let stripped = self.strip.replace_all(text, "");
        let with_words = self.replace_emoticons(&stripped);
        let no_emoji = Self::strip_emoji(&with_words);
        self.spaces.replace_all(&no_emoji, " ").trim().to_string()
    }
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF    // pictographs, symbols, transport, supplement
        | 0x2600..=0x27BF    // misc symbols and dingbats
        | 0x2190..=0x21FF    // arrows
        | 0x2B00..=0x2BFF    // misc symbols and arrows
        | 0xFE00..=0xFE0F    // variation selectors
        | 0x200D             // zero-width joiner
        | 0x20E3             // combining keycap
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> TweetCleaner {
        TweetCleaner::new()
    }

    #[test]
    fn test_strips_mentions_and_hashtags() {
        assert_eq!(
            cleaner().clean("@someone check this #rust post"),
            "check this post"
        );
    }

    #[test]
    fn test_strips_urls() {
        assert_eq!(
            cleaner().clean("read https://example.com/a?b=c now"),
            "read now"
        );
        assert_eq!(cleaner().clean("see www.example.com please"), "see please");
    }

    #[test]
    fn test_strips_retweet_marker() {
        // The mention pattern runs to the next space, so "@user:" goes too.
        assert_eq!(cleaner().clean("RT @user: hello world"), "hello world");
    }

    #[test]
    fn test_replaces_emoticons() {
        assert_eq!(cleaner().clean("great job :)"), "great job happy");
        assert_eq!(cleaner().clean("so sad :("), "so sad sad");
    }

    #[test]
    fn test_drops_emoji() {
        assert_eq!(cleaner().clean("party \u{1F389} time"), "party time");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(cleaner().clean("  a \t b \n c  "), "a b c");
    }

    #[test]
    fn test_is_deterministic() {
        let c = cleaner();
        let input = "RT @x: big news https://t.co/x #wow :)";
        assert_eq!(c.clean(input), c.clean(input));
    }

    #[test]
    fn test_pure_noise_cleans_to_empty() {
        assert_eq!(cleaner().clean("@a @b https://t.co/x #tag"), "");
    }
}
