//! Shared word splitter (spec §4.4).
//!
//! Paragraph, list-item, definition-list, callout, and table cell wrapping
//! all flow through `split_words`. Plain whitespace-delimited splitting is
//! not enough on its own: a pathological single "word" (a long URL, a
//! hash, base64 blob) would never wrap, breaking layout determinism. Two
//! additional rules guarantee termination:
//!
//! * Tokens longer than 40 codepoints that look URL-ish (contain `://`,
//!   `.com`, `.org`, or `/`) are split at `{ '/', '?', '&', '=', '.', '-' }`,
//!   keeping the separator at the *start* of the following fragment.
//! * Other tokens longer than 30 codepoints are hard-broken every 25
//!   codepoints.
//!
//! Both thresholds operate on codepoint count, not byte length or grapheme
//! clusters, matching the termination guarantee in spec §8.

const URL_ISH_MARKERS: &[&str] = &["://", ".com", ".org"];
const URL_BREAK_CHARS: &[char] = &['/', '?', '&', '=', '.', '-'];
const URL_LEN_THRESHOLD: usize = 40;
const HARD_BREAK_THRESHOLD: usize = 30;
const HARD_BREAK_CHUNK: usize = 25;

/// Split `text` into words, breaking overlong tokens so no returned word
/// exceeds the hard-break chunk size (URL-ish tokens are a looser bound:
/// each fragment starts at a break character, but a single unbroken run
/// between break characters can still be long).
pub fn split_words(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for token in text.split_whitespace() {
        split_token_into(token, &mut out);
    }
    out
}

fn split_token_into(token: &str, out: &mut Vec<String>) {
    let len = token.chars().count();
    if len <= HARD_BREAK_THRESHOLD {
        out.push(token.to_string());
        return;
    }
    if len > URL_LEN_THRESHOLD && looks_url_ish(token) {
        split_url_ish(token, out);
        return;
    }
    if len > HARD_BREAK_THRESHOLD {
        hard_break(token, out);
        return;
    }
    out.push(token.to_string());
}

fn looks_url_ish(token: &str) -> bool {
    URL_ISH_MARKERS.iter().any(|m| token.contains(m)) || token.contains('/')
}

/// Split at `URL_BREAK_CHARS`, preserving each separator at the start of
/// the fragment that follows it so the concatenation of all returned
/// fragments reproduces `token` exactly (spec §8 round-trip property).
fn split_url_ish(token: &str, out: &mut Vec<String>) {
    let mut current = String::new();
    for c in token.chars() {
        if URL_BREAK_CHARS.contains(&c) && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
}

/// Break `token` into fixed-size chunks of `HARD_BREAK_CHUNK` codepoints.
fn hard_break(token: &str, out: &mut Vec<String>) {
    let chars: Vec<char> = token.chars().collect();
    for chunk in chars.chunks(HARD_BREAK_CHUNK) {
        out.push(chunk.iter().collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_pass_through_unchanged() {
        let words = split_words("hello world foo-bar");
        assert_eq!(words, vec!["hello", "world", "foo-bar"]);
    }

    #[test]
    fn overlong_non_url_token_is_hard_broken_every_25() {
        let token = "a".repeat(200);
        let words = split_words(&token);
        assert!(words.iter().all(|w| w.chars().count() <= 25));
        let rebuilt: String = words.concat();
        assert_eq!(rebuilt, token);
    }

    #[test]
    fn url_ish_token_splits_at_break_chars_and_round_trips() {
        let url = "https://example.com/a/very/long/path/that/keeps/going/on/forever?x=1&y=2";
        assert!(url.chars().count() > URL_LEN_THRESHOLD);
        let words = split_words(url);
        let rebuilt: String = words.concat();
        assert_eq!(rebuilt, url);
        // every fragment after the first begins with one of the break chars
        for w in &words[1..] {
            let first = w.chars().next().unwrap();
            assert!(URL_BREAK_CHARS.contains(&first));
        }
    }

    #[test]
    fn token_at_threshold_boundary_unsplit() {
        let token = "b".repeat(30);
        let words = split_words(&token);
        assert_eq!(words, vec![token]);
    }

    #[test]
    fn token_just_over_threshold_hard_broken() {
        let token = "c".repeat(31);
        let words = split_words(&token);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].chars().count(), 25);
        assert_eq!(words[1].chars().count(), 6);
    }

    #[test]
    fn whitespace_collapses_like_split_whitespace() {
        let words = split_words("  a   b\tc\n");
        assert_eq!(words, vec!["a", "b", "c"]);
    }
}
