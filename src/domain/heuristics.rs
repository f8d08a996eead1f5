use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::contact::{ContactSubmission, SpamVerdict};

/// Phrases that only ever show up in marketing or scam messages.
pub const SPAM_KEYWORDS: [&str; 17] = [
    "viagra",
    "cialis",
    "casino",
    "lottery",
    "you have won",
    "click here",
    "free money",
    "make money fast",
    "work from home",
    "crypto investment",
    "bitcoin investment",
    "guaranteed income",
    "seo services",
    "buy backlinks",
    "rank your website",
    "nigerian prince",
    "wire transfer",
];

const MAX_LINKS: usize = 2;
const MAX_REPEATED_RUN: usize = 10;
const LONG_MESSAGE_CHARS: usize = 2000;
const SHORT_NAME_CHARS: usize = 3;
const CAPS_MIN_WORD_CHARS: usize = 3;
const CAPS_MIN_WORDS: usize = 10;

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://").expect("link pattern is valid")
});

/// The honeypot input is hidden from people; any value means a bot filled it.
pub fn honeypot_triggered(honeypot: Option<&str>) -> bool {
    honeypot.is_some_and(|value| !value.trim().is_empty())
}

/// Returns the elapsed fill time when the form was submitted faster than
/// `min_elapsed_ms`. A missing start time passes. A start time so far off
/// that the elapsed time overflows counts as too fast.
pub fn submitted_too_fast(start_time: Option<i64>, now_ms: i64, min_elapsed_ms: i64) -> Option<i64> {
    match now_ms.checked_sub(start_time?) {
        Some(elapsed) => (elapsed < min_elapsed_ms).then_some(elapsed),
        None => Some(i64::MIN),
    }
}

/// Classifies a validated submission. The first matching rule wins.
pub fn detect_spam(submission: &ContactSubmission) -> SpamVerdict {
    let haystack = format!(
        "{} {} {}",
        submission.name, submission.email, submission.message
    )
    .to_lowercase();

    let matched: Vec<&str> = SPAM_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| haystack.contains(keyword))
        .collect();
    if !matched.is_empty() {
        return SpamVerdict::spam(format!("Spam keywords detected: {}", matched.join(", ")));
    }

    let links = LINK_PATTERN.find_iter(&submission.message).count();
    if links > MAX_LINKS {
        return SpamVerdict::spam(format!("Too many links ({})", links));
    }

    if let Some(c) = repeated_run(&submission.message, MAX_REPEATED_RUN + 1) {
        return SpamVerdict::spam(format!("Repeated character run of {:?}", c));
    }

    if submission.message.chars().count() > LONG_MESSAGE_CHARS
        && submission.name.chars().count() < SHORT_NAME_CHARS
    {
        return SpamVerdict::spam("Very long message with suspiciously short name");
    }

    if mostly_caps(&submission.message) {
        return SpamVerdict::spam("Excessive capital letters");
    }

    SpamVerdict::clean()
}

/// First character that appears `min_run` or more times in a row.
fn repeated_run(text: &str, min_run: usize) -> Option<char> {
    let mut chars = text.chars();
    let mut current = chars.next()?;
    let mut run = 1;

    if run >= min_run {
        return Some(current);
    }
    for c in chars {
        if c == current {
            run += 1;
        } else {
            current = c;
            run = 1;
        }
        if run >= min_run {
            return Some(current);
        }
    }
    None
}

fn mostly_caps(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= CAPS_MIN_WORDS {
        return false;
    }

    let long_words: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| w.chars().count() > CAPS_MIN_WORD_CHARS)
        .collect();
    let shouting = long_words
        .iter()
        .filter(|w| w.to_uppercase() == **w)
        .count();

    shouting * 2 > long_words.len()
}
