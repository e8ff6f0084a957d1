//! Date-aware classification on top of the base engine.
//!
//! `DateClassifier` widens the predicate list with month/separator predicates,
//! tracks digit groups incrementally, and detects calendar dates in two
//! shapes:
//!
//! ```text
//!   letter-month   "Dec. 31st, 2020"   month word + nearest 4-digit group
//!   pure-numeric   "12/31/2020"        3 tightly-separated digit groups
//! ```
//!
//! Detection runs in three stages: anchor discovery (cheap, mask-driven),
//! comprehensive validation (group flags + calendar rules), and span
//! extraction for tokenization that never splits a date apart.

mod anchors;
mod groups;
mod tokenize;
mod validate;

use std::collections::HashMap;
use std::ops::Range;

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::classify::predicates::{base_predicates, idx};
use crate::classify::{Classifier, Ctx, Predicate};
use crate::error::Error;
use crate::trie::Trie;
use crate::value::Value;
use groups::GroupTracker;

pub use tokenize::{TokenIter, TokenValue};
pub use validate::is_leap_year;

/// How to read "1/2/2020"-style inputs where both leading groups fit as a
/// month. Inputs with an unambiguous day (value 13..=31) or a leading year
/// ignore the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DatePolicy {
    /// American convention: month, then day.
    #[default]
    MonthFirst,
    /// Day, then month.
    DayFirst,
}

/// Month renderings accepted as complete words, keyed in capitalized form.
static MONTHS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("Jan", 1),
        ("Jan.", 1),
        ("January", 1),
        ("Feb", 2),
        ("Feb.", 2),
        ("February", 2),
        ("Mar", 3),
        ("Mar.", 3),
        ("March", 3),
        ("Apr", 4),
        ("Apr.", 4),
        ("April", 4),
        ("May", 5),
        ("Jun", 6),
        ("Jun.", 6),
        ("June", 6),
        ("Jul", 7),
        ("Jul.", 7),
        ("July", 7),
        ("Aug", 8),
        ("Aug.", 8),
        ("August", 8),
        ("Sep", 9),
        ("Sep.", 9),
        ("Sept", 9),
        ("Sept.", 9),
        ("September", 9),
        ("Oct", 10),
        ("Oct.", 10),
        ("October", 10),
        ("Nov", 11),
        ("Nov.", 11),
        ("November", 11),
        ("Dec", 12),
        ("Dec.", 12),
        ("December", 12),
    ])
});

/// Shared stems plus their accepted suffixes, so prefixes like "dec" and
/// dotted abbreviations like "jan." all count as month words.
static MONTH_TRIE: Lazy<Trie> = Lazy::new(|| {
    let table: [(&str, &[&str]); 12] = [
        ("Jan", &["uary", ".", ""]),
        ("Feb", &["ruary", ".", ""]),
        ("Mar", &["ch", ".", ""]),
        ("Apr", &["il", ".", ""]),
        ("May", &["", "."]),
        ("Jun", &["e", ".", ""]),
        ("Jul", &["y", ".", ""]),
        ("Aug", &["ust", ".", ""]),
        ("Sep", &["t", "t.", ".", "", "tember", "temb", "temb."]),
        ("Oct", &["ober", ".", ""]),
        ("Nov", &["ember", ".", ""]),
        ("Dec", &["ember", ".", ""]),
    ];
    let mut trie = Trie::new();
    for (stem, suffixes) in table {
        let node = trie.insert_prefix(stem);
        for suffix in suffixes {
            trie.insert_from_node(suffix, node);
        }
    }
    trie
});

static DATE_PREDICATES: Lazy<Vec<Predicate>> = Lazy::new(|| {
    let mut list = base_predicates();
    list.extend([
        predicate!("is_comma", |_cx: &Ctx<'_>, ch: char| ch == ','),
        predicate!("is_space", |_cx: &Ctx<'_>, ch: char| ch == ' '),
        predicate!("is_month", month_start),
        predicate!("is_slash", |_cx: &Ctx<'_>, ch: char| ch == '/'),
        predicate!("is_month_part", month_part),
        predicate!("is_month_done", month_done),
        predicate!("is_apostrophe", |_cx: &Ctx<'_>, ch: char| {
            ch == '\'' || ch == '\u{2019}'
        }),
        predicate!("is_four_digits", four_digits),
    ]);
    list
});

/// Lowercases and uppercases the first letter, to match `MONTHS` keys.
fn capitalized(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lower,
    }
}

/// Start of the current word: one past the most recent space or dot.
/// Runs mid-append, when the separator masks already include the incoming
/// character but the buffer does not.
fn word_start(cx: &Ctx<'_>) -> usize {
    let mut start = 0;
    for i in [idx::IS_SPACE, idx::IS_DOT] {
        if let Some(b) = cx.masks[i].lowest_set() {
            start = start.max(cx.buffer.len() + 1 - b);
        }
    }
    start
}

fn current_word(cx: &Ctx<'_>, ch: char) -> String {
    let start = word_start(cx);
    let mut word: String = cx.buffer.get(start..).unwrap_or_default().iter().collect();
    word.push(ch);
    word
}

/// The whole buffer is still a month-word prefix.
fn month_start(cx: &Ctx<'_>, ch: char) -> bool {
    let Some(trie) = cx.months else { return false };
    let mut word: String = cx.buffer.iter().collect();
    word.push(ch);
    trie.is_wordstart(&word)
}

/// The word under construction is a month-word prefix.
fn month_part(cx: &Ctx<'_>, ch: char) -> bool {
    if ch == ' ' {
        return false;
    }
    let Some(trie) = cx.months else { return false };
    trie.is_wordstart(&current_word(cx, ch))
}

/// The word under construction just became a complete month rendering.
/// Reads the `is_month_part` bit computed for this same character.
fn month_done(cx: &Ctx<'_>, ch: char) -> bool {
    if !cx.masks[idx::IS_MONTH_PART].bit(0) {
        return false;
    }
    MONTHS.contains_key(capitalized(&current_word(cx, ch)).as_str())
}

/// This character closes a run of four digits.
fn four_digits(cx: &Ctx<'_>, ch: char) -> bool {
    ch.is_ascii_digit() && cx.masks[idx::IS_DIGIT].low_word(4) == 0b1111
}

/// Incremental classifier that also detects calendar dates.
#[derive(Clone, Debug)]
pub struct DateClassifier {
    inner: Classifier,
    groups: GroupTracker,
    policy: DatePolicy,
}

impl Default for DateClassifier {
    fn default() -> DateClassifier {
        DateClassifier::new()
    }
}

impl DateClassifier {
    pub fn new() -> DateClassifier {
        DateClassifier::with_token("", ' ')
    }

    pub fn from_text(text: &str) -> DateClassifier {
        DateClassifier::with_token(text, ' ')
    }

    pub fn with_token(text: &str, token: char) -> DateClassifier {
        let mut c = DateClassifier {
            inner: Classifier::bare(DATE_PREDICATES.as_slice(), Some(&*MONTH_TRIE), token),
            groups: GroupTracker::default(),
            policy: DatePolicy::default(),
        };
        c.extend(text);
        c
    }

    /// Sets the month/day disambiguation policy.
    pub fn with_policy(mut self, policy: DatePolicy) -> DateClassifier {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DatePolicy {
        self.policy
    }

    /// An empty classifier with this one's token and policy.
    pub(crate) fn spawn(&self, text: &str) -> DateClassifier {
        let mut c = DateClassifier {
            inner: self.inner.spawn(""),
            groups: GroupTracker::default(),
            policy: self.policy,
        };
        c.extend(text);
        c
    }

    pub fn push(&mut self, ch: char) {
        if ch == '\0' {
            return;
        }
        self.inner.push(ch);
        // Digit bit 1 is the character that was at the tail before this one.
        let prev_was_digit = self.inner.mask(idx::IS_DIGIT).bit(1);
        self.groups.on_push(ch, prev_was_digit, self.inner.len());
    }

    pub fn append(&mut self, letter: &str) -> Result<(), Error> {
        let mut it = letter.chars();
        match (it.next(), it.next()) {
            (None, _) | (Some('\0'), None) => Ok(()),
            (Some(ch), None) => {
                self.push(ch);
                Ok(())
            }
            _ => Err(Error::InvalidCharacter {
                input: letter.to_string(),
            }),
        }
    }

    pub fn extend(&mut self, text: &str) {
        for ch in text.chars() {
            self.push(ch);
        }
    }

    pub fn pop(&mut self) -> Option<char> {
        let ch = self.inner.pop()?;
        let tail_is_digit = self.inner.mask(idx::IS_DIGIT).bit(0);
        self.groups
            .on_pop(ch, tail_is_digit, self.inner.len(), self.inner.chars());
        Some(ch)
    }

    pub fn pop_wrapped(&mut self) -> Option<DateClassifier> {
        let ch = self.pop()?;
        let mut sub = self.spawn("");
        sub.push(ch);
        Some(sub)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn unwrapped(&self) -> String {
        self.inner.unwrapped()
    }

    pub fn token(&self) -> char {
        self.inner.token()
    }

    pub fn isnumber(&self) -> bool {
        self.inner.isnumber()
    }

    pub fn convert(&self) -> Value {
        self.inner.convert()
    }

    pub fn convert_with(&self, fallback: impl FnOnce(&Classifier) -> Value) -> Value {
        self.inner.convert_with(fallback)
    }

    pub fn force_to_number(&self) -> Result<f64, Error> {
        self.inner.force_to_number()
    }

    pub fn segments(&self, mask_name: &str, bit: bool) -> Vec<Range<usize>> {
        self.inner.segments(mask_name, bit)
    }

    pub fn sliceby(&self, mask_name: &str, bit: bool) -> Vec<String> {
        self.inner.sliceby(mask_name, bit)
    }

    pub fn sliceby_concat(&self, mask_name: &str, bit: bool) -> String {
        self.inner.sliceby_concat(mask_name, bit)
    }

    /// Candidate window positions. The four-digit mask gates the whole
    /// search: no run of four digit characters, no year, no date.
    fn anchors(&self) -> Vec<anchors::Anchor> {
        if self.inner.mask(idx::IS_FOUR_DIGITS).is_zero() {
            return Vec::new();
        }
        let mut found = anchors::letter_month(self);
        found.extend(anchors::numeric(self));
        found
    }

    /// Whether any candidate window validates as a calendar date.
    pub fn isdate(&self) -> bool {
        self.anchors()
            .iter()
            .any(|a| validate::validate(self, a).is_some())
    }

    /// Every validated date in the buffer, in discovery order.
    pub fn convert_date(&self) -> Result<Vec<NaiveDate>, Error> {
        let dates: Vec<NaiveDate> = self
            .anchors()
            .iter()
            .filter_map(|a| validate::validate(self, a))
            .collect();
        if dates.is_empty() {
            Err(Error::NoDateFound)
        } else {
            Ok(dates)
        }
    }

    /// Char spans of validated dates, widened to cover the month word,
    /// sorted by position.
    pub fn date_spans(&self) -> Vec<Range<usize>> {
        let len = self.inner.len();
        let mut spans: Vec<Range<usize>> = Vec::new();
        for anchor in self.anchors() {
            if validate::validate(self, &anchor).is_none() {
                continue;
            }
            let need = if anchor.month.is_some() { 2 } else { 3 };
            let mut start = self.groups.group(anchor.start).start;
            let mut end = self.groups.group(anchor.start + need - 1).end_at(len);
            if let Some(mw) = &anchor.month {
                start = start.min(mw.span.start);
                end = end.max(mw.span.end);
            }
            spans.push(start..end);
        }
        spans.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
        spans.dedup();
        spans
    }
}
