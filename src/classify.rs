//! The base incremental classifier.
//!
//! A `Classifier` owns a character buffer that only ever mutates at the tail,
//! plus one bitmask per named predicate. Appending a character evaluates every
//! predicate once and shifts its mask left; popping shifts right. Queries like
//! [`Classifier::isnumber`] then read mask-level facts (emptiness, popcount,
//! lowest set bit) instead of rescanning the text.
//!
//! ```text
//!            append('5')                    pop()
//!   "$1,23" ───────────▶ masks <<= 1 | p   ───────▶ masks >>= 1
//!                        accum = accum*10+5          accum = (accum-5)/10
//! ```
//!
//! Predicates run in declared order; a later predicate may read the bit an
//! earlier one just produced for the same character. The ordering is part of
//! the contract, not an implementation detail.

pub(crate) mod predicates;

use std::ops::Range;

use once_cell::sync::Lazy;

use crate::error::Error;
use crate::mask::Mask;
use crate::trie::Trie;
use crate::value::Value;
use predicates::{base_predicates, idx};

/// One named predicate in a classifier's ordered list.
#[derive(Debug)]
pub(crate) struct Predicate {
    pub(crate) name: &'static str,
    pub(crate) eval: fn(&Ctx<'_>, char) -> bool,
}

/// Read-only view handed to predicates while a character is appended.
///
/// `masks` holds the state mid-update: entries before the predicate being
/// evaluated already include the incoming character, entries at and after it
/// do not. `buffer` never includes the incoming character.
pub(crate) struct Ctx<'a> {
    pub(crate) masks: &'a [Mask],
    pub(crate) buffer: &'a [char],
    pub(crate) token: char,
    pub(crate) months: Option<&'a Trie>,
}

static BASE_PREDICATES: Lazy<Vec<Predicate>> = Lazy::new(base_predicates);

/// Incremental number/boolean classifier over a tail-mutable char sequence.
#[derive(Clone, Debug)]
pub struct Classifier {
    chars: Vec<char>,
    masks: Vec<Mask>,
    predicates: &'static [Predicate],
    token: char,
    multiplier: f64,
    accum: f64,
    place: f64,
    months: Option<&'static Trie>,
}

impl Default for Classifier {
    fn default() -> Classifier {
        Classifier::new()
    }
}

impl Classifier {
    pub fn new() -> Classifier {
        Classifier::with_token("", ' ')
    }

    pub fn from_text(text: &str) -> Classifier {
        Classifier::with_token(text, ' ')
    }

    /// Builds a classifier that tokenizes on `token`.
    pub fn with_token(text: &str, token: char) -> Classifier {
        let mut c = Classifier::bare(BASE_PREDICATES.as_slice(), None, token);
        c.extend(text);
        c
    }

    pub(crate) fn bare(
        predicates: &'static [Predicate],
        months: Option<&'static Trie>,
        token: char,
    ) -> Classifier {
        Classifier {
            chars: Vec::new(),
            masks: vec![Mask::new(); predicates.len()],
            predicates,
            token,
            multiplier: 1.0,
            accum: 0.0,
            place: 1.0,
            months,
        }
    }

    /// An empty classifier with this one's configuration.
    pub(crate) fn spawn(&self, text: &str) -> Classifier {
        let mut c = Classifier::bare(self.predicates, self.months, self.token);
        c.extend(text);
        c
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The buffer as text.
    pub fn unwrapped(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn token(&self) -> char {
        self.token
    }

    pub(crate) fn chars(&self) -> &[char] {
        &self.chars
    }

    pub(crate) fn mask(&self, i: usize) -> &Mask {
        &self.masks[i]
    }

    pub(crate) fn text_of(&self, range: Range<usize>) -> String {
        self.chars[range].iter().collect()
    }

    /// Appends one character, updating sign/percent multiplier, every
    /// predicate mask, and the numeric accumulator. `'\0'` is a no-op.
    pub fn push(&mut self, ch: char) {
        if ch == '\0' {
            return;
        }
        if ch == '-' || ch == '(' {
            self.multiplier = -self.multiplier;
        }
        if ch == '%' {
            self.multiplier *= 0.01;
        }
        for i in 0..self.predicates.len() {
            let bit = {
                let cx = Ctx {
                    masks: &self.masks,
                    buffer: &self.chars,
                    token: self.token,
                    months: self.months,
                };
                (self.predicates[i].eval)(&cx, ch)
            };
            self.masks[i].push(bit);
        }
        self.chars.push(ch);
        if ch == '.' {
            self.place = 0.1;
        } else if let Some(d) = ch.to_digit(10) {
            if self.masks[idx::IS_DOT].is_zero() {
                self.accum = self.accum * 10.0 + d as f64;
            } else {
                self.accum += d as f64 * self.place;
                self.place /= 10.0;
            }
        }
    }

    /// String-typed append. Errors unless `letter` is exactly one character;
    /// the empty string and `"\0"` are silent no-ops.
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

    /// Removes the last character, exactly inverting its `push`.
    pub fn pop(&mut self) -> Option<char> {
        let ch = self.chars.pop()?;
        for m in &mut self.masks {
            m.pop();
        }
        if ch == '%' {
            self.multiplier *= 100.0;
        }
        if ch == '-' || ch == '(' {
            self.multiplier = -self.multiplier;
        }
        if ch == '.' {
            self.place *= 10.0;
        } else if let Some(d) = ch.to_digit(10) {
            if self.masks[idx::IS_DOT].is_zero() {
                self.accum = (self.accum - d as f64) / 10.0;
            } else {
                self.place *= 10.0;
                self.accum -= d as f64 * self.place;
            }
        }
        Some(ch)
    }

    /// Pops the last character and returns it wrapped in a fresh classifier
    /// with the same configuration.
    pub fn pop_wrapped(&mut self) -> Option<Classifier> {
        let ch = self.pop()?;
        let mut sub = self.spawn("");
        sub.push(ch);
        Some(sub)
    }

    /// Whether the buffer currently renders a number. Reads mask state only.
    pub fn isnumber(&self) -> bool {
        if self.chars.is_empty() || !self.masks[idx::IS_DEF_NOT_NUMBER].is_zero() {
            return false;
        }
        if self.masks[idx::IS_DIGIT].is_zero() {
            return false;
        }
        // Dot, sign, currency, percent and parens may appear at most once.
        for i in [
            idx::IS_DOT,
            idx::IS_DASH,
            idx::IS_CURRENCY,
            idx::IS_PERCENT,
            idx::IS_OPEN_PAREN,
            idx::IS_CLOSE_PAREN,
        ] {
            let m = &self.masks[i];
            if !m.is_zero() && !m.is_single_bit() {
                return false;
            }
        }
        let dash = !self.masks[idx::IS_DASH].is_zero();
        let open = !self.masks[idx::IS_OPEN_PAREN].is_zero();
        let close = !self.masks[idx::IS_CLOSE_PAREN].is_zero();
        // Dash and accounting parens are rival sign conventions.
        if dash && (open || close) {
            return false;
        }
        if open && !close {
            return false;
        }
        if self.multiplier < 0.0 && !self.leads_with_sign() {
            return false;
        }
        if !self.masks[idx::IS_PERCENT].is_zero() && !self.percent_trails() {
            return false;
        }
        true
    }

    /// A negative rendering must put its sign character first, right after
    /// any leading spaces or currency signs.
    fn leads_with_sign(&self) -> bool {
        let start = match self.masks[idx::IS_ACCEPTABLE_START].lowest_set() {
            Some(b) => self.chars.len() - b,
            None => 0,
        };
        let expected = if self.masks[idx::IS_DASH].is_zero() {
            '('
        } else {
            '-'
        };
        self.chars.get(start) == Some(&expected)
    }

    /// A percent sign must close the rendering, modulo whitespace and one
    /// closing paren.
    fn percent_trails(&self) -> bool {
        let mut s: &[char] = &self.chars;
        while s.first().is_some_and(|c| c.is_whitespace()) {
            s = &s[1..];
        }
        while s.last().is_some_and(|c| c.is_whitespace()) {
            s = &s[..s.len() - 1];
        }
        if s.last() == Some(&')') {
            s = &s[..s.len() - 1];
        }
        s.last() == Some(&'%')
    }

    /// The accumulated value times the sign/percent multiplier.
    /// Distinguishes a genuine zero from "nothing numeric was ever appended".
    pub fn force_to_number(&self) -> Result<f64, Error> {
        let v = self.accum * self.multiplier;
        if v == 0.0 && self.masks[idx::IS_ZERO].is_zero() {
            return Err(Error::NoNumericContent);
        }
        Ok(v)
    }

    /// Converts with [`Value::Text`] of the raw buffer as the fallback.
    pub fn convert(&self) -> Value {
        self.convert_with(|c| Value::Text(c.unwrapped()))
    }

    /// Converts the buffer to a tagged value: numbers via the accumulator,
    /// `true`/`false`/`none`/`null`/`inf` case-insensitively, anything else
    /// through `fallback`.
    pub fn convert_with(&self, fallback: impl FnOnce(&Classifier) -> Value) -> Value {
        if self.isnumber() {
            return match self.force_to_number() {
                Ok(v) => Value::from_f64(v),
                Err(_) => fallback(self),
            };
        }
        match self.unwrapped().to_lowercase().as_str() {
            "none" | "null" => Value::Null,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            "inf" => Value::Float(f64::INFINITY),
            _ => fallback(self),
        }
    }

    /// Char-index ranges of the maximal runs where `mask_name`'s bit equals
    /// `bit`, in buffer order. Unknown names yield no ranges.
    pub fn segments(&self, mask_name: &str, bit: bool) -> Vec<Range<usize>> {
        match self.mask_index(mask_name) {
            Some(i) => self.segments_at(i, bit),
            None => Vec::new(),
        }
    }

    pub(crate) fn segments_at(&self, mask: usize, bit: bool) -> Vec<Range<usize>> {
        let len = self.chars.len();
        let mut out: Vec<Range<usize>> = self.masks[mask]
            .runs(len, bit)
            .into_iter()
            .map(|r| (len - r.end)..(len - r.start))
            .collect();
        // Runs come out lowest-bit-first, which is reverse buffer order.
        out.reverse();
        out
    }

    /// The matching runs as owned strings.
    pub fn sliceby(&self, mask_name: &str, bit: bool) -> Vec<String> {
        self.segments(mask_name, bit)
            .into_iter()
            .map(|r| self.text_of(r))
            .collect()
    }

    /// The matching runs concatenated, preserving order.
    pub fn sliceby_concat(&self, mask_name: &str, bit: bool) -> String {
        self.segments(mask_name, bit)
            .into_iter()
            .map(|r| self.text_of(r))
            .collect()
    }

    /// The predicate names usable with [`segments`](Self::segments), in
    /// evaluation order.
    pub fn mask_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.predicates.iter().map(|p| p.name)
    }

    fn mask_index(&self, name: &str) -> Option<usize> {
        self.predicates.iter().position(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isnumber_truth_table() {
        let cases = [
            ("123", true),
            ("-123", true),
            ("(123)", true),
            ("12.5", true),
            ("$1,234.56", true),
            ("12%", true),
            ("(12%)", true),
            (" $5 ", true),
            ("0", true),
            ("12-", false),
            ("(-123)", false),
            ("12.3.4", false),
            ("1-2", false),
            ("(123", false),
            ("$$5", false),
            ("12%5", false),
            ("abc", false),
            ("", false),
            ("   ", false),
        ];
        for (text, expected) in cases {
            let c = Classifier::from_text(text);
            assert_eq!(c.isnumber(), expected, "isnumber({text:?})");
        }
    }

    #[test]
    fn convert_table() {
        let cases = [
            ("123", Value::Integer(123)),
            ("-123", Value::Integer(-123)),
            ("(1,200)", Value::Integer(-1200)),
            ("12.5", Value::Float(12.5)),
            ("TRUE", Value::Bool(true)),
            ("False", Value::Bool(false)),
            ("None", Value::Null),
            ("null", Value::Null),
            ("inf", Value::Float(f64::INFINITY)),
            ("hello", Value::Text("hello".into())),
        ];
        for (text, expected) in cases {
            let c = Classifier::from_text(text);
            assert_eq!(c.convert(), expected, "convert({text:?})");
        }
    }

    #[test]
    fn percent_scales_by_a_hundredth() {
        match Classifier::from_text("12%").convert() {
            Value::Float(v) => assert!((v - 0.12).abs() < 1e-12, "got {v}"),
            other => panic!("expected float, got {other:?}"),
        }
    }

    #[test]
    fn accounting_percent_is_negative() {
        let c = Classifier::from_text("(12%)");
        assert!(c.isnumber());
        let v = c.force_to_number().unwrap();
        assert!((v - -0.12).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn append_rejects_multi_char_input() {
        let mut c = Classifier::new();
        assert_eq!(
            c.append("ab"),
            Err(Error::InvalidCharacter { input: "ab".into() })
        );
        assert_eq!(c.append(""), Ok(()));
        assert_eq!(c.append("\0"), Ok(()));
        assert_eq!(c.append("7"), Ok(()));
        assert_eq!(c.unwrapped(), "7");
    }

    #[test]
    fn pop_inverts_push_exactly() {
        let mut c = Classifier::from_text("$1,234.56");
        assert!(c.isnumber());
        let baseline = Classifier::from_text("$1,234.5");
        assert_eq!(c.pop(), Some('6'));
        assert_eq!(c.unwrapped(), baseline.unwrapped());
        assert_eq!(c.isnumber(), baseline.isnumber());
        let (a, b) = (
            c.force_to_number().unwrap(),
            baseline.force_to_number().unwrap(),
        );
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");

        // Shrink all the way down and regrow.
        while c.pop().is_some() {}
        assert!(!c.isnumber());
        c.extend("-42");
        assert_eq!(c.convert(), Value::Integer(-42));
    }

    #[test]
    fn pop_restores_sign_and_percent_state() {
        let mut c = Classifier::from_text("(12%)");
        c.pop(); // ')'
        c.pop(); // '%'
        assert_eq!(c.force_to_number(), Ok(-12.0));
        c.pop(); // '2'
        c.pop(); // '1'
        c.pop(); // '('
        assert_eq!(c.force_to_number(), Err(Error::NoNumericContent));
    }

    #[test]
    fn pop_wrapped_boxes_the_tail() {
        let mut c = Classifier::from_text("12");
        let sub = c.pop_wrapped().unwrap();
        assert_eq!(sub.unwrapped(), "2");
        assert_eq!(sub.convert(), Value::Integer(2));
        assert_eq!(c.unwrapped(), "1");
        let mut empty = Classifier::new();
        assert!(empty.pop_wrapped().is_none());
    }

    #[test]
    fn force_to_number_distinguishes_zero_from_nothing() {
        assert_eq!(Classifier::from_text("0").force_to_number(), Ok(0.0));
        assert_eq!(
            Classifier::from_text("abc").force_to_number(),
            Err(Error::NoNumericContent)
        );
    }

    #[test]
    fn segments_and_slicing() {
        let c = Classifier::from_text("a1b22c");
        assert_eq!(c.segments("is_digit", true), vec![1..2, 3..5]);
        assert_eq!(c.segments("is_digit", false), vec![0..1, 2..3, 5..6]);
        assert_eq!(c.sliceby("is_digit", true), vec!["1", "22"]);
        assert_eq!(c.sliceby("is_digit", false), vec!["a", "b", "c"]);
        assert_eq!(c.sliceby_concat("is_digit", false), "abc");
        assert!(c.segments("no_such_mask", true).is_empty());
    }

    #[test]
    fn token_segmentation_drops_separators_and_empties() {
        let c = Classifier::from_text("one  two three ");
        assert_eq!(c.sliceby("is_token", false), vec!["one", "two", "three"]);

        let custom = Classifier::with_token("a,b,,c", ',');
        assert_eq!(custom.sliceby("is_token", false), vec!["a", "b", "c"]);
    }

    #[test]
    fn leading_spaces_and_currency_keep_signs_valid() {
        assert!(Classifier::from_text(" $-5").isnumber());
        assert!(Classifier::from_text(" -5").isnumber());
        assert!(!Classifier::from_text("5-").isnumber());
        assert!(!Classifier::from_text("x-5").isnumber());
    }
}
