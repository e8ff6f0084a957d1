//! Date-preserving tokenization.
//!
//! Token boundaries come from the `is_token` mask's zero-runs, except that a
//! validated date span always survives as one token, token characters inside
//! it included.

use std::ops::Range;

use chrono::NaiveDate;

use super::DateClassifier;
use crate::classify::predicates::idx;

/// Classified payload of one token.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    /// The token validated as one or more dates, in discovery order.
    Dates(Vec<NaiveDate>),
    /// The token rendered a number.
    Number(f64),
    /// Everything else, verbatim.
    Text(String),
}

impl DateClassifier {
    /// Token char-ranges in buffer order. Date spans are kept whole; the
    /// gaps between them split on the token character, dropping separators
    /// and empty pieces.
    fn token_ranges(&self) -> Vec<Range<usize>> {
        let len = self.inner.len();
        if len == 0 {
            return Vec::new();
        }
        let spans = self.date_spans();
        let segments = self.inner.segments_at(idx::IS_TOKEN, false);
        let mut out = Vec::new();
        let mut cursor = 0;
        for span in spans {
            // A span swallowed by an earlier, wider one is already covered.
            if span.start < cursor {
                continue;
            }
            push_pieces(&segments, cursor..span.start, &mut out);
            cursor = span.end;
            out.push(span);
        }
        push_pieces(&segments, cursor..len, &mut out);
        out
    }

    /// Splits into sub-classifiers, one per token, preserving token char and
    /// policy.
    pub fn tokenize_self(&self) -> Vec<DateClassifier> {
        self.token_ranges()
            .into_iter()
            .map(|r| self.spawn(&self.inner.text_of(r)))
            .collect()
    }

    /// Lazy iterator over classified tokens, newest (rightmost) first.
    pub fn iter_tokens(&self) -> TokenIter<'_> {
        TokenIter {
            cls: self,
            ranges: self.token_ranges(),
        }
    }

    /// Classified tokens in buffer order.
    pub fn iter_tokens_forward(
        &self,
    ) -> impl Iterator<Item = (Range<usize>, TokenValue)> + '_ {
        let mut items: Vec<_> = self.iter_tokens().collect();
        items.reverse();
        items.into_iter()
    }
}

/// The parts of `segments` that fall inside `gap`, clipped to it.
fn push_pieces(segments: &[Range<usize>], gap: Range<usize>, out: &mut Vec<Range<usize>>) {
    for seg in segments {
        let start = seg.start.max(gap.start);
        let end = seg.end.min(gap.end);
        if start < end {
            out.push(start..end);
        }
    }
}

/// Walks tokens from the buffer tail backwards, classifying on demand.
pub struct TokenIter<'a> {
    cls: &'a DateClassifier,
    ranges: Vec<Range<usize>>,
}

impl Iterator for TokenIter<'_> {
    type Item = (Range<usize>, TokenValue);

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.ranges.pop()?;
        let text = self.cls.inner.text_of(range.clone());
        let sub = self.cls.spawn(&text);
        let value = if let Ok(dates) = sub.convert_date() {
            TokenValue::Dates(dates)
        } else if sub.isnumber() {
            match sub.force_to_number() {
                Ok(v) => TokenValue::Number(v),
                Err(_) => TokenValue::Text(text),
            }
        } else {
            TokenValue::Text(text)
        };
        Some((range, value))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn texts(tokens: &[DateClassifier]) -> Vec<String> {
        tokens.iter().map(|t| t.unwrapped()).collect()
    }

    #[test]
    fn dates_survive_tokenization_whole() {
        let c = DateClassifier::from_text(
            "Sally bought the property on this 11th day of August, 2021",
        );
        assert_eq!(
            texts(&c.tokenize_self()),
            vec![
                "Sally",
                "bought",
                "the",
                "property",
                "on",
                "this",
                "11th day of August, 2021",
            ]
        );
    }

    #[test]
    fn plain_text_splits_on_the_token_char() {
        let c = DateClassifier::from_text("  a bb  c ");
        assert_eq!(texts(&c.tokenize_self()), vec!["a", "bb", "c"]);
        assert!(DateClassifier::from_text("").tokenize_self().is_empty());
    }

    #[test]
    fn buffer_without_token_chars_is_one_token() {
        let c = DateClassifier::with_token("a b", '|');
        assert_eq!(texts(&c.tokenize_self()), vec!["a b"]);
    }

    #[test]
    fn iter_tokens_runs_tail_first_and_classifies() {
        let c = DateClassifier::from_text("paid 1,200 on 12/31/2020 total");
        let tokens: Vec<_> = c.iter_tokens().collect();
        let date = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].1, TokenValue::Text("total".into()));
        assert_eq!(tokens[1].1, TokenValue::Dates(vec![date]));
        assert_eq!(tokens[2].1, TokenValue::Text("on".into()));
        assert_eq!(tokens[3].1, TokenValue::Number(1200.0));
        assert_eq!(tokens[4].1, TokenValue::Text("paid".into()));

        let forward: Vec<_> = c.iter_tokens_forward().collect();
        assert_eq!(forward[0].1, TokenValue::Text("paid".into()));
        assert_eq!(forward[0].0, 0..4);
        assert_eq!(forward[3].1, TokenValue::Dates(vec![date]));
    }

    #[test]
    fn tokens_keep_policy_and_token_char() {
        let c = DateClassifier::with_token("x|12/31/2020|y", '|');
        let tokens = c.tokenize_self();
        assert_eq!(texts(&tokens), vec!["x", "12/31/2020", "y"]);
        assert_eq!(tokens[1].token(), '|');
        assert!(tokens[1].isdate());
    }
}
