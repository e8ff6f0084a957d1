//! Candidate-window discovery.
//!
//! An anchor names the first digit group of a window that might render a
//! date. Discovery is deliberately permissive; every anchor still has to
//! survive comprehensive validation.

use std::collections::HashSet;
use std::ops::Range;

use tracing::trace;

use super::{DateClassifier, MONTHS, capitalized};
use crate::classify::predicates::idx;

#[derive(Clone, Debug)]
pub(super) struct Anchor {
    /// Index of the window's first digit group.
    pub(super) start: usize,
    /// The month word, when this anchor came from letter-month discovery.
    pub(super) month: Option<MonthWord>,
}

#[derive(Clone, Debug)]
pub(super) struct MonthWord {
    pub(super) number: u32,
    /// Char span of the word in the buffer.
    pub(super) span: Range<usize>,
}

/// Anchors around completed month words.
///
/// For each completed word the nearest four-digit group (by character
/// distance) is taken as the year. The window then starts one group before
/// the year when the year trails the word, or at the year itself when it
/// leads, in both cases only within two groups of the word.
pub(super) fn letter_month(cls: &DateClassifier) -> Vec<Anchor> {
    let len = cls.inner.len();
    let done = cls.inner.mask(idx::IS_MONTH_DONE);
    let part = cls.inner.mask(idx::IS_MONTH_PART);
    let groups = &cls.groups;
    let mut seen_words: HashSet<(usize, String)> = HashSet::new();
    let mut seen_starts: HashSet<usize> = HashSet::new();
    let mut out = Vec::new();

    for b in done.iter_ones() {
        let end = len - b;
        let word_start = end - part.run_ones_at(b);
        let text: String = cls.inner.chars()[word_start..end]
            .iter()
            .collect::<String>()
            .to_lowercase();
        // Completion bits come newest-first, so "december" lands before its
        // own "dec" completion; recording truncations skips the echoes.
        if !seen_words.insert((word_start, text.clone())) {
            continue;
        }
        for cut in [3, 4] {
            if text.len() > cut {
                seen_words.insert((word_start, text[..cut].to_string()));
            }
        }
        let Some(&number) = MONTHS.get(capitalized(&text).as_str()) else {
            continue;
        };

        let mut best: Option<(usize, usize)> = None;
        for gi in groups.four_digit_indices() {
            let g = groups.group(gi);
            let dist = if g.start >= end {
                g.start - end
            } else {
                word_start.saturating_sub(g.end_at(len))
            };
            if best.is_none_or(|(best_dist, _)| dist < best_dist) {
                best = Some((dist, gi));
            }
        }
        let Some((_, where_year)) = best else { continue };

        let groups_before = (0..groups.len())
            .filter(|&i| groups.group(i).start < word_start)
            .count();
        let anchor_start = if where_year >= groups_before {
            if where_year - groups_before <= 2 {
                where_year.checked_sub(1)
            } else {
                None
            }
        } else if groups_before - where_year <= 2 {
            Some(where_year)
        } else {
            None
        };
        let Some(start) = anchor_start else { continue };
        if !seen_starts.insert(start) {
            continue;
        }
        trace!(month = number, start, "letter-month anchor");
        out.push(Anchor {
            start,
            month: Some(MonthWord {
                number,
                span: word_start..end,
            }),
        });
    }
    out
}

/// Anchors for purely numeric renderings: three digit groups, each pair
/// separated by exactly one character, inside a window around a four-digit
/// group.
pub(super) fn numeric(cls: &DateClassifier) -> Vec<Anchor> {
    let len = cls.inner.len();
    let groups = &cls.groups;
    let n = groups.len();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut out = Vec::new();

    for gi in groups.four_digit_indices() {
        // The year may close the window or open it.
        let windows = [
            gi.saturating_sub(2)..(gi + 1).min(n),
            gi..(gi + 3).min(n),
        ];
        for window in windows {
            let mut cluster = 0;
            let mut cluster_start = window.start;
            for x in window.clone() {
                let tight = x > window.start
                    && groups.group(x - 1).end_at(len) + 1 == groups.group(x).start;
                if cluster > 0 && tight {
                    cluster += 1;
                } else {
                    cluster = 1;
                    cluster_start = x;
                }
                if cluster == 3 {
                    break;
                }
            }
            if cluster >= 3 && seen.insert(cluster_start) {
                trace!(start = cluster_start, "numeric anchor");
                out.push(Anchor {
                    start: cluster_start,
                    month: None,
                });
            }
        }
    }
    out
}
