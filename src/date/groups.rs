//! Incremental digit-group bookkeeping.
//!
//! A group is a maximal run of digits in the buffer, carried as an
//! accumulated value plus char-index bounds. Four side masks classify groups
//! (not characters): bit 0 is always the most recent group, so they shift
//! only when a group is born or dies, and bit 0 is recomputed in place while
//! the open group grows or shrinks. Append followed by pop restores every
//! field exactly, leading zeros included.

use crate::mask::Mask;

/// Values above four digits only matter through the threshold flags, so the
/// accumulator saturates here instead of growing without bound.
const VALUE_CAP: i64 = 10_000;

fn accumulate(value: i64, d: i64) -> i64 {
    (value * 10 + d).min(VALUE_CAP)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DigitGroup {
    /// Accumulated decimal value of the run, saturated at [`VALUE_CAP`].
    pub(crate) value: i64,
    /// Char index of the first digit.
    pub(crate) start: usize,
    /// Char index one past the last digit; `None` while the run is still at
    /// the buffer tail.
    pub(crate) end: Option<usize>,
}

impl DigitGroup {
    pub(crate) fn end_at(&self, buf_len: usize) -> usize {
        self.end.unwrap_or(buf_len)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct GroupTracker {
    groups: Vec<DigitGroup>,
    /// value > 12: cannot be a month.
    over12: Mask,
    /// value > 31: cannot be a day either.
    over31: Mask,
    /// value == 0: disqualifies any containing window.
    zero: Mask,
    /// value in 1000..=9999: year candidate.
    four: Mask,
}

impl GroupTracker {
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn group(&self, i: usize) -> &DigitGroup {
        &self.groups[i]
    }

    pub(crate) fn value(&self, i: usize) -> i64 {
        self.groups[i].value
    }

    /// Group index -> mask bit. Newest group is bit 0.
    fn rank(&self, i: usize) -> usize {
        self.groups.len() - 1 - i
    }

    pub(crate) fn is_over12(&self, i: usize) -> bool {
        self.over12.bit(self.rank(i))
    }

    pub(crate) fn is_over31(&self, i: usize) -> bool {
        self.over31.bit(self.rank(i))
    }

    pub(crate) fn is_zero_group(&self, i: usize) -> bool {
        self.zero.bit(self.rank(i))
    }

    pub(crate) fn is_four_digit(&self, i: usize) -> bool {
        self.four.bit(self.rank(i))
    }

    /// Indices of year-candidate groups, oldest first.
    pub(crate) fn four_digit_indices(&self) -> Vec<usize> {
        let n = self.groups.len();
        let mut out: Vec<usize> = self.four.iter_ones().map(|b| n - 1 - b).collect();
        out.reverse();
        out
    }

    fn push_flags(&mut self, value: i64) {
        self.over12.push(value > 12);
        self.over31.push(value > 31);
        self.zero.push(value == 0);
        self.four.push((1000..=9999).contains(&value));
    }

    fn refresh_flags(&mut self, value: i64) {
        self.over12.assign_low(value > 12);
        self.over31.assign_low(value > 31);
        self.zero.assign_low(value == 0);
        self.four.assign_low((1000..=9999).contains(&value));
    }

    /// Mirrors one appended character. `prev_was_digit` is the digit bit of
    /// the character that was at the tail before this one; `buf_len` already
    /// counts the new character.
    pub(crate) fn on_push(&mut self, ch: char, prev_was_digit: bool, buf_len: usize) {
        let Some(d) = ch.to_digit(10) else {
            if prev_was_digit {
                if let Some(last) = self.groups.last_mut() {
                    last.end = Some(buf_len - 1);
                }
            }
            return;
        };
        let d = d as i64;
        if prev_was_digit {
            if let Some(last) = self.groups.last_mut() {
                last.value = accumulate(last.value, d);
                let v = last.value;
                self.refresh_flags(v);
            }
        } else {
            self.groups.push(DigitGroup {
                value: d,
                start: buf_len - 1,
                end: None,
            });
            self.push_flags(d);
        }
    }

    /// Mirrors one popped character. `tail_is_digit` is the digit bit of the
    /// new tail character; `buf_len` and `chars` no longer count the popped
    /// one.
    pub(crate) fn on_pop(
        &mut self,
        popped: char,
        tail_is_digit: bool,
        buf_len: usize,
        chars: &[char],
    ) {
        if popped.to_digit(10).is_none() {
            if tail_is_digit {
                if let Some(last) = self.groups.last_mut() {
                    last.end = None;
                }
            }
            return;
        }
        let single = match self.groups.last() {
            Some(g) => g.start == buf_len,
            None => return,
        };
        if single {
            self.groups.pop();
            self.over12.pop();
            self.over31.pop();
            self.zero.pop();
            self.four.pop();
        } else if let Some(last) = self.groups.last_mut() {
            // Saturation makes "subtract and divide" lossy, so shrink
            // re-derives the value from the surviving digits.
            let v = chars[last.start..buf_len]
                .iter()
                .filter_map(|c| c.to_digit(10))
                .fold(0, |acc, d| accumulate(acc, d as i64));
            last.value = v;
            self.refresh_flags(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays `text` through a tracker the way the date classifier does.
    fn track(text: &str) -> (GroupTracker, usize) {
        let mut t = GroupTracker::default();
        let mut prev_digit = false;
        let mut len = 0;
        for ch in text.chars() {
            len += 1;
            t.on_push(ch, prev_digit, len);
            prev_digit = ch.is_ascii_digit();
        }
        (t, len)
    }

    #[test]
    fn groups_accumulate_values_and_bounds() {
        let (t, len) = track("12/31/2020");
        assert_eq!(t.len(), 3);
        assert_eq!(t.value(0), 12);
        assert_eq!(t.value(1), 31);
        assert_eq!(t.value(2), 2020);
        assert_eq!(t.group(0).start, 0);
        assert_eq!(t.group(0).end, Some(2));
        assert_eq!(t.group(2).start, 6);
        assert_eq!(t.group(2).end, None);
        assert_eq!(t.group(2).end_at(len), 10);
    }

    #[test]
    fn flag_masks_track_group_values() {
        let (t, _) = track("0 5 13 40 2020");
        assert!(t.is_zero_group(0));
        assert!(!t.is_over12(1));
        assert!(t.is_over12(2) && !t.is_over31(2));
        assert!(t.is_over31(3));
        assert!(t.is_four_digit(4));
        assert_eq!(t.four_digit_indices(), vec![4]);
    }

    #[test]
    fn pop_is_the_exact_inverse_of_push() {
        let text = "a 05x 2020";
        let mut t = GroupTracker::default();
        let chars: Vec<char> = text.chars().collect();
        let mut snapshots = vec![format!("{t:?}")];
        for (i, &ch) in chars.iter().enumerate() {
            let prev = i > 0 && chars[i - 1].is_ascii_digit();
            t.on_push(ch, prev, i + 1);
            snapshots.push(format!("{t:?}"));
        }
        for (i, &ch) in chars.iter().enumerate().rev() {
            let tail = i > 0 && chars[i - 1].is_ascii_digit();
            t.on_pop(ch, tail, i, &chars[..i]);
            assert_eq!(format!("{t:?}"), snapshots[i], "after popping {ch:?}");
        }
    }

    #[test]
    fn long_digit_runs_saturate_instead_of_overflowing() {
        let text = "1234567890123456789012";
        let (mut t, len) = track(text);
        assert_eq!(t.len(), 1);
        assert_eq!(t.value(0), VALUE_CAP);
        assert!(t.is_over31(0));
        assert!(!t.is_four_digit(0));
        assert!(!t.is_zero_group(0));

        // Shrinking back below the cap recovers the exact value.
        let chars: Vec<char> = text.chars().collect();
        for i in (4..len).rev() {
            t.on_pop(chars[i], true, i, &chars[..i]);
        }
        assert_eq!(t.value(0), 1234);
        assert!(t.is_four_digit(0));
        assert!(!t.is_over31(0));
    }

    #[test]
    fn leading_zero_groups_shrink_correctly() {
        // "05" has value 5; popping the '5' must leave "0", value 0.
        let (mut t, _) = track("05");
        t.on_pop('5', true, 1, &['0']);
        assert_eq!(t.len(), 1);
        assert_eq!(t.value(0), 0);
        assert!(t.is_zero_group(0));
        t.on_pop('0', false, 0, &[]);
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn flags_clear_when_a_group_shrinks_below_threshold() {
        let (mut t, _) = track("40");
        assert!(t.is_over31(0));
        t.on_pop('0', true, 1, &['4']);
        assert!(!t.is_over31(0));
        assert!(!t.is_over12(0));
        assert_eq!(t.value(0), 4);
    }

    #[test]
    fn popping_a_separator_reopens_the_last_group() {
        let (mut t, len) = track("12/");
        assert_eq!(t.group(0).end, Some(2));
        t.on_pop('/', true, len - 1, &['1', '2']);
        assert_eq!(t.group(0).end, None);
    }
}
