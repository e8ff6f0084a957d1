//! Arbitrary-length bitmask with tail push/pop and run arithmetic.
//!
//! Bit 0 always describes the most recently appended character; appending
//! shifts every existing bit left by one, popping shifts right. Bit `b`
//! therefore maps to buffer index `len - 1 - b` for a buffer of `len` chars.
//!
//! Run extraction works on whole `u64` words with trailing-zeros and popcount,
//! never by probing characters one at a time.

use std::ops::Range;

const WORD_BITS: usize = 64;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Mask {
    /// LSB-first words. Trailing zero words are permitted.
    words: Vec<u64>,
}

impl Mask {
    pub(crate) fn new() -> Mask {
        Mask { words: Vec::new() }
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Shifts every bit up by one and installs `bit` at position 0.
    pub(crate) fn push(&mut self, bit: bool) {
        let mut carry = bit as u64;
        for w in &mut self.words {
            let out = *w >> (WORD_BITS - 1);
            *w = (*w << 1) | carry;
            carry = out;
        }
        if carry != 0 {
            self.words.push(1);
        }
    }

    /// Shifts every bit down by one, returning the dropped bit 0.
    pub(crate) fn pop(&mut self) -> bool {
        let mut carry = 0u64;
        for w in self.words.iter_mut().rev() {
            let out = *w & 1;
            *w = (*w >> 1) | (carry << (WORD_BITS - 1));
            carry = out;
        }
        self.trim();
        carry != 0
    }

    /// Keeps the word vector canonical so structural equality means bit
    /// equality.
    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }

    pub(crate) fn bit(&self, i: usize) -> bool {
        match self.words.get(i / WORD_BITS) {
            Some(w) => (w >> (i % WORD_BITS)) & 1 == 1,
            None => false,
        }
    }

    /// Overwrites bit 0 without shifting.
    pub(crate) fn assign_low(&mut self, bit: bool) {
        if self.words.is_empty() {
            if !bit {
                return;
            }
            self.words.push(0);
        }
        self.words[0] = (self.words[0] & !1) | bit as u64;
        self.trim();
    }

    /// Position of the lowest set bit.
    pub(crate) fn lowest_set(&self) -> Option<usize> {
        for (i, &w) in self.words.iter().enumerate() {
            if w != 0 {
                return Some(i * WORD_BITS + w.trailing_zeros() as usize);
            }
        }
        None
    }

    pub(crate) fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True when exactly one bit is set.
    pub(crate) fn is_single_bit(&self) -> bool {
        self.count_ones() == 1
    }

    /// Length of the run of set bits starting at position `i`.
    pub(crate) fn run_ones_at(&self, i: usize) -> usize {
        let mut n = 0;
        let mut word = i / WORD_BITS;
        let mut off = i % WORD_BITS;
        while word < self.words.len() {
            let w = self.words[word] >> off;
            let avail = WORD_BITS - off;
            let ones = ((!w).trailing_zeros() as usize).min(avail);
            n += ones;
            if ones < avail {
                return n;
            }
            word += 1;
            off = 0;
        }
        n
    }

    /// True when bits `0..n` are all set.
    pub(crate) fn low_all_ones(&self, n: usize) -> bool {
        self.run_ones_at(0) >= n
    }

    /// The low `n` bits as one word (`n` <= 64).
    pub(crate) fn low_word(&self, n: usize) -> u64 {
        debug_assert!(n <= WORD_BITS);
        let w = self.words.first().copied().unwrap_or(0);
        if n == WORD_BITS { w } else { w & ((1u64 << n) - 1) }
    }

    /// Clears bits `0..n`.
    fn clear_low(&mut self, n: usize) {
        let full = (n / WORD_BITS).min(self.words.len());
        for w in &mut self.words[..full] {
            *w = 0;
        }
        let rem = n % WORD_BITS;
        if rem != 0 {
            if let Some(w) = self.words.get_mut(full) {
                *w &= !((1u64 << rem) - 1);
            }
        }
    }

    /// The complement restricted to the low `len` bits.
    fn complement(&self, len: usize) -> Mask {
        let nwords = len.div_ceil(WORD_BITS);
        let mut words: Vec<u64> = (0..nwords)
            .map(|i| !self.words.get(i).copied().unwrap_or(0))
            .collect();
        let rem = len % WORD_BITS;
        if rem != 0 {
            if let Some(w) = words.last_mut() {
                *w &= (1u64 << rem) - 1;
            }
        }
        Mask { words }
    }

    /// Set-bit positions in ascending order.
    pub(crate) fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            let mut w = w;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let b = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(i * WORD_BITS + b)
            })
        })
    }

    /// Maximal runs of bits equal to `target` within `0..len`, as ascending
    /// bit ranges. A zero mask with `target == false` yields one run `0..len`.
    pub(crate) fn runs(&self, len: usize, target: bool) -> Vec<Range<usize>> {
        let mut m = if target {
            self.clone()
        } else {
            self.complement(len)
        };
        let mut out = Vec::new();
        while let Some(i) = m.lowest_set() {
            if i >= len {
                break;
            }
            let k = m.run_ones_at(i);
            out.push(i..(i + k).min(len));
            m.clear_low(i + k);
        }
        out
    }
}
