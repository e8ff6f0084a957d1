//! Character-class tables shared by the predicate lists.
//!
//! One lookup per appended character; predicates test membership bits instead
//! of re-deriving the same `match` over and over.

use bitflags::bitflags;

bitflags! {
    /// Coarse character classes for the number grammar.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct CharKind: u8 {
        /// ASCII `0`..`9`.
        const DIGIT = 1 << 0;
        /// A recognized currency sign (`$`, `€`, `£`).
        const CURRENCY = 1 << 1;
        /// Permitted inside a number but ignored by the accumulator
        /// (currency, comma, space, parens, dash, percent, apostrophe, tabs).
        const IGNORE = 1 << 2;
        /// Any character allowed somewhere in a numeric rendering:
        /// digits, the decimal dot, and the IGNORE set.
        const NUMBER_ELEMENT = 1 << 3;
        /// May trail a finished number (space, closing paren).
        const ACCEPTABLE_END = 1 << 4;
    }
}

/// Classifies one character. Everything unlisted maps to `CharKind::empty()`.
pub(crate) fn kind(ch: char) -> CharKind {
    match ch {
        '0'..='9' => CharKind::DIGIT | CharKind::NUMBER_ELEMENT,
        '$' | '€' | '£' => CharKind::CURRENCY | CharKind::IGNORE | CharKind::NUMBER_ELEMENT,
        ' ' => CharKind::IGNORE | CharKind::NUMBER_ELEMENT | CharKind::ACCEPTABLE_END,
        ')' => CharKind::IGNORE | CharKind::NUMBER_ELEMENT | CharKind::ACCEPTABLE_END,
        ',' | '%' | '\n' | '\t' | '(' | '-' | '\'' => {
            CharKind::IGNORE | CharKind::NUMBER_ELEMENT
        }
        '.' => CharKind::NUMBER_ELEMENT,
        _ => CharKind::empty(),
    }
}

pub(crate) fn is_digit(ch: char) -> bool {
    kind(ch).contains(CharKind::DIGIT)
}

pub(crate) fn is_currency(ch: char) -> bool {
    kind(ch).contains(CharKind::CURRENCY)
}

pub(crate) fn is_number_element(ch: char) -> bool {
    kind(ch).contains(CharKind::NUMBER_ELEMENT)
}

pub(crate) fn is_acceptable_end(ch: char) -> bool {
    kind(ch).contains(CharKind::ACCEPTABLE_END)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_number_elements_but_not_ignored() {
        for ch in '0'..='9' {
            let k = kind(ch);
            assert!(k.contains(CharKind::DIGIT));
            assert!(k.contains(CharKind::NUMBER_ELEMENT));
            assert!(!k.contains(CharKind::IGNORE));
        }
    }

    #[test]
    fn dot_is_the_only_bare_number_element() {
        assert_eq!(kind('.'), CharKind::NUMBER_ELEMENT);
    }

    #[test]
    fn currencies_and_separators() {
        assert!(is_currency('€'));
        assert!(kind(',').contains(CharKind::IGNORE));
        assert!(is_acceptable_end(')'));
        assert!(!is_acceptable_end('('));
        assert!(!is_number_element('x'));
    }
}
