//! The ordered base predicate list.
//!
//! Order matters twice over: `idx` constants index straight into the mask
//! vector, and a predicate may read bits already produced for the same
//! character by anything declared above it.

use crate::chars;
use crate::classify::{Ctx, Predicate};

/// Mask positions, matching declaration order below.
pub(crate) mod idx {
    pub(crate) const IS_NUMBER_ELEMENT: usize = 0;
    pub(crate) const IS_DASH: usize = 1;
    pub(crate) const IS_DOT: usize = 2;
    pub(crate) const IS_ZERO: usize = 3;
    pub(crate) const IS_DIGIT: usize = 4;
    pub(crate) const IS_DEF_NOT_NUMBER: usize = 5;
    pub(crate) const IS_ACCEPTABLE_START: usize = 6;
    pub(crate) const IS_ACCEPTABLE_END: usize = 7;
    pub(crate) const IS_CLOSE_PAREN: usize = 8;
    pub(crate) const IS_CURRENCY: usize = 9;
    pub(crate) const IS_PERCENT: usize = 10;
    pub(crate) const IS_OPEN_PAREN: usize = 11;
    pub(crate) const IS_TOKEN: usize = 12;
    pub(crate) const BASE_LEN: usize = 13;

    // Date extension, appended after the base list.
    pub(crate) const IS_COMMA: usize = 13;
    pub(crate) const IS_SPACE: usize = 14;
    pub(crate) const IS_MONTH: usize = 15;
    pub(crate) const IS_SLASH: usize = 16;
    pub(crate) const IS_MONTH_PART: usize = 17;
    pub(crate) const IS_MONTH_DONE: usize = 18;
    pub(crate) const IS_APOSTROPHE: usize = 19;
    pub(crate) const IS_FOUR_DIGITS: usize = 20;
}

pub(crate) fn base_predicates() -> Vec<Predicate> {
    vec![
        predicate!("is_number_element", |_cx: &Ctx<'_>, ch: char| {
            chars::is_number_element(ch)
        }),
        predicate!("is_dash", |_cx: &Ctx<'_>, ch: char| ch == '-'),
        predicate!("is_dot", |_cx: &Ctx<'_>, ch: char| ch == '.'),
        predicate!("is_zero", |_cx: &Ctx<'_>, ch: char| ch == '0'),
        predicate!("is_digit", |_cx: &Ctx<'_>, ch: char| chars::is_digit(ch)),
        predicate!("is_def_not_number", |_cx: &Ctx<'_>, ch: char| {
            !chars::is_number_element(ch)
        }),
        predicate!("is_acceptable_start", acceptable_start),
        predicate!("is_acceptable_end", |_cx: &Ctx<'_>, ch: char| {
            chars::is_acceptable_end(ch)
        }),
        predicate!("is_close_paren", |_cx: &Ctx<'_>, ch: char| ch == ')'),
        predicate!("is_currency", |_cx: &Ctx<'_>, ch: char| {
            chars::is_currency(ch)
        }),
        predicate!("is_percent", |_cx: &Ctx<'_>, ch: char| ch == '%'),
        predicate!("is_open_paren", |_cx: &Ctx<'_>, ch: char| ch == '('),
        predicate!("is_token", |cx: &Ctx<'_>, ch: char| ch == cx.token),
    ]
}

/// Spaces and currency signs may open a number, but only while every
/// character so far has also been one: the mask being all-ones is exactly
/// "still in the leading run".
fn acceptable_start(cx: &Ctx<'_>, ch: char) -> bool {
    (ch == ' ' || chars::is_currency(ch))
        && cx.masks[idx::IS_ACCEPTABLE_START].low_all_ones(cx.buffer.len())
}
