/// Declares one named predicate entry for a classifier's ordered list.
/// Crate-internal: the expansion names `pub(crate)` items.
///
/// ```ignore
/// predicate!("is_dash", |_cx, ch| ch == '-')
/// ```
macro_rules! predicate {
    ($name:literal, $eval:expr) => {
        $crate::classify::Predicate {
            name: $name,
            eval: $eval,
        }
    };
}
