use crate::model::MenuItem;
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Case-insensitive, accent-aware name ordering for user-facing lists.
///
/// Names are compared first on their lowercased base letters (so "Éclair"
/// sorts with "eclair", not after "z"), then on the accents, then on the
/// raw text so the order is total.
pub fn localized_case_insensitive_cmp(left: &str, right: &str) -> Ordering {
    primary_key(left)
        .cmp(primary_key(right))
        .then_with(|| secondary_key(left).cmp(secondary_key(right)))
        .then_with(|| left.cmp(right))
}

fn primary_key(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn secondary_key(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd().flat_map(char::to_lowercase)
}

pub(crate) fn sorted_by_name(mut items: Vec<MenuItem>) -> Vec<MenuItem> {
    items.sort_by(|a, b| localized_case_insensitive_cmp(a.item_name(), b.item_name()));
    items
}
