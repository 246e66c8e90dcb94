use std::hash::Hash;

use hashbrown::HashSet;
use rime_error::rime_panic;

/// The elements of `a` that do not occur in `b`, keeping their order.
///
/// Duplicates within `a` are kept.
pub fn difference<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let exclude: HashSet<&T> = b.iter().collect();
    a.iter().filter(|v| !exclude.contains(v)).cloned().collect()
}

/// The largest of `values`. Among equal maxima the first wins.
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn max_of<T: PartialOrd + Clone>(values: &[T]) -> T {
    let Some((first, rest)) = values.split_first() else {
        rime_panic!("max_of requires at least one value")
    };
    rest.iter()
        .fold(first, |max, v| if v > max { v } else { max })
        .clone()
}
