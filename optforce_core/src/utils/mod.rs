//! Small helpers shared across modules
use std::hash::Hash;

use indexmap::IndexSet;

/// Collect the distinct items of `items`, keeping the order of first appearance
pub(crate) fn unique_in_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    items.into_iter().collect::<IndexSet<T>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_appearance() {
        assert_eq!(unique_in_order(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(unique_in_order(Vec::<usize>::new()).is_empty());
    }
}
