use core::cmp::Ordering;

use crate::command::ZIndex;

/// Stable paint-order key for a visible command.
///
/// Ordering rules:
/// 1) `z`: ascending (back-to-front)
/// 2) `order`: ascending (submission order for equal z)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub(crate) struct SortKey {
    pub z: ZIndex,
    /// Index in the pending list, i.e. submission order.
    pub order: usize,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: usize) -> Self {
        Self { z, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match self.z.cmp(&other.z) {
            Ordering::Equal => self.order.cmp(&other.order),
            o => o,
        }
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_z_sorts_first_regardless_of_order() {
        assert!(SortKey::new(ZIndex(0), 9) < SortKey::new(ZIndex(1), 0));
    }

    #[test]
    fn equal_z_keeps_submission_order() {
        let mut keys = vec![
            SortKey::new(ZIndex(2), 1),
            SortKey::new(ZIndex(0), 3),
            SortKey::new(ZIndex(2), 0),
            SortKey::new(ZIndex(0), 2),
        ];
        keys.sort_unstable();
        let orders: Vec<usize> = keys.iter().map(|k| k.order).collect();
        assert_eq!(orders, vec![2, 3, 0, 1]);
    }
}
