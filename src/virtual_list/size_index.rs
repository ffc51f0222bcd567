//! SizeIndex - estimated item sizes with O(log n) prefix sums (Fenwick tree)
//!
//! Maps between item indices and row offsets so a scroll offset can be
//! turned into the index of the item under it.
//!
//! # Complexity
//!
//! - `push`: O(log n), amortized O(log n) when the tree grows
//! - `offset_of`: O(log n)
//! - `index_at`: O(log² n)
//! - `total`: O(1)

/// Prefix sums over per-item row counts.
#[derive(Debug, Clone, Default)]
pub struct SizeIndex {
    /// Fenwick tree over `sizes` (0-indexed API, capacity >= sizes.len())
    tree: Vec<usize>,
    /// Raw sizes, kept so the tree can be rebuilt when it grows
    sizes: Vec<usize>,
    total: usize,
}

impl SizeIndex {
    /// Creates an empty index with room for `capacity` items.
    ///
    /// # Examples
    ///
    /// ```
    /// # use exlv::virtual_list::SizeIndex;
    /// let index = SizeIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            sizes: Vec::with_capacity(capacity),
            total: 0,
        }
    }

    /// Builds an index from a sequence of sizes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use exlv::virtual_list::SizeIndex;
    /// let index = SizeIndex::from_sizes([3, 4, 5]);
    /// assert_eq!(index.total(), 12);
    /// assert_eq!(index.offset_of(2), 7);
    /// ```
    pub fn from_sizes(sizes: impl IntoIterator<Item = usize>) -> Self {
        let sizes: Vec<usize> = sizes.into_iter().collect();
        let mut index = Self::new(0);
        index.sizes = sizes;
        index.rebuild(index.sizes.len());
        index
    }

    /// Appends one item.
    pub fn push(&mut self, size: usize) {
        let idx = self.sizes.len();
        self.sizes.push(size);
        self.total += size;

        if idx >= self.tree.len() {
            // Nodes past the old end must cover earlier items too, so a grown
            // tree is rebuilt rather than zero-extended.
            self.rebuild(self.tree.len().max(1) * 2);
        } else {
            fenwick::array::update(&mut self.tree, idx, size);
        }
    }

    /// Row offset at which item `index` starts.
    ///
    /// `offset_of(len())` is the total height.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn offset_of(&self, index: usize) -> usize {
        assert!(
            index <= self.sizes.len(),
            "index {} out of bounds (len: {})",
            index,
            self.sizes.len()
        );
        if index == 0 {
            0
        } else {
            fenwick::array::prefix_sum(&self.tree, index - 1)
        }
    }

    /// Rows occupied by item `index`.
    pub fn size_of(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    /// Index of the item covering row `offset`.
    ///
    /// Returns `None` if `offset >= total()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use exlv::virtual_list::SizeIndex;
    /// let index = SizeIndex::from_sizes([10, 20, 15]);
    /// assert_eq!(index.index_at(0), Some(0));
    /// assert_eq!(index.index_at(10), Some(1));
    /// assert_eq!(index.index_at(29), Some(1));
    /// assert_eq!(index.index_at(30), Some(2));
    /// assert_eq!(index.index_at(45), None);
    /// ```
    pub fn index_at(&self, offset: usize) -> Option<usize> {
        if offset >= self.total {
            return None;
        }

        // First index whose inclusive prefix sum exceeds offset
        let mut left = 0;
        let mut right = self.sizes.len();
        while left < right {
            let mid = left + (right - left) / 2;
            if fenwick::array::prefix_sum(&self.tree, mid) > offset {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.sizes.len()).then_some(left)
    }

    /// Total rows across all items.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of items indexed.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// `true` when no items are indexed.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Removes all items, keeping the allocation.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        self.sizes.clear();
        self.total = 0;
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity.max(self.sizes.len()), 0);
        for (idx, &size) in self.sizes.iter().enumerate() {
            fenwick::array::update(&mut self.tree, idx, size);
        }
        self.total = self.sizes.iter().sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_index() {
        let index = SizeIndex::new(10);
        assert!(index.is_empty());
        assert_eq!(index.total(), 0);
        assert_eq!(index.offset_of(0), 0);
        assert_eq!(index.index_at(0), None);
    }

    #[test]
    fn offsets_accumulate() {
        let mut index = SizeIndex::new(10);
        index.push(3);
        index.push(4);
        index.push(5);

        assert_eq!(index.offset_of(0), 0);
        assert_eq!(index.offset_of(1), 3);
        assert_eq!(index.offset_of(2), 7);
        assert_eq!(index.offset_of(3), 12);
        assert_eq!(index.total(), 12);
    }

    #[test]
    fn growth_past_capacity_keeps_sums_correct() {
        let mut index = SizeIndex::new(1);
        for _ in 0..100 {
            index.push(2);
        }

        assert_eq!(index.len(), 100);
        assert_eq!(index.offset_of(64), 128);
        assert_eq!(index.offset_of(100), 200);
        assert_eq!(index.index_at(199), Some(99));
    }

    #[test]
    fn clear_resets() {
        let mut index = SizeIndex::from_sizes([1, 2, 3]);
        index.clear();
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        index.push(4);
        assert_eq!(index.total(), 4);
        assert_eq!(index.offset_of(1), 4);
    }

    #[test]
    fn size_of_reports_raw_size() {
        let index = SizeIndex::from_sizes([1, 7]);
        assert_eq!(index.size_of(1), Some(7));
        assert_eq!(index.size_of(2), None);
    }

    proptest! {
        #[test]
        fn index_at_inverts_offset_of(sizes in prop::collection::vec(1usize..6, 1..200)) {
            let index = SizeIndex::from_sizes(sizes.iter().copied());
            for (i, size) in sizes.iter().enumerate() {
                let start = index.offset_of(i);
                prop_assert_eq!(index.index_at(start), Some(i));
                prop_assert_eq!(index.index_at(start + size - 1), Some(i));
            }
        }

        #[test]
        fn pushed_and_bulk_built_agree(sizes in prop::collection::vec(0usize..10, 0..100)) {
            let bulk = SizeIndex::from_sizes(sizes.iter().copied());
            let mut pushed = SizeIndex::new(0);
            for &s in &sizes {
                pushed.push(s);
            }
            for i in 0..=sizes.len() {
                prop_assert_eq!(bulk.offset_of(i), pushed.offset_of(i));
            }
        }
    }
}
