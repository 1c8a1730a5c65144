//! Open-chained hash table from packed k-mer keys to counts.
//!
//! The table is specialised for the counting hot path: keys are already
//! well-mixed 2-bit packings, so the bucket is simply `key & mask` with a
//! power-of-two bucket count. Chains are intrusive singly-linked lists whose
//! nodes live in one arena and link to each other by index. Growth doubles the
//! bucket array and relinks the existing nodes in place; nothing is copied and
//! every node keeps its arena index.
//!
//! Entries are never removed and counts never decrease, so the number of live
//! entries is the arena length.
//!
//! ```rust
//! use knucleotide::table::CountTable;
//!
//! let mut table = CountTable::new();
//! table.increment(7);
//! table.increment(7);
//! table.add_from(9, 5);
//!
//! assert_eq!(table.get(7), 2);
//! assert_eq!(table.get(9), 5);
//! assert_eq!(table.get(1), 0);
//! assert_eq!(table.len(), 2);
//! ```

/// Chain terminator.
const NIL: usize = usize::MAX;

/// A fresh table starts with `1 << INITIAL_BITS` buckets.
const INITIAL_BITS: u32 = 9;

/// Minimum number of nodes reserved whenever the arena runs out of room.
const NODE_BATCH: usize = 256;

#[derive(Debug, Clone, Copy)]
struct Node {
    key: u64,
    count: u64,
    next: usize,
}

/// Counts per packed k-mer key.
///
/// The table has no internal synchronisation. It is written by exactly one
/// owner and becomes read-only once handed to a
/// [`ResultCell`](crate::cell::ResultCell).
#[derive(Debug, Clone)]
pub struct CountTable {
    buckets: Vec<usize>,
    mask: usize,
    nodes: Vec<Node>,
    threshold: usize,
}

impl Default for CountTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CountTable {
    /// Creates an empty table with 512 buckets.
    pub fn new() -> Self {
        let len = 1usize << INITIAL_BITS;
        Self {
            buckets: vec![NIL; len],
            mask: len - 1,
            nodes: Vec::with_capacity(NODE_BATCH),
            threshold: max_fill(len),
        }
    }

    /// Adds one occurrence of `key`, creating the entry if needed.
    #[inline]
    pub fn increment(&mut self, key: u64) {
        self.add_from(key, 1);
    }

    /// Adds `delta` occurrences of `key`, creating the entry if needed.
    ///
    /// Merging one table into another is a sequence of `add_from` calls.
    pub fn add_from(&mut self, key: u64, delta: u64) {
        let slot = self.slot(key);
        let mut cursor = self.buckets[slot];
        while cursor != NIL {
            let node = &mut self.nodes[cursor];
            if node.key == key {
                node.count += delta;
                return;
            }
            cursor = node.next;
        }

        self.push_node(slot, key, delta);
        if self.nodes.len() > self.threshold {
            self.grow();
        }
    }

    /// Returns the count for `key`, or 0 when absent. Never inserts.
    pub fn get(&self, key: u64) -> u64 {
        let mut cursor = self.buckets[self.slot(key)];
        while cursor != NIL {
            let node = &self.nodes[cursor];
            if node.key == key {
                return node.count;
            }
            cursor = node.next;
        }
        0
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current number of buckets (always a power of two).
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Sum of every count in the table.
    pub fn total(&self) -> u64 {
        self.nodes.iter().map(|n| n.count).sum()
    }

    /// Visits every `(key, count)` pair exactly once, in no particular order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(u64, u64),
    {
        for node in &self.nodes {
            visit(node.key, node.count);
        }
    }

    /// Iterates every `(key, count)` pair, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.nodes.iter().map(|n| (n.key, n.count))
    }

    /// Adds every entry of `other` into `self`.
    pub fn merge_from(&mut self, other: &Self) {
        other.for_each(|key, count| self.add_from(key, count));
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    const fn slot(&self, key: u64) -> usize {
        key as usize & self.mask
    }

    fn push_node(&mut self, slot: usize, key: u64, count: u64) {
        if self.nodes.len() == self.nodes.capacity() {
            let batch = self.nodes.len().max(NODE_BATCH);
            self.nodes.reserve(batch);
        }
        let index = self.nodes.len();
        self.nodes.push(Node {
            key,
            count,
            next: self.buckets[slot],
        });
        self.buckets[slot] = index;
    }

    /// Doubles the bucket array and rehomes every node at `key & new_mask`.
    fn grow(&mut self) {
        let len = self.buckets.len() << 1;
        let mask = len - 1;
        let mut buckets = vec![NIL; len];

        for head in std::mem::take(&mut self.buckets) {
            let mut cursor = head;
            while cursor != NIL {
                let node = &mut self.nodes[cursor];
                let next = node.next;
                #[allow(clippy::cast_possible_truncation)]
                let slot = node.key as usize & mask;
                node.next = buckets[slot];
                buckets[slot] = cursor;
                cursor = next;
            }
        }

        self.buckets = buckets;
        self.mask = mask;
        self.threshold = max_fill(len);
    }
}

/// Growth threshold: three quarters of the bucket count.
const fn max_fill(buckets: usize) -> usize {
    buckets / 4 * 3
}
