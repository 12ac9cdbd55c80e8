//! Binary min-heap keyed by weight, stable among equal weights.
//!
//! Every insert is stamped with a sequence number and entries compare by
//! `(weight, sequence)`, so of two equal-weight items the one inserted first
//! is extracted first.

#[derive(Debug, Clone)]
struct Entry<T> {
    weight: u64,
    seq: u64,
    item: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (u64, u64) {
        (self.weight, self.seq)
    }
}

#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<Entry<T>>,
    next_seq: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum HeapErr {
    HeapUnderflow,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap {
            elements: vec![],
            next_seq: 0,
        }
    }

    /// Heapifies `(weight, item)` pairs, stamping them in iteration order.
    pub fn build<I: IntoIterator<Item = (u64, T)>>(source: I) -> Self {
        let mut heap = MinHeap::new();
        for (weight, item) in source {
            let seq = heap.stamp();
            heap.elements.push(Entry { weight, seq, item });
        }
        let n = heap.heap_size();
        for i in (0..n / 2).rev() {
            heap.min_heapify(i);
        }
        heap
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    fn stamp(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.elements[a].key() < self.elements[b].key()
    }

    pub fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| !self.less(i, Self::parent(i)))
    }

    // callers pass an index inside the heap
    fn min_heapify(&mut self, mut i: usize) {
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < self.heap_size() && self.less(l, smallest) {
                smallest = l;
            }
            if r < self.heap_size() && self.less(r, smallest) {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    pub fn insert(&mut self, weight: u64, item: T) {
        let seq = self.stamp();
        self.elements.push(Entry { weight, seq, item });

        // sift up
        let mut i = self.heap_size() - 1;
        while i > 0 && self.less(i, Self::parent(i)) {
            let p = Self::parent(i);
            self.elements.swap(i, p);
            i = p;
        }
        debug_assert!(self.valid_min_heap());
    }

    pub fn extract_min(&mut self) -> Result<(u64, T), HeapErr> {
        if self.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let n = self.heap_size() - 1;
        self.elements.swap(0, n);
        let min = self.elements.pop().ok_or(HeapErr::HeapUnderflow)?;
        if !self.is_empty() {
            self.min_heapify(0);
        }
        Ok((min.weight, min.item))
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
