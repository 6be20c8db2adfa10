use std::cmp::Ordering;

/// A binary max-heap with an optional capacity limit.
///
/// With a limit of `k`, the queue keeps the k smallest elements pushed so
/// far: once full, a push only succeeds if the new element is strictly
/// smaller than the current maximum, which it then overwrites in O(log k).
/// A limit of 0 means unbounded.
///
/// The backing storage is heap-ordered, **not** sorted: [`as_slice`] and
/// [`into_inner`] expose elements in heap order, with the maximum first.
/// Callers that need ascending order must sort explicitly.
///
/// [`as_slice`]: BoundedPriorityQueue::as_slice
/// [`into_inner`]: BoundedPriorityQueue::into_inner
#[derive(Debug, Clone)]
pub struct BoundedPriorityQueue<T> {
    heap: Vec<T>,
    limit: usize,
}

impl<T: Ord> BoundedPriorityQueue<T> {
    /// Create an unbounded queue.
    pub fn new() -> Self {
        Self::with_limit(0)
    }

    /// Create a queue keeping at most `limit` elements; 0 means unbounded.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            heap: Vec::new(),
            limit,
        }
    }

    /// The capacity limit; 0 means unbounded.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The number of elements currently held.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the queue holds no elements.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` if a bounded queue has reached its limit.
    pub fn is_full(&self) -> bool {
        self.limit > 0 && self.heap.len() == self.limit
    }

    /// The current maximum, or `None` if the queue is empty.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Insert an element.
    ///
    /// Below the limit this is a plain heap insert. At the limit, the
    /// element is accepted only if it is strictly smaller than the current
    /// maximum, which it replaces; otherwise it is discarded.
    pub fn push(&mut self, item: T) {
        if self.is_full() {
            if let Some(top) = self.heap.first() {
                if item < *top {
                    self.heap[0] = item;
                    self.sift_down(0);
                }
            }
        } else {
            self.heap.push(item);
            self.sift_up(self.heap.len() - 1);
        }
    }

    /// Remove and return the current maximum.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let item = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    /// Remove one element comparing equal to `item` under the heap's order
    /// relation, if any, returning whether an element was removed.
    ///
    /// The search is a pre-order probe that skips subtrees whose root is
    /// already smaller than `item`.
    pub fn erase(&mut self, item: &T) -> bool {
        let Some(pos) = self.probe(0, item) else {
            return false;
        };
        self.heap.swap_remove(pos);
        if pos < self.heap.len() {
            // The element swapped in came from a leaf: restore the heap
            // property in whichever direction it is violated.
            self.sift_down(pos);
            self.sift_up(pos);
        }
        true
    }

    /// Remove every element, keeping the limit.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// The backing storage, in heap order.
    pub fn as_slice(&self) -> &[T] {
        &self.heap
    }

    /// Consume the queue, returning the backing storage in heap order.
    pub fn into_inner(self) -> Vec<T> {
        self.heap
    }

    fn probe(&self, pos: usize, item: &T) -> Option<usize> {
        if pos >= self.heap.len() {
            return None;
        }
        match item.cmp(&self.heap[pos]) {
            // Everything below this position is no larger than it.
            Ordering::Greater => None,
            Ordering::Equal => Some(pos),
            Ordering::Less => self
                .probe(2 * pos + 1, item)
                .or_else(|| self.probe(2 * pos + 2, item)),
        }
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.heap[pos] <= self.heap[parent] {
                break;
            }
            self.heap.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let left = 2 * pos + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let largest = if right < self.heap.len() && self.heap[left] < self.heap[right] {
                right
            } else {
                left
            };
            if self.heap[largest] <= self.heap[pos] {
                break;
            }
            self.heap.swap(pos, largest);
            pos = largest;
        }
    }
}

impl<T: Ord> Default for BoundedPriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
