//! Vec-backed binary max-heap over `(item, priority)` pairs.
//!
//! Priorities are plain `f64`s; callers guarantee they are never NaN (the
//! renderer clamps weights and costs before dividing). Ties break by heap
//! order, which is deterministic for a given insertion sequence.

/// Max-priority queue. `insert` and `pop` are O(log n), `peek` is O(1).
#[derive(Debug, Clone)]
pub struct MaxQueue<T> {
    heap: Vec<Entry<T>>,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    priority: f64,
}

impl<T> Default for MaxQueue<T> {
    fn default() -> Self {
        Self { heap: Vec::new() }
    }
}

impl<T> MaxQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Append then sift up.
    pub fn insert(&mut self, item: T, priority: f64) {
        self.heap.push(Entry { item, priority });
        self.sift_up(self.heap.len() - 1);
    }

    /// Highest-priority entry without removing it.
    pub fn peek(&self) -> Option<(&T, f64)> {
        self.heap.first().map(|e| (&e.item, e.priority))
    }

    /// Remove and return the highest-priority entry: swap the last leaf to
    /// the root and sift down.
    pub fn pop(&mut self) -> Option<(T, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let entry = self.heap.pop().map(|e| (e.item, e.priority));
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        entry
    }

    /// Drain all entries in unspecified order. Used to merge queues.
    pub fn drain(&mut self) -> Vec<(T, f64)> {
        self.heap.drain(..).map(|e| (e.item, e.priority)).collect()
    }

    /// Fold another queue's entries into this one.
    pub fn merge(&mut self, mut other: MaxQueue<T>) {
        for (item, priority) in other.drain() {
            self.insert(item, priority);
        }
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].priority <= self.heap[parent].priority {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut largest = idx;
            if left < len && self.heap[left].priority > self.heap[largest].priority {
                largest = left;
            }
            if right < len && self.heap[right].priority > self.heap[largest].priority {
                largest = right;
            }
            if largest == idx {
                break;
            }
            self.heap.swap(idx, largest);
            idx = largest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_priority_order() {
        let mut q = MaxQueue::new();
        for (item, p) in [("low", 1.0), ("high", 9.0), ("mid", 4.0)] {
            q.insert(item, p);
        }
        assert_eq!(q.peek(), Some((&"high", 9.0)));
        assert_eq!(q.pop(), Some(("high", 9.0)));
        assert_eq!(q.pop(), Some(("mid", 4.0)));
        assert_eq!(q.pop(), Some(("low", 1.0)));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn empty_queue_behaves() {
        let mut q: MaxQueue<u32> = MaxQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.peek(), None);
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn merge_preserves_all_entries() {
        let mut a = MaxQueue::new();
        a.insert(1, 1.0);
        a.insert(3, 3.0);
        let mut b = MaxQueue::new();
        b.insert(2, 2.0);
        b.insert(4, 4.0);
        a.merge(b);
        assert_eq!(a.len(), 4);
        let order: Vec<i32> = std::iter::from_fn(|| a.pop().map(|(i, _)| i)).collect();
        assert_eq!(order, vec![4, 3, 2, 1]);
    }

    #[test]
    fn heap_order_holds_under_churn() {
        let mut q = MaxQueue::new();
        // Deterministic pseudo-random priorities.
        let mut x: u64 = 0x9e3779b9;
        for i in 0..200 {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            q.insert(i, (x >> 33) as f64);
        }
        let mut prev = f64::INFINITY;
        while let Some((_, p)) = q.pop() {
            assert!(p <= prev, "heap returned {p} after {prev}");
            prev = p;
        }
    }
}
