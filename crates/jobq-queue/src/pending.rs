use std::cmp::Ordering;
use std::collections::BinaryHeap;

use jobq_types::Priority;

use crate::job::JobEntry;

/// Pending jobs ordered by `(priority ascending, insertion order ascending)`
/// -- lower priority number first, FIFO within a priority level.
///
/// Backed by a binary heap keyed on `(priority, seq)` for O(log n)
/// selection, rather than the linear rescan the source this is based on
/// performs; observable dispatch order is identical either way.
pub(crate) struct PendingQueue<T, E> {
    heap: BinaryHeap<HeapItem<T, E>>,
    next_seq: u64,
}

impl<T, E> PendingQueue<T, E> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub(crate) fn insert(&mut self, priority: Priority, entry: JobEntry<T, E>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(HeapItem {
            priority,
            seq,
            entry,
        });
    }

    /// Remove and return the highest-priority, earliest-inserted entry.
    pub(crate) fn pop(&mut self) -> Option<JobEntry<T, E>> {
        self.heap.pop().map(|item| item.entry)
    }
}

/// Heap element. Ordering only ever consults `(priority, seq)`; `entry` is
/// inert payload. `BinaryHeap` is a max-heap, so the ordering is reversed
/// here (lower priority number, then lower seq, sorts "greater") to make
/// `pop()` return the minimum `(priority, seq)` pair.
struct HeapItem<T, E> {
    priority: Priority,
    seq: u64,
    entry: JobEntry<T, E>,
}

impl<T, E> PartialEq for HeapItem<T, E> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<T, E> Eq for HeapItem<T, E> {}

impl<T, E> PartialOrd for HeapItem<T, E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, E> Ord for HeapItem<T, E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: smaller priority number and smaller seq must compare
        // as "greater" so a max-heap pops them first.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn entry(id: u64) -> JobEntry<(), ()> {
        let (tx, _rx) = oneshot::channel();
        JobEntry {
            id: jobq_types::JobId::next(),
            body: Box::pin(async move {
                let _ = id;
                Ok(())
            }),
            completion: tx,
        }
    }

    #[test]
    fn pops_lowest_priority_number_first() {
        let mut q: PendingQueue<(), ()> = PendingQueue::new();

        let low = entry(1);
        let low_id = low.id;
        let high = entry(2);
        let high_id = high.id;
        let mid = entry(3);
        let mid_id = mid.id;

        q.insert(Priority::new(8).unwrap(), low);
        q.insert(Priority::new(1).unwrap(), high);
        q.insert(Priority::new(7).unwrap(), mid);

        assert_eq!(q.pop().unwrap().id, high_id);
        assert_eq!(q.pop().unwrap().id, mid_id);
        assert_eq!(q.pop().unwrap().id, low_id);
        assert!(q.pop().is_none());
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut q: PendingQueue<(), ()> = PendingQueue::new();
        let ids: Vec<_> = (0..3)
            .map(|i| {
                let e = entry(i);
                let id = e.id;
                q.insert(Priority::LOWEST, e);
                id
            })
            .collect();

        for expected in ids {
            let popped = q.pop().unwrap();
            assert_eq!(popped.id, expected);
        }
        assert!(q.pop().is_none());
    }
}
