use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

/// A queued deadline for one generation of an element's TTL.
#[derive(Debug)]
pub(crate) struct Expiration<T> {
    pub time: Instant,
    pub generation: u64,
    pub item: T,
    seq: u64,
}

impl<T> Ord for Expiration<T> {
    // Larger element is the one that expires first, so that a max-heap will pop old elements.
    // Equal deadlines pop in insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then(self.seq.cmp(&other.seq))
            .reverse()
    }
}
impl<T> PartialOrd for Expiration<T> {
    fn partial_cmp(&self, other: &Expiration<T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> PartialEq for Expiration<T> {
    fn eq(&self, other: &Expiration<T>) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}
impl<T> Eq for Expiration<T> {}

/// Expirations ordered soonest first. Entries are never updated in place;
/// a superseded entry stays queued until it comes due and the caller decides
/// whether it is still current.
#[derive(Debug)]
pub(crate) struct ExpiryQueue<T> {
    heap: BinaryHeap<Expiration<T>>,
    next_seq: u64,
}

impl<T> Default for ExpiryQueue<T> {
    fn default() -> Self {
        ExpiryQueue {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> ExpiryQueue<T> {
    pub fn push(&mut self, item: T, time: Instant, generation: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Expiration {
            time,
            generation,
            item,
            seq,
        });
    }

    pub fn peek(&self) -> Option<&Expiration<T>> {
        self.heap.peek()
    }

    pub fn pop(&mut self) -> Option<Expiration<T>> {
        self.heap.pop()
    }

    /// Pops the soonest entry if its deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Expiration<T>> {
        if self.peek().map_or(false, |exp| exp.time <= now) {
            self.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
