use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::{hash_set, HashMap, HashSet};
use std::hash::Hash;
use std::iter::FusedIterator;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::expiry_queue::ExpiryQueue;
use crate::{Clock, Error, Expiry, Result, SystemClock, TimeUnit, TtlSet};

/// A `HashSet` whose elements may expire.
///
/// Elements inserted with [`insert`](ExpirableSet::insert) are permanent.
/// Elements inserted with a TTL get an expiry record; the latest record for an
/// element always wins, and older queued deadlines for it are ignored when
/// they come due.
#[derive(Debug)]
pub struct ExpirableSet<T, C = SystemClock> {
    clock: C,
    members: HashSet<T>,
    expiration_times: HashMap<T, Record>,
    expiration_index: ExpiryQueue<T>,
    // Elements evicted by a drain, until they are inserted or removed again.
    expired: HashSet<T>,
    next_generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Record {
    expiry: Expiry,
    generation: u64,
}

impl<T: Eq + Hash> ExpirableSet<T, SystemClock> {
    pub fn new() -> ExpirableSet<T, SystemClock> {
        ExpirableSet::with_clock(SystemClock)
    }

    pub fn with_capacity(capacity: usize) -> ExpirableSet<T, SystemClock> {
        ExpirableSet::with_capacity_and_clock(capacity, SystemClock)
    }
}

impl<T: Eq + Hash, C: Clock + Default> Default for ExpirableSet<T, C> {
    fn default() -> Self {
        ExpirableSet::with_clock(C::default())
    }
}

impl<T: Eq + Hash, C: Clock> ExpirableSet<T, C> {
    pub fn with_clock(clock: C) -> ExpirableSet<T, C> {
        ExpirableSet::with_capacity_and_clock(0, clock)
    }

    pub fn with_capacity_and_clock(capacity: usize, clock: C) -> ExpirableSet<T, C> {
        ExpirableSet {
            clock,
            members: HashSet::with_capacity(capacity),
            expiration_times: HashMap::new(),
            expiration_index: ExpiryQueue::default(),
            expired: HashSet::new(),
            next_generation: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Evicts every element whose current deadline is at or before `threshold`.
    fn incremental_clean(&mut self, threshold: Instant) -> usize {
        let mut evicted = 0;
        while let Some(exp) = self.expiration_index.pop_due(threshold) {
            match self.expiration_times.entry(exp.item) {
                Entry::Occupied(occ) if occ.get().generation == exp.generation => {
                    let (item, _) = occ.remove_entry();
                    self.members.remove(&item);
                    self.expired.insert(item);
                    evicted += 1;
                }
                _ => trace!(generation = exp.generation, "skipping stale expiration"),
            }
        }
        if evicted > 0 {
            trace!(
                evicted,
                pending = self.expiration_index.len(),
                "evicted expired elements"
            );
        }
        evicted
    }

    fn clean_now(&mut self) {
        let now = self.clock.now();
        self.incremental_clean(now);
    }

    /// Adds a permanent element. An element that is already a member keeps
    /// its current TTL.
    ///
    /// Returns `true` if the element was not a member.
    pub fn insert(&mut self, item: T) -> bool {
        self.clean_now();
        self.expired.remove(&item);
        self.members.insert(item)
    }

    /// Removes an element and forgets its TTL.
    ///
    /// Returns `true` if the element was a member.
    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.clean_now();
        // Any queued deadline for the dropped record no longer matches a
        // current generation and is skipped when it comes due.
        self.expiration_times.remove(item);
        self.expired.remove(item);
        self.members.remove(item)
    }

    pub fn contains<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.clean_now();
        self.members.contains(item)
    }

    /// Number of live elements.
    pub fn len(&mut self) -> usize {
        self.clean_now();
        self.members.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Evicts everything that has expired and returns how many elements went.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        self.incremental_clean(now)
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.expiration_times.clear();
        self.expiration_index.clear();
        self.expired.clear();
    }

    /// The deadline of an element. Permanent members report [`Expiry::Never`].
    ///
    /// This does not evict anything, so an element whose deadline has passed
    /// but that has not been evicted yet still reports that deadline.
    pub fn get_expiry<Q>(&self, item: &Q) -> Result<Expiry>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.expiration_times.get(item) {
            Some(record) => Ok(record.expiry),
            None if self.members.contains(item) => Ok(Expiry::Never),
            None => Err(Error::NotFound),
        }
    }

    /// Whether the element's TTL has run out, whether or not it has been
    /// evicted yet.
    ///
    /// Never evicts. An evicted element keeps reporting `true` until it is
    /// inserted or removed again. Permanent elements and elements that never
    /// had a TTL report `false`.
    pub fn has_expired<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.expiration_times.get(item) {
            Some(record) => record.expiry.is_due(self.clock.now()),
            None => self.expired.contains(item),
        }
    }

    /// Iterates over the live elements.
    ///
    /// Expired elements are evicted before iteration starts. An element whose
    /// deadline passes while the iterator is alive is still yielded; it is
    /// evicted by the next operation on the set.
    pub fn iter(&mut self) -> Iter<'_, T> {
        self.clean_now();
        Iter {
            inner: self.members.iter(),
        }
    }
}

impl<T: Eq + Hash + Clone, C: Clock> ExpirableSet<T, C> {
    /// Adds an element that expires after `ttl` units of `unit`.
    ///
    /// A negative `ttl` makes the element permanent. A `ttl` of zero sets the
    /// deadline to the current instant, so the element is evicted by the very
    /// next operation. A new TTL replaces any earlier one for the element,
    /// whether it is longer or shorter.
    ///
    /// Returns `true` if the element was not a member. Fails with
    /// [`Error::InvalidArgument`] without touching the set if the deadline is
    /// not representable.
    pub fn insert_with_ttl(&mut self, item: T, ttl: i64, unit: TimeUnit) -> Result<bool> {
        let now = self.clock.now();
        let expiry = deadline(now, ttl, unit)?;
        self.incremental_clean(now);
        Ok(self.insert_record(item, expiry))
    }

    /// Adds an element that expires after `ttl`.
    pub fn insert_for(&mut self, item: T, ttl: Duration) -> Result<bool> {
        let now = self.clock.now();
        let time = now.checked_add(ttl).ok_or_else(|| {
            let millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
            debug!(ttl_ms = millis, "rejecting out of range ttl");
            Error::InvalidArgument {
                ttl: millis,
                unit: TimeUnit::Milliseconds,
            }
        })?;
        self.incremental_clean(now);
        Ok(self.insert_record(item, Expiry::At(time)))
    }

    fn insert_record(&mut self, item: T, expiry: Expiry) -> bool {
        let generation = self.next_generation;
        self.next_generation += 1;
        if let Expiry::At(time) = expiry {
            self.expiration_index.push(item.clone(), time, generation);
        }
        self.expiration_times
            .insert(item.clone(), Record { expiry, generation });
        self.expired.remove(&item);
        self.members.insert(item)
    }
}

fn deadline(now: Instant, ttl: i64, unit: TimeUnit) -> Result<Expiry> {
    if ttl < 0 {
        return Ok(Expiry::Never);
    }
    unit.to_duration(ttl.unsigned_abs())
        .and_then(|duration| now.checked_add(duration))
        .map(Expiry::At)
        .ok_or_else(|| {
            debug!(ttl, %unit, "rejecting out of range ttl");
            Error::InvalidArgument { ttl, unit }
        })
}

impl<T: Eq + Hash + Clone, C: Clock> TtlSet<T> for ExpirableSet<T, C> {
    fn insert(&mut self, item: T) -> bool {
        ExpirableSet::insert(self, item)
    }

    fn insert_with_ttl(&mut self, item: T, ttl: i64, unit: TimeUnit) -> Result<bool> {
        ExpirableSet::insert_with_ttl(self, item, ttl, unit)
    }

    fn remove(&mut self, item: &T) -> bool {
        ExpirableSet::remove(self, item)
    }

    fn contains(&mut self, item: &T) -> bool {
        ExpirableSet::contains(self, item)
    }

    fn len(&mut self) -> usize {
        ExpirableSet::len(self)
    }

    type Iter<'a>
        = Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn iter(&mut self) -> Iter<'_, T> {
        ExpirableSet::iter(self)
    }
}

impl<T: Eq + Hash, C: Clock> Extend<T> for ExpirableSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.clean_now();
        for item in iter {
            self.expired.remove(&item);
            self.members.insert(item);
        }
    }
}

impl<T: Eq + Hash> FromIterator<T> for ExpirableSet<T, SystemClock> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = ExpirableSet::new();
        set.extend(iter);
        set
    }
}

/// Iterator over the live elements of an [`ExpirableSet`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: hash_set::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}
