//! The lock-free counter store.
//!
//! [`Progress`] is a concurrent map from counter name to a signed 64-bit
//! value, optimized for progress tracking: a small set of keys that grows
//! early and then stabilizes, hammered by increments from many threads.
//!
//! # Architecture
//!
//! The store holds a single atomically-swapped pointer to an immutable
//! state:
//!
//! ```text
//!   Progress ──ArcSwap──► ProgressState v3 (immutable)
//!                           ├── counters:    name ──► Arc<Slot>
//!                           └── sorted_keys: [a, b, c, ...]
//!
//!   inc/set/get on an existing key:  load state, atomic op on the slot
//!   first use of a new key:          clone state + insert, publish via CAS
//! ```
//!
//! Slots are heap-allocated cells referenced from the state, never embedded
//! in it. Publishing a new state therefore never invalidates a slot obtained
//! from an older state: an increment racing a key insertion always lands.
//!
//! Old state versions are reclaimed by reference counting once the last
//! reader drops them.

use std::collections::HashMap;
use std::fmt::Debug;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use crossbeam_utils::CachePadded;

/// The cell holding one counter's current value.
///
/// Padded to its own cache line so two hot counters allocated next to each
/// other don't false-share.
pub(crate) type Slot = CachePadded<AtomicI64>;

/// One immutable version of the full name-to-slot mapping.
///
/// `sorted_keys` is kept redundantly, pre-sorted, so snapshot iteration
/// never pays a sort. Invariant: it is exactly the key set of `counters`,
/// duplicate-free, in ascending lexicographic order. Key strings are shared
/// between the map and the sorted list.
struct ProgressState {
    counters: HashMap<Arc<str>, Arc<Slot>>,
    sorted_keys: Vec<Arc<str>>,
}

impl ProgressState {
    fn empty() -> Self {
        ProgressState {
            counters: HashMap::new(),
            sorted_keys: Vec::new(),
        }
    }

    /// Builds a successor state containing a fresh zeroed slot for `key`.
    ///
    /// The caller guarantees `key` is absent from `self`. The sorted key
    /// list is produced by a binary search for the insertion point and a
    /// single linear copy, not a re-sort.
    fn with_counter(&self, key: &str) -> (Self, Arc<Slot>) {
        let key: Arc<str> = Arc::from(key);
        let slot = Arc::new(Slot::new(AtomicI64::new(0)));

        let mut counters = HashMap::with_capacity(self.counters.len() + 1);
        for (k, v) in &self.counters {
            counters.insert(Arc::clone(k), Arc::clone(v));
        }
        counters.insert(Arc::clone(&key), Arc::clone(&slot));

        let pos = self
            .sorted_keys
            .binary_search_by(|k| k.as_ref().cmp(&*key))
            .unwrap_or_else(|pos| pos);
        let mut sorted_keys = Vec::with_capacity(self.sorted_keys.len() + 1);
        sorted_keys.extend_from_slice(&self.sorted_keys[..pos]);
        sorted_keys.push(key);
        sorted_keys.extend_from_slice(&self.sorted_keys[pos..]);

        (
            ProgressState {
                counters,
                sorted_keys,
            },
            slot,
        )
    }
}

/// A set of named counters, safe for concurrent use without external locking.
///
/// `Progress` behaves like a concurrent `HashMap<String, i64>` but is
/// optimized for progress tracking with small, stable key sets (typically
/// fitting on one screen). All operations are atomic and lock-free; once the
/// key set stops growing, every operation is allocation-free.
///
/// # Examples
///
/// ```rust
/// use progresso::Progress;
///
/// let progress = Progress::new();
///
/// progress.inc("done", 1);
/// progress.inc("done", 1);
/// progress.inc("errors", 1);
///
/// assert_eq!(progress.get("done"), 2);
/// assert_eq!(progress.get("errors"), 1);
/// assert_eq!(progress.get("never_used"), 0);
/// ```
///
/// Sharing across threads:
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use progresso::Progress;
///
/// let progress = Arc::new(Progress::new());
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let progress = Arc::clone(&progress);
///         thread::spawn(move || {
///             for _ in 0..1000 {
///                 progress.inc("done", 1);
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(progress.get("done"), 4000);
/// ```
pub struct Progress {
    state: ArcSwap<ProgressState>,
}

impl Progress {
    /// Creates an empty counter set.
    pub fn new() -> Self {
        Progress {
            state: ArcSwap::from_pointee(ProgressState::empty()),
        }
    }

    /// Atomically adds `delta` to the counter named `key`.
    ///
    /// `delta` may be negative. If the key has never been used, the counter
    /// is created with an initial value of 0 before the delta is applied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progresso::Progress;
    ///
    /// let progress = Progress::new();
    /// progress.inc("in_flight", 1);
    /// progress.inc("in_flight", -1);
    /// assert_eq!(progress.get("in_flight"), 0);
    /// ```
    #[inline]
    pub fn inc(&self, key: &str, delta: i64) {
        let state = self.state.load();
        if let Some(slot) = state.counters.get(key) {
            slot.fetch_add(delta, Ordering::Relaxed);
            return;
        }
        drop(state);
        self.create_slot(key).fetch_add(delta, Ordering::Relaxed);
    }

    /// Atomically sets the counter named `key` to `value`, creating it if
    /// it has never been used.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progresso::Progress;
    ///
    /// let progress = Progress::new();
    /// progress.set("total", 100);
    /// progress.inc("total", 5);
    /// assert_eq!(progress.get("total"), 105);
    /// ```
    #[inline]
    pub fn set(&self, key: &str, value: i64) {
        let state = self.state.load();
        if let Some(slot) = state.counters.get(key) {
            slot.store(value, Ordering::Relaxed);
            return;
        }
        drop(state);
        self.create_slot(key).store(value, Ordering::Relaxed);
    }

    /// Returns the current value of the counter named `key`, or 0 if the
    /// key has never been used. Never creates a counter.
    #[inline]
    pub fn get(&self, key: &str) -> i64 {
        self.state
            .load()
            .counters
            .get(key)
            .map_or(0, |slot| slot.load(Ordering::Relaxed))
    }

    /// Returns the number of distinct counters registered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.state.load().counters.len()
    }

    /// Returns `true` if no counter has been used yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state.load().counters.is_empty()
    }

    /// Returns an iterator over all counters in ascending lexicographic key
    /// order.
    ///
    /// The key set is pinned to the state version current when `iter` was
    /// called: counters created afterwards are not yielded. Each value is
    /// loaded atomically at the moment its entry is visited, so values may
    /// reflect writes that race the iteration. Partial consumption is valid
    /// and costs nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progresso::Progress;
    ///
    /// let progress = Progress::new();
    /// progress.inc("foo", 1);
    /// progress.inc("bar", 2);
    ///
    /// let entries: Vec<_> = progress
    ///     .iter()
    ///     .map(|(name, value)| (name.to_string(), value))
    ///     .collect();
    /// assert_eq!(entries, [("bar".to_string(), 2), ("foo".to_string(), 1)]);
    /// ```
    pub fn iter(&self) -> Iter {
        Iter {
            state: self.state.load_full(),
            next: 0,
        }
    }

    /// Slow path of get-or-create: publish a successor state containing
    /// `key` via compare-and-swap, retrying until either the CAS succeeds
    /// or some other thread has made the key visible.
    fn create_slot(&self, key: &str) -> Arc<Slot> {
        loop {
            let current = self.state.load_full();

            // Another thread may have won the race for this very key.
            if let Some(slot) = current.counters.get(key) {
                return Arc::clone(slot);
            }

            let (next, slot) = current.with_counter(key);
            let previous = self.state.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&*previous, &current) {
                return slot;
            }
            // Lost the race to a concurrent insertion (possibly of a
            // different key); rebuild against the fresh state.
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Progress {
    type Item = (Arc<str>, i64);
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

/// Iterator over the counters of a [`Progress`], in ascending lexicographic
/// key order. Created by [`Progress::iter`].
///
/// Holds one state version alive for its whole lifetime; dropping the
/// iterator releases it.
pub struct Iter {
    state: Arc<ProgressState>,
    next: usize,
}

impl Iterator for Iter {
    type Item = (Arc<str>, i64);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.state.sorted_keys.get(self.next)?;
        self.next += 1;
        let value = self
            .state
            .counters
            .get(&**key)
            .map_or(0, |slot| slot.load(Ordering::Relaxed));
        Some((Arc::clone(key), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.state.sorted_keys.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter {}
impl FusedIterator for Iter {}
