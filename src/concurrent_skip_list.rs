use std::borrow::Borrow;
use std::ops::RangeBounds;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::config::{SetOptions, SkipListConfig};
use crate::error::Result;
use crate::skip_list::SkipList;

/// `ConcurrentSkipList` shares one [`SkipList`] between threads behind a
/// single reader-writer lock.
///
/// Lookups, range scans, `min`, `max` and `size` take the lock in shared
/// mode; `set`, `delete`, `pop` and `lpop` take it exclusively. Cloning the
/// handle is cheap and every clone sees the same list.
///
/// Calling back into the same list from a `range` visitor that writes will
/// deadlock, since the visitor runs under the read lock.
#[derive(Debug)]
pub struct ConcurrentSkipList<K, V> {
    inner: Arc<RwLock<SkipList<K, V>>>,
}

impl<K, V> Clone for ConcurrentSkipList<K, V> {
    fn clone(&self) -> ConcurrentSkipList<K, V> {
        ConcurrentSkipList {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> ConcurrentSkipList<K, V>
where
    K: Ord,
{
    /// Create a new ConcurrentSkipList instance with the default configuration.
    pub fn new() -> ConcurrentSkipList<K, V> {
        Self::with_config(SkipListConfig::default())
    }

    /// Create a new ConcurrentSkipList instance.
    /// # Arguments
    /// - config: level count and generator seed for the list
    pub fn with_config(config: SkipListConfig) -> ConcurrentSkipList<K, V> {
        ConcurrentSkipList {
            inner: Arc::new(RwLock::new(SkipList::with_config(config))),
        }
    }

    /// Get the value stored for a given key.
    ///
    /// # Arguments
    ///
    /// - key: the given key
    ///
    /// Note that the `Ord` implementation of `Q` must match that of the
    /// skip list's key type `K`.
    ///
    /// # Returns
    ///
    /// A copy of the value, or `KeyNotFound`.
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    /// Get a copy of the value for a given key, or `V::default()` if absent.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone + Default,
    {
        self.inner.read().get_or_default(key)
    }

    /// Check if the skip list contains an instance of the key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().contains(key)
    }

    /// Get the due time recorded for a key, if any.
    pub fn due_time<Q>(&self, key: &Q) -> Result<Option<Instant>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.read().due_time(key)
    }

    /// Set the value for a given key, overwriting any previous value.
    pub fn set(&self, key: K, value: V) -> Result<()> {
        self.inner.write().set(key, value)
    }

    /// Set the value for a given key with explicit options.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if `options.if_absent` is set and the key is present.
    pub fn set_with(&self, key: K, value: V, options: SetOptions) -> Result<()> {
        self.inner.write().set_with(key, value, options)
    }

    /// Remove a given key.
    ///
    /// # Returns
    ///
    /// True if the key was present.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.write().delete(key)
    }

    /// Remove a given key, returning its value if it was present.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.inner.write().remove(key)
    }

    /// Visit the entries whose keys fall in `bounds`, in ascending order,
    /// holding the read lock for the whole scan. Iteration stops as soon as
    /// `visit` returns `false`.
    pub fn range<Q, R, F>(&self, bounds: R, visit: F)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
        F: FnMut(&K, &V) -> bool,
    {
        self.inner.read().range(bounds, visit)
    }

    /// Visit every entry in ascending order until `visit` returns `false`.
    pub fn scan<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.inner.read().scan(visit)
    }

    /// Get a copy of the entry with the smallest key.
    pub fn min(&self) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .min()
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    /// Get a copy of the entry with the greatest key.
    pub fn max(&self) -> Result<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .read()
            .max()
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    /// Remove and return the entry with the greatest key.
    pub fn pop(&self) -> Result<(K, V)> {
        self.inner.write().pop()
    }

    /// Remove and return the entry with the smallest key.
    pub fn lpop(&self) -> Result<(K, V)> {
        self.inner.write().lpop()
    }

    /// Remove every entry whose due time is at or before `now`.
    pub fn purge_expired(&self, now: Instant) -> usize {
        self.inner.write().purge_expired(now)
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.inner.write().clear()
    }

    /// Get the number of entries.
    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Check if the skip list has no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Get the highest level index any live node occupies.
    pub fn current_max_level(&self) -> usize {
        self.inner.read().current_max_level()
    }

    /// Count the live nodes by height.
    pub fn level_histogram(&self) -> Vec<usize> {
        self.inner.read().level_histogram()
    }

    /// Run `f` against the list under the read lock.
    pub fn read<T>(&self, f: impl FnOnce(&SkipList<K, V>) -> T) -> T {
        f(&self.inner.read())
    }

    /// Run `f` against the list under the write lock, so a sequence of
    /// operations applies without any other thread observing the middle.
    pub fn write<T>(&self, f: impl FnOnce(&mut SkipList<K, V>) -> T) -> T {
        f(&mut self.inner.write())
    }
}

impl<K: Ord, V> Default for ConcurrentSkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for ConcurrentSkipList<K, V> {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        ConcurrentSkipList {
            inner: Arc::new(RwLock::new(iter.into_iter().collect())),
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for ConcurrentSkipList<K, V> {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Ord, V> From<SkipList<K, V>> for ConcurrentSkipList<K, V> {
    fn from(skip_list: SkipList<K, V>) -> Self {
        ConcurrentSkipList {
            inner: Arc::new(RwLock::new(skip_list)),
        }
    }
}
