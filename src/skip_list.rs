use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};
use std::time::Instant;

use crate::config::{SetOptions, SkipListConfig};
use crate::error::{Result, SkipListError};
use crate::level::LevelSelector;
use crate::node::{Arena, Item, Node, NodeId};

/// `SkipList` is an ordered map built on William Pugh's skip list, with
/// the nodes kept in an arena and a tail link for O(1) access to the
/// greatest entry.
///
/// This type has no internal locking: mutating methods take `&mut self`.
/// Use [`ConcurrentSkipList`](crate::ConcurrentSkipList) to share one list
/// between threads.
#[derive(Debug, Clone)]
pub struct SkipList<K, V> {
    nodes: Arena<K, V>,
    tail: NodeId,
    len: usize,
    max_levels: usize,
    // Highest level index occupied by any live node.
    current_max_level: usize,
    levels: LevelSelector,
}

impl<K, V> SkipList<K, V>
where
    K: Ord,
{
    /// Create an empty skip list with the default configuration.
    pub fn new() -> SkipList<K, V> {
        Self::with_config(SkipListConfig::default())
    }

    /// Create an empty skip list.
    ///
    /// An out of range `max_levels` is replaced by the default rather than
    /// rejected.
    pub fn with_config(config: SkipListConfig) -> SkipList<K, V> {
        let max_levels = config.resolved_max_levels();
        SkipList {
            nodes: Arena::new(max_levels + 1),
            tail: NodeId::HEAD,
            len: 0,
            max_levels,
            current_max_level: 0,
            levels: LevelSelector::new(config.seed),
        }
    }

    /// Get the value stored for a given key.
    ///
    /// # Errors
    ///
    /// [`SkipListError::KeyNotFound`] if the key is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key).ok_or(SkipListError::KeyNotFound)?;
        Ok(&self.nodes[id].item().value)
    }

    /// Get a mutable reference to the value stored for a given key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key).ok_or(SkipListError::KeyNotFound)?;
        Ok(&mut self.nodes[id].item_mut().value)
    }

    /// Get a copy of the value for a given key, or `V::default()` if absent.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Check if the skip list contains the key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Get the due time recorded for a key, if any.
    pub fn due_time<Q>(&self, key: &Q) -> Result<Option<Instant>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key).ok_or(SkipListError::KeyNotFound)?;
        Ok(self.nodes[id].item().due_time)
    }

    /// Set the value for a given key, overwriting any previous value.
    pub fn set(&mut self, key: K, value: V) -> Result<()> {
        self.set_with(key, value, SetOptions::default())
    }

    /// Set the value for a given key.
    ///
    /// Overwriting keeps the node where it is; only the value and the due
    /// time change.
    ///
    /// # Errors
    ///
    /// [`SkipListError::DuplicateKey`] if `options.if_absent` is set and the
    /// key is present. Nothing is modified in that case.
    pub fn set_with(&mut self, key: K, value: V, options: SetOptions) -> Result<()> {
        let height = self.levels.choose(self.max_levels);
        let top = height - 1;
        let (predecessors, _) = self.find_predecessors(&key, top, false);

        if let Some(existing) = self.nodes[predecessors[0]].forward[0] {
            if self.compare(existing, &key) == Ordering::Equal {
                if options.if_absent {
                    return Err(SkipListError::DuplicateKey);
                }
                let item = self.nodes[existing].item_mut();
                item.value = value;
                item.due_time = options.due_time;
                tracing::trace!(len = self.len, "overwrote entry");
                return Ok(());
            }
        }

        let item = Item {
            key,
            value,
            due_time: options.due_time,
        };
        let id = self.nodes.insert(Node::new(item, height));
        for (level, &prev) in predecessors.iter().enumerate() {
            let next = self.nodes[prev].forward[level];
            self.nodes[id].forward[level] = next;
            self.nodes[prev].forward[level] = Some(id);
        }
        self.nodes[id].prev = predecessors[0];
        match self.nodes[id].forward[0] {
            Some(next) => self.nodes[next].prev = id,
            None => self.tail = id,
        }
        self.current_max_level = self.current_max_level.max(top);
        self.len += 1;
        tracing::trace!(level = top, len = self.len, "inserted entry");
        Ok(())
    }

    /// Remove a given key.
    ///
    /// # Returns
    ///
    /// True if the key was present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Remove a given key, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Visit the entries whose keys fall in `bounds`, in ascending order.
    ///
    /// Iteration stops early as soon as `visit` returns `false`.
    ///
    /// ```
    /// use skipkv::SkipList;
    ///
    /// let list: SkipList<i32, &str> =
    ///     SkipList::from([(2, "b"), (3, "c"), (21, "u"), (34, "h"), (62, "j")]);
    /// let mut keys = Vec::new();
    /// list.range(3..34, |key, _| {
    ///     keys.push(*key);
    ///     true
    /// });
    /// assert_eq!(keys, vec![3, 21]);
    /// ```
    pub fn range<Q, R, F>(&self, bounds: R, mut visit: F)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        R: RangeBounds<Q>,
        F: FnMut(&K, &V) -> bool,
    {
        let mut current = match bounds.start_bound() {
            Bound::Unbounded => self.nodes[NodeId::HEAD].forward[0],
            Bound::Included(from) => self.lower_bound(from),
            Bound::Excluded(from) => match self.lower_bound(from) {
                Some(id) if self.compare(id, from) == Ordering::Equal => {
                    self.nodes[id].forward[0]
                }
                other => other,
            },
        };

        while let Some(id) = current {
            let past_end = match bounds.end_bound() {
                Bound::Unbounded => false,
                Bound::Included(to) => self.compare(id, to) == Ordering::Greater,
                Bound::Excluded(to) => self.compare(id, to) != Ordering::Less,
            };
            if past_end {
                break;
            }
            let node = &self.nodes[id];
            let (key, value) = node.entry();
            if !visit(key, value) {
                break;
            }
            current = node.forward[0];
        }
    }

    /// Visit every entry in ascending order until `visit` returns `false`.
    pub fn scan<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.range::<K, _, _>(.., visit)
    }

    /// Get the entry with the smallest key.
    pub fn min(&self) -> Result<(&K, &V)> {
        let first = self.nodes[NodeId::HEAD].forward[0].ok_or(SkipListError::Empty)?;
        Ok(self.nodes[first].entry())
    }

    /// Get the entry with the greatest key.
    pub fn max(&self) -> Result<(&K, &V)> {
        if self.tail == NodeId::HEAD {
            return Err(SkipListError::Empty);
        }
        Ok(self.nodes[self.tail].entry())
    }

    /// Remove and return the entry with the greatest key.
    pub fn pop(&mut self) -> Result<(K, V)> {
        if self.tail == NodeId::HEAD {
            return Err(SkipListError::Empty);
        }
        let last = self.tail;
        let top = self.nodes[last].height() - 1;
        let (predecessors, _) = self.find_predecessors(self.nodes[last].key(), top, false);
        Ok(self.unlink(last, &predecessors))
    }

    /// Remove and return the entry with the smallest key.
    pub fn lpop(&mut self) -> Result<(K, V)> {
        let first = self.nodes[NodeId::HEAD].forward[0].ok_or(SkipListError::Empty)?;
        // The first node is the first node at every level it spans.
        let predecessors = vec![NodeId::HEAD; self.nodes[first].height()];
        Ok(self.unlink(first, &predecessors))
    }

    /// Remove every entry whose due time is at or before `now`.
    ///
    /// # Returns
    ///
    /// The number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        // last[i] is the last surviving node seen so far at level i.
        let mut last = vec![NodeId::HEAD; self.current_max_level + 1];
        let mut current = self.nodes[NodeId::HEAD].forward[0];
        let mut purged = 0;
        while let Some(id) = current {
            let node = &self.nodes[id];
            current = node.forward[0];
            let expired = node.item().due_time.is_some_and(|due| due <= now);
            if expired {
                self.unlink(id, &last);
                purged += 1;
            } else {
                let height = node.height();
                last[..height].fill(id);
            }
        }
        tracing::debug!(purged, len = self.len, "purged expired entries");
        purged
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.tail = NodeId::HEAD;
        self.len = 0;
        self.current_max_level = 0;
    }

    /// Get the number of entries.
    pub fn size(&self) -> usize {
        self.len
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the skip list has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the highest level index any live node occupies.
    pub fn current_max_level(&self) -> usize {
        self.current_max_level
    }

    /// Get the most levels a node may span.
    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Count the live nodes by height. Index `i` holds the number of nodes
    /// spanning `i + 1` levels.
    pub fn level_histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.current_max_level + 1];
        let mut current = self.nodes[NodeId::HEAD].forward[0];
        while let Some(id) = current {
            let node = &self.nodes[id];
            histogram[node.height() - 1] += 1;
            current = node.forward[0];
        }
        tracing::debug!(?histogram, len = self.len, "level histogram");
        histogram
    }

    /// Get an iterator over the key-value pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            current: self.nodes[NodeId::HEAD].forward[0],
            remaining: self.len,
        }
    }

    /// Walk down from `current_max_level`, recording at every level up to
    /// `level_bound` the last node whose key is strictly less than `key`.
    /// Levels that are never visited keep the head as their predecessor.
    ///
    /// With `stop_on_exact_match`, returns as soon as the successor at a
    /// recorded level holds `key`, along with that level.
    fn find_predecessors<Q>(
        &self,
        key: &Q,
        level_bound: usize,
        stop_on_exact_match: bool,
    ) -> (Vec<NodeId>, Option<usize>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut predecessors = vec![NodeId::HEAD; level_bound + 1];
        let mut x = NodeId::HEAD;
        for i in (0..self.current_max_level + 1).rev() {
            let mut found = false;
            while let Some(y) = self.nodes[x].forward[i] {
                match self.compare(y, key) {
                    Ordering::Less => x = y,
                    Ordering::Equal => {
                        found = true;
                        break;
                    }
                    Ordering::Greater => break,
                }
            }
            if i <= level_bound {
                predecessors[i] = x;
                if stop_on_exact_match && found {
                    return (predecessors, Some(i));
                }
            }
        }
        (predecessors, None)
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (predecessors, found_at) =
            self.find_predecessors(key, self.current_max_level, true);
        let level = found_at.unwrap_or(0);
        let candidate = self.nodes[predecessors[level]].forward[level]?;
        (self.compare(candidate, key) == Ordering::Equal).then_some(candidate)
    }

    fn lower_bound<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (predecessors, _) = self.find_predecessors(key, 0, false);
        self.nodes[predecessors[0]].forward[0]
    }

    fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (predecessors, _) = self.find_predecessors(key, self.current_max_level, false);
        let target = self.nodes[predecessors[0]].forward[0]?;
        if self.compare(target, key) != Ordering::Equal {
            return None;
        }
        Some(self.unlink(target, &predecessors))
    }

    /// Unlink `target` at every level it spans. `predecessors[i]` must be
    /// the node linking to `target` at level `i`.
    fn unlink(&mut self, target: NodeId, predecessors: &[NodeId]) -> (K, V) {
        let node = self.nodes.remove(target);
        for (level, &next) in node.forward.iter().enumerate() {
            debug_assert_eq!(self.nodes[predecessors[level]].forward[level], Some(target));
            self.nodes[predecessors[level]].forward[level] = next;
        }
        match node.forward[0] {
            Some(next) => self.nodes[next].prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;

        let head = &self.nodes[NodeId::HEAD];
        while self.current_max_level > 0 && head.forward[self.current_max_level].is_none() {
            self.current_max_level -= 1;
        }
        tracing::trace!(level = node.height() - 1, len = self.len, "removed entry");

        let item = node.into_item();
        (item.key, item.value)
    }

    fn compare<Q>(&self, id: NodeId, key: &Q) -> Ordering
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node_key: &Q = self.nodes[id].key().borrow();
        node_key.cmp(key)
    }
}

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a SkipList<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V> Extend<(K, V)> for SkipList<K, V> {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            // Plain sets only fail for insert-if-absent.
            let _ = self.set(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipList<K, V> {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (K, V)>,
    {
        let mut skip_list = Self::new();
        skip_list.extend(iter);
        skip_list
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for SkipList<K, V> {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Iterator over the entries of a [`SkipList`] in ascending key order.
///
/// Created by [`SkipList::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    nodes: &'a Arena<K, V>,
    current: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = &self.nodes[id];
        self.current = node.forward[0];
        self.remaining -= 1;
        Some(node.entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
