use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use super::slist::SList;
use crate::constants::DEFAULT_BUCKETS;

const MAX_LOAD: usize = 2;

/// Hash table with separate chaining: each bucket is an [`SList`] of entries.
///
/// Inserting an existing key keeps the stored value. The bucket count
/// doubles once the average chain length would exceed two.
#[derive(Clone)]
pub struct ChainedMap<K, V, S = RandomState> {
    buckets: Vec<SList<(K, V)>>,
    len: usize,
    hasher: S,
}

impl<K: Hash + Eq, V> ChainedMap<K, V, RandomState> {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_buckets_and_hasher(buckets, RandomState::new())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ChainedMap<K, V, S> {
    pub fn with_buckets_and_hasher(buckets: usize, hasher: S) -> Self {
        let buckets = (0..buckets.max(1)).map(|_| SList::new()).collect();
        Self {
            buckets,
            len: 0,
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f32 {
        self.len as f32 / self.buckets.len() as f32
    }

    fn bucket_for<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Inserts `key` unless it is already present. Returns whether it was
    /// inserted.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        if self.len + 1 > self.buckets.len() * MAX_LOAD {
            self.resize(self.buckets.len() * 2);
        }
        let index = self.bucket_for(&key);
        self.buckets[index].push_front((key, value));
        self.len += 1;
        true
    }

    /// Inserts or overwrites, returning the previous value.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.insert(key, value);
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_for(key);
        self.buckets[index]
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_for(key);
        self.buckets[index]
            .find_mut(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_for(key);
        let (_, value) = self.buckets[index].remove_first(|(k, _)| k.borrow() == key)?;
        self.len -= 1;
        Some(value)
    }

    /// Rehashes every entry into `buckets` chains.
    pub fn resize(&mut self, buckets: usize) {
        let fresh = (0..buckets.max(1)).map(|_| SList::new()).collect();
        let old = std::mem::replace(&mut self.buckets, fresh);
        for chain in old {
            for (key, value) in chain {
                let index = self.bucket_for(&key);
                self.buckets[index].push_front((key, value));
            }
        }
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }
}

impl<K: Hash + Eq, V> Default for ChainedMap<K, V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug + Hash + Eq, V: fmt::Debug, S: BuildHasher> fmt::Debug
    for ChainedMap<K, V, S>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
