use crate::error::NativeResult;
use neo_primitives::UInt160;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Key of a storage entry: the owning contract id followed by its key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey {
    id: i32,
    key: Vec<u8>,
}

impl StorageKey {
    pub fn new(id: i32, key: Vec<u8>) -> Self {
        Self { id, key }
    }

    /// Key consisting of a single prefix byte.
    pub fn create(id: i32, prefix: u8) -> Self {
        Self::new(id, vec![prefix])
    }

    pub fn create_with_bytes(id: i32, prefix: u8, bytes: &[u8]) -> Self {
        let mut key = Vec::with_capacity(1 + bytes.len());
        key.push(prefix);
        key.extend_from_slice(bytes);
        Self::new(id, key)
    }

    pub fn create_with_uint160(id: i32, prefix: u8, hash: &UInt160) -> Self {
        Self::create_with_bytes(id, prefix, hash.as_bytes())
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Key bytes after the first (prefix) byte.
    pub fn suffix(&self) -> &[u8] {
        self.key.get(1..).unwrap_or_default()
    }

    pub fn starts_with(&self, prefix: &StorageKey) -> bool {
        self.id == prefix.id && self.key.starts_with(&prefix.key)
    }
}

/// Storage handle supplied by the ledger collaborator.
pub trait Storage {
    fn get(&self, key: &StorageKey) -> NativeResult<Option<Vec<u8>>>;

    fn put(&mut self, key: StorageKey, value: Vec<u8>) -> NativeResult<()>;

    fn delete(&mut self, key: &StorageKey) -> NativeResult<()>;

    /// Every entry whose key starts with `prefix`, in key order.
    fn find(&self, prefix: &StorageKey) -> NativeResult<Vec<(StorageKey, Vec<u8>)>>;
}

/// In-memory storage backend for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<StorageKey, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &StorageKey) -> NativeResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: StorageKey, value: Vec<u8>) -> NativeResult<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &StorageKey) -> NativeResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn find(&self, prefix: &StorageKey) -> NativeResult<Vec<(StorageKey, Vec<u8>)>> {
        Ok(self
            .entries
            .range((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
