use hashbrown::HashMap;

/// Position of a record in [`super::store::MemoryRecordStore`] insertion order.
pub type RecordPos = usize;

/// Secondary index from a key to record positions, ascending.
pub type VecIndex<K> = HashMap<K, Vec<RecordPos>>;
