use hashbrown::{HashMap, HashSet};

use crate::{
    persist::{PersistResult, RecordStore},
    record::TransmissionRecord,
    types::SourceId,
};

use super::indices::{RecordPos, VecIndex};

/// In-memory [`RecordStore`] indexed by call-sign.
///
/// Appends cannot fail, so every batch is trivially all-or-nothing.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordStore {
    records: Vec<TransmissionRecord>,
    by_call: VecIndex<String>,
    offsets: HashMap<SourceId, u64>,
}

impl MemoryRecordStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored records in insertion order.
    pub fn records(&self) -> &[TransmissionRecord] {
        &self.records
    }

    fn insert_indices(&mut self, pos: RecordPos) {
        let rec = &self.records[pos];
        let calls = [rec.call_a.clone(), rec.call_b.clone()];
        for call in calls.into_iter().flatten() {
            let ids = self.by_call.entry(call).or_default();
            if ids.last() != Some(&pos) {
                ids.push(pos);
            }
        }
    }

    fn positions_for(&self, call: &str) -> &[RecordPos] {
        self.by_call.get(call).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl RecordStore for MemoryRecordStore {
    fn append_batch(&mut self, records: &[TransmissionRecord]) -> PersistResult<usize> {
        for rec in records {
            let pos = self.records.len();
            self.records.push(rec.clone());
            self.insert_indices(pos);
        }
        Ok(records.len())
    }

    fn records_between(&self, x: &str, y: &str) -> PersistResult<Vec<TransmissionRecord>> {
        let mut hits: Vec<&TransmissionRecord> = self
            .positions_for(x)
            .iter()
            .map(|pos| &self.records[*pos])
            .filter(|rec| rec.is_between(x, y))
            .collect();
        // Positions are ascending, so a stable sort keeps insertion order on ties.
        hits.sort_by_key(|rec| rec.timestamp);
        Ok(hits.into_iter().cloned().collect())
    }

    fn peers_of(&self, operator: &str) -> PersistResult<Vec<String>> {
        let peers: HashSet<&str> = self
            .positions_for(operator)
            .iter()
            .filter_map(|pos| self.records[*pos].peer_of(operator))
            .collect();
        let mut out: Vec<String> = peers.into_iter().map(str::to_string).collect();
        out.sort();
        Ok(out)
    }

    fn load_offset(&self, source_id: &str) -> PersistResult<u64> {
        Ok(self.offsets.get(source_id).copied().unwrap_or(0))
    }

    fn save_offset(&mut self, source_id: &str, offset: u64) -> PersistResult<()> {
        self.offsets.insert(source_id.to_string(), offset);
        Ok(())
    }
}
