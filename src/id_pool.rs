//! Chunked free-list of numeric node ids.

use std::collections::BTreeSet;

use crate::{config::IdPoolConfig, graph::NodeId};

/// Hands out `NodeId::Num` values that are unique while outstanding.
///
/// The free set starts as `0..chunk_size` and is refilled with the next
/// chunk whenever it runs dry. Returned ids are reused, smallest first.
/// Ids reserved beyond the refilled range are remembered apart and skipped
/// when their chunk is reached.
#[derive(Clone, Debug)]
pub struct IdPool {
    chunk_size: u64,
    free: BTreeSet<u64>,
    next_chunk: u64,
    reserved_ahead: BTreeSet<u64>,
}

impl Default for IdPool {
    fn default() -> Self {
        Self::new(IdPoolConfig::default())
    }
}

impl IdPool {
    pub fn new(config: IdPoolConfig) -> Self {
        let mut pool = Self {
            chunk_size: config.chunk_size.max(1),
            free: BTreeSet::new(),
            next_chunk: 0,
            reserved_ahead: BTreeSet::new(),
        };
        pool.refill();
        pool
    }

    fn refill(&mut self) {
        let start = self.next_chunk;
        let end = start.saturating_add(self.chunk_size);
        let ahead = self.reserved_ahead.split_off(&end);
        let in_chunk = std::mem::replace(&mut self.reserved_ahead, ahead);
        self.free.extend((start..end).filter(|id| !in_chunk.contains(id)));
        self.next_chunk = end;
    }

    pub fn pop(&mut self) -> NodeId {
        while self.free.is_empty() && self.next_chunk < u64::MAX {
            self.refill();
        }
        match self.free.pop_first() {
            Some(id) => NodeId::Num(id),
            // Only reachable once the whole u64 range is handed out.
            None => NodeId::Num(self.next_chunk),
        }
    }

    /// Gives an id back. Names are ignored.
    pub fn push(&mut self, id: &NodeId) {
        let Some(value) = id.as_num() else { return };
        if value < self.next_chunk {
            self.free.insert(value);
        } else {
            self.reserved_ahead.remove(&value);
        }
    }

    /// Marks ids as in use. Cost depends on the number of ids, not their values.
    pub fn reserve<'a, I: IntoIterator<Item = &'a NodeId>>(&mut self, ids: I) {
        for value in ids.into_iter().filter_map(NodeId::as_num) {
            if value < self.next_chunk {
                self.free.remove(&value);
            } else {
                self.reserved_ahead.insert(value);
            }
        }
    }

    /// Forgets every outstanding id.
    pub fn reset(&mut self) {
        self.free.clear();
        self.reserved_ahead.clear();
        self.next_chunk = 0;
        self.refill();
    }

    /// Ids ready to be handed out without refilling.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Id generator drawing from this pool; the local id is ignored.
    pub fn generator(&mut self) -> impl FnMut(&NodeId) -> NodeId + '_ {
        move |_: &NodeId| self.pop()
    }
}
