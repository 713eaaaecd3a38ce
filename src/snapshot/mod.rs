// Snapshot management for stepping through a recorded run

use crate::machine::mediator::TapeCheckpoint;
use crate::machine::rules::StateId;
use crate::tape::virtual_tape::VirtualHead;

/// Snapshot of machine state between two transitions
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tape: TapeCheckpoint,
    pub state: StateId,
    pub virtual_head: VirtualHead,
    pub steps_taken: usize,
    pub last_rule: Option<usize>, // Index of the rule that produced this snapshot
    pub halted: bool,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // The checkpoint holds the tapes; the rest is a few words
        self.tape.estimated_size() + 64
    }
}

/// Manages recorded history for time-travel navigation
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history. Returns the size it would need on failure.
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), usize> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(self.current_memory + snapshot_size);
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Drop every snapshot after the first `len`
    pub fn truncate(&mut self, len: usize) {
        for dropped in self.snapshots.drain(len.min(self.snapshots.len())..) {
            self.current_memory -= dropped.estimated_size();
        }
    }

    /// The most recent snapshot, for amending its flags
    pub fn last_mut(&mut self) -> Option<&mut Snapshot> {
        self.snapshots.last_mut()
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::mediator::WormTape;

    fn snapshot() -> Snapshot {
        Snapshot {
            tape: WormTape::new(8, 8).unwrap().checkpoint(),
            state: StateId(0),
            virtual_head: VirtualHead::new(8),
            steps_taken: 0,
            last_rule: None,
            halted: false,
        }
    }

    #[test]
    fn test_push_respects_limit() {
        let size = snapshot().estimated_size();
        let mut manager = SnapshotManager::new(size * 2);
        manager.push(snapshot()).unwrap();
        manager.push(snapshot()).unwrap();
        assert_eq!(manager.push(snapshot()), Err(size * 3));
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.memory_usage(), size * 2);
    }

    #[test]
    fn test_truncate_releases_memory() {
        let size = snapshot().estimated_size();
        let mut manager = SnapshotManager::new(size * 3);
        for _ in 0..3 {
            manager.push(snapshot()).unwrap();
        }
        manager.truncate(1);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.memory_usage(), size);
        manager.push(snapshot()).unwrap();
        manager.truncate(5);
        assert_eq!(manager.len(), 2);
    }
}
