use log::error;
use primitive_types::U256;

use crate::storage::BalanceStorage;
use crate::types::Address;

/// Previous value of a bin overwritten during a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BinWrite {
    owner: Address,
    bin: U256,
    previous: U256,
}

/// Position in the journal a call can be reverted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    writes: usize,
    events: usize,
}

impl Checkpoint {
    /// Number of notifications recorded before the call started
    pub fn events(&self) -> usize {
        self.events
    }
}

/// Undo log for the outermost call and every call nested inside it
///
/// Entries are kept until the outermost call finishes, so reverting an
/// outer call also undoes whatever nested calls committed.
#[derive(Debug, Default)]
pub struct Journal {
    writes: Vec<BinWrite>,
    depth: usize,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls currently in progress
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn begin(&mut self, events: usize) -> Checkpoint {
        self.depth += 1;
        Checkpoint {
            writes: self.writes.len(),
            events,
        }
    }

    pub fn record(&mut self, owner: Address, bin: U256, previous: U256) {
        self.writes.push(BinWrite {
            owner,
            bin,
            previous,
        });
    }

    /// Close a successful call
    pub fn commit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.writes.clear();
        }
    }

    /// Close a failed call, restoring every bin written since `checkpoint`
    pub fn revert<S: BalanceStorage + ?Sized>(&mut self, storage: &mut S, checkpoint: Checkpoint) {
        while self.writes.len() > checkpoint.writes {
            let Some(write) = self.writes.pop() else {
                break;
            };
            if let Err(e) = storage.set_bin(&write.owner, &write.bin, write.previous) {
                error!(
                    "failed to restore bin {} of {} during rollback: {}",
                    write.bin, write.owner, e
                );
            }
        }
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.writes.clear();
        }
    }
}
