// =============================================================================
// Versioned Account Schemas
// =============================================================================
// Program state outlives the program binary that wrote it. Every state account
// stores the schema version it was written with, and an owner-gated `migrate`
// instruction walks it forward one version at a time until it matches the
// version this binary understands. Handlers refuse to run on stale state.
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MigrationError {
    /// State was written by a newer program than this one
    FromFuture { stored: u8, latest: u8 },
}

/// Summary of a completed migration walk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Migration {
    pub from: u8,
    pub to: u8,
}

impl Migration {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

pub trait Versioned {
    /// Schema version this binary writes
    const LATEST_VERSION: u8;

    fn version(&self) -> u8;

    fn set_version(&mut self, version: u8);

    /// Lift state from `from` to `from + 1`.
    fn upgrade_step(&mut self, from: u8);

    fn is_current(&self) -> bool {
        self.version() == Self::LATEST_VERSION
    }
}

/// Walk `state` up to `T::LATEST_VERSION`, one step at a time.
pub fn migrate<T: Versioned>(state: &mut T) -> Result<Migration, MigrationError> {
    let stored = state.version();
    if stored > T::LATEST_VERSION {
        return Err(MigrationError::FromFuture {
            stored,
            latest: T::LATEST_VERSION,
        });
    }

    for from in stored..T::LATEST_VERSION {
        state.upgrade_step(from);
        state.set_version(from + 1);
    }

    Ok(Migration {
        from: stored,
        to: T::LATEST_VERSION,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Ledger {
        version: u8,
        steps: Vec<u8>,
    }

    impl Versioned for Ledger {
        const LATEST_VERSION: u8 = 3;

        fn version(&self) -> u8 {
            self.version
        }

        fn set_version(&mut self, version: u8) {
            self.version = version;
        }

        fn upgrade_step(&mut self, from: u8) {
            self.steps.push(from);
        }
    }

    #[test]
    fn walks_every_intermediate_step_in_order() {
        let mut ledger = Ledger {
            version: 1,
            ..Ledger::default()
        };

        let migration = migrate(&mut ledger).unwrap();

        assert_eq!(migration, Migration { from: 1, to: 3 });
        assert_eq!(ledger.steps, vec![1, 2]);
        assert!(ledger.is_current());
    }

    #[test]
    fn current_state_is_a_noop() {
        let mut ledger = Ledger {
            version: 3,
            ..Ledger::default()
        };

        assert!(migrate(&mut ledger).unwrap().is_noop());
        assert!(ledger.steps.is_empty());
    }

    #[test]
    fn refuses_state_from_a_newer_binary() {
        let mut ledger = Ledger {
            version: 4,
            ..Ledger::default()
        };

        assert_eq!(
            migrate(&mut ledger),
            Err(MigrationError::FromFuture { stored: 4, latest: 3 })
        );
        assert_eq!(ledger.version, 4);
    }
}
