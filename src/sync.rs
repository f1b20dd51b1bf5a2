//! Reentrancy guard for the picker's synchronization passes.
//!
//! Writing derived values back into the views (sliders, text) makes those
//! views report changes of their own. Those reports arrive while a pass is
//! running and must be dropped, or the picker would recompute the color from
//! its own output.

/// Whether a synchronization pass is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Updating,
}

impl SyncState {
    /// Enter a pass. Returns `false` (and changes nothing) if one is
    /// already running.
    pub fn try_enter(&mut self) -> bool {
        match self {
            Self::Idle => {
                *self = Self::Updating;
                true
            }
            Self::Updating => false,
        }
    }

    pub fn exit(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_updating(&self) -> bool {
        *self == Self::Updating
    }
}

/// Counters for synchronization passes, used to check that a single input
/// causes a bounded amount of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Completed passes.
    pub passes: u64,
    /// Notifications dropped because a pass was running.
    pub suppressed: u64,
}
