use std::num::NonZeroUsize;

/// Tape length used when no memory size is configured.
pub const DEFAULT_MEMORY_SIZE: usize = 30_000;

/// Resource limits for a single run.
///
/// - `step_limit`: maximum number of instructions to execute; `None` is unbounded.
/// - `memory_size`: number of tape cells; `None` falls back to [`DEFAULT_MEMORY_SIZE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub step_limit: Option<usize>,
    pub memory_size: Option<NonZeroUsize>,
}

impl Limits {
    pub fn new(step_limit: Option<usize>, memory_size: Option<NonZeroUsize>) -> Self {
        Self { step_limit, memory_size }
    }

    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn with_memory_size(mut self, size: NonZeroUsize) -> Self {
        self.memory_size = Some(size);
        self
    }

    /// Resolved tape length.
    pub fn memory_len(&self) -> usize {
        self.memory_size.map_or(DEFAULT_MEMORY_SIZE, NonZeroUsize::get)
    }

    /// Fill unset fields from `other`, keeping values already present.
    pub fn or(self, other: Limits) -> Limits {
        Limits {
            step_limit: self.step_limit.or(other.step_limit),
            memory_size: self.memory_size.or(other.memory_size),
        }
    }
}
