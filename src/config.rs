use std::time::{Duration, Instant};

/// Number of levels used when none (or an unusable value) is configured.
pub const DEFAULT_MAX_LEVELS: usize = 48;

/// Upper bound on the number of levels a list may be configured with.
pub const MAX_SUPPORTED_LEVELS: usize = 64;

/// Construction-time settings for a skip list.
///
/// ```
/// use skipkv::{SkipList, SkipListConfig};
///
/// let config = SkipListConfig::new().with_max_levels(16).with_seed(7);
/// let list: SkipList<u32, u32> = SkipList::with_config(config);
/// assert_eq!(list.max_levels(), 16);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkipListConfig {
    /// The most levels a single node may span.
    ///
    /// Values outside `[1, MAX_SUPPORTED_LEVELS]` are replaced by
    /// [`DEFAULT_MAX_LEVELS`] when the list is built.
    pub max_levels: usize,

    /// Seed for the level generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl SkipListConfig {
    /// Create a configuration with the default settings.
    pub fn new() -> SkipListConfig {
        SkipListConfig {
            max_levels: DEFAULT_MAX_LEVELS,
            seed: None,
        }
    }

    /// Set the maximum number of levels, clamped into `[1, MAX_SUPPORTED_LEVELS]`.
    pub fn with_max_levels(mut self, max_levels: usize) -> SkipListConfig {
        self.max_levels = max_levels.clamp(1, MAX_SUPPORTED_LEVELS);
        self
    }

    /// Seed the level generator so level assignment is reproducible.
    pub fn with_seed(mut self, seed: u64) -> SkipListConfig {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn resolved_max_levels(&self) -> usize {
        if self.max_levels == 0 || self.max_levels > MAX_SUPPORTED_LEVELS {
            tracing::warn!(
                requested = self.max_levels,
                used = DEFAULT_MAX_LEVELS,
                "max_levels out of range, falling back to the default"
            );
            return DEFAULT_MAX_LEVELS;
        }
        self.max_levels
    }
}

impl Default for SkipListConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call options for `set_with`.
///
/// The due time is stored alongside the entry. Entries are not hidden once
/// they fall due; they are removed by `purge_expired`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Fail with `DuplicateKey` instead of overwriting an existing entry.
    pub if_absent: bool,

    /// When the entry becomes eligible for `purge_expired`.
    pub due_time: Option<Instant>,
}

impl SetOptions {
    /// Options that only insert when the key is not already present.
    pub fn if_absent() -> SetOptions {
        SetOptions {
            if_absent: true,
            due_time: None,
        }
    }

    /// Attach an absolute due time.
    pub fn due_at(mut self, due_time: Instant) -> SetOptions {
        self.due_time = Some(due_time);
        self
    }

    /// Attach a due time `ttl` from now.
    pub fn expire_after(self, ttl: Duration) -> SetOptions {
        self.due_at(Instant::now() + ttl)
    }
}
