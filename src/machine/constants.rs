// Constants for the write-once machine

/// Default number of physical cells (and virtual slots)
pub const DEFAULT_TAPE_SIZE: usize = 1024;

/// Default step budget when running until halt
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Default snapshot history limit: 256 MB
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;

/// Start state used when a rule table names no states at all
pub const DEFAULT_START_STATE: &str = "START";
