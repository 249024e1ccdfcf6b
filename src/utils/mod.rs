/// Content hashing for staleness detection.
pub mod hash;

/// Path normalization helpers shared by the matcher and commands.
pub mod paths;
