//! Application-wide constants
//!
//! Constants are grouped by their purpose.

// =============================================================================
// EXTERNAL COMMANDS
// =============================================================================

/// Default evaluator command line; the submission file path is appended
pub const DEFAULT_EVALUATOR_COMMAND: &str = "python3 evaluate.py";

/// Default trainer command line
pub const DEFAULT_TRAINER_COMMAND: &str = "python3 train_score.py";

/// Environment variable carrying the seed into both external commands
pub const DEFAULT_SEED_ENV_VAR: &str = "BENCHMARK_SEED";

/// Program used to wrap the trainer in `time-utility` timing mode
pub const TIME_UTILITY_PROGRAM: &str = "time";

/// Flag selecting the portable `real/user/sys` output format
pub const TIME_UTILITY_PORTABLE_FLAG: &str = "-p";

// =============================================================================
// SUBMISSION LAYOUT
// =============================================================================

/// Prefix of per-seed submission files
pub const SUBMISSION_FILE_PREFIX: &str = "submission_seed_";

/// Extension of per-seed submission files
pub const SUBMISSION_FILE_EXTENSION: &str = "csv";

// =============================================================================
// OUTPUT LIMITS
// =============================================================================

/// Maximum characters of stderr quoted in a failure reason
pub const MAX_STDERR_EXCERPT_CHARS: usize = 500;

// =============================================================================
// REPORTING DEFAULTS
// =============================================================================

/// Default cloud cost currency
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "seedbench=info";
