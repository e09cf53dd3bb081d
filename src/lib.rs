//! Parallel brute-force search for a string whose digest matches a target.
//!
//! The space of strings over an [`Alphabet`] with lengths in a range is split
//! by length among worker threads. Each worker walks its lengths in radix
//! order, testing candidates in batches against the target digest, and
//! reports progress to a [`Coordinator`] which tracks totals, estimates the
//! remaining time and stops every worker once a match is found, the space is
//! exhausted, or the run is cancelled.
//!
//! ```no_run
//! use swallow::{crack, Alphabet, CrackConfig, Outcome, SearchSpec, TargetDigest};
//!
//! let target = TargetDigest::parse("187ef4436122d1cc2f40dc2b92f0eba0", 16)?;
//! let spec = SearchSpec::new(target, Alphabet::new("ab")?, 1, 3)?;
//! let report = crack(spec, CrackConfig::for_workers(2))?;
//! assert_eq!(report.outcome, Outcome::Found("ab".into()));
//! # Ok::<(), swallow::SwallowError>(())
//! ```

pub mod alphabet;
pub mod cancel;
pub mod channel;
pub mod config;
pub mod coordinator;
pub mod digest;
pub mod enumerator;
pub mod error;
pub mod io_utils;
pub mod partition;
pub mod progress;
pub mod report;
pub mod tuning;
pub mod worker;

pub use alphabet::Alphabet;
pub use cancel::{CancelHandle, CancelToken};
pub use config::{CrackConfig, SearchSpec, DEFAULT_WORKERS, MAX_WORKERS};
pub use coordinator::{crack, Coordinator};
pub use digest::{Digester, HashAlgorithm, TargetDigest};
pub use enumerator::{candidate_at, combinations, Enumerator};
pub use error::SwallowError;
pub use partition::{partition, LengthRange, Partitioner, StaticPartitioner};
pub use progress::{NoProgress, ProgressBarObserver, ProgressObserver, ProgressReport};
pub use report::{CrackReport, Outcome};
