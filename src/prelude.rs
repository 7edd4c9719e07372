pub use crate::baseline::BaselineCounter;
pub use crate::ds::{CountList, NodeArena, NodeId, RankBucket, RankBuckets};
pub use crate::error::{ConfigError, RunError, ValidationError};
pub use crate::experiment::{AlgorithmKind, Experiment, Params};
pub use crate::ranked::RankedMultiset;
