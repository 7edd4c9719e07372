pub mod arena;
pub mod count_list;
pub mod rank_buckets;

pub use arena::{NodeArena, NodeId};
pub use count_list::CountList;
pub use rank_buckets::{RankBucket, RankBuckets};
