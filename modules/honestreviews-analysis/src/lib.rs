pub mod collector;
pub mod limits;
pub mod pipeline;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
pub mod verdict;

pub use collector::DiscussionCollector;
pub use limits::{build_queries, CollectorLimits, VerdictSettings};
pub use pipeline::{analyzer, AnalysisRequest, Analyzer};
pub use traits::{DiscussionSource, VerdictModel};
pub use verdict::VerdictGenerator;
