pub mod engine;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{
    Enumeration, JournalMetrics, MatchPolicy, MetricCounts, PipelineEntry, RunReport, SourceKind,
};
pub use crate::domain::ports::{ConfigProvider, JournalSource, NoopProgress, ProgressSink, Storage};
pub use crate::utils::error::Result;
