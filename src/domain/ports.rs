use crate::domain::model::{Enumeration, JournalMetrics, MatchPolicy, RunReport, SourceKind};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_kind(&self) -> SourceKind;
    fn base_url(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn table_selector(&self) -> &str;
    fn match_policy(&self) -> MatchPolicy;
    fn citation_year(&self) -> i32;
    fn max_pages(&self) -> usize;
    fn threshold(&self) -> f64;
    fn listing_delay(&self) -> Duration;
    fn item_delay(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn output_path(&self) -> Option<&str>;
}

/// 任何書目資料來源都要提供的 enumerate / resolve 能力
#[async_trait]
pub trait JournalSource: Send + Sync {
    fn kind(&self) -> SourceKind;
    async fn enumerate(&self) -> Result<Enumeration>;
    async fn resolve(&self, name: &str) -> Result<JournalMetrics>;
}

pub trait ProgressSink: Send {
    fn on_progress(&mut self, processed: usize, total: usize, name: &str);
    fn on_done(&mut self, report: &RunReport);
}

/// Discards every notification.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&mut self, _processed: usize, _total: usize, _name: &str) {}
    fn on_done(&mut self, _report: &RunReport) {}
}
