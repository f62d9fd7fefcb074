use crate::domain::model::{PipelineEntry, RunReport};
use crate::domain::ports::{JournalSource, ProgressSink};
use crate::utils::error::{Result, ScoutError};
use chrono::Utc;

pub const DEFAULT_THRESHOLD: f64 = 10.0;

/// 列舉期刊、逐一解析並依門檻分類
pub struct ImpactPipeline<S: JournalSource> {
    source: S,
    threshold: f64,
}

impl<S: JournalSource> ImpactPipeline<S> {
    pub fn new(source: S) -> Self {
        Self::with_threshold(source, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(source: S, threshold: f64) -> Self {
        Self { source, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Enumeration failure aborts the run; per-journal failures become `Rejected` entries.
    pub async fn run(&self, sink: &mut dyn ProgressSink) -> Result<RunReport> {
        let started_at = Utc::now();
        tracing::info!("🚀 Enumerating journals from {}", self.source.kind());

        let enumeration = self.source.enumerate().await.inspect_err(|e| {
            tracing::error!("❌ Failed to enumerate journals: {}", e);
        })?;
        if enumeration.is_truncated() {
            tracing::warn!(
                "⚠️ Journal list is truncated after {} pages",
                enumeration.pages_fetched
            );
        }

        let total = enumeration.names.len();
        let mut entries = Vec::new();
        let mut dropped = 0usize;

        for (index, name) in enumeration.names.iter().enumerate() {
            match self.classify(name).await {
                Some(entry) => entries.push(entry),
                None => dropped += 1,
            }
            sink.on_progress(index + 1, total, name);
        }

        let report = RunReport {
            source: self.source.kind(),
            threshold: self.threshold,
            total,
            enumeration_complete: enumeration.complete,
            entries,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            "✅ Processed {} journals: {} accepted, {} rejected, {} below threshold",
            total,
            report.accepted().count(),
            report.rejected().count(),
            dropped
        );
        sink.on_done(&report);
        Ok(report)
    }

    /// None means the journal resolved fine but did not clear the threshold.
    async fn classify(&self, name: &str) -> Option<PipelineEntry> {
        let metrics = match self.source.resolve(name).await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!("Journal {} failed: {}", name, e);
                return Some(PipelineEntry::Rejected {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let counts = match metrics.validate() {
            Ok(counts) => counts,
            Err(reason) => {
                let err = ScoutError::invalid_metrics(name, reason);
                tracing::warn!("Journal {}: {}", name, err);
                return Some(PipelineEntry::Rejected {
                    name: name.to_string(),
                    reason: err.to_string(),
                });
            }
        };

        let ratio = counts.ratio();
        if ratio > self.threshold {
            tracing::info!("⭐ {} predicted ratio {:.2}", name, ratio);
            Some(PipelineEntry::Accepted {
                name: name.to_string(),
                ratio,
                metrics: counts,
            })
        } else {
            tracing::debug!("{} ratio {:.2} not above {}", name, ratio, self.threshold);
            None
        }
    }
}
