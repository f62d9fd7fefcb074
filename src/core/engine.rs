use crate::core::pipeline::ImpactPipeline;
use crate::core::report::{build_archive, ARCHIVE_NAME};
use crate::domain::model::RunReport;
use crate::domain::ports::{JournalSource, ProgressSink, Storage};
use crate::utils::error::Result;
use std::time::Instant;

/// Runs the pipeline and, when storage is attached, saves the report archive.
pub struct ScoutEngine<S: JournalSource, St: Storage> {
    pipeline: ImpactPipeline<S>,
    storage: Option<St>,
}

impl<S: JournalSource, St: Storage> ScoutEngine<S, St> {
    pub fn new(pipeline: ImpactPipeline<S>) -> Self {
        Self {
            pipeline,
            storage: None,
        }
    }

    pub fn with_storage(pipeline: ImpactPipeline<S>, storage: St) -> Self {
        Self {
            pipeline,
            storage: Some(storage),
        }
    }

    /// 回傳報表以及報表檔案的路徑 (若有寫出)
    pub async fn run(&self, sink: &mut dyn ProgressSink) -> Result<(RunReport, Option<String>)> {
        let start = Instant::now();
        tracing::info!("Starting journal scan (threshold {})", self.pipeline.threshold());

        let report = self.pipeline.run(sink).await?;
        tracing::info!("⏱️ Scan finished in {:?}", start.elapsed());

        let saved = match &self.storage {
            Some(storage) => {
                let archive = build_archive(&report)?;
                tracing::debug!("Writing report archive ({} bytes)", archive.len());
                let path = storage.write_file(ARCHIVE_NAME, &archive).await?;
                tracing::info!("📁 Report saved to: {}", path);
                Some(path)
            }
            None => None,
        };

        Ok((report, saved))
    }
}
