use crate::domain::model::{PipelineEntry, RunReport};
use crate::domain::ports::ProgressSink;
use crate::utils::error::{Result, ScoutError};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "journal_report.zip";

#[derive(Debug, Serialize)]
struct AcceptedRow<'a> {
    name: &'a str,
    predicted_ratio: String,
    citations: u64,
    papers: u64,
}

#[derive(Debug, Serialize)]
struct RejectedRow<'a> {
    name: &'a str,
    reason: &'a str,
}

/// 終端機輸出：已接受與失敗的期刊清單
pub fn render_text(report: &RunReport) -> String {
    let mut lines = Vec::new();
    if !report.enumeration_complete {
        lines.push("warning: journal list was truncated by a listing failure".to_string());
    }
    lines.push(format!(
        "Journals with predicted ratio above {:.2}:",
        report.threshold
    ));
    lines.extend(report.accepted().map(|e| format!("  {}", e)));
    let rejected: Vec<_> = report.rejected().map(|e| format!("  {}", e)).collect();
    if !rejected.is_empty() {
        lines.push("Failed journals:".to_string());
        lines.extend(rejected);
    }
    lines.join("\n")
}

pub fn accepted_csv(report: &RunReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in report.accepted() {
        if let PipelineEntry::Accepted {
            name,
            ratio,
            metrics,
        } = entry
        {
            writer.serialize(AcceptedRow {
                name,
                predicted_ratio: format!("{:.2}", ratio),
                citations: metrics.citations,
                papers: metrics.papers,
            })?;
        }
    }
    finish_csv(writer)
}

pub fn rejected_csv(report: &RunReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in report.rejected() {
        if let PipelineEntry::Rejected { name, reason } = entry {
            writer.serialize(RejectedRow { name, reason })?;
        }
    }
    finish_csv(writer)
}

fn finish_csv(mut writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ScoutError::IoError(std::io::Error::other(e.to_string())))
}

/// Packs accepted.csv, rejected.csv and summary.json into one zip archive.
pub fn build_archive(report: &RunReport) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>("accepted.csv", FileOptions::default())?;
    zip.write_all(&accepted_csv(report)?)?;

    zip.start_file::<_, ()>("rejected.csv", FileOptions::default())?;
    zip.write_all(&rejected_csv(report)?)?;

    zip.start_file::<_, ()>("summary.json", FileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// 在終端機顯示 "k / total processed" 進度
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn on_progress(&mut self, processed: usize, total: usize, name: &str) {
        println!("{} / {} processed ({})", processed, total, name);
    }

    fn on_done(&mut self, report: &RunReport) {
        println!("{}", render_text(report));
        println!("done");
    }
}
