use crate::domain::model::{JournalMetrics, MatchPolicy};
use crate::utils::error::{Result, ScoutError};
use scraper::{ElementRef, Html, Selector};

pub const DEFAULT_TABLE_SELECTOR: &str = ".table_yjfx";

/// 期刊表格的欄位配置
#[derive(Debug, Clone)]
pub struct TableExtractor {
    table: Selector,
    row: Selector,
    cell: Selector,
    name_column: usize,
    citations_column: usize,
    papers_column: usize,
}

/// Outcome of reading one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingPage {
    /// The listing container is not in the document.
    MissingTable,
    /// Names of the data rows, header row excluded. Empty when only the header exists.
    Rows(Vec<String>),
    /// Data rows exist but none of them has a name column.
    Unusable { rows: usize },
}

impl TableExtractor {
    pub fn new(table_selector: &str) -> Result<Self> {
        Ok(Self {
            table: parse_selector(table_selector)?,
            row: parse_selector("tr")?,
            cell: parse_selector("td")?,
            name_column: 1,
            citations_column: 5,
            papers_column: 6,
        })
    }

    pub fn extract_names(&self, html: &str) -> ListingPage {
        let document = Html::parse_document(html);
        let Some(table) = document.select(&self.table).next() else {
            return ListingPage::MissingTable;
        };

        let mut rows = 0;
        let names: Vec<String> = self
            .data_rows(table)
            .filter_map(|cells| {
                rows += 1;
                let name = cells.get(self.name_column).cloned();
                if name.is_none() {
                    tracing::warn!("Skipping listing row with {} cells", cells.len());
                }
                name
            })
            .collect();

        if names.is_empty() && rows > 0 {
            return ListingPage::Unusable { rows };
        }
        ListingPage::Rows(names)
    }

    /// 找出第一個名稱符合的列並讀取引用數與文章數
    pub fn extract_metrics(
        &self,
        html: &str,
        journal: &str,
        policy: MatchPolicy,
    ) -> Result<JournalMetrics> {
        let document = Html::parse_document(html);
        let table = document
            .select(&self.table)
            .next()
            .ok_or_else(|| ScoutError::not_found(journal))?;

        let cells = self
            .data_rows(table)
            .find(|cells| {
                cells
                    .get(self.name_column)
                    .is_some_and(|name| policy.matches(name, journal))
            })
            .ok_or_else(|| ScoutError::not_found(journal))?;

        let citations = cells.get(self.citations_column).and_then(|c| parse_count(c));
        let papers = cells.get(self.papers_column).and_then(|c| parse_count(c));
        tracing::debug!(
            "Journal {} row: citations={:?}, papers={:?}",
            journal,
            citations,
            papers
        );
        Ok(JournalMetrics { citations, papers })
    }

    fn data_rows<'a>(&'a self, table: ElementRef<'a>) -> impl Iterator<Item = Vec<String>> + 'a {
        table.select(&self.row).skip(1).map(move |row| {
            row.select(&self.cell)
                .map(|cell| element_text(&cell))
                .collect::<Vec<_>>()
        })
    }
}

/// Reads the leading digits of a cell, ignoring thousands separators.
pub fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn parse_selector(input: &str) -> Result<Selector> {
    Selector::parse(input)
        .map_err(|e| ScoutError::parse(format!("invalid selector {input}: {e}")))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_html(rows: &[(&str, u64, u64)]) -> String {
        let mut html = String::from(
            r#"<html><body><table class="table_yjfx">
<tr><th>#</th><th>Journal</th><th>ISSN</th><th>IF</th><th>Area</th><th>Citations</th><th>Papers</th></tr>"#,
        );
        for (i, (name, citations, papers)) in rows.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td>{}</td><td> {} </td><td>0000-0000</td><td>1.0</td><td>Q1</td><td>{}</td><td>{}</td></tr>",
                i + 1,
                name,
                citations,
                papers
            ));
        }
        html.push_str("</table></body></html>");
        html
    }

    fn extractor() -> TableExtractor {
        TableExtractor::new(DEFAULT_TABLE_SELECTOR).unwrap()
    }

    #[test]
    fn test_extract_names_in_row_order() {
        let html = listing_html(&[("Nature", 1, 1), ("Science", 2, 2), ("Cell", 3, 3)]);
        assert_eq!(
            extractor().extract_names(&html),
            ListingPage::Rows(vec![
                "Nature".to_string(),
                "Science".to_string(),
                "Cell".to_string()
            ])
        );
    }

    #[test]
    fn test_missing_table_and_header_only() {
        let ex = extractor();
        assert_eq!(
            ex.extract_names("<html><body><p>nothing</p></body></html>"),
            ListingPage::MissingTable
        );
        assert_eq!(ex.extract_names(&listing_html(&[])), ListingPage::Rows(vec![]));
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let html = r#"<table class="table_yjfx"><tr><th>h</th></tr>
            <tr><td>only one cell</td></tr>
            <tr><td>1</td><td>Lancet</td></tr></table>"#;
        assert_eq!(
            extractor().extract_names(html),
            ListingPage::Rows(vec!["Lancet".to_string()])
        );
    }

    #[test]
    fn test_blank_name_cells_keep_their_rows() {
        let html = r#"<table class="table_yjfx"><tr><th>h</th></tr>
            <tr><td>1</td><td>Nature</td></tr>
            <tr><td>2</td><td>   </td></tr>
            <tr><td>3</td><td>Cell</td></tr></table>"#;
        assert_eq!(
            extractor().extract_names(html),
            ListingPage::Rows(vec![
                "Nature".to_string(),
                String::new(),
                "Cell".to_string()
            ])
        );
    }

    #[test]
    fn test_rows_without_name_column_are_unusable() {
        let html = r#"<table class="table_yjfx"><tr><th>h</th></tr>
            <tr><td>only one cell</td></tr>
            <tr><td>another</td></tr></table>"#;
        assert_eq!(
            extractor().extract_names(html),
            ListingPage::Unusable { rows: 2 }
        );
    }

    #[test]
    fn test_substring_match_returns_first_containing_row() {
        let html = listing_html(&[
            ("Nature", 10, 10),
            ("Cell Press Reports", 1200, 80),
            ("Cell", 5, 5),
        ]);
        let metrics = extractor()
            .extract_metrics(&html, "Cell", MatchPolicy::Substring)
            .unwrap();
        assert_eq!(metrics, JournalMetrics::new(1200, 80));
    }

    #[test]
    fn test_exact_match_skips_prefix_overlap() {
        let html = listing_html(&[("Cell Press Reports", 1200, 80), ("Cell", 5, 5)]);
        let metrics = extractor()
            .extract_metrics(&html, "cell", MatchPolicy::CaseInsensitiveExact)
            .unwrap();
        assert_eq!(metrics, JournalMetrics::new(5, 5));
    }

    #[test]
    fn test_not_found_cases() {
        let ex = extractor();
        let html = listing_html(&[("Nature", 10, 10)]);
        assert!(matches!(
            ex.extract_metrics(&html, "Lancet", MatchPolicy::Substring),
            Err(ScoutError::NotFoundError { .. })
        ));
        assert!(matches!(
            ex.extract_metrics("<html></html>", "Nature", MatchPolicy::Substring),
            Err(ScoutError::NotFoundError { .. })
        ));
    }

    #[test]
    fn test_unparseable_counts_become_none() {
        let html = r#"<table class="table_yjfx"><tr><th>h</th></tr>
            <tr><td>1</td><td>Nature</td><td></td><td></td><td></td><td>N/A</td></tr></table>"#;
        let metrics = extractor()
            .extract_metrics(html, "Nature", MatchPolicy::Substring)
            .unwrap();
        assert_eq!(metrics.citations, None);
        assert_eq!(metrics.papers, None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(" 1,234 "), Some(1234));
        assert_eq!(parse_count("56abc"), Some(56));
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("-"), None);
        assert_eq!(parse_count(""), None);
    }
}
