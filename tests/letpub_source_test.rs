use httpmock::prelude::*;
use journal_scout::core::{JournalMetrics, JournalSource, MatchPolicy};
use journal_scout::{LetPubConfig, LetPubSource, ScoutError};
use std::time::Duration;
use tokio::time::Instant;

fn listing_page(rows: &[(&str, &str, &str)]) -> String {
    let mut html = String::from(
        r#"<html><body><div class="main"><table class="table_yjfx">
<tr><td>No.</td><td>Journal</td><td>ISSN</td><td>IF</td><td>JCR</td><td>Citations</td><td>Articles</td></tr>"#,
    );
    for (i, (name, citations, papers)) in rows.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td>{}</td><td><a href=\"#\">{}</a></td><td>1234-5678</td><td>9.9</td><td>Q1</td><td>{}</td><td>{}</td></tr>\n",
            i + 1,
            name,
            citations,
            papers
        ));
    }
    html.push_str("</table></div></body></html>");
    html
}

fn source_for(server: &MockServer, max_pages: usize) -> LetPubSource {
    LetPubSource::new(LetPubConfig {
        base_url: server.url("/index.php"),
        max_pages,
        listing_delay: Duration::ZERO,
        item_delay: Duration::ZERO,
        request_timeout: Duration::from_secs(5),
        ..LetPubConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_enumerate_reads_rows_until_header_only_page() {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET)
            .path("/index.php")
            .query_param("page", "journalapp")
            .query_param("searchsort", "if_2022")
            .query_param("currentpage", "1");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(listing_page(&[
                ("Nature", "1", "1"),
                ("Science", "1", "1"),
                ("Cell", "1", "1"),
            ]));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "2");
        then.status(200)
            .body(listing_page(&[("Lancet", "1", "1"), ("Nature", "1", "1")]));
    });
    let page3 = server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "3");
        then.status(200).body(listing_page(&[]));
    });

    let enumeration = source_for(&server, 10).enumerate().await.unwrap();

    page1.assert();
    page2.assert();
    page3.assert();
    assert_eq!(enumeration.names, vec!["Nature", "Science", "Cell", "Lancet"]);
    assert!(enumeration.complete);
    assert_eq!(enumeration.pages_fetched, 3);
}

#[tokio::test]
async fn test_enumerate_keeps_blank_names_and_skips_unusable_pages() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "1");
        then.status(200)
            .body(listing_page(&[("Nature", "1", "1"), ("", "1", "1")]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "2");
        then.status(200).body(
            r#"<table class="table_yjfx"><tr><td>h</td></tr><tr><td>ad</td></tr></table>"#,
        );
    });
    let page3 = server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "3");
        then.status(200).body(listing_page(&[("Lancet", "1", "1")]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "4");
        then.status(200).body(listing_page(&[]));
    });

    let enumeration = source_for(&server, 10).enumerate().await.unwrap();

    page3.assert();
    assert_eq!(enumeration.names, vec!["Nature", "", "Lancet"]);
    assert!(enumeration.complete);
    assert_eq!(enumeration.pages_fetched, 4);
}

#[tokio::test]
async fn test_enumerate_spaces_listing_requests() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "1");
        then.status(200).body(listing_page(&[("Nature", "1", "1")]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "2");
        then.status(200).body(listing_page(&[]));
    });

    let source = LetPubSource::new(LetPubConfig {
        base_url: server.url("/index.php"),
        listing_delay: Duration::from_millis(300),
        item_delay: Duration::ZERO,
        ..LetPubConfig::default()
    })
    .unwrap();

    let start = Instant::now();
    let enumeration = source.enumerate().await.unwrap();

    assert_eq!(enumeration.pages_fetched, 2);
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_resolve_spaces_journal_requests() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param_exists("searchname");
        then.status(200)
            .body(listing_page(&[("Nature", "1,000", "50"), ("Cell", "300", "30")]));
    });

    let source = LetPubSource::new(LetPubConfig {
        base_url: server.url("/index.php"),
        listing_delay: Duration::ZERO,
        item_delay: Duration::from_millis(200),
        ..LetPubConfig::default()
    })
    .unwrap();

    let start = Instant::now();
    let nature = source.resolve("Nature").await.unwrap();
    let cell = source.resolve("Cell").await.unwrap();

    assert_eq!(nature, JournalMetrics::new(1000, 50));
    assert_eq!(cell, JournalMetrics::new(300, 30));
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_enumerate_stops_when_table_is_missing() {
    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "1");
        then.status(200).body(listing_page(&[("Nature", "1", "1")]));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "2");
        then.status(200).body("<html><body>No results</body></html>");
    });

    let enumeration = source_for(&server, 10).enumerate().await.unwrap();

    page1.assert();
    page2.assert();
    assert_eq!(enumeration.names, vec!["Nature"]);
    assert!(enumeration.complete);
}

#[tokio::test]
async fn test_enumerate_respects_max_pages() {
    let server = MockServer::start();
    let mut mocks = Vec::new();
    for page in 1..=3 {
        let name = format!("Journal {}", page);
        mocks.push(server.mock(|when, then| {
            when.method(GET)
                .path("/index.php")
                .query_param("currentpage", page.to_string());
            then.status(200).body(listing_page(&[(name.as_str(), "1", "1")]));
        }));
    }

    let enumeration = source_for(&server, 2).enumerate().await.unwrap();

    assert_eq!(enumeration.names, vec!["Journal 1", "Journal 2"]);
    assert!(enumeration.complete);
    assert_eq!(mocks[0].hits(), 1);
    assert_eq!(mocks[1].hits(), 1);
    assert_eq!(mocks[2].hits(), 0);
}

#[tokio::test]
async fn test_enumerate_truncates_on_later_page_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "1");
        then.status(200).body(listing_page(&[("Nature", "1", "1"), ("Cell", "1", "1")]));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "2");
        then.status(500);
    });
    let page3 = server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "3");
        then.status(200).body(listing_page(&[("Lancet", "1", "1")]));
    });

    let enumeration = source_for(&server, 10).enumerate().await.unwrap();

    page2.assert();
    assert_eq!(page3.hits(), 0);
    assert_eq!(enumeration.names, vec!["Nature", "Cell"]);
    assert!(enumeration.is_truncated());
    assert_eq!(enumeration.pages_fetched, 1);
}

#[tokio::test]
async fn test_enumerate_first_page_failure_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("currentpage", "1");
        then.status(503);
    });

    let err = source_for(&server, 10).enumerate().await.unwrap_err();

    assert!(err.is_fetch());
    assert!(matches!(err, ScoutError::FetchError { status: Some(503), .. }));
}

#[tokio::test]
async fn test_resolve_uses_substring_match_by_default() {
    let server = MockServer::start();
    let query = server.mock(|when, then| {
        when.method(GET)
            .path("/index.php")
            .query_param("view", "search")
            .query_param("searchname", "Cell");
        then.status(200).body(listing_page(&[
            ("Cell Press Reports", "2,400", "160"),
            ("Cell", "9", "9"),
        ]));
    });

    let metrics = source_for(&server, 10).resolve("Cell").await.unwrap();

    query.assert();
    assert_eq!(metrics, JournalMetrics::new(2400, 160));
}

#[tokio::test]
async fn test_resolve_with_exact_policy() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("searchname", "Cell");
        then.status(200).body(listing_page(&[
            ("Cell Press Reports", "2400", "160"),
            ("Cell", "900", "30"),
        ]));
    });

    let source = LetPubSource::new(LetPubConfig {
        base_url: server.url("/index.php"),
        match_policy: MatchPolicy::Exact,
        item_delay: Duration::ZERO,
        ..LetPubConfig::default()
    })
    .unwrap();

    assert_eq!(source.resolve("Cell").await.unwrap(), JournalMetrics::new(900, 30));
}

#[tokio::test]
async fn test_resolve_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("searchname", "Unknown");
        then.status(200).body(listing_page(&[("Nature", "10", "10")]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("searchname", "Broken");
        then.status(502);
    });
    server.mock(|when, then| {
        when.method(GET).path("/index.php").query_param("searchname", "Empty");
        then.status(200).body("<html><body></body></html>");
    });

    let source = source_for(&server, 10);

    let not_found = source.resolve("Unknown").await.unwrap_err();
    assert!(matches!(not_found, ScoutError::NotFoundError { .. }));

    let fetch = source.resolve("Broken").await.unwrap_err();
    assert!(matches!(fetch, ScoutError::FetchError { status: Some(502), .. }));

    let no_table = source.resolve("Empty").await.unwrap_err();
    assert!(matches!(no_table, ScoutError::NotFoundError { .. }));
}
