//! The scrape pipeline: Acquire → Extract → Parse/Build → Ingest.
//!
//! One generic, strictly linear pipeline runs per source. The source
//! supplies the acquisition mode, the table extractor, the tenor rules, and
//! the row policy; everything else is shared.

use std::time::{Duration, Instant};

use scraper::Html;
use tracing::{info, instrument, warn};
use url::Url;

use fdrates_acquire::PageAcquirer;
use fdrates_extract::{BankSource, build_rows};
use fdrates_shared::Result;
use fdrates_storage::Storage;

/// Summary of one completed per-source pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Source registry key.
    pub source: String,
    /// Bank the rate set was stored under.
    pub bank: String,
    /// Raw rows yielded by the table extractor.
    pub rows_extracted: usize,
    /// Rows dropped during building (bad rate text or policy).
    pub rows_skipped: usize,
    /// Rows inserted into the store.
    pub rows_inserted: usize,
    /// Total elapsed time for the run.
    pub elapsed: Duration,
}

/// Run the full pipeline for one source against `url`.
///
/// Acquisition and persistence failures are raised to the caller; an absent
/// rate table is not an error and results in an ingested empty set (which
/// clears the bank's prior rows, preserving replace semantics).
#[instrument(skip_all, fields(source = source.name(), url = %url))]
pub async fn run_source(
    source: &dyn BankSource,
    url: &Url,
    acquirer: &PageAcquirer,
    storage: &Storage,
) -> Result<PipelineReport> {
    let start = Instant::now();

    let body = acquirer.acquire(url, &source.acquire_mode()).await?;

    // Html is not Send; keep the parsed document scoped between awaits.
    let raw = {
        let doc = Html::parse_document(&body);
        source.extract_rows(&doc)
    };

    if raw.is_empty() {
        warn!(source = source.name(), "extractor yielded no rows");
    }

    let built = build_rows(&raw, &source.tenor_rules(), source.row_policy());
    let summary = storage.ingest(source.bank_name(), &built.rows).await?;

    let report = PipelineReport {
        source: source.name().to_string(),
        bank: source.bank_name().to_string(),
        rows_extracted: raw.len(),
        rows_skipped: built.skipped,
        rows_inserted: summary.rows_inserted,
        elapsed: start.elapsed(),
    };

    info!(
        rows_extracted = report.rows_extracted,
        rows_skipped = report.rows_skipped,
        rows_inserted = report.rows_inserted,
        elapsed_ms = report.elapsed.as_millis(),
        "pipeline run completed"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdrates_extract::{KotakSource, SbiSource};
    use fdrates_shared::FetchConfig;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    static TEST_DB_SEQ: AtomicU32 = AtomicU32::new(0);

    async fn test_storage() -> Storage {
        let seq = TEST_DB_SEQ.fetch_add(1, Ordering::Relaxed);
        let path =
            std::env::temp_dir().join(format!("fdrates_core_{}_{seq}.db", std::process::id()));
        Storage::open_at(&path).await.expect("open test db")
    }

    fn test_acquirer() -> PageAcquirer {
        PageAcquirer::new(&FetchConfig {
            timeout_secs: 5,
            ready_timeout_ms: 200,
            ready_poll_ms: 10,
        })
        .expect("build acquirer")
    }

    const SBI_PAGE: &str = r#"<html><body><table>
        <tr><th>Tenors</th><th>Old</th><th>New</th></tr>
        <tr><td>7 days to 45 days</td><td>3.00%</td><td>3.50%</td></tr>
        <tr><td>211 days to 1 year</td><td>5.00%</td><td>5.75%</td></tr>
        <tr><td>Footnote</td><td>-</td><td>6.00%</td></tr>
    </table></body></html>"#;

    const KOTAK_PAGE: &str = r#"<html><body><div class="ratedetails"><table>
        <tr><th>Maturity Periods</th><th>Rate</th><th>Yield</th></tr>
        <tr><td>7 - 14 Days</td><td>2.75%</td><td>2.75%</td></tr>
        <tr><td>365 Days</td><td>7.10%</td><td>7.29%</td></tr>
    </table></div></body></html>"#;

    #[tokio::test]
    async fn static_source_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SBI_PAGE))
            .mount(&server)
            .await;

        let storage = test_storage().await;
        let acquirer = test_acquirer();
        let url = Url::parse(&server.uri()).unwrap();

        let report = run_source(&SbiSource, &url, &acquirer, &storage)
            .await
            .expect("run pipeline");

        assert_eq!(report.bank, "SBI");
        assert_eq!(report.rows_extracted, 3);
        // Footnote row has a numeric rate but no minimum bound.
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.rows_inserted, 2);

        let (_, rates) = storage.rates_for_bank("SBI").await.unwrap().unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].min_days, Some(7));
        assert_eq!(rates[1].max_days, Some(365));
    }

    #[tokio::test]
    async fn rendered_source_end_to_end() {
        let server = MockServer::start().await;

        // First response has no rate section; the acquirer polls again.
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>loading</body></html>"),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(KOTAK_PAGE))
            .mount(&server)
            .await;

        let storage = test_storage().await;
        let acquirer = test_acquirer();
        let url = Url::parse(&server.uri()).unwrap();

        let report = run_source(&KotakSource, &url, &acquirer, &storage)
            .await
            .expect("run pipeline");

        assert_eq!(report.bank, "Kotak Mahindra Bank");
        assert_eq!(report.rows_inserted, 2);

        let (_, rates) = storage
            .rates_for_bank("Kotak Mahindra Bank")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rates[0].min_days, Some(7));
        assert_eq!(rates[0].max_days, Some(14));
        assert_eq!(rates[0].interest_rate, 2.75);
    }

    #[tokio::test]
    async fn missing_table_clears_prior_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SBI_PAGE))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>maintenance</body></html>"),
            )
            .mount(&server)
            .await;

        let storage = test_storage().await;
        let acquirer = test_acquirer();
        let url = Url::parse(&server.uri()).unwrap();

        let first = run_source(&SbiSource, &url, &acquirer, &storage).await.unwrap();
        assert_eq!(first.rows_inserted, 2);

        // Second run sees no table: zero rows replace the prior set.
        let second = run_source(&SbiSource, &url, &acquirer, &storage).await.unwrap();
        assert_eq!(second.rows_extracted, 0);
        assert_eq!(second.rows_inserted, 0);

        let (_, rates) = storage.rates_for_bank("SBI").await.unwrap().unwrap();
        assert!(rates.is_empty());
    }

    #[tokio::test]
    async fn acquisition_failure_is_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let storage = test_storage().await;
        let acquirer = test_acquirer();
        let url = Url::parse(&server.uri()).unwrap();

        let result = run_source(&SbiSource, &url, &acquirer, &storage).await;
        assert!(result.is_err());
    }
}
