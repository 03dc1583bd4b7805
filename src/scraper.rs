use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::db::{self, ScrapeRow};
use crate::index;
use crate::settings::Settings;

/// Scrape stats returned after completion.
pub struct ScrapeStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Fetch pages concurrently, saving each result to DB as it arrives.
/// Each page is tried once; failures are stored on the row.
pub async fn scrape_pages_streaming(
    conn: &Connection,
    settings: &Settings,
    pages: Vec<(i64, String)>,
) -> Result<ScrapeStats> {
    let concurrency = settings.concurrency.max(1);
    let client = index::client(settings)?;
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let total = pages.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Workers send results, this loop is the only DB writer
    let (tx, mut rx) = tokio::sync::mpsc::channel::<ScrapeRow>(concurrency * 2);

    for (page_id, url) in pages {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return;
            };
            let row = fetch_one(&client, page_id, url).await;
            let _ = tx.send(row).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut ok = 0usize;
    let mut errors = 0usize;

    while let Some(row) = rx.recv().await {
        if let Some(e) = &row.error {
            warn!("Failed to fetch {}: {}", row.url, e);
            errors += 1;
        } else {
            ok += 1;
        }
        db::save_scrape(conn, &row)?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Fetched {} pages ({} ok, {} errors)", total, ok, errors);

    Ok(ScrapeStats { total, ok, errors })
}

async fn fetch_one(client: &reqwest::Client, page_id: i64, url: String) -> ScrapeRow {
    let start = Instant::now();
    let result = fetch_html(client, &url).await;
    let latency_ms = i64::try_from(start.elapsed().as_millis()).ok();

    match result {
        Ok((status, html)) => ScrapeRow {
            page_id,
            url,
            html: Some(html),
            status: Some(status),
            error: None,
            latency_ms,
        },
        Err((status, e)) => ScrapeRow {
            page_id,
            url,
            html: None,
            status,
            error: Some(e),
            latency_ms,
        },
    }
}

async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
) -> std::result::Result<(i32, String), (Option<i32>, String)> {
    let response = client.get(url).send().await.map_err(|e| (None, e.to_string()))?;
    let status = response.status();
    let code = Some(i32::from(status.as_u16()));
    if !status.is_success() {
        return Err((code, format!("HTTP {}", status)));
    }
    let html = response.text().await.map_err(|e| (code, e.to_string()))?;
    Ok((i32::from(status.as_u16()), html))
}

/// Fetch one page and return its HTML.
pub async fn fetch_single_page(settings: &Settings, url: &str) -> Result<String> {
    let client = index::client(settings)?;
    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(html)
}
