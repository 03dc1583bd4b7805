use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pages (
            id         INTEGER PRIMARY KEY,
            url        TEXT UNIQUE NOT NULL,
            slug       TEXT NOT NULL,
            visited    BOOLEAN NOT NULL DEFAULT 0,
            visited_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_pages_visited ON pages(visited);

        CREATE TABLE IF NOT EXISTS page_data (
            id         INTEGER PRIMARY KEY,
            page_id    INTEGER NOT NULL REFERENCES pages(id),
            url        TEXT NOT NULL,
            html       TEXT,
            status     INTEGER,
            error      TEXT,
            latency_ms INTEGER,
            scraped_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_page_data_url ON page_data(url);

        CREATE TABLE IF NOT EXISTS publications (
            url               TEXT PRIMARY KEY,
            identifier        TEXT NOT NULL,
            institution       TEXT NOT NULL,
            type              TEXT NOT NULL CHECK(type IN ('LEGE','HG','OG','OUG','OM','OTHER')),
            date              TEXT,
            title             TEXT NOT NULL,
            description       TEXT NOT NULL,
            documents         TEXT NOT NULL,
            contact           TEXT NOT NULL,
            feedback_days     INTEGER,
            max_feedback_date TEXT,
            processed_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_publications_identifier ON publications(identifier);
        ",
    )?;
    Ok(())
}

// ── Scraping ──

pub fn insert_pages(conn: &Connection, pages: &[(String, String)]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO pages (url, slug) VALUES (?1, ?2)")?;
        for (url, slug) in pages {
            count += stmt.execute(rusqlite::params![url, slug])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_unvisited(conn: &Connection, limit: Option<usize>) -> Result<Vec<(i64, String)>> {
    let sql = format!(
        "SELECT id, url FROM pages WHERE visited = 0 ORDER BY id{}",
        limit_clause(limit)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct ScrapeRow {
    pub page_id: i64,
    pub url: String,
    pub html: Option<String>,
    pub status: Option<i32>,
    pub error: Option<String>,
    pub latency_ms: Option<i64>,
}

pub fn save_scrape(conn: &Connection, row: &ScrapeRow) -> Result<()> {
    conn.prepare_cached(
        "INSERT INTO page_data (page_id, url, html, status, error, latency_ms)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?
    .execute(rusqlite::params![
        row.page_id, row.url, row.html, row.status, row.error, row.latency_ms,
    ])?;
    conn.prepare_cached("UPDATE pages SET visited = 1, visited_at = datetime('now') WHERE id = ?1")?
        .execute(rusqlite::params![row.page_id])?;
    Ok(())
}

// ── Processing ──

pub struct ScrapedPage {
    pub page_data_id: i64,
    pub url: String,
    pub html: String,
}

pub fn fetch_unprocessed(conn: &Connection, limit: Option<usize>) -> Result<Vec<ScrapedPage>> {
    let sql = format!(
        "SELECT pd.id, pd.url, pd.html
         FROM page_data pd
         LEFT JOIN publications p ON p.url = pd.url
         WHERE pd.html IS NOT NULL AND p.url IS NULL
         ORDER BY pd.id{}",
        limit_clause(limit)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ScrapedPage {
                page_data_id: row.get(0)?,
                url: row.get(1)?,
                html: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// One extracted article. `documents` and `contact` hold JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationRow {
    pub url: String,
    pub identifier: String,
    pub institution: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: Option<String>,
    pub title: String,
    pub description: String,
    pub documents: String,
    pub contact: String,
    pub feedback_days: Option<i64>,
    pub max_feedback_date: Option<String>,
}

pub fn save_publications(conn: &Connection, rows: &[PublicationRow]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO publications
             (url, identifier, institution, type, date, title, description,
              documents, contact, feedback_days, max_feedback_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        for p in rows {
            count += stmt.execute(rusqlite::params![
                p.url, p.identifier, p.institution, p.kind, p.date, p.title, p.description,
                p.documents, p.contact, p.feedback_days, p.max_feedback_date,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

const PUBLICATION_COLUMNS: &str = "url, identifier, institution, type, date, title, description,
     documents, contact, feedback_days, max_feedback_date";

fn read_publication(row: &rusqlite::Row) -> rusqlite::Result<PublicationRow> {
    Ok(PublicationRow {
        url: row.get(0)?,
        identifier: row.get(1)?,
        institution: row.get(2)?,
        kind: row.get(3)?,
        date: row.get(4)?,
        title: row.get(5)?,
        description: row.get(6)?,
        documents: row.get(7)?,
        contact: row.get(8)?,
        feedback_days: row.get(9)?,
        max_feedback_date: row.get(10)?,
    })
}

/// Publications whose feedback window could not be worked out.
pub fn fetch_review(conn: &Connection) -> Result<Vec<PublicationRow>> {
    let sql = format!(
        "SELECT {} FROM publications WHERE feedback_days IS NULL ORDER BY date DESC, identifier",
        PUBLICATION_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], read_publication)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn fetch_recent(conn: &Connection, limit: usize) -> Result<Vec<PublicationRow>> {
    let sql = format!(
        "SELECT {} FROM publications ORDER BY date DESC, identifier LIMIT {}",
        PUBLICATION_COLUMNS, limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], read_publication)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub total: usize,
    pub visited: usize,
    pub unvisited: usize,
    pub scraped: usize,
    pub errors: usize,
    pub processed: usize,
    pub needs_review: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let total: usize = conn.query_row("SELECT COUNT(*) FROM pages", [], |r| r.get(0))?;
    let visited: usize =
        conn.query_row("SELECT COUNT(*) FROM pages WHERE visited = 1", [], |r| r.get(0))?;
    let scraped: usize = conn.query_row("SELECT COUNT(*) FROM page_data", [], |r| r.get(0))?;
    let errors: usize = conn.query_row(
        "SELECT COUNT(*) FROM page_data WHERE error IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let processed: usize =
        conn.query_row("SELECT COUNT(*) FROM publications", [], |r| r.get(0))?;
    let needs_review: usize = conn.query_row(
        "SELECT COUNT(*) FROM publications WHERE feedback_days IS NULL",
        [],
        |r| r.get(0),
    )?;
    Ok(Stats {
        total,
        visited,
        unvisited: total - visited,
        scraped,
        errors,
        processed,
        needs_review,
    })
}

fn limit_clause(limit: Option<usize>) -> String {
    match limit {
        Some(n) => format!(" LIMIT {}", n),
        None => String::new(),
    }
}
