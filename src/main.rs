mod db;
mod index;
mod parser;
mod scraper;
mod settings;
mod text;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use settings::Settings;

#[derive(Parser)]
#[command(
    name = "tineret_scraper",
    about = "Public consultation scraper for the youth & sports ministry"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the index page and queue article URLs
    Init,
    /// Fetch unvisited article pages
    Scrape {
        /// Max pages to fetch (default: all unvisited)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Extract publications from fetched pages
    Process {
        /// Max pages to process (default: all unprocessed)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Scrape + process in one go
    Run {
        /// Max pages to scrape+process
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Extract a single article and print it as JSON
    Parse {
        /// Page URL, used to resolve document links (fetched when no file is given)
        #[arg(short, long)]
        url: String,
        /// Local HTML file
        file: Option<PathBuf>,
    },
    /// Publications with no feedback window, for manual review
    Review,
    /// Most recent publications
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Show scraping statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(db = %settings.db_path.display(), index = %settings.index_url, "Loaded settings");

    let result = match cli.command {
        Commands::Init => {
            let conn = open(&settings)?;
            let pages = index::fetch_article_urls(&settings).await?;
            let inserted = db::insert_pages(&conn, &pages)?;
            println!("Queued {} new article URLs ({} on index)", inserted, pages.len());
            Ok(())
        }
        Commands::Scrape { limit } => {
            let conn = open(&settings)?;
            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("No unvisited pages. Run 'init' first or all pages are fetched.");
                return Ok(());
            }
            println!("Fetching {} pages (streaming to DB)...", pages.len());
            let stats = scraper::scrape_pages_streaming(&conn, &settings, pages).await?;
            println!(
                "Done: {} fetched ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            Ok(())
        }
        Commands::Process { limit } => {
            let conn = open(&settings)?;
            let pages = db::fetch_unprocessed(&conn, limit)?;
            if pages.is_empty() {
                println!("No unprocessed pages. Run 'scrape' first.");
                return Ok(());
            }
            println!("Processing {} pages...", pages.len());
            let counts = process_pages(&conn, &pages)?;
            counts.print();
            Ok(())
        }
        Commands::Run { limit } => {
            let conn = open(&settings)?;
            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("No unvisited pages. Run 'init' first.");
                return Ok(());
            }

            // Phase 1: Fetch (streaming to DB)
            let t_scrape = Instant::now();
            println!("Pipeline: fetching {} pages (streaming to DB)...", pages.len());
            let stats = scraper::scrape_pages_streaming(&conn, &settings, pages).await?;
            println!(
                "Fetched {} pages ({} ok, {} errors) in {:.1}s",
                stats.total, stats.ok, stats.errors, t_scrape.elapsed().as_secs_f64()
            );

            // Phase 2: Process
            let t_process = Instant::now();
            let unprocessed = db::fetch_unprocessed(&conn, None)?;
            if unprocessed.is_empty() {
                println!("Nothing to process (all fetched pages had errors).");
                return Ok(());
            }
            println!("Processing {} pages...", unprocessed.len());
            let counts = process_pages(&conn, &unprocessed)?;
            println!("Processed in {:.1}s", t_process.elapsed().as_secs_f64());
            counts.print();
            Ok(())
        }
        Commands::Parse { url, file } => {
            let html = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => scraper::fetch_single_page(&settings, &url).await?,
            };
            let publication = parser::parse_html(&url, &html);
            println!("{}", serde_json::to_string_pretty(&publication)?);
            Ok(())
        }
        Commands::Review => {
            let conn = open(&settings)?;
            let rows = db::fetch_review(&conn)?;
            if rows.is_empty() {
                println!("Nothing to review.");
                return Ok(());
            }
            for r in &rows {
                println!(
                    "{} | {} | {}\n    {}",
                    r.date.as_deref().unwrap_or("-"),
                    r.kind,
                    truncate(&r.title, 80),
                    r.url
                );
            }
            println!("\n{} publications without a feedback window", rows.len());
            Ok(())
        }
        Commands::List { limit } => {
            let conn = open(&settings)?;
            let rows = db::fetch_recent(&conn, limit)?;
            if rows.is_empty() {
                println!("No publications found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<10} | {:<5} | {:<48} | {:>4} | {:<10}",
                "#", "Date", "Type", "Title", "Days", "Deadline"
            );
            println!("{}", "-".repeat(96));

            for (i, r) in rows.iter().enumerate() {
                let days = r
                    .feedback_days
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{:>3} | {:<10} | {:<5} | {:<48} | {:>4} | {:<10}",
                    i + 1,
                    r.date.as_deref().unwrap_or("-"),
                    r.kind,
                    truncate(&r.title, 48),
                    days,
                    r.max_feedback_date.as_deref().unwrap_or("-"),
                );
            }

            println!("\n{} publications", rows.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = open(&settings)?;
            let s = db::get_stats(&conn)?;
            println!("Total:        {}", s.total);
            println!("Visited:      {}", s.visited);
            println!("Unvisited:    {}", s.unvisited);
            println!("Fetched:      {}", s.scraped);
            println!("Errors:       {}", s.errors);
            println!("Processed:    {}", s.processed);
            println!("Needs review: {}", s.needs_review);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn open(settings: &Settings) -> anyhow::Result<rusqlite::Connection> {
    let conn = db::connect(&settings.db_path)?;
    db::init_schema(&conn)?;
    Ok(conn)
}

struct ProcessCounts {
    publications: usize,
    needs_review: usize,
}

impl ProcessCounts {
    fn print(&self) {
        println!(
            "Saved {} publications, {} need manual review.",
            self.publications, self.needs_review,
        );
    }
}

fn process_pages(
    conn: &rusqlite::Connection,
    pages: &[db::ScrapedPage],
) -> anyhow::Result<ProcessCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = ProcessCounts {
        publications: 0,
        needs_review: 0,
    };

    for chunk in pages.chunks(500) {
        let rows: Vec<_> = chunk.par_iter().map(parser::process_page).collect();
        counts.needs_review += rows.iter().filter(|r| r.feedback_days.is_none()).count();
        counts.publications += rows.len();
        db::save_publications(conn, &rows)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
