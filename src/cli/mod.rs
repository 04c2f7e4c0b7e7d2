use std::future::Future;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::watch;

use crate::config::SyncConfig;
use crate::forms::{confirm_delete, validate_field, FieldInput};
use crate::services::{HttpFetcher, MatchSource, Poller};
use crate::view::export::write_csv_file;
use crate::view::filter::FilterSnapshot;
use crate::view::table::TableRow;
use crate::view::FixtureView;

/// Filter and search flags shared by the table-printing commands.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub filter: FilterSnapshot,
    pub search: Option<String>,
    pub sort_column: Option<usize>,
}

fn prepare_view(options: &ViewOptions) -> FixtureView {
    let mut view = FixtureView::new();
    if !options.filter.is_empty() {
        view.set_filter(options.filter.clone());
    }
    if let Some(term) = &options.search {
        view.set_search(term);
    }
    view
}

/// Print the visible rows as an aligned text table.
pub fn print_table(view: &FixtureView) {
    let table = view.table();
    let columns = table.headers().len();

    let mut widths: Vec<usize> = table.headers().iter().map(|h| h.label.chars().count()).collect();
    for row in table.visible_rows() {
        for (i, cell) in row.cells().iter().enumerate().take(columns) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(table.headers().iter().map(|h| h.label.as_str()).collect()));
    println!("{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));
    for row in table.visible_rows() {
        println!("{}", line(row.cells().iter().map(String::as_str).collect()));
    }

    let hidden = table.rows().len() - table.visible_rows().count();
    if hidden > 0 {
        println!("({} partidos ocultos por los filtros)", hidden);
    }
}

async fn load_once<S: MatchSource + 'static>(source: Arc<S>, options: &ViewOptions) -> Result<FixtureView> {
    let partidos = source.fetch_partidos().await?;
    let mut view = prepare_view(options);
    view.accept(1, &partidos);
    if let Some(column) = options.sort_column {
        view.sort_by(column)?;
    }
    Ok(view)
}

pub async fn fetch_once(config: &SyncConfig, options: &ViewOptions) -> Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(&config.api_url));
    println!("📥 Fetching partidos from {}...", fetcher.endpoint());

    let view = load_once(fetcher, options).await?;
    if view.table().rows().is_empty() {
        println!("📭 No partidos found.");
        return Ok(());
    }

    print_table(&view);
    Ok(())
}

/// Ask on the terminal; anything but an explicit yes declines.
pub fn ask_confirmation(prompt: &str) -> bool {
    print!("{} [s/N] ", prompt);
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes")
}

/// Replacing an existing export deletes it, so that needs `--yes` or a confirmation.
fn overwrite_allowed(path: &Path, assume_yes: bool, confirm: impl FnOnce(&str) -> bool) -> bool {
    !path.exists() || assume_yes || confirm_delete(confirm)
}

pub async fn export(config: &SyncConfig, options: &ViewOptions, out: Option<&Path>, assume_yes: bool) -> Result<()> {
    let path = out.unwrap_or_else(|| Path::new(&config.export_filename));
    if !overwrite_allowed(path, assume_yes, ask_confirmation) {
        println!("🚫 Export cancelled, {} left untouched", path.display());
        return Ok(());
    }

    let fetcher = Arc::new(HttpFetcher::new(&config.api_url));
    let view = load_once(fetcher, options).await?;

    let rows = write_csv_file(view.table(), path)?;
    println!("✅ Exported {} partidos to {}", rows, path.display());
    Ok(())
}

/// Keep the table in sync until Ctrl-C, printing it after every accepted refresh.
pub async fn watch_fixture(config: &SyncConfig, options: &ViewOptions) -> Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(&config.api_url));
    println!(
        "🔄 Watching {} every {}s (Ctrl-C to stop)",
        config.api_url,
        config.poll_interval.as_secs()
    );

    watch_source(fetcher, options, config.poll_interval, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn watch_source<S, F>(source: Arc<S>, options: &ViewOptions, period: Duration, shutdown: F) -> Result<()>
where
    S: MatchSource + 'static,
    F: Future<Output = ()>,
{
    let view = prepare_view(options).shared();
    let mut applied = view.read().await.subscribe();

    let poller = Poller::new(source, Arc::clone(&view), period);
    // The table prints once this lands; shutdown is watched meanwhile.
    poller.spawn_refresh();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller_task = tokio::spawn(poller.run(shutdown_rx));

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            changed = applied.changed() => {
                if changed.is_err() {
                    break;
                }
                let seq = *applied.borrow_and_update();
                let view = view.read().await;
                println!("\n📅 Fixture (refresh #{}, {} fallos)", seq, view.status().failed);
                print_table(&view);
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    poller_task.await?;
    Ok(())
}

pub fn validate(field: &FieldInput) -> Result<()> {
    if let Some(counter) = field.counter() {
        let marker = if counter.warning { "⚠️" } else { "📝" };
        println!("{} {}", marker, counter.text);
    }

    let outcome = validate_field(field);
    match outcome.feedback() {
        None => {
            println!("✅ {}", outcome.css_class());
            Ok(())
        }
        Some(message) => Err(anyhow!("❌ {}", message)),
    }
}
