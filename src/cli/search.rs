use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    catalog::{self, CatalogClient},
    cli::{Context, browse::print_tracks, spinner},
    config,
    error::Result,
    info,
    management::{SearchSession, SearchView},
    warning,
};

/// Runs a single search, or with `interactive` reads search terms from stdin
/// line by line and prints whichever result is current.
pub async fn search(ctx: &Context, term: Option<String>, interactive: bool) -> Result<()> {
    if !interactive {
        let term = term.unwrap_or_default();
        if term.trim().is_empty() {
            info!("Nothing to search for.");
            return Ok(());
        }

        let pb = spinner(&format!("Searching for {}...", term));
        let tracks = catalog::search::tracks(&ctx.catalog, &term).await;
        pb.finish_and_clear();
        print_tracks(tracks?);
        return Ok(());
    }

    let client = ctx.catalog.clone();
    let session = SearchSession::spawn(config::search_debounce(), move |term: String| {
        let client: CatalogClient = client.clone();
        async move { catalog::search::tracks(&client, &term).await }
    });
    if let Some(term) = term {
        session.input(term);
    }

    info!("Type to search, an empty line clears, Ctrl-D quits.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut view = session.subscribe();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => session.input(line),
                None => break,
            },
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = view.borrow_and_update().clone();
                render(&current);
            }
        }
    }

    Ok(())
}

fn render(view: &SearchView) {
    if view.loading {
        println!("{}", "searching...".dimmed());
        return;
    }
    if let Some(error) = &view.error {
        warning!("{}", error);
        return;
    }
    if view.term.is_empty() {
        return;
    }
    println!("{} {}", "Results for".bold(), view.term.bold());
    print_tracks(view.tracks.clone());
}
