//! Showing connections page by page, or all at once.

use std::fmt;

use colored::Colorize as _;
use inquire::{InquireError, Select};
use larder::api::models::Connection;
use larder::api::{ConnectionQuery, HttpClient};
use larder::errors::{DomainErrorCode, ErrorCatalog};
use larder::pagination::ConnectionPager;
use larder::session::AdminSession;
use tracing::{error, info};

use super::CliError;
use super::table::{Tabular, render};
use crate::term;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Next,
    Previous,
    Quit,
}

impl fmt::Display for Nav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Quit => "quit",
        })
    }
}

fn choices(has_previous: bool, has_next: bool) -> Vec<Nav> {
    let mut options = Vec::with_capacity(3);
    if has_next {
        options.push(Nav::Next);
    }
    if has_previous {
        options.push(Nav::Previous);
    }
    options.push(Nav::Quit);
    options
}

fn print_page<N: Tabular>(page: &Connection<N>, number: usize) {
    let rows: Vec<&N> = page.nodes().collect();
    print!("{}", render_refs(&rows));
    let footer = match page.total_count {
        Some(total) => format!("page {number} ({} of {total} shown)", page.len()),
        None => format!("page {number} ({} rows)", page.len()),
    };
    println!("{}", footer.dimmed());
}

fn render_refs<N: Tabular>(rows: &[&N]) -> String {
    struct Row<'a, N>(&'a N);

    impl<N: Tabular> Tabular for Row<'_, N> {
        const HEADERS: &'static [&'static str] = N::HEADERS;

        fn row(&self) -> Vec<String> {
            self.0.row()
        }
    }

    let rows: Vec<Row<'_, N>> = rows.iter().map(|n| Row(*n)).collect();
    render(&rows)
}

/// Page through `pager` interactively. A failed page fetch is reported and the current page
/// stays on screen.
pub async fn browse<C, Q, E>(mut pager: ConnectionPager<C, Q>) -> Result<(), CliError>
where
    C: HttpClient,
    Q: ConnectionQuery,
    Q::Node: Tabular,
    E: DomainErrorCode,
{
    let catalog = ErrorCatalog::<E>::new();

    let first = pager.current().await.map_err(CliError::api::<E>)?;
    print_page(&first, pager.page_number());

    if !term::is_interactive() {
        if pager.has_next() {
            info!("More pages available. Rerun with --all to print everything.");
        }
        return Ok(());
    }

    loop {
        let options = choices(pager.has_previous(), pager.has_next());
        if options == [Nav::Quit] {
            return Ok(());
        }

        let nav = match Select::new("Page:", options)
            .with_help_message("type n, p, or q and press enter")
            .prompt()
        {
            Ok(nav) => nav,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let moved = match nav {
            Nav::Next => pager.next_page().await,
            Nav::Previous => pager.previous_page().await,
            Nav::Quit => return Ok(()),
        };

        match moved {
            Ok(Some(page)) => print_page(&page, pager.page_number()),
            Ok(None) => {}
            Err(err) => error!(error = %err, "{}", catalog.describe(&err)),
        }
    }
}

/// Walk every page and print the nodes as one table.
pub async fn dump<C, Q, E>(session: &AdminSession<C>, query: Q) -> Result<(), CliError>
where
    C: HttpClient,
    Q: ConnectionQuery,
    Q::Node: Tabular,
    E: DomainErrorCode,
{
    let nodes = session
        .client()
        .stream(session.tenant(), query)
        .collect()
        .await
        .map_err(CliError::api::<E>)?;
    print!("{}", render(&nodes));
    info!(rows = nodes.len(), "fetched every page");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reachable_directions_are_offered() {
        assert_eq!(choices(false, true), [Nav::Next, Nav::Quit]);
        assert_eq!(choices(true, false), [Nav::Previous, Nav::Quit]);
        assert_eq!(choices(true, true), [Nav::Next, Nav::Previous, Nav::Quit]);
        assert_eq!(choices(false, false), [Nav::Quit]);
    }
}
