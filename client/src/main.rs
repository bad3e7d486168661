//! `discovery`: command-line front end for the discovery search client.
//!
//! Configuration is read from the environment (and `.env`), see
//! [`client::config`].

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use client::app::App;
use client::config::Config;
use client::http_utils::transport::ReqwestTransport;
use client::persistence::{load_state, save_state};
use client::stores::user::{LoginWindow, PostMessage};
use common::route_query::{route_query_from_pairs, route_query_string};
use common::search_history::HistoryType;
use common::search_query::TypeaheadParams;
use common::search_result::SearchResultRecord;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "discovery", version, about = "Search a research data repository")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for resources
    Search {
        /// Free-text term
        #[arg(default_value = "")]
        term: String,
        /// Facet as a route pair, e.g. `an=Tarboton` or `py=2000` (repeatable)
        #[arg(long = "route", value_name = "KEY=VALUE")]
        route: Vec<String>,
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Suggest completions for a term
    Typeahead {
        term: String,
        /// Suggest creator names instead of terms
        #[arg(long)]
        creator: bool,
    },
    /// List the content types the repository knows
    ContentTypes,
    /// Show remembered searches
    History {
        #[arg(long, default_value = "term")]
        kind: String,
        /// List every entry of every kind, in the order first logged
        #[arg(long, conflicts_with = "prefix")]
        all: bool,
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Forget a remembered search
    Forget { key: String },
    /// Log in; paste the JSON the login page reports back
    Login,
    /// Check whether the saved session is still valid
    Whoami,
    /// End the session
    Logout,
}

/// Stands in for the login popup: prints where to log in.
struct TerminalLoginWindow;

impl LoginWindow for TerminalLoginWindow {
    fn open(&self, url: &str) {
        tracing::info!(%url, "open this address to log in");
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "client=info,common=info,discovery=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(Cli::parse()).await {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let state_path = config.state_path.clone();
    let transport = Arc::new(ReqwestTransport::new(config.http_timeout)?);
    let mut app = App::new(config, transport, Arc::new(TerminalLoginWindow));
    app.restore(load_state(&state_path).await?);

    match cli.command {
        Command::Search { term, route, pages } => {
            let mut pairs = vec![("q".to_string(), term)];
            for pair in route {
                let Some((key, value)) = pair.split_once('=') else {
                    bail!("--route expects KEY=VALUE, got {pair:?}");
                };
                pairs.push((key.to_string(), value.to_string()));
            }
            let mut outcome = app.run_search(&route_query_from_pairs(pairs)).await?;
            for _ in 1..pages {
                if !outcome.has_more {
                    break;
                }
                outcome = app.fetch_more().await?;
            }
            for record in app.search.results() {
                print_record(&record);
            }
            tracing::info!(
                shown = app.search.len(),
                has_more = outcome.has_more,
                route = %route_query_string(&app.route_query()),
                "done"
            );
        }
        Command::Typeahead { term, creator } => {
            let params = TypeaheadParams::new(term);
            let suggestions = if creator {
                app.search.typeahead_creator(&params).await?
            } else {
                app.search.typeahead(&params).await?
            };
            suggestions.iter().for_each(|s| println!("{s}"));
        }
        Command::ContentTypes => {
            app.refresh_content_types().await?.iter().for_each(|ct| println!("{ct}"));
        }
        Command::History { all: true, .. } => {
            for entry in app.history.entries() {
                println!("{}\t{}\t{}", entry.date, entry.kind.as_str(), entry.key);
            }
        }
        Command::History { kind, prefix, .. } => {
            let Some(kind) = HistoryType::parse(&kind) else {
                bail!("unknown history kind {kind:?}");
            };
            for entry in app.history.search_hints(&prefix, kind) {
                println!("{}\t{}", entry.date, entry.key);
            }
        }
        Command::Forget { key } => {
            if !app.history.delete_hint(&key) {
                tracing::warn!(%key, "not in history");
            }
        }
        Command::Login => {
            let (sender, receiver) = mpsc::channel(1);
            let mut sender = Some(sender);
            let origin = app.config.app_url.clone();
            let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
            let login = app.user.log_in(receiver);
            tokio::pin!(login);
            // Stdin is only read while the login is still waiting, so no read
            // is left pending once it completes.
            let session = loop {
                tokio::select! {
                    biased;
                    result = &mut login => break result.context("login did not complete")?,
                    line = lines.next_line(), if sender.is_some() => {
                        let Some(line) = line? else {
                            sender = None;
                            continue;
                        };
                        let Ok(data) = serde_json::from_str(&line) else {
                            tracing::warn!("not JSON, try again");
                            continue;
                        };
                        if let Some(sender) = &sender {
                            sender.send(PostMessage { origin: origin.clone(), data }).await.ok();
                        }
                    }
                }
            };
            println!("logged in as {}", session.orcid);
        }
        Command::Whoami => {
            let authorized = app.user.session().is_some() && app.user.check_authorization().await;
            match app.user.session() {
                Some(session) if authorized => println!("{}", session.orcid),
                _ => println!("not logged in"),
            }
        }
        Command::Logout => app.user.log_out().await,
    }

    save_state(&state_path, &app.snapshot()).await
}

fn print_record(record: &SearchResultRecord) {
    let year = record.date_created.get(..4).unwrap_or("----");
    println!("{year}  {}  {}", record.name, record.url);
    if !record.creator.is_empty() {
        println!("      {}", record.creator.join("; "));
    }
}
