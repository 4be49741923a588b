//! Command-line front end for `optpage`.
//!
//! Loads one or more page definition files, builds the page registry and
//! renders or lists pages.
//!
//! ```text
//! optpage --config site.yaml render my-page --format post --title "Settings"
//! optpage --config site.yaml --config local.json list --option-key opts1
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use optpage::{ArgsOverride, PageFormat, SiteConfig};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Render options pages from YAML/JSON page definitions
#[derive(Debug, Parser)]
#[command(name = "optpage", version)]
pub struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Page definition file; repeat to layer files, later ones win
    #[arg(short, long = "config", value_name = "FILE", global = true)]
    pub configs: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a page to stdout
    Render {
        /// Page id (menu slug)
        page: String,

        /// Override the page layout
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Override the page title
        #[arg(long)]
        title: Option<String>,

        /// Override the column count of post-style pages
        #[arg(long)]
        columns: Option<i64>,
    },

    /// List registered pages as `<page id>\t<option key>`
    List {
        /// Only pages rendering this option group
        #[arg(long)]
        option_key: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Simple,
    Post,
}

impl From<FormatArg> for PageFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Simple => PageFormat::Simple,
            FormatArg::Post => PageFormat::Post,
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over
/// `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "optpage=debug" } else { "optpage=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Runs `cli`, writing command output to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    if cli.configs.is_empty() {
        bail!("no page definitions given, pass at least one --config FILE");
    }

    let site = SiteConfig::load_layered(cli.configs.as_slice())
        .context("loading page definitions")?;
    debug!(pages = site.pages.len(), "loaded page definitions");

    match cli.command {
        Command::Render {
            page,
            format,
            title,
            columns,
        } => render(&site, &page, format, title, columns, out),
        Command::List { option_key } => list(&site, option_key.as_deref(), out),
    }
}

fn render(
    site: &SiteConfig,
    page: &str,
    format: Option<FormatArg>,
    title: Option<String>,
    columns: Option<i64>,
    out: &mut impl Write,
) -> Result<()> {
    let pages = site.registry()?;
    let display = pages
        .get(page)
        .with_context(|| format!("no page with id {page:?}"))?;

    let mut args = site
        .page(page)
        .map(|p| p.args.clone())
        .unwrap_or_else(ArgsOverride::new);
    if let Some(format) = format {
        args = args.page_format(format.into());
    }
    if let Some(title) = title {
        args = args.title(title);
    }
    if let Some(columns) = columns {
        args = args.page_columns(columns);
    }

    info!(page, "rendering page");
    let html = display
        .page(&args)
        .with_context(|| format!("rendering page {page:?}"))?;
    writeln!(out, "{html}")?;
    Ok(())
}

fn list(site: &SiteConfig, option_key: Option<&str>, out: &mut impl Write) -> Result<()> {
    let pages = site.registry()?;
    let selected = match option_key {
        Some(key) => pages.get_by_options_key(key)?,
        None => pages.get_all().clone(),
    };

    let mut rows: Vec<_> = selected
        .iter()
        .map(|(id, page)| (id.as_str(), page.option_key()))
        .collect();
    rows.sort();

    for (id, key) in rows {
        writeln!(out, "{id}\t{key}")?;
    }
    Ok(())
}
