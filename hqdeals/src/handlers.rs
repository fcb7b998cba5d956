use clap::ArgMatches;
use colored::Colorize;
use hqdeals_core::card::{self, OfferCard};
use hqdeals_core::error::CoreError;
use hqdeals_core::page::{self, PageView};
use hqdeals_core::report::{ReportFormat, generate_report, save_report};
use hqdeals_core::{DealsLoader, DealsState};
use hqdeals_fetch::{CategoryManifest, ClientConfig, DealsClient, FetchError};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Settings shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GlobalOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            quiet: matches.get_flag("quiet"),
            verbose: matches.get_flag("verbose"),
            base_url: matches
                .get_one::<Url>("base-url")
                .map(|url| url.to_string())
                .unwrap_or_else(|| hqdeals_fetch::DEFAULT_BASE_URL.to_string()),
            timeout_secs: matches.get_one::<u64>("timeout").copied().unwrap_or(10),
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over the
/// verbosity flag.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "hqdeals=debug,hqdeals_core=debug,hqdeals_fetch=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests call handlers repeatedly)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn build_loader(options: &GlobalOptions) -> Result<DealsLoader, FetchError> {
    debug!(
        "Using {} with a {}s timeout",
        options.base_url, options.timeout_secs
    );
    let client = DealsClient::new(&ClientConfig {
        base_url: options.base_url.clone(),
        timeout_secs: options.timeout_secs,
    })?;
    Ok(DealsLoader::new(client))
}

/// Expand `~` in a user supplied output path
pub fn resolve_output_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

pub fn parse_format(value: &str) -> ReportFormat {
    ReportFormat::from_str(value).unwrap_or(ReportFormat::Text)
}

/// Load the manifest and the offers of `category` (or the first category)
pub async fn fetch_page(
    loader: &DealsLoader,
    category: Option<&str>,
) -> Result<DealsState, CoreError> {
    let mut state = DealsState::new();
    loader.load_page(&mut state, category).await?;
    Ok(state)
}

pub async fn render_page(
    loader: &DealsLoader,
    category: Option<&str>,
    format: ReportFormat,
) -> Result<String, CoreError> {
    let state = fetch_page(loader, category).await?;
    let view = PageView::from_state(&state, &loader.site_url());
    generate_report(&view, format)
}

pub fn format_categories(manifest: &CategoryManifest) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{} {} ({})\n\n",
        page::LAST_UPDATED,
        card::format_timestamp(manifest.timestamp),
        manifest.directory
    ));
    output.push_str(page::CATEGORY);
    output.push('\n');

    let width = manifest
        .categories
        .iter()
        .map(|c| c.value.chars().count())
        .max()
        .unwrap_or(0);
    for category in &manifest.categories {
        output.push_str(&format!(
            "  {:width$}  {}\n",
            category.value,
            category.label,
            width = width
        ));
    }
    output
}

pub fn format_offer_cards(label: &str, cards: &[OfferCard]) -> String {
    let mut output = format!(
        "{} ({})\n\n",
        label.bright_white().bold(),
        cards.len()
    );

    for card in cards {
        output.push_str(&format!("{}\n", card.title.bold()));
        output.push_str(&format!(
            "  {} {} {}\n",
            card.price.green().bold(),
            card.original_price.dimmed().strikethrough(),
            card.discount.red().bold()
        ));
        output.push_str(&format!(
            "  {} {} {}\n",
            card.stars.yellow(),
            card.rating,
            card.review_count.dimmed()
        ));
        output.push_str(&format!(
            "  {}: {}\n\n",
            card.link_label,
            card.link.blue()
        ));
    }
    output
}

fn spinner(options: &GlobalOptions, message: &str) -> ProgressBar {
    if options.quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    spinner
}

fn fail(message: impl Display) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message.to_string().red());
    std::process::exit(1);
}

fn loader_or_exit(options: &GlobalOptions) -> DealsLoader {
    match build_loader(options) {
        Ok(loader) => loader,
        Err(e) => fail(e),
    }
}

pub async fn handle_categories(options: &GlobalOptions) {
    init_logging(options.verbose);
    let loader = loader_or_exit(options);

    let progress = spinner(options, "Loading categories...");
    let result = loader.client().fetch_manifest().await;
    progress.finish_and_clear();

    match result {
        Ok(manifest) => print!("{}", format_categories(&manifest)),
        Err(e) => fail(format!("Failed to load categories: {}", e)),
    }
}

pub async fn handle_offers(sub_matches: &ArgMatches, options: &GlobalOptions) {
    init_logging(options.verbose);
    let loader = loader_or_exit(options);
    let category = sub_matches.get_one::<String>("category").map(String::as_str);

    let progress = spinner(options, "Loading offers...");
    let result = fetch_page(&loader, category).await;
    progress.finish_and_clear();

    match result {
        Ok(state) => {
            let view = PageView::from_state(&state, &loader.site_url());
            let label = view.selected_label().unwrap_or("-");
            print!("{}", format_offer_cards(label, &view.offers));
        }
        Err(e) => fail(e),
    }
}

pub async fn handle_render(sub_matches: &ArgMatches, options: &GlobalOptions) {
    init_logging(options.verbose);
    let loader = loader_or_exit(options);
    let category = sub_matches.get_one::<String>("category").map(String::as_str);
    let format = sub_matches
        .get_one::<String>("format")
        .map(|f| parse_format(f))
        .unwrap_or(ReportFormat::Text);
    let output = sub_matches.get_one::<String>("output");

    let progress = spinner(options, "Rendering deals page...");
    let result = render_page(&loader, category, format).await;
    progress.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => fail(e),
    };

    match output {
        Some(path) => {
            let path = resolve_output_path(path);
            if let Err(e) = save_report(&report, &path) {
                fail(format!("Failed to save report to {}: {}", path.display(), e));
            }
            if !options.quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }
}

/// Runs the terminal browser on a blocking thread. No log subscriber is
/// installed since log lines would draw over the alternate screen.
pub async fn handle_browse(options: &GlobalOptions) {
    let loader = loader_or_exit(options);
    let handle = tokio::runtime::Handle::current();

    match tokio::task::spawn_blocking(move || hqdeals_tui::run_browser(loader, handle)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => fail(format!("Error running browser: {}", e)),
        Err(e) => fail(format!("Browser thread failed: {}", e)),
    }
}
