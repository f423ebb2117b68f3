//! Recarga CLI
//!
//! Command-line front-end for the recharge tracker:
//! - List, filter, page and sort recharges
//! - Edit or delete a recharge
//! - Export recharges as CSV
//! - Show the monthly dashboard

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recarga::{
    generate_default_config, Config, DashboardChartsRenderer, Filters, HttpRechargeApi,
    IsentoFilter, ListQueryState, Locale, LoggingConfig, OutputFormat, RechargeId,
    RechargeListController, SortDir, SortKey, TerminalListView, TerminalSurface,
};

#[derive(Parser)]
#[command(name = "recarga")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage EV recharges and view monthly charts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/recarga/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server URL, overrides the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Display locale (pt-BR, en-US)
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Location contains
    #[arg(long, default_value = "")]
    pub local: String,
    /// Notes contain
    #[arg(long, default_value = "")]
    pub observacoes: String,
    /// Exemption: all, true, false
    #[arg(long, default_value = "all")]
    pub isento: IsentoFilter,
    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub date_from: Option<NaiveDate>,
    /// Last day (YYYY-MM-DD)
    #[arg(long)]
    pub date_to: Option<NaiveDate>,
    /// Only the last 30 days, ending today
    #[arg(long, conflicts_with_all = ["date_from", "date_to"])]
    pub last_30_days: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
    /// Sort column
    #[arg(long, default_value = "data")]
    pub sort_by: SortKey,
    /// Sort direction: asc or desc
    #[arg(long, default_value = "asc")]
    pub sort_dir: SortDir,
    #[command(flatten)]
    pub filters: FilterArgs,
}

impl FilterArgs {
    fn apply(&self, state: &mut ListQueryState) {
        state.apply_filters(Filters {
            local: self.local.clone(),
            observacoes: self.observacoes.clone(),
            isento: self.isento,
            date_from: self.date_from,
            date_to: self.date_to,
        });
        if self.last_30_days {
            state.last_30_days(chrono::Local::now().date_naive());
        }
    }
}

impl PageArgs {
    fn to_state(&self) -> ListQueryState {
        let mut state = ListQueryState::new();
        self.filters.apply(&mut state);
        state.current_page = self.page.max(1);
        state.sort_by = self.sort_by;
        state.sort_dir = self.sort_dir;
        state
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one page of recharges
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Edit a recharge shown on the selected page
    Edit {
        /// Recharge id
        id: String,
        #[command(flatten)]
        page: PageArgs,
        /// New date (YYYY-MM-DD)
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        kwh: Option<String>,
        #[arg(long)]
        custo: Option<String>,
        #[arg(long)]
        odometro: Option<String>,
        /// Mark as exempt (true) or paid (false)
        #[arg(long = "set-isento")]
        set_isento: Option<bool>,
        #[arg(long = "set-local")]
        set_local: Option<String>,
        #[arg(long = "set-observacoes")]
        set_observacoes: Option<String>,
    },

    /// Delete a recharge
    Delete {
        /// Recharge id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the filtered recharges as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the monthly charts and totals
    Dashboard,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("recarga={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.base_url {
        config.server.base_url = url.clone();
    }
    if let Some(locale) = cli.locale {
        config.display.locale = locale;
    }
    Ok(config)
}

/// Ask on stdin; only an affirmative answer confirms
fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{} [s/N] ", prompt);
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    ))
}

fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            eprintln!("Wrote {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging);

    let locale = config.display.locale;
    let api = HttpRechargeApi::new(&config.server)?;
    let endpoints = api.endpoints().clone();
    tracing::debug!(base_url = %endpoints.base(), locale = locale.code(), "Starting");

    match cli.command {
        Commands::List { page } => {
            let controller = RechargeListController::new(
                api,
                TerminalListView::new(cli.format, locale),
                endpoints,
                locale,
            )
            .with_state(page.to_state());

            controller.load_recharges().await;
            if controller.view().failed() {
                std::process::exit(1);
            }
        }

        Commands::Edit {
            id,
            page,
            data,
            kwh,
            custo,
            odometro,
            set_isento,
            set_local,
            set_observacoes,
        } => {
            let controller = RechargeListController::new(
                api,
                TerminalListView::new(cli.format, locale),
                endpoints,
                locale,
            )
            .with_state(page.to_state());

            controller.load_recharges().await;
            let id = RechargeId::new(id);
            if controller.view().failed() || !controller.begin_edit(&id) {
                eprintln!("Recharge {} is not on page {}", id, page.page);
                std::process::exit(1);
            }
            let Some(mut form) = controller.view().edit_form() else {
                std::process::exit(1);
            };

            if let Some(v) = data {
                form.data = v;
            }
            if let Some(v) = kwh {
                form.kwh = v;
            }
            if let Some(v) = custo {
                form.custo = v;
            }
            if let Some(v) = odometro {
                form.odometro = v;
            }
            if let Some(v) = set_isento {
                form.isento = v;
            }
            if let Some(v) = set_local {
                form.local = v;
            }
            if let Some(v) = set_observacoes {
                form.observacoes = v;
            }

            controller.save_edit(&form).await;
            if controller.view().failed() {
                std::process::exit(1);
            }
        }

        Commands::Delete { id, yes } => {
            let controller = RechargeListController::new(
                api,
                TerminalListView::new(cli.format, locale),
                endpoints,
                locale,
            );

            controller.begin_delete(&RechargeId::new(id));
            let Some(target) = controller.view().delete_target() else {
                std::process::exit(1);
            };
            if yes || confirm(&format!("Delete recharge {}?", target))? {
                controller.confirm_delete().await;
            } else {
                controller.cancel_delete();
                eprintln!("Cancelled");
            }
            // The confirmation stays open when the delete failed
            if controller.view().failed() || controller.view().delete_target().is_some() {
                std::process::exit(1);
            }
        }

        Commands::Export { filters, output } => {
            let mut state = ListQueryState::new();
            filters.apply(&mut state);
            let controller = RechargeListController::new(
                api,
                TerminalListView::new(cli.format, locale),
                endpoints,
                locale,
            )
            .with_state(state);

            controller.export();
            let url = controller
                .view()
                .navigation()
                .context("Export did not produce a URL")?;
            let csv = controller
                .api()
                .download(&url)
                .await
                .with_context(|| format!("Failed to download {}", url))?;
            write_output(output.as_ref(), &csv)?;
        }

        Commands::Dashboard => {
            let renderer =
                DashboardChartsRenderer::new(api, TerminalSurface::new(cli.format, locale), locale);
            renderer.init().await;
        }

        Commands::Config { output } => {
            write_output(output.as_ref(), &generate_default_config())?;
        }
    }

    Ok(())
}
