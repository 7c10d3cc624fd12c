use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{Field, FormState, HttpFilterService, RequestCoordinator};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod repl;
mod terminal;

use config::load_settings;
use repl::ReplSession;
use terminal::TerminalSurface;

#[derive(Parser, Debug)]
#[command(name = "combo", about = "Generate and filter number combinations via a filter service")]
struct Cli {
    /// Settings file; defaults to ./combo.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// How many combinations to print before summarizing the rest.
    #[arg(long, global = true)]
    preview_limit: Option<usize>,
    /// Print sum, even/odd and low/high counts under each combination.
    #[arg(long, global = true)]
    stats: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct PoolArgs {
    #[arg(long, allow_hyphen_values = true)]
    total_numbers: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    choose: Option<String>,
}

#[derive(Args, Debug, Default)]
struct FilterFieldArgs {
    #[arg(long, allow_hyphen_values = true)]
    min_sum: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    max_sum: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    min_even: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    max_even: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    min_distance: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    max_distance: Option<String>,
    /// Comma-separated, e.g. "3, 7, 12".
    #[arg(long, allow_hyphen_values = true)]
    include_numbers: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    exclude_numbers: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    random_count: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    max_consecutive: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request every combination of the pool.
    Generate {
        #[command(flatten)]
        pool: PoolArgs,
    },
    /// Request combinations matching one filter kind.
    Filter {
        kind: String,
        #[command(flatten)]
        pool: PoolArgs,
        #[command(flatten)]
        fields: FilterFieldArgs,
    },
    /// Interactive session with a persistent form.
    Repl {
        #[command(flatten)]
        pool: PoolArgs,
    },
}

fn fill_form(form: &mut FormState, entries: impl IntoIterator<Item = (Field, Option<String>)>) {
    for (field, value) in entries {
        if let Some(value) = value {
            form.set(field, value);
        }
    }
}

impl PoolArgs {
    fn into_form(self) -> FormState {
        let mut form = FormState::new();
        fill_form(
            &mut form,
            [
                (Field::TotalNumbers, self.total_numbers),
                (Field::Choose, self.choose),
            ],
        );
        form
    }
}

impl FilterFieldArgs {
    fn fill(self, form: &mut FormState) {
        fill_form(
            form,
            [
                (Field::MinSum, self.min_sum),
                (Field::MaxSum, self.max_sum),
                (Field::MinEven, self.min_even),
                (Field::MaxEven, self.max_even),
                (Field::MinDistance, self.min_distance),
                (Field::MaxDistance, self.max_distance),
                (Field::IncludeNumbers, self.include_numbers),
                (Field::ExcludeNumbers, self.exclude_numbers),
                (Field::RandomCount, self.random_count),
                (Field::MaxConsecutive, self.max_consecutive),
            ],
        );
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(preview_limit) = cli.preview_limit {
        settings.preview_limit = preview_limit;
    }
    if cli.stats {
        settings.show_stats = true;
    }

    let service = HttpFilterService::with_timeout(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("cannot use server url '{}'", settings.server_url))?;
    info!(endpoint = %service.endpoint(), "filter service configured");
    let coordinator = RequestCoordinator::with_render_options(service, settings.render_options());
    let surface = TerminalSurface::stdio();

    let succeeded = match cli.command {
        Command::Generate { pool } => coordinator
            .generate(&pool.into_form(), &surface)
            .await
            .is_ok(),
        Command::Filter { kind, pool, fields } => {
            let mut form = pool.into_form();
            fields.fill(&mut form);
            coordinator
                .apply_filter(&kind, &form, &surface)
                .await
                .is_ok()
        }
        Command::Repl { pool } => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            ReplSession::new(pool.into_form())
                .run(&coordinator, &surface, stdin, &mut stdout)
                .await?;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
