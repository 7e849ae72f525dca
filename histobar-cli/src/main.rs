use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use histobar_common::{Config, OutOfRangePolicy, Strategy, WidthMode};
use histobar_core::{histogram_report, read_session, write_lines};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "histobar", version, about = "Bucketed text histograms from console input")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for measurements and print the histogram (the default)
    Run(RunArgs),
    /// Print the effective configuration as TOML
    Config {
        #[arg(long)]
        save: bool,
    },
    /// Print shell completions
    Completions { shell: clap_complete::Shell },
}

#[derive(Args, Default)]
struct RunArgs {
    /// read answers from a file instead of stdin (no prompts are printed)
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<Strategy>,
    /// divide the range in floating point so the last bound is max
    #[arg(long)]
    exact_width: bool,
    /// print how many values fell outside the buckets
    #[arg(long)]
    report_out_of_range: bool,
    #[arg(long)]
    parallel: bool,
    #[arg(long)]
    marker: Option<char>,
    /// skip the width/bound diagnostic lines
    #[arg(long)]
    no_bounds: bool,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse()
}

fn setup_tracing_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(s) = args.strategy {
        config.bucketing.strategy = s;
    }
    if args.exact_width {
        config.bucketing.width_mode = WidthMode::Exact;
    }
    if args.report_out_of_range {
        config.bucketing.out_of_range = OutOfRangePolicy::Report;
    }
    if args.parallel {
        config.parallel.enabled = true;
    }
    if let Some(m) = args.marker {
        config.display.marker = m;
    }
    if args.no_bounds {
        config.display.show_bounds = false;
    }
}

fn main() -> anyhow::Result<()> {
    setup_tracing_subscriber();
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("ignoring config at {}: {e}", Config::config_path().display());
        Config::default()
    });
    match cli.command {
        None => run_session(RunArgs::default(), config)?,
        Some(Commands::Run(args)) => run_session(args, config)?,
        Some(Commands::Config { save }) => run_config(save, &config)?,
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "histobar", &mut io::stdout());
        }
    }
    Ok(())
}

fn run_session(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);
    log::debug!("effective config: {config:?}");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let input = match &args.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening input {}", path.display()))?;
            read_session::<_, Vec<u8>>(BufReader::new(file), None)
        }
        None => read_session(io::stdin().lock(), Some(&mut out)),
    }
    .context("reading measurements")?;
    let (_, lines) = histogram_report(&input, &config).context("building histogram")?;
    write_lines(&mut out, &lines)?;
    out.flush()?;
    Ok(())
}

fn run_config(save: bool, config: &Config) -> anyhow::Result<()> {
    print!("{}", config.to_toml()?);
    if save {
        let path = config.save()?;
        println!("# saved to {}", path.display());
    }
    Ok(())
}
