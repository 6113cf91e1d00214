use anyhow::Result;
use chainplot::chart::{ChartOptions, Formatters, assemble_with};
use chainplot::config::ChartConfig;
use chainplot::models::{AxisOverride, DisplayMode};
use chainplot::{align, stats, storage, transform, viz};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chainplot",
    version,
    about = "Align, transform & scale chain-metric time series into chart specs"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prepare a chart spec from series data (and optionally save, plot, and print stats).
    Prepare(PrepareArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Absolute,
    Stacked,
    Percentage,
}

impl From<Mode> for DisplayMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Absolute => DisplayMode::Absolute,
            Mode::Stacked => DisplayMode::Stacked,
            Mode::Percentage => DisplayMode::Percentage,
        }
    }
}

#[derive(Args, Debug)]
struct PrepareArgs {
    /// Input series (.json array of series, or tidy .csv `series,timestamp,value[,kind]`).
    #[arg(short, long)]
    input: PathBuf,
    /// Display mode.
    #[arg(short, long, value_enum, default_value_t = Mode::Absolute)]
    mode: Mode,
    /// Container height in pixels; drives the tick count (default 440).
    #[arg(long, default_value_t = 440.0)]
    height: f64,
    /// Manual lower bound for the value axis.
    #[arg(long, allow_hyphen_values = true)]
    min: Option<f64>,
    /// Manual upper bound for the value axis.
    #[arg(long, allow_hyphen_values = true)]
    max: Option<f64>,
    /// Chart configuration (TOML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Locale for the default formatters (overrides the config file).
    #[arg(long)]
    locale: Option<String>,
    /// Save the chart spec as JSON.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Save the aligned, transformed values as a wide CSV table.
    #[arg(long)]
    table: Option<PathBuf>,
    /// Render a preview at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Width of the preview (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Print per-series statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Prepare(args) => cmd_prepare(args),
    }
}

fn cmd_prepare(args: PrepareArgs) -> Result<()> {
    let mut config = match args.config.as_ref() {
        Some(p) => ChartConfig::from_toml_file(p)?,
        None => ChartConfig::default(),
    };
    if let Some(locale) = args.locale {
        config.locale = locale;
    }

    let series = storage::load_series(&args.input)?;
    log::info!("loaded {} series from {}", series.len(), args.input.display());

    let mode = DisplayMode::from(args.mode);
    let options = ChartOptions::new(mode, args.height)
        .with_override(AxisOverride {
            min: args.min,
            max: args.max,
        })
        .with_config(config);
    let spec = assemble_with(&series, &options, Formatters::default());

    if let Some(path) = args.out.as_ref() {
        storage::save_spec_json(&spec, path)?;
        eprintln!(
            "Saved spec ({} series, {} timestamps) to {}",
            spec.series.len(),
            spec.timestamps.len(),
            path.display()
        );
    }

    if args.table.is_some() || args.stats {
        let values = transform(&align(&series), mode);

        if let Some(path) = args.table.as_ref() {
            storage::save_aligned_csv(&values, path)?;
            eprintln!("Saved {} rows to {}", values.len(), path.display());
        }

        if args.stats {
            for s in stats::summarize(&values) {
                println!(
                    "{}  count={} missing={}  min={} max={} mean={} median={} last={}",
                    s.name,
                    s.count,
                    s.missing,
                    fmt_opt(s.min),
                    fmt_opt(s.max),
                    fmt_opt(s.mean),
                    fmt_opt(s.median),
                    fmt_opt(s.last)
                );
            }
        }
    }

    if let Some(plot_path) = args.plot.as_ref() {
        let height = if args.height.is_finite() && args.height >= 1.0 {
            args.height.round() as u32
        } else {
            1
        };
        viz::render_chart(&spec, plot_path, args.width, height)?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }

    Ok(())
}
