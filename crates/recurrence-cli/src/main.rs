//! `recur` CLI — generate recurring event instances and check them against a view window.
//!
//! ## Usage
//!
//! ```sh
//! # Ten Mondays at 09:00 from today, viewed over the next month
//! recur generate
//!
//! # Three Mondays starting 2024-01-01, viewed over Jan 5..10
//! recur generate --start 2024-01-01 --weekday 1 --count 3 --from 2024-01-05 --to 2024-01-10
//!
//! # Daily, no window, as JSON
//! recur generate --start 2024-01-01 --pattern daily --count 3 --all --format json
//!
//! # Read spec and window from a JSON request
//! recur generate -i request.json
//!
//! # Export the rule as DTSTART + RRULE
//! recur rrule --start 2024-01-03 --weekday 1 --count 2
//! ```
//!
//! Set `RUST_LOG` (or pass `-v`) to see engine diagnostics on stderr.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use clap::{Args, Parser, Subcommand, ValueEnum};
use recurrence_engine::planner::default_window;
use recurrence_engine::spec::{parse_optional_date, DEFAULT_COUNT, DEFAULT_START_TIME};
use recurrence_engine::{
    generate, instances_in_window, summarize, Instance, RawSpec, RawWindow, RecurrenceSpec,
    ViewWindow, WindowSummary,
};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "recur",
    version,
    about = "Generate recurring event instances and check them against a view window"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine diagnostics to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a rule into instances and tag each against the view window
    Generate {
        #[command(flatten)]
        spec: SpecArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// List only the instances inside the view window
        #[arg(long)]
        only_in_window: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the rule as an iCalendar DTSTART + RRULE pair
    Rrule {
        #[command(flatten)]
        spec: SpecArgs,
    },
}

#[derive(Args)]
struct SpecArgs {
    /// JSON request file with `spec` and `window` objects ("-" for stdin)
    #[arg(short, long, conflicts_with_all = ["start", "time", "pattern", "weekday", "count"])]
    input: Option<String>,
    /// First candidate date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    start: Option<String>,
    /// Time of day, HH:MM
    #[arg(long, default_value = DEFAULT_START_TIME)]
    time: String,
    /// Recurrence pattern: daily or weekly
    #[arg(long, default_value = "weekly")]
    pattern: String,
    /// Weekday for weekly rules, 0=Sunday..6=Saturday
    #[arg(long, default_value_t = 1)]
    weekday: u8,
    /// Number of occurrences (clamped to 1..=366)
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    count: u32,
}

#[derive(Args)]
struct WindowArgs {
    /// First day of the view window, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    from: Option<String>,
    /// Last day of the view window, YYYY-MM-DD (defaults to one month from today)
    #[arg(long)]
    to: Option<String>,
    /// Ignore the view window; every instance is visible
    #[arg(long, conflicts_with_all = ["from", "to"])]
    all: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Body of a `--input` request file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct Request {
    spec: RawSpec,
    window: RawWindow,
}

#[derive(Serialize)]
struct InstanceDto {
    date: String,
    time: String,
    display: String,
    in_window: bool,
}

impl From<&Instance> for InstanceDto {
    fn from(i: &Instance) -> Self {
        Self {
            date: i.date.format("%Y-%m-%d").to_string(),
            time: format_time(i.time),
            display: i.display(),
            in_window: i.in_window,
        }
    }
}

/// `HH:MM`, or `HH:MM:SS` when the time carries seconds.
fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

#[derive(Serialize)]
struct Report {
    summary: WindowSummary,
    instances: Vec<InstanceDto>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let today = Local::now().date_naive();

    match cli.command {
        Commands::Generate {
            spec,
            window,
            format,
            only_in_window,
            output,
        } => {
            let (spec, window) = resolve(&spec, &window, today)?;
            info!(pattern = %spec.pattern, count = spec.count, "generating instances");

            let instances = generate(&spec, &window);
            let summary = summarize(&instances);
            let listed = if only_in_window {
                instances_in_window(&instances, &window)
            } else {
                instances
            };

            let rendered = match format {
                OutputFormat::Text => render_text(&spec, summary, &listed),
                OutputFormat::Json => {
                    let report = Report {
                        summary,
                        instances: listed.iter().map(InstanceDto::from).collect(),
                    };
                    let mut json = serde_json::to_string_pretty(&report)?;
                    json.push('\n');
                    json
                }
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Rrule { spec } => {
            let (spec, _) = resolve(&spec, &WindowArgs::unbounded(), today)?;
            if spec.start_date.is_none() {
                anyhow::bail!("A start date is required to export an RRULE");
            }
            let Some(start) = spec.aligned_start() else {
                anyhow::bail!("Weekly alignment runs past the end of the calendar range");
            };
            println!(
                "DTSTART:{}",
                start.and_time(spec.start_time).format("%Y%m%dT%H%M%S")
            );
            println!("RRULE:{}", spec.to_rrule());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

impl WindowArgs {
    fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
            all: true,
        }
    }
}

/// Turn flags or a request file into a validated spec and window.
///
/// Flags fill gaps from the local clock: the start date and window default to
/// today and today plus one month. A request file is taken as written, so an
/// empty start date there yields no instances and an empty bound leaves the
/// window open. Explicit `--from`/`--to` flags override the request's bounds.
fn resolve(
    spec: &SpecArgs,
    window: &WindowArgs,
    today: NaiveDate,
) -> Result<(RecurrenceSpec, ViewWindow)> {
    if let Some(path) = spec.input.as_deref() {
        let body = read_input(path)?;
        let request: Request = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse request JSON: {}", path))?;
        debug!(path, "loaded request file");

        let spec = RecurrenceSpec::try_from(request.spec).context("Invalid spec in request")?;
        let requested =
            ViewWindow::try_from(request.window).context("Invalid window in request")?;
        return Ok((spec, resolve_window(window, requested)?));
    }

    let raw = RawSpec {
        start_date: spec
            .start
            .clone()
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        start_time: spec.time.clone(),
        pattern: spec.pattern.clone(),
        weekday: Some(spec.weekday),
        count: i64::from(spec.count),
    };
    let parsed = RecurrenceSpec::try_from(raw).context("Invalid recurrence arguments")?;

    Ok((parsed, resolve_window(window, default_window(today))?))
}

/// Apply window flags on top of `fallback`, bound by bound.
fn resolve_window(args: &WindowArgs, fallback: ViewWindow) -> Result<ViewWindow> {
    if args.all {
        return Ok(ViewWindow::unbounded());
    }

    let from = match args.from.as_deref() {
        Some(s) => parse_optional_date(s).context("Invalid --from date")?,
        None => fallback.from,
    };
    let to = match args.to.as_deref() {
        Some(s) => parse_optional_date(s).context("Invalid --to date")?,
        None => fallback.to,
    };
    Ok(ViewWindow { from, to })
}

fn render_text(spec: &RecurrenceSpec, summary: WindowSummary, instances: &[Instance]) -> String {
    if summary.total == 0 {
        return if spec.start_date.is_none() {
            "No instances generated (no start date)\n".to_string()
        } else {
            "No instances generated (start date is at the end of the calendar range)\n"
                .to_string()
        };
    }

    let mut out = format!(
        "Showing {} instances ({} in view window)\n",
        summary.total, summary.in_window
    );
    for instance in instances {
        if instance.in_window {
            out.push_str(&format!("  [x] {}\n", instance.display()));
        } else {
            out.push_str(&format!(
                "  [ ] {} (outside view window)\n",
                instance.display()
            ));
        }
    }
    out
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn format_time_keeps_seconds_only_when_present() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap()), "09:00");
        assert_eq!(
            format_time(NaiveTime::from_hms_opt(17, 30, 15).unwrap()),
            "17:30:15"
        );
    }

    #[test]
    fn render_text_without_start_date() {
        let spec = RecurrenceSpec {
            start_date: None,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            pattern: recurrence_engine::Pattern::Daily,
            count: 3,
        };
        assert_eq!(
            render_text(&spec, WindowSummary::default(), &[]),
            "No instances generated (no start date)\n"
        );
    }

    #[test]
    fn render_text_when_alignment_leaves_the_calendar() {
        let last = NaiveDate::MAX;
        let spec = RecurrenceSpec::weekly(
            last,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            last.weekday().succ(),
            3,
        );
        let instances = generate(&spec, &ViewWindow::unbounded());
        assert!(instances.is_empty());
        assert_eq!(
            render_text(&spec, summarize(&instances), &instances),
            "No instances generated (start date is at the end of the calendar range)\n"
        );
    }

    #[test]
    fn window_flags_override_fallback_bound_by_bound() {
        let fallback = ViewWindow::parse("2024-01-05", "2024-01-10").unwrap();
        let args = WindowArgs {
            from: Some("2024-01-01".to_string()),
            to: None,
            all: false,
        };
        assert_eq!(
            resolve_window(&args, fallback).unwrap(),
            ViewWindow::parse("2024-01-01", "2024-01-10").unwrap()
        );
        assert_eq!(
            resolve_window(&WindowArgs::unbounded(), fallback).unwrap(),
            ViewWindow::unbounded()
        );
    }
}
