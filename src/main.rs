use anyhow::Context;
use cachebench_profiler::config::Catalog;
use cachebench_profiler::log::{LineFormat, parse_log_file};
use cachebench_profiler::{Result, model, render, select};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cachebench-profile-viz")]
#[command(about = "Cache benchmark log analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the newest log of every dataset/benchmark/scale and render a comparison report.
    Report {
        /// Directory holding the benchmark logs.
        #[arg(long)]
        logs: PathBuf,

        /// Catalog JSON overriding datasets, benchmarks, scales and request counts.
        #[arg(long)]
        config: Option<String>,

        /// Line format of every log; detected per file when omitted.
        #[arg(long, value_enum)]
        format: Option<LineFormat>,

        #[arg(short = 'o', long)]
        out: String,

        /// Also write the report data as JSON.
        #[arg(long)]
        json: Option<String>,
    },

    /// Plot network and CPU usage over time for a single run.
    Timeline {
        /// Log file to plot; otherwise the newest log matching the query below.
        #[arg(long, conflicts_with_all = ["logs", "benchmark", "dataset", "scale"])]
        log: Option<PathBuf>,

        #[command(flatten)]
        query: OptionalQuery,

        #[arg(long, value_enum)]
        format: Option<LineFormat>,

        #[arg(short = 'o', long)]
        out: String,

        #[arg(long)]
        json: Option<String>,
    },

    /// Print the path of the newest log for a benchmark/dataset/scale.
    Latest {
        #[command(flatten)]
        query: Query,
    },
}

#[derive(Args)]
struct Query {
    #[arg(long)]
    logs: PathBuf,

    #[arg(long)]
    benchmark: String,

    #[arg(long)]
    dataset: String,

    /// Defaults to 1.
    #[arg(long)]
    scale: Option<u32>,
}

#[derive(Args)]
struct OptionalQuery {
    #[arg(long, requires_all = ["benchmark", "dataset"])]
    logs: Option<PathBuf>,

    #[arg(long)]
    benchmark: Option<String>,

    #[arg(long)]
    dataset: Option<String>,

    #[arg(long)]
    scale: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Report {
            logs,
            config,
            format,
            out,
            json,
        } => {
            // 1) Catalog: built-in defaults, optionally overridden from file.
            let catalog = match &config {
                Some(path) => Catalog::load(path)?,
                None => Catalog::default(),
            };

            // 2) Select, parse and summarize every combination.
            let data = model::build_report_data(&logs, &catalog, format)
                .with_context(|| format!("build report from {}", logs.display()))?;
            log::info!(
                "{} combinations: {} summarized, {} failed",
                data.totals.combinations,
                data.totals.succeeded,
                data.totals.failed
            );

            // 3) Render.
            if let Some(json) = &json {
                write_json(json, &data)?;
            }
            let html = render::render_report_html(&data)?;
            std::fs::write(&out, html).with_context(|| format!("write {}", out))?;
            println!("Wrote {}", out);
        }

        Commands::Timeline {
            log,
            query,
            format,
            out,
            json,
        } => {
            let (path, title) = match (log, query) {
                (Some(path), _) => {
                    let title = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    (path, title)
                }
                (
                    None,
                    OptionalQuery {
                        logs: Some(logs),
                        benchmark: Some(benchmark),
                        dataset: Some(dataset),
                        scale,
                    },
                ) => {
                    let desc = select::find_latest_log(&logs, &benchmark, &dataset, scale)?;
                    let title = format!("{}-{} (scale {})", dataset, benchmark, desc.scale);
                    (desc.path, title)
                }
                _ => anyhow::bail!("timeline needs --log, or --logs with --benchmark and --dataset"),
            };

            let series = parse_log_file(&path, format)?;
            let data = model::build_timeline(&title, &path.display().to_string(), &series);

            if let Some(json) = &json {
                write_json(json, &data)?;
            }
            let html = render::render_timeline_html(&data)?;
            std::fs::write(&out, html).with_context(|| format!("write {}", out))?;
            println!("Wrote {}", out);
        }

        Commands::Latest { query } => {
            let desc =
                select::find_latest_log(&query.logs, &query.benchmark, &query.dataset, query.scale)?;
            println!("{}", desc.path.display());
        }
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &str, data: &T) -> Result<()> {
    let file = std::fs::File::create(Path::new(path)).with_context(|| format!("create {}", path))?;
    serde_json::to_writer_pretty(file, data)?;
    log::info!("wrote {}", path);
    Ok(())
}
