use crate::{
    catalog::TableTitleCatalog,
    classify::classify,
    config::Config,
    donation::{DonationSink, JsonlSink, StdoutSink},
    flow::{Flow, FlowRequest, ResumePayload},
    logsink::LogSink,
    platform,
    session::FlowSession,
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "port-flow")]
#[command(about = "Resumable data-donation flow orchestrator (file prompts + extraction + consent)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./port-flow.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the interactive donation flow on the terminal.
    Run {
        /// Session id; generated when omitted.
        #[arg(long)]
        session: Option<String>,
    },
    /// Run one platform pipeline on a file and print the outcome.
    Classify {
        #[arg(long)]
        platform: String,
        #[arg(long)]
        input: PathBuf,
    },
    /// List registered platforms.
    Platforms {},
    /// Print the table title catalog.
    Titles {},
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = if cfg_path.exists() {
        Config::load(&cfg_path)?
    } else {
        Config::default()
    };

    let logs = LogSink::new();
    let _guard = init_logging(&args, &cfg, &logs)?;

    match &args.cmd {
        Command::Run { session } => run(&cfg, logs, session.as_deref()),
        Command::Classify { platform, input } => classify_cmd(platform, input),
        Command::Platforms {} => {
            for p in platform::all() {
                println!("{}", p.name());
            }
            Ok(())
        }
        Command::Titles {} => {
            let titles: Vec<_> = TableTitleCatalog::keys()
                .into_iter()
                .map(|k| serde_json::json!({"key": k, "title": TableTitleCatalog::title(k)}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&titles)?);
            Ok(())
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("port-flow.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("port-flow.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config, sink: &LogSink) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    // Every log line also lands in the drainable sink the flow donates from.
    let sink_layer = tracing_subscriber::fmt::layer()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_target(false)
        .boxed();

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = PathBuf::from(&cfg.logging.file_path);
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(&path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(sink_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn build_sink(cfg: &Config) -> Result<Box<dyn DonationSink>> {
    match cfg.donation.sink.as_str() {
        "stdout" => Ok(Box::new(StdoutSink)),
        "jsonl" => Ok(Box::new(JsonlSink::new(Path::new(&cfg.donation.out_dir))?)),
        other => Err(anyhow!("unknown donation.sink: {other}")),
    }
}

fn run(cfg: &Config, logs: LogSink, session_id: Option<&str>) -> Result<()> {
    let platforms = platform::registry(&cfg.flow.platforms);
    if platforms.is_empty() {
        return Err(anyhow!("no known platforms configured"));
    }

    let session = match session_id {
        Some(id) => FlowSession::with_id(id),
        None => FlowSession::new(),
    };
    let sink = build_sink(cfg)?;

    if cfg.debug.dump_effective_config {
        ensure_dir(Path::new(&cfg.donation.out_dir))?;
        let raw = toml::to_string(cfg).unwrap_or_default();
        std::fs::write(
            Path::new(&cfg.donation.out_dir).join("effective-config.toml"),
            raw,
        )?;
    }

    let mut flow = Flow::new(platforms, session, logs, sink);
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    while let Some(request) = flow.current_request() {
        match request {
            FlowRequest::FileInput {
                platform,
                description,
                extensions,
                progress,
            } => {
                println!("\n== {platform} ({progress:.0}%) ==");
                println!("{}", description.en);
                println!("Accepted: {extensions}");
                let payload = prompt_file_payload(&mut input)?;
                flow.resume(payload);
            }
            FlowRequest::Confirm {
                text, ok, cancel, ..
            } => {
                println!("\n{}", text.en);
                let answer = prompt_line(&mut input, &format!("{} / {}? [t/c] ", ok.en, cancel.en))?;
                if answer.trim().eq_ignore_ascii_case("t") {
                    flow.resume(ResumePayload::ConfirmYes);
                } else {
                    flow.resume(ResumePayload::ConfirmNo);
                }
            }
            FlowRequest::ConsentForm {
                platform,
                form,
                progress,
            } => {
                println!("\n== {platform} consent ({progress:.0}%) ==");
                for table in &form.tables {
                    println!("  {} - {} ({} rows)", table.key, table.title.en, table.data.rows.len());
                }
                let answer = prompt_line(&mut input, "Donate these tables? [y/N] ")?;
                if answer.trim().eq_ignore_ascii_case("y") {
                    let accepted = serde_json::to_string(&form)?;
                    flow.resume(ResumePayload::ConsentAccepted(accepted));
                } else {
                    flow.resume(ResumePayload::ConsentDeclined);
                }
            }
            FlowRequest::EndPage => {
                println!("\nThank you for your donation.");
                break;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&flow.report())?);
    Ok(())
}

fn prompt_file_payload(input: &mut impl BufRead) -> Result<ResumePayload> {
    loop {
        let line = prompt_line(input, "Path to export file (or 'skip'): ")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("skip") {
            return Ok(ResumePayload::Skipped);
        }
        match std::fs::read(trimmed) {
            Ok(bytes) => return Ok(ResumePayload::FileSelected(bytes)),
            Err(err) => println!("cannot read {trimmed}: {err}"),
        }
    }
}

fn prompt_line(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    print!("{prompt}");
    std::io::stdout().flush().ok();
    let mut line = String::new();
    input.read_line(&mut line).with_context(|| "reading stdin")?;
    Ok(line)
}

fn classify_cmd(platform_name: &str, input: &Path) -> Result<()> {
    let platform = platform::by_name(platform_name)
        .ok_or_else(|| anyhow!("unknown platform: {platform_name}"))?;
    let raw = std::fs::read(input)
        .with_context(|| format!("reading input: {}", input.display()))?;

    let (validation, tables) = platform.extract(&raw)?;
    let outcome = classify(&validation, &tables);

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "platform": platform.name(),
            "validation": validation,
            "outcome": outcome,
            "table_keys": tables.keys(),
        }))?
    );
    Ok(())
}
