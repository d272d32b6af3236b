use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use tuber::config::Config;
use tuber::interactive::run_interactive_wizard;
use tuber::pipeline::{install_interrupt_handler, run_download, PipelineConfig};
use tuber::runner::{detect_tools, require_fetcher, require_summarizer, CommandRunner};
use tuber::{ArtifactRequest, DownloadJob, OutputTarget};

#[derive(Parser)]
#[command(name = "tuber")]
#[command(version, about = "Download video, audio, transcripts or an AI summary of a video")]
#[command(long_about = "Fetch video, audio or a clean text transcript with yt-dlp, or pipe the \
transcript to claude for a summary. Flags can be combined. Without flags an interactive menu opens.")]
struct Cli {
    /// Video URL
    url: Option<String>,

    /// Download video (mp4)
    #[arg(short = 'v', long)]
    video: bool,

    /// Download audio (mp3)
    #[arg(short = 'a', long)]
    audio: bool,

    /// Download subtitles as deduplicated text
    #[arg(short = 's', long)]
    subs: bool,

    /// Summarize the video with claude
    #[arg(long)]
    sum: bool,

    /// Custom prompt for the summary
    #[arg(short = 'p', long)]
    prompt: Option<String>,

    /// Output directory (default: current directory)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

/// Accept the single-dash `-sum` spelling of `--sum`.
///
/// Values of `-p` and `-o` are passed through, as is anything after `--`.
fn normalize_args(args: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out = Vec::new();
    let mut takes_value = false;
    let mut literal = false;

    for arg in args {
        let is_sum = !literal && !takes_value && arg == "-sum";
        literal |= !takes_value && arg == "--";
        takes_value = !literal && matches!(arg.as_str(), "-p" | "--prompt" | "-o" | "--output");
        out.push(if is_sum { "--sum".to_string() } else { arg });
    }
    out
}

impl Cli {
    fn request(&self, default_prompt: &str) -> ArtifactRequest {
        let prompt = self
            .prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(default_prompt);

        ArtifactRequest {
            video: self.video,
            audio: self.audio,
            subtitles: self.subs,
            summary: self.sum,
            prompt: Some(prompt.to_string()),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn print_usage() {
    println!("Usage: tuber [flags] <url>");
    println!("\nFlags (can be combined):");
    println!("  -v             Download video");
    println!("  -a             Download audio (mp3)");
    println!("  -s             Download subtitles (text)");
    println!("  --sum, -sum    Summarize video using AI");
    println!("  -p <prompt>    Custom prompt for summary");
    println!("  -o <dir>       Output directory");
    println!("\nExamples:");
    println!("  tuber -a -s <url>                       Download audio and subtitles");
    println!("  tuber --sum -p \"List key points\" <url>  Summarize with custom prompt");
    println!("\nWithout flags, opens interactive menu.");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args()));

    init_logging(cli.verbose);

    // Load and validate configuration
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(ref dir) = cli.output {
        config.output_dir = dir.clone();
    }
    config
        .validate()
        .context("Configuration validation failed")?;

    install_interrupt_handler().context("Failed to install Ctrl+C handler")?;

    let request = cli.request(config.prompt());

    // The wizard offers a summary, so it needs to know about the summarizer too
    let tools = detect_tools(&config, request.summary || request.is_empty());
    require_fetcher(&config, &tools)?;

    if request.summary {
        require_summarizer(&config, &tools)?;
    }

    let runner = CommandRunner::from_config(&config);

    let job = if request.is_empty() {
        match run_interactive_wizard(&runner, cli.url.clone(), &config, &tools).await? {
            Some(job) => job,
            None => std::process::exit(0),
        }
    } else {
        let Some(url) = cli.url.clone() else {
            print_usage();
            std::process::exit(1);
        };
        DownloadJob::new(url, request, OutputTarget::titled(&config.output_dir))
    };

    info!("Output:   {}", job.target.fetch_pattern());

    eprintln!("\nDownloading {} from:\n{}\n", job.request, job.url);

    let report = run_download(&runner, &job, &PipelineConfig::default()).await?;

    for warning in &report.warnings {
        eprintln!("{} could not convert {}", style("!").yellow(), warning);
    }
    for transcript in &report.transcripts {
        info!("Transcript written to {}", transcript.display());
    }

    eprintln!("\n{} Done!", style("✓").green());

    Ok(())
}
