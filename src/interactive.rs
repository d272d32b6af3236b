use crate::config::Config;
use crate::orchestrator::DownloadJob;
use crate::output::OutputTarget;
use crate::request::{Artifact, ArtifactRequest};
use crate::runner::{Runner, ToolStatus};
use console::style;
use dialoguer::{Confirm, Input, MultiSelect};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::warn;

/// Stem used when the title cannot be fetched.
const FALLBACK_STEM: &str = "video";

/// Longest prompt shown verbatim in the summary screen.
const PROMPT_PREVIEW_LEN: usize = 50;

/// Walk the user through choosing a URL, artifacts, output path and prompt.
///
/// Returns `None` when the user quits.
pub async fn run_interactive_wizard(
    runner: &dyn Runner,
    url: Option<String>,
    config: &Config,
    tools: &ToolStatus,
) -> anyhow::Result<Option<DownloadJob>> {
    print_header();

    let url = match url {
        Some(url) => url,
        None => {
            let url: String = Input::new()
                .with_prompt("Enter video URL")
                .interact_text()?;
            url.trim().to_string()
        }
    };
    if url.is_empty() {
        anyhow::bail!("A URL is required");
    }

    let mut target = fetch_default_target(runner, &url, config).await;

    let Some(mut request) = select_artifacts(tools.summarizer_available)? else {
        return Ok(None);
    };

    if request.has_file_steps() {
        target = edit_output_path(&target, config)?;
    }

    if request.summary {
        request.prompt = Some(edit_prompt(config.prompt())?);
    }

    print_summary(&url, &target, &request);

    if !Confirm::new()
        .with_prompt("Start download?")
        .default(true)
        .interact()?
    {
        return Ok(None);
    }

    println!();

    Ok(Some(DownloadJob::new(url, request, target)))
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").magenta()
    );
    println!(
        "{}",
        style("║        tuber - video, audio, text & summary       ║").magenta()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").magenta()
    );
    println!();
}

async fn fetch_default_target(runner: &dyn Runner, url: &str, config: &Config) -> OutputTarget {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Fetching video info...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let title = runner.fetch_title(url).await;
    pb.finish_and_clear();

    match title {
        Ok(title) if !title.is_empty() => {
            println!("{} {}", style("✓").green(), style(&title).bold());
            OutputTarget::from_title(&config.output_dir, &title)
        }
        Ok(_) => OutputTarget::from_title(&config.output_dir, FALLBACK_STEM),
        Err(e) => {
            warn!("Could not fetch title: {}", e);
            println!(
                "{} Could not fetch video title, using \"{}\"",
                style("!").yellow(),
                FALLBACK_STEM
            );
            OutputTarget::from_title(&config.output_dir, FALLBACK_STEM)
        }
    }
}

fn summary_label(available: bool) -> &'static str {
    if available {
        "Summary"
    } else {
        "Summary (install claude cli)"
    }
}

/// Map checked menu rows (video, audio, subtitles, summary) to a request.
fn request_from_selection(selected: &[usize], summary_available: bool) -> ArtifactRequest {
    let mut request = ArtifactRequest::default();
    for &index in selected {
        match Artifact::ALL.get(index) {
            Some(artifact) => request.set(*artifact, true),
            None => request.summary = summary_available,
        }
    }
    request
}

fn select_artifacts(summary_available: bool) -> anyhow::Result<Option<ArtifactRequest>> {
    let mut items: Vec<&str> = Artifact::ALL.iter().map(|a| a.label()).collect();
    items.push(summary_label(summary_available));

    loop {
        println!("\n{}", style("What would you like to download?").bold());
        println!(
            "{}",
            style("space to toggle • enter to confirm • esc or q to quit").dim()
        );

        let Some(selected) = MultiSelect::new().items(&items).interact_opt()? else {
            return Ok(None);
        };

        if !summary_available && selected.contains(&Artifact::ALL.len()) {
            println!(
                "{} Summary needs the claude cli, ignoring it",
                style("!").yellow()
            );
        }

        let request = request_from_selection(&selected, summary_available);
        if request.is_empty() {
            println!("{} Select at least one option", style("!").yellow());
            continue;
        }
        return Ok(Some(request));
    }
}

fn edit_output_path(target: &OutputTarget, config: &Config) -> anyhow::Result<OutputTarget> {
    let current = target.base_path().display().to_string();
    let path: String = Input::new()
        .with_prompt("Output path (without extension)")
        .with_initial_text(current)
        .interact_text()?;

    let edited = OutputTarget::from_custom_path(&path, &config.output_dir);
    if edited.stem().is_none() {
        println!(
            "{} No file name given, keeping {}",
            style("!").yellow(),
            target.base_path().display()
        );
        return Ok(target.clone());
    }
    Ok(edited)
}

fn edit_prompt(default: &str) -> anyhow::Result<String> {
    let prompt: String = Input::new()
        .with_prompt("Summary prompt")
        .with_initial_text(default)
        .interact_text()?;
    let prompt = prompt.trim();
    Ok(if prompt.is_empty() {
        default.to_string()
    } else {
        prompt.to_string()
    })
}

fn prompt_preview(prompt: &str) -> String {
    if prompt.chars().count() <= PROMPT_PREVIEW_LEN {
        return prompt.to_string();
    }
    let head: String = prompt.chars().take(PROMPT_PREVIEW_LEN - 3).collect();
    format!("{}...", head)
}

fn print_summary(url: &str, target: &OutputTarget, request: &ArtifactRequest) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  URL:       {}", style(url).cyan());
    println!("  Download:  {}", request);
    println!("  Output:    {}", style(target.preview(request)).cyan());
    if request.summary {
        println!("  Prompt:    {}", prompt_preview(request.prompt_or_default()));
    }
    println!();
}
