use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sitecrew::cancellation::CancellationToken;
use sitecrew::config::{api_key_from_env, SitecrewConfig};
use sitecrew::crews;
use sitecrew::events::LoggingEventSink;
use sitecrew::materialize::{validate_project_name, Materializer};
use sitecrew::model::GeminiClient;
use sitecrew::observability::{init_logging, LogFormat, LoggingConfig};
use sitecrew::pipeline::PipelineRunner;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "YAML configuration file")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        default_value_t = LogFormat::Text,
        help = "Log output format: text or json"
    )]
    log_format: LogFormat,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the eight-role website crew and write the generated project
    Website(WebsiteArgs),
    /// Research a topic with a single agent
    Research(ResearchArgs),
}

#[derive(Args, Debug, Default)]
struct WebsiteArgs {
    #[arg(long, help = "What the website should be; prompted for when omitted")]
    description: Option<String>,

    #[arg(long, help = "Directory name for the generated project; prompted for when omitted")]
    project_name: Option<String>,

    #[arg(long, help = "Root directory for generated projects")]
    output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct ResearchArgs {
    #[arg(long, help = "Topic to research; prompted for when omitted")]
    topic: Option<String>,

    #[arg(long, help = "Also write the report to this file")]
    save: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_logging(&LoggingConfig::new().with_level(level).with_format(cli.log_format));

    let config = match &cli.config {
        Some(path) => SitecrewConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => SitecrewConfig::default(),
    }
    .apply_env();

    let api_key = api_key_from_env().context("Set GOOGLE_API_KEY in the environment or a .env file")?;
    let client = GeminiClient::new(config.model.gemini_config(api_key)).context("Failed to create model client")?;

    let token = Arc::new(CancellationToken::new());
    token.on_cancel(|| warn!("Cancellation requested; stopping before the next model call completes"));
    spawn_ctrl_c_handler(Arc::clone(&token));

    let runner = PipelineRunner::new(Arc::new(client))
        .with_retry_config(config.retry.clone())
        .with_event_sink(Arc::new(LoggingEventSink::default()))
        .with_cancellation(token);

    match cli.command.unwrap_or_else(|| Command::Website(WebsiteArgs::default())) {
        Command::Website(args) => run_website(&runner, config, args).await,
        Command::Research(args) => run_research(&runner, args).await,
    }
}

async fn run_website(runner: &PipelineRunner, config: SitecrewConfig, args: WebsiteArgs) -> Result<()> {
    let crew = crews::website().context("Failed to build the website crew")?;

    let description = match args.description {
        Some(description) => description,
        None => prompt_line("Enter your website description (press Enter for the default): ")?,
    };
    let project_name = match args.project_name {
        Some(name) => name,
        None => prompt_line("Enter project name (press Enter for 'professional_website'): ")?,
    };
    let project_name = validate_project_name(&project_name)?;

    let output_dir = args.output_dir.unwrap_or(config.output_dir);
    let materializer = Materializer::new(output_dir);

    let run = runner
        .run(crew.pipeline(), &description)
        .await
        .context("Website generation did not complete")?;

    let artifacts = crew.extract_artifacts(&run);
    for label in crew.artifact_labels() {
        if !artifacts.iter().any(|a| &a.label == label) {
            warn!(label = %label, "No fenced block found for artifact");
        }
    }

    let project = materializer
        .materialize(&project_name, &artifacts, &crew.project_report(&run))
        .context("Failed to write the generated project")?;

    info!(run_id = %run.run_id(), duration_ms = run.duration_ms(), "Website crew finished");
    println!("Project written to {}", project.dir.display());
    for file in &project.files {
        println!("  {}", file.display());
    }
    Ok(())
}

async fn run_research(runner: &PipelineRunner, args: ResearchArgs) -> Result<()> {
    let crew = crews::research().context("Failed to build the research crew")?;

    let topic = match args.topic {
        Some(topic) => topic,
        None => prompt_line("Enter the topic to research (press Enter for the default): ")?,
    };

    let run = runner
        .run(crew.pipeline(), &topic)
        .await
        .context("Research did not complete")?;

    println!("{}", run.final_text());

    if let Some(path) = args.save {
        std::fs::write(&path, run.final_text())
            .with_context(|| format!("Failed to save report to {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }
    Ok(())
}

fn spawn_ctrl_c_handler(token: Arc<CancellationToken>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel("interrupted by user");
        }
    });
}

fn prompt_line(prompt: &str) -> Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}
