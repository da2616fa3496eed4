use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chatmark::{Assistant, Config, GeminiClient, InlineImage, blocks_to_html, mask_api_key, parse};

#[derive(Parser)]
#[command(name = "chatmark")]
#[command(about = "Render chat markdown and ask a vision model for part equivalents")]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "chatmark.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown file
    Render {
        /// Input markdown file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },
    /// Send a message, optionally with an image, and render the reply
    Ask {
        /// Message text; the configured default prompt is used when empty
        #[arg(default_value = "")]
        message: String,

        /// Image to send inline with the message
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the reply text without rendering it
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, config_error) = Config::load(&cli.config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = config_error {
        warn!(error = %e, "using default config");
    }

    match cli.command {
        Command::Render {
            input,
            output,
            format,
        } => {
            let markdown = fs::read_to_string(&input)
                .with_context(|| format!("Error reading {}", input.display()))?;
            let blocks = parse(&markdown);

            let rendered = match format {
                Format::Html => blocks_to_html(&blocks, &config.render),
                Format::Json => serde_json::to_string_pretty(&blocks)? + "\n",
            };
            write_output(output.as_deref(), &rendered)
        }
        Command::Ask {
            message,
            image,
            output,
            raw,
        } => {
            let api_key = config.service.api_key_from_env();
            info!("starting with API key {}", mask_api_key(api_key.as_deref()));
            let Some(api_key) = api_key else {
                bail!(
                    "No API key found; set the {} environment variable",
                    config.service.api_key_env
                );
            };

            let image = image
                .map(|path| {
                    InlineImage::from_path(&path)
                        .with_context(|| format!("Error reading {}", path.display()))
                })
                .transpose()?;

            let client = GeminiClient::new(config.service.clone(), api_key)?;
            info!(model = client.model(), "completion client ready");
            let assistant = Assistant::new(client, &config.service);

            let reply = assistant.reply(&message, image).await;
            let rendered = if raw {
                reply + "\n"
            } else {
                blocks_to_html(&parse(&reply), &config.render)
            };
            write_output(output.as_deref(), &rendered)
        }
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Error writing {}", path.display()))?;
            println!("Created {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
