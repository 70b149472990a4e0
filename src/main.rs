use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use screenshotone::{Client, ClientConfig, Param, TakeOptions};

/// Generate signed ScreenshotOne URLs or take screenshots from the shell.
///
/// Credentials come from `--config <file.json>` or the
/// SCREENSHOTONE_ACCESS_KEY / SCREENSHOTONE_SECRET_KEY environment variables.
#[derive(Parser)]
#[command(name = "screenshotone", version)]
struct Cli {
    /// JSON file with access_key, secret_key and optional base_url
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the request URL
    Url {
        #[command(flatten)]
        request: RequestArgs,

        /// Print the URL without a signature
        #[arg(long)]
        unsigned: bool,
    },
    /// Take a screenshot and write the image
    Take {
        #[command(flatten)]
        request: RequestArgs,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort the request after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Page to render
    #[arg(long, conflicts_with_all = ["html", "markdown"])]
    url: Option<String>,

    /// Inline HTML to render
    #[arg(long, conflicts_with = "markdown")]
    html: Option<String>,

    /// Inline Markdown to render
    #[arg(long)]
    markdown: Option<String>,

    /// Extra parameter as name=value, repeatable (e.g. --param format=png)
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(Param, String)>,
}

impl RequestArgs {
    fn options(&self) -> Result<TakeOptions> {
        let options = match (&self.url, &self.html, &self.markdown) {
            (Some(url), _, _) => TakeOptions::url(url),
            (_, Some(html), _) => TakeOptions::html(html),
            (_, _, Some(markdown)) => TakeOptions::markdown(markdown),
            _ => bail!("one of --url, --html or --markdown is required"),
        };

        Ok(self
            .params
            .iter()
            .fold(options, |options, (param, value)| options.set(*param, value.clone())))
    }
}

fn parse_param(raw: &str) -> std::result::Result<(Param, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))?;
    let param = name.parse::<Param>().map_err(|e| e.to_string())?;
    Ok((param, value.to_string()))
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(ClientConfig::from_json(&json)?)
        }
        None => Ok(ClientConfig::from_env()?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client::from_config(load_config(cli.config.as_ref())?)?;

    match cli.command {
        Command::Url { request, unsigned } => {
            let options = request.options()?;
            let url = if unsigned {
                client.generate_unsigned_take_url(&options)?
            } else {
                client.generate_take_url(&options)?
            };
            println!("{}", url);
        }
        Command::Take {
            request,
            output,
            timeout_ms,
        } => {
            let options = request.options()?;
            let image = match timeout_ms {
                Some(ms) => client.take_with_timeout(&options, Duration::from_millis(ms)).await?,
                None => {
                    client
                        .take_with_cancel(&options, async {
                            if tokio::signal::ctrl_c().await.is_err() {
                                futures::future::pending::<()>().await;
                            }
                        })
                        .await?
                }
            };

            match output {
                Some(path) => std::fs::write(&path, &image)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => {
                    let mut out = io::stdout().lock();
                    out.write_all(&image)?;
                    out.flush()?;
                }
            }
        }
    }

    Ok(())
}
