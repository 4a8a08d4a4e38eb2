use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use log::info;

use pagesnap::{Renderer, Result};

/// Render a JS-powered page in headless Chromium and print the resulting HTML.
#[derive(Parser)]
#[command(name = "pagesnap", version)]
#[command(about = "Renders JS-powered pages like a browser and prints the HTML", long_about = None)]
struct Cli {
    /// URL to render
    url: String,

    /// Screenshot output path; the image format is inferred from the
    /// extension (png, jpg, jpeg, webp; anything else falls back to png)
    screenshot: Option<PathBuf>,

    /// Write the rendered HTML to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Custom user-agent string
    #[arg(short = 'A', long, value_name = "STRING")]
    user_agent: Option<String>,

    /// Navigation timeout in seconds, including the network-idle wait
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Path to the Chrome/Chromium executable
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        url,
        screenshot,
        output,
        user_agent,
        timeout,
        chrome,
    } = cli;

    let mut builder = Renderer::builder().navigation_timeout(Duration::from_secs(timeout));
    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent);
    }
    if let Some(chrome) = chrome {
        builder = builder.chrome_path(chrome);
    }

    let renderer = builder.build().await?;

    let rendered = async {
        let page = renderer.new_page().await?;
        info!("navigating to {url}");
        page.goto(&url).await?;

        if let Some(ref path) = screenshot {
            let format = page.save_screenshot(path).await?;
            info!("saved {format} screenshot to {}", path.display());
        }

        page.html().await
    }
    .await;

    // Release the browser on every exit path before reporting the outcome.
    let closed = renderer.close().await;
    let html = rendered?;
    closed?;

    match output {
        Some(path) => {
            std::fs::write(&path, html.as_bytes())?;
            info!("saved HTML to {}", path.display());
        }
        None => println!("{html}"),
    }

    Ok(())
}
