//! Genta binary entry point

use std::io::{self, Write};

use color_eyre::Result;
use futures::StreamExt;
use genta_rs::{
    cli::Cli,
    services::{self, GenerationRequest},
    Message,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;

    // Pick up GENTA_API_KEY from a local .env file, when present
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("genta_rs=debug")
            .init();
    }

    let endpoint = services::endpoint_from_config(cli.endpoint_config()?)?;

    let request = GenerationRequest {
        messages: vec![Message::user(&cli.prompt)],
        preprompt: cli.preprompt.clone(),
        settings: cli.generation_settings(),
    };

    let mut stream = endpoint.stream_generate(request).await?;

    if cli.collect {
        let text = services::collect_text(stream).await?;
        println!("{text}");
    } else {
        let mut stdout = io::stdout();
        while let Some(event) = stream.next().await {
            let event = event?;
            if event.is_terminal() {
                break;
            }
            print!("{}", event.token.text);
            stdout.flush()?;
        }
        println!();
    }

    Ok(())
}
