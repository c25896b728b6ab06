use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use chatterbox::api::{ApiServer, ApiState};
use chatterbox::session::GREETING;
use chatterbox::{Config, GeminiClient, LlmClient, Session, TurnProcessor, voice};

/// Chatterbox - text and voice chatbot
#[derive(Parser)]
#[command(name = "chatterbox", version, about)]
struct Cli {
    /// Address to bind the web UI to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice output (for machines without audio)
    #[arg(long, env = "CHATTERBOX_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web chat UI (default)
    Serve,
    /// Chat in the terminal
    Chat {
        /// Speak replies aloud
        #[arg(long)]
        speak: bool,
    },
    /// List voices offered by the speech engine
    Voices,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,chatterbox=info",
        1 => "info,chatterbox=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.disable_voice);
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Chat { speak } => chat(config, speak).await,
        Command::Voices => list_voices(&config).await,
        Command::TestTts { text } => test_tts(&config, &text).await,
    }
}

/// Wire the LLM client and speech engine into a turn processor
fn build_processor(config: &Config) -> anyhow::Result<TurnProcessor> {
    let llm = GeminiClient::from_config(&config.llm)?
        .map(|client| Arc::new(client) as Arc<dyn LlmClient>);
    let speech = voice::engine_from_config(&config.voice);

    Ok(TurnProcessor::new(llm, speech).chat_config(&config.chat))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        voice = config.voice.enabled,
        "starting chatterbox"
    );

    let processor = build_processor(&config)?;
    ApiServer::new(ApiState::new(processor, config)).run().await?;
    Ok(())
}

/// Terminal chat loop
///
/// An empty line reveals the rest of a trimmed reply; `:quit` exits.
async fn chat(config: Config, speak: bool) -> anyhow::Result<()> {
    let processor = build_processor(&config)?;
    let mut session = Session::configured(&config);
    if speak {
        session.set_voice_enabled(true);
    }

    println!("{GREETING}");
    if !processor.llm_available() {
        println!("(degraded mode: no GEMINI_API_KEY configured)");
    }
    println!("Type :quit to exit.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input == ":quit" {
            break;
        }

        let reply = if input.is_empty() {
            processor.continue_reading(&mut session).await
        } else {
            processor.process(&mut session, input).await
        };
        let Some(reply) = reply else {
            continue;
        };

        println!("bot> {}", reply.text);
        if reply.has_more {
            println!("     (press Enter to continue reading)");
        }
        if !reply.suggestions.is_empty() {
            println!("     try: {}", reply.suggestions.join(" | "));
        }
        println!();
    }

    tracing::debug!(session_id = %session.id(), turns = session.turns().len(), "chat ended");
    Ok(())
}

async fn list_voices(config: &Config) -> anyhow::Result<()> {
    let engine = voice::engine_from_config(&config.voice);
    if !engine.is_available() {
        anyhow::bail!("no speech engine available (install espeak-ng or set CHATTERBOX_TTS_ENGINE)");
    }

    let voices = engine.voices().await?;
    for v in &voices {
        match &v.gender {
            Some(gender) => println!("{:<16} {} ({gender})", v.id, v.name),
            None => println!("{:<16} {}", v.id, v.name),
        }
    }
    println!("\n{} voices via {}", voices.len(), engine.name());
    Ok(())
}

/// Speak a line with the configured default settings
async fn test_tts(config: &Config, text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let engine = voice::engine_from_config(&config.voice);
    if !engine.is_available() {
        anyhow::bail!("no speech engine available (install espeak-ng or set CHATTERBOX_TTS_ENGINE)");
    }

    let settings = &config.voice.defaults;
    println!(
        "Engine: {}, rate {}, volume {:.2}, voice {}",
        engine.name(),
        settings.rate,
        settings.volume,
        settings.voice_id.as_deref().unwrap_or("default")
    );
    engine.speak(text, settings).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");
    Ok(())
}
