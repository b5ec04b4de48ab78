// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::api::JwtSessionVerifier;
use crate::client::{
    ControllerSignal, GenerationController, HttpTransport, ImageFile, SessionProvider,
    StaticSession, SubmitOutcome, VideoDownloader, WorkflowState,
};
use crate::config::ClientConfig;
use crate::i18n::{self, Catalog, Locale, Translate};

/// TutorMotion command line client
#[derive(Parser, Debug)]
#[command(name = "tutormotion-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Turn a UI screenshot into a video tutorial", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a tutorial video from a screenshot
    Generate(GenerateArgs),

    /// Issue a development session token
    IssueToken(IssueTokenArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Screenshot to animate
    #[arg(long)]
    pub image: PathBuf,

    /// Interaction to animate, e.g. "click the Settings button"
    #[arg(long, default_value = "")]
    pub prompt: String,

    /// Endpoint server base URL
    #[arg(long, env = "TUTORMOTION_SERVER_URL")]
    pub server: Option<String>,

    /// Session token
    #[arg(long, env = "TUTORMOTION_TOKEN")]
    pub token: Option<String>,

    /// Message language (en, zh)
    #[arg(long, env = "TUTORMOTION_LOCALE")]
    pub locale: Option<String>,

    /// Save the finished video into this directory
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct IssueTokenArgs {
    /// User identifier to put in the token
    #[arg(long, default_value = "dev-user")]
    pub subject: String,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = 7200)]
    pub ttl_secs: u64,

    /// Secret shared with the server
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub secret: String,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate(args) => generate(args).await,
        Commands::IssueToken(args) => issue_token(args),
    }
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if let Some(locale) = args.locale.as_deref() {
        config.locale = Locale::from_tag(locale);
    }
    config.validate().map_err(|e| anyhow!(e))?;

    let session: Arc<dyn SessionProvider> = match args.token {
        Some(token) => Arc::new(StaticSession::signed_in(token)),
        None => Arc::new(StaticSession::signed_out()),
    };
    let transport = Arc::new(HttpTransport::from_str_url(&config.server_url)?);
    let timeout = config.request_timeout;
    let locale = config.locale;
    let mut controller = GenerationController::new(config, session, transport);

    let file = ImageFile::from_path(&args.image)
        .await
        .with_context(|| format!("reading {}", args.image.display()))?;
    controller
        .select_image(file, &CancellationToken::new())
        .await?;

    println!("{}", Catalog.lookup(locale, i18n::GENERATING));
    let video_url = match controller.submit(&args.prompt).await {
        SubmitOutcome::Settled {
            state: WorkflowState::Succeeded { video_url },
            ..
        } => video_url,
        SubmitOutcome::Settled {
            state: WorkflowState::Failed { message },
            signal,
        } => {
            if let Some(ControllerSignal::SessionRequired { .. }) = signal {
                eprintln!("Sign in again: pass --token or set TUTORMOTION_TOKEN");
            }
            bail!(message)
        }
        SubmitOutcome::Rejected(ControllerSignal::SessionRequired { message, .. }) => {
            bail!("{} (pass --token or set TUTORMOTION_TOKEN)", message)
        }
        SubmitOutcome::Rejected(ControllerSignal::MissingInput { message }) => bail!(message),
        other => bail!("unexpected generation outcome: {:?}", other),
    };

    println!("{}", ready_line(locale, &video_url));

    if let Some(dir) = args.download_dir {
        let downloader = VideoDownloader::new(timeout)?;
        let path = downloader.download(&video_url, &dir).await?;
        println!(
            "{} {}",
            Catalog.lookup(locale, i18n::SAVED_TO),
            path.display()
        );
    }

    Ok(())
}

/// Success line shown once the video is ready
fn ready_line(locale: Locale, video_url: &str) -> String {
    format!(
        "{}: {}",
        Catalog.lookup(locale, i18n::GENERATION_SUCCESS),
        video_url
    )
}

fn issue_token(args: IssueTokenArgs) -> Result<()> {
    let verifier = JwtSessionVerifier::new(&args.secret);
    let token = verifier.issue(&args.subject, Duration::from_secs(args.ttl_secs))?;
    println!("{}", token);
    Ok(())
}
