use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use srt_ssml::logging::{level_from_verbosity, log_info, setup_logging};
use srt_ssml::tts::DEFAULT_VOICE;
use srt_ssml::{
    GoogleAudioEncoding, GoogleCredentials, GoogleTts, GoogleTtsOptions, PipelineOptions,
    ProgressTracker, SsmlPipeline, SynthesisCore, VoiceCatalog,
};

/// Языки, которые `voices` показывает по умолчанию
const DEFAULT_VOICE_LANGUAGES: [&str; 4] = ["es-ES", "es-US", "ca-ES", "en-US"];

#[derive(Parser, Debug)]
#[command(name = "srt-ssml", version, about = "Convert subtitles into SSML and synthesize speech")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate SSML file(s) from an SRT/VTT file and an alias file
    Generate(GenerateArgs),

    /// Generate audio for every .ssml file in a directory
    Synthesize(SynthesizeArgs),

    /// List available voices, filtered by language
    Voices(VoicesArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the input subtitle file (.srt or .vtt)
    #[arg(long)]
    srt_path: PathBuf,

    /// Path to the JSON alias and configuration file
    #[arg(long)]
    alias_path: PathBuf,

    /// Path to the output SSML file
    #[arg(long)]
    output_ssml_path: PathBuf,

    /// Override the per-document size limit in bytes
    #[arg(long)]
    max_bytes: Option<usize>,
}

#[derive(Args, Debug)]
struct CredentialArgs {
    /// Google Cloud API key
    #[arg(long, env = "GOOGLE_TTS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// OAuth2 access token (e.g. from `gcloud auth print-access-token`)
    #[arg(long, env = "GOOGLE_TTS_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

impl CredentialArgs {
    fn credentials(&self) -> Result<GoogleCredentials> {
        match (&self.api_key, &self.access_token) {
            (Some(key), _) => Ok(GoogleCredentials::ApiKey(key.clone())),
            (None, Some(token)) => Ok(GoogleCredentials::AccessToken(token.clone())),
            (None, None) => bail!("Either --api-key or --access-token is required"),
        }
    }
}

#[derive(Args, Debug)]
struct SynthesizeArgs {
    /// Directory containing .ssml files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Voice name, the language code is taken from its first five characters
    #[arg(long, default_value = DEFAULT_VOICE)]
    voice: String,

    /// Audio encoding: mp3, linear16 or ogg_opus
    #[arg(long, default_value = "mp3")]
    encoding: String,

    #[command(flatten)]
    credentials: CredentialArgs,
}

#[derive(Args, Debug)]
struct VoicesArgs {
    /// Language codes to show (repeatable)
    #[arg(long = "language", num_args = 1..)]
    languages: Vec<String>,

    #[command(flatten)]
    credentials: CredentialArgs,
}

fn run_generate(args: GenerateArgs, log_level: log::LevelFilter) -> Result<()> {
    let mut pipeline = SsmlPipeline::new(PipelineOptions {
        log_level,
        ..PipelineOptions::default()
    });
    if let Some(max_bytes) = args.max_bytes {
        pipeline = pipeline.with_max_bytes(max_bytes);
    }

    let written = pipeline
        .generate(&args.srt_path, &args.alias_path, &args.output_ssml_path)
        .with_context(|| format!("Failed to generate SSML from {}", args.srt_path.display()))?;

    for path in written {
        println!("SSML generated at: {}", path.display());
    }
    Ok(())
}

async fn run_synthesize(args: SynthesizeArgs) -> Result<()> {
    let encoding = GoogleAudioEncoding::from_str(&args.encoding)?;
    let client = GoogleTts::new(
        args.credentials.credentials()?,
        GoogleTtsOptions {
            audio_encoding: encoding,
            ..GoogleTtsOptions::default()
        },
    );

    let tracker = ProgressTracker::with_callback(Box::new(|progress: f32, status: &str| {
        log_info(&format!("[{:>5.1}%] {}", progress, status));
    }));
    let core = SynthesisCore::new(tracker).with_audio_extension(encoding.file_extension());

    let written = core
        .synthesize_directory(&args.dir, &args.voice, &client)
        .await
        .with_context(|| format!("Failed to synthesize SSML files in {}", args.dir.display()))?;

    for path in written {
        println!("Audio generated at: {}", path.display());
    }
    Ok(())
}

async fn run_voices(args: VoicesArgs) -> Result<()> {
    let client = GoogleTts::with_credentials(args.credentials.credentials()?);
    let languages: Vec<String> = if args.languages.is_empty() {
        DEFAULT_VOICE_LANGUAGES.iter().map(|s| s.to_string()).collect()
    } else {
        args.languages
    };

    let voices = client.list_voices().await.context("Failed to list voices")?;

    for voice in voices.iter().filter(|v| v.supports_any(languages.as_slice())) {
        println!("Name: {}", voice.name);
        println!("Languages: {}", voice.language_codes.join(", "));
        println!("Gender: {}", voice.gender.as_str());
        println!("Sample rate: {} Hz", voice.natural_sample_rate_hertz);
        println!("{}", "-".repeat(40));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = level_from_verbosity(cli.verbose, cli.quiet);
    setup_logging(log_level);

    match cli.command {
        Commands::Generate(args) => run_generate(args, log_level),
        Commands::Synthesize(args) => run_synthesize(args).await,
        Commands::Voices(args) => run_voices(args).await,
    }
}
