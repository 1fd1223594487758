//! `keychain`: drive the sketch-to-keychain wizard from a terminal.
//!
//! SYSTEM CONTEXT
//! ==============
//! The same `wizard::Controller` the tests exercise runs here over a
//! `reqwest` backend. `flatten` needs no backend at all: it replays a stroke
//! document with the annotation editor's raster surface.

mod backend;
mod flatten;


use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use canvas::doc::AnnotationDoc;
use tracing_subscriber::EnvFilter;
use wizard::config::{DEFAULT_API_PREFIX, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ORIGIN, DEFAULT_REQUEST_TIMEOUT_SECS};
use wizard::{ApiError, Backend, BackendConfig, ConfigError, Controller, ImageFile, Timeouts, WizardError};

use crate::backend::ReqwestBackend;
use crate::flatten::{FlattenError, flatten};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Flatten(#[from] FlattenError),
    #[error("invalid stroke document: {0}")]
    Strokes(#[from] serde_json::Error),
    #[error("{path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("backend unreachable: HTTP {0}")]
    Unhealthy(u16),
    #[error("no silhouette to annotate")]
    NoSilhouette,
}

#[derive(Parser, Debug)]
#[command(name = "keychain", about = "Turn a sketch into a 3D-printable keychain")]
struct Cli {
    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct BackendArgs {
    #[arg(long, global = true, env = "KEYCHAIN_BACKEND_ORIGIN", default_value = DEFAULT_ORIGIN)]
    origin: String,

    #[arg(long, global = true, env = "KEYCHAIN_API_PREFIX", default_value = DEFAULT_API_PREFIX)]
    api_prefix: String,

    #[arg(long, global = true, env = "KEYCHAIN_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    #[arg(long, global = true, env = "KEYCHAIN_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,
}

impl BackendArgs {
    fn config(&self) -> Result<BackendConfig, ConfigError> {
        Ok(BackendConfig::new(&self.origin)?
            .with_api_prefix(&self.api_prefix)?
            .with_timeouts(Timeouts {
                request_secs: self.request_timeout_secs,
                connect_secs: self.connect_timeout_secs,
            }))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend answers.
    Ping,
    /// Upload, refine, generate, and download in one go.
    Run(RunArgs),
    /// Burn a stroke document into an image without a backend.
    Flatten(FlattenArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Sketch to upload (jpg, jpeg, png, webp).
    image: PathBuf,

    /// Text edit applied to the silhouette; repeat for several rounds.
    #[arg(long = "edit", value_name = "PROMPT")]
    edits: Vec<String>,

    /// Stroke document to draw over the silhouette as a canvas edit.
    #[arg(long, value_name = "STROKES.json")]
    annotate: Option<PathBuf>,

    /// Description sent with the canvas edit.
    #[arg(long, requires = "annotate")]
    note: Option<String>,

    /// Prompt forwarded with 3D generation.
    #[arg(long = "prompt-3d")]
    prompt_3d: Option<String>,

    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FlattenArgs {
    image: PathBuf,

    #[arg(long, value_name = "STROKES.json")]
    strokes: PathBuf,

    #[arg(long)]
    note: Option<String>,

    #[arg(long)]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Ping => run_ping(cli.backend.config()?).await,
        Command::Run(args) => run_wizard(cli.backend.config()?, args).await,
        Command::Flatten(args) => run_flatten(args).await,
    }
}

async fn run_ping(config: BackendConfig) -> Result<(), CliError> {
    let backend = ReqwestBackend::new(config)?;
    let status = backend.ping().await?;
    if !(200..300).contains(&status) {
        return Err(CliError::Unhealthy(status));
    }
    println!("ok");
    Ok(())
}

async fn run_wizard(config: BackendConfig, args: RunArgs) -> Result<(), CliError> {
    let bytes = read(&args.image).await?;
    let image = ImageFile::from_name(file_name(&args.image), bytes)?;
    let mut controller = Controller::new(ReqwestBackend::new(config.clone())?);

    controller
        .submit_upload(image, Some(args.image.display().to_string()))
        .await?;
    if let Some(session) = controller.state().session() {
        tracing::info!(%session, "silhouette generated");
    }

    for prompt in &args.edits {
        controller.submit_text_edit(prompt).await?;
        tracing::info!(version = controller.state().edit_version(), "text edit applied");
    }

    if let Some(strokes) = &args.annotate {
        let doc = AnnotationDoc::from_json(&read_to_string(strokes).await?)?;
        let current = controller
            .state()
            .images()
            .current_2d
            .clone()
            .ok_or(CliError::NoSilhouette)?;
        let background = controller.backend().fetch_resource(&current).await?;
        let export = flatten(&background, &current, &doc, args.note.as_deref().unwrap_or_default())?;
        controller.submit_canvas_edit(export.image, &export.description).await?;
        tracing::info!(version = controller.state().edit_version(), "canvas edit applied");
    }

    if let Some(prompt) = &args.prompt_3d {
        controller.set_edit_prompt(prompt.as_str());
    }
    controller.submit_generate_3d().await?;

    let Some(target) = controller.download_target(&config) else {
        println!("3D generation finished without a model file");
        return Ok(());
    };
    let model = controller.backend().fetch_resource(&target.url).await?;
    let model_path = args.out.join(&target.filename);
    write(&model_path, &model).await?;
    println!("{}", model_path.display());

    if let Some(preview) = controller.state().result().preview.clone() {
        let bytes = controller.backend().fetch_resource(&preview).await?;
        let preview_path = args.out.join(preview_filename(&target.filename, &preview));
        write(&preview_path, &bytes).await?;
        println!("{}", preview_path.display());
    }
    Ok(())
}

async fn run_flatten(args: FlattenArgs) -> Result<(), CliError> {
    let background = read(&args.image).await?;
    let doc = AnnotationDoc::from_json(&read_to_string(&args.strokes).await?)?;
    let export = flatten(&background, &file_name(&args.image), &doc, args.note.as_deref().unwrap_or_default())?;
    write(&args.out, &export.image).await?;
    println!("{}", args.out.display());
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

/// Preview saved next to the model: `keychain_abc123.png` for a PNG preview.
fn preview_filename(model_filename: &str, preview_path: &str) -> String {
    let stem = model_filename.strip_suffix(".stl").unwrap_or(model_filename);
    let ext = preview_path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map_or("png", |(_, ext)| ext);
    format!("{stem}.{ext}")
}

async fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| CliError::Io { path: path.to_owned(), source })
}

async fn read_to_string(path: &Path) -> Result<String, CliError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io { path: path.to_owned(), source })
}

async fn write(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| CliError::Io { path: path.to_owned(), source })
}
