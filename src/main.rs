use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use galaxy_field::{save_preview, viewer, FieldManager, HeadlessScene, PreviewOptions, ViewerConfig};

const USAGE: &str = "Usage: galaxy-field [config.json] [--preview <out.png>]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    preview: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--preview" => {
                let path = args.next().ok_or("--preview needs an output path")?;
                parsed.preview = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            _ if parsed.config.is_none() => parsed.config = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument {}", arg)),
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> ViewerConfig {
    let Some(path) = path else {
        return ViewerConfig::default();
    };
    match ViewerConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load config from {:?}: {}. Using defaults.", path, e);
            ViewerConfig::default()
        }
    }
}

fn write_preview(config: &ViewerConfig, out: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut manager = match config.seed {
        Some(seed) => FieldManager::with_seed(seed),
        None => FieldManager::new(),
    };
    let mut scene = HeadlessScene::new();
    manager.regenerate(&config.params, &mut scene)?;

    let options = PreviewOptions {
        background: config.window.background,
        ..PreviewOptions::sized(config.preview.width, config.preview.height)
    };
    if let Some(field) = manager.live_field() {
        save_preview(field, out, &options)?;
    }
    manager.clear(&mut scene);
    Ok(())
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    let config = load_config(args.config.as_ref());

    let result = match &args.preview {
        Some(out) => write_preview(&config, out),
        None => viewer::run(config).map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
