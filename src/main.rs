mod cli;

use videotools::config;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use vt_av::{FfprobeProber, MediaTools, OperationResult, SystemExecutor, ToolRegistry, WatermarkOptions};
use vt_core::{AudioFormat, Position};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "videotools=debug,vt_av=trace,vt_core=debug".to_string()
        } else {
            "videotools=info,vt_av=info,vt_core=info".to_string()
        }
    });

    // Logs go to stderr so --json output stays machine readable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<vt_core::Error>()
                .map_or(1, vt_core::Error::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Dispatch a subcommand. `Ok(false)` means the operation ran but failed.
fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config.as_deref();
    let json = cli.json;

    match cli.command {
        Commands::Trim {
            input,
            output,
            start,
            duration,
        } => {
            let tools = media_tools(config_path)?;
            report(&tools.trim(&input, &output, &start, &duration), json)
        }
        Commands::Thumbnail {
            input,
            output,
            time,
        } => {
            let tools = media_tools(config_path)?;
            let path = tools.thumbnail(&input, &output, Some(time.as_str()));
            thumbnail_report(&path, json)
        }
        Commands::ExtractAudio {
            input,
            output,
            format,
        } => {
            let tools = media_tools(config_path)?;
            let format = AudioFormat::from_name(&format);
            report(&tools.extract_audio(&input, &output, format), json)
        }
        Commands::Merge { output, inputs } => {
            let tools = media_tools(config_path)?;
            let result = tools.merge(&inputs, &output)?;
            report(&result, json)
        }
        Commands::Watermark {
            input,
            output,
            watermark,
            position,
            x,
            y,
            width,
            height,
            opacity,
        } => {
            let tools = media_tools(config_path)?;
            let options = WatermarkOptions {
                position: position.as_deref().and_then(parse_position),
                x,
                y,
                width,
                height,
                opacity,
            };
            report(&tools.add_watermark(&input, &output, &watermark, &options), json)
        }
        Commands::Resize {
            input,
            output,
            width,
            height,
            no_keep_aspect,
        } => {
            let tools = media_tools(config_path)?;
            report(&tools.resize(&input, &output, width, height, !no_keep_aspect), json)
        }
        Commands::Probe { file } => probe_file(&file, config_path, json),
        Commands::CheckTools => check_tools(config_path, json),
        Commands::Validate {
            config: validate_path,
        } => {
            let path = validate_path.or_else(|| config_path.map(Path::to_path_buf));
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("videotools {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    }
}

fn media_tools(config_path: Option<&Path>) -> Result<MediaTools> {
    let config = config::load_config_or_default(config_path)?;
    let registry = ToolRegistry::discover(&config.tools);
    let tools = MediaTools::from_config(&config, &registry)?;
    tracing::debug!(?tools, "media tools ready");
    Ok(tools)
}

fn parse_position(name: &str) -> Option<Position> {
    let position = Position::from_name(name);
    if position.is_none() {
        tracing::warn!("unknown position {name:?}; using the x/y offsets");
    }
    position
}

fn report(result: &OperationResult, json: bool) -> Result<bool> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.success {
        println!("✓ {}: {}", result.operation, result.output.display());
    } else {
        println!("✗ {} failed", result.operation);
        if let Some(code) = result.exit_code {
            println!("  exit code: {code}");
        }
        if let Some(ref diagnostics) = result.diagnostics {
            for line in diagnostics.lines().rev().take(10).collect::<Vec<_>>().into_iter().rev() {
                println!("  {line}");
            }
        }
    }
    Ok(result.success)
}

fn thumbnail_report(path: &Path, json: bool) -> Result<bool> {
    let exists = path.exists();
    if json {
        let value = serde_json::json!({
            "operation": "thumbnail",
            "success": exists,
            "output": path,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if exists {
        println!("✓ thumbnail: {}", path.display());
    } else {
        println!("✗ thumbnail not written: {}", path.display());
    }
    Ok(exists)
}

fn probe_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<bool> {
    let config = config::load_config_or_default(config_path)?;
    let registry = ToolRegistry::discover(&config.tools);
    let ffprobe = registry.require("ffprobe")?;
    let prober = FfprobeProber::new(Arc::new(SystemExecutor::new()), ffprobe.path.clone());

    let info = prober.probe(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(true);
    }

    println!("File: {}", info.file_path.display());
    if let Some(ref container) = info.container {
        println!("Container: {container}");
    }
    if let Some(duration) = info.duration {
        let secs = duration as u64;
        println!(
            "Duration: {:02}:{:02}:{:02} ({duration:.3}s)",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60
        );
    }
    match (&info.video_codec, info.width, info.height) {
        (Some(codec), Some(w), Some(h)) => println!("Video: {codec} {w}x{h}"),
        (Some(codec), _, _) => println!("Video: {codec}"),
        _ => println!("Video: none"),
    }
    println!("Audio: {}", info.audio_codec.as_deref().unwrap_or("none"));

    Ok(true)
}

fn check_tools(config_path: Option<&Path>, json: bool) -> Result<bool> {
    let config = config::load_config_or_default(config_path)?;
    let tools = ToolRegistry::discover(&config.tools).check_all();
    let all_ok = tools.iter().all(|t| t.available);

    if json {
        println!("{}", serde_json::to_string_pretty(&tools)?);
        return Ok(true);
    }

    println!("Checking external tools...\n");
    for tool in &tools {
        let status = if tool.available { "✓" } else { "✗" };
        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    Ok(true)
}

fn validate_config(path: Option<&Path>) -> Result<bool> {
    let (config, source) = match path {
        Some(p) => (config::load_config(p)?, Some(p.to_path_buf())),
        None => match config::find_default_config() {
            Some(found) => (config::load_config(&found)?, Some(found)),
            None => (config::Config::default(), None),
        },
    };

    match source {
        Some(ref p) => println!("Validating config: {}", p.display()),
        None => println!("No config file found, using defaults"),
    }

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ Configuration is valid");
    } else {
        println!("Configuration loaded with {} warning(s):", warnings.len());
        for warning in &warnings {
            println!("  - {warning}");
        }
    }

    let effective = toml::to_string_pretty(&config).context("Failed to render config")?;
    println!("\nEffective configuration:\n{effective}");
    println!("Temp root: {}", config.workspace.temp_root().display());

    Ok(true)
}
