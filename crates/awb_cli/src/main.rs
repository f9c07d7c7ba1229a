//! Audio Workbench CLI - command-line front end over awb_core.
//!
//! Each subcommand maps to one transformation module. Outputs land in
//! the configured output folder; batch failures are reported per file
//! and reflected in the exit code.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use awb_core::config::ConfigManager;
use awb_core::engine::{FfmpegEngine, MediaEngine};
use awb_core::logging::{init_tracing, LogLevel};
use awb_core::models::{
    AudioFormat, ConvertParams, MergeParams, OperationParams, TrimParams, VinylParams,
    VolumeParams,
};
use awb_core::modules::standard_registry;
use awb_core::presets::{stock_vinyl_presets, PresetStore};
use awb_core::registry::{validate_upload, FileDescriptor, FileRegistry};
use awb_core::session::{BatchProcessor, BatchReport};

#[derive(Parser, Debug)]
#[command(name = "awb")]
#[command(about = "Audio Workbench: trim, convert, merge, and restyle audio files")]
#[command(version)]
struct Args {
    /// Path to the settings file
    #[arg(long, default_value = "awb.toml", env = "AWB_CONFIG")]
    config: PathBuf,

    /// Log verbosity when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect an audio file
    Probe {
        /// File to inspect
        file: PathBuf,
    },

    /// List the available transformation modules
    Modules,

    /// Cut a time range out of each file
    Trim {
        /// Files to trim
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Window start in seconds
        #[arg(short, long)]
        start: f64,

        /// Window end in seconds
        #[arg(short, long)]
        end: f64,

        /// Output format (defaults to the input format)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<AudioFormat>,
    },

    /// Re-encode each file to another format
    Convert {
        /// Files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Target format (wav, mp3, flac, ogg, m4a, aac)
        #[arg(short, long, value_parser = parse_format)]
        format: AudioFormat,

        /// Target bitrate, e.g. 320k (lossy formats only)
        #[arg(short, long)]
        bitrate: Option<String>,

        /// Output sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Output channel count
        #[arg(long)]
        channels: Option<u8>,
    },

    /// Concatenate the given files, in order, into one file
    Merge {
        /// Files to merge (at least two)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_parser = parse_format, default_value = "mp3")]
        format: AudioFormat,
    },

    /// Adjust volume, with optional loudness normalization
    Volume {
        /// Files to adjust
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Linear gain multiplier (0.1 to 10.0)
        #[arg(short, long, default_value_t = 1.0)]
        level: f64,

        /// Apply EBU R128 loudness normalization first
        #[arg(short, long)]
        normalize: bool,
    },

    /// Apply the vintage playback effect
    Vinyl {
        /// Files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Named preset to use (see `awb preset list`)
        #[arg(short, long)]
        preset: Option<String>,
    },

    /// Manage vinyl effect presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
}

#[derive(Subcommand, Debug)]
enum PresetAction {
    /// List preset names
    List,

    /// Show a preset's parameters as JSON
    Show { name: String },

    /// Save a preset from parameter flags
    Save {
        name: String,

        /// Highpass cutoff in Hz (50 to 1000)
        #[arg(long, default_value_t = VinylParams::default().highpass_freq)]
        highpass_freq: u32,

        /// Lowpass cutoff in Hz (3000 to 20000)
        #[arg(long, default_value_t = VinylParams::default().lowpass_freq)]
        lowpass_freq: u32,

        /// Echo input gain (0.1 to 2.0)
        #[arg(long, default_value_t = VinylParams::default().echo_gain)]
        echo_gain: f64,

        /// Echo delay in milliseconds (1 to 500)
        #[arg(long, default_value_t = VinylParams::default().echo_delay)]
        echo_delay: u32,

        /// Tremolo frequency in Hz (0.1 to 20.0)
        #[arg(long, default_value_t = VinylParams::default().tremolo_freq)]
        tremolo_freq: f64,

        /// Tremolo depth (0.0 to 1.0)
        #[arg(long, default_value_t = VinylParams::default().tremolo_depth)]
        tremolo_depth: f64,

        /// Bass gain at 100 Hz in dB (-12 to 12)
        #[arg(long, default_value_t = VinylParams::default().eq_low)]
        eq_low: f64,

        /// Treble gain at 3 kHz in dB (-12 to 12)
        #[arg(long, default_value_t = VinylParams::default().eq_high)]
        eq_high: f64,

        /// Output gain multiplier (0.1 to 10.0)
        #[arg(long, default_value_t = VinylParams::default().volume)]
        volume: f64,
    },

    /// Delete a preset
    Delete { name: String },
}

fn parse_format(s: &str) -> Result<AudioFormat, String> {
    AudioFormat::from_extension(s)
        .ok_or_else(|| format!("unknown format '{s}' (expected wav, mp3, flac, ogg, m4a, or aac)"))
}

fn parse_log_level(s: &str) -> LogLevel {
    match s {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "warn" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigManager::new(&args.config);
    config
        .load_or_create()
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;
    config
        .ensure_dirs_exist()
        .context("failed to create configured directories")?;

    let logs_folder = PathBuf::from(&config.settings().paths.logs_folder);
    let _log_guard = init_tracing(parse_log_level(&args.log_level), Some(&logs_folder));

    match args.command {
        Command::Probe { file } => probe(&file),
        Command::Modules => {
            for descriptor in standard_registry().list() {
                println!(
                    "{} {:<10} {}",
                    descriptor.icon, descriptor.key, descriptor.description
                );
            }
            Ok(())
        }
        Command::Trim {
            files,
            start,
            end,
            format,
        } => run_module(
            &config,
            "trim",
            "trimmed_",
            files,
            OperationParams::Trim(TrimParams {
                start_time: start,
                end_time: end,
                format,
            }),
        ),
        Command::Convert {
            files,
            format,
            bitrate,
            sample_rate,
            channels,
        } => run_module(
            &config,
            "convert",
            "converted_",
            files,
            OperationParams::Convert(ConvertParams {
                format,
                bitrate,
                sample_rate,
                channels,
            }),
        ),
        Command::Merge { files, format } => run_module(
            &config,
            "merge",
            "merged_",
            files,
            OperationParams::Merge(MergeParams { format }),
        ),
        Command::Volume {
            files,
            level,
            normalize,
        } => run_module(
            &config,
            "volume",
            "volume_",
            files,
            OperationParams::Volume(VolumeParams { level, normalize }),
        ),
        Command::Vinyl { files, preset } => {
            let params = match preset {
                Some(name) => vinyl_store(&config).get(&name)?,
                None => VinylParams::default(),
            };
            run_module(
                &config,
                "vinyl",
                "vinyl_",
                files,
                OperationParams::Vinyl(params),
            )
        }
        Command::Preset { action } => manage_presets(&config, action),
    }
}

fn probe(file: &Path) -> Result<()> {
    let engine = FfmpegEngine::new();
    let info = engine
        .probe(file)
        .with_context(|| format!("failed to probe {}", file.display()))?;

    println!("File:        {}", file.display());
    println!("Duration:    {}", info.duration_display());
    println!("Codec:       {}", info.codec);
    println!("Container:   {}", info.container);
    println!("Sample rate: {} Hz", info.sample_rate);
    println!("Channels:    {}", info.channels);
    if info.bit_rate > 0 {
        println!("Bit rate:    {} kb/s", info.bit_rate / 1000);
    }
    println!("Size:        {} bytes", info.size_bytes);
    Ok(())
}

fn run_module(
    config: &ConfigManager,
    module_key: &str,
    output_prefix: &str,
    files: Vec<PathBuf>,
    params: OperationParams,
) -> Result<()> {
    let settings = config.settings();

    let mut inputs = Vec::with_capacity(files.len());
    for file in &files {
        let size = fs::metadata(file)
            .with_context(|| format!("cannot read {}", file.display()))?
            .len();
        validate_upload(file, size, &settings.limits)
            .with_context(|| format!("rejected input {}", file.display()))?;
        inputs.push(FileDescriptor::from_path(file));
    }

    let registry = standard_registry();
    let (_, planner) = registry.resolve(module_key)?;

    let engine = FfmpegEngine::new();
    let processor = BatchProcessor::new(&engine, settings);
    let mut session_files = FileRegistry::new();

    let total = inputs.len();
    let mut progress = move |index: usize, _total: usize, path: &Path| {
        tracing::info!("Processing {}/{}: {}", index + 1, total, path.display());
    };
    let report = processor.run(
        planner,
        output_prefix,
        &inputs,
        &params,
        &mut session_files,
        Some(&mut progress),
    );

    print_report(&report);
    if !report.all_succeeded() {
        bail!("{} of {} item(s) failed", report.failed(), report.items.len());
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    for item in &report.items {
        if item.success {
            let output = item
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("ok   {} -> {}", item.input.display(), output);
        } else {
            let error = item.error.as_deref().unwrap_or("unknown error");
            println!("FAIL {}: {}", item.input.display(), error);
        }
    }
}

fn vinyl_store(config: &ConfigManager) -> PresetStore<VinylParams> {
    PresetStore::load_or_default(config.preset_file("vinyl"), stock_vinyl_presets())
}

fn manage_presets(config: &ConfigManager, action: PresetAction) -> Result<()> {
    let mut store = vinyl_store(config);
    match action {
        PresetAction::List => {
            for name in store.names() {
                println!("{name}");
            }
            Ok(())
        }
        PresetAction::Show { name } => {
            let params = store.get(&name)?;
            println!("{}", serde_json::to_string_pretty(&params)?);
            Ok(())
        }
        PresetAction::Save {
            name,
            highpass_freq,
            lowpass_freq,
            echo_gain,
            echo_delay,
            tremolo_freq,
            tremolo_depth,
            eq_low,
            eq_high,
            volume,
        } => {
            let params = VinylParams {
                highpass_freq,
                lowpass_freq,
                echo_gain,
                echo_delay,
                tremolo_freq,
                tremolo_depth,
                eq_low,
                eq_high,
                volume,
            };
            params.validate()?;
            store.save(name.clone(), params)?;
            println!("saved preset '{name}'");
            Ok(())
        }
        PresetAction::Delete { name } => {
            store.delete(&name)?;
            println!("deleted preset '{name}'");
            Ok(())
        }
    }
}
