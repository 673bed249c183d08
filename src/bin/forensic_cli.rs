use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use audio_forensics::error::log_analysis_error;
use audio_forensics::{AnalysisConfig, AnalysisError, Analyzer, Waveform};
use clap::Parser;
use hound::SampleFormat;

#[derive(Parser, Debug)]
#[command(
    name = "forensic_cli",
    about = "Offline forensic analysis of WAV recordings"
)]
struct Cli {
    /// WAV file to analyze
    input: PathBuf,
    /// Produce the live comprehensive report (extended classifier,
    /// visualization payloads)
    #[arg(long)]
    live: bool,
    /// Override analysis parameters from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load_from_file(path),
        None if cli.live => AnalysisConfig::live(),
        None => AnalysisConfig::standard(),
    };

    let waveform = decode_wav(&cli.input)
        .with_context(|| format!("decoding {}", cli.input.display()))?;

    let report = Analyzer::new(config).analyze(&waveform).map_err(|err| {
        log_analysis_error(&err, "forensic_cli");
        err
    })?;

    let json = serde_json::to_string_pretty(&report)?;
    if let Some(path) = cli.output {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("[CLI] Report written to {}", path.display());
    } else {
        println!("{json}");
    }

    Ok(ExitCode::from(0))
}

/// Decode a WAV file into a mono waveform
///
/// Integer samples are scaled to [-1.0, 1.0); multi-channel audio is
/// downmixed by averaging across channels.
fn decode_wav(path: &PathBuf) -> Result<Waveform, AnalysisError> {
    let reader = hound::WavReader::open(path).map_err(|err| AnalysisError::DecodeFailed {
        reason: err.to_string(),
    })?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|err| AnalysisError::DecodeFailed {
                reason: err.to_string(),
            })?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|err| AnalysisError::DecodeFailed {
                    reason: err.to_string(),
                })?
        }
    };

    let mono = downmix(&samples, spec.channels as usize);
    log::info!(
        "[CLI] Decoded {}: {} Hz, {} channels, {} samples",
        path.display(),
        spec.sample_rate,
        spec.channels,
        mono.len()
    );

    Ok(Waveform::new(mono, spec.sample_rate))
}

/// Average interleaved channels into a mono signal
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
