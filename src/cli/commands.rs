//! CLI command implementations

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

use crate::cli::args::{Cli, ConfigCommand, RunArgs};
use crate::config::Settings;
use crate::llm::build_summarizer;
use crate::pipeline::{Segmenter, SummaryPipeline, TranscriptPreview};
use crate::transcripts::TranscriptFile;

/// Chunk and summarize every transcript in the input file
pub async fn summarize_transcripts(settings: &Settings, run: RunArgs) -> Result<()> {
    let settings = resolve_settings(settings, &run)?;
    let summarizer = build_summarizer(&settings)?;
    let file = TranscriptFile::load(&settings.general.input)?;

    tracing::info!(
        "Summarizing with {} backend, model {}, max {} tokens per chunk",
        settings.llm.backend,
        settings.llm.model(),
        settings.chunking.max_tokens
    );

    let mut pipeline = SummaryPipeline::new(&settings, summarizer)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let report = pipeline.run(&file.transcripts, &mut out).await?;

    tracing::info!(
        "Processed {} transcripts: {} chunks, {} summarized",
        report.transcripts,
        report.chunks,
        report.summarized
    );

    if !report.is_success() {
        let failed: Vec<String> = report
            .failures
            .iter()
            .map(|f| format!("transcript {} chunk {}", f.transcript, f.chunk))
            .collect();
        anyhow::bail!(
            "{} of {} chunks failed to summarize: {}",
            report.failures.len(),
            report.chunks,
            failed.join(", ")
        );
    }

    Ok(())
}

/// Print chunk boundaries without calling the completion service
pub fn preview_chunks(settings: &Settings, run: RunArgs, json: bool) -> Result<()> {
    let settings = resolve_settings(settings, &run)?;
    let file = TranscriptFile::load(&settings.general.input)?;
    let mut segmenter = Segmenter::new(settings.llm.backend, settings.chunking.max_tokens)?;

    let previews: Vec<TranscriptPreview> = file
        .transcripts
        .iter()
        .enumerate()
        .map(|(i, transcript)| segmenter.preview(i + 1, transcript))
        .collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&previews)?)?;
    } else {
        write_previews(&mut out, &previews)?;
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if !shown.llm.api_key.is_empty() {
                shown.llm.api_key = "********".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Write the completion script for `shell`.
pub fn print_completions<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

// Helper functions

/// Apply per-run CLI overrides on top of the loaded settings.
fn resolve_settings(settings: &Settings, run: &RunArgs) -> Result<Settings> {
    let mut resolved = settings.clone();

    if let Some(input) = &run.input {
        resolved.general.input = input.clone();
    }
    if let Some(backend) = run.backend {
        resolved.llm.backend = backend;
    }
    if let Some(max_tokens) = run.max_tokens {
        resolved.chunking.max_tokens = max_tokens;
    }
    if let Some(model) = &run.model {
        resolved.llm.set_model(model.clone());
    }

    resolved.validate()?;
    Ok(resolved)
}

fn write_previews<W: Write>(out: &mut W, previews: &[TranscriptPreview]) -> Result<()> {
    for preview in previews {
        writeln!(
            out,
            "== Transcript {} ({} tokens, {} chunks) ==",
            preview.transcript,
            preview.token_count,
            preview.chunks.len()
        )?;

        for chunk in &preview.chunks {
            writeln!(
                out,
                "-- Chunk {}: {} tokens, {} --",
                chunk.number,
                chunk.token_count,
                chunk.reason.as_str()
            )?;
            write!(out, "{}", chunk.text)?;
            if !chunk.text.is_empty() && !chunk.text.ends_with('\n') {
                writeln!(out)?;
            }
        }
    }

    Ok(())
}
