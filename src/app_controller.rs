use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::captions::{CaptionCompiler, StyledSubtitleDocument};
use crate::file_utils::{FileManager, CAPTIONS_EXTENSION, TRANSCRIPT_EXTENSION};
use crate::script_aligner::{AlignmentReport, ReferenceScript, ScriptAligner};
use crate::subtitle_processor::TranscriptDocument;
use crate::validation::TimecodeValidator;

// @module: Application controller for caption synthesis

/// Everything one pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Transcript after alignment (the parsed input when no script was given)
    pub aligned: TranscriptDocument,
    /// Alignment counts, when a script was given
    pub report: Option<AlignmentReport>,
    /// Styled captions
    pub captions: StyledSubtitleDocument,
}

/// Main application controller: parse, align, compile, write
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Compiler built from the configuration
    compiler: CaptionCompiler,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let compiler = CaptionCompiler::new(config.captions.chunk_size, config.style.clone())?
            .with_uppercase(config.captions.uppercase);

        Ok(Self { config, compiler })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse a transcript with the configured timing policy
    pub fn parse_transcript(&self, content: &str) -> Result<TranscriptDocument> {
        let document = TranscriptDocument::parse_with_policy(content, self.config.timing_policy)?;

        if self.config.validate_output {
            let result = TimecodeValidator::new().validate_blocks(document.blocks());
            result.log_findings("Transcript block");
        }

        Ok(document)
    }

    /// Split a reference script with the configured delimiter
    pub fn parse_script(&self, content: &str) -> ReferenceScript {
        ReferenceScript::parse_with_delimiter(content, &self.config.sentence_delimiter)
    }

    /// Run the in-memory pipeline. Without a script the transcript is compiled as is.
    pub fn process(&self, transcript: &str, script: Option<&str>) -> Result<PipelineOutput> {
        let parsed = self.parse_transcript(transcript)?;

        let (aligned, report) = match script {
            Some(script) => {
                let script = self.parse_script(script);
                let alignment = ScriptAligner::new(&script).align(&parsed);
                (alignment.document, Some(alignment.report))
            }
            None => (parsed, None),
        };

        let windows = self.compiler.chunk_windows(&aligned);
        if self.config.validate_output {
            let result = TimecodeValidator::new().validate_windows(&windows);
            result.log_findings("Caption window");
        }
        let captions = self.compiler.compile_windows(&windows);

        Ok(PipelineOutput {
            aligned,
            report,
            captions,
        })
    }

    /// Transcript + optional script files to a styled caption file.
    /// Returns false when an existing output was left in place.
    pub fn run(&self, transcript_path: &Path, script_path: Option<&Path>, output_path: &Path, force_overwrite: bool) -> Result<bool> {
        let start_time = std::time::Instant::now();

        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
            return Ok(false);
        }

        let transcript = FileManager::read_to_string(transcript_path)?;
        let script = match script_path {
            Some(path) => Some(FileManager::read_to_string(path)?),
            None => None,
        };

        let output = self.process(&transcript, script.as_deref())
            .with_context(|| format!("Failed to process transcript: {}", transcript_path.display()))?;

        if output.captions.is_empty() {
            warn!("No captions produced from {:?}", transcript_path);
        }

        FileManager::write_to_file(output_path, &output.captions.to_ass_string())?;

        if self.config.write_aligned_srt && output.report.is_some() {
            let output_dir = output_path.parent().unwrap_or(Path::new("."));
            let aligned_path = FileManager::generate_output_path(output_path, output_dir, Some("aligned"), TRANSCRIPT_EXTENSION);
            FileManager::write_to_file(&aligned_path, &output.aligned.to_srt_string())?;
            debug!("Wrote aligned transcript to {:?}", aligned_path);
        }

        info!(
            "Wrote {} captions to {:?} in {:.2?}",
            output.captions.len(),
            output_path,
            start_time.elapsed()
        );
        Ok(true)
    }

    /// Transcript + script files to an aligned transcript file
    pub fn align_file(&self, transcript_path: &Path, script_path: &Path, output_path: &Path, force_overwrite: bool) -> Result<AlignmentReport> {
        if output_path.exists() && !force_overwrite {
            return Err(anyhow!("Output file already exists: {:?}. Use -f to force overwrite.", output_path));
        }

        let transcript = FileManager::read_to_string(transcript_path)?;
        let script = FileManager::read_to_string(script_path)?;

        let document = self.parse_transcript(&transcript)?;
        let script = self.parse_script(&script);
        let alignment = ScriptAligner::new(&script).align(&document);

        FileManager::write_to_file(output_path, &alignment.document.to_srt_string())?;
        info!("Wrote aligned transcript to {:?}", output_path);

        Ok(alignment.report)
    }

    /// Process every transcript in a directory that has a sibling `<stem>.txt` script.
    /// Returns the number of caption files written.
    pub fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<usize> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let transcripts = FileManager::find_files(input_dir, TRANSCRIPT_EXTENSION)?;
        let jobs: Vec<(PathBuf, PathBuf)> = transcripts
            .into_iter()
            .filter(|path| !Self::is_aligned_output(path))
            .filter_map(|path| {
                let script = FileManager::script_path_for(&path);
                if FileManager::file_exists(&script) {
                    Some((path, script))
                } else {
                    debug!("No reference script for {:?}, skipping", path);
                    None
                }
            })
            .collect();

        if jobs.is_empty() {
            warn!("No transcript/script pairs found in {:?}", input_dir);
            return Ok(0);
        }

        let progress = ProgressBar::new(jobs.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut processed = 0;
        for (transcript, script) in &jobs {
            let name = transcript.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            progress.set_message(name);

            let output_dir = transcript.parent().unwrap_or(Path::new("."));
            let output_path = FileManager::generate_output_path(transcript, output_dir, None, CAPTIONS_EXTENSION);

            match self.run(transcript, Some(script), &output_path, force_overwrite) {
                Ok(true) => processed += 1,
                Ok(false) => {}
                Err(e) => error!("Error processing {:?}: {:#}", transcript, e),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!("Wrote captions for {} of {} transcripts", processed, jobs.len());
        Ok(processed)
    }

    // Aligned transcripts written next to captions are outputs, not inputs
    fn is_aligned_output(path: &Path) -> bool {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(".aligned"))
            .unwrap_or(false)
    }
}
