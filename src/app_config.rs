use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::captions::{CaptionStyle, DEFAULT_CHUNK_SIZE};
use crate::errors::AppError;
use crate::script_aligner::DEFAULT_SENTENCE_DELIMITER;
use crate::subtitle_processor::TimingPolicy;

/// Application configuration module
/// This module handles loading, validating and saving the caption pipeline settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// How malformed timing lines are handled
    #[serde(default)]
    pub timing_policy: TimingPolicy,

    /// Boundary between reference script sentences
    #[serde(default = "default_sentence_delimiter")]
    pub sentence_delimiter: String,

    /// Caption chunking settings
    #[serde(default)]
    pub captions: CaptionConfig,

    /// Style of the emitted captions
    #[serde(default)]
    pub style: CaptionStyle,

    /// Run timecode validation on parsed blocks and emitted captions
    #[serde(default = "default_true")]
    pub validate_output: bool,

    /// Also write the aligned transcript next to the captions
    #[serde(default)]
    pub write_aligned_srt: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Caption chunking settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaptionConfig {
    /// Words per caption
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Render caption words in upper case
    #[serde(default)]
    pub uppercase: bool,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            uppercase: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_sentence_delimiter() -> String {
    DEFAULT_SENTENCE_DELIMITER.to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.captions.chunk_size == 0 {
            return Err(AppError::Config("Caption chunk size must be at least 1".to_string()));
        }

        if self.sentence_delimiter.is_empty() {
            return Err(AppError::Config("Sentence delimiter must not be empty".to_string()));
        }

        if self.style.name.trim().is_empty() {
            return Err(AppError::Config("Caption style name must not be empty".to_string()));
        }

        if self.style.font_name.trim().is_empty() {
            return Err(AppError::Config("Caption font name must not be empty".to_string()));
        }

        if self.style.font_size == 0 {
            return Err(AppError::Config("Caption font size must be greater than zero".to_string()));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            timing_policy: TimingPolicy::default(),
            sentence_delimiter: default_sentence_delimiter(),
            captions: CaptionConfig::default(),
            style: CaptionStyle::default(),
            validate_output: true,
            write_aligned_srt: false,
            log_level: LogLevel::default(),
        }
    }
}
