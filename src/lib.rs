/*!
 * # recaption - script-aligned styled captions
 *
 * A Rust library that turns a machine-generated, timestamped transcript and
 * an authoritative reference script into burned-in style captions for
 * short-form video.
 *
 * ## Features
 *
 * - Parse timestamped transcripts (`index` / `start --> end` / text / blank)
 * - Replace transcribed wording with reference script sentences while
 *   keeping the original timing segmentation
 * - Re-chunk captions into short, evenly timed word groups
 * - Emit a styled subtitle document (font, colours, margins, fade effect)
 * - Lenient or strict handling of malformed timing lines
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle_processor`: Line classification and transcript parsing
 * - `script_aligner`: Reference script splitting and sentence substitution
 * - `captions`: Caption compilation:
 *   - `captions::chunker`: Word grouping and proportional re-timing
 *   - `captions::ass`: Styled subtitle serialization
 * - `validation`: Timecode sanity checks on blocks and captions
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `app_controller`: End-to-end pipeline over files and folders
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod script_aligner;
pub mod captions;
pub mod validation;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{LineKind, TimedBlock, TimingPolicy, TranscriptDocument};
pub use script_aligner::{align, AlignmentReport, ReferenceScript, ScriptAligner};
pub use captions::{CaptionChunk, CaptionCompiler, CaptionStyle, StyledSubtitleDocument};
pub use errors::{AppError, SubtitleError};
