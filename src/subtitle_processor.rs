use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use log::{warn, debug};
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

// @module: Timestamped transcript parsing and serialization

// @const: Token separating start and end on a timing line
pub const TIMING_SEPARATOR: &str = "-->";

// @const: One side of a timing line (HH:MM:SS,mmm), trailing cue settings ignored
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// How timing lines that fail the `HH:MM:SS,mmm` pattern are handled
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimingPolicy {
    /// Degrade the unparseable side to zero seconds and log a warning
    #[default]
    Lenient,
    /// Fail the whole parse
    Strict,
}

/// Classification of a single transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Pure integer line (block index)
    Index(u64),
    /// Line carrying the timing separator
    Timing(&'a str),
    /// Caption text
    Text(&'a str),
    /// Empty or whitespace-only line (block terminator)
    Blank,
}

impl<'a> LineKind<'a> {
    /// Classify a line. Timing wins over everything else, then index, then text.
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if trimmed.contains(TIMING_SEPARATOR) {
            return LineKind::Timing(line);
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = trimmed.parse::<u64>() {
                return LineKind::Index(index);
            }
        }
        LineKind::Text(line)
    }
}

/// Parse one `HH:MM:SS,mmm` timestamp into fractional seconds
pub fn parse_timestamp(timestamp: &str) -> Option<f64> {
    let caps = TIMESTAMP_REGEX.captures(timestamp.trim())?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let millis = field(4)?;

    Some(hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0)
}

/// Parse a `start --> end` line. Both sides must match.
pub fn try_parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once(TIMING_SEPARATOR)?;
    Some((parse_timestamp(start)?, parse_timestamp(end)?))
}

/// Parse a `start --> end` line, substituting zero for any side that does not match.
///
/// `parse_timing_line("not-a-time")` is `(0.0, 0.0)`.
pub fn parse_timing_line(line: &str) -> (f64, f64) {
    match line.split_once(TIMING_SEPARATOR) {
        Some((start, end)) => (
            parse_timestamp(start).unwrap_or(0.0),
            parse_timestamp(end).unwrap_or(0.0),
        ),
        None => (0.0, 0.0),
    }
}

/// Format fractional seconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

// @struct: One cue of the timestamped transcript
#[derive(Debug, Clone, PartialEq)]
pub struct TimedBlock {
    // @field: Block index, if the source carried one
    pub index: Option<u64>,

    // @field: Index line as it appeared in the source (e.g. "007")
    pub index_line: Option<String>,

    // @field: Window start in seconds
    pub start: f64,

    // @field: Window end in seconds
    pub end: f64,

    // @field: Timing line as it appeared in the source; None when the block inherited its window
    pub timing_line: Option<String>,

    // @field: Text lines, unmodified
    pub lines: Vec<String>,

    // @field: Pure-index lines met between text lines, keyed by the number of text lines before them
    pub markers: Vec<(usize, String)>,

    // @field: Blank lines that closed the block, verbatim
    pub separator: Vec<String>,
}

impl TimedBlock {
    /// Creates a block with a generated timing line and a single blank separator
    pub fn new(index: Option<u64>, start: f64, end: f64, lines: Vec<String>) -> Self {
        let timing_line = format!(
            "{} {} {}",
            format_srt_timestamp(start),
            TIMING_SEPARATOR,
            format_srt_timestamp(end)
        );
        TimedBlock {
            index,
            index_line: index.map(|i| i.to_string()),
            start,
            end,
            timing_line: Some(timing_line),
            lines,
            markers: Vec::new(),
            separator: vec![String::new()],
        }
    }

    /// Whether the block opened its own timing window
    pub fn has_timing(&self) -> bool {
        self.timing_line.is_some()
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// All text lines joined with single spaces
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| line.split_whitespace().count()).sum()
    }

    fn write_markers_at(&self, f: &mut fmt::Formatter, position: usize) -> fmt::Result {
        for (_, marker) in self.markers.iter().filter(|(at, _)| *at == position) {
            writeln!(f, "{}", marker)?;
        }
        Ok(())
    }
}

impl fmt::Display for TimedBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.index_line, self.index) {
            (Some(index_line), _) => writeln!(f, "{}", index_line)?,
            (None, Some(index)) => writeln!(f, "{}", index)?,
            (None, None) => {}
        }
        if let Some(timing_line) = &self.timing_line {
            writeln!(f, "{}", timing_line)?;
        }
        for (position, line) in self.lines.iter().enumerate() {
            self.write_markers_at(f, position)?;
            writeln!(f, "{}", line)?;
        }
        for (_, marker) in self.markers.iter().filter(|(at, _)| *at >= self.lines.len()) {
            writeln!(f, "{}", marker)?;
        }
        for blank in &self.separator {
            writeln!(f, "{}", blank)?;
        }
        Ok(())
    }
}

/// Block under construction while scanning lines
#[derive(Default)]
struct BlockBuilder {
    index: Option<(u64, String)>,
    timing: Option<(String, f64, f64)>,
    lines: Vec<String>,
    markers: Vec<(usize, String)>,
}

impl BlockBuilder {
    fn is_empty(&self) -> bool {
        self.timing.is_none() && self.lines.is_empty() && self.markers.is_empty()
    }

    // A pure-index line right before a timing line belongs to the next block
    fn take_trailing_index(&mut self) -> Option<(u64, String)> {
        let (position, raw) = self.markers.last()?;
        if *position != self.lines.len() {
            return None;
        }
        let index = raw.trim().parse::<u64>().ok()?;
        let (_, raw) = self.markers.pop()?;
        Some((index, raw))
    }

    // Blocks without their own timing line stay on the window that is open
    fn finish(self, window: (f64, f64)) -> TimedBlock {
        let (timing_line, start, end) = match self.timing {
            Some((line, start, end)) => (Some(line), start, end),
            None => (None, window.0, window.1),
        };
        let (index, index_line) = match self.index {
            Some((index, raw)) => (Some(index), Some(raw)),
            None => (None, None),
        };
        TimedBlock {
            index,
            index_line,
            start,
            end,
            timing_line,
            lines: self.lines,
            markers: self.markers,
            separator: Vec::new(),
        }
    }
}

/// Line-by-line scanning state for one parse
struct BlockScanner {
    policy: TimingPolicy,
    leading: Vec<String>,
    blocks: Vec<TimedBlock>,
    current: Option<BlockBuilder>,
    window: (f64, f64),
}

impl BlockScanner {
    fn new(policy: TimingPolicy) -> Self {
        BlockScanner {
            policy,
            leading: Vec::new(),
            blocks: Vec::new(),
            current: None,
            window: (0.0, 0.0),
        }
    }

    fn close_current(&mut self) {
        if let Some(builder) = self.current.take() {
            self.blocks.push(builder.finish(self.window));
        }
    }

    // Only timing and blank lines close a block
    fn scan_line(&mut self, line: &str, line_number: usize) -> Result<(), SubtitleError> {
        match LineKind::classify(line) {
            LineKind::Blank => {
                self.close_current();
                match self.blocks.last_mut() {
                    Some(block) => block.separator.push(line.to_string()),
                    None => self.leading.push(line.to_string()),
                }
            }
            LineKind::Index(index) => {
                let is_marker = matches!(&self.current, Some(builder) if !(builder.is_empty() && builder.index.is_none()));
                let builder = self.current.get_or_insert_with(BlockBuilder::default);
                if is_marker {
                    builder.markers.push((builder.lines.len(), line.to_string()));
                } else {
                    builder.index = Some((index, line.to_string()));
                }
            }
            LineKind::Timing(raw) => {
                let (start, end) = TranscriptDocument::read_timing(raw, line_number, self.policy)?;
                let opens_new = matches!(&self.current, Some(builder) if !builder.is_empty());
                let carried_index = if opens_new {
                    let index = self.current.as_mut().and_then(BlockBuilder::take_trailing_index);
                    self.close_current();
                    index
                } else {
                    None
                };
                let builder = self.current.get_or_insert_with(BlockBuilder::default);
                if carried_index.is_some() {
                    builder.index = carried_index;
                }
                builder.timing = Some((raw.to_string(), start, end));
                self.window = (start, end);
            }
            LineKind::Text(raw) => {
                if self.current.is_none() && self.blocks.is_empty() {
                    warn!("Text at line {} before any timing line, using a zero window", line_number);
                }
                self.current
                    .get_or_insert_with(BlockBuilder::default)
                    .lines
                    .push(raw.to_string());
            }
        }
        Ok(())
    }

    fn finish(mut self) -> TranscriptDocument {
        self.close_current();
        TranscriptDocument {
            leading: self.leading,
            blocks: self.blocks,
        }
    }
}

/// Ordered sequence of timed blocks from one parse of a transcript
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranscriptDocument {
    // Blank lines before the first block, verbatim
    leading: Vec<String>,
    blocks: Vec<TimedBlock>,
}

impl TranscriptDocument {
    pub fn from_blocks(blocks: Vec<TimedBlock>) -> Self {
        TranscriptDocument {
            leading: Vec::new(),
            blocks,
        }
    }

    /// Parse with the lenient timing policy
    pub fn parse(content: &str) -> Self {
        // Lenient scanning has no failure path
        Self::parse_with_policy(content, TimingPolicy::Lenient).unwrap_or_default()
    }

    /// Parse, handling malformed timing lines according to `policy`.
    ///
    /// Timing lines open a block and blank lines close it. Pure-index lines
    /// met inside a block are kept as markers and never split its text.
    pub fn parse_with_policy(content: &str, policy: TimingPolicy) -> Result<Self, SubtitleError> {
        let mut scanner = BlockScanner::new(policy);
        for (line_idx, line) in content.lines().enumerate() {
            scanner.scan_line(line, line_idx + 1)?;
        }
        let document = scanner.finish();

        debug!("Parsed {} transcript blocks ({:?} timing)", document.blocks.len(), policy);
        Ok(document)
    }

    fn read_timing(line: &str, line_number: usize, policy: TimingPolicy) -> Result<(f64, f64), SubtitleError> {
        if let Some(timing) = try_parse_timing_line(line) {
            return Ok(timing);
        }
        match policy {
            TimingPolicy::Strict => Err(SubtitleError::MalformedTiming {
                line_number,
                line: line.trim().to_string(),
            }),
            TimingPolicy::Lenient => {
                warn!("Malformed timing at line {}, substituting zero: {}", line_number, line.trim());
                Ok(parse_timing_line(line))
            }
        }
    }

    pub fn blocks(&self) -> &[TimedBlock] {
        &self.blocks
    }

    /// Same leading lines, new blocks
    pub fn with_blocks(&self, blocks: Vec<TimedBlock>) -> Self {
        TranscriptDocument {
            leading: self.leading.clone(),
            blocks,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of caption text lines across all blocks
    pub fn content_line_count(&self) -> usize {
        self.blocks.iter().map(|block| block.lines.len()).sum()
    }

    /// Serialize back to the timestamped transcript format
    pub fn to_srt_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TranscriptDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for blank in &self.leading {
            writeln!(f, "{}", blank)?;
        }
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        Ok(())
    }
}
