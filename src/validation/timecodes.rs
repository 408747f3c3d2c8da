/*!
 * Timecode validation for transcripts and compiled captions.
 *
 * This module checks that:
 * - Block windows are well formed (start <= end) and appear in start order
 * - Chunks within one window never overlap and stay inside the window
 * - Optionally, chunks from consecutive windows do not overlap
 *
 * Findings are informational; nothing here rejects a document.
 */

use log::{debug, warn};

use crate::captions::ChunkedWindow;
use crate::subtitle_processor::TimedBlock;

/// Tolerance for float comparisons, in seconds
const EPSILON: f64 = 1e-9;

/// Types of timecode issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// Window or chunk ends before it starts
    InvalidTimeRange {
        start: f64,
        end: f64,
    },
    /// Block starts before the block preceding it
    OutOfOrder {
        previous_start: f64,
        start: f64,
    },
    /// Chunk starts before the previous chunk of the same window ended
    ChunkOverlap {
        previous_end: f64,
        start: f64,
    },
    /// Chunk runs past its window
    ExceedsWindow {
        end: f64,
        window_end: f64,
    },
    /// First chunk of a window starts before the previous window's last chunk ended
    CrossWindowOverlap {
        previous_end: f64,
        start: f64,
    },
}

impl TimecodeIssue {
    /// Cross-window overlap is tolerated; everything else is a failure
    pub fn is_failure(&self) -> bool {
        !matches!(self, TimecodeIssue::CrossWindowOverlap { .. })
    }
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { start, end } => {
                write!(f, "Invalid time range: start {:.3}s > end {:.3}s", start, end)
            }
            TimecodeIssue::OutOfOrder { previous_start, start } => {
                write!(
                    f,
                    "Starts at {:.3}s, before previous block at {:.3}s",
                    start, previous_start
                )
            }
            TimecodeIssue::ChunkOverlap { previous_end, start } => {
                write!(
                    f,
                    "Chunk starts at {:.3}s, before previous chunk ended at {:.3}s",
                    start, previous_end
                )
            }
            TimecodeIssue::ExceedsWindow { end, window_end } => {
                write!(f, "Chunk ends at {:.3}s, past window end {:.3}s", end, window_end)
            }
            TimecodeIssue::CrossWindowOverlap { previous_end, start } => {
                write!(
                    f,
                    "Window starts at {:.3}s, before previous window's captions ended at {:.3}s",
                    start, previous_end
                )
            }
        }
    }
}

/// An issue and where it was found (block or window position, 0-based)
#[derive(Debug, Clone, PartialEq)]
pub struct TimecodeFinding {
    pub position: usize,
    pub issue: TimecodeIssue,
}

/// Result of one validation pass
#[derive(Debug, Clone, Default)]
pub struct TimecodeValidationResult {
    pub findings: Vec<TimecodeFinding>,
}

impl TimecodeValidationResult {
    /// No failing findings
    pub fn passed(&self) -> bool {
        self.findings.iter().all(|f| !f.issue.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.findings.iter().filter(|f| f.issue.is_failure()).count()
    }

    /// Log every finding as a warning, prefixed with `what`
    pub fn log_findings(&self, what: &str) {
        for finding in &self.findings {
            warn!("{} {}: {}", what, finding.position + 1, finding.issue);
        }
    }
}

/// Configuration for timecode validation
#[derive(Debug, Clone)]
pub struct TimecodeValidatorConfig {
    /// Whether to report overlap between consecutive windows
    pub check_cross_window: bool,
}

impl Default for TimecodeValidatorConfig {
    fn default() -> Self {
        Self {
            check_cross_window: false,
        }
    }
}

/// Timecode validator for transcript blocks and caption windows
#[derive(Debug, Clone, Default)]
pub struct TimecodeValidator {
    config: TimecodeValidatorConfig,
}

impl TimecodeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TimecodeValidatorConfig) -> Self {
        Self { config }
    }

    /// Check block windows and their order
    pub fn validate_blocks(&self, blocks: &[TimedBlock]) -> TimecodeValidationResult {
        let mut findings = Vec::new();
        let mut previous_start: Option<f64> = None;

        for (position, block) in blocks.iter().enumerate() {
            if block.duration() < -EPSILON {
                findings.push(TimecodeFinding {
                    position,
                    issue: TimecodeIssue::InvalidTimeRange {
                        start: block.start,
                        end: block.end,
                    },
                });
            }
            if let Some(previous) = previous_start {
                if block.start + EPSILON < previous {
                    findings.push(TimecodeFinding {
                        position,
                        issue: TimecodeIssue::OutOfOrder {
                            previous_start: previous,
                            start: block.start,
                        },
                    });
                }
            }
            previous_start = Some(block.start);
        }

        debug!("Timecode validation: {} blocks, {} findings", blocks.len(), findings.len());
        TimecodeValidationResult { findings }
    }

    /// Check chunk timing inside and, if configured, across windows
    pub fn validate_windows(&self, windows: &[ChunkedWindow]) -> TimecodeValidationResult {
        let mut findings = Vec::new();
        let mut previous_window_end: Option<f64> = None;

        for (position, window) in windows.iter().enumerate() {
            for pair in window.chunks.windows(2) {
                if pair[1].start + EPSILON < pair[0].end {
                    findings.push(TimecodeFinding {
                        position,
                        issue: TimecodeIssue::ChunkOverlap {
                            previous_end: pair[0].end,
                            start: pair[1].start,
                        },
                    });
                }
            }

            let window_end = window.window_end.max(window.window_start);
            for chunk in &window.chunks {
                if chunk.duration() < -EPSILON {
                    findings.push(TimecodeFinding {
                        position,
                        issue: TimecodeIssue::InvalidTimeRange {
                            start: chunk.start,
                            end: chunk.end,
                        },
                    });
                }
                if chunk.end > window_end + EPSILON {
                    findings.push(TimecodeFinding {
                        position,
                        issue: TimecodeIssue::ExceedsWindow {
                            end: chunk.end,
                            window_end,
                        },
                    });
                }
            }

            if self.config.check_cross_window {
                if let (Some(previous_end), Some(first)) = (previous_window_end, window.chunks.first()) {
                    if first.start + EPSILON < previous_end {
                        findings.push(TimecodeFinding {
                            position,
                            issue: TimecodeIssue::CrossWindowOverlap {
                                previous_end,
                                start: first.start,
                            },
                        });
                    }
                }
            }
            if let Some(last) = window.chunks.last() {
                previous_window_end = Some(last.end);
            }
        }

        debug!("Timecode validation: {} windows, {} findings", windows.len(), findings.len());
        TimecodeValidationResult { findings }
    }
}
