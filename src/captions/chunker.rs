/*!
 * Word chunking and proportional re-timing.
 *
 * A window's text is cut into groups of `chunk_size` words and the window's
 * duration is shared out by word count. Chunks inside one window never
 * overlap and never run past the window end.
 */

use log::{debug, warn};

use crate::errors::SubtitleError;

/// Default number of words per caption chunk
pub const DEFAULT_CHUNK_SIZE: usize = 4;

/// A group of consecutive words shown as one caption
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionChunk {
    /// Start in seconds
    pub start: f64,
    /// End in seconds
    pub end: f64,
    pub words: Vec<String>,
}

impl CaptionChunk {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Chunks produced from one timing window
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkedWindow {
    pub window_start: f64,
    pub window_end: f64,
    pub chunks: Vec<CaptionChunk>,
}

/// Splits window text into fixed-size word groups and times them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkTimer {
    chunk_size: usize,
}

impl Default for ChunkTimer {
    fn default() -> Self {
        ChunkTimer {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ChunkTimer {
    pub fn new(chunk_size: usize) -> Result<Self, SubtitleError> {
        if chunk_size == 0 {
            return Err(SubtitleError::InvalidChunkSize(chunk_size));
        }
        Ok(ChunkTimer { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split `text` across the `[window_start, window_end]` window.
    ///
    /// Group `i` tentatively spans words `[i*k, min((i+1)*k, n))` at a uniform
    /// per-word time, then its start is raised to the previous chunk's end and
    /// its end is capped at the window end. The previous-end tracker starts at
    /// zero for every window.
    pub fn split_window(&self, window_start: f64, window_end: f64, text: &str) -> Vec<CaptionChunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let window_end = if window_end < window_start {
            warn!(
                "Window ends before it starts ({:.3}s > {:.3}s), collapsing to zero length",
                window_start, window_end
            );
            window_start
        } else {
            window_end
        };

        let word_count = words.len();
        let per_word = (window_end - window_start) / word_count as f64;
        let mut last_end = 0.0_f64;
        let mut chunks = Vec::with_capacity(word_count.div_ceil(self.chunk_size));

        for (i, group) in words.chunks(self.chunk_size).enumerate() {
            let first_word = i * self.chunk_size;
            let past_last_word = first_word + group.len();

            let tentative_start = window_start + first_word as f64 * per_word;
            let tentative_end = window_start + past_last_word as f64 * per_word;

            let start = tentative_start.max(last_end);
            let end = tentative_end.min(window_end);
            last_end = end;

            chunks.push(CaptionChunk {
                start,
                end,
                words: group.iter().map(|w| w.to_string()).collect(),
            });
        }

        debug!(
            "Split {} words over {:.3}s-{:.3}s into {} chunks",
            word_count,
            window_start,
            window_end,
            chunks.len()
        );
        chunks
    }
}
