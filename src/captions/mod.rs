/*!
 * Styled caption compilation.
 *
 * Turns an (aligned) transcript into short word-group captions and
 * serializes them as a styled subtitle document.
 */

pub mod ass;
pub mod chunker;

pub use ass::{format_ass_timestamp, CaptionStyle, DialogueEvent, StyledSubtitleDocument};
pub use chunker::{CaptionChunk, ChunkTimer, ChunkedWindow, DEFAULT_CHUNK_SIZE};

use log::debug;

use crate::errors::SubtitleError;
use crate::subtitle_processor::TranscriptDocument;

/// Text gathered for the window that is currently open
#[derive(Debug, Default)]
struct PendingWindow {
    start: f64,
    end: f64,
    buffer: String,
}

impl PendingWindow {
    fn open(&mut self, start: f64, end: f64) {
        self.start = start;
        self.end = end;
    }

    fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(line);
    }

    fn flush(&mut self, timer: &ChunkTimer) -> Option<ChunkedWindow> {
        if self.buffer.is_empty() {
            return None;
        }
        let chunks = timer.split_window(self.start, self.end, &self.buffer);
        self.buffer.clear();
        Some(ChunkedWindow {
            window_start: self.start,
            window_end: self.end,
            chunks,
        })
    }
}

/// Compiles transcripts into styled caption documents
#[derive(Debug, Clone)]
pub struct CaptionCompiler {
    timer: ChunkTimer,
    style: CaptionStyle,
    uppercase: bool,
}

impl Default for CaptionCompiler {
    fn default() -> Self {
        CaptionCompiler {
            timer: ChunkTimer::default(),
            style: CaptionStyle::default(),
            uppercase: false,
        }
    }
}

impl CaptionCompiler {
    pub fn new(chunk_size: usize, style: CaptionStyle) -> Result<Self, SubtitleError> {
        Ok(CaptionCompiler {
            timer: ChunkTimer::new(chunk_size)?,
            style,
            uppercase: false,
        })
    }

    /// Render caption words in upper case
    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.timer.chunk_size()
    }

    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    /// Re-chunk every block of `document`, one entry per flushed window.
    ///
    /// Each block opens (or stays on) its window, its lines join the pending
    /// buffer, and the block end flushes the buffer under that window.
    pub fn chunk_windows(&self, document: &TranscriptDocument) -> Vec<ChunkedWindow> {
        let mut pending = PendingWindow::default();
        let mut windows = Vec::new();

        for block in document.blocks() {
            pending.open(block.start, block.end);
            for line in &block.lines {
                pending.push_line(line);
            }
            if let Some(window) = pending.flush(&self.timer) {
                windows.push(window);
            }
        }

        windows
    }

    /// Build the styled document for `document`
    pub fn compile(&self, document: &TranscriptDocument) -> StyledSubtitleDocument {
        self.compile_windows(&self.chunk_windows(document))
    }

    /// Build the styled document from already chunked windows
    pub fn compile_windows(&self, windows: &[ChunkedWindow]) -> StyledSubtitleDocument {
        let fade = self.style.fade_tag();
        let mut output = StyledSubtitleDocument::new(self.style.clone());

        for chunk in windows.iter().flat_map(|window| window.chunks.iter()) {
            let words = chunk.text();
            let words = if self.uppercase { words.to_uppercase() } else { words };
            output.events.push(DialogueEvent {
                start: chunk.start,
                end: chunk.end,
                style: self.style.name.clone(),
                text: format!("{}{}", fade, words),
            });
        }

        debug!("Compiled {} dialogue events from {} windows", output.len(), windows.len());
        output
    }
}
