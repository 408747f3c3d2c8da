/*!
 * Script alignment.
 *
 * Replaces transcript caption lines with sentences from an authoritative
 * reference script, one sentence per content line, keeping every index and
 * timing line as it was.
 */

use log::{debug, info, warn};

use crate::subtitle_processor::{TimedBlock, TranscriptDocument};

/// Default boundary between reference sentences
pub const DEFAULT_SENTENCE_DELIMITER: &str = ". ";

/// Ordered reference sentences, consumed left to right
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceScript {
    sentences: Vec<String>,
}

impl ReferenceScript {
    /// Split on the default `". "` boundary
    pub fn parse(text: &str) -> Self {
        Self::parse_with_delimiter(text, DEFAULT_SENTENCE_DELIMITER)
    }

    /// Split on `delimiter`. Sentences are trimmed, internal whitespace runs
    /// (including newlines) collapse to a single space, and empty pieces are dropped.
    pub fn parse_with_delimiter(text: &str, delimiter: &str) -> Self {
        let pieces: Vec<&str> = if delimiter.is_empty() {
            vec![text]
        } else {
            text.split(delimiter).collect()
        };

        let sentences = pieces
            .into_iter()
            .map(|piece| piece.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|sentence| !sentence.is_empty())
            .collect::<Vec<_>>();

        debug!("Reference script holds {} sentences", sentences.len());
        ReferenceScript { sentences }
    }

    pub fn from_sentences<I, S>(sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReferenceScript {
            sentences: sentences.into_iter().map(|s| s.into().trim().to_string()).collect(),
        }
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Counts gathered during one alignment run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentReport {
    /// Content lines replaced by a reference sentence
    pub replaced_lines: usize,
    /// Content lines left as transcribed because the script ran out
    pub retained_lines: usize,
    /// Reference sentences left over after the last content line
    pub unused_sentences: usize,
}

impl AlignmentReport {
    /// Whether the script ran out before the transcript did
    pub fn reference_exhausted(&self) -> bool {
        self.retained_lines > 0
    }

    /// Whether every content line got exactly one sentence and none were left
    pub fn is_exact(&self) -> bool {
        self.retained_lines == 0 && self.unused_sentences == 0
    }
}

/// Aligned transcript plus the report describing how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub document: TranscriptDocument,
    pub report: AlignmentReport,
}

/// Replaces content lines with reference sentences in document order
#[derive(Debug, Clone, Copy)]
pub struct ScriptAligner<'a> {
    script: &'a ReferenceScript,
}

impl<'a> ScriptAligner<'a> {
    pub fn new(script: &'a ReferenceScript) -> Self {
        ScriptAligner { script }
    }

    /// Align `document` against the script.
    ///
    /// The sentence cursor lives only for this call, so aligning the same
    /// document twice gives the same result and the script is never consumed.
    pub fn align(&self, document: &TranscriptDocument) -> Alignment {
        let mut sentences = self.script.sentences().iter();
        let mut report = AlignmentReport::default();

        let blocks = document
            .blocks()
            .iter()
            .map(|block| {
                let lines = block
                    .lines
                    .iter()
                    .map(|line| match sentences.next() {
                        Some(sentence) => {
                            report.replaced_lines += 1;
                            sentence.clone()
                        }
                        None => {
                            report.retained_lines += 1;
                            line.clone()
                        }
                    })
                    .collect();
                TimedBlock {
                    lines,
                    ..block.clone()
                }
            })
            .collect();

        report.unused_sentences = sentences.count();

        info!(
            "Aligned {} of {} transcript lines to the reference script",
            report.replaced_lines,
            report.replaced_lines + report.retained_lines
        );
        if report.reference_exhausted() {
            warn!(
                "Reference script exhausted: {} lines keep their transcribed text",
                report.retained_lines
            );
        }
        if report.unused_sentences > 0 {
            warn!("{} reference sentences were not used", report.unused_sentences);
        }

        Alignment {
            document: document.with_blocks(blocks),
            report,
        }
    }
}

/// Align `document` against `script`, discarding the report
pub fn align(document: &TranscriptDocument, script: &ReferenceScript) -> TranscriptDocument {
    ScriptAligner::new(script).align(document).document
}
