/*!
 * Tests for script alignment functionality
 */

use recaption::script_aligner::{align, ReferenceScript, ScriptAligner};
use recaption::subtitle_processor::TranscriptDocument;
use crate::common;

fn content_lines(doc: &TranscriptDocument) -> Vec<String> {
    doc.blocks().iter().flat_map(|b| b.lines.clone()).collect()
}

/// Test that with enough sentences every content line is replaced in order
#[test]
fn test_align_withEnoughSentences_shouldReplaceEveryLine() {
    let doc = TranscriptDocument::parse(common::SAMPLE_TRANSCRIPT);
    let script = ReferenceScript::parse(common::SAMPLE_SCRIPT);

    let alignment = ScriptAligner::new(&script).align(&doc);

    assert_eq!(
        content_lines(&alignment.document),
        vec!["This is a test subtitle", "It contains multiple entries", "For testing purposes."]
    );
    assert_eq!(alignment.report.replaced_lines, 3);
    assert!(alignment.report.is_exact());
}

/// Test that timings, indices and timing lines are untouched
#[test]
fn test_align_shouldPreserveTimingLinesByteForByte() {
    let doc = TranscriptDocument::parse(common::SAMPLE_TRANSCRIPT);
    let script = ReferenceScript::parse(common::SAMPLE_SCRIPT);

    let aligned = align(&doc, &script);

    assert_eq!(aligned.len(), doc.len());
    for (before, after) in doc.blocks().iter().zip(aligned.blocks()) {
        assert_eq!(before.index, after.index);
        assert_eq!(before.start, after.start);
        assert_eq!(before.end, after.end);
    }
    assert_eq!(
        common::timing_lines(&aligned.to_srt_string()),
        common::timing_lines(common::SAMPLE_TRANSCRIPT)
    );
}

/// Test that when sentences run out the remaining lines keep transcript text
#[test]
fn test_align_withFewerSentences_shouldRetainRemainingLines() {
    let doc = TranscriptDocument::parse(common::SAMPLE_TRANSCRIPT);
    let script = ReferenceScript::parse("Only one sentence here");

    let alignment = ScriptAligner::new(&script).align(&doc);

    assert_eq!(
        content_lines(&alignment.document),
        vec!["Only one sentence here", "it contain multiple entries", "for testing purpose"]
    );
    assert_eq!(alignment.report.replaced_lines, 1);
    assert_eq!(alignment.report.retained_lines, 2);
    assert!(alignment.report.reference_exhausted());
}

/// Test that surplus sentences are dropped silently
#[test]
fn test_align_withMoreSentences_shouldReportUnused() {
    let doc = TranscriptDocument::parse(common::SAMPLE_TRANSCRIPT);
    let script = ReferenceScript::parse("A. B. C. D. E");

    let alignment = ScriptAligner::new(&script).align(&doc);

    assert_eq!(content_lines(&alignment.document), vec!["A", "B", "C"]);
    assert_eq!(alignment.report.unused_sentences, 2);
    assert!(!alignment.report.reference_exhausted());
}

/// Test that each content line of a multi-line block consumes its own sentence
#[test]
fn test_align_withMultiLineBlock_shouldConsumeOneSentencePerLine() {
    let content = "1\n00:00:00,000 --> 00:00:02,000\nline one\nline two\n\n2\n00:00:02,000 --> 00:00:04,000\nline three\n";
    let doc = TranscriptDocument::parse(content);
    let script = ReferenceScript::parse("First. Second. Third");

    let aligned = align(&doc, &script);

    assert_eq!(aligned.blocks()[0].lines, vec!["First", "Second"]);
    assert_eq!(aligned.blocks()[1].lines, vec!["Third"]);
}

/// Test that aligning twice gives the same result and leaves the script intact
#[test]
fn test_align_runTwice_shouldBeIdempotent() {
    let doc = TranscriptDocument::parse(common::SAMPLE_TRANSCRIPT);
    let script = ReferenceScript::parse("Just one");
    let snapshot = script.clone();

    let aligner = ScriptAligner::new(&script);
    let first = aligner.align(&doc);
    let second = aligner.align(&doc);

    assert_eq!(first, second);
    assert_eq!(script, snapshot);
}

/// Test that an empty script leaves the document unchanged
#[test]
fn test_align_withEmptyScript_shouldReturnOriginalText() {
    let doc = TranscriptDocument::parse(common::SAMPLE_TRANSCRIPT);
    let aligned = align(&doc, &ReferenceScript::default());

    assert_eq!(aligned, doc);
}

/// Test that blocks without content lines do not consume sentences
#[test]
fn test_align_withEmptyBlock_shouldSkipIt() {
    let content = "1\n00:00:00,000 --> 00:00:01,000\n\n2\n00:00:01,000 --> 00:00:02,000\nspoken\n";
    let doc = TranscriptDocument::parse(content);
    let aligned = align(&doc, &ReferenceScript::parse("Written"));

    assert!(aligned.blocks()[0].lines.is_empty());
    assert_eq!(aligned.blocks()[1].lines, vec!["Written"]);
}

/// Test building a script from explicit sentences
#[test]
fn test_fromSentences_shouldTrimEachSentence() {
    let script = ReferenceScript::from_sentences(["  one ", "two"]);
    assert_eq!(script.sentences(), &["one", "two"]);
    assert_eq!(script.len(), 2);
}

/// Test that index lines inside a block neither consume sentences nor move
#[test]
fn test_align_withIndexLineInsideBlock_shouldKeepMarkerInPlace() {
    let document = TranscriptDocument::parse("1\n00:00:00,000 --> 00:00:04,000\na b\n5\nc d\n");
    let script = ReferenceScript::parse("First. Second");

    let alignment = ScriptAligner::new(&script).align(&document);

    assert_eq!(alignment.report.replaced_lines, 2);
    assert_eq!(
        alignment.document.to_srt_string(),
        "1\n00:00:00,000 --> 00:00:04,000\nFirst\n5\nSecond\n"
    );
}
