/*!
 * Tests for caption chunking and styled subtitle output
 */

use anyhow::Result;
use recaption::captions::{format_ass_timestamp, CaptionCompiler, CaptionStyle, ChunkTimer};
use recaption::subtitle_processor::TranscriptDocument;
use crate::common;

const EIGHT_WORDS: &str = "1\n00:00:01,000 --> 00:00:09,000\none two three four five six seven eight\n";

/// Test the reference scenario: 8 words over 8 seconds in chunks of four
#[test]
fn test_compile_withEightWordWindow_shouldEmitTwoEvents() {
    let doc = TranscriptDocument::parse(EIGHT_WORDS);
    let output = CaptionCompiler::default().compile(&doc);

    assert_eq!(output.len(), 2);
    assert_eq!(output.events[0].start, 1.0);
    assert_eq!(output.events[0].end, 5.0);
    assert!(output.events[0].text.ends_with("one two three four"));
    assert_eq!(output.events[1].start, 5.0);
    assert_eq!(output.events[1].end, 9.0);
    assert!(output.events[1].text.ends_with("five six seven eight"));

    let rendered = output.to_ass_string();
    assert_eq!(
        common::dialogue_lines(&rendered),
        vec![
            "Dialogue: 0,0:00:01.00,0:00:05.00,Default,,0,0,0,,{\\fad(200,200)}one two three four",
            "Dialogue: 0,0:00:05.00,0:00:09.00,Default,,0,0,0,,{\\fad(200,200)}five six seven eight",
        ]
    );
}

/// Test that each window yields ceil(words / chunk_size) events without overlap
#[test]
fn test_compile_withVariousChunkSizes_shouldEmitCeilCountWithoutOverlap() -> Result<()> {
    let text = "a b c d e f g h i j k";
    let content = format!("1\n00:00:02,500 --> 00:00:07,300\n{}\n", text);
    let doc = TranscriptDocument::parse(&content);

    for chunk_size in 1..=12 {
        let compiler = CaptionCompiler::new(chunk_size, CaptionStyle::default())?;
        let windows = compiler.chunk_windows(&doc);
        assert_eq!(windows.len(), 1);

        let chunks = &windows[0].chunks;
        assert_eq!(chunks.len(), 11_usize.div_ceil(chunk_size), "chunk size {}", chunk_size);
        for pair in chunks.windows(2) {
            assert!(pair[0].end <= pair[1].start, "overlap at chunk size {}", chunk_size);
        }
        assert!(chunks.iter().all(|c| c.start >= 2.5 && c.end <= 7.3 + 1e-9));
        let words: usize = chunks.iter().map(|c| c.words.len()).sum();
        assert_eq!(words, 11);
    }
    Ok(())
}

/// Test that overlap protection is per window, not global
#[test]
fn test_compile_withOverlappingWindows_shouldNotClampAcrossWindows() {
    let content = "1\n00:00:00,000 --> 00:00:04,000\na b c d\n\n2\n00:00:02,000 --> 00:00:06,000\ne f g h\n";
    let doc = TranscriptDocument::parse(content);
    let output = CaptionCompiler::default().compile(&doc);

    assert_eq!(output.len(), 2);
    assert_eq!(output.events[0].end, 4.0);
    assert_eq!(output.events[1].start, 2.0);
}

/// Test that blocks with no words emit nothing
#[test]
fn test_compile_withEmptyBlocks_shouldSkipThem() {
    let content = "1\n00:00:00,000 --> 00:00:01,000\n\n2\n00:00:01,000 --> 00:00:02,000\n   \n";
    let doc = TranscriptDocument::parse(content);
    let output = CaptionCompiler::default().compile(&doc);

    assert!(output.is_empty());
    assert!(output.to_ass_string().starts_with("[Script Info]"));
}

/// Test that a zero chunk size is rejected
#[test]
fn test_new_withZeroChunkSize_shouldFail() {
    assert!(CaptionCompiler::new(0, CaptionStyle::default()).is_err());
    assert!(ChunkTimer::new(0).is_err());
}

/// Test that the header appears once, ahead of all events
#[test]
fn test_toAssString_shouldPlaceHeaderBeforeEvents() {
    let doc = TranscriptDocument::parse(EIGHT_WORDS);
    let rendered = CaptionCompiler::default().compile(&doc).to_ass_string();

    let events_at = rendered.find("[Events]").unwrap();
    let first_dialogue = rendered.find("Dialogue:").unwrap();
    assert!(events_at < first_dialogue);
    assert_eq!(rendered.matches("[V4+ Styles]").count(), 1);
    assert!(rendered.contains("\nStyle: Default,Arial,72,"));
}

/// Test that custom style values flow into header and events
#[test]
fn test_compile_withCustomStyle_shouldUseIt() -> Result<()> {
    let style = CaptionStyle {
        name: "Shorts".to_string(),
        font_name: "Montserrat".to_string(),
        fade_in_ms: 100,
        fade_out_ms: 50,
        ..Default::default()
    };
    let doc = TranscriptDocument::parse(EIGHT_WORDS);
    let output = CaptionCompiler::new(8, style)?.compile(&doc);
    let rendered = output.to_ass_string();

    assert!(rendered.contains("Style: Shorts,Montserrat,"));
    assert_eq!(
        common::dialogue_lines(&rendered),
        vec!["Dialogue: 0,0:00:01.00,0:00:09.00,Shorts,,0,0,0,,{\\fad(100,50)}one two three four five six seven eight"]
    );
    Ok(())
}

/// Test ASS timestamp formatting rules
#[test]
fn test_formatAssTimestamp_shouldUseUnpaddedHoursAndFiveCharSeconds() {
    assert_eq!(format_ass_timestamp(0.0), "0:00:00.00");
    assert_eq!(format_ass_timestamp(65.5), "0:01:05.50");
    assert_eq!(format_ass_timestamp(7265.25), "2:01:05.25");
}

/// Test that an index line between text lines does not split the window
#[test]
fn test_compile_withIndexLineInsideBlock_shouldFlushOnce() {
    let document = TranscriptDocument::parse("1\n00:00:00,000 --> 00:00:04,000\na b\n5\nc d\n");

    let output = CaptionCompiler::default().compile(&document);

    assert_eq!(output.len(), 1);
    assert_eq!(output.events[0].start, 0.0);
    assert_eq!(output.events[0].end, 4.0);
    assert_eq!(output.events[0].text, "{\\fad(200,200)}a b c d");
}
