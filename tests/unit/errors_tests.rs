/*!
 * Tests for error types and conversions
 */

use std::io;
use std::path::PathBuf;
use recaption::errors::{AppError, SubtitleError};

#[test]
fn test_subtitleError_malformedTiming_shouldDisplayLineAndNumber() {
    let error = SubtitleError::MalformedTiming {
        line_number: 12,
        line: "00:00 --> 00:01".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("line 12"));
    assert!(display.contains("00:00 --> 00:01"));
}

#[test]
fn test_subtitleError_invalidChunkSize_shouldDisplayCorrectly() {
    let display = format!("{}", SubtitleError::InvalidChunkSize(0));
    assert!(display.contains("Invalid chunk size"));
}

#[test]
fn test_appError_resource_shouldCarryPathAndReason() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "no such file");
    let error = AppError::resource("/tmp/missing.srt", &io_error);

    match &error {
        AppError::ResourceUnavailable { path, reason } => {
            assert_eq!(path, &PathBuf::from("/tmp/missing.srt"));
            assert_eq!(reason, "no such file");
        }
        other => panic!("unexpected variant: {:?}", other),
    }
    assert!(error.to_string().contains("/tmp/missing.srt"));
}

#[test]
fn test_appError_fromSubtitleError_shouldWrapCorrectly() {
    let app_error: AppError = SubtitleError::InvalidChunkSize(0).into();
    assert!(matches!(app_error, AppError::Subtitle(SubtitleError::InvalidChunkSize(0))));
    assert!(app_error.to_string().starts_with("Subtitle error"));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let app_error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(app_error, AppError::Unknown(ref message) if message == "boom"));
}
