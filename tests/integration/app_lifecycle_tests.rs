/*!
 * Tests for controller construction and folder processing
 */

use anyhow::Result;
use recaption::app_config::Config;
use recaption::app_controller::Controller;
use crate::common;

/// Test controller creation with default configuration
#[test]
fn test_controller_withDefaultConfig_shouldInitialize() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.config().captions.chunk_size, 4);
    Ok(())
}

/// Test controller creation rejects an invalid configuration
#[test]
fn test_controller_withZeroChunkSize_shouldFail() {
    let mut config = Config::default();
    config.captions.chunk_size = 0;

    assert!(Controller::with_config(config).is_err());
}

/// Test folder mode processes only complete transcript/script pairs
#[test]
fn test_run_folder_withPairsAndOrphan_shouldProcessPairsOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_pair(temp_dir.path(), "first")?;
    common::create_test_pair(temp_dir.path(), "second")?;
    common::create_test_file(temp_dir.path(), "orphan.srt", common::SAMPLE_TRANSCRIPT)?;

    let controller = Controller::with_config(Config::default())?;
    let processed = controller.run_folder(temp_dir.path(), false)?;

    assert_eq!(processed, 2);
    assert!(temp_dir.path().join("first.ass").exists());
    assert!(temp_dir.path().join("second.ass").exists());
    assert!(!temp_dir.path().join("orphan.ass").exists());

    // Existing captions are left alone and not counted
    assert_eq!(controller.run_folder(temp_dir.path(), false)?, 0);
    Ok(())
}

/// Test folder mode ignores aligned transcripts it wrote earlier
#[test]
fn test_run_folder_withAlignedOutputs_shouldNotReprocessThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_pair(temp_dir.path(), "clip")?;

    let config = Config {
        write_aligned_srt: true,
        ..Config::default()
    };
    let controller = Controller::with_config(config)?;

    assert_eq!(controller.run_folder(temp_dir.path(), false)?, 1);
    assert!(temp_dir.path().join("clip.aligned.srt").exists());

    // A second forced pass still sees a single pair
    assert_eq!(controller.run_folder(temp_dir.path(), true)?, 1);
    Ok(())
}

/// Test folder mode on a missing directory
#[test]
fn test_run_folder_withMissingDirectory_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(Config::default())?;

    assert!(controller.run_folder(&temp_dir.path().join("nope"), false).is_err());
    Ok(())
}
