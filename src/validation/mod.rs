/*!
 * Validation of timing data.
 *
 * - `timecodes`: block window sanity and caption chunk overlap checks
 */

pub mod timecodes;

pub use timecodes::{TimecodeIssue, TimecodeValidationResult, TimecodeValidator, TimecodeValidatorConfig};
