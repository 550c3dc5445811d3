//! Shared test utilities for the rain-volume workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Polygon fixtures with known sampling behaviour
//! - Sample point generators
//! - A scripted, network-free precipitation source
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, ScriptedSource};
//! ```

pub mod fixtures;
pub mod generators;
pub mod sources;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use sources::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for relative floating-point equality: `|left - right| <= tol * |right|`.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_rel_eq;
///
/// assert_rel_eq!(1_000_001.0, 1_000_000.0, 1e-5); // passes
/// ```
#[macro_export]
macro_rules! assert_rel_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let tolerance: f64 = $tolerance as f64;
        let diff = (left - right).abs();
        if diff > tolerance * right.abs() {
            panic!(
                "assertion failed: `(left ≈ right)` (relative)\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > {:?} * |right|",
                left, right, diff, tolerance
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_rel_eq_passes() {
        assert_rel_eq!(1_000_001.0, 1_000_000.0, 1e-5);
        assert_rel_eq!(0.0, 0.0, 1e-9);
    }

    #[test]
    #[should_panic(expected = "relative")]
    fn test_assert_rel_eq_fails() {
        assert_rel_eq!(1_100.0, 1_000.0, 0.01);
    }
}
