//! plugsmith generates FairDM plugin packages from a declarative answer set.
//! It normalizes the answers, plans which files and regions the package contains,
//! renders them and converges the output directory to exactly that plan.

/// Raw answer sets from files, stdin and overrides
pub mod answers;

/// The plugin package layout: files, regions and conditional paths
pub mod blueprint;

/// Command-line interface module for the plugsmith application
pub mod cli;

pub mod constants;

/// Answer validation and derived identifiers
pub mod context;

/// Error types and handling for the plugsmith application
pub mod error;

/// Writing rendered trees and pruning stale conditional artifacts
pub mod materializer;

/// Slug, class name and package name derivation
pub mod naming;

/// File and region inclusion decisions
pub mod plan;

/// Core generation orchestration
/// Combines all components to generate the final output
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Template rendering on top of MiniJinja
pub mod renderer;
