//! Error types for layout passes and configuration loading.

use std::path::PathBuf;

use regionize_document::{EditError, LineIdx};
use thiserror::Error;

use crate::tree::{DeclId, DeclTag};

/// Errors that abort a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
	/// A buffer edit failed, usually because an anchor lost its text.
	#[error(transparent)]
	Edit(#[from] EditError),

	/// A declaration ends before it starts.
	#[error("{kind} `{name}` ends on line {end} before it starts on line {start}")]
	InvertedExtent {
		/// Kind of the offending declaration.
		kind: DeclTag,
		/// Name of the offending declaration.
		name: String,
		/// Line of the start anchor.
		start: LineIdx,
		/// Line of the end anchor.
		end: LineIdx,
	},

	/// The tree shape contradicts the declared kinds.
	#[error("declaration tree invariant violated: {0}")]
	Invariant(String),

	/// A declaration id does not belong to the tree.
	#[error("unknown declaration {0:?}")]
	UnknownNode(DeclId),
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors that can occur when loading a [`LayoutConfig`](crate::LayoutConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML text is malformed or does not match the schema.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
}
