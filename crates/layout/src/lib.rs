//! Region and blank-line layout for declaration trees.
//!
//! One layout pass runs three engines against a single [`Document`]:
//!
//! 1. [`RegionCleaner`] strips previously generated region markers.
//! 2. [`RegionInserter`] wraps members, kind blocks and classes in fresh
//!    region markers and links each wrapped member to its region.
//! 3. [`BlankLinePadder`] separates declarations with blank lines, using the
//!    links from step 2 to decide what is already separated.
//!
//! [`LayoutService::run`] executes the three in order inside one document
//! transaction, so a failure leaves the buffer untouched.
//!
//! [`Document`]: regionize_document::Document

mod cleanup;
mod config;
mod error;
#[cfg(test)]
mod fixture;
mod markers;
mod padding;
mod regions;
mod service;
mod tree;

pub use cleanup::{CleanupReport, RegionCleaner};
pub use config::{LayoutConfig, LineEnding, MarkerPreset, MarkerSyntax, RegionLabels};
pub use error::{ConfigError, LayoutError, Result};
pub use padding::{BlankLinePadder, PaddingReport, should_pad};
pub use regions::{InsertionReport, RegionInserter};
pub use service::{LayoutService, PassReport};
pub use tree::{Decl, DeclId, DeclKind, DeclTag, DeclTree, Parameter, RegionMarker};
