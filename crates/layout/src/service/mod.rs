//! The layout pass.

use regionize_document::{CommitResult, Document};
use tracing::{debug, trace_span};

use crate::cleanup::{CleanupReport, RegionCleaner};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::padding::{BlankLinePadder, PaddingReport};
use crate::regions::{InsertionReport, RegionInserter};
use crate::tree::DeclTree;


/// Outcome of [`LayoutService::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
	/// What the cleanup step removed.
	pub removed: CleanupReport,
	/// What the insertion step wrote.
	pub added: InsertionReport,
	/// What the padding step wrote.
	pub paddings: PaddingReport,
	/// The committed edit group.
	pub commit: CommitResult,
}

/// Runs layout passes with one configuration.
///
/// Constructed once by the caller and handed to whatever triggers a pass.
#[derive(Debug, Clone, Default)]
pub struct LayoutService {
	config: LayoutConfig,
}

impl LayoutService {
	/// Creates a service using `config`.
	pub fn new(config: LayoutConfig) -> Self {
		Self { config }
	}

	/// Returns the configuration.
	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// Removes every region found in `tree`.
	pub fn cleanup(&self, doc: &mut Document, tree: &mut DeclTree) -> Result<CleanupReport> {
		RegionCleaner::new(&self.config).cleanup(doc, tree)
	}

	/// Writes member, block and class regions.
	pub fn insert_regions(&self, doc: &mut Document, tree: &mut DeclTree) -> Result<InsertionReport> {
		RegionInserter::new(&self.config).insert_regions(doc, tree)
	}

	/// Writes blank-line padding.
	pub fn insert_paddings(&self, doc: &mut Document, tree: &DeclTree) -> Result<PaddingReport> {
		BlankLinePadder::new(&self.config).insert_paddings(doc, tree)
	}

	/// Runs cleanup, insertion and padding as one undoable edit group.
	///
	/// The tree is validated first. On any failure the buffer and the tree are
	/// left exactly as they were and the error is returned.
	pub fn run(&self, doc: &mut Document, tree: &mut DeclTree) -> Result<PassReport> {
		let _span = trace_span!("layout_pass", version = doc.version()).entered();
		tree.validate(doc)?;

		let snapshot = tree.clone();
		let outcome = doc.transact(|doc| -> Result<_> {
			let removed = self.cleanup(doc, tree)?;
			let added = self.insert_regions(doc, tree)?;
			let paddings = self.insert_paddings(doc, tree)?;
			Ok((removed, added, paddings))
		});

		let ((removed, added, paddings), commit) = match outcome {
			Ok(done) => done,
			Err(err) => {
				*tree = snapshot;
				debug!(error = %err, "layout pass rolled back");
				return Err(err);
			}
		};

		debug!(
			removed = removed.removed,
			added = added.total(),
			paddings = paddings.inserted,
			version = commit.version_after,
			"layout pass committed"
		);
		Ok(PassReport {
			removed,
			added,
			paddings,
			commit,
		})
	}
}

impl From<LayoutConfig> for LayoutService {
	fn from(config: LayoutConfig) -> Self {
		Self::new(config)
	}
}
