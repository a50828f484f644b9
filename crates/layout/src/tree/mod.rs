//! Declaration tree.
//!
//! The tree is an arena of [`Decl`] nodes addressed by [`DeclId`]. The
//! external parser builds it once per pass from the current buffer; the
//! engines then only write [`Decl::associated_region`], the region flags, and
//! the list of generated regions. Every node owns its own pair of anchors, so
//! editing around one node never moves another node's boundaries by accident.

use regionize_document::{AnchorId, AnchorState, Bias, Document, Span};
use smallvec::SmallVec;
use strum::Display;
use tracing::trace;

use crate::error::{LayoutError, Result};


/// Index of a node in a [`DeclTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
	/// Returns the arena index.
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

/// Source span of one method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
	/// Anchor before the first char of the parameter text.
	pub start: AnchorId,
	/// Anchor after the last char of the parameter text.
	pub end: AnchorId,
}

impl Parameter {
	/// Anchors a parameter over `span`.
	pub fn anchored(doc: &mut Document, span: Span) -> Result<Self> {
		Ok(Self {
			start: doc.create_anchor(span.start, Bias::Right)?,
			end: doc.create_anchor(span.end, Bias::Left)?,
		})
	}

	/// Reads the parameter text from the buffer.
	pub fn text(&self, doc: &Document) -> Result<String> {
		Ok(doc.text_between(self.start, self.end)?)
	}
}

/// State carried by a region node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionMarker {
	/// Text embedded in the opening marker.
	pub label: String,
	/// Set once the markers were removed from the buffer.
	pub invalidated: bool,
	/// Set on regions that wrap an overload group rather than one member.
	pub pseudo_group: bool,
}

impl RegionMarker {
	/// A fresh region labelled `label`.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			..Self::default()
		}
	}
}

/// What a declaration is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
	/// A namespace-like scope.
	Namespace {
		/// Members in document order.
		children: Vec<DeclId>,
	},
	/// A class, struct or record.
	Class {
		/// Members in document order.
		children: Vec<DeclId>,
	},
	/// An interface.
	Interface {
		/// Members in document order.
		children: Vec<DeclId>,
	},
	/// A method; the parameters label overloads.
	Method {
		/// Parameters in declaration order.
		parameters: SmallVec<[Parameter; 4]>,
	},
	/// A property.
	Property,
	/// A field.
	Field,
	/// A constructor.
	Constructor,
	/// A constant declaration.
	Constants,
	/// A region marker pair.
	Region(RegionMarker),
}

/// Fieldless mirror of [`DeclKind`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclTag {
	Namespace,
	Class,
	Interface,
	Method,
	Property,
	Field,
	Constructor,
	Constants,
	Region,
}

impl DeclKind {
	/// An empty namespace.
	pub const fn namespace() -> Self {
		Self::Namespace { children: Vec::new() }
	}

	/// An empty class.
	pub const fn class() -> Self {
		Self::Class { children: Vec::new() }
	}

	/// An empty interface.
	pub const fn interface() -> Self {
		Self::Interface { children: Vec::new() }
	}

	/// A method without parameters.
	pub fn method() -> Self {
		Self::Method {
			parameters: SmallVec::new(),
		}
	}

	/// Returns the tag of this kind.
	pub const fn tag(&self) -> DeclTag {
		match self {
			Self::Namespace { .. } => DeclTag::Namespace,
			Self::Class { .. } => DeclTag::Class,
			Self::Interface { .. } => DeclTag::Interface,
			Self::Method { .. } => DeclTag::Method,
			Self::Property => DeclTag::Property,
			Self::Field => DeclTag::Field,
			Self::Constructor => DeclTag::Constructor,
			Self::Constants => DeclTag::Constants,
			Self::Region(_) => DeclTag::Region,
		}
	}

	/// Returns the members of a container kind.
	pub fn children(&self) -> &[DeclId] {
		match self {
			Self::Namespace { children } | Self::Class { children } | Self::Interface { children } => children,
			_ => &[],
		}
	}

	fn children_mut(&mut self) -> Option<&mut Vec<DeclId>> {
		match self {
			Self::Namespace { children } | Self::Class { children } | Self::Interface { children } => {
				Some(children)
			}
			_ => None,
		}
	}

	/// Returns true for kinds that own members.
	pub const fn is_container(&self) -> bool {
		matches!(self, Self::Namespace { .. } | Self::Class { .. } | Self::Interface { .. })
	}
}

/// One declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
	/// What the declaration is.
	pub kind: DeclKind,
	/// Identifier; empty for regions.
	pub name: String,
	/// Anchor at the first char of the declaration, biased right.
	pub start: AnchorId,
	/// Anchor after the last char of the declaration, biased left.
	pub end: AnchorId,
	/// Region created around this declaration in the current pass.
	pub associated_region: Option<DeclId>,
	/// Innermost generated region wrapping this node's outermost extent.
	pub(crate) envelope: Option<DeclId>,
}

impl Decl {
	/// A declaration bounded by existing anchors.
	pub fn new(kind: DeclKind, name: impl Into<String>, start: AnchorId, end: AnchorId) -> Self {
		Self {
			kind,
			name: name.into(),
			start,
			end,
			associated_region: None,
			envelope: None,
		}
	}

	/// A declaration over `span`, with fresh anchors in `doc`.
	pub fn anchored(doc: &mut Document, kind: DeclKind, name: impl Into<String>, span: Span) -> Result<Self> {
		let start = doc.create_anchor(span.start, Bias::Right)?;
		let end = doc.create_anchor(span.end, Bias::Left)?;
		Ok(Self::new(kind, name, start, end))
	}

	/// Returns the kind tag.
	pub const fn tag(&self) -> DeclTag {
		self.kind.tag()
	}

	/// Returns the region state of a region node.
	pub fn region(&self) -> Option<&RegionMarker> {
		match &self.kind {
			DeclKind::Region(marker) => Some(marker),
			_ => None,
		}
	}

	/// Returns true when both anchors still track text.
	pub fn is_materialized(&self, doc: &Document) -> bool {
		let live = |id| matches!(doc.anchor_state(id), Some(AnchorState::Live(_)));
		live(self.start) && live(self.end)
	}

	/// Returns true when the declaration spans more than one line.
	pub fn is_multi_line(&self, doc: &Document) -> Result<bool> {
		Ok(doc.line_of(self.start)? != doc.line_of(self.end)?)
	}

	/// Returns the declaration's extent in the buffer.
	pub fn span(&self, doc: &Document) -> Result<Span> {
		Ok(Span::new(doc.pos(self.start)?, doc.pos(self.end)?))
	}
}

/// Arena of declarations for one pass.
#[derive(Debug, Clone, Default)]
pub struct DeclTree {
	nodes: Vec<Decl>,
	roots: Vec<DeclId>,
	generated: Vec<DeclId>,
}

impl DeclTree {
	/// Creates an empty tree.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `decl` as a top-level node or as the last member of `parent`.
	pub fn push(&mut self, parent: Option<DeclId>, decl: Decl) -> Result<DeclId> {
		let id = self.next_id()?;
		match parent {
			None => self.roots.push(id),
			Some(parent) => {
				let owner = self.node_mut(parent)?;
				let tag = owner.tag();
				let children = owner.kind.children_mut().ok_or_else(|| {
					LayoutError::Invariant(format!("{tag} `{}` cannot own members", owner.name))
				})?;
				children.push(id);
			}
		}
		self.nodes.push(decl);
		Ok(id)
	}

	/// Anchors a declaration over `span` and adds it under `parent`.
	pub fn declare(
		&mut self,
		doc: &mut Document,
		parent: Option<DeclId>,
		kind: DeclKind,
		name: impl Into<String>,
		span: Span,
	) -> Result<DeclId> {
		let decl = Decl::anchored(doc, kind, name, span)?;
		self.push(parent, decl)
	}

	/// Adds a region created during the pass.
	pub(crate) fn push_generated(&mut self, decl: Decl) -> Result<DeclId> {
		let id = self.next_id()?;
		self.nodes.push(decl);
		self.generated.push(id);
		Ok(id)
	}

	fn next_id(&self) -> Result<DeclId> {
		u32::try_from(self.nodes.len())
			.map(DeclId)
			.map_err(|_| LayoutError::Invariant("declaration arena is full".to_string()))
	}

	/// Returns a node, or [`None`] for a foreign id.
	pub fn get(&self, id: DeclId) -> Option<&Decl> {
		self.nodes.get(id.index())
	}

	/// Returns a node.
	pub fn node(&self, id: DeclId) -> Result<&Decl> {
		self.get(id).ok_or(LayoutError::UnknownNode(id))
	}

	/// Returns a node for mutation.
	pub fn node_mut(&mut self, id: DeclId) -> Result<&mut Decl> {
		self.nodes.get_mut(id.index()).ok_or(LayoutError::UnknownNode(id))
	}

	/// Top-level declarations in document order.
	pub fn roots(&self) -> &[DeclId] {
		&self.roots
	}

	/// Regions created by the current pass, in creation order.
	pub fn generated(&self) -> &[DeclId] {
		&self.generated
	}

	/// Number of nodes in the arena.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Returns true if the arena is empty.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Ids of every node reachable from the roots, parents before members.
	pub fn walk(&self) -> Vec<DeclId> {
		let mut order = Vec::with_capacity(self.nodes.len());
		let mut stack: Vec<DeclId> = self.roots.iter().rev().copied().collect();
		while let Some(id) = stack.pop() {
			order.push(id);
			if let Some(decl) = self.get(id) {
				stack.extend(decl.kind.children().iter().rev());
			}
		}
		order
	}

	/// Region nodes found anywhere in the hierarchy.
	pub fn regions(&self) -> Vec<DeclId> {
		self.walk()
			.into_iter()
			.filter(|&id| self.get(id).is_some_and(|decl| decl.region().is_some()))
			.collect()
	}

	/// Removes region nodes from the hierarchy, leaving only declarations.
	///
	/// The nodes stay in the arena so ids held elsewhere remain valid.
	pub fn detach_regions(&mut self) {
		let is_region = |nodes: &[Decl], id: DeclId| {
			nodes
				.get(id.index())
				.is_some_and(|decl| matches!(decl.kind, DeclKind::Region(_)))
		};

		let nodes = self.nodes.as_slice();
		self.roots.retain(|&id| !is_region(nodes, id));

		for index in 0..self.nodes.len() {
			let Some(children) = self.nodes[index].kind.children_mut() else {
				continue;
			};
			let mut kept = std::mem::take(children);
			kept.retain(|&id| !is_region(self.nodes.as_slice(), id));
			if let Some(children) = self.nodes[index].kind.children_mut() {
				*children = kept;
			}
		}
	}

	/// Follows generated wraps outward from `id`.
	///
	/// Returns the node whose anchors bound everything already wrapped around
	/// `id`, which is where the next enclosing marker must go.
	pub fn outermost(&self, id: DeclId) -> DeclId {
		let mut current = id;
		while let Some(next) = self.get(current).and_then(|decl| decl.envelope) {
			current = next;
		}
		current
	}

	pub(crate) fn set_envelope(&mut self, id: DeclId, region: DeclId) -> Result<()> {
		let outer = self.outermost(id);
		if outer != region {
			self.node_mut(outer)?.envelope = Some(region);
		}
		Ok(())
	}

	/// Checks that the tree is consistent with the buffer.
	///
	/// Materialized nodes must not end before they start, every member id must
	/// exist and belong to exactly one parent, and interfaces may only hold
	/// members an interface can declare.
	pub fn validate(&self, doc: &Document) -> Result<()> {
		let mut seen = vec![false; self.nodes.len()];

		let mut stack: Vec<DeclId> = self.roots.clone();
		while let Some(id) = stack.pop() {
			let decl = self.node(id)?;
			if std::mem::replace(&mut seen[id.index()], true) {
				return Err(LayoutError::Invariant(format!(
					"{} `{}` is reachable more than once",
					decl.tag(),
					decl.name
				)));
			}

			if decl.is_materialized(doc) {
				let start = doc.line_of(decl.start)?;
				let end = doc.line_of(decl.end)?;
				if start > end || doc.pos(decl.start)? > doc.pos(decl.end)? {
					return Err(LayoutError::InvertedExtent {
						kind: decl.tag(),
						name: decl.name.clone(),
						start,
						end,
					});
				}
			} else {
				trace!(kind = %decl.tag(), name = %decl.name, "declaration not materialized");
			}

			if let DeclKind::Interface { children } = &decl.kind {
				for &child in children {
					let member = self.node(child)?;
					if matches!(
						member.kind,
						DeclKind::Field | DeclKind::Constructor | DeclKind::Constants | DeclKind::Namespace { .. }
					) {
						return Err(LayoutError::Invariant(format!(
							"interface `{}` declares {} `{}`",
							decl.name,
							member.tag(),
							member.name
						)));
					}
				}
			}

			stack.extend(decl.kind.children());
		}
		Ok(())
	}
}
