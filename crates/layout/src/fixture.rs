//! Outline scanner for tests.
//!
//! Builds a [`DeclTree`] from a small C#-like subset, one declaration header
//! per line, so tests can re-read a buffer between passes the way an editor
//! would re-parse it.

use regionize_document::{Bias, Document, LineIdx, Span};
use smallvec::SmallVec;

use crate::config::MarkerSyntax;
use crate::tree::{Decl, DeclId, DeclKind, DeclTree, Parameter, RegionMarker};

/// Parses `text` with C# markers.
pub(crate) fn parse(text: &str) -> (Document, DeclTree) {
	parse_with(text, &MarkerSyntax::default())
}

/// Parses `text` with the given marker syntax.
pub(crate) fn parse_with(text: &str, syntax: &MarkerSyntax) -> (Document, DeclTree) {
	let mut doc = Document::new(text);
	let tree = scan(&mut doc, syntax);
	(doc, tree)
}

/// Builds a fresh tree over the current buffer text.
pub(crate) fn scan(doc: &mut Document, syntax: &MarkerSyntax) -> DeclTree {
	let lines = (0..doc.content_line_count())
		.map(|line| doc.line_text(line).unwrap())
		.collect();
	let mut scanner = Scanner {
		doc,
		syntax,
		lines,
		tree: DeclTree::new(),
	};
	scanner.scope(0, None, "");
	scanner.tree
}

/// First node called `name`, parents before members.
pub(crate) fn find(tree: &DeclTree, name: &str) -> DeclId {
	tree.walk()
		.into_iter()
		.find(|&id| tree.get(id).is_some_and(|decl| decl.name == name))
		.unwrap_or_else(|| panic!("no declaration named {name}"))
}

/// `(label, opening line, closing line)` of every region in the tree.
pub(crate) fn region_outline(doc: &Document, tree: &DeclTree) -> Vec<(String, LineIdx, LineIdx)> {
	let mut outline: Vec<_> = tree
		.regions()
		.into_iter()
		.map(|id| {
			let decl = tree.get(id).unwrap();
			(
				decl.region().unwrap().label.clone(),
				doc.line_of(decl.start).unwrap(),
				doc.line_of(decl.end).unwrap(),
			)
		})
		.collect();
	outline.sort_by_key(|(_, start, _)| *start);
	outline
}

struct Scanner<'a> {
	doc: &'a mut Document,
	syntax: &'a MarkerSyntax,
	lines: Vec<String>,
	tree: DeclTree,
}

impl Scanner<'_> {
	/// Reads members until the `}` closing the scope; returns that line.
	fn scope(&mut self, mut line: LineIdx, parent: Option<DeclId>, owner: &str) -> LineIdx {
		let mut open_markers = Vec::new();
		while line < self.lines.len() {
			let text = self.lines[line].trim().to_string();
			if text.is_empty() || text == "{" || text.starts_with("//") || text.starts_with("using ") {
				line += 1;
			} else if self.syntax.is_open_marker(&text) {
				open_markers.push(line);
				line += 1;
			} else if self.syntax.is_close_marker(&text) {
				if let Some(open) = open_markers.pop() {
					self.region(parent, open, line);
				}
				line += 1;
			} else if text.starts_with('}') {
				return line;
			} else {
				line = self.declaration(line, parent, owner);
			}
		}
		line
	}

	fn region(&mut self, parent: Option<DeclId>, open: LineIdx, close: LineIdx) {
		let label = self.syntax.parse_label(&self.lines[open]).unwrap();
		let start = self.doc.line_start(open).unwrap();
		let start = self.doc.create_anchor(start, Bias::Right).unwrap();
		let end = self.doc.create_anchor(self.content_end(close), Bias::Left).unwrap();
		let decl = Decl::new(DeclKind::Region(RegionMarker::new(label)), "", start, end);
		self.tree.push(parent, decl).unwrap();
	}

	/// Adds the declaration whose header is on `line`; returns the next line.
	fn declaration(&mut self, line: LineIdx, parent: Option<DeclId>, owner: &str) -> LineIdx {
		let text = self.lines[line].trim().to_string();
		let words: Vec<&str> = text
			.split(|c: char| c.is_whitespace() || matches!(c, '{' | ':' | '<'))
			.filter(|word| !word.is_empty())
			.collect();

		let container = words
			.iter()
			.position(|word| matches!(*word, "namespace" | "class" | "struct" | "interface"));
		if let Some(keyword) = container.filter(|_| !text.contains('(')) {
			let name = words.get(keyword + 1).copied().unwrap_or_default().to_string();
			let kind = match words[keyword] {
				"namespace" => DeclKind::namespace(),
				"interface" => DeclKind::interface(),
				_ => DeclKind::class(),
			};
			return self.container(line, parent, kind, name);
		}

		let last = self.member_end(line);
		let span = Span::new(self.content_start(line), self.content_end(last));
		let paren = text.find('(');
		let is_method = paren.is_some_and(|paren| text.find('=').is_none_or(|eq| eq > paren));

		let (kind, name) = if words.contains(&"const") {
			(DeclKind::Constants, declared_name(&text))
		} else if is_method {
			let head = &text[..paren.unwrap_or_default()];
			let name = head
				.split_whitespace()
				.last()
				.unwrap_or_default()
				.split('<')
				.next()
				.unwrap_or_default()
				.to_string();
			if name == owner {
				(DeclKind::Constructor, name)
			} else {
				let parameters = self.parameters(line);
				(DeclKind::Method { parameters }, name)
			}
		} else if text.ends_with(';') && !text.contains("=>") {
			(DeclKind::Field, declared_name(&text))
		} else {
			(DeclKind::Property, declared_name(&text))
		};

		self.tree.declare(self.doc, parent, kind, name, span).unwrap();
		last + 1
	}

	fn container(&mut self, line: LineIdx, parent: Option<DeclId>, kind: DeclKind, name: String) -> LineIdx {
		let text = self.lines[line].trim().to_string();
		let start = self.doc.create_anchor(self.content_start(line), Bias::Right).unwrap();
		let id = self.tree.push(parent, Decl::new(kind, name.clone(), start, start)).unwrap();

		let close = if text.contains('{') && text.ends_with('}') {
			line
		} else {
			let body = if text.contains('{') {
				line + 1
			} else {
				(line + 1..self.lines.len())
					.find(|&next| self.lines[next].trim_start().starts_with('{'))
					.map_or(self.lines.len(), |brace| brace + 1)
			};
			self.scope(body, Some(id), &name).min(self.lines.len() - 1)
		};

		let end = self.doc.create_anchor(self.content_end(close), Bias::Left).unwrap();
		self.tree.node_mut(id).unwrap().end = end;
		close + 1
	}

	/// Last line of the member starting on `line`.
	fn member_end(&self, line: LineIdx) -> LineIdx {
		let mut depth = 0i32;
		let mut opened = false;
		for current in line..self.lines.len() {
			let text = &self.lines[current];
			for c in text.chars() {
				match c {
					'{' => {
						depth += 1;
						opened = true;
					}
					'}' => depth -= 1,
					_ => {}
				}
			}
			if opened && depth <= 0 {
				return current;
			}
			if !opened && text.trim_end().ends_with(';') {
				return current;
			}
		}
		self.lines.len() - 1
	}

	fn parameters(&mut self, line: LineIdx) -> SmallVec<[Parameter; 4]> {
		let chars: Vec<char> = self.lines[line].chars().collect();
		let line_start = self.doc.line_start(line).unwrap();
		let Some(open) = chars.iter().position(|&c| c == '(') else {
			return SmallVec::new();
		};
		let close = chars[open..]
			.iter()
			.position(|&c| c == ')')
			.map_or(chars.len(), |offset| open + offset);

		let mut parameters = SmallVec::new();
		let mut segment_start = open + 1;
		for index in open + 1..=close {
			if index < close && chars[index] != ',' {
				continue;
			}
			let segment = &chars[segment_start..index];
			let lead = segment.iter().take_while(|c| c.is_whitespace()).count();
			let trail = segment.iter().rev().take_while(|c| c.is_whitespace()).count();
			if lead < segment.len() {
				let span = Span::new(line_start + segment_start + lead, line_start + index - trail);
				parameters.push(Parameter::anchored(self.doc, span).unwrap());
			}
			segment_start = index + 1;
		}
		parameters
	}

	fn content_start(&self, line: LineIdx) -> usize {
		let text = &self.lines[line];
		let indent = text.chars().take_while(|c| c.is_whitespace()).count();
		self.doc.line_start(line).unwrap() + indent
	}

	fn content_end(&self, line: LineIdx) -> usize {
		self.doc.line_start(line).unwrap() + self.lines[line].trim_end().chars().count()
	}
}

/// Identifier of a field, property or constant header.
fn declared_name(text: &str) -> String {
	let head = text
		.split(['{', '=', ';'])
		.next()
		.unwrap_or_default();
	head.split_whitespace().last().unwrap_or_default().to_string()
}
