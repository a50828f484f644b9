use pretty_assertions::assert_eq;
use regionize_document::{Document, Span};

use super::*;
use crate::fixture::{find, parse, region_outline};
use crate::tree::RegionMarker;

fn region_labelled(tree: &DeclTree, label: &str) -> DeclId {
	tree.regions()
		.into_iter()
		.find(|&id| tree.get(id).and_then(Decl::region).is_some_and(|marker| marker.label == label))
		.unwrap()
}

fn numbered_fields(lines: &mut Vec<String>, until: usize) {
	while lines.len() < until {
		lines.push(format!("    int f{};", lines.len()));
	}
}

#[test]
fn removing_later_region_leaves_earlier_anchors_alone() {
	let mut lines = vec!["class A".to_string(), "{".to_string()];
	numbered_fields(&mut lines, 10);
	lines.extend(["    #region One", "    int one;", "    #endregion"].map(String::from));
	numbered_fields(&mut lines, 20);
	lines.extend(["    #region Two", "    int two;", "    #endregion", "}"].map(String::from));
	let (mut doc, mut tree) = parse(&(lines.join("\n") + "\n"));

	let one = region_labelled(&tree, "One");
	let two = region_labelled(&tree, "Two");
	let (one_start, one_end) = {
		let decl = tree.node(one).unwrap();
		(decl.start, decl.end)
	};
	let before = (doc.pos(one_start).unwrap(), doc.pos(one_end).unwrap());
	assert_eq!(doc.line_of(one_start).unwrap(), 10);
	assert_eq!(doc.line_of(one_end).unwrap(), 12);

	let config = LayoutConfig::default();
	assert!(RegionCleaner::new(&config).remove_region(&mut doc, &mut tree, two).unwrap());

	assert_eq!((doc.pos(one_start).unwrap(), doc.pos(one_end).unwrap()), before);
	assert_eq!(doc.line_of(one_start).unwrap(), 10);
	assert_eq!(doc.line_of(one_end).unwrap(), 12);
	assert_eq!(doc.line_text(20).unwrap(), "");
	assert_eq!(doc.line_text(21).unwrap(), "    int two;");
	assert_eq!(doc.line_text(22).unwrap(), "");
}

#[test]
fn cleanup_strips_nested_regions_and_leaves_placeholders() {
	let text = "\
class A
{
    #region Methods
    #region Foo
    void Foo()
    {
    }
    #endregion

    #region Bar
    void Bar()
    {
    }
    #endregion
    #endregion
}
";
	let (mut doc, mut tree) = parse(text);
	let regions = tree.regions();
	assert_eq!(regions.len(), 3);

	let config = LayoutConfig::default();
	let report = RegionCleaner::new(&config).cleanup(&mut doc, &mut tree).unwrap();

	assert_eq!(report, CleanupReport { removed: 3, skipped: 0 });
	assert_eq!(
		doc.text(),
		"\
class A
{

    void Foo()
    {
    }

    void Bar()
    {
    }

}
"
	);
	assert!(tree.regions().is_empty());
	let class = find(&tree, "A");
	assert_eq!(tree.node(class).unwrap().kind.children().len(), 2);
	for id in regions {
		let marker = tree.node(id).unwrap().region().unwrap();
		assert!(marker.invalidated, "{} still valid", marker.label);
	}
}

#[test]
fn cleanup_without_regions_is_a_no_op() {
	let (mut doc, mut tree) = parse("class A\n{\n    int a;\n}\n");
	let config = LayoutConfig::default();

	let report = RegionCleaner::new(&config).cleanup(&mut doc, &mut tree).unwrap();

	assert_eq!(report, CleanupReport::default());
	assert_eq!(doc.text(), "class A\n{\n    int a;\n}\n");
	assert_eq!(doc.version(), 0);
}

fn manual_region(doc: &mut Document, tree: &mut DeclTree, marker: RegionMarker) -> DeclId {
	let end = doc.line_content_end(2).unwrap();
	let decl = Decl::anchored(doc, DeclKind::Region(marker), "", Span::new(0, end)).unwrap();
	tree.push(None, decl).unwrap()
}

#[test]
fn pseudo_group_and_invalidated_regions_are_skipped() {
	let text = "#region A\nint a;\n#endregion\n";
	let mut doc = Document::new(text);
	let mut tree = DeclTree::new();
	manual_region(
		&mut doc,
		&mut tree,
		RegionMarker {
			label: "A...".to_string(),
			pseudo_group: true,
			..RegionMarker::default()
		},
	);
	manual_region(
		&mut doc,
		&mut tree,
		RegionMarker {
			label: "A".to_string(),
			invalidated: true,
			..RegionMarker::default()
		},
	);

	let config = LayoutConfig::default();
	let report = RegionCleaner::new(&config).cleanup(&mut doc, &mut tree).unwrap();

	assert_eq!(report, CleanupReport { removed: 0, skipped: 2 });
	assert_eq!(doc.text(), text);
	assert!(tree.roots().is_empty());
}

#[test]
fn region_without_text_is_skipped() {
	let mut doc = Document::new("#region A\nint a;\n#endregion\n");
	let mut tree = DeclTree::new();
	let id = manual_region(&mut doc, &mut tree, RegionMarker::new("A"));
	let start = tree.node(id).unwrap().start;
	doc.release(start);

	let config = LayoutConfig::default();
	let cleaner = RegionCleaner::new(&config);
	assert!(!cleaner.remove_region(&mut doc, &mut tree, id).unwrap());
	assert_eq!(doc.text(), "#region A\nint a;\n#endregion\n");
}

#[test]
fn removed_region_is_not_removed_twice() {
	let (mut doc, mut tree) = parse("#region A\nint a;\n#endregion\nint b;\n");
	let id = region_labelled(&tree, "A");
	let config = LayoutConfig::default();
	let cleaner = RegionCleaner::new(&config);

	assert!(cleaner.remove_region(&mut doc, &mut tree, id).unwrap());
	let once = doc.text();
	assert!(!cleaner.remove_region(&mut doc, &mut tree, id).unwrap());

	assert_eq!(once, "\nint a;\n\nint b;\n");
	assert_eq!(doc.text(), once);
}

#[test]
fn removing_a_declaration_is_an_invariant_error() {
	let (mut doc, mut tree) = parse("class A\n{\n}\n");
	let class = find(&tree, "A");
	let config = LayoutConfig::default();

	let err = RegionCleaner::new(&config)
		.remove_region(&mut doc, &mut tree, class)
		.unwrap_err();
	assert!(matches!(err, LayoutError::Invariant(_)), "{err}");
}

#[test]
fn single_line_region_is_an_invariant_error() {
	let mut doc = Document::new("#region A #endregion\n");
	let mut tree = DeclTree::new();
	let decl = Decl::anchored(&mut doc, DeclKind::Region(RegionMarker::new("A")), "", Span::new(0, 20)).unwrap();
	let id = tree.push(None, decl).unwrap();
	let config = LayoutConfig::default();

	let err = RegionCleaner::new(&config).cleanup(&mut doc, &mut tree).unwrap_err();
	assert!(matches!(err, LayoutError::Invariant(_)), "{err}");
	assert!(!tree.node(id).unwrap().region().unwrap().invalidated);
}

#[test]
fn outline_of_cleaned_tree_is_empty() {
	let (mut doc, mut tree) = parse("#region A\nint a;\n#endregion\n");
	let config = LayoutConfig::default();
	RegionCleaner::new(&config).cleanup(&mut doc, &mut tree).unwrap();
	assert!(region_outline(&doc, &tree).is_empty());
	let anchors_left = doc.anchors().live_count();
	assert_eq!(anchors_left, 2, "only the field anchors remain");
}
