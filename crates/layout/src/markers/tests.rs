use pretty_assertions::assert_eq;
use regionize_document::{Bias, Document};
use rstest::rstest;

use super::*;
use crate::config::{LayoutConfig, LineEnding, MarkerPreset};

fn anchor_before(doc: &mut Document, needle: &str) -> AnchorId {
	let pos = doc.text().find(needle).unwrap();
	let pos = doc.content().byte_to_char(pos);
	doc.create_anchor(pos, Bias::Right).unwrap()
}

fn anchor_after(doc: &mut Document, needle: &str) -> AnchorId {
	let pos = doc.text().find(needle).unwrap() + needle.len();
	let pos = doc.content().byte_to_char(pos);
	doc.create_anchor(pos, Bias::Left).unwrap()
}

#[test]
fn opening_marker_hugs_scope_brace() {
	let config = LayoutConfig::default();
	let mut doc = Document::new("class A\n{\n    void Foo()\n    {\n    }\n}\n");
	let at = anchor_before(&mut doc, "void Foo");

	let marker = MarkerWriter::new(&config).open(&mut doc, "Foo", at).unwrap();

	assert_eq!(
		doc.text(),
		"class A\n{\n    #region Foo\n    void Foo()\n    {\n    }\n}\n"
	);
	assert_eq!(doc.line_of(marker).unwrap(), 2);
	assert_eq!(doc.column_of(marker).unwrap(), 0);
	assert_eq!(doc.line_of(at).unwrap(), 3);
}

#[rstest]
#[case::adds_missing_blank("    int a;\n    void Foo();\n")]
#[case::keeps_single_blank("    int a;\n\n    void Foo();\n")]
#[case::collapses_blank_run("    int a;\n\n  \n\n    void Foo();\n")]
fn opening_marker_gets_one_blank_line_after_statement(#[case] text: &str) {
	let config = LayoutConfig::default();
	let mut doc = Document::new(text);
	let at = anchor_before(&mut doc, "void Foo");

	MarkerWriter::new(&config).open(&mut doc, "Foo", at).unwrap();

	assert_eq!(doc.text(), "    int a;\n\n    #region Foo\n    void Foo();\n");
}

#[test]
fn opening_marker_after_opening_marker_has_no_gap() {
	let config = LayoutConfig::default();
	let mut doc = Document::new("    #region Methods\n\n    void Foo();\n");
	let at = anchor_before(&mut doc, "void Foo");

	MarkerWriter::new(&config).open(&mut doc, "Foo", at).unwrap();

	assert_eq!(doc.text(), "    #region Methods\n    #region Foo\n    void Foo();\n");
}

#[test]
fn opening_marker_at_start_of_file_drops_leading_blanks() {
	let config = LayoutConfig::default();
	let mut doc = Document::new("\n\nclass A\n{\n}\n");
	let at = anchor_before(&mut doc, "class A");

	MarkerWriter::new(&config).open(&mut doc, ": A :", at).unwrap();

	assert_eq!(doc.text(), "#region : A :\nclass A\n{\n}\n");
}

#[test]
fn opening_marker_splits_shared_line() {
	let config = LayoutConfig::default();
	let mut doc = Document::new("    int a; int b;\n");
	let a_end = anchor_after(&mut doc, "int a;");
	let at = anchor_before(&mut doc, "int b");

	MarkerWriter::new(&config).open(&mut doc, "B", at).unwrap();

	assert_eq!(doc.text(), "    int a;\n\n    #region B\n    int b;\n");
	assert_eq!(doc.line_of(a_end).unwrap(), 0);
	assert_eq!(doc.column_of(at).unwrap(), 4);
}

#[test]
fn closing_marker_leaves_blank_before_next_member() {
	let config = LayoutConfig::default();
	let mut doc = Document::new("    void Foo()\n    {\n    }\n    void Bar();\n");
	let at = anchor_after(&mut doc, "    }");

	let end = MarkerWriter::new(&config).close(&mut doc, at).unwrap();

	assert_eq!(doc.text(), "    void Foo()\n    {\n    }\n    #endregion\n\n    void Bar();\n");
	assert_eq!(doc.line_of(end).unwrap(), 3);
	assert_eq!(doc.column_of(end).unwrap(), 14);
	assert_eq!(doc.line_of(at).unwrap(), 2);
}

#[test]
fn closing_marker_hugs_scope_end() {
	let config = LayoutConfig::default();
	let mut doc = Document::new("    }\n\n\n}\n");
	let at = anchor_after(&mut doc, "    }");

	MarkerWriter::new(&config).close(&mut doc, at).unwrap();

	assert_eq!(doc.text(), "    }\n    #endregion\n}\n");
}

#[test]
fn closing_marker_hugs_outer_closing_marker() {
	let config = LayoutConfig::default();
	let mut doc = Document::new("    }\n\n    #endregion\n");
	let at = anchor_after(&mut doc, "    }");

	MarkerWriter::new(&config).close(&mut doc, at).unwrap();

	assert_eq!(doc.text(), "    }\n    #endregion\n    #endregion\n");
}

#[rstest]
#[case::without_final_newline("}")]
#[case::with_final_newline("}\n")]
#[case::with_trailing_blanks("}\n\n \n")]
fn closing_marker_at_end_of_file_ends_with_one_newline(#[case] text: &str) {
	let config = LayoutConfig::default();
	let mut doc = Document::new(text);
	let at = anchor_after(&mut doc, "}");

	MarkerWriter::new(&config).close(&mut doc, at).unwrap();

	assert_eq!(doc.text(), "}\n#endregion\n");
}

#[test]
fn closing_marker_moves_trailing_text_down() {
	let config = LayoutConfig::default();
	let mut doc = Document::new("    int a; int b;\n}\n");
	let at = anchor_after(&mut doc, "int a;");
	let b = anchor_before(&mut doc, "int b");

	MarkerWriter::new(&config).close(&mut doc, at).unwrap();

	assert_eq!(doc.text(), "    int a;\n    #endregion\n\n    int b;\n}\n");
	assert_eq!(doc.line_of(b).unwrap(), 3);
}

#[rstest]
#[case(MarkerPreset::Csharp, "  #region Foo", "  #endregion")]
#[case(MarkerPreset::VisualBasic, "  #Region \"Foo\"", "  #End Region")]
#[case(MarkerPreset::Cpp, "  #pragma region Foo", "  #pragma endregion")]
fn markers_follow_configured_syntax(#[case] preset: MarkerPreset, #[case] open: &str, #[case] close: &str) {
	let config = LayoutConfig {
		markers: MarkerSyntax::preset(preset),
		..LayoutConfig::default()
	};
	let mut doc = Document::new("{\n  Foo\n}\n");
	let start = anchor_before(&mut doc, "Foo");
	let end = anchor_after(&mut doc, "Foo");
	let writer = MarkerWriter::new(&config);

	writer.open(&mut doc, "Foo", start).unwrap();
	writer.close(&mut doc, end).unwrap();

	assert_eq!(doc.text(), format!("{{\n{open}\n  Foo\n{close}\n}}\n"));
}

#[test]
fn crlf_line_endings_are_used_for_new_lines() {
	let config = LayoutConfig {
		line_ending: LineEnding::Crlf,
		..LayoutConfig::default()
	};
	let mut doc = Document::new("{\r\n  int a;\r\n  int b;\r\n}\r\n");
	let start = anchor_before(&mut doc, "int a");
	let end = anchor_after(&mut doc, "int a;");
	let writer = MarkerWriter::new(&config);

	writer.open(&mut doc, "A", start).unwrap();
	writer.close(&mut doc, end).unwrap();

	assert_eq!(
		doc.text(),
		"{\r\n  #region A\r\n  int a;\r\n  #endregion\r\n\r\n  int b;\r\n}\r\n"
	);
}

#[test]
fn brace_helpers() {
	assert!(opens_scope("class A {"));
	assert!(opens_scope("    {"));
	assert!(!opens_scope("    int a;"));
	assert!(closes_scope("    };"));
	assert!(!closes_scope("    int a; }"));
}
