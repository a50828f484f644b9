//! Layout configuration and the region label source.
//!
//! Everything is optional in TOML form; an empty file yields C# markers,
//! the stock block labels and LF line endings:
//!
//! ```toml
//! line_ending = "crlf"
//! markers = "visual_basic"
//!
//! [labels]
//! methods = "Operations"
//! class = "{name}"
//! ```
//!
//! `markers` also accepts a custom pair:
//!
//! ```toml
//! [markers]
//! open = "// region {label}"
//! close = "// endregion"
//! ```

use std::path::Path;

use serde::Deserialize;
use strum::Display;

use crate::error::ConfigError;


/// Placeholder replaced by the region label in an opening template.
const LABEL_SLOT: &str = "{label}";

/// Placeholder replaced by a declaration name in label templates.
const NAME_SLOT: &str = "{name}";

/// Settings for one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
	/// How region markers are written and recognised.
	pub markers: MarkerSyntax,
	/// Label texts for generated regions.
	pub labels: RegionLabels,
	/// Line break inserted by every edit.
	pub line_ending: LineEnding,
}

impl LayoutConfig {
	/// Parses a TOML document into a [`LayoutConfig`].
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Loads configuration from a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::from_toml_str(&content)
	}
}

/// Line break style.
#[derive(Debug, Default, Display, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LineEnding {
	/// `\n`
	#[default]
	Lf,
	/// `\r\n`
	Crlf,
}

impl LineEnding {
	/// Returns the line break characters.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Lf => "\n",
			Self::Crlf => "\r\n",
		}
	}
}

/// Built-in marker syntaxes.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MarkerPreset {
	/// `#region {label}` / `#endregion`
	Csharp,
	/// `#Region "{label}"` / `#End Region`
	VisualBasic,
	/// `#pragma region {label}` / `#pragma endregion`
	Cpp,
}

/// Opening template and closing text of a region marker pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "MarkerSetting")]
pub struct MarkerSyntax {
	open: String,
	close: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MarkerSetting {
	Preset(MarkerPreset),
	Custom { open: String, close: String },
}

impl TryFrom<MarkerSetting> for MarkerSyntax {
	type Error = String;

	fn try_from(setting: MarkerSetting) -> Result<Self, Self::Error> {
		match setting {
			MarkerSetting::Preset(preset) => Ok(Self::preset(preset)),
			MarkerSetting::Custom { open, close } => Self::custom(open, close),
		}
	}
}

impl Default for MarkerSyntax {
	fn default() -> Self {
		Self::preset(MarkerPreset::Csharp)
	}
}

impl MarkerSyntax {
	/// Returns the syntax of a built-in preset.
	pub fn preset(preset: MarkerPreset) -> Self {
		let (open, close) = match preset {
			MarkerPreset::Csharp => ("#region {label}", "#endregion"),
			MarkerPreset::VisualBasic => ("#Region \"{label}\"", "#End Region"),
			MarkerPreset::Cpp => ("#pragma region {label}", "#pragma endregion"),
		};
		Self {
			open: open.to_string(),
			close: close.to_string(),
		}
	}

	/// Builds a custom syntax. `open` must contain `{label}` exactly once and
	/// neither part may be blank or start the other.
	pub fn custom(open: impl Into<String>, close: impl Into<String>) -> Result<Self, String> {
		let open = open.into().trim().to_string();
		let close = close.into().trim().to_string();
		if open.matches(LABEL_SLOT).count() != 1 {
			return Err(format!("opening marker `{open}` must contain {LABEL_SLOT} exactly once"));
		}
		if close.is_empty() {
			return Err("closing marker must not be empty".to_string());
		}
		let syntax = Self { open, close };
		if syntax.open_prefix().is_empty() {
			return Err(format!("opening marker `{}` must not start with {LABEL_SLOT}", syntax.open));
		}
		if syntax.close.starts_with(syntax.open_prefix()) || syntax.open_prefix().starts_with(&syntax.close) {
			return Err(format!(
				"markers `{}` and `{}` cannot be told apart",
				syntax.open, syntax.close
			));
		}
		Ok(syntax)
	}

	/// Renders the opening marker for `label`.
	pub fn render_open(&self, label: &str) -> String {
		self.open.replacen(LABEL_SLOT, label, 1)
	}

	/// Returns the closing marker text.
	pub fn render_close(&self) -> &str {
		&self.close
	}

	/// Returns true if `line` holds an opening marker.
	pub fn is_open_marker(&self, line: &str) -> bool {
		self.parse_label(line).is_some()
	}

	/// Returns true if `line` holds a closing marker.
	pub fn is_close_marker(&self, line: &str) -> bool {
		line.trim() == self.close
	}

	/// Returns true if `line` holds either marker.
	pub fn is_marker(&self, line: &str) -> bool {
		self.is_open_marker(line) || self.is_close_marker(line)
	}

	/// Extracts the label from an opening marker line.
	pub fn parse_label(&self, line: &str) -> Option<String> {
		let (prefix, suffix) = self.open.split_once(LABEL_SLOT)?;
		let rest = line.trim().strip_prefix(prefix.trim_end())?;
		// `#regionX` is not a marker when the template separates with a space
		if prefix.ends_with(char::is_whitespace) && !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
			return None;
		}
		let rest = rest.trim_start();
		let label = rest.strip_suffix(suffix).unwrap_or(rest);
		Some(label.trim_end().to_string())
	}

	fn open_prefix(&self) -> &str {
		self.open.split_once(LABEL_SLOT).map_or("", |(prefix, _)| prefix.trim_end())
	}
}

/// Label templates for generated regions.
///
/// `class` and `overload_group` may contain `{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionLabels {
	/// Block of fields.
	pub class_variables: String,
	/// Block of constructors.
	pub constructors: String,
	/// Block of methods.
	pub methods: String,
	/// Block of properties.
	pub properties: String,
	/// Wrap around a whole class.
	pub class: String,
	/// Wrap around every member sharing a name.
	pub overload_group: String,
}

impl Default for RegionLabels {
	fn default() -> Self {
		Self {
			class_variables: "Class Variables".to_string(),
			constructors: "Constructors".to_string(),
			methods: "Methods".to_string(),
			properties: "Properties".to_string(),
			class: ": {name} :".to_string(),
			overload_group: "{name}...".to_string(),
		}
	}
}

impl RegionLabels {
	/// Label of the region around class `name`.
	pub fn class_label(&self, name: &str) -> String {
		self.class.replace(NAME_SLOT, name)
	}

	/// Label of the region around all members called `name`.
	pub fn group_label(&self, name: &str) -> String {
		self.overload_group.replace(NAME_SLOT, name)
	}
}
