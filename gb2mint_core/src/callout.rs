use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// The callout components a `{% hint %}` block can render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Callout {
	Info,
	Warning,
	Danger,
	Success,
	Note,
	Tip,
	Caution,
}

/// Lower-case `style` attribute values and the component each one renders
/// as. Lookup is case-insensitive; anything missing here falls back to
/// [`Callout::DEFAULT`].
pub const STYLE_TABLE: [(&str, Callout); 7] = [
	("info", Callout::Info),
	("warning", Callout::Warning),
	("danger", Callout::Danger),
	("success", Callout::Success),
	("note", Callout::Note),
	("tip", Callout::Tip),
	("caution", Callout::Caution),
];

impl Callout {
	/// Component used for unrecognised styles.
	pub const DEFAULT: Self = Self::Info;

	/// Resolve a hint's `style` attribute. Never fails.
	pub fn from_style(style: &str) -> Self {
		STYLE_TABLE
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(style))
			.map_or(Self::DEFAULT, |(_, callout)| *callout)
	}

	/// Name of the target component tag.
	pub fn component(self) -> &'static str {
		match self {
			Self::Info => "Info",
			Self::Warning => "Warning",
			Self::Danger => "Danger",
			Self::Success => "Success",
			Self::Note => "Note",
			Self::Tip => "Tip",
			Self::Caution => "Caution",
		}
	}
}

impl fmt::Display for Callout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.component())
	}
}
