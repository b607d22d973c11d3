//! One module per directive family. Every stage is a pure `&str -> String`
//! rewrite: text outside a matched directive is copied through untouched and
//! a directive that does not match its pattern is left as it is.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

pub use figures::convert_figures;
pub use hints::convert_hints;
pub use tabs::TABS_CLOSE;
pub use tabs::TABS_OPEN;
pub use tabs::convert_tabs;
pub use title::convert_title;
pub use videos::FRAME_ALLOW;
pub use videos::FRAME_HEIGHT;
pub use videos::FRAME_WIDTH;
pub use videos::convert_videos;

mod figures;
mod hints;
mod tabs;
mod title;
mod videos;

/// A single conversion stage.
///
/// The declaration order is the canonical execution order. Tabs must follow
/// hints and videos must follow tabs; the supplemental stages run last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
	/// `{% hint style="…" %}` callouts.
	Hints,
	/// `{% tabs %}` groups and their `{% tab title="…" %}` children.
	Tabs,
	/// `{% embed url="…" %}` videos.
	Videos,
	/// HTML `<figure>` images exported by GitBook.
	Figures,
	/// First `# Heading` promoted to a `title` front-matter field.
	Title,
}

impl Stage {
	/// Every stage in canonical order.
	pub const ALL: [Self; 5] = [
		Self::Hints,
		Self::Tabs,
		Self::Videos,
		Self::Figures,
		Self::Title,
	];
	/// Stages enabled when nothing else is configured.
	pub const DEFAULT: [Self; 3] = [Self::Hints, Self::Tabs, Self::Videos];

	/// The name used in config files and reports.
	pub fn name(self) -> &'static str {
		match self {
			Self::Hints => "hints",
			Self::Tabs => "tabs",
			Self::Videos => "videos",
			Self::Figures => "figures",
			Self::Title => "title",
		}
	}

	/// Run this stage over `text`.
	pub fn rewrite(self, text: &str) -> Rewrite {
		match self {
			Self::Hints => hints::rewrite(text),
			Self::Tabs => tabs::rewrite(text),
			Self::Videos => videos::rewrite(text),
			Self::Figures => figures::rewrite(text),
			Self::Title => title::rewrite(text),
		}
	}

	/// Run this stage and keep only the text.
	pub fn apply(self, text: &str) -> String {
		self.rewrite(text).text
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// The output of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
	/// The converted text.
	pub text: String,
	/// Number of directives rewritten. For tab groups every child tab and
	/// every container counts once.
	pub count: usize,
}

impl Rewrite {
	pub(crate) fn new(text: impl Into<String>, count: usize) -> Self {
		Self {
			text: text.into(),
			count,
		}
	}
}
