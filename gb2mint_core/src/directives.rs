use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Any `{% name … %}` tag.
static DIRECTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)\{%-?\s*([A-Za-z][A-Za-z0-9_-]*)(.*?)-?%\}").expect("directive pattern is valid")
});

/// A directive tag found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveTag {
	/// The directive name, e.g. `hint`, `endhint`, `content-ref`.
	pub name: String,
	/// The full tag as written.
	pub raw: String,
	/// 1-indexed line number.
	pub line: usize,
	/// 1-indexed column number, counted in characters.
	pub column: usize,
}

impl DirectiveTag {
	/// Whether this is the closing half of a block (`endhint`, `endtabs`, …).
	pub fn is_closing(&self) -> bool {
		self.name.starts_with("end")
	}
}

/// List every `{% … %}` tag in `text`, in document order.
pub fn find_directives(text: &str) -> Vec<DirectiveTag> {
	let mut lines = LineIndex::new(text);
	DIRECTIVE_PATTERN
		.captures_iter(text)
		.filter_map(|caps| {
			let whole = caps.get(0)?;
			let (line, column) = lines.locate(whole.start());
			Some(DirectiveTag {
				name: caps[1].to_string(),
				raw: whole.as_str().to_string(),
				line,
				column,
			})
		})
		.collect()
}

/// Turns byte offsets into line/column pairs. Offsets must be fed in
/// ascending order.
struct LineIndex<'a> {
	text: &'a str,
	line: usize,
	line_start: usize,
	cursor: usize,
}

impl<'a> LineIndex<'a> {
	fn new(text: &'a str) -> Self {
		Self {
			text,
			line: 1,
			line_start: 0,
			cursor: 0,
		}
	}

	fn locate(&mut self, offset: usize) -> (usize, usize) {
		for (index, byte) in self.text.as_bytes()[self.cursor..offset].iter().enumerate() {
			if *byte == b'\n' {
				self.line += 1;
				self.line_start = self.cursor + index + 1;
			}
		}
		self.cursor = offset;
		let column = self.text[self.line_start..offset].chars().count() + 1;
		(self.line, column)
	}
}
