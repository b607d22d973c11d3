use super::Rewrite;

/// Promote the first `# Heading` to a front-matter `title`.
///
/// Headings inside fenced code blocks are ignored. A document that already
/// opens with front matter, or carries a `---` / `title:` / `---` block
/// anywhere outside a fence, is returned unchanged, so running the stage
/// again never picks up a second heading. Titles that YAML would misread are
/// double-quoted.
pub fn convert_title(text: &str) -> String {
	rewrite(text).text
}

pub(super) fn rewrite(text: &str) -> Rewrite {
	if has_front_matter(text) || has_title_block(text) {
		return Rewrite::new(text, 0);
	}

	let Some(heading) = first_heading(text) else {
		return Rewrite::new(text, 0);
	};

	tracing::debug!(title = heading.title, "promoted heading to front matter");

	let mut output = String::with_capacity(text.len() + 16);
	output.push_str(&text[..heading.start]);
	output.push_str("---\ntitle: ");
	output.push_str(&yaml_scalar(heading.title));
	output.push_str("\n---\n");
	output.push_str(&text[heading.end..]);

	Rewrite::new(output, 1)
}

struct Heading<'a> {
	/// Byte offset of the `#`.
	start: usize,
	/// Byte offset of the line's `\n` (or the end of the text).
	end: usize,
	title: &'a str,
}

fn has_front_matter(text: &str) -> bool {
	let first_line = text.lines().next().unwrap_or_default();
	first_line.trim_end() == "---"
}

/// Whether a `---`, `title: …`, `---` run of lines exists outside fences.
fn has_title_block(text: &str) -> bool {
	let mut fence = FenceState::default();
	let mut window: Vec<&str> = Vec::with_capacity(3);

	for line in text.lines() {
		if fence.update(line) {
			window.clear();
			continue;
		}
		if window.len() == 3 {
			window.remove(0);
		}
		window.push(line);

		let titled = matches!(
			window.as_slice(),
			[open, title, close]
				if open.trim_end() == "---" && title.starts_with("title:") && close.trim_end() == "---"
		);
		if titled {
			return true;
		}
	}

	false
}

/// Quote `title` when it holds characters YAML gives meaning to.
fn yaml_scalar(title: &str) -> String {
	let needs_quotes = title.contains([':', '#', '"', '\\'])
		|| title.starts_with([
			'\'', '[', ']', '{', '}', '&', '*', '!', '|', '>', '%', '@', '`', '-', '?', ',',
		]);
	if !needs_quotes {
		return title.to_string();
	}

	let escaped = title.replace('\\', "\\\\").replace('"', "\\\"");
	format!("\"{escaped}\"")
}

fn first_heading(text: &str) -> Option<Heading<'_>> {
	let mut fence = FenceState::default();
	let mut offset = 0;

	for line in text.split_inclusive('\n') {
		let start = offset;
		offset += line.len();
		let content = line.strip_suffix('\n').unwrap_or(line);

		if fence.update(content) {
			continue;
		}

		let Some(rest) = content.strip_prefix('#') else {
			continue;
		};
		if !rest.starts_with([' ', '\t']) {
			continue;
		}

		let title = rest.trim();
		if title.is_empty() {
			continue;
		}

		return Some(Heading {
			start,
			end: start + content.len(),
			title,
		});
	}

	None
}

/// Tracks whether the current line is part of a fenced code block.
#[derive(Debug, Default)]
struct FenceState {
	open: Option<(char, usize)>,
}

impl FenceState {
	/// Feed one line. Returns `true` when the line is a fence marker or sits
	/// inside a fenced block.
	fn update(&mut self, line: &str) -> bool {
		let trimmed = line.trim_start();
		let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~');
		let run = marker.map_or(0, |c| trimmed.chars().take_while(|x| *x == c).count());

		match (self.open, marker) {
			(Some((open_char, open_len)), Some(c)) if c == open_char && run >= open_len => {
				if trimmed[run..].trim().is_empty() {
					self.open = None;
				}
				true
			}
			(Some(_), _) => true,
			(None, Some(c)) if run >= 3 => {
				self.open = Some((c, run));
				true
			}
			(None, _) => false,
		}
	}
}
