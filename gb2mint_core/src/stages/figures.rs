use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use super::Rewrite;

/// `<figure><img src alt><figcaption>[<p>caption</p>]</figcaption></figure>`
/// as written by GitBook exports.
static FIGURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r#"(?s)<figure>\s*<img src="([^"]+)" alt="([^"]*)">\s*<figcaption>(?:<p>(.*?)</p>)?</figcaption>\s*</figure>"#,
	)
	.expect("figure pattern is valid")
});

/// Convert exported `<figure>` images into markdown images. The caption, if
/// any, becomes the alt text; the original `alt` attribute is dropped.
pub fn convert_figures(text: &str) -> String {
	rewrite(text).text
}

pub(super) fn rewrite(text: &str) -> Rewrite {
	let mut count = 0usize;
	let output = FIGURE_PATTERN.replace_all(text, |caps: &Captures| {
		count += 1;
		let caption = caps.get(3).map_or("", |caption| caption.as_str().trim());
		format!("![{caption}]({})", &caps[1])
	});

	if count > 0 {
		tracing::debug!(count, "converted figures");
	}

	Rewrite::new(output, count)
}
