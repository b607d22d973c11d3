use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use super::Rewrite;

static EMBED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"\{%\s*embed\s+url="([^"]+)"\s*%\}"#).expect("embed pattern is valid")
});

/// Permissions granted to every embedded frame.
pub const FRAME_ALLOW: &str =
	"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";
pub const FRAME_WIDTH: &str = "100%";
pub const FRAME_HEIGHT: &str = "315";

/// Convert `{% embed url="…" %}` into an `<iframe>`.
///
/// The url is copied as is, apart from surrounding whitespace. Nothing checks
/// that it is a valid url.
pub fn convert_videos(text: &str) -> String {
	rewrite(text).text
}

pub(super) fn rewrite(text: &str) -> Rewrite {
	let mut count = 0usize;
	let output = EMBED_PATTERN.replace_all(text, |caps: &Captures| {
		count += 1;
		render_frame(caps[1].trim())
	});

	if count > 0 {
		tracing::debug!(count, "converted embeds");
	}

	Rewrite::new(output, count)
}

fn render_frame(url: &str) -> String {
	format!(
		"<iframe\n  src=\"{url}\"\n  width=\"{FRAME_WIDTH}\"\n  height=\"{FRAME_HEIGHT}\"\n  \
		 allow=\"{FRAME_ALLOW}\"\n  allowFullScreen\n></iframe>"
	)
}
