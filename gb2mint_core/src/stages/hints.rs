use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use super::Rewrite;
use crate::callout::Callout;

/// `{% hint style="…" %}…{% endhint %}`, shortest span, body may cross lines.
static HINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?s)\{%\s*hint\s+style="([^"]*)"\s*%\}(.*?)\{%\s*endhint\s*%\}"#)
		.expect("hint pattern is valid")
});

/// Convert every `{% hint %}` block into the callout component named by its
/// `style` attribute.
///
/// ```
/// use gb2mint_core::convert_hints;
///
/// let output = convert_hints(r#"{% hint style="warning" %}Be careful{% endhint %}"#);
/// assert_eq!(output, "<Warning>Be careful</Warning>");
/// ```
pub fn convert_hints(text: &str) -> String {
	rewrite(text).text
}

pub(super) fn rewrite(text: &str) -> Rewrite {
	let mut count = 0usize;
	let output = HINT_PATTERN.replace_all(text, |caps: &Captures| {
		count += 1;
		let callout = Callout::from_style(&caps[1]);
		render_callout(callout, caps[2].trim())
	});

	if count > 0 {
		tracing::debug!(count, "converted hint blocks");
	}

	Rewrite::new(output, count)
}

/// Single-line bodies stay inline, anything else gets the tags on their own
/// lines.
fn render_callout(callout: Callout, body: &str) -> String {
	let tag = callout.component();
	if body.contains('\n') {
		format!("<{tag}>\n{body}\n</{tag}>")
	} else {
		format!("<{tag}>{body}</{tag}>")
	}
}
