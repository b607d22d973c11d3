use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use super::Rewrite;

/// A single `{% tab title="…" %}…{% endtab %}` child.
static TAB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?s)\{%\s*tab\s+title="([^"]*)"\s*%\}(.*?)\{%\s*endtab\s*%\}"#)
		.expect("tab pattern is valid")
});
static TABS_OPEN_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{%\s*tabs\s*%\}").expect("tabs pattern is valid"));
static TABS_CLOSE_PATTERN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{%\s*endtabs\s*%\}").expect("endtabs pattern is valid"));

pub const TABS_OPEN: &str = "<Tabs>";
pub const TABS_CLOSE: &str = "</Tabs>";

/// Convert `{% tabs %}` groups into `<Tabs>` / `<Tab title="…">` components.
///
/// Children are rewritten before the container markers. The container
/// markers are swapped by plain substitution, so they must not be touched
/// while a child's `{% endtab %}` is still waiting to be matched.
pub fn convert_tabs(text: &str) -> String {
	rewrite(text).text
}

pub(super) fn rewrite(text: &str) -> Rewrite {
	let mut children = 0usize;
	let text = TAB_PATTERN.replace_all(text, |caps: &Captures| {
		children += 1;
		format!("<Tab title=\"{}\">\n{}\n</Tab>", &caps[1], caps[2].trim())
	});

	let groups = TABS_OPEN_PATTERN.find_iter(&text).count();
	let text = TABS_OPEN_PATTERN.replace_all(&text, TABS_OPEN);
	let text = TABS_CLOSE_PATTERN.replace_all(&text, TABS_CLOSE);

	let count = children + groups;
	if count > 0 {
		tracing::debug!(groups, children, "converted tab groups");
	}

	Rewrite::new(text, count)
}
