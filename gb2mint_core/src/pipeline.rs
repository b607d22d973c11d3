use serde::Serialize;

use crate::stages::Stage;

/// An ordered set of enabled stages.
///
/// Stages always run in canonical [`Stage`] order no matter how they were
/// listed when the pipeline was built: hints, tabs, videos, then the
/// supplemental figure and title stages. Later stages therefore never see
/// source syntax an earlier stage already rewrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
	stages: Vec<Stage>,
}

impl Default for Pipeline {
	fn default() -> Self {
		Self::with_stages(Stage::DEFAULT)
	}
}

impl Pipeline {
	/// Build a pipeline from any selection of stages. Duplicates collapse.
	pub fn with_stages(stages: impl IntoIterator<Item = Stage>) -> Self {
		let mut stages: Vec<Stage> = stages.into_iter().collect();
		stages.sort_unstable();
		stages.dedup();
		Self { stages }
	}

	/// A pipeline with every known stage enabled.
	pub fn all() -> Self {
		Self::with_stages(Stage::ALL)
	}

	/// Enabled stages in execution order.
	pub fn stages(&self) -> &[Stage] {
		&self.stages
	}

	pub fn is_empty(&self) -> bool {
		self.stages.is_empty()
	}

	/// Run every stage over `text` and return the final text.
	pub fn run(&self, text: &str) -> String {
		self.convert(text).output
	}

	/// Run every stage over `text`, recording how many directives each stage
	/// rewrote.
	pub fn convert(&self, text: &str) -> Conversion {
		let mut output = text.to_string();
		let mut report = ConversionReport::default();

		for stage in &self.stages {
			let rewrite = stage.rewrite(&output);
			report.stages.push(StageReport {
				stage: *stage,
				count: rewrite.count,
			});
			output = rewrite.text;
		}

		Conversion {
			changed: output != text,
			output,
			report,
		}
	}
}

/// Result of running a [`Pipeline`] over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
	/// The converted text.
	pub output: String,
	/// Per-stage counts.
	pub report: ConversionReport,
	changed: bool,
}

impl Conversion {
	/// Whether the output differs from the input.
	pub fn changed(&self) -> bool {
		self.changed
	}
}

/// Per-stage directive counts for one document, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
	pub stages: Vec<StageReport>,
}

impl ConversionReport {
	/// Total number of directives rewritten across all stages.
	pub fn total(&self) -> usize {
		self.stages.iter().map(|stage| stage.count).sum()
	}

	/// Count for a single stage, `0` when it was not enabled.
	pub fn count(&self, stage: Stage) -> usize {
		self.stages
			.iter()
			.find(|report| report.stage == stage)
			.map_or(0, |report| report.count)
	}

	/// Add another report's counts to this one, stage by stage.
	pub fn merge(&mut self, other: &Self) {
		for entry in &other.stages {
			match self
				.stages
				.iter_mut()
				.find(|existing| existing.stage == entry.stage)
			{
				Some(existing) => existing.count += entry.count,
				None => self.stages.push(entry.clone()),
			}
		}
		self.stages.sort_by_key(|entry| entry.stage);
	}
}

/// How many directives one stage rewrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
	pub stage: Stage,
	pub count: usize,
}

/// Convert `text` with the default pipeline (hints, tabs, videos).
///
/// ```
/// let output = gb2mint_core::convert("{% embed url=\"https://example.com/v\" %}");
/// assert!(output.contains("src=\"https://example.com/v\""));
/// ```
pub fn convert(text: &str) -> String {
	Pipeline::default().run(text)
}
