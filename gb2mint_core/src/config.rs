use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ConvertError;
use crate::ConvertResult;
use crate::pipeline::Pipeline;
use crate::stages::Stage;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["gb2mint.toml", ".gb2mint.toml", ".config/gb2mint.toml"];

/// Configuration loaded from a `gb2mint.toml` file.
///
/// ```toml
/// stages = ["hints", "tabs", "videos", "figures"]
/// max_file_size = 10485760
/// disable_gitignore = false
///
/// [exclude]
/// patterns = ["drafts/", "*.generated.md"]
///
/// [output]
/// dir = "mintlify"
/// extension = "mdx"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
	/// Stages to enable. They always run in canonical order. When absent the
	/// default hints, tabs and videos stages are used.
	#[serde(default)]
	pub stages: Option<Vec<Stage>>,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Where and how converted files are written.
	#[serde(default)]
	pub output: OutputConfig,
	/// Maximum file size in bytes to convert. Larger files are an error.
	/// Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

/// Configuration for excluding files and directories from conversion.
///
/// Patterns follow gitignore syntax, relative to the project root, and are
/// applied on top of any `.gitignore` rules.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// Output placement.
///
/// Without a `dir` files are converted in place. With one, every converted
/// file is mirrored under it at the same relative path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
	/// Directory (relative to the root) to mirror converted files into.
	#[serde(default)]
	pub dir: Option<PathBuf>,
	/// Replacement extension for written files, without the leading dot.
	#[serde(default)]
	pub extension: Option<String>,
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl ConvertConfig {
	/// Resolve the first config file that exists at `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is none.
	pub fn load(root: &Path) -> ConvertResult<Option<ConvertConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Parse config from TOML source.
	pub fn parse(content: &str) -> ConvertResult<ConvertConfig> {
		toml::from_str(content).map_err(|e| ConvertError::ConfigParse(e.to_string()))
	}

	/// The pipeline described by `stages`.
	pub fn pipeline(&self) -> Pipeline {
		match &self.stages {
			Some(stages) => Pipeline::with_stages(stages.iter().copied()),
			None => Pipeline::default(),
		}
	}
}

/// Everything the project driver needs, flattened from an optional
/// [`ConvertConfig`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
	pub pipeline: Pipeline,
	/// Gitignore-style patterns to skip.
	pub exclude_patterns: Vec<String>,
	/// Directory to mirror output into, relative to the root.
	pub output_dir: Option<PathBuf>,
	/// Replacement extension for written files.
	pub output_extension: Option<String>,
	pub max_file_size: u64,
	pub disable_gitignore: bool,
}

impl Default for ConvertOptions {
	fn default() -> Self {
		Self {
			pipeline: Pipeline::default(),
			exclude_patterns: Vec::new(),
			output_dir: None,
			output_extension: None,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

impl ConvertOptions {
	/// Construct [`ConvertOptions`] from an optional [`ConvertConfig`].
	pub fn from_config(config: Option<&ConvertConfig>) -> Self {
		let Some(config) = config else {
			return Self::default();
		};

		let output_extension = config
			.output
			.extension
			.as_deref()
			.map(|ext| ext.trim().trim_start_matches('.'))
			.filter(|ext| !ext.is_empty())
			.map(str::to_string);

		Self {
			pipeline: config.pipeline(),
			exclude_patterns: config.exclude.patterns.clone(),
			output_dir: config.output.dir.clone(),
			output_extension,
			max_file_size: config.max_file_size,
			disable_gitignore: config.disable_gitignore,
		}
	}

	/// Load the config at `root` (if any) and build options from it.
	pub fn load(root: &Path) -> ConvertResult<Self> {
		let config = ConvertConfig::load(root)?;
		Ok(Self::from_config(config.as_ref()))
	}

	/// Whether files are written somewhere other than their source path.
	pub fn relocates_output(&self) -> bool {
		self.output_dir.is_some() || self.output_extension.is_some()
	}
}
