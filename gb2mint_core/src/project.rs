use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::ConvertError;
use crate::ConvertResult;
use crate::config::CONFIG_FILE_CANDIDATES;
use crate::config::ConvertOptions;
use crate::directives::DirectiveTag;
use crate::directives::find_directives;
use crate::pipeline::ConversionReport;

/// One converted document.
#[derive(Debug, Clone)]
pub struct FileConversion {
	/// The file that was read.
	pub source: PathBuf,
	/// Where the output belongs. Equal to `source` for in-place conversion.
	pub destination: PathBuf,
	/// The text as read from disk.
	pub original: String,
	/// The text after the pipeline ran.
	pub output: String,
	/// Per-stage directive counts.
	pub report: ConversionReport,
	/// `{% … %}` tags still present in the output, i.e. directives none of the
	/// enabled stages handle or that did not match their stage's pattern.
	pub leftovers: Vec<DirectiveTag>,
}

impl FileConversion {
	/// Whether the pipeline changed the text.
	pub fn changed(&self) -> bool {
		self.original != self.output
	}

	/// Whether writing this conversion would touch the disk: the text changed
	/// or the output lives at a different path.
	pub fn needs_write(&self) -> bool {
		self.changed() || self.source != self.destination
	}
}

/// The result of converting a set of files under one root.
#[derive(Debug, Clone)]
pub struct ProjectConversion {
	pub root: PathBuf,
	/// Conversions sorted by source path.
	pub files: Vec<FileConversion>,
}

impl ProjectConversion {
	/// Files whose text changed.
	pub fn changed_files(&self) -> impl Iterator<Item = &FileConversion> {
		self.files.iter().filter(|file| file.changed())
	}

	/// Files that would be written by [`write_conversions`].
	pub fn pending_writes(&self) -> impl Iterator<Item = &FileConversion> {
		self.files.iter().filter(|file| file.needs_write())
	}

	/// Per-stage counts summed over every file.
	pub fn totals(&self) -> ConversionReport {
		let mut totals = ConversionReport::default();
		for file in &self.files {
			totals.merge(&file.report);
		}
		totals
	}

	/// Number of leftover directive tags across all files.
	pub fn leftover_count(&self) -> usize {
		self.files.iter().map(|file| file.leftovers.len()).sum()
	}
}

/// Convert every markdown file under `root`.
pub fn convert_project(root: &Path, options: &ConvertOptions) -> ConvertResult<ProjectConversion> {
	let files = collect_files(root, options)?;
	tracing::info!(root = %root.display(), files = files.len(), "converting project");
	convert_files(root, &files, options)
}

/// Convert an explicit list of files. Each must be a markdown file; when
/// output is mirrored into a directory each must also live under `root`.
pub fn convert_files(
	root: &Path,
	paths: &[PathBuf],
	options: &ConvertOptions,
) -> ConvertResult<ProjectConversion> {
	let mut files = Vec::with_capacity(paths.len());
	for path in paths {
		if !is_markdown_file(path) {
			return Err(ConvertError::NotMarkdown {
				path: path.display().to_string(),
			});
		}
		files.push(convert_file(root, path, options)?);
	}
	files.sort_by(|a, b| a.source.cmp(&b.source));

	Ok(ProjectConversion {
		root: root.to_path_buf(),
		files,
	})
}

/// Read and convert a single file.
pub fn convert_file(
	root: &Path,
	path: &Path,
	options: &ConvertOptions,
) -> ConvertResult<FileConversion> {
	let metadata = std::fs::metadata(path)?;
	if metadata.len() > options.max_file_size {
		return Err(ConvertError::FileTooLarge {
			path: path.display().to_string(),
			size: metadata.len(),
			limit: options.max_file_size,
		});
	}

	let original = std::fs::read_to_string(path)?;
	let conversion = options.pipeline.convert(&original);
	let leftovers = find_directives(&conversion.output);
	let destination = destination_for(root, path, options)?;

	if conversion.changed() {
		tracing::debug!(
			file = %path.display(),
			directives = conversion.report.total(),
			"converted file"
		);
	}
	for tag in &leftovers {
		tracing::warn!(
			file = %path.display(),
			line = tag.line,
			column = tag.column,
			directive = %tag.name,
			"unconverted directive"
		);
	}

	Ok(FileConversion {
		source: path.to_path_buf(),
		destination,
		original,
		output: conversion.output,
		report: conversion.report,
		leftovers,
	})
}

/// Compute where the converted copy of `path` is written.
pub fn destination_for(root: &Path, path: &Path, options: &ConvertOptions) -> ConvertResult<PathBuf> {
	let mut destination = match &options.output_dir {
		Some(dir) => {
			let relative =
				path.strip_prefix(root)
					.map_err(|_| ConvertError::OutputOutsideRoot {
						path: path.display().to_string(),
					})?;
			root.join(dir).join(relative)
		}
		None => path.to_path_buf(),
	};

	if let Some(extension) = &options.output_extension {
		destination.set_extension(extension);
	}

	Ok(destination)
}

/// Write every conversion that needs it. In-place conversions are only
/// written when their text changed; relocated ones are written unless the
/// destination already holds the same text, so the output tree is complete.
/// Returns the number of files written.
pub fn write_conversions(project: &ProjectConversion) -> ConvertResult<usize> {
	let mut written = 0;
	for file in project.pending_writes() {
		if file.source != file.destination
			&& std::fs::read_to_string(&file.destination).is_ok_and(|current| current == file.output)
		{
			continue;
		}
		if let Some(parent) = file.destination.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&file.destination, &file.output)?;
		tracing::info!(file = %file.destination.display(), "wrote converted file");
		written += 1;
	}

	Ok(written)
}

/// Build a `Gitignore` matcher from the `[exclude]` patterns.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> ConvertResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder
			.add_line(None, pattern)
			.map_err(|e| ConvertError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			})?;
	}
	builder.build().map_err(|e| ConvertError::InvalidPattern {
		pattern: patterns.join(", "),
		reason: e.to_string(),
	})
}

/// Build a `Gitignore` matcher from the root's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

struct Walker<'a> {
	gitignore: Gitignore,
	exclude: Gitignore,
	output_dir: Option<PathBuf>,
	visited_dirs: HashSet<PathBuf>,
	files: &'a mut Vec<PathBuf>,
}

/// Collect all markdown files under `root`, sorted.
///
/// Hidden directories, `node_modules`, `target`, the configured output
/// directory, `.gitignore`d paths (unless disabled) and `[exclude]` patterns
/// are skipped. Subdirectories carrying their own config file are treated as
/// separate projects and skipped too.
pub fn collect_files(root: &Path, options: &ConvertOptions) -> ConvertResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};

	let exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	{
		let mut walker = Walker {
			gitignore,
			exclude,
			output_dir: options.output_dir.as_ref().map(|dir| root.join(dir)),
			visited_dirs: HashSet::new(),
			files: &mut files,
		};
		walker.walk(root, true)?;
	}

	files.sort();
	Ok(files)
}

impl Walker<'_> {
	fn walk(&mut self, dir: &Path, is_root: bool) -> ConvertResult<()> {
		if !dir.is_dir() {
			return Ok(());
		}

		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !self.visited_dirs.insert(canonical) {
			return Err(ConvertError::SymlinkCycle {
				path: dir.display().to_string(),
			});
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();

			if path
				.file_name()
				.and_then(|name| name.to_str())
				.is_some_and(is_ignored_directory_name)
			{
				continue;
			}

			let is_dir = path.is_dir();
			if self.gitignore.matched(&path, is_dir).is_ignore()
				|| self.exclude.matched(&path, is_dir).is_ignore()
			{
				continue;
			}

			if is_dir {
				if self.output_dir.as_deref() == Some(path.as_path()) {
					continue;
				}
				if !is_root && has_project_config(&path) {
					continue;
				}
				self.walk(&path, false)?;
			} else if is_markdown_file(&path) {
				self.files.push(path);
			}
		}

		Ok(())
	}
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn has_project_config(dir: &Path) -> bool {
	CONFIG_FILE_CANDIDATES
		.iter()
		.any(|candidate| dir.join(candidate).is_file())
}

/// Check if a file has a markdown extension.
pub fn is_markdown_file(path: &Path) -> bool {
	let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};

	matches!(ext, "md" | "mdx" | "markdown")
}
