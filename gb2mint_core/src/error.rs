use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ConvertError {
	#[error(transparent)]
	#[diagnostic(code(gb2mint::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(gb2mint::config_parse),
		help(
			"check that gb2mint.toml is valid TOML; known stages are: hints, tabs, videos, \
			 figures, title"
		)
	)]
	ConfigParse(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(gb2mint::invalid_pattern),
		help("exclude patterns follow .gitignore syntax")
	)]
	InvalidPattern { pattern: String, reason: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(gb2mint::file_too_large),
		help("increase `max_file_size` in gb2mint.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(gb2mint::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },

	#[error("not a markdown file: `{path}`")]
	#[diagnostic(
		code(gb2mint::not_markdown),
		help("only .md, .mdx and .markdown files can be converted")
	)]
	NotMarkdown { path: String },

	#[error("file `{path}` is outside the project root")]
	#[diagnostic(
		code(gb2mint::output_outside_root),
		help("files converted into an output directory must live under `--path`")
	)]
	OutputOutsideRoot { path: String },
}

pub type ConvertResult<T> = Result<T, ConvertError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
