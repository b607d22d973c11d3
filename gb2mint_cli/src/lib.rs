use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Convert GitBook markdown directives into Mintlify components.",
	long_about = "gb2mint rewrites GitBook-style block directives ({% hint %}, {% tabs %}, {% \
	              embed %}) into the components Mintlify renders (<Warning>, <Tabs>, \
	              <iframe>).\n\nQuick start:\n  gb2mint init     Create a gb2mint.toml\n  gb2mint \
	              check    Show which files still need converting\n  gb2mint convert  Convert \
	              every markdown file\n  gb2mint list     List the directives found in each file"
)]
pub struct Gb2MintCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the documentation root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `gb2mint.toml` in the documentation root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Convert markdown files in place or into an output directory.
	///
	/// Without file arguments every markdown file under the root is
	/// converted. Files that contain nothing to convert are left untouched
	/// unless output is mirrored into another directory.
	Convert {
		/// Convert only these files instead of scanning the root.
		files: Vec<PathBuf>,

		/// Show which files would change without writing anything.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Print a line diff for every file that changes.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Mirror converted files into this directory (relative to the root)
		/// instead of converting in place. Overrides `[output] dir`.
		#[arg(long)]
		out_dir: Option<PathBuf>,

		/// Watch for file changes and convert again automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Check whether any file still contains directives to convert.
	///
	/// Runs the conversion in memory and exits with a non-zero status code if
	/// any file would change. Directives none of the enabled stages handle
	/// are reported as warnings.
	Check {
		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Show a line diff for each file that would change.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// List every `{% … %}` directive tag found in each file.
	List {
		/// Output format for list results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
