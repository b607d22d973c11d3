use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use gb2mint_cli::Commands;
use gb2mint_cli::Gb2MintCli;
use gb2mint_cli::OutputFormat;
use gb2mint_core::ConversionReport;
use gb2mint_core::ConvertConfig;
use gb2mint_core::ConvertOptions;
use gb2mint_core::find_directives;
use gb2mint_core::project::FileConversion;
use gb2mint_core::project::ProjectConversion;
use gb2mint_core::project::collect_files;
use gb2mint_core::project::convert_files;
use gb2mint_core::project::convert_project;
use gb2mint_core::project::write_conversions;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "# gb2mint configuration\n\n# Stages to run. They always execute in \
                             this order:\n# hints, tabs, videos, figures, title.\nstages = \
                             [\"hints\", \"tabs\", \"videos\"]\n\n# [exclude]\n# patterns = \
                             [\"drafts/\", \"SUMMARY.md\"]\n\n# Mirror converted files into \
                             another directory and rename them to .mdx.\n# [output]\n# dir = \
                             \"mintlify\"\n# extension = \"mdx\"\n";

fn main() {
	let args = Gb2MintCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Convert {
			files,
			dry_run,
			diff,
			out_dir,
			watch,
		}) => {
			let request = ConvertRequest {
				files: files.clone(),
				dry_run: *dry_run,
				diff: *diff,
				out_dir: out_dir.clone(),
			};
			run_convert(&args, &request, *watch)
		}
		Some(Commands::Check { format, diff }) => run_check(&args, *format, *diff),
		Some(Commands::List { format }) => run_list(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `gb2mint --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<gb2mint_core::ConvertError>() {
			Ok(err) => {
				let report: miette::Report = (*err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "info" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

/// The root is always absolute so it shares a prefix with the file
/// arguments resolved by [`resolve_file_args`].
fn resolve_root(args: &Gb2MintCli) -> PathBuf {
	let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	match &args.path {
		Some(path) if path.is_absolute() => path.clone(),
		Some(path) => cwd.join(path),
		None => cwd,
	}
}

/// Explicit file arguments are relative to the working directory, like any
/// other command line tool.
fn resolve_file_args(files: &[PathBuf]) -> Vec<PathBuf> {
	let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	files
		.iter()
		.map(|file| {
			if file.is_absolute() {
				file.clone()
			} else {
				cwd.join(file)
			}
		})
		.collect()
}

fn run_init(args: &Gb2MintCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = ConvertConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("gb2mint.toml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created config file: {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Run `gb2mint check` to see which files contain GitBook directives");
	println!("  2. Run `gb2mint convert --dry-run` to preview the changes");
	println!("  3. Run `gb2mint convert` to rewrite them");

	Ok(())
}

struct ConvertRequest {
	files: Vec<PathBuf>,
	dry_run: bool,
	diff: bool,
	out_dir: Option<PathBuf>,
}

fn load_options(
	root: &Path,
	out_dir: Option<&Path>,
) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
	let mut options = ConvertOptions::load(root)?;
	if let Some(dir) = out_dir {
		options.output_dir = Some(dir.to_path_buf());
	}
	Ok(options)
}

fn convert_selection(
	root: &Path,
	files: &[PathBuf],
	options: &ConvertOptions,
) -> Result<ProjectConversion, Box<dyn std::error::Error>> {
	let project = if files.is_empty() {
		convert_project(root, options)?
	} else {
		convert_files(root, &resolve_file_args(files), options)?
	};
	Ok(project)
}

fn run_convert(
	args: &Gb2MintCli,
	request: &ConvertRequest,
	watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	run_convert_once(args, request)?;

	if !watch || request.dry_run {
		return Ok(());
	}

	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let options = load_options(&root, request.out_dir.as_deref())?;
	// Writes into a mirrored output tree must not trigger another run.
	let output_dir = options.output_dir.as_ref().map(|dir| root.join(dir));
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if !matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					return;
				}
				let only_output = output_dir.as_ref().is_some_and(|dir| {
					!event.paths.is_empty() && event.paths.iter().all(|path| path.starts_with(dir))
				});
				if !only_output {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, converting...");
		if let Err(e) = run_convert_once(args, request) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_convert_once(
	args: &Gb2MintCli,
	request: &ConvertRequest,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let options = load_options(&root, request.out_dir.as_deref())?;
	let project = convert_selection(&root, &request.files, &options)?;

	print_leftovers(&project, &root);

	let pending: Vec<&FileConversion> = project.pending_writes().collect();
	if pending.is_empty() {
		println!("Nothing to convert: all files are already up to date.");
		return Ok(());
	}

	if request.diff {
		for file in &pending {
			if file.changed() {
				eprintln!("{}", colored!(make_relative(&file.source, &root), bold));
				print_diff(&file.original, &file.output);
			}
		}
	}

	if request.dry_run {
		println!(
			"Dry run: would write {} file(s) ({}):",
			pending.len(),
			describe_report(&project.totals())
		);
		for file in &pending {
			println!(
				"  {} -> {}",
				make_relative(&file.source, &root),
				make_relative(&file.destination, &root)
			);
		}
		return Ok(());
	}

	let written = write_conversions(&project)?;
	println!(
		"Converted {written} file(s) ({}).",
		describe_report(&project.totals())
	);

	if args.verbose {
		for file in &pending {
			println!("  {}", make_relative(&file.destination, &root));
		}
	}

	Ok(())
}

fn run_check(
	args: &Gb2MintCli,
	format: OutputFormat,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let options = load_options(&root, None)?;
	let project = convert_project(&root, &options)?;
	let changed: Vec<&FileConversion> = project.changed_files().collect();

	match format {
		OutputFormat::Json => {
			let files: Vec<serde_json::Value> = changed
				.iter()
				.map(|file| {
					serde_json::json!({
						"file": make_relative(&file.source, &root),
						"directives": file.report.total(),
						"stages": file.report.stages,
					})
				})
				.collect();
			let leftovers: Vec<serde_json::Value> = project
				.files
				.iter()
				.flat_map(|file| {
					file.leftovers.iter().map(|tag| {
						serde_json::json!({
							"file": make_relative(&file.source, &root),
							"directive": tag.name,
							"line": tag.line,
							"column": tag.column,
						})
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": changed.is_empty(),
				"files": files,
				"unconverted": leftovers,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			print_leftovers(&project, &root);

			if changed.is_empty() {
				println!("Check passed: no GitBook directives left to convert.");
			} else {
				eprintln!("Check failed.");
				eprintln!();
				eprintln!("Files to convert:");
				for file in &changed {
					eprintln!(
						"  {} ({})",
						make_relative(&file.source, &root),
						describe_report(&file.report)
					);
					if show_diff {
						print_diff(&file.original, &file.output);
					}
				}
				eprintln!();
				eprintln!(
					"{} file(s) contain directives to convert. Run `gb2mint convert` to fix.",
					changed.len()
				);
			}
		}
	}

	if !changed.is_empty() {
		process::exit(1);
	}

	Ok(())
}

fn run_list(args: &Gb2MintCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let options = load_options(&root, None)?;
	let files = collect_files(&root, &options)?;

	let mut listing = Vec::new();
	for file in files {
		let content = std::fs::read_to_string(&file)?;
		let tags = find_directives(&content);
		if !tags.is_empty() {
			listing.push((make_relative(&file, &root), tags));
		}
	}

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = listing
				.iter()
				.flat_map(|(file, tags)| {
					tags.iter().map(move |tag| {
						serde_json::json!({
							"file": file,
							"directive": tag.name,
							"line": tag.line,
							"column": tag.column,
						})
					})
				})
				.collect();
			println!("{}", serde_json::Value::Array(entries));
		}
		OutputFormat::Text => {
			if listing.is_empty() {
				println!("No directives found.");
				return Ok(());
			}

			for (file, tags) in &listing {
				println!("{}", colored!(file, bold));
				for tag in tags {
					println!("  {}:{} {}", tag.line, tag.column, tag.name);
				}
			}

			let total: usize = listing.iter().map(|(_, tags)| tags.len()).sum();
			println!();
			println!("{total} directive tag(s) in {} file(s).", listing.len());
		}
	}

	Ok(())
}

/// e.g. `2 hints, 1 tabs, 0 videos`.
fn describe_report(report: &ConversionReport) -> String {
	report
		.stages
		.iter()
		.map(|entry| format!("{} {}", entry.count, entry.stage))
		.collect::<Vec<_>>()
		.join(", ")
}

/// Warn about directives the enabled stages leave behind.
fn print_leftovers(project: &ProjectConversion, root: &Path) {
	for file in &project.files {
		for tag in &file.leftovers {
			eprintln!(
				"{} unconverted directive `{}` at {}:{}:{}",
				colored!("warning:", yellow),
				tag.name,
				make_relative(&file.source, root),
				tag.line,
				tag.column
			);
		}
	}
}

/// Print a line diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
