use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use record_patcher::{builtin_rules, check_file, patch_file, FileReport, ProjectGuard};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "record-patcher")]
#[command(about = "Automated idiom repair for generated data-access code", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the built-in rules to files or directories
    Apply {
        /// Files or directories to patch (directories are searched for .ts/.tsx)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Project root (auto-detected from the first target if not specified)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Dry run - show what would be changed without modifying files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Emit a machine-readable JSON report instead of human output
        #[arg(long)]
        json: bool,
    },

    /// Report how many sites each rule would rewrite, without writing
    Check {
        /// Files or directories to scan (directories are searched for .ts/.tsx)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Emit a machine-readable JSON report instead of human output
        #[arg(long)]
        json: bool,
    },

    /// List the built-in rules and what they repair
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            paths,
            root,
            dry_run,
            diff,
            json,
        } => cmd_apply(paths, root, dry_run, diff, json),

        Commands::Check { paths, json } => cmd_check(paths, json),

        Commands::List => cmd_list(),
    }
}

/// Helper: expand directory targets into the .ts/.tsx files beneath them.
fn collect_targets(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path) {
                let entry = entry?;
                if entry.file_type().is_file() && is_patchable(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        anyhow::bail!("No .ts/.tsx files found under the given paths");
    }

    Ok(files)
}

fn is_patchable(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("ts") | Some("tsx")
    )
}

/// Resolve the project root the guard is scoped to.
///
/// Priority order:
/// 1. Explicit --root flag
/// 2. Nearest ancestor of the first target containing a package.json
/// 3. The first target's own directory
fn resolve_project_root(cli_root: Option<PathBuf>, first_target: &Path) -> Result<PathBuf> {
    if let Some(path) = cli_root {
        return Ok(path.canonicalize()?);
    }

    let start = if first_target.is_dir() {
        first_target.to_path_buf()
    } else {
        first_target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf()
    };
    let start = start.canonicalize()?;

    for ancestor in start.ancestors() {
        if ancestor.join("package.json").exists() {
            eprintln!(
                "{}",
                format!("Auto-detected project root: {}", ancestor.display()).dimmed()
            );
            return Ok(ancestor.to_path_buf());
        }
    }

    Ok(start)
}

/// Helper: show unified diff between original and patched content.
fn display_diff(file: &Path, original: &str, patched: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, patched);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn print_file_report(report: &FileReport) {
    if report.changed {
        println!(
            "{} {}: {} rewritten",
            "✓".green(),
            report.file.display(),
            report.rewritten()
        );
    } else {
        println!("{} {}: already clean", "⊙".yellow(), report.file.display());
    }

    for pass in &report.passes {
        if pass.rewritten > 0 || pass.skipped > 0 {
            println!(
                "  {}: {} rewritten, {} skipped",
                pass.rule.bold(),
                pass.rewritten,
                pass.skipped
            );
        }
    }
}

fn cmd_apply(
    paths: Vec<PathBuf>,
    root: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
    json: bool,
) -> Result<()> {
    let targets = collect_targets(&paths)?;
    let project_root = resolve_project_root(root, &targets[0])?;
    let guard = ProjectGuard::new(&project_root)?;
    let rules = builtin_rules();

    if dry_run && !json {
        println!("{}", "[DRY RUN - showing what would be changed]".cyan());
    }

    let mut reports = Vec::new();
    let mut total_rewritten = 0;
    let mut total_skipped = 0;
    let mut files_changed = 0;
    let mut failed = 0;

    for target in targets {
        let file = match guard.validate_path(&target) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), target.display(), e);
                failed += 1;
                continue;
            }
        };

        let result = if dry_run {
            check_file(&file, &rules)
        } else {
            patch_file(&file, &rules)
        };

        match result {
            Ok(report) => {
                total_rewritten += report.rewritten();
                total_skipped += report.skipped();
                if report.changed {
                    files_changed += 1;
                }

                if !json {
                    print_file_report(&report);
                    if show_diff && report.changed {
                        display_diff(&report.file, &report.original, &report.patched);
                    }
                }

                reports.push(report);
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!();
        println!("{}", "Summary:".bold());
        println!("  {} sites rewritten", format!("{}", total_rewritten).green());
        println!(
            "  {} sites skipped (missing captures)",
            format!("{}", total_skipped).yellow()
        );
        println!("  {} files changed", format!("{}", files_changed).green());
        println!("  {} failed", format!("{}", failed).red());
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_check(paths: Vec<PathBuf>, json: bool) -> Result<()> {
    let targets = collect_targets(&paths)?;
    let rules = builtin_rules();

    let mut reports = Vec::new();
    let mut total_rewritten = 0;
    let mut total_skipped = 0;
    let mut failed = 0;

    for target in &targets {
        match check_file(target, &rules) {
            Ok(report) => {
                total_rewritten += report.rewritten();
                total_skipped += report.skipped();
                if !json {
                    print_file_report(&report);
                }
                reports.push(report);
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), target.display(), e);
                failed += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!();
        println!("{}", "Summary:".bold());
        println!(
            "  {} sites would be rewritten",
            format!("{}", total_rewritten).green()
        );
        println!(
            "  {} sites skipped (missing captures)",
            format!("{}", total_skipped).yellow()
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_list() -> Result<()> {
    println!("{}", "Built-in rules (applied in this order):".bold());
    for rule in builtin_rules() {
        println!("  {}  {}", rule.name().green().bold(), rule.description());
    }
    Ok(())
}
