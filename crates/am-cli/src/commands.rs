use std::fs;
use std::path::Path;
use std::process::ExitCode;

use am_diff::{Block, BlockKind, Diff};
use am_merge::{MergeConfig, MergeOutcome, Merger};
use anyhow::Context;
use colored::Colorize;
use tracing::{debug, info};

use crate::cli::*;
use crate::text::{join_lines, read_lines, write_lines};

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Merge(args) => {
            let outcome = cmd_merge(&args, config)?;
            if outcome.is_clean() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(1))
            }
        }
        Command::Diff(args) => {
            cmd_diff(&args, config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load merge settings from a TOML file, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<MergeConfig> {
    let Some(path) = path else {
        return Ok(MergeConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: MergeConfig = toml::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn apply_merge_overrides(args: &MergeArgs, mut config: MergeConfig) -> MergeConfig {
    if let Some(policy) = args.policy {
        config.conflict_policy = policy.into();
    }
    if let Some(size) = args.marker_size {
        config.marker_size = size;
    }
    if let Some(label) = &args.ours_label {
        config.ours_label = label.clone();
    }
    if let Some(label) = &args.theirs_label {
        config.theirs_label = label.clone();
    }
    if args.no_skip_delimiters {
        config.diff.skip_closing_delimiters = false;
    }
    config
}

fn cmd_merge(args: &MergeArgs, config: MergeConfig) -> anyhow::Result<MergeOutcome> {
    let config = apply_merge_overrides(args, config);
    let outcome = merge_files(&args.ours, &args.base, &args.theirs, config, args.stdout)?;
    report_conflicts(&args.ours, &outcome);
    Ok(outcome)
}

/// Merge three files. The result replaces `ours` unless `to_stdout` is set.
pub fn merge_files(
    ours: &Path,
    base: &Path,
    theirs: &Path,
    config: MergeConfig,
    to_stdout: bool,
) -> anyhow::Result<MergeOutcome> {
    let ours_file = read_lines(ours)?;
    let base_file = read_lines(base)?;
    let theirs_file = read_lines(theirs)?;

    let outcome = Merger::new(config)
        .merge(&ours_file.lines, &base_file.lines, &theirs_file.lines)
        .with_context(|| format!("failed to merge {}", ours.display()))?;
    info!(
        path = %ours.display(),
        lines = outcome.lines.len(),
        conflicts = outcome.conflicts.len(),
        "merged"
    );

    // An empty ours still ends with a newline when base did.
    let trailing_newline = if ours_file.lines.is_empty() {
        base_file.trailing_newline
    } else {
        ours_file.trailing_newline
    };
    if to_stdout {
        print!("{}", join_lines(&outcome.lines, trailing_newline));
    } else {
        write_lines(ours, &outcome.lines, trailing_newline)?;
    }
    Ok(outcome)
}

fn report_conflicts(path: &Path, outcome: &MergeOutcome) {
    if outcome.is_clean() {
        return;
    }
    eprintln!(
        "{} {} conflict(s) in {}",
        "✗".red().bold(),
        outcome.conflicts.len(),
        path.display().to_string().bold()
    );
    for conflict in &outcome.conflicts {
        eprintln!(
            "  base lines {}..{}: ours {} line(s), theirs {} line(s)",
            conflict.base_range.start.to_string().yellow(),
            conflict.base_range.end.to_string().yellow(),
            conflict.ours.len(),
            conflict.theirs.len()
        );
    }
}

fn cmd_diff(args: &DiffArgs, mut config: MergeConfig) -> anyhow::Result<()> {
    if args.no_skip_delimiters {
        config.diff.skip_closing_delimiters = false;
    }
    let base = read_lines(&args.base)?;
    let modified = read_lines(&args.modified)?;
    let diff = Diff::make_with(&base.lines, &modified.lines, &config.diff)
        .with_context(|| format!("failed to diff {}", args.modified.display()))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
        OutputFormat::Text => print!("{}", render_diff(&diff)),
    }
    Ok(())
}

fn render_diff(diff: &Diff) -> String {
    if diff.is_identity() {
        return format!("{}\n", "No changes.".dimmed());
    }

    let mut out = String::new();
    for block in diff {
        out.push_str(&render_block(block));
    }
    out.push_str(&format!(
        "{} {}, {} {}\n",
        diff.additions().to_string().green(),
        "added".green(),
        diff.deletions().to_string().red(),
        "removed".red()
    ));
    out
}

fn render_block(block: &Block) -> String {
    let mut out = String::new();
    if block.kind() == BlockKind::Unchanged {
        out.push_str(&format!(
            "{}\n",
            format!("  ... {} unchanged line(s)", block.original_len()).dimmed()
        ));
        return out;
    }
    out.push_str(&format!(
        "{} {}\n",
        block.kind().to_string().cyan().bold(),
        format!("@ {}", block.start()).dimmed()
    ));
    for line in block.original_lines() {
        out.push_str(&format!("{}\n", format!("- {line}").red()));
    }
    for line in block.modified_lines() {
        out.push_str(&format!("{}\n", format!("+ {line}").green()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use am_merge::ConflictPolicy;
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        ours: PathBuf,
        base: PathBuf,
        theirs: PathBuf,
    }

    fn fixture(ours: &str, base: &str, theirs: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let paths = ["ours.yml", "base.yml", "theirs.yml"].map(|name| dir.path().join(name));
        for (path, text) in paths.iter().zip([ours, base, theirs]) {
            fs::write(path, text).unwrap();
        }
        let [ours, base, theirs] = paths;
        Fixture { _dir: dir, ours, base, theirs }
    }

    #[test]
    fn clean_merge_overwrites_ours() {
        let fx = fixture("a\nB\nc\nd\n", "a\nb\nc\nd\n", "a\nb\nc\nD\n");
        let outcome = merge_files(&fx.ours, &fx.base, &fx.theirs, MergeConfig::default(), false).unwrap();

        assert!(outcome.is_clean());
        assert_eq!(fs::read_to_string(&fx.ours).unwrap(), "a\nB\nc\nD\n");
    }

    #[test]
    fn conflicting_merge_writes_markers() {
        let fx = fixture("a\nX\nc\n", "a\nb\nc\n", "a\nY\nc\n");
        let outcome = merge_files(&fx.ours, &fx.base, &fx.theirs, MergeConfig::default(), false).unwrap();

        assert_eq!(outcome.conflicts.len(), 1);
        let written = fs::read_to_string(&fx.ours).unwrap();
        assert!(written.contains("<<<<<<< ours\nX\n=======\nY\n>>>>>>> theirs\n"));
    }

    #[test]
    fn stdout_leaves_ours_untouched() {
        let fx = fixture("a\nB\nc\n", "a\nb\nc\n", "a\nb\nC\n");
        merge_files(&fx.ours, &fx.base, &fx.theirs, MergeConfig::default(), true).unwrap();
        assert_eq!(fs::read_to_string(&fx.ours).unwrap(), "a\nB\nc\n");
    }

    #[test]
    fn missing_trailing_newline_is_preserved() {
        let fx = fixture("a\nB\nc", "a\nb\nc", "a\nb\nc");
        merge_files(&fx.ours, &fx.base, &fx.theirs, MergeConfig::default(), false).unwrap();
        assert_eq!(fs::read_to_string(&fx.ours).unwrap(), "a\nB\nc");
    }

    #[test]
    fn abort_policy_fails() {
        let fx = fixture("a\nX\nc\n", "a\nb\nc\n", "a\nY\nc\n");
        let result = merge_files(&fx.ours, &fx.base, &fx.theirs, MergeConfig::strict(), false);
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&fx.ours).unwrap(), "a\nX\nc\n");
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assetmerge.toml");
        fs::write(&path, "conflict_policy = \"theirs\"\nmarker_size = 3\n\n[diff]\nskip_closing_delimiters = false\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.conflict_policy, ConflictPolicy::Theirs);
        assert_eq!(config.marker_size, 3);
        assert!(!config.diff.skip_closing_delimiters);
        assert_eq!(config.ours_label, "ours");
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), MergeConfig::default());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "conflict_policy = \"sometimes\"\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn flags_override_config() {
        let args = MergeArgs {
            ours: "o".into(),
            base: "b".into(),
            theirs: "t".into(),
            policy: Some(PolicyArg::Ours),
            marker_size: Some(4),
            ours_label: Some("HEAD".into()),
            theirs_label: None,
            no_skip_delimiters: true,
            stdout: false,
        };
        let config = apply_merge_overrides(&args, MergeConfig::default());
        assert_eq!(config.conflict_policy, ConflictPolicy::Ours);
        assert_eq!(config.marker_size, 4);
        assert_eq!(config.ours_label, "HEAD");
        assert_eq!(config.theirs_label, "theirs");
        assert!(!config.diff.skip_closing_delimiters);
    }

    #[test]
    fn render_lists_changed_lines() {
        colored::control::set_override(false);
        let base = vec!["a", "b", "c"];
        let modified = vec!["a", "B", "c"];
        let diff = Diff::make(&base, &modified).unwrap();
        let text = render_diff(&diff);

        assert!(text.contains("- b\n"));
        assert!(text.contains("+ B\n"));
        assert!(text.contains("1 added, 1 removed"));
    }

    #[test]
    fn render_identity() {
        colored::control::set_override(false);
        let lines = vec!["a"];
        let diff = Diff::make(&lines, &lines).unwrap();
        assert_eq!(render_diff(&diff), "No changes.\n");
    }
}
