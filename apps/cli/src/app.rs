//! Scan orchestration: install root → libraries → content dirs → candidates.

use std::path::{Path, PathBuf};

use steamclean_file_ops::{Report, delete_candidates};
use steamclean_steam::install::platform_store;
use steamclean_steam::manifest::title_dirs;
use steamclean_steam::paths::absolutize;
use steamclean_steam::{
    CandidateMap, ConsolePrompt, Prompt, Scanner, fix_game_path, get_libraries,
    resolve_install_path,
};

use crate::config::Config;

/// Result of scanning every library.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub candidates: CandidateMap,
    /// Content directories actually scanned; deletions are confined to them.
    pub content_dirs: Vec<PathBuf>,
}

/// Runs one scan and, unless told otherwise, the deletion that follows it.
pub fn run(config: &Config, assume_yes: bool, json: bool) -> anyhow::Result<()> {
    let install = match &config.install_path {
        Some(path) => absolutize(path)?,
        None => {
            let store = platform_store();
            let mut prompt = ConsolePrompt::stdio();
            resolve_install_path(store.as_ref(), &mut prompt)?
        }
    };

    let scanner = Scanner::with_keywords(&config.keywords);
    let outcome = scan(&install, &config.extra_libraries, &scanner);
    let report = Report::from_candidates(&outcome.candidates);

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    if report.is_empty() || config.dry_run {
        return Ok(());
    }

    if !assume_yes && !confirm(&report)? {
        tracing::info!("deletion cancelled");
        return Ok(());
    }

    let summary = delete_candidates(&outcome.candidates, &outcome.content_dirs);
    println!(
        "Deleted {} file(s), freed {:.2} MB",
        summary.deleted, summary.freed_mb
    );
    for (path, reason) in &summary.failed {
        eprintln!("  failed: {} ({reason})", path.display());
    }
    Ok(())
}

/// Collects candidates from the install root, its configured libraries and
/// any extra roots.
pub fn scan(install: &Path, extra: &[PathBuf], scanner: &Scanner) -> ScanOutcome {
    let mut roots = vec![install.to_path_buf()];
    roots.extend(get_libraries(install));
    roots.extend(extra.iter().cloned());

    let mut outcome = ScanOutcome::default();
    for root in roots {
        if !root.is_dir() {
            tracing::warn!(path = %root.display(), "library directory not found, skipping");
            continue;
        }

        let content = match fix_game_path(&root) {
            Ok(dir) => dir,
            Err(e) => {
                tracing::warn!(kind = e.kind(), path = %root.display(), "{e}");
                continue;
            }
        };
        if outcome.content_dirs.contains(&content) {
            continue;
        }

        let titles = match title_dirs(&content) {
            Ok(titles) => titles,
            Err(e) => {
                tracing::warn!(kind = e.kind(), path = %content.display(), "no content directory: {e}");
                continue;
            }
        };

        tracing::info!(path = %content.display(), titles = titles.len(), "scanning library");
        outcome.candidates.extend(scanner.scan(&titles));
        outcome.content_dirs.push(content);
    }
    outcome
}

/// Asks for a y/N confirmation on the console.
fn confirm(report: &Report) -> anyhow::Result<bool> {
    let mut prompt = ConsolePrompt::stdio();
    let notice = format!(
        "{} file(s) totalling {:.2} MB will be deleted.",
        report.candidates.len(),
        report.total_mb
    );
    let answer = prompt.ask(&notice, "Continue? [y/N] ")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
