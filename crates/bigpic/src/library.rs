use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::overlay::TargetId;

/// An image eligible for presentation. The group is the image's parent
/// directory relative to the library root; navigation cycles within one
/// group only.
#[derive(Debug, Clone)]
pub struct Presentable {
    pub id: TargetId,
    pub path: PathBuf,
    pub group: String,
}

/// The set of presentable images under one root directory, in document
/// order: the initial scan sorted by path, later discoveries appended as
/// they arrive.
pub struct Library {
    root: PathBuf,
    matcher: Regex,
    entries: Vec<Presentable>,
    next_id: u64,
}

impl Library {
    pub fn scan(root: &Path, pattern: &str) -> Result<Self> {
        let matcher = Regex::new(pattern)
            .with_context(|| format!("Invalid match pattern: {pattern}"))?;
        let mut library = Self {
            root: root.to_path_buf(),
            matcher,
            entries: Vec::new(),
            next_id: 0,
        };

        let mut found = Vec::new();
        collect_files(root, &mut found)
            .with_context(|| format!("Failed to scan {}", root.display()))?;
        found.sort();
        for path in found {
            library.add_if_matching(path);
        }
        Ok(library)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Presentable] {
        &self.entries
    }

    pub fn get(&self, id: TargetId) -> Option<&Presentable> {
        self.entries.iter().find(|p| p.id == id)
    }

    /// Live members of `of`'s group, in library order. Queried fresh on
    /// every navigation; returns an empty list for an unknown target.
    pub fn group_members(&self, of: TargetId) -> Vec<TargetId> {
        let Some(current) = self.get(of) else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|p| p.group == current.group)
            .map(|p| p.id)
            .collect()
    }

    /// Fold filesystem events into the library: appends paths that newly
    /// match, drops entries whose files disappeared. Returns whether
    /// anything changed.
    pub fn absorb(&mut self, touched: &[PathBuf]) -> bool {
        let mut changed = false;
        for path in touched {
            let known = self.entries.iter().any(|p| &p.path == path);
            if path.exists() {
                if !known && self.add_if_matching(path.clone()) {
                    changed = true;
                }
            } else if known {
                self.entries.retain(|p| &p.path != path);
                changed = true;
            }
        }
        changed
    }

    fn add_if_matching(&mut self, path: PathBuf) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if !self.matcher.is_match(&relative_str) {
            return false;
        }
        let group = relative
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        self.next_id += 1;
        self.entries.push(Presentable {
            id: TargetId(self.next_id),
            path,
            group,
        });
        true
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}
