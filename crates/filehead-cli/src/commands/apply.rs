//! Apply command: run a patch manifest as one commit
//!
//! A manifest is a TOML document with an optional `message` and an ordered
//! `[[change]]` array. File content comes inline (`content`) or from a file
//! (`source`, resolved against the manifest's directory).

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use filehead_core::{Backend, PatchItem, Patchset, Revision};
use filehead_fs::ItemPath;
use serde::Deserialize;
use serde_json::json;

use crate::error::{CliError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchManifest {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default, rename = "change")]
    pub changes: Vec<ChangeEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeOp {
    FileAdd,
    FileModify,
    FileDelete,
    FolderAdd,
    FolderDelete,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeEntry {
    pub op: ChangeOp,
    pub path: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source: Option<PathBuf>,
}

impl PatchManifest {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Build a patchset, opening every `source` file up front so a missing
    /// source fails before anything is applied.
    pub fn into_patchset(self, base: Revision, manifest_dir: &Path) -> Result<Patchset> {
        let mut patchset = Patchset::new(base);
        if let Some(message) = self.message {
            patchset = patchset.with_message(message);
        }
        for (index, change) in self.changes.into_iter().enumerate() {
            patchset.push(change.into_patch_item(index, manifest_dir)?);
        }
        Ok(patchset)
    }
}

impl ChangeEntry {
    fn into_patch_item(self, index: usize, manifest_dir: &Path) -> Result<PatchItem> {
        let path = ItemPath::new(&self.path)?;
        let takes_content = matches!(self.op, ChangeOp::FileAdd | ChangeOp::FileModify);
        if !takes_content && (self.content.is_some() || self.source.is_some()) {
            return Err(CliError::usage(format!(
                "change #{index} ({}): content is only allowed for file-add and file-modify",
                self.path
            )));
        }

        let item = match self.op {
            ChangeOp::FileAdd => PatchItem::FileAdd {
                content: content_source(index, &self.path, self.content, self.source, manifest_dir)?,
                path,
            },
            ChangeOp::FileModify => PatchItem::FileModification {
                content: content_source(index, &self.path, self.content, self.source, manifest_dir)?,
                path,
            },
            ChangeOp::FileDelete => PatchItem::file_delete(path),
            ChangeOp::FolderAdd => PatchItem::folder_add(path),
            ChangeOp::FolderDelete => PatchItem::folder_delete(path),
        };
        Ok(item)
    }
}

fn content_source(
    index: usize,
    path: &str,
    content: Option<String>,
    source: Option<PathBuf>,
    manifest_dir: &Path,
) -> Result<filehead_core::ContentSource> {
    match (content, source) {
        (Some(text), None) => Ok(Box::new(Cursor::new(text.into_bytes()))),
        (None, Some(source)) => {
            let location = manifest_dir.join(source);
            let file = File::open(&location).map_err(|e| filehead_fs::Error::io(&location, e))?;
            Ok(Box::new(file))
        }
        (Some(_), Some(_)) => Err(CliError::usage(format!(
            "change #{index} ({path}): set either content or source, not both"
        ))),
        (None, None) => Err(CliError::usage(format!(
            "change #{index} ({path}): file changes need content or source"
        ))),
    }
}

/// Run the apply command
pub fn run_apply(backend: &Backend, manifest: &Path, json: bool, out: &mut dyn Write) -> Result<()> {
    let text = filehead_fs::io::read_text(manifest)?;
    let parsed = PatchManifest::parse(&text)?;
    let manifest_dir = manifest.parent().unwrap_or(Path::new("."));
    let patchset = parsed.into_patchset(Revision::now(), manifest_dir)?;
    let count = patchset.len();

    let revision = backend.commit().run(patchset)?;

    if json {
        let value = json!({
            "revision": revision.to_string(),
            "changes": count,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(
            out,
            "{} Applied {} change(s) at revision {}",
            "OK".green().bold(),
            count,
            revision.to_string().cyan()
        )?;
    }
    Ok(())
}
