//! Stat command implementation

use std::io::Write;

use colored::Colorize;
use filehead_core::{Backend, ItemKind, Revision};
use serde_json::json;

use crate::error::Result;

/// Run the stat command
pub fn run_stat(backend: &Backend, path: &str, json: bool, out: &mut dyn Write) -> Result<()> {
    let id = backend.repository().parse_id(path)?;
    let lookup = backend.lookup(Revision::now());
    let item = lookup.get_item(&id)?;
    let kind = item.kind();
    let md5 = match kind {
        ItemKind::File => Some(item.checksum()?.md5().to_string()),
        ItemKind::Folder => None,
    };
    let lock = lookup.locked(&id)?;

    if json {
        let value = json!({
            "id": id.to_string(),
            "path": item.path().as_str(),
            "kind": kind.to_string(),
            "size": item.size(),
            "md5": md5,
            "revision": item.revision_changed().to_string(),
            "author": item.revision_changed_author(),
            "lock": lock,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    writeln!(out, "{}:     {}", "Path".dimmed(), item.path().as_str().cyan())?;
    writeln!(out, "{}:     {}", "Kind".dimmed(), kind)?;
    if kind == ItemKind::File {
        writeln!(out, "{}:     {}", "Size".dimmed(), item.size())?;
    }
    if let Some(md5) = md5 {
        writeln!(out, "{}:      {}", "MD5".dimmed(), md5)?;
    }
    writeln!(out, "{}: {}", "Revision".dimmed(), item.revision_changed())?;
    writeln!(out, "{}:   {}", "Author".dimmed(), item.revision_changed_author())?;
    match lock {
        Some(lock) => writeln!(
            out,
            "{}:   {} by {} ({})",
            "Locked".dimmed(),
            "yes".yellow(),
            lock.owner,
            lock.message
        )?,
        None => writeln!(out, "{}:   no", "Locked".dimmed())?,
    }
    Ok(())
}
