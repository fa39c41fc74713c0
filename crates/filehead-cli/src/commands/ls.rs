//! Listing commands: `ls` and `tree`

use std::io::Write;

use colored::Colorize;
use filehead_core::{Backend, Item, ItemKind, Revision};
use serde_json::json;

use crate::error::Result;

/// Which kinds of children `ls` shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Files,
    Folders,
}

impl ListFilter {
    pub fn from_flags(files: bool, folders: bool) -> Self {
        match (files, folders) {
            (true, _) => Self::Files,
            (_, true) => Self::Folders,
            _ => Self::All,
        }
    }
}

/// Run the ls command
pub fn run_ls(
    backend: &Backend,
    path: &str,
    filter: ListFilter,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let parent = backend.repository().parse_id(path)?;
    let lookup = backend.lookup(Revision::now());

    let items: Vec<Item> = match filter {
        ListFilter::All => lookup.immediates(&parent)?,
        ListFilter::Files => lookup
            .immediate_files(&parent)?
            .iter()
            .map(|id| lookup.get_item(id))
            .collect::<filehead_core::Result<_>>()?,
        ListFilter::Folders => lookup
            .immediate_folders(&parent)?
            .iter()
            .map(|id| lookup.get_item(id))
            .collect::<filehead_core::Result<_>>()?,
    };

    if json {
        let entries: Vec<_> = items
            .iter()
            .map(|item| {
                json!({
                    "path": item.path().as_str(),
                    "kind": item.kind().to_string(),
                    "size": item.size(),
                })
            })
            .collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }

    for item in &items {
        let name = item.path().name().unwrap_or("/");
        match item.kind() {
            ItemKind::Folder => {
                writeln!(out, "{:>10}  {}", "-".dimmed(), format!("{name}/").blue().bold())?
            }
            ItemKind::File => writeln!(out, "{:>10}  {}", item.size(), name)?,
        }
    }
    Ok(())
}

/// Run the tree command
pub fn run_tree(backend: &Backend, path: &str, json: bool, out: &mut dyn Write) -> Result<()> {
    let parent = backend.repository().parse_id(path)?;
    let lookup = backend.lookup(Revision::now());
    let ids = lookup.descendants(&parent)?;

    if json {
        let paths: Vec<&str> = ids.iter().map(|id| id.rel_path().as_str()).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&paths)?)?;
        return Ok(());
    }

    for id in &ids {
        writeln!(out, "{}", id.rel_path())?;
    }
    writeln!(
        out,
        "{} {} items under {}",
        "Total:".dimmed(),
        ids.len(),
        parent.rel_path()
    )?;
    Ok(())
}
