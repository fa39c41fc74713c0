//! Lock, unlock and locks commands

use std::io::Write;

use colored::Colorize;
use filehead_core::{Backend, Lock, Revision};
use filehead_fs::ItemPath;

use crate::error::{CliError, Result};

fn parse_paths(paths: &[String]) -> Result<Vec<ItemPath>> {
    paths
        .iter()
        .map(|p| ItemPath::new(p).map_err(CliError::from))
        .collect()
}

/// Run the lock command
pub fn run_lock(backend: &Backend, paths: &[String], message: &str, out: &mut dyn Write) -> Result<()> {
    let paths = parse_paths(paths)?;
    let locks = backend.commit().lock(message, &Revision::now(), &paths)?;
    for lock in &locks {
        writeln!(
            out,
            "{} Locked {} ({})",
            "+".green(),
            lock.path.as_str().cyan(),
            lock.token
        )?;
    }
    Ok(())
}

/// Run the unlock command
///
/// Every path must currently be locked; nothing is released otherwise.
pub fn run_unlock(backend: &Backend, paths: &[String], out: &mut dyn Write) -> Result<()> {
    let lookup = backend.lookup(Revision::now());
    let mut held = Vec::new();
    for path in parse_paths(paths)? {
        let id = backend.repository().item_id(path);
        match lookup.locked(&id)? {
            Some(lock) => held.push(lock),
            None => {
                return Err(CliError::usage(format!("{} is not locked", id.rel_path())));
            }
        }
    }

    backend.commit().unlock(&held)?;
    for lock in &held {
        writeln!(out, "{} Unlocked {}", "-".red(), lock.path.as_str().cyan())?;
    }
    Ok(())
}

/// Run the locks command
pub fn run_locks(backend: &Backend, json: bool, out: &mut dyn Write) -> Result<()> {
    let locks: Vec<Lock> = backend.lock_store().list(backend.repository())?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&locks)?)?;
        return Ok(());
    }

    if locks.is_empty() {
        writeln!(out, "{}", "No locks held".dimmed())?;
        return Ok(());
    }
    for lock in &locks {
        writeln!(
            out,
            "{:<32} {:<12} {}  {}",
            lock.path.as_str().cyan(),
            lock.owner,
            lock.created.format("%Y-%m-%d %H:%M:%S"),
            lock.message.dimmed()
        )?;
    }
    Ok(())
}
