//! Cat command implementation

use std::io::Write;

use filehead_core::{Backend, Revision};

use crate::error::Result;

/// Stream a file's content into `out`
pub fn run_cat(backend: &Backend, path: &str, out: &mut dyn Write) -> Result<()> {
    let id = backend.repository().parse_id(path)?;
    let item = backend.lookup(Revision::now()).get_item(&id)?;
    item.contents(out)?;
    out.flush()?;
    Ok(())
}
