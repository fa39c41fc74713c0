//! Command implementations for filehead-cli

pub mod apply;
pub mod cat;
pub mod lock;
pub mod ls;
pub mod stat;

pub use apply::run_apply;
pub use cat::run_cat;
pub use lock::{run_lock, run_locks, run_unlock};
pub use ls::{ListFilter, run_ls, run_tree};
pub use stat::run_stat;
