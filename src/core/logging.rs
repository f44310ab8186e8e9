//! Logging setup for the report binary and tests
//!
//! Assembly summaries log at `info`, per-pass counts at `debug` and rejected
//! leaves at `warn`.

/// Install `env_logger`, showing assembly summaries and rejected leaves.
///
/// `RUST_LOG=pvtree=debug` adds grammar expansion and overlap sample detail.
///
/// # Example
/// ```no_run
/// use pvtree::assembly::{Assembler, AssemblyConfig};
/// use pvtree::species::{LeafSpecies, LeafSystem, TreeSpecies, TreeSystem};
///
/// pvtree::core::logging::init();
/// let tree = TreeSystem::new(TreeSpecies::Ternary);
/// let leaf = LeafSystem::new(LeafSpecies::Cordate);
/// let structure = Assembler::new(AssemblyConfig::default()).build(&tree, &leaf)?;
/// log::info!("Ternary tree carries {} leaves", structure.metrics.leaf_count);
/// # Ok::<(), pvtree::core::Error>(())
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}

/// Initialize logging for tests, ignoring repeated initialization.
pub fn init_for_tests() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn")
    ).is_test(true).try_init();
}
