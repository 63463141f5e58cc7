//! `tubeq init` – create the directory layout.

use anyhow::Result;
use tubeq_core::layout::RunContext;

pub fn run_init(ctx: &RunContext) -> Result<()> {
    ctx.layout.ensure()?;
    for dir in ctx.layout.dirs() {
        println!("{}", dir.display());
    }
    Ok(())
}
