//! The `sortable import` command.

use std::path::PathBuf;

use anyhow::Result;

use sortable_core::parser;

use super::Context;

pub async fn execute(ctx: &Context, problem_path: PathBuf) -> Result<()> {
    let problems = if problem_path.is_dir() {
        parser::load_problem_directory(&problem_path)?
    } else {
        vec![parser::parse_problem(&problem_path)?]
    };
    anyhow::ensure!(!problems.is_empty(), "no problems found in {}", problem_path.display());

    let engine = ctx.engine()?;
    for problem in &problems {
        let warnings = parser::validate_problem(problem);
        for w in &warnings {
            tracing::warn!("{}: {}", w.problem_id, w.message);
        }
        engine.install_problem(problem).await?;
        println!("Imported {} ({} items)", problem.id, problem.items.len());
    }

    Ok(())
}
