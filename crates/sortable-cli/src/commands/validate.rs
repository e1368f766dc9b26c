//! The `sortable validate` command.

use std::path::PathBuf;

use anyhow::Result;

use sortable_core::parser;

pub fn execute(problem_path: PathBuf) -> Result<()> {
    let problems = if problem_path.is_dir() {
        parser::load_problem_directory(&problem_path)?
    } else {
        vec![parser::parse_problem(&problem_path)?]
    };

    let mut total_warnings = 0;

    for problem in &problems {
        println!("Problem: {} ({} items)", problem.id, problem.items.len());

        let warnings = parser::validate_problem(problem);
        for w in &warnings {
            println!("  [{}] WARNING: {}", w.problem_id, w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All problems valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
