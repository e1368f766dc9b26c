//! The `sortable show` command.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use sortable_core::feedback::format_points;
use sortable_core::view::StudentView;

use super::Context;

pub async fn execute(ctx: &Context, problem_id: &str, learner: &str, json: bool) -> Result<()> {
    let engine = ctx.engine()?;
    let view = engine.student_view(problem_id, learner).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }
    Ok(())
}

fn print_view(view: &StudentView) {
    println!("{}", view.display_name);
    println!("{}\n", view.question_text);

    let submitted = view.attempts > 0;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Item", "Status"]);
    for (i, item) in view.items.iter().enumerate() {
        let status = match (submitted, item.correct) {
            (false, _) => "",
            (true, true) => "correct",
            (true, false) => "incorrect",
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&item.label),
            Cell::new(status),
        ]);
    }
    println!("{table}");

    let attempts = if view.max_attempts == 0 {
        format!("{} (unlimited)", view.attempts)
    } else {
        format!("{}/{}", view.attempts, view.max_attempts)
    };
    println!("Attempts: {attempts}");
    if view.graded {
        println!(
            "Score: {}/{}",
            format_points(view.user_score),
            format_points(view.max_score)
        );
    }
    if view.completed {
        println!("Completed");
    }
}
