//! The `sortable edit` command.

use anyhow::Result;

use sortable_core::model::ProblemUpdate;

use super::{split_list, Context};

/// Fields to change; `None` keeps the current value.
pub struct Edits {
    pub display_name: Option<String>,
    pub question: Option<String>,
    pub items: Option<String>,
    pub max_attempts: Option<u32>,
    pub weight: Option<f64>,
    pub graded: Option<bool>,
    pub background: Option<String>,
    pub text_color: Option<String>,
}

impl Edits {
    fn apply(self, update: &mut ProblemUpdate) {
        if let Some(v) = self.display_name {
            update.display_name = v;
        }
        if let Some(v) = self.question {
            update.question_text = v;
        }
        if let Some(v) = self.items {
            update.items = split_list(&v);
        }
        if let Some(v) = self.max_attempts {
            update.max_attempts = v;
        }
        if let Some(v) = self.weight {
            update.weight = v;
        }
        if let Some(v) = self.graded {
            update.graded = v;
        }
        if let Some(v) = self.background {
            update.item_background_color = v;
        }
        if let Some(v) = self.text_color {
            update.item_text_color = v;
        }
    }
}

pub async fn execute(ctx: &Context, problem_id: &str, edits: Edits) -> Result<()> {
    let engine = ctx.engine()?;
    let current = engine.problem(problem_id).await?;

    let mut update = ProblemUpdate::from_problem(&current);
    edits.apply(&mut update);
    engine.studio_submit(problem_id, update).await?;

    println!("Updated {problem_id}");
    Ok(())
}
