//! The `sortable init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create sortable.toml
    if std::path::Path::new("sortable.toml").exists() {
        println!("sortable.toml already exists, skipping.");
    } else {
        std::fs::write("sortable.toml", SAMPLE_CONFIG)?;
        println!("Created sortable.toml");
    }

    // Create example problem
    std::fs::create_dir_all("problems")?;
    let example_path = std::path::Path::new("problems/example.toml");
    if example_path.exists() {
        println!("problems/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_PROBLEM)?;
        println!("Created problems/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: sortable validate --problem problems/example.toml");
    println!("  2. Run: sortable import --problem problems/example.toml");
    println!("  3. Run: sortable show --problem-id countries --learner alice");
    println!("  4. Run: sortable submit --problem-id countries --learner alice --order \"Australia,China,Finland,Pakistan,United States\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# sortable configuration

state_dir = "./sortable-state"

# Grades are logged by default. To post them to an LMS instead:
#
# [grade_sink]
# type = "http"
# base_url = "https://lms.example.com/api"
# token = "${SORTABLE_GRADE_TOKEN}"

[grade_sink]
type = "log"

# catalog = "locale/de.toml"
"#;

const EXAMPLE_PROBLEM: &str = r##"[problem]
id = "countries"
display_name = "Sorting Problem"
question_text = "Sort the following country names in alphabetical order"
items = ["Australia", "China", "Finland", "Pakistan", "United States"]
max_attempts = 3
weight = 1.0
graded = true

[problem.style]
item_background_color = "#f2f2f2"
item_text_color = "#000000"
"##;
