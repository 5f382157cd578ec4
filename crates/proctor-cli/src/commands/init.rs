//! The `proctor init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("proctor.toml").exists() {
        println!("proctor.toml already exists, skipping.");
    } else {
        std::fs::write("proctor.toml", SAMPLE_CONFIG)?;
        println!("Created proctor.toml");
    }

    std::fs::create_dir_all("exams")?;
    let example_path = std::path::Path::new("exams/example.json");
    if example_path.exists() {
        println!("exams/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_EXAM)?;
        println!("Created exams/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: proctor validate --exam exams/example.json");
    println!("  2. Run: proctor run --exam exams/example.json --minutes 5");
    println!("  3. Review: proctor summary --result <path printed by run>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# proctor configuration

default_timer_hours = 1
default_timer_minutes = 30
output_dir = "./proctor-results"

# A topic is accurate/inaccurate when its accuracy differs from the
# session average by more than these percentage points, and fast/slow
# when its time per question differs by more than these seconds.
[swot]
accurate_margin_pct = 5.0
inaccurate_margin_pct = 10.0
fast_margin_secs = 5.0
slow_margin_secs = 10.0
"#;

const EXAMPLE_EXAM: &str = r#"{
  "name": "Example Science Quiz",
  "questions": [
    {
      "question": "What is the SI unit of force?",
      "options": [
        { "label": 1, "value": "Newton" },
        { "label": 2, "value": "Joule" },
        { "label": 3, "value": "Watt" },
        { "label": 4, "value": "Pascal" }
      ],
      "answer_label": 1,
      "topic": "Physics",
      "explanation": "One newton accelerates one kilogram at one metre per second squared."
    },
    {
      "question": "Which gas makes up most of Earth's atmosphere?",
      "options": [
        { "label": 1, "value": "Oxygen" },
        { "label": 2, "value": "Carbon dioxide" },
        { "label": 3, "value": "Nitrogen" },
        { "label": 4, "value": "Argon" }
      ],
      "answer_label": 3,
      "topic": "Chemistry",
      "explanation": "Nitrogen is about 78% of dry air by volume."
    },
    {
      "question": "What is the chemical symbol for sodium?",
      "options": [
        { "label": 1, "value": "S" },
        { "label": 2, "value": "Na" },
        { "label": 3, "value": "So" }
      ],
      "answer_label": 2,
      "topic": "Chemistry",
      "explanation": "From the Latin name natrium."
    },
    {
      "question": "Which organelle produces most of a cell's ATP?",
      "options": [
        { "label": 1, "value": "Ribosome" },
        { "label": 2, "value": "Nucleus" },
        { "label": 3, "value": "Mitochondrion" }
      ],
      "answer_label": 3,
      "topic": "Biology",
      "explanation": "Oxidative phosphorylation happens in the mitochondria."
    }
  ]
}
"#;
