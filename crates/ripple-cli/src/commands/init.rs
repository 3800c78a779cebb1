//! The `ripple init` command.

use std::path::Path;

use anyhow::{Context, Result};

const FILES: &[(&str, &str)] = &[
    ("ripple.toml", SAMPLE_CONFIG),
    ("catalog/manifest.json", SAMPLE_MANIFEST),
    ("catalog/tokens.json", SAMPLE_TOKENS),
    ("catalog/topics/math.json", SAMPLE_TOPICS),
    ("catalog/banks/math-9.json", SAMPLE_BANK),
];

pub fn execute() -> Result<()> {
    for (path, content) in FILES {
        let path = Path::new(path);
        if path.exists() {
            println!("{} already exists, skipping.", path.display());
            continue;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }

    println!("\nNext steps:");
    println!("  1. Run: ripple validate --route math-9");
    println!("  2. Run: ripple generate --route math-9 --count 5 --title \"Unit test\"");
    println!("  3. Point [catalog] at your own item banks in ripple.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# ripple configuration

default_item_count = 10

[catalog]
# Either a catalog server...
# base_url = "https://catalog.example.org/v1"
# ...or a local directory laid out the same way.
root_dir = "catalog"
timeout_secs = 30

[store]
path = "ripple.db"
"#;

const SAMPLE_MANIFEST: &str = r#"{
  "contentVersion": "1",
  "routes": [
    {"id": "math-9", "subject": "math", "gradeLevel": "9", "bank": "banks/math-9.json", "topics": "topics/math.json"}
  ]
}
"#;

const SAMPLE_TOKENS: &str = r#"{
  "tokens": [
    {"id": "tk-algebra", "label": "Algebraic reasoning"},
    {"id": "tk-geometry", "label": "Spatial reasoning"},
    {"id": "tk-statistics", "label": "Data literacy"}
  ]
}
"#;

const SAMPLE_TOPICS: &str = r#"{
  "subject": "math",
  "topics": [
    {"id": "algebra", "label": "Algebra"},
    {"id": "geometry", "label": "Geometry"},
    {"id": "statistics", "label": "Statistics"}
  ]
}
"#;

const SAMPLE_BANK: &str = r#"{
  "meta": {"subject": "math", "gradeLevel": "9", "contentVersion": "1"},
  "items": [
    {"id": "m9-001", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA06", "theme": "algebra", "subTheme": "linear-equations", "itemType": "multiple_choice", "difficultyLevel": 2, "cognitiveLevel": "understand", "estimatedMinutes": 2, "bodyHtml": "<p>Solve 3x + 5 = 20.</p>", "tokens": [{"tokenId": "tk-algebra"}], "alternatives": [{"letter": "A", "bodyHtml": "<p>Option A</p>"}, {"letter": "B", "bodyHtml": "<p>Option B</p>"}, {"letter": "C", "bodyHtml": "<p>Option C</p>"}, {"letter": "D", "bodyHtml": "<p>Option D</p>"}], "answerKey": "B"},
    {"id": "m9-002", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA06", "theme": "algebra", "subTheme": "linear-equations", "itemType": "true_false", "difficultyLevel": 1, "cognitiveLevel": "apply", "estimatedMinutes": 3, "bodyHtml": "<p>The equation 2x = 2x + 1 has exactly one solution.</p>", "tokens": [{"tokenId": "tk-algebra"}], "alternatives": [{"letter": "T", "bodyHtml": "<p>True</p>"}, {"letter": "F", "bodyHtml": "<p>False</p>"}], "answerKey": "F"},
    {"id": "m9-003", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA06", "theme": "algebra", "subTheme": "linear-equations", "itemType": "short_answer", "difficultyLevel": 3, "cognitiveLevel": "analyze", "estimatedMinutes": 4.5, "bodyHtml": "<p>Write the equation of a line through (0, 2) with slope 3.</p>", "tokens": [{"tokenId": "tk-algebra"}], "answerKey": ["algebra", "linear equations"]},
    {"id": "m9-004", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA09", "theme": "algebra", "subTheme": "quadratics", "itemType": "multiple_choice", "difficultyLevel": 2, "cognitiveLevel": "understand", "estimatedMinutes": 2, "bodyHtml": "<p>Which value is a root of x^2 - 5x + 6?</p>", "tokens": [{"tokenId": "tk-algebra"}], "alternatives": [{"letter": "A", "bodyHtml": "<p>Option A</p>"}, {"letter": "B", "bodyHtml": "<p>Option B</p>"}, {"letter": "C", "bodyHtml": "<p>Option C</p>"}, {"letter": "D", "bodyHtml": "<p>Option D</p>"}], "answerKey": "A"},
    {"id": "m9-005", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA09", "theme": "algebra", "subTheme": "quadratics", "itemType": "multiple_choice", "difficultyLevel": 1, "cognitiveLevel": "apply", "estimatedMinutes": 3, "bodyHtml": "<p>How many real roots does x^2 + 1 = 0 have?</p>", "tokens": [{"tokenId": "tk-algebra"}], "alternatives": [{"letter": "A", "bodyHtml": "<p>Option A</p>"}, {"letter": "B", "bodyHtml": "<p>Option B</p>"}, {"letter": "C", "bodyHtml": "<p>Option C</p>"}, {"letter": "D", "bodyHtml": "<p>Option D</p>"}], "answerKey": "B"},
    {"id": "m9-006", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA09", "theme": "algebra", "subTheme": "quadratics", "itemType": "true_false", "difficultyLevel": 3, "cognitiveLevel": "analyze", "estimatedMinutes": 4.5, "bodyHtml": "<p>Every quadratic has two distinct real roots.</p>", "tokens": [{"tokenId": "tk-algebra"}], "alternatives": [{"letter": "T", "bodyHtml": "<p>True</p>"}, {"letter": "F", "bodyHtml": "<p>False</p>"}], "answerKey": "F"},
    {"id": "m9-007", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA10", "theme": "geometry", "subTheme": "triangles", "itemType": "short_answer", "difficultyLevel": 2, "cognitiveLevel": "understand", "estimatedMinutes": 2, "bodyHtml": "<p>Name the triangle whose sides measure 3, 4 and 5.</p>", "tokens": [{"tokenId": "tk-geometry"}], "answerKey": ["geometry", "triangles"]},
    {"id": "m9-008", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA10", "theme": "geometry", "subTheme": "triangles", "itemType": "multiple_choice", "difficultyLevel": 1, "cognitiveLevel": "apply", "estimatedMinutes": 3, "bodyHtml": "<p>The angles of a triangle add up to:</p>", "tokens": [{"tokenId": "tk-geometry"}], "alternatives": [{"letter": "A", "bodyHtml": "<p>Option A</p>"}, {"letter": "B", "bodyHtml": "<p>Option B</p>"}, {"letter": "C", "bodyHtml": "<p>Option C</p>"}, {"letter": "D", "bodyHtml": "<p>Option D</p>"}], "answerKey": "A"},
    {"id": "m9-009", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA10", "theme": "geometry", "subTheme": "triangles", "itemType": "multiple_choice", "difficultyLevel": 3, "cognitiveLevel": "analyze", "estimatedMinutes": 4.5, "bodyHtml": "<p>A right triangle has legs 6 and 8. Its hypotenuse is:</p>", "tokens": [{"tokenId": "tk-geometry"}], "alternatives": [{"letter": "A", "bodyHtml": "<p>Option A</p>"}, {"letter": "B", "bodyHtml": "<p>Option B</p>"}, {"letter": "C", "bodyHtml": "<p>Option C</p>"}, {"letter": "D", "bodyHtml": "<p>Option D</p>"}], "answerKey": "B"},
    {"id": "m9-010", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA22", "theme": "statistics", "subTheme": "averages", "itemType": "true_false", "difficultyLevel": 2, "cognitiveLevel": "understand", "estimatedMinutes": 2, "bodyHtml": "<p>The mean of 2, 4 and 9 is 5.</p>", "tokens": [{"tokenId": "tk-statistics"}], "alternatives": [{"letter": "T", "bodyHtml": "<p>True</p>"}, {"letter": "F", "bodyHtml": "<p>False</p>"}], "answerKey": "F"},
    {"id": "m9-011", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA22", "theme": "statistics", "subTheme": "averages", "itemType": "short_answer", "difficultyLevel": 1, "cognitiveLevel": "apply", "estimatedMinutes": 3, "bodyHtml": "<p>Find the median of 7, 1, 4, 9, 3.</p>", "tokens": [{"tokenId": "tk-statistics"}], "answerKey": ["statistics", "averages"]},
    {"id": "m9-012", "subject": "math", "gradeLevel": "9", "curriculumCode": "EF09MA22", "theme": "statistics", "subTheme": "averages", "itemType": "multiple_choice", "difficultyLevel": 3, "cognitiveLevel": "analyze", "estimatedMinutes": 4.5, "bodyHtml": "<p>Which measure is most affected by an outlier?</p>", "tokens": [{"tokenId": "tk-statistics"}], "alternatives": [{"letter": "A", "bodyHtml": "<p>Option A</p>"}, {"letter": "B", "bodyHtml": "<p>Option B</p>"}, {"letter": "C", "bodyHtml": "<p>Option C</p>"}, {"letter": "D", "bodyHtml": "<p>Option D</p>"}], "answerKey": "A"}
  ]
}
"#;
