//! The `invigil questions` command.

use std::path::PathBuf;

use anyhow::Result;

use invigil_core::traits::QuestionSource;
use invigil_graders::load_config_from;

pub async fn execute(
    topic: String,
    regenerate: u32,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let Some(source) = config.remote_question_source() else {
        anyhow::bail!(
            "no question source configured. Run `invigil init` and set [question_source]."
        );
    };

    let questions = source.generate(&topic, regenerate).await?;

    println!("Questions for \"{topic}\":");
    for (index, question) in questions.iter().enumerate() {
        println!("  {}. {}", index + 1, question);
    }

    if let Some(path) = output {
        let skeleton = assessment_skeleton(&topic, &questions);
        std::fs::write(&path, skeleton)?;
        println!("\nAssessment skeleton written to: {}", path.display());
    }

    Ok(())
}

fn assessment_skeleton(topic: &str, questions: &[String]) -> String {
    let slug: String = topic
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();

    let mut toml = String::new();
    toml.push_str("[assessment]\n");
    toml.push_str(&format!("id = {:?}\n", slug));
    toml.push_str(&format!("name = {:?}\n", topic));
    toml.push_str(&format!("topic = {:?}\n", topic));
    toml.push_str("total_seconds = 3000\n");
    toml.push_str("questions = [\n");
    for question in questions {
        toml.push_str(&format!("    {:?},\n", question));
    }
    toml.push_str("]\n");
    toml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_parses_back_as_assessment() {
        let questions = vec![
            "Define a directed acyclic graph.".to_string(),
            "Question with \"quotes\" inside.".to_string(),
        ];
        let skeleton = assessment_skeleton("Graph Theory", &questions);

        let assessment = invigil_core::parser::parse_assessment_str(
            &skeleton,
            std::path::Path::new("skeleton.toml"),
        )
        .unwrap();
        assert_eq!(assessment.id, "graph-theory");
        assert_eq!(assessment.topic, "Graph Theory");
        assert_eq!(assessment.questions, questions);
    }
}
