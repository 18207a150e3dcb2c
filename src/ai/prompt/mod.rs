//! Prompt Builder System
//!
//! Standardized prompt construction for LLM interactions.
//! Every prompt sent by the insight generator and the intent router is
//! assembled here so that role, objectives and output rules read the same
//! way across tasks.

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Context as ordered key-value pairs
    Context(Vec<(String, String)>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Code block with language
    Code { language: String, content: String },
    /// Focus enforcement with restrictions
    Focus {
        target: String,
        restrictions: Vec<String>,
    },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    /// Add objectives section
    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add a context item, merging into the existing context section
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        let entry = (key.to_string(), value.to_string());
        match self.sections.iter_mut().find_map(|s| match s {
            PromptSection::Context(items) => Some(items),
            _ => None,
        }) {
            Some(items) => items.push(entry),
            None => self.sections.push(PromptSection::Context(vec![entry])),
        }
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add code block
    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Add focus enforcement section
    pub fn focus(mut self, target: &str, restrictions: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Focus {
            target: target.to_string(),
            restrictions: restrictions.into_iter().map(String::from).collect(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!(
                        "You are an expert {} specializing in {}.\n",
                        expertise, task
                    ));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("<OBJECTIVES>\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push_str("</OBJECTIVES>\n\n");
                }
                PromptSection::Context(items) => {
                    prompt.push_str("# Context\n\n");
                    for (key, value) in items {
                        prompt.push_str(&format!("**{}**: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    if !content.ends_with('\n') {
                        prompt.push('\n');
                    }
                    prompt.push_str("```\n\n");
                }
                PromptSection::Focus {
                    target,
                    restrictions,
                } => {
                    prompt.push_str("<FOCUS>\n");
                    prompt.push_str(&format!("IMPORTANT: Focus EXCLUSIVELY on: {}\n", target));
                    for restriction in restrictions {
                        prompt.push_str(&format!("- {}\n", restriction));
                    }
                    prompt.push_str("</FOCUS>\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

/// Preset prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// System prompt shared by every free-text request
    pub const SYSTEM: &'static str = "You are a senior software engineer helping a developer \
        understand a GitHub repository. Answer in concise markdown. Base every statement on \
        the code and metrics provided; say so when information is missing.";

    /// Improvement suggestions for a single source file
    pub fn improvements(file_path: &str) -> PromptBuilder {
        PromptBuilder::new()
            .role("Python code reviewer", "actionable refactoring advice")
            .objectives(vec![
                "Code readability",
                "Performance optimization",
                "Best practices",
                "Potential bugs or inefficiencies",
            ])
            .focus(
                file_path,
                vec![
                    "Reference concrete functions or lines from the provided code",
                    "Use the complexity and lint figures to prioritise",
                    "Do NOT speculate about code you cannot see",
                ],
            )
    }

    /// Repository-level commentary over a metrics table
    pub fn repository_summary(full_name: &str) -> PromptBuilder {
        PromptBuilder::new()
            .role("software quality analyst", "code metrics interpretation")
            .objectives(vec![
                "Summarise the overall health of the analysed files",
                "Point out the most complex functions and what to do about them",
                "Group recurring lint issues into themes",
                "Recommend the three most valuable next steps",
            ])
            .focus(
                full_name,
                vec![
                    "Only discuss files listed in the metrics",
                    "Keep the answer under 300 words",
                ],
            )
    }

    /// Free-form question about a repository or the tool itself
    pub fn answer(question: &str) -> PromptBuilder {
        PromptBuilder::new()
            .role(
                "repository analysis assistant",
                "answering developer questions",
            )
            .section("Question", question)
    }

    /// System prompt instructing the model to classify a chat query
    pub fn intent_routing() -> String {
        PromptBuilder::new()
            .role(
                "command router for a repository analysis tool",
                "mapping user requests to commands",
            )
            .section(
                "Commands",
                "Reply with exactly one JSON object with a \"command\" field:\n\
                 {\"command\": \"fetch_repository\", \"repo\": \"owner/name\"}\n\
                 {\"command\": \"list_files\", \"repo\": \"owner/name\", \"path\": null}\n\
                 {\"command\": \"read_file\", \"repo\": \"owner/name\", \"path\": \"file.py\"}\n\
                 {\"command\": \"analyze_file\", \"repo\": \"owner/name\", \"path\": null}\n\
                 {\"command\": \"analyze_repository\", \"repo\": \"owner/name\"}\n\
                 {\"command\": \"suggest_improvements\", \"repo\": \"owner/name\", \"path\": null}\n\
                 {\"command\": \"generate_report\", \"repo\": \"owner/name\"}\n\
                 {\"command\": \"ask\", \"question\": \"...\"}\n\
                 {\"command\": \"help\"}\n\
                 {\"command\": \"exit\"}",
            )
            .section(
                "Rules",
                "- repo is owner/name or a github.com URL copied from the request\n\
                 - path is null when the user did not name a file\n\
                 - use \"ask\" when no other command fits or the repository is not named\n\
                 - output JSON only, no prose",
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("code analyst", "Python review")
            .objectives(vec!["Analyze code", "Suggest fixes"])
            .build();

        assert!(prompt.contains("<ROLE>"));
        assert!(prompt.contains("code analyst"));
        assert!(prompt.contains("1. Analyze code"));
        assert!(prompt.contains("2. Suggest fixes"));
    }

    #[test]
    fn test_context_items_keep_order() {
        let prompt = PromptBuilder::new()
            .context_item("Repository", "octocat/hello")
            .text("between")
            .context_item("Language", "Python")
            .build();

        let repo = prompt.find("**Repository**: octocat/hello").unwrap();
        let lang = prompt.find("**Language**: Python").unwrap();
        assert!(repo < lang);
        assert_eq!(prompt.matches("# Context").count(), 1);
    }

    #[test]
    fn test_code_block_closed_on_own_line() {
        let prompt = PromptBuilder::new().code("python", "x = 1").build();
        assert_eq!(prompt, "```python\nx = 1\n```");
    }

    #[test]
    fn test_improvements_template() {
        let prompt = PromptTemplates::improvements("app/main.py")
            .code("python", "def main():\n    pass\n")
            .build();

        assert!(prompt.contains("app/main.py"));
        assert!(prompt.contains("Code readability"));
        assert!(prompt.contains("Potential bugs or inefficiencies"));
        assert!(prompt.contains("```python"));
    }

    #[test]
    fn test_intent_routing_lists_every_command() {
        let prompt = PromptTemplates::intent_routing();
        for command in [
            "fetch_repository",
            "list_files",
            "read_file",
            "analyze_file",
            "analyze_repository",
            "suggest_improvements",
            "generate_report",
            "\"ask\"",
            "\"help\"",
            "\"exit\"",
        ] {
            assert!(prompt.contains(command), "missing {}", command);
        }
    }
}
