//! Intent routing
//!
//! Slash commands are parsed deterministically. Free text goes to the LLM,
//! which answers with the JSON form of an [`AgentCommand`]; anything the
//! model returns that does not deserialize becomes a plain question.

use std::time::Duration;

use tracing::{debug, warn};

use super::command::AgentCommand;
use crate::ai::{
    CompletionRequest, PromptTemplates, SharedProvider, extract_json, generate_with_timeout,
};
use crate::types::{RepolyzeError, Result};

pub struct IntentRouter {
    provider: Option<SharedProvider>,
    timeout: Duration,
}

impl IntentRouter {
    pub fn new(provider: Option<SharedProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn route(&self, query: &str) -> Result<AgentCommand> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RepolyzeError::Usage("Empty query".to_string()));
        }

        if let Some(command) = AgentCommand::parse(query) {
            return command;
        }

        let Some(provider) = &self.provider else {
            debug!("No LLM configured, treating query as a question");
            return Ok(ask(query));
        };

        let request = CompletionRequest::json(PromptTemplates::intent_routing(), query);
        let response =
            generate_with_timeout(provider.as_ref(), &request, self.timeout, "intent routing")
                .await?;

        Ok(interpret(&response.content, query))
    }
}

/// Turn the model's reply into a command, falling back to `Ask`
fn interpret(raw: &str, query: &str) -> AgentCommand {
    let command = extract_json(raw).and_then(|value| {
        serde_json::from_value::<AgentCommand>(value).map_err(RepolyzeError::from)
    });

    match command {
        Ok(AgentCommand::Ask { question }) if question.trim().is_empty() => ask(query),
        Ok(command) => {
            debug!("Routed query to {}", command.name());
            command
        }
        Err(e) => {
            warn!("Unusable routing reply ({}), answering as a question", e);
            ask(query)
        }
    }
}

fn ask(query: &str) -> AgentCommand {
    AgentCommand::Ask {
        question: query.to_string(),
    }
}
