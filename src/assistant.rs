use tracing::{error, info};

use crate::block::Block;
use crate::config::{MessagesConfig, ServiceConfig};
use crate::parser;
use crate::service::{CompletionError, CompletionRequest, CompletionService, InlineImage};

/// Chat front-end over a completion service.
///
/// Every call yields text for the user: failures become the configured
/// alert messages instead of errors.
pub struct Assistant<S> {
    service: S,
    default_prompt: String,
    messages: MessagesConfig,
}

impl<S: CompletionService> Assistant<S> {
    pub fn new(service: S, config: &ServiceConfig) -> Self {
        Self {
            service,
            default_prompt: config.default_prompt.clone(),
            messages: config.messages.clone(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn reply(&self, message: &str, image: Option<InlineImage>) -> String {
        let message = if message.is_empty() {
            self.default_prompt.clone()
        } else {
            message.to_string()
        };
        let request = CompletionRequest { message, image };

        match self.service.complete(&request).await {
            Ok(text) if text.is_empty() => self.messages.empty_response.clone(),
            Ok(text) => {
                info!(provider = self.service.name(), chars = text.len(), "received reply");
                text
            }
            Err(err) => {
                error!(provider = self.service.name(), error = %err, "completion request failed");
                match err {
                    CompletionError::ResourceUnavailable(_) => {
                        self.messages.resource_unavailable.clone()
                    }
                    CompletionError::Communication(_) => {
                        self.messages.communication_failure.clone()
                    }
                }
            }
        }
    }

    /// Reply and parse the text into renderable blocks.
    pub async fn reply_blocks(&self, message: &str, image: Option<InlineImage>) -> Vec<Block> {
        parser::assemble(&self.reply(message, image).await)
    }
}
