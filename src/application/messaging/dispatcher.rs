//! Directive dispatcher - Turns a generation response into the final outcome

use std::sync::Arc;

use crate::application::errors::ServiceError;
use crate::domain::entities::{
    Directive, DirectiveKind, DispatchOutcome, FileAttachment, GenerationRequest, IncomingMessage,
    Prompt,
};
use crate::domain::traits::{GenerationService, ImageSearch};
use super::directives;

/// Marker the relay recognises as an internal reasoning request
const REASONING_MARKER: &str = "<raciocínio>:";

/// Identity used for code generation so it stays out of user conversations
pub const CODE_USER_ID: &str = "code-simple";
pub const CODE_CHANNEL_ID: &str = "code-channel";

pub const NO_IMAGE_REPLY: &str = "❌ No image found.";

/// Effect of applying one directive
#[derive(Debug)]
enum Step {
    /// Replace the working response text and keep going
    Continue(String),
    /// Stop with a final outcome
    Finish(DispatchOutcome),
}

/// Scans responses for directives and runs their side effects
pub struct DirectiveDispatcher {
    generation: Arc<dyn GenerationService>,
    images: Arc<dyn ImageSearch>,
}

impl DirectiveDispatcher {
    pub fn new(generation: Arc<dyn GenerationService>, images: Arc<dyn ImageSearch>) -> Self {
        Self { generation, images }
    }

    /// Resolve a response into the outcome shown to the user.
    ///
    /// Follow-up thoughts in the response all run, in order, each replacing
    /// the working text. The first image or code request of the response then
    /// ends dispatch. Failing that, the first image or code request in the
    /// replaced text ends it. Without a terminal directive the outcome is the
    /// working text.
    pub async fn dispatch(
        &self,
        response: &str,
        message: &IncomingMessage,
    ) -> Result<DispatchOutcome, ServiceError> {
        let mut working = response.to_string();
        let mut replaced = false;

        for directive in &directives::scan(response) {
            match self.apply(directive, message).await? {
                Step::Continue(text) => {
                    working = text;
                    replaced = true;
                }
                Step::Finish(outcome) => return Ok(outcome),
            }
        }

        if replaced {
            let pending = directives::scan(&working).into_iter().find(Directive::is_terminal);
            if let Some(directive) = pending {
                if let Step::Finish(outcome) = self.apply(&directive, message).await? {
                    return Ok(outcome);
                }
            }
        }

        Ok(DispatchOutcome::Reply(working))
    }

    async fn apply(&self, directive: &Directive, message: &IncomingMessage) -> Result<Step, ServiceError> {
        tracing::debug!(
            "[{}] Applying directive {:?} at {:?}",
            message.channel_id, directive.kind, directive.span
        );
        match &directive.kind {
            DirectiveKind::FollowupThought { description } => {
                let prompt = format!(
                    "{} The user wants: {}. What do you think should be done?",
                    REASONING_MARKER, description
                );
                let request = GenerationRequest::new(
                    Prompt::Text(prompt),
                    message.author.id.clone(),
                    message.channel_id.clone(),
                );
                let text = self.generation.generate(&request).await?;
                Ok(Step::Continue(text))
            }
            DirectiveKind::ImageRequest { query } => {
                let results = self.images.search(query).await?;
                let outcome = match results.into_iter().next() {
                    Some(url) => DispatchOutcome::File(FileAttachment::Url(url)),
                    None => {
                        tracing::info!("[{}] No image for query '{}'", message.channel_id, query);
                        DispatchOutcome::reply(NO_IMAGE_REPLY)
                    }
                };
                Ok(Step::Finish(outcome))
            }
            DirectiveKind::CodeRequest { extension, task } => {
                let prompt = format!(
                    "{} Generate a code for this task. Only return the code.\n\n{}",
                    REASONING_MARKER, task
                );
                let request = GenerationRequest::new(Prompt::Text(prompt), CODE_USER_ID, CODE_CHANNEL_ID);
                let response = self.generation.generate(&request).await?;
                let code = directives::extract_code(&response);
                Ok(Step::Finish(DispatchOutcome::File(FileAttachment::named(
                    format!("code.{}", extension),
                    code,
                ))))
            }
        }
    }
}
