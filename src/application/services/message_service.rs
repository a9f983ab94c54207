use std::sync::Arc;
use std::time::Duration;

use crate::application::errors::{BotError, ServiceError};
use crate::application::messaging::decider::DEFAULT_AMBIENT_PROBABILITY;
use crate::application::messaging::ambient::DEFAULT_HISTORY_LIMIT;
use crate::application::messaging::{
    AmbientGate, DirectiveDispatcher, EngagementDecider, EngagementDecision, MessageParser,
};
use crate::domain::entities::{ChannelConfig, DispatchOutcome, GenerationRequest, IncomingMessage};
use crate::domain::traits::{
    ChannelConfigStore, ChatPlatform, GenerationService, ImageSearch, TopicClassifier,
};

/// Shown whenever the relay cannot produce an answer
pub const FAILURE_REPLY: &str = "❌ Failed to reach AI service.";

/// Tunables for the message cycle
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub command_prefix: String,
    pub ambient_enabled: bool,
    pub ambient_probability: f64,
    pub history_limit: usize,
    /// Bound on the primary relay call
    pub relay_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            command_prefix: "!s ".to_string(),
            ambient_enabled: false,
            ambient_probability: DEFAULT_AMBIENT_PROBABILITY,
            history_limit: DEFAULT_HISTORY_LIMIT,
            relay_timeout: Duration::from_secs(30),
        }
    }
}

/// Remote collaborators of the message cycle
pub struct Collaborators {
    pub store: Arc<dyn ChannelConfigStore>,
    pub generation: Arc<dyn GenerationService>,
    pub images: Arc<dyn ImageSearch>,
    pub classifier: Arc<dyn TopicClassifier>,
}

/// Service for processing messages
pub struct MessageService<P: ChatPlatform> {
    platform: Arc<P>,
    store: Arc<dyn ChannelConfigStore>,
    generation: Arc<dyn GenerationService>,
    decider: EngagementDecider,
    ambient: AmbientGate,
    dispatcher: DirectiveDispatcher,
    ambient_enabled: bool,
    relay_timeout: Duration,
}

impl<P: ChatPlatform> MessageService<P> {
    pub fn new(platform: Arc<P>, collaborators: Collaborators, settings: ServiceSettings) -> Self {
        let bot = platform.bot_info();
        let parser = MessageParser::new(bot.id, settings.command_prefix);
        let decider = EngagementDecider::new(parser)
            .with_ambient_probability(settings.ambient_probability);
        let ambient = AmbientGate::new(collaborators.classifier)
            .with_history_limit(settings.history_limit);
        let dispatcher =
            DirectiveDispatcher::new(collaborators.generation.clone(), collaborators.images);

        Self {
            platform,
            store: collaborators.store,
            generation: collaborators.generation,
            decider,
            ambient,
            dispatcher,
            ambient_enabled: settings.ambient_enabled,
            relay_timeout: settings.relay_timeout,
        }
    }

    async fn dedicated_channel(&self, guild_id: &str) -> Option<ChannelConfig> {
        match self.store.get(guild_id).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[{}] Channel config lookup failed: {}", guild_id, e);
                None
            }
        }
    }

    fn decide(&self, message: &IncomingMessage, channel: Option<&ChannelConfig>) -> EngagementDecision {
        let mut rng = rand::rng();
        self.decider.decide(message, channel, self.ambient_enabled, &mut rng)
    }

    /// Handle one incoming message. Returns the outcome sent back, or `None`
    /// when the bot stayed silent.
    pub async fn process(&self, message: &IncomingMessage) -> Result<Option<DispatchOutcome>, BotError> {
        let Some(guild_id) = message.guild_id.as_deref() else {
            return Ok(None);
        };
        if message.author.is_bot {
            return Ok(None);
        }

        tracing::debug!("[{}] Message {} at {}", message.channel_id, message.id, message.timestamp);
        let channel = self.dedicated_channel(guild_id).await;
        let decision = self.decide(message, channel.as_ref());

        let prompt = match decision {
            EngagementDecision::NoTrigger => return Ok(None),
            EngagementDecision::ExplicitTrigger { reason, prompt } => {
                tracing::debug!("[{}] Explicit trigger: {:?}", message.channel_id, reason);
                self.typing(message).await;
                prompt
            }
            EngagementDecision::AmbientTrigger { prompt } => {
                tracing::debug!("[{}] Ambient trigger on {:?}", message.channel_id, prompt);
                self.typing(message).await;
                match self.ambient.confirm(self.platform.as_ref(), message).await {
                    Some(history) => history,
                    None => return Ok(None),
                }
            }
        };

        let request = GenerationRequest::new(prompt, message.author.id.clone(), message.channel_id.clone());
        let outcome = match self.respond(&request, message).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("[{}] Relay error: {}", message.channel_id, e);
                DispatchOutcome::reply(FAILURE_REPLY)
            }
        };

        self.respond_with(message, &outcome).await?;
        Ok(Some(outcome))
    }

    async fn typing(&self, message: &IncomingMessage) {
        if let Err(e) = self.platform.send_typing(&message.channel_id).await {
            tracing::debug!("[{}] Typing indicator failed: {}", message.channel_id, e);
        }
    }

    async fn respond(
        &self,
        request: &GenerationRequest,
        message: &IncomingMessage,
    ) -> Result<DispatchOutcome, ServiceError> {
        let response = tokio::time::timeout(self.relay_timeout, self.generation.generate(request))
            .await
            .map_err(|_| ServiceError::Timeout(self.relay_timeout))??;
        self.dispatcher.dispatch(&response, message).await
    }

    /// Send a response message
    pub async fn respond_with(&self, to: &IncomingMessage, outcome: &DispatchOutcome) -> Result<(), BotError> {
        self.platform.reply(to, outcome).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::ambient::serialize_history;
    use crate::application::testing::{
        MemoryStore, MockClassifier, MockGeneration, MockImageSearch, MockPlatform, BOT_ID,
    };
    use crate::domain::entities::{FileAttachment, Prompt, User};

    struct Harness {
        platform: Arc<MockPlatform>,
        generation: Arc<MockGeneration>,
        classifier: Arc<MockClassifier>,
        service: MessageService<MockPlatform>,
    }

    fn harness(
        platform: MockPlatform,
        generation: MockGeneration,
        classifier: MockClassifier,
        store: MemoryStore,
        settings: ServiceSettings,
    ) -> Harness {
        let platform = Arc::new(platform);
        let generation = Arc::new(generation);
        let classifier = Arc::new(classifier);
        let collaborators = Collaborators {
            store: Arc::new(store),
            generation: generation.clone(),
            images: Arc::new(MockImageSearch::returning(&["https://img.test/1.png"])),
            classifier: classifier.clone(),
        };
        let service = MessageService::new(platform.clone(), collaborators, settings);
        Harness { platform, generation, classifier, service }
    }

    fn explicit(generation: MockGeneration) -> Harness {
        harness(
            MockPlatform::new(),
            generation,
            MockClassifier::default(),
            MemoryStore::default(),
            ServiceSettings::default(),
        )
    }

    fn ambient(history: Vec<IncomingMessage>, generation: MockGeneration, classifier: MockClassifier) -> Harness {
        let settings = ServiceSettings {
            ambient_enabled: true,
            ambient_probability: 1.0,
            ..ServiceSettings::default()
        };
        harness(
            MockPlatform::new().with_history(history),
            generation,
            classifier,
            MemoryStore::default(),
            settings,
        )
    }

    fn from_alice(content: &str) -> IncomingMessage {
        IncomingMessage::new(User::new("1", "alice"), "c1", content).in_guild("g1")
    }

    #[tokio::test]
    async fn test_bot_and_dm_messages_are_ignored() {
        let h = explicit(MockGeneration::replying(&["never"]));

        let from_bot = IncomingMessage::new(User::new("7", "bot").as_bot(), "c1", "!s hi").in_guild("g1");
        assert_eq!(h.service.process(&from_bot).await.unwrap(), None);

        let dm = IncomingMessage::new(User::new("1", "alice"), "dm", "!s hi");
        assert_eq!(h.service.process(&dm).await.unwrap(), None);

        assert!(h.generation.requests().is_empty());
        assert!(h.platform.replies().is_empty());
        assert!(h.platform.typing().is_empty());
    }

    #[tokio::test]
    async fn test_untriggered_message_is_silent() {
        let h = explicit(MockGeneration::replying(&["never"]));
        assert_eq!(h.service.process(&from_alice("just talking")).await.unwrap(), None);
        assert!(h.generation.requests().is_empty());
        assert!(h.platform.typing().is_empty());
    }

    #[tokio::test]
    async fn test_mention_gets_plain_reply() {
        let h = explicit(MockGeneration::replying(&["Hi Alice!"]));
        let message = from_alice(&format!("<@{}> hello", BOT_ID));

        let outcome = h.service.process(&message).await.unwrap();
        assert_eq!(outcome, Some(DispatchOutcome::reply("Hi Alice!")));
        assert_eq!(h.platform.replies(), vec![DispatchOutcome::reply("Hi Alice!")]);
        assert_eq!(h.platform.typing(), vec!["c1".to_string()]);

        let requests = h.generation.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, Prompt::Text("User alice said: hello".into()));
        assert_eq!(requests[0].user_id, "1");
        assert_eq!(requests[0].channel_id, "c1");
    }

    #[tokio::test]
    async fn test_dedicated_channel_from_store() {
        let h = harness(
            MockPlatform::new(),
            MockGeneration::replying(&["sure"]),
            MockClassifier::default(),
            MemoryStore::with(ChannelConfig::new("g1", "c1")),
            ServiceSettings::default(),
        );
        let outcome = h.service.process(&from_alice("no prefix at all")).await.unwrap();
        assert_eq!(outcome, Some(DispatchOutcome::reply("sure")));
    }

    #[tokio::test]
    async fn test_primary_timeout_single_failure_reply() {
        let generation = MockGeneration::replying(&["too late"]).with_delay(Duration::from_millis(500));
        let settings = ServiceSettings {
            relay_timeout: Duration::from_millis(20),
            ..ServiceSettings::default()
        };
        let h = harness(
            MockPlatform::new(),
            generation,
            MockClassifier::default(),
            MemoryStore::default(),
            settings,
        );

        let outcome = h.service.process(&from_alice("!s slow question")).await.unwrap();
        assert_eq!(outcome, Some(DispatchOutcome::reply(FAILURE_REPLY)));
        assert_eq!(h.platform.replies(), vec![DispatchOutcome::reply(FAILURE_REPLY)]);
        assert_eq!(h.generation.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_error_keeps_subsecond_duration() {
        let generation = MockGeneration::replying(&["too late"]).with_delay(Duration::from_millis(500));
        let settings = ServiceSettings {
            relay_timeout: Duration::from_millis(20),
            ..ServiceSettings::default()
        };
        let h = harness(
            MockPlatform::new(),
            generation,
            MockClassifier::default(),
            MemoryStore::default(),
            settings,
        );

        let message = from_alice("!s slow question");
        let request = GenerationRequest::new(Prompt::Text("slow".into()), "1", "c1");
        let err = h.service.respond(&request, &message).await.unwrap_err();
        assert_eq!(err, ServiceError::Timeout(Duration::from_millis(20)));
        assert_eq!(err.to_string(), "Timed out after 20ms");
    }

    #[tokio::test]
    async fn test_followup_error_gives_failure_reply() {
        let generation = MockGeneration::new(vec![
            Ok("<Deepthink: something>".into()),
            Err(ServiceError::Network("reset".into())),
        ]);
        let h = explicit(generation);

        let outcome = h.service.process(&from_alice("!s think")).await.unwrap();
        assert_eq!(outcome, Some(DispatchOutcome::reply(FAILURE_REPLY)));
        assert_eq!(h.platform.replies().len(), 1);
    }

    #[tokio::test]
    async fn test_code_directive_end_to_end() {
        let generation = MockGeneration::replying(&[
            "On it <codeSimple(py): sort a list>",
            "```py\nxs.sort()\n```",
        ]);
        let h = explicit(generation);

        let outcome = h.service.process(&from_alice("!s code please")).await.unwrap();
        assert_eq!(
            outcome,
            Some(DispatchOutcome::File(FileAttachment::named("code.py", "xs.sort()\n")))
        );
    }

    #[tokio::test]
    async fn test_ambient_confirmed_sends_history() {
        let history = vec![
            from_alice("what about lunch?"),
            IncomingMessage::new(User::new("2", "bob"), "c1", "pizza").in_guild("g1"),
        ];
        let h = ambient(
            history.clone(),
            MockGeneration::replying(&["I vote pizza"]),
            MockClassifier::new(vec![Ok(Some("food".into())), Ok(Some("true".into()))]),
        );

        let outcome = h.service.process(&from_alice("what about lunch?")).await.unwrap();
        assert_eq!(outcome, Some(DispatchOutcome::reply("I vote pizza")));

        let requests = h.generation.requests();
        assert_eq!(requests[0].prompt, Prompt::Text(serialize_history(&history).unwrap()));
        assert_eq!(h.classifier.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_ambient_declined_is_silent() {
        let h = ambient(
            vec![from_alice("hm")],
            MockGeneration::replying(&["never"]),
            MockClassifier::new(vec![Ok(Some("weather".into())), Ok(Some("false".into()))]),
        );

        assert_eq!(h.service.process(&from_alice("hm")).await.unwrap(), None);
        assert!(h.generation.requests().is_empty());
        assert!(h.platform.replies().is_empty());
    }

    #[tokio::test]
    async fn test_ambient_classifier_failure_is_silent() {
        let h = ambient(
            vec![from_alice("hm")],
            MockGeneration::replying(&["never"]),
            MockClassifier::new(vec![Err(ServiceError::Api { status: 500, body: String::new() })]),
        );

        assert_eq!(h.service.process(&from_alice("hm")).await.unwrap(), None);
        assert!(h.generation.requests().is_empty());
        assert!(h.platform.replies().is_empty());
    }

    #[tokio::test]
    async fn test_ambient_history_failure_is_silent() {
        let settings = ServiceSettings {
            ambient_enabled: true,
            ambient_probability: 1.0,
            ..ServiceSettings::default()
        };
        let h = harness(
            MockPlatform::new().failing_history(),
            MockGeneration::replying(&["never"]),
            MockClassifier::default(),
            MemoryStore::default(),
            settings,
        );

        assert_eq!(h.service.process(&from_alice("hm")).await.unwrap(), None);
        assert!(h.classifier.prompts().is_empty());
        assert!(h.platform.replies().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_trigger_skips_ambient_gate() {
        let h = ambient(
            vec![],
            MockGeneration::replying(&["direct"]),
            MockClassifier::default(),
        );

        let outcome = h.service.process(&from_alice("!s direct question")).await.unwrap();
        assert_eq!(outcome, Some(DispatchOutcome::reply("direct")));
        assert!(h.classifier.prompts().is_empty());
    }
}
