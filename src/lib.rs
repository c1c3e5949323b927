pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    build_extraction_prompt, ChatClient, ChatTurnUseCase, ExtractParametersUseCase,
    ForwardIntentUseCase, MalformedReplyPolicy, TurnOutcome, TurnStage, WebhookClient,
};

pub use cli::Commands;

pub use connector::{
    AnthropicClient, Container, ContainerConfig, GeminiClient, HttpWebhookClient, MockChatClient,
    MockWebhookClient, ModelProvider, Router,
};

pub use domain::{
    parse_reply, ChatTranscript, DomainError, ExtractedParameters, ReplyParse, Role, Turn,
    WebhookEnvelope, CREATE_DATA_INTENT,
};
