use crate::cli::parser::Args;
use crate::commands::{CommandDispatcher, CommandKind, CommandResult};
use crate::config::Config;
use crate::core::error::AssistantError;
use crate::display;
use crate::history::{ConversationStore, Session};
use crate::i18n::MessageKey;
use crate::input;
use crate::providers::{LLMProvider, Message, Role};
use futures::StreamExt;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use tracing::{debug, warn};

pub struct Application {
    pub args: Args,
    pub provider: Box<dyn LLMProvider>,
    pub command_dispatcher: CommandDispatcher,
    store: Option<ConversationStore>,
    session: Session,
    conversation_id: Option<String>,
}

impl Application {
    pub fn new(
        args: Args,
        config: &Config,
        provider: Box<dyn LLMProvider>,
        command_dispatcher: CommandDispatcher,
        store: Option<ConversationStore>,
    ) -> Result<Self, AssistantError> {
        let mut session = Session::new(config.system_prompt.clone(), config.max_history);

        let conversation_id = match (&args.resume, &store) {
            (Some(id), Some(store)) => {
                let conversation = store.get(id).ok_or_else(|| {
                    AssistantError::Input(format!("No stored conversation with id {}", id))
                })?;
                for message in &conversation.messages {
                    let role = if message.is_user { Role::User } else { Role::Assistant };
                    session.push(role, message.text.clone());
                }
                debug!(id = %id, messages = conversation.messages.len(), "resumed conversation");
                Some(id.clone())
            }
            (Some(_), None) => {
                return Err(AssistantError::Input(
                    "--resume needs the conversation store; drop --no-history".to_string(),
                ));
            }
            (None, _) => None,
        };

        Ok(Self {
            args,
            provider,
            command_dispatcher,
            store,
            session,
            conversation_id,
        })
    }

    pub async fn run(&mut self) -> Result<(), AssistantError> {
        if let Some(query) = self.args.query.clone() {
            return self.handle_one_shot(&[query]).await;
        }

        if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AssistantError::Input(format!("Failed to read from stdin: {}", e)))?;
            let lines: Vec<String> = buffer
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            return self.handle_one_shot(&lines).await;
        }

        self.handle_continuous_chat_mode().await
    }

    /// Query argument or piped lines: one turn each, no REPL.
    async fn handle_one_shot(&mut self, inputs: &[String]) -> Result<(), AssistantError> {
        if inputs.is_empty() {
            return Err(AssistantError::Input("No query provided".to_string()));
        }
        for input in inputs {
            self.handle_turn(input, false).await;
        }
        Ok(())
    }

    async fn handle_continuous_chat_mode(&mut self) -> Result<(), AssistantError> {
        let language = self.command_dispatcher.language();
        display::display_welcome(&language.message(MessageKey::Welcome, &[]));
        if let Some(conversation) = self
            .conversation_id
            .as_deref()
            .and_then(|id| self.store.as_ref()?.get(id))
        {
            println!("» {}", conversation.title);
        }

        let history_path = Config::input_history_path();
        let mut editor = input::create_editor(&self.command_dispatcher, &history_path)?;

        loop {
            let Some(line) = input::read_input(&mut editor)? else {
                println!("{}", language.message(MessageKey::Goodbye, &[]));
                break;
            };

            // Saved before the turn runs: /exit ends the process from inside it.
            if let Err(e) = input::save_history(&mut editor, &history_path) {
                debug!(error = %e, "input history not saved");
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.handle_turn(line, true).await;
        }

        Ok(())
    }

    /// One serialized turn: dispatch, then chat or render, then persist.
    async fn handle_turn(&mut self, input: &str, stream: bool) {
        let result = self.command_dispatcher.process(input);
        debug!(kind = ?result.kind, executed = result.executed, "turn classified");

        let reply = if result.is_chat() {
            Some(self.chat(input, stream).await)
        } else {
            render(&result);
            result.response.clone()
        };

        if result.kind != CommandKind::Help {
            self.persist(input, reply.as_deref());
        }
    }

    async fn chat(&mut self, input: &str, stream: bool) -> String {
        let messages = self.session.prompt_for(input);
        let outcome = if stream {
            self.generate_ai_response(&messages).await
        } else {
            self.provider.get_response(&messages).await.inspect(|reply| {
                display::display_model_reply(reply);
            })
        };

        match outcome {
            Ok(reply) => {
                self.session.push(Role::User, input);
                self.session.push(Role::Assistant, reply.clone());
                reply
            }
            Err(e) => {
                warn!(error = %e, "model request failed");
                let message = self
                    .command_dispatcher
                    .language()
                    .message(MessageKey::ModelFailed, &[("error", &e.to_string())]);
                display::display_error(&message);
                message
            }
        }
    }

    async fn generate_ai_response(
        &self,
        messages: &[Message],
    ) -> Result<String, AssistantError> {
        let mut stream = self.provider.get_response_stream(messages).await?;

        let mut full_response = String::new();
        while let Some(chunk_result) = stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    display::print_stream_chunk(&chunk)?;
                    full_response.push_str(&chunk);
                }
                Err(e) if full_response.is_empty() => return Err(e),
                Err(e) => {
                    warn!(error = %e, "stream interrupted");
                    break;
                }
            }
        }

        if !full_response.ends_with('\n') {
            println!();
        }
        if full_response.trim().is_empty() {
            return Err(AssistantError::Api("Empty response from model".to_string()));
        }
        Ok(full_response.trim().to_string())
    }

    fn persist(&mut self, input: &str, reply: Option<&str>) {
        if let Err(e) = self.try_persist(input, reply) {
            warn!(error = %e, "conversation not saved");
        }
    }

    fn try_persist(&mut self, input: &str, reply: Option<&str>) -> Result<(), AssistantError> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };

        let id = match &self.conversation_id {
            Some(id) => id.clone(),
            None => {
                let title = self
                    .command_dispatcher
                    .language()
                    .message(MessageKey::NewChatTitle, &[]);
                let id = store.create_conversation(&title)?;
                self.conversation_id = Some(id.clone());
                id
            }
        };

        store.append_message(&id, input, true)?;
        if let Some(reply) = reply {
            store.append_message(&id, reply, false)?;
        }
        Ok(())
    }
}

fn render(result: &CommandResult) {
    match (result.kind, result.response.as_deref()) {
        (CommandKind::Help, Some(help)) => display::display_response(help),
        _ => display::display_command_result(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommandConfig;
    use crate::core::platform::testing::{PlatformCall, RecordingPlatform};
    use crate::history::Conversation;
    use crate::i18n::Language;
    use crate::providers::ResponseStream;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Answers every prompt with a fixed reply and records the prompts it saw.
    struct StubProvider {
        reply: Result<String, String>,
        prompts: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    #[async_trait]
    impl LLMProvider for StubProvider {
        async fn get_response(&self, messages: &[Message]) -> Result<String, AssistantError> {
            self.prompts.lock().unwrap().push(messages.to_vec());
            self.reply.clone().map_err(AssistantError::Api)
        }

        async fn get_response_stream(
            &self,
            messages: &[Message],
        ) -> Result<ResponseStream, AssistantError> {
            let reply = self.get_response(messages).await?;
            Ok(futures::stream::iter(vec![Ok(reply)]).boxed())
        }

        fn set_model(&mut self, _model: &str) {}
    }

    struct Harness {
        app: Application,
        platform: Arc<RecordingPlatform>,
        prompts: Arc<Mutex<Vec<Vec<Message>>>>,
        dir: TempDir,
    }

    fn harness(reply: Result<&str, &str>) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path().join("conversations.json")).unwrap();
        let platform = Arc::new(RecordingPlatform::new());
        let dispatcher =
            CommandDispatcher::from_config(&CommandConfig::default(), Language::En, platform.clone())
                .unwrap();
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let provider = StubProvider {
            reply: reply.map(str::to_string).map_err(str::to_string),
            prompts: prompts.clone(),
        };

        let app = Application::new(
            Args::default(),
            &Config::default(),
            Box::new(provider),
            dispatcher,
            Some(store),
        )
        .unwrap();
        Harness {
            app,
            platform,
            prompts,
            dir,
        }
    }

    fn conversation(app: &Application) -> &Conversation {
        let id = app.conversation_id.as_deref().unwrap();
        app.store.as_ref().unwrap().get(id).unwrap()
    }

    fn stored(app: &Application) -> Vec<(bool, String)> {
        conversation(app)
            .messages
            .iter()
            .map(|m| (m.is_user, m.text.clone()))
            .collect()
    }

    /// Chat messages currently in the rolling context.
    fn context(app: &Application) -> Vec<Message> {
        let prompt = app.session.prompt_for("next");
        prompt[1..prompt.len() - 1].to_vec()
    }

    #[tokio::test]
    async fn help_is_shown_but_not_persisted() {
        let mut h = harness(Ok("unused"));
        h.app.handle_turn("/help", false).await;

        assert!(h.app.conversation_id.is_none());
        assert!(h.app.store.as_ref().unwrap().list_conversations().is_empty());
        assert!(context(&h.app).is_empty());
        assert!(h.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn command_reply_is_persisted_verbatim_outside_the_context() {
        let mut h = harness(Ok("unused"));
        h.app.handle_turn("знайди котиків", false).await;

        assert_eq!(
            stored(&h.app),
            vec![
                (true, "знайди котиків".to_string()),
                (false, "Searching for: котиків...".to_string()),
            ]
        );
        assert_eq!(conversation(&h.app).title, "знайди котиків");
        assert!(matches!(h.platform.calls().as_slice(), [PlatformCall::OpenUrl(_)]));
        assert!(context(&h.app).is_empty());
        assert!(h.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_turn_enters_context_and_store() {
        let mut h = harness(Ok("Why did the crab cross the road?"));
        h.app.handle_turn("tell me a joke", false).await;
        h.app.handle_turn("another one", true).await;

        let prompts = h.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].first().map(|m| m.role), Some(Role::System));
        assert_eq!(
            prompts[1][1..].to_vec(),
            vec![
                Message::new(Role::User, "tell me a joke"),
                Message::new(Role::Assistant, "Why did the crab cross the road?"),
                Message::new(Role::User, "another one"),
            ]
        );

        assert_eq!(context(&h.app).len(), 4);
        assert_eq!(stored(&h.app).len(), 4);
        assert_eq!(
            stored(&h.app)[1],
            (false, "Why did the crab cross the road?".to_string())
        );
        assert!(h.platform.calls().is_empty());
    }

    #[tokio::test]
    async fn model_failure_is_stored_and_the_next_turn_still_runs() {
        let mut h = harness(Err("connection refused"));
        h.app.handle_turn("hello there", false).await;

        let failure = "Sorry, I couldn't get a response: API error: connection refused";
        assert_eq!(
            stored(&h.app),
            vec![(true, "hello there".to_string()), (false, failure.to_string())]
        );
        assert!(context(&h.app).is_empty());

        h.app.handle_turn("/open notepad", false).await;
        assert_eq!(stored(&h.app).len(), 4);
        assert_eq!(h.platform.calls().len(), 1);
    }

    #[tokio::test]
    async fn conversation_survives_reopening_the_store() {
        let mut h = harness(Ok("hi!"));
        h.app.handle_turn("hello", false).await;
        let id = h.app.conversation_id.clone().unwrap();

        let reopened = ConversationStore::open(h.dir.path().join("conversations.json")).unwrap();
        let conversation = reopened.get(&id).unwrap();
        assert_eq!(conversation.title, "hello");
        assert_eq!(conversation.messages.len(), 2);
    }
}
