use crate::{
    api::AskClient,
    config::Config,
    conversation::{Conversation, ConversationEvent, Effect, RequestId},
    logging::log_interaction,
    reveal::{spawn_reveal, RevealPacing, RevealTask},
};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

/// Runs the conversation: applies events, and performs the effects they
/// ask for on background tasks whose results come back as events.
pub struct ChatController {
    conversation: Conversation,
    client: AskClient,
    pacing: RevealPacing,
    simulate_streaming: bool,
    events: UnboundedSender<ConversationEvent>,
    request_task: Option<JoinHandle<()>>,
    reveal_task: Option<RevealTask>,
}

impl ChatController {
    pub fn new(
        client: AskClient,
        pacing: RevealPacing,
        simulate_streaming: bool,
        events: UnboundedSender<ConversationEvent>,
    ) -> Self {
        Self {
            conversation: Conversation::new(),
            client,
            pacing,
            simulate_streaming,
            events,
            request_task: None,
            reveal_task: None,
        }
    }

    pub fn from_config(
        config: &Config,
        client: AskClient,
        events: UnboundedSender<ConversationEvent>,
    ) -> Self {
        Self::new(
            client,
            RevealPacing::from_config(config),
            config.simulate_streaming,
            events,
        )
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_streaming(&self) -> bool {
        self.conversation.is_streaming()
    }

    pub fn push_char(&mut self, c: char) {
        self.conversation.push_char(c);
    }

    pub fn backspace(&mut self) {
        self.conversation.backspace();
    }

    /// Submits the input buffer. Returns false if the submission was rejected.
    pub fn submit(&mut self) -> bool {
        if !self.conversation.can_submit() {
            log::debug!("submit ignored: blank input or request in flight");
            return false;
        }
        self.handle(ConversationEvent::Submit);
        true
    }

    /// Aborts the in-flight request or reveal. Returns false if idle.
    pub fn cancel(&mut self) -> bool {
        if !self.conversation.is_streaming() {
            return false;
        }
        self.handle(ConversationEvent::Cancel);
        true
    }

    pub fn handle(&mut self, event: ConversationEvent) {
        if let Some(effect) = self.conversation.apply(event) {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SendQuestion { request, question } => {
                log::info!("request {}: sending question to {}", request, self.client.endpoint());
                self.request_task = Some(self.spawn_request(request, question));
            }
            Effect::StartReveal { request, steps } => {
                self.request_task = None;
                if self.simulate_streaming {
                    log::debug!("request {}: revealing {} characters", request, steps);
                    self.reveal_task =
                        Some(spawn_reveal(self.events.clone(), request, steps, self.pacing));
                } else {
                    self.handle(ConversationEvent::RevealFinish { request });
                }
            }
            Effect::AbortInFlight => {
                log::info!("aborting in-flight request");
                if let Some(task) = self.request_task.take() {
                    task.abort();
                }
                if let Some(task) = self.reveal_task.take() {
                    task.cancel();
                }
            }
        }
    }

    fn spawn_request(&self, request: RequestId, question: String) -> JoinHandle<()> {
        let client = self.client.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let event = match client.ask(&question).await {
                Ok(answer) => {
                    log_interaction(&question, &answer);
                    ConversationEvent::ResponseReceived { request, answer }
                }
                Err(e) => {
                    log::warn!("request {} failed: {}", request, e);
                    ConversationEvent::ResponseFailed { request }
                }
            };
            let _ = events.send(event);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CANCELLED_MESSAGE, ERROR_MESSAGE};
    use crate::models::Role;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn controller_for(
        server: &MockServer,
        simulate_streaming: bool,
    ) -> (ChatController, UnboundedReceiver<ConversationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client =
            AskClient::new(&format!("{}/ask", server.uri()), Duration::from_secs(5)).unwrap();
        let controller =
            ChatController::new(client, RevealPacing::immediate(), simulate_streaming, tx);
        (controller, rx)
    }

    /// Feeds events back into the controller until it goes idle, recording
    /// the last message after each one.
    async fn run_to_idle(
        controller: &mut ChatController,
        rx: &mut UnboundedReceiver<ConversationEvent>,
    ) -> Vec<String> {
        let mut snapshots = Vec::new();
        while controller.is_streaming() {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("controller stalled")
                .expect("event channel closed");
            controller.handle(event);
            let last = controller.conversation().messages().last().unwrap();
            snapshots.push(last.content().to_string());
        }
        snapshots
    }

    async fn answering(answer: serde_json::Value) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_submit_then_reveal_answer() {
        let mock_server = answering(json!({ "answer": "Hello, world" })).await;
        let (mut controller, mut rx) = controller_for(&mock_server, true);

        "hello".chars().for_each(|c| controller.push_char(c));
        assert!(controller.submit());

        let messages = controller.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!((messages[0].role(), messages[0].content()), (Role::User, "hello"));
        assert_eq!((messages[1].role(), messages[1].content()), (Role::Assistant, ""));
        assert!(controller.is_streaming());

        let snapshots = run_to_idle(&mut controller, &mut rx).await;

        let mut previous = String::new();
        for snapshot in snapshots.iter().filter(|s| !s.is_empty()) {
            assert!(snapshot.starts_with(previous.as_str()));
            assert!(snapshot.len() > previous.len());
            previous = snapshot.clone();
        }
        assert_eq!(previous, "Hello, world");
        assert_eq!(
            controller.conversation().messages()[1].content(),
            "Hello, world"
        );
    }

    #[tokio::test]
    async fn test_server_error_shows_error_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        let (mut controller, mut rx) = controller_for(&mock_server, true);

        "hello".chars().for_each(|c| controller.push_char(c));
        controller.submit();
        let snapshots = run_to_idle(&mut controller, &mut rx).await;

        assert_eq!(snapshots, vec![ERROR_MESSAGE.to_string()]);
        assert!(!controller.is_streaming());
        assert_eq!(controller.conversation().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_response_takes_error_path() {
        let mock_server = answering(json!({ "response": "wrong field" })).await;
        let (mut controller, mut rx) = controller_for(&mock_server, true);

        "hello".chars().for_each(|c| controller.push_char(c));
        controller.submit();
        run_to_idle(&mut controller, &mut rx).await;

        assert_eq!(controller.conversation().messages()[1].content(), ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_instant_mode_applies_full_answer() {
        let mock_server = answering(json!({ "answer": "all at once" })).await;
        let (mut controller, mut rx) = controller_for(&mock_server, false);

        "q".chars().for_each(|c| controller.push_char(c));
        controller.submit();
        let snapshots = run_to_idle(&mut controller, &mut rx).await;

        assert_eq!(snapshots, vec!["all at once".to_string()]);
    }

    #[tokio::test]
    async fn test_rejected_submissions_leave_conversation_alone() {
        let mock_server = answering(json!({ "answer": "ok" })).await;
        let (mut controller, _rx) = controller_for(&mock_server, true);

        "   ".chars().for_each(|c| controller.push_char(c));
        assert!(!controller.submit());
        assert!(controller.conversation().messages().is_empty());

        controller.backspace();
        controller.backspace();
        controller.backspace();
        "first".chars().for_each(|c| controller.push_char(c));
        assert!(controller.submit());
        "second".chars().for_each(|c| controller.push_char(c));
        assert!(!controller.submit());
        assert_eq!(controller.conversation().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "answer": "slow" }))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&mock_server)
            .await;
        let (mut controller, mut rx) = controller_for(&mock_server, true);

        "hello".chars().for_each(|c| controller.push_char(c));
        controller.submit();
        assert!(controller.cancel());

        assert!(!controller.is_streaming());
        assert_eq!(
            controller.conversation().messages()[1].content(),
            CANCELLED_MESSAGE
        );
        assert!(!controller.cancel());

        let nothing = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(nothing.is_err());
    }
}
