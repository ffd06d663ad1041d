//! Advisory chat conversation.
//!
//! One conversation at a time, bound to the currently displayed analysis.
//! Assistant replies are produced by the advisory rules after a fixed delay
//! on a spawned task. Every reset bumps a generation counter so a reply
//! scheduled for an older conversation can never land in a newer one.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::advisory;
use crate::models::{AnalysisResult, BusyPolicy, ChatMessage, ChatState};

/// Delay before the assistant answers.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1500;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Assistant is still answering the previous message")]
    Busy,
    #[error("Chat lock poisoned")]
    LockPoisoned,
}

/// What the browser needs to render the chat panel.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub conversation_id: Uuid,
    pub state: ChatState,
    pub messages: Vec<ChatMessage>,
}

struct Conversation {
    id: Uuid,
    messages: Vec<ChatMessage>,
    state: ChatState,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Conversation {
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation += 1;
    }
}

pub struct ChatSession {
    inner: Arc<Mutex<Conversation>>,
    reply_delay: Duration,
    busy_policy: BusyPolicy,
}

impl ChatSession {
    /// Start a conversation greeting the user about `current`.
    pub fn new(
        reply_delay: Duration,
        busy_policy: BusyPolicy,
        current: Option<&AnalysisResult>,
    ) -> Self {
        let conversation = Conversation {
            id: Uuid::new_v4(),
            messages: vec![ChatMessage::assistant(advisory::welcome_message(current))],
            state: ChatState::Idle,
            generation: 0,
            pending: None,
        };
        Self {
            inner: Arc::new(Mutex::new(conversation)),
            reply_delay,
            busy_policy,
        }
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    pub fn busy_policy(&self) -> BusyPolicy {
        self.busy_policy
    }

    /// Replace the conversation with a fresh one for `current`.
    ///
    /// Any reply still pending for the old conversation is dropped.
    pub fn reset(&self, current: Option<&AnalysisResult>) -> Result<(), ChatError> {
        let mut conv = self.inner.lock().map_err(|_| ChatError::LockPoisoned)?;
        conv.cancel_pending();
        conv.id = Uuid::new_v4();
        conv.messages = vec![ChatMessage::assistant(advisory::welcome_message(current))];
        conv.state = ChatState::Idle;
        tracing::debug!(conversation_id = %conv.id, "Chat conversation reset");
        Ok(())
    }

    /// Append a user message and schedule the assistant's reply.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(
        &self,
        text: &str,
        current: Option<Arc<AnalysisResult>>,
    ) -> Result<ChatMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let mut conv = self.inner.lock().map_err(|_| ChatError::LockPoisoned)?;
        if conv.state == ChatState::AwaitingResponse {
            match self.busy_policy {
                BusyPolicy::Reject => return Err(ChatError::Busy),
                BusyPolicy::CancelPrevious => {
                    tracing::debug!("Cancelling pending reply for newer message");
                    conv.cancel_pending();
                }
            }
        }

        let message = ChatMessage::user(text);
        conv.messages.push(message.clone());
        conv.state = ChatState::AwaitingResponse;

        let generation = conv.generation;
        let question = text.to_string();
        let inner = Arc::clone(&self.inner);
        let delay = self.reply_delay;

        conv.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let reply = advisory::respond(&question, current.as_deref());

            let Ok(mut conv) = inner.lock() else {
                tracing::error!("Chat lock poisoned, dropping assistant reply");
                return;
            };
            if conv.generation != generation {
                tracing::debug!("Discarding reply for a superseded conversation");
                return;
            }
            conv.messages.push(ChatMessage::assistant(reply));
            conv.state = ChatState::Idle;
            conv.pending = None;
        }));

        Ok(message)
    }

    pub fn state(&self) -> Result<ChatState, ChatError> {
        let conv = self.inner.lock().map_err(|_| ChatError::LockPoisoned)?;
        Ok(conv.state)
    }

    pub fn snapshot(&self) -> Result<ChatSnapshot, ChatError> {
        let conv = self.inner.lock().map_err(|_| ChatError::LockPoisoned)?;
        Ok(ChatSnapshot {
            conversation_id: conv.id,
            state: conv.state,
            messages: conv.messages.clone(),
        })
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Ok(mut conv) = self.inner.lock() {
            conv.cancel_pending();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::messages::{
        PNEUMONIA_ANSWER, SYMPTOMS_ANSWER, WELCOME_WITHOUT_RESULT,
    };
    use crate::models::{DiagnosticLabel, MessageSender};

    const DELAY: Duration = Duration::from_millis(DEFAULT_REPLY_DELAY_MS);

    fn session(policy: BusyPolicy) -> ChatSession {
        ChatSession::new(DELAY, policy, None)
    }

    async fn past_reply_delay() {
        tokio::time::sleep(DELAY * 2).await;
    }

    #[test]
    fn new_session_starts_with_welcome() {
        let chat = session(BusyPolicy::Reject);
        let snap = chat.snapshot().unwrap();
        assert_eq!(snap.state, ChatState::Idle);
        assert_eq!(snap.messages.len(), 1);
        assert_eq!(snap.messages[0].sender, MessageSender::Assistant);
        assert_eq!(snap.messages[0].content, WELCOME_WITHOUT_RESULT);
    }

    #[test]
    fn blank_message_is_rejected() {
        let chat = session(BusyPolicy::Reject);
        assert_eq!(chat.submit("   \n", None), Err(ChatError::EmptyMessage));
        assert_eq!(chat.snapshot().unwrap().messages.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_arrives_after_delay() {
        let chat = session(BusyPolicy::Reject);
        let sent = chat.submit("  triệu chứng là gì ", None).unwrap();
        assert_eq!(sent.content, "triệu chứng là gì");
        assert_eq!(sent.sender, MessageSender::User);
        assert_eq!(chat.state().unwrap(), ChatState::AwaitingResponse);

        tokio::time::sleep(DELAY / 2).await;
        assert_eq!(chat.snapshot().unwrap().messages.len(), 2);

        past_reply_delay().await;
        let snap = chat.snapshot().unwrap();
        assert_eq!(snap.state, ChatState::Idle);
        assert_eq!(snap.messages.len(), 3);
        assert_eq!(snap.messages[2].sender, MessageSender::Assistant);
        assert_eq!(snap.messages[2].content, SYMPTOMS_ANSWER);
    }

    #[tokio::test(start_paused = true)]
    async fn reply_uses_result_given_at_submit() {
        let chat = session(BusyPolicy::Reject);
        let result = Arc::new(AnalysisResult::fixture(DiagnosticLabel::Bacterial, 0.85));
        chat.submit("kết quả của tôi thế nào", Some(result)).unwrap();

        past_reply_delay().await;
        let snap = chat.snapshot().unwrap();
        assert!(snap.messages[2].content.contains("85%"));
    }

    #[tokio::test(start_paused = true)]
    async fn reject_policy_refuses_while_awaiting() {
        let chat = session(BusyPolicy::Reject);
        chat.submit("viêm phổi là gì", None).unwrap();
        assert_eq!(chat.submit("còn gì nữa", None), Err(ChatError::Busy));

        past_reply_delay().await;
        let snap = chat.snapshot().unwrap();
        assert_eq!(snap.messages.len(), 3);
        assert_eq!(snap.messages[2].content, PNEUMONIA_ANSWER);

        // idle again, next message accepted
        assert!(chat.submit("còn gì nữa", None).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_previous_policy_answers_only_latest() {
        let chat = session(BusyPolicy::CancelPrevious);
        chat.submit("viêm phổi là gì", None).unwrap();
        chat.submit("triệu chứng là gì", None).unwrap();

        past_reply_delay().await;
        let snap = chat.snapshot().unwrap();
        let senders: Vec<_> = snap.messages.iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![
                MessageSender::Assistant,
                MessageSender::User,
                MessageSender::User,
                MessageSender::Assistant,
            ]
        );
        assert_eq!(snap.messages[3].content, SYMPTOMS_ANSWER);
        assert_eq!(snap.state, ChatState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_drops_pending_reply() {
        let chat = session(BusyPolicy::Reject);
        let before = chat.snapshot().unwrap().conversation_id;
        chat.submit("viêm phổi là gì", None).unwrap();

        let result = AnalysisResult::fixture(DiagnosticLabel::Normal, 0.93);
        chat.reset(Some(&result)).unwrap();

        past_reply_delay().await;
        let snap = chat.snapshot().unwrap();
        assert_ne!(snap.conversation_id, before);
        assert_eq!(snap.state, ChatState::Idle);
        assert_eq!(snap.messages.len(), 1);
        assert!(snap.messages[0].content.contains("phổi bình thường"));
    }

    #[tokio::test(start_paused = true)]
    async fn messages_keep_insertion_order() {
        let chat = session(BusyPolicy::Reject);
        chat.submit("viêm phổi là gì", None).unwrap();
        past_reply_delay().await;
        chat.submit("điều trị thế nào", None).unwrap();
        past_reply_delay().await;

        let snap = chat.snapshot().unwrap();
        let contents: Vec<_> = snap.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents.len(), 5);
        assert_eq!(contents[1], "viêm phổi là gì");
        assert_eq!(contents[3], "điều trị thế nào");
        let timestamps: Vec<_> = snap.messages.iter().map(|m| m.timestamp).collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    }
}
