//! Canned question answering for the chat assistant.
//!
//! Deterministic keyword rules, no model behind it. The only input besides
//! the question is the currently displayed analysis result.

pub mod messages;
pub mod rules;

pub use messages::{answer_for, respond, welcome_message};
pub use rules::{classify_question, Topic, TopicRule, TOPIC_RULES};
