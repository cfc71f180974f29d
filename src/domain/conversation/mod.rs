//! Conversation domain module.
//!
//! Coach conversation history and the single in-flight request slot.

mod state;
mod turn;

pub use state::{
    AssistantReply, ConversationSnapshot, ConversationState, Resolution, SubmitRejection,
};
pub use turn::{ConversationTurn, TurnRole};
