use crate::models::chat::{ Message, Role };

/// Append-only, in-memory log of everything said in one session.
///
/// The first entry is always the system message the log was seeded with.
/// Entries are never removed or edited, and the whole log is sent with every
/// completion request, so the context grows for as long as the session lives.
#[derive(Clone, Debug)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered sequence, exactly as it goes over the wire.
    pub fn to_request_payload(&self) -> &[Message] {
        &self.messages
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_message(&self) -> &Message {
        &self.messages[0]
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    // Never true: the system seed cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
