use crate::providers::{Message, Role};
use std::collections::VecDeque;

/// Rolling model context: only the last `capacity` chat messages survive.
#[derive(Debug, Clone)]
pub struct Session {
    system_prompt: String,
    capacity: usize,
    messages: VecDeque<Message>,
}

impl Session {
    pub fn new(system_prompt: impl Into<String>, capacity: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            capacity,
            messages: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Message::new(role, content));
    }

    /// System prompt, the buffered context, then the new user message.
    pub fn prompt_for(&self, user_input: &str) -> Vec<Message> {
        let mut prompt = Vec::with_capacity(self.messages.len() + 2);
        if !self.system_prompt.trim().is_empty() {
            prompt.push(Message::new(Role::System, self.system_prompt.as_str()));
        }
        prompt.extend(self.messages.iter().cloned());
        prompt.push(Message::new(Role::User, user_input));
        prompt
    }
}
