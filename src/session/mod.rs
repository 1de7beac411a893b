//! Per-session conversation state.
//! A session owns its history outright; nothing here is shared between
//! sessions or kept after the session ends.

pub mod history;

pub use history::{ConversationHistory, HistoryRetention, Role, Turn};

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    history: ConversationHistory,
    retention: HistoryRetention,
}

impl Session {
    pub fn new(retention: HistoryRetention) -> Self {
        Self {
            id: Uuid::new_v4(),
            history: ConversationHistory::new(),
            retention,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn retention(&self) -> HistoryRetention {
        self.retention
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut ConversationHistory {
        &mut self.history
    }

    /// Turns the renderer should display under this session's retention.
    pub fn visible(&self) -> &[Turn] {
        self.history.visible(self.retention)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(HistoryRetention::default())
    }
}

#[cfg(test)]
mod tests;
