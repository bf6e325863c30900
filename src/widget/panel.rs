use crate::models::websocket::{ Sender, ServerMessage };
use log::warn;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelElement {
    Message {
        sender: Sender,
        text: String,
    },
    Loading {
        id: String,
        text: String,
    },
}

/// Server-side model of the scrollable message panel.
///
/// Elements hold plain text only. When a sink is attached every mutation is
/// also sent to the browser as a [`ServerMessage`], so the page always shows
/// what the model holds.
#[derive(Debug, Default)]
pub struct ChatPanel {
    elements: Vec<PanelElement>,
    sink: Option<UnboundedSender<ServerMessage>>,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: UnboundedSender<ServerMessage>) -> Self {
        Self { elements: Vec::new(), sink: Some(sink) }
    }

    pub fn add_message(&mut self, sender: Sender, text: impl Into<String>) {
        let text = text.into();
        self.emit(ServerMessage::Message { sender, content: text.clone() });
        self.elements.push(PanelElement::Message { sender, text });
    }

    pub fn show_loading(&mut self, id: impl Into<String>, text: impl Into<String>) {
        let id = id.into();
        let text = text.into();
        self.emit(ServerMessage::Loading { id: id.clone(), content: text.clone() });
        self.elements.push(PanelElement::Loading { id, text });
    }

    /// Removes the placeholder with `id` if it is still there.
    pub fn remove_loading(&mut self, id: &str) -> bool {
        let before = self.elements.len();
        self.elements.retain(|el| !matches!(el, PanelElement::Loading { id: el_id, .. } if el_id == id));
        let removed = self.elements.len() != before;
        if removed {
            self.emit(ServerMessage::Remove { id: id.to_string() });
        }
        removed
    }

    pub fn clear_input(&mut self) {
        self.emit(ServerMessage::ClearInput);
    }

    pub fn elements(&self) -> &[PanelElement] {
        &self.elements
    }

    pub fn has_loading(&self) -> bool {
        self.elements.iter().any(|el| matches!(el, PanelElement::Loading { .. }))
    }

    /// Message bubbles only, in display order.
    pub fn messages(&self) -> Vec<(Sender, &str)> {
        self.elements
            .iter()
            .filter_map(|el| match el {
                PanelElement::Message { sender, text } => Some((*sender, text.as_str())),
                PanelElement::Loading { .. } => None,
            })
            .collect()
    }

    fn emit(&self, event: ServerMessage) {
        if let Some(sink) = &self.sink {
            if sink.send(event).is_err() {
                warn!("Panel event dropped: browser connection already closed");
            }
        }
    }
}
