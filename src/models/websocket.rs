use serde::{ Serialize, Deserialize };

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "chat")] Chat {
        content: String,
    },
}

/// Which side of the panel a message bubble belongs to. The browser uses the
/// value as a CSS class next to `msg`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// Panel mutations pushed to the browser. Content is always inserted as a
/// text node on the client side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "message")] Message {
        sender: Sender,
        content: String,
    },
    #[serde(rename = "loading")] Loading {
        id: String,
        content: String,
    },
    #[serde(rename = "remove")] Remove {
        id: String,
    },
    #[serde(rename = "clear_input")]
    ClearInput,
    #[serde(rename = "busy")]
    Busy,
    #[serde(rename = "error")] Error {
        message: String,
    },
}
