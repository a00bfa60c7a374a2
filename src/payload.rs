use serde::Serialize;

/// Body of a chat message post. Declaration order is the serialized key
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessagePayload {
    pub text: String,
    pub channel: String,
    pub user: String,
    pub mention: String,
    pub date: String,
}

impl MessagePayload {
    pub fn new(
        text: impl Into<String>,
        channel: impl Into<String>,
        user: impl Into<String>,
        mention: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            channel: channel.into(),
            user: user.into(),
            mention: mention.into(),
            date: date.into(),
        }
    }
}
