//! Backend API types

use serde::{Deserialize, Serialize};

use crate::session::ContextMap;

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub language: String,
}

/// Response of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub memory: Option<MemoryPayload>,
}

/// Memory section of a chat response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPayload {
    #[serde(default)]
    pub context: Option<ContextMap>,
}

/// Parsed backend reply handed to the conversation layer
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Text of the bot reply
    pub text: String,
    /// Replacement context, when the backend sent one
    pub context: Option<ContextMap>,
}

impl From<ChatResponse> for ChatReply {
    fn from(response: ChatResponse) -> Self {
        Self {
            text: response.response,
            context: response.memory.and_then(|m| m.context),
        }
    }
}

impl ChatReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: ContextMap) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            message: "Where is the library?".to_string(),
            language: "en".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"message": "Where is the library?", "language": "en"})
        );
    }

    #[test]
    fn test_response_without_memory() {
        let response: ChatResponse = serde_json::from_value(json!({"response": "Hi"})).unwrap();
        let reply = ChatReply::from(response);
        assert_eq!(reply.text, "Hi");
        assert!(reply.context.is_none());
    }

    #[test]
    fn test_response_with_context() {
        let response: ChatResponse = serde_json::from_value(json!({
            "response": "Noted.",
            "memory": {"context": {"department": "Physics", "year": 2}}
        }))
        .unwrap();
        let reply = ChatReply::from(response);
        let context = reply.context.unwrap();
        assert_eq!(context["department"], "Physics");
        assert_eq!(context["year"], 2);
    }

    #[test]
    fn test_response_with_empty_memory() {
        let response: ChatResponse =
            serde_json::from_value(json!({"response": "Ok", "memory": {}})).unwrap();
        assert!(ChatReply::from(response).context.is_none());
    }
}
