//! Support chatbot backed by an OpenAI-compatible chat completions endpoint

use crate::config::{usable_key, ChatConfig};
use crate::error::ChatError;
use crate::models::{ChatMessage, ChatRole};
use crate::prompts::{
    CHAT_CONNECTION_REPLY, CHAT_EMPTY_REPLY, CHAT_MAINTENANCE_REPLY, CHAT_PROBE_MESSAGE,
};
use crate::repository::ConfigRepository;
use log::{error, info, warn};
use serde_json::{json, Value};

const CHAT_REFERER: &str = "https://fareapp.it";
const CHAT_TITLE: &str = "Fare App";

/// Whether a key is available, for the admin diagnostics view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Missing,
    Present { length: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub success: bool,
    pub message: String,
}

pub struct ChatService {
    client: reqwest::Client,
    config: ChatConfig,
    api_key: Option<String>,
    repo: ConfigRepository,
}

impl ChatService {
    /// The system instruction is read from `repo` on every call, so a saved
    /// prompt takes effect on the next message. The key is taken from the
    /// environment or `config` once, here.
    pub fn new(config: ChatConfig, repo: ConfigRepository) -> Self {
        let api_key = config.effective_api_key();
        Self {
            client: reqwest::Client::new(),
            config,
            api_key,
            repo,
        }
    }

    /// Uses exactly `key`, ignoring the environment and the settings file.
    pub fn with_api_key(mut self, key: Option<&str>) -> Self {
        self.api_key = usable_key(key);
        self
    }

    pub fn key_status(&self) -> KeyStatus {
        match &self.api_key {
            Some(key) => KeyStatus::Present { length: key.len() },
            None => KeyStatus::Missing,
        }
    }

    async fn call_chat(&self, messages: Vec<Value>) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingKey)?;

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens
        });

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("HTTP-Referer", CHAT_REFERER)
            .header("X-Title", CHAT_TITLE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| ChatError::Malformed(e.to_string()))?;

        Ok(response_json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    /// Answer to `message` given the earlier turns, or why there is none.
    /// An empty answer is returned as an empty string.
    pub async fn try_reply(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, ChatError> {
        let mut messages: Vec<Value> = vec![json!({
            "role": "system",
            "content": self.repo.chatbot_prompt()
        })];

        for msg in history {
            let role = match msg.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            messages.push(json!({
                "role": role,
                "content": msg.content
            }));
        }

        messages.push(json!({
            "role": "user",
            "content": message
        }));

        self.call_chat(messages).await
    }

    /// Visitor-facing answer. Never fails: every problem maps to a canned reply
    /// and is logged.
    pub async fn reply(&self, history: &[ChatMessage], message: &str) -> String {
        match self.try_reply(history, message).await {
            Ok(text) if text.is_empty() => {
                warn!("[chat] Empty answer from the chat endpoint");
                CHAT_EMPTY_REPLY.to_string()
            }
            Ok(text) => text,
            Err(ChatError::MissingKey) => {
                warn!("[chat] No API key configured; answering with maintenance notice");
                CHAT_MAINTENANCE_REPLY.to_string()
            }
            Err(e) => {
                error!("[chat] {}", e);
                CHAT_CONNECTION_REPLY.to_string()
            }
        }
    }

    /// One round trip with a fixed probe message, for the admin diagnostics.
    pub async fn test_connection(&self) -> ConnectionCheck {
        let messages = vec![json!({
            "role": "user",
            "content": CHAT_PROBE_MESSAGE
        })];
        let (success, message) = match self.call_chat(messages).await {
            Ok(text) if !text.is_empty() => (true, "Chatbot online".to_string()),
            Ok(_) => (false, "Chat endpoint answered without text".to_string()),
            Err(ChatError::MissingKey) => (
                false,
                "Chat API key missing: set it in settings.json or the environment".to_string(),
            ),
            Err(e) => (false, format!("Chat endpoint error: {}", e)),
        };
        info!("[chat] Connection check: {}", message);
        ConnectionCheck { success, message }
    }
}
