use serde::{Deserialize, Serialize};

use crate::{ToolCall, ToolCallArguments, ToolName};

/// Chat-completion response as returned by an OpenAI compatible backend.
/// Only the fields the grader reads are modelled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ResponseMessage,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: FunctionCall,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: ToolName,
    #[serde(default)]
    pub arguments: ToolCallArguments,
}

impl ChatCompletion {
    /// Response that calls `name` with `arguments`
    pub fn tool_call(name: impl Into<ToolName>, arguments: serde_json::Value) -> Self {
        let call = ResponseToolCall {
            id: None,
            function: FunctionCall {
                name: name.into(),
                arguments: ToolCallArguments::from_value(arguments),
            },
        };
        Self {
            id: None,
            choices: vec![Choice {
                message: ResponseMessage { content: None, tool_calls: Some(vec![call]) },
            }],
        }
    }

    /// Response that answers in free text
    pub fn reply(content: impl ToString) -> Self {
        Self {
            id: None,
            choices: vec![Choice {
                message: ResponseMessage { content: Some(content.to_string()), tool_calls: None },
            }],
        }
    }

    pub fn id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// First tool call of the first choice
    pub fn first_tool_call(&self) -> Option<ToolCall> {
        let call = self.choices.first()?.message.tool_calls.as_ref()?.first()?;
        Some(ToolCall { name: call.function.name.clone(), arguments: call.function.arguments.clone() })
    }

    /// Free-text content of the first choice
    pub fn reply_text(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
