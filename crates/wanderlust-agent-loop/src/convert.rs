//! Pure functions for converting between contract and genai types.

use genai::chat::{ChatMessage, ChatRequest, MessageContent, ToolResponse};
use wanderlust_contract::{Message, Role, Tool, ToolDescriptor};

/// Convert a ToolDescriptor to a genai Tool.
pub fn to_genai_tool(desc: &ToolDescriptor) -> genai::chat::Tool {
    genai::chat::Tool::new(&desc.id)
        .with_description(&desc.description)
        .with_schema(desc.parameters.clone())
}

/// Convert a Message to a genai ChatMessage.
pub fn to_chat_message(msg: &Message) -> ChatMessage {
    match msg.role {
        Role::System => ChatMessage::system(&msg.content),
        Role::User => ChatMessage::user(&msg.content),
        Role::Assistant => {
            if let Some(ref calls) = msg.tool_calls {
                let genai_calls: Vec<genai::chat::ToolCall> = calls
                    .iter()
                    .map(|c| genai::chat::ToolCall {
                        call_id: c.id.clone(),
                        fn_name: c.name.clone(),
                        fn_arguments: c.arguments.clone(),
                        thought_signatures: None,
                    })
                    .collect();

                let mut content = MessageContent::from(msg.content.as_str());
                for call in genai_calls {
                    content.push(genai::chat::ContentPart::ToolCall(call));
                }
                ChatMessage::assistant(content)
            } else {
                ChatMessage::assistant(&msg.content)
            }
        }
        Role::Tool => {
            let call_id = msg.tool_call_id.as_deref().unwrap_or("");
            let response = ToolResponse {
                call_id: call_id.to_string(),
                fn_name: None,
                content: msg.content.clone(),
            };
            ChatMessage::from(response)
        }
    }
}

/// Build a genai ChatRequest from messages and tools.
pub fn build_request(messages: &[Message], tools: &[&dyn Tool]) -> ChatRequest {
    let chat_messages: Vec<ChatMessage> = messages.iter().map(to_chat_message).collect();

    let genai_tools: Vec<genai::chat::Tool> = tools
        .iter()
        .map(|t| to_genai_tool(&t.descriptor()))
        .collect();

    let mut request = ChatRequest::new(chat_messages);

    if !genai_tools.is_empty() {
        request = request.with_tools(genai_tools);
    }

    request
}
