mod core;

pub use self::core::{
    Completion, CompletionOptions, Message, OpenAiCompletion, Role, completion, reply_content,
};
