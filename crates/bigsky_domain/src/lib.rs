mod assistant;
mod chat_completion;
mod context;
mod error;
mod normalize;
mod payload;
mod summary;
mod test_case;
mod tool_alias;
mod tool_call;
mod tool_call_arguments;
mod tool_name;
mod verdict;

pub use assistant::*;
pub use chat_completion::*;
pub use context::*;
pub use error::*;
pub use normalize::*;
pub use payload::*;
pub use summary::*;
pub use test_case::*;
pub use tool_alias::*;
pub use tool_call::*;
pub use tool_call_arguments::*;
pub use tool_name::*;
pub use verdict::*;
