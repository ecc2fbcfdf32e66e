mod console_sink;
mod http_dispatcher;
mod replay_dispatcher;
mod retry;
mod tracing_sink;

pub use console_sink::*;
pub use http_dispatcher::*;
pub use replay_dispatcher::*;
pub use retry::*;
pub use tracing_sink::*;
