mod evaluator;
mod filter;
pub mod fixture;
mod grader;
mod payload_store;
mod services;
mod validator;

pub use evaluator::*;
pub use filter::*;
pub use grader::*;
pub use payload_store::*;
pub use services::*;
pub use validator::*;
