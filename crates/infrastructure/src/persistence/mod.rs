//! Resource and variable storage adapters

mod shared_variables;
mod story_loader;

pub use shared_variables::SharedVariables;
pub use story_loader::FileStoryLoader;
