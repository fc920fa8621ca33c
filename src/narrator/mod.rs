pub mod menu;
pub mod snapshot;
pub mod vocabulary;
