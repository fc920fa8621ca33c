pub mod backend;
pub mod command;
pub mod console;
pub mod detect;
pub mod http;
pub mod manager;
pub mod registry;
