pub mod descriptor;
pub mod introspector;
