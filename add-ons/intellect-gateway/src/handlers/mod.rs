pub mod chat;
pub mod quiz;
pub mod svg;
pub mod system;
