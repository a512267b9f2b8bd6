pub mod actions;
pub mod clock;
pub mod grammar;
pub mod parser;
pub mod session;
pub mod typewriter;

// Re-export the main entry point for convenient access
pub use session::Session;
