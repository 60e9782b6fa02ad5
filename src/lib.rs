//! ChatGuard is a terminal chat client for a moderated chat service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation: messages, the reply mode, the session
//!   controller and the key-value store the transcript is persisted in.
//! - [`api`] talks to the chat service over HTTP and defines its payloads.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`cli`] parses arguments and runs the one-shot commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
