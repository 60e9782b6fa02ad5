//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that turns keys into session actions and
//!   feeds background results back into [`crate::core::session`].
//! - [`renderer`]: transcript, status line and composer output.
//! - [`theme`]: color and style policy.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns the conversation and its persistence.

pub mod chat_loop;
pub mod renderer;
pub mod theme;
