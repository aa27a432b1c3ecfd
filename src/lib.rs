//! prompt-hash - expand `#shortcuts` into saved prompt templates
//!
//! Typing `#summarise` into a text field and triggering expansion replaces
//! the token with the stored template, filling `{selection}`, `{clipboard}`,
//! `{url}` and `{title}` and leaving the caret where `{cursor}` was.
//! Plain fields and contenteditable editors are both supported, and on AI
//! chat sites the prompt can be submitted automatically.

pub mod caret;
pub mod cli;
pub mod config;
pub mod dom;
pub mod error;
pub mod expander;
pub mod inserter;
pub mod logging;
pub mod messages;
pub mod page;
pub mod shortcuts;
pub mod sites;
pub mod storage;
pub mod template;
pub mod toast_manager;
pub mod token;
