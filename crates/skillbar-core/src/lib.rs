//! Skillbar launcher core
//!
//! Turns keystrokes into a ranked, navigable list of skills and a resolved
//! invocation string.
//!
//! ## Pipeline
//!
//! raw input -> [`parser::parse`] -> [`filter::filter`] -> [`UsageStore::sorted_skills`]
//! -> [`Navigator`] -> [`Launcher::execute`] -> [`ExecutionGateway`]
//!
//! ## Modes
//!
//! - `commit` searches names and display names
//! - `/commit` selects skills by exact or prefix name
//! - `/commit fix typo` does the same and carries `fix typo` as the task
//!
//! Skill discovery, rendering and window management live outside this crate.

#![deny(unsafe_code, dead_code, unused_imports, unused_variables, missing_docs)]

pub mod catalog;
pub mod filter;
pub mod gateway;
pub mod glyph;
pub mod launcher;
pub mod navigation;
pub mod parser;
pub mod ranker;
pub mod usage;

pub use catalog::load_catalog;
pub use gateway::{ExecutionGateway, FallbackGateway};
pub use launcher::{resolve_invocation, Launcher};
pub use navigation::{NavCommand, Navigator};
pub use parser::parse;
pub use usage::{UsageStorage, UsageStore};

pub use skillbar_types::{
    GatewayError, InputMode, Invocation, KeyAction, LauncherError, LauncherOutcome, ParsedInput,
    Skill, UsageRecord,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ExecutionGateway, FallbackGateway, KeyAction, Launcher, LauncherOutcome, Skill,
        UsageStorage, UsageStore,
    };
}
