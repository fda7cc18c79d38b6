// ABOUTME: Public library API for the marmalade sync tool
// ABOUTME: Re-exports core modules for external use

pub mod api;
pub mod auth;
pub mod clean;
pub mod cli;
pub mod convert;
pub mod error;
pub mod icon;
pub mod inline;
pub mod model;
pub mod refs;
pub mod sync;
pub mod table;
pub mod util;

pub use error::{Error, Result};
pub use model::{Block, ChildPage, Span};
pub use refs::PageMap;
