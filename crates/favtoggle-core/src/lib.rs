//! Core library for favtoggle.
//!
//! Holds everything that does not need GTK: configuration, the indicator
//! palette, the favorite toggle controller and the in-memory document it is
//! tested against.

pub mod config;
pub mod document;
pub mod error;
pub mod favorite;
pub mod logging;
pub mod page;
pub mod theme;

pub use config::{Config, ConfigLoadResult, ProductEntry, SelectorsConfig};
pub use document::{ClickEvent, ClickOutcome, Document, NodeId, ReadyState};
pub use error::{Error, Result};
pub use favorite::{ClickHandler, FavoriteChange, FavoriteController, FavoriteHost};
pub use theme::{FavoritePalette, Tint};
