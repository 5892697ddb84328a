//! SuperCards Core Library
//!
//! Bookmark persistence and widget synchronization for flippable,
//! bookmarkable mission and assessment cards.
//!
//! ## Overview
//!
//! Three components cooperate through a shared store and two notifications:
//!
//! - **BookmarkStore**: ordered list of bookmarked card snapshots plus one
//!   boolean flag per card id, over a key-value backend
//! - **CardWidget**: bookmark and flip state of one card
//! - **FavouritesListWidget**: the bookmark list with per-entry delete
//!
//! Toggling a card writes the store and broadcasts `Changed`, which makes an
//! open favourites list redraw. Deleting from the list writes the store and
//! broadcasts `Unfavourited`, which un-stars the matching live card.
//!
//! ## Quick Start
//!
//! ```
//! use supercards_core::{
//!     BookmarkStore, CardControl, CardFields, CardWidget, EventBus,
//!     FavouritesListWidget, HeadlessCardSurface, HeadlessListSurface,
//! };
//!
//! let store = BookmarkStore::in_memory();
//! let bus = EventBus::new();
//!
//! let list_surface = HeadlessListSurface::new();
//! let list = FavouritesListWidget::attach(store.clone(), bus.clone(), list_surface.clone());
//!
//! let card = CardWidget::attach(
//!     CardFields::mission("m1", "Innovation", "Try something new"),
//!     store.clone(),
//!     bus.clone(),
//!     HeadlessCardSurface::new(),
//! );
//!
//! card.handle(CardControl::ToggleBookmark);
//! assert_eq!(list_surface.entries().len(), 1);
//!
//! list.delete(&card.id());
//! assert!(!card.is_bookmarked());
//! ```

pub mod board;
pub mod bookmarks;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod events;
pub mod storage;
pub mod theme;
pub mod types;
pub mod widget;

// Re-exports
pub use board::{Board, MountedCard};
pub use bookmarks::{BookmarkStore, ReconcileReport, FLAG_PREFIX, LIST_KEY};
pub use catalogue::{Catalogue, Spread};
pub use config::BoardConfig;
pub use error::{CardError, CardResult};
pub use events::{BookmarkEvent, EventBus, Subscription};
pub use storage::{DiskStore, KeyValueStore, MemoryStore, WriteBatch};
pub use theme::CardTheme;
pub use types::*;
pub use widget::{
    BookmarkGlyph, CardControl, CardSurface, CardView, CardWidget, FavouriteEntryView,
    FavouritesListWidget, HeadlessCardSurface, HeadlessListSurface, ListSurface,
};
