//! Card and favourites-list widgets
//!
//! Widgets own their UI state, talk to [`BookmarkStore`](crate::BookmarkStore),
//! and coordinate with each other only through the
//! [`EventBus`](crate::EventBus):
//!
//! ```text
//! CardWidget ──toggle──▶ BookmarkStore ──▶ Changed ──────▶ FavouritesListWidget
//! FavouritesListWidget ──delete──▶ BookmarkStore ──▶ Unfavourited ──▶ CardWidget
//! ```

pub mod card;
pub mod favourites;
pub mod surface;
pub mod view;

pub use card::{CardControl, CardWidget};
pub use favourites::FavouritesListWidget;
pub use surface::{CardFrame, CardSurface, HeadlessCardSurface, HeadlessListSurface, ListSurface};
pub use view::{BookmarkGlyph, CardView, FavouriteEntryView};
