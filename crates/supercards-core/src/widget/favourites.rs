//! Favourites list widget
//!
//! Shows every stored bookmark and lets the user delete entries. The list is
//! rebuilt from storage on attach and on every bookmark-changed notification;
//! lists are small, so there is no incremental diffing.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, error};

use super::surface::ListSurface;
use super::view::FavouriteEntryView;
use crate::bookmarks::BookmarkStore;
use crate::events::{BookmarkEvent, EventBus, Subscription};
use crate::types::{CardId, CardSnapshot};

struct ListState {
    entries: Vec<CardSnapshot>,
    surface: Box<dyn ListSurface>,
}

impl ListState {
    fn reload(&mut self, store: &BookmarkStore) {
        self.entries = store.get_all();
        let views: Vec<FavouriteEntryView> =
            self.entries.iter().map(FavouriteEntryView::from).collect();
        self.surface.render(&views);
    }
}

/// Live view of the bookmark list
pub struct FavouritesListWidget {
    state: Arc<Mutex<ListState>>,
    store: BookmarkStore,
    bus: EventBus,
    subscription: Option<Subscription>,
}

impl std::fmt::Debug for FavouritesListWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavouritesListWidget")
            .field("entries", &self.state.lock().entries.len())
            .field("attached", &self.subscription.is_some())
            .finish()
    }
}

impl FavouritesListWidget {
    /// Draw the stored list and start listening for bookmark changes
    pub fn attach(store: BookmarkStore, bus: EventBus, surface: impl ListSurface + 'static) -> Self {
        let mut state = ListState {
            entries: Vec::new(),
            surface: Box::new(surface),
        };
        state.reload(&store);
        debug!(entries = state.entries.len(), "Attaching favourites list");

        let state = Arc::new(Mutex::new(state));
        let subscription = bus.subscribe(changed_handler(Arc::downgrade(&state), store.clone()));

        Self {
            state,
            store,
            bus,
            subscription: Some(subscription),
        }
    }

    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            debug!("Detached favourites list");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Entries as last drawn
    pub fn entries(&self) -> Vec<CardSnapshot> {
        self.state.lock().entries.clone()
    }

    /// Re-read storage and redraw
    pub fn refresh(&self) {
        self.state.lock().reload(&self.store);
    }

    /// Delete the entry for `id`, redraw, and tell live cards it is gone.
    ///
    /// Returns whether an entry was removed. When the write fails the error
    /// is logged, the list redraws from storage, and nothing is broadcast.
    pub fn delete(&self, id: &CardId) -> bool {
        let removed = match self.store.remove(id) {
            Ok(removed) => removed,
            Err(e) => {
                error!(card_id = %id, error = %e, "Failed to delete favourite");
                self.refresh();
                return false;
            }
        };

        self.refresh();
        self.bus.publish(&BookmarkEvent::Unfavourited {
            card_id: id.clone(),
        });
        removed
    }
}

fn changed_handler(
    state: Weak<Mutex<ListState>>,
    store: BookmarkStore,
) -> impl Fn(&BookmarkEvent) + Send + Sync {
    move |event: &BookmarkEvent| {
        if !matches!(event, BookmarkEvent::Changed(_)) {
            return;
        }
        if let Some(state) = state.upgrade() {
            state.lock().reload(&store);
        }
    }
}
