//! One page of cards plus an optional favourites list
//!
//! The board owns the shared [`BookmarkStore`] and [`EventBus`] and hands
//! clones of both to every widget it attaches. Surfaces are headless so the
//! terminal front end and tests can read back what was drawn.

use tracing::info;

use crate::bookmarks::BookmarkStore;
use crate::catalogue::Spread;
use crate::config::BoardConfig;
use crate::error::{CardError, CardResult};
use crate::events::EventBus;
use crate::types::{CardFields, CardId};
use crate::widget::{
    CardControl, CardView, CardWidget, FavouriteEntryView, FavouritesListWidget,
    HeadlessCardSurface, HeadlessListSurface,
};

/// A card widget together with the surface it draws on
#[derive(Debug)]
pub struct MountedCard {
    widget: CardWidget,
    surface: HeadlessCardSurface,
}

impl MountedCard {
    pub fn widget(&self) -> &CardWidget {
        &self.widget
    }

    pub fn surface(&self) -> &HeadlessCardSurface {
        &self.surface
    }

    /// What the surface currently shows
    pub fn view(&self) -> CardView {
        self.surface.view().unwrap_or_else(|| self.widget.view())
    }
}

#[derive(Debug)]
struct MountedList {
    widget: FavouritesListWidget,
    surface: HeadlessListSurface,
}

/// A page of live cards
#[derive(Debug)]
pub struct Board {
    store: BookmarkStore,
    bus: EventBus,
    cards: Vec<MountedCard>,
    favourites: Option<MountedList>,
}

impl Board {
    pub fn new(store: BookmarkStore, bus: EventBus) -> Self {
        Self {
            store,
            bus,
            cards: Vec::new(),
            favourites: None,
        }
    }

    /// Board over the database named by `config`
    pub fn open(config: &BoardConfig) -> CardResult<Self> {
        let store = BookmarkStore::open(config.database_path())?;
        Ok(Self::new(store, EventBus::new()))
    }

    pub fn in_memory() -> Self {
        Self::new(BookmarkStore::in_memory(), EventBus::new())
    }

    pub fn store(&self) -> &BookmarkStore {
        &self.store
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Replace the displayed cards with a new spread
    pub fn show(&mut self, spread: &Spread) {
        self.show_cards(spread.cards().cloned());
    }

    /// Detach every current card, then attach `cards` in order
    pub fn show_cards(&mut self, cards: impl IntoIterator<Item = CardFields>) {
        for mounted in &mut self.cards {
            mounted.widget.detach();
        }
        self.cards.clear();

        for fields in cards {
            let surface = HeadlessCardSurface::new();
            let widget =
                CardWidget::attach(fields, self.store.clone(), self.bus.clone(), surface.clone());
            self.cards.push(MountedCard { widget, surface });
        }
        info!(cards = self.cards.len(), "Board shows new cards");
    }

    pub fn cards(&self) -> &[MountedCard] {
        &self.cards
    }

    pub fn card(&self, id: &CardId) -> Option<&MountedCard> {
        self.cards.iter().find(|mounted| &mounted.widget.id() == id)
    }

    fn require(&self, id: &CardId) -> CardResult<&MountedCard> {
        self.card(id)
            .ok_or_else(|| CardError::CardNotFound(id.to_string()))
    }

    /// Activate a card's bookmark glyph; returns the new bookmarked state
    pub fn toggle(&self, id: &CardId) -> CardResult<bool> {
        let mounted = self.require(id)?;
        mounted.widget.handle(CardControl::ToggleBookmark);
        Ok(mounted.widget.is_bookmarked())
    }

    /// Activate a card's flip control; returns the new flipped state
    pub fn flip(&self, id: &CardId) -> CardResult<bool> {
        let mounted = self.require(id)?;
        mounted.widget.handle(CardControl::Flip);
        Ok(mounted.widget.is_flipped())
    }

    /// Attach the favourites list if it is not already open
    pub fn open_favourites(&mut self) -> &FavouritesListWidget {
        let list = self.favourites.get_or_insert_with(|| {
            let surface = HeadlessListSurface::new();
            let widget =
                FavouritesListWidget::attach(self.store.clone(), self.bus.clone(), surface.clone());
            MountedList { widget, surface }
        });
        &list.widget
    }

    pub fn close_favourites(&mut self) {
        if let Some(mut list) = self.favourites.take() {
            list.widget.detach();
        }
    }

    pub fn favourites(&self) -> Option<&FavouritesListWidget> {
        self.favourites.as_ref().map(|list| &list.widget)
    }

    /// Entries as drawn by the open list, or read from storage when closed
    pub fn favourite_entries(&self) -> Vec<FavouriteEntryView> {
        match &self.favourites {
            Some(list) => list.surface.entries(),
            None => self
                .store
                .get_all()
                .iter()
                .map(FavouriteEntryView::from)
                .collect(),
        }
    }

    /// Delete a favourite through the list widget, opening it if needed
    pub fn delete_favourite(&mut self, id: &CardId) -> bool {
        self.open_favourites().delete(id)
    }
}
