//! Card widget
//!
//! One implementation serves both mission and assessment cards; the variant
//! only changes what the view shows.
//!
//! State is two independent booleans:
//! - `bookmarked`: mirrors the persisted flag, read on attach
//! - `is_flipped`: presentation only, never persisted

use std::sync::{Arc, Weak};

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use super::surface::CardSurface;
use super::view::{BookmarkGlyph, CardView};
use crate::bookmarks::BookmarkStore;
use crate::events::{BookmarkEvent, EventBus, Subscription};
use crate::theme::CardTheme;
use crate::types::{CardFields, CardFieldsUpdate, CardId, CardSnapshot};

/// User input routed to a card by its surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardControl {
    /// The flip control was activated
    Flip,
    /// A bookmark glyph was activated
    ToggleBookmark,
}

struct CardState {
    fields: CardFields,
    theme: CardTheme,
    bookmarked: bool,
    is_flipped: bool,
    surface: Box<dyn CardSurface>,
}

impl CardState {
    fn view(&self) -> CardView {
        CardView::new(&self.fields, &self.theme, self.bookmarked, self.is_flipped)
    }

    fn redraw(&mut self) {
        let view = self.view();
        self.surface.render(&view);
    }

    fn snapshot(&self) -> CardSnapshot {
        self.fields.snapshot(self.bookmarked, Utc::now())
    }
}

/// A live, attached card
///
/// Created by [`CardWidget::attach`]; listeners are released by
/// [`CardWidget::detach`] or on drop.
pub struct CardWidget {
    state: Arc<Mutex<CardState>>,
    store: BookmarkStore,
    bus: EventBus,
    subscription: Option<Subscription>,
}

impl std::fmt::Debug for CardWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CardWidget")
            .field("id", &state.fields.id)
            .field("bookmarked", &state.bookmarked)
            .field("is_flipped", &state.is_flipped)
            .field("attached", &self.subscription.is_some())
            .finish()
    }
}

impl CardWidget {
    /// Attach a card: read its bookmark flag, draw it, and start listening
    /// for unfavourited notifications.
    pub fn attach(
        fields: CardFields,
        store: BookmarkStore,
        bus: EventBus,
        surface: impl CardSurface + 'static,
    ) -> Self {
        let bookmarked = store.is_bookmarked(&fields.id);
        let theme = CardTheme::for_kind(&fields.kind);
        debug!(card_id = %fields.id, bookmarked, "Attaching card");

        let mut state = CardState {
            fields,
            theme,
            bookmarked,
            is_flipped: false,
            surface: Box::new(surface),
        };
        state.redraw();

        let state = Arc::new(Mutex::new(state));
        let subscription = bus.subscribe(unfavourite_handler(Arc::downgrade(&state)));

        Self {
            state,
            store,
            bus,
            subscription: Some(subscription),
        }
    }

    /// Stop listening. Controls delivered afterwards are ignored.
    pub fn detach(&mut self) {
        if self.subscription.take().is_some() {
            debug!(card_id = %self.id(), "Detached card");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn id(&self) -> CardId {
        self.state.lock().fields.id.clone()
    }

    pub fn fields(&self) -> CardFields {
        self.state.lock().fields.clone()
    }

    pub fn is_bookmarked(&self) -> bool {
        self.state.lock().bookmarked
    }

    pub fn is_flipped(&self) -> bool {
        self.state.lock().is_flipped
    }

    pub fn view(&self) -> CardView {
        self.state.lock().view()
    }

    /// Snapshot of the card as it is right now
    pub fn snapshot(&self) -> CardSnapshot {
        self.state.lock().snapshot()
    }

    /// Route a control event from the surface
    pub fn handle(&self, control: CardControl) {
        if !self.is_attached() {
            warn!(card_id = %self.id(), ?control, "Control event on detached card ignored");
            return;
        }

        match control {
            CardControl::Flip => self.flip(),
            CardControl::ToggleBookmark => self.toggle_bookmark(),
        }
    }

    /// Invert the bookmark, persist it, broadcast it, then patch the glyph.
    ///
    /// A persistence failure is logged; the local flag keeps the user's intent.
    pub fn toggle_bookmark(&self) {
        let snapshot = {
            let mut state = self.state.lock();
            state.bookmarked = !state.bookmarked;
            state.snapshot()
        };

        let result = if snapshot.bookmarked {
            self.store.add(snapshot.clone())
        } else {
            self.store.remove(&snapshot.id).map(|_| ())
        };
        if let Err(e) = result {
            error!(card_id = %snapshot.id, error = %e, "Failed to persist bookmark");
        }

        let glyph = BookmarkGlyph::from_bookmarked(snapshot.bookmarked);
        self.bus.publish(&BookmarkEvent::Changed(snapshot));

        self.state.lock().surface.set_bookmark_glyph(glyph);
    }

    /// Invert the flipped orientation. Touches neither storage nor the bus.
    pub fn flip(&self) {
        let mut state = self.state.lock();
        state.is_flipped = !state.is_flipped;
        let flipped = state.is_flipped;
        state.surface.set_flipped(flipped);
    }

    /// Apply changed fields from the catalogue and redraw.
    ///
    /// A new id re-reads the bookmark flag; a new theme input re-derives the
    /// theme. An update that changes nothing does not redraw.
    pub fn update(&self, update: CardFieldsUpdate) {
        let id = {
            let mut state = self.state.lock();
            let changes = state.fields.apply(update);
            if !changes.any() {
                return;
            }
            if changes.theme {
                state.theme = CardTheme::for_kind(&state.fields.kind);
            }
            if !changes.id {
                state.redraw();
                return;
            }
            state.fields.id.clone()
        };

        // read outside the lock; the store may be slow
        let bookmarked = self.store.is_bookmarked(&id);

        let mut state = self.state.lock();
        state.bookmarked = bookmarked;
        state.redraw();
        debug!(card_id = %id, bookmarked, "Card id changed");
    }
}

fn unfavourite_handler(state: Weak<Mutex<CardState>>) -> impl Fn(&BookmarkEvent) + Send + Sync {
    move |event: &BookmarkEvent| {
        let BookmarkEvent::Unfavourited { card_id } = event else {
            return;
        };
        let Some(state) = state.upgrade() else {
            return;
        };

        let mut state = state.lock();
        if &state.fields.id == card_id && state.bookmarked {
            state.bookmarked = false;
            state.redraw();
            debug!(card_id = %card_id, "Card unfavourited from list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AssessmentCategory;
    use crate::widget::surface::HeadlessCardSurface;

    fn attach(fields: CardFields, store: &BookmarkStore, bus: &EventBus) -> (CardWidget, HeadlessCardSurface) {
        let surface = HeadlessCardSurface::new();
        let widget = CardWidget::attach(fields, store.clone(), bus.clone(), surface.clone());
        (widget, surface)
    }

    #[test]
    fn test_attach_reads_flag_and_renders() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        store
            .add(CardFields::mission("m1", "Innovation", "d").snapshot(true, Utc::now()))
            .unwrap();

        let (widget, surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);
        assert!(widget.is_bookmarked());
        assert!(!widget.is_flipped());
        assert_eq!(bus.subscriber_count(), 1);

        let frame = surface.frame();
        assert_eq!(frame.renders, 1);
        assert_eq!(frame.view.unwrap().glyph, BookmarkGlyph::Filled);
    }

    #[test]
    fn test_toggle_updates_glyph_in_place() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let (widget, surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);

        widget.handle(CardControl::ToggleBookmark);

        let frame = surface.frame();
        assert_eq!(frame.renders, 1);
        assert_eq!(frame.glyph_updates, 1);
        assert_eq!(frame.view.unwrap().glyph, BookmarkGlyph::Filled);
        assert!(store.is_bookmarked(&CardId::from("m1")));
    }

    #[test]
    fn test_toggle_broadcasts_new_state() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = {
            let seen = seen.clone();
            bus.subscribe(move |event| seen.lock().push(event.clone()))
        };

        let (widget, _surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);
        widget.toggle_bookmark();
        widget.toggle_bookmark();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        match (&seen[0], &seen[1]) {
            (BookmarkEvent::Changed(on), BookmarkEvent::Changed(off)) => {
                assert!(on.bookmarked);
                assert!(!off.bookmarked);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_flip_is_presentation_only() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let (widget, surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);

        let published = Arc::new(Mutex::new(0usize));
        let _sub = {
            let published = published.clone();
            bus.subscribe(move |_| *published.lock() += 1)
        };

        widget.handle(CardControl::Flip);
        assert!(widget.is_flipped());
        assert!(!widget.is_bookmarked());
        assert!(store.get_all().is_empty());
        assert_eq!(*published.lock(), 0);

        let frame = surface.frame();
        assert_eq!(frame.flip_updates, 1);
        assert!(frame.view.unwrap().flipped);

        widget.flip();
        assert!(!widget.is_flipped());
    }

    #[test]
    fn test_unfavourite_for_other_id_ignored() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let (widget, surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);
        widget.toggle_bookmark();

        bus.publish(&BookmarkEvent::Unfavourited {
            card_id: CardId::from("m2"),
        });
        assert!(widget.is_bookmarked());
        assert_eq!(surface.frame().renders, 1);
    }

    #[test]
    fn test_unfavourite_when_not_bookmarked_does_not_redraw() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let (_widget, surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);

        bus.publish(&BookmarkEvent::Unfavourited {
            card_id: CardId::from("m1"),
        });
        assert_eq!(surface.frame().renders, 1);
    }

    #[test]
    fn test_detach_releases_listeners() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let (mut widget, surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);
        widget.toggle_bookmark();

        widget.detach();
        assert!(!widget.is_attached());
        assert_eq!(bus.subscriber_count(), 0);

        // a late notification does not reach the card
        bus.publish(&BookmarkEvent::Unfavourited {
            card_id: CardId::from("m1"),
        });
        assert!(widget.is_bookmarked());

        // controls are inert
        widget.handle(CardControl::Flip);
        widget.handle(CardControl::ToggleBookmark);
        assert!(!widget.is_flipped());
        assert!(store.is_bookmarked(&CardId::from("m1")));
        assert_eq!(surface.frame().flip_updates, 0);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        {
            let _card = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_update_cosmetic_field_redraws() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let (widget, surface) = attach(
            CardFields::assessment("a1", AssessmentCategory::Context, "Workplace", "d", "x"),
            &store,
            &bus,
        );

        widget.update(CardFieldsUpdate {
            description: Some("new".to_string()),
            ..Default::default()
        });

        let frame = surface.frame();
        assert_eq!(frame.renders, 2);
        assert_eq!(frame.view.unwrap().description, "new");
    }

    #[test]
    fn test_update_category_rederives_theme() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let (widget, surface) = attach(
            CardFields::assessment("a1", AssessmentCategory::Context, "Workplace", "d", "x"),
            &store,
            &bus,
        );

        widget.update(CardFieldsUpdate {
            category: Some(AssessmentCategory::Timing),
            ..Default::default()
        });

        let view = surface.view().unwrap();
        assert_eq!(view.colour_var, Some("--color-timing"));
        assert_eq!(view.icon, "assets/images/assessment_timing.png");
    }

    #[test]
    fn test_update_id_rereads_flag() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        store
            .add(CardFields::mission("m2", "Learning", "d").snapshot(true, Utc::now()))
            .unwrap();
        let (widget, surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);
        assert!(!widget.is_bookmarked());

        widget.update(CardFieldsUpdate {
            id: Some(CardId::from("m2")),
            ..Default::default()
        });
        assert!(widget.is_bookmarked());
        assert_eq!(surface.view().unwrap().glyph, BookmarkGlyph::Filled);

        // the unfavourited listener follows the new id
        bus.publish(&BookmarkEvent::Unfavourited {
            card_id: CardId::from("m2"),
        });
        assert!(!widget.is_bookmarked());
    }

    #[test]
    fn test_noop_update_does_not_redraw() {
        let store = BookmarkStore::in_memory();
        let bus = EventBus::new();
        let (widget, surface) = attach(CardFields::mission("m1", "Innovation", "d"), &store, &bus);

        widget.update(CardFieldsUpdate {
            name: Some("Innovation".to_string()),
            ..Default::default()
        });
        assert_eq!(surface.frame().renders, 1);
    }
}
