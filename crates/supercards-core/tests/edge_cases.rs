//! Edge case and failure-mode tests
//!
//! Storage failures, malformed persisted data, on-disk persistence and empty
//! catalogues.

use supercards_core::{
    Board, BoardConfig, BookmarkGlyph, BookmarkStore, CardFields, CardId, CardWidget, Catalogue,
    EventBus, FavouritesListWidget, HeadlessCardSurface, HeadlessListSurface, MemoryStore, LIST_KEY,
};
use tempfile::TempDir;

// ============================================================================
// Persistence Failures
// ============================================================================

/// A failed write keeps the card's optimistic state and still notifies
#[test]
fn test_quota_failure_keeps_optimistic_card_state() {
    let _ = tracing_subscriber::fmt::try_init();

    let backend = MemoryStore::with_quota(8);
    let store = BookmarkStore::new(backend.clone());
    let bus = EventBus::new();

    let list_surface = HeadlessListSurface::new();
    let _list = FavouritesListWidget::attach(store.clone(), bus.clone(), list_surface.clone());

    let surface = HeadlessCardSurface::new();
    let card = CardWidget::attach(
        CardFields::mission("m1", "Innovation", "d"),
        store.clone(),
        bus,
        surface.clone(),
    );

    card.toggle_bookmark();

    // UI reflects intent
    assert!(card.is_bookmarked());
    assert_eq!(surface.view().unwrap().glyph, BookmarkGlyph::Filled);

    // storage did not change, and the list redrew from it
    assert!(store.get_all().is_empty());
    assert!(!store.is_bookmarked(&CardId::from("m1")));
    assert_eq!(list_surface.renders(), 2);
    assert!(list_surface.entries().is_empty());
    assert!(backend.is_empty());
}

/// Storage recovers once space is available again
#[test]
fn test_toggle_after_quota_lifted() {
    let backend = MemoryStore::with_quota(8);
    let store = BookmarkStore::new(backend.clone());
    let card = CardWidget::attach(
        CardFields::mission("m1", "Innovation", "d"),
        store.clone(),
        EventBus::new(),
        HeadlessCardSurface::new(),
    );

    card.toggle_bookmark(); // fails to persist, card shows bookmarked
    backend.set_quota(None);
    card.toggle_bookmark(); // un-bookmark: nothing stored to remove
    card.toggle_bookmark(); // bookmark again, persists now

    assert!(card.is_bookmarked());
    assert_eq!(store.get_all().len(), 1);
    assert!(store.is_bookmarked(&CardId::from("m1")));
}

// ============================================================================
// Malformed Data
// ============================================================================

#[test]
fn test_malformed_list_shows_empty_favourites() {
    let _ = tracing_subscriber::fmt::try_init();

    let backend = MemoryStore::new();
    backend.insert_raw(LIST_KEY, "[{\"id\": 5}]");
    let store = BookmarkStore::new(backend);

    let surface = HeadlessListSurface::new();
    let _list = FavouritesListWidget::attach(store, EventBus::new(), surface.clone());
    assert!(surface.entries().is_empty());
    assert_eq!(surface.renders(), 1);
}

#[test]
fn test_flag_without_list_entry_starts_card_bookmarked() {
    // stores written by other tools may diverge; the card trusts the flag
    let backend = MemoryStore::new();
    backend.insert_raw("bookmark-m1", "true");
    let store = BookmarkStore::new(backend);

    let card = CardWidget::attach(
        CardFields::mission("m1", "Innovation", "d"),
        store.clone(),
        EventBus::new(),
        HeadlessCardSurface::new(),
    );
    assert!(card.is_bookmarked());

    let report = store.reconcile().unwrap();
    assert_eq!(report.flags_cleared, vec![CardId::from("m1")]);
}

#[test]
fn test_empty_card_id() {
    let store = BookmarkStore::in_memory();
    let card = CardWidget::attach(
        CardFields::mission("", "Nameless", ""),
        store.clone(),
        EventBus::new(),
        HeadlessCardSurface::new(),
    );

    card.toggle_bookmark();
    assert!(store.is_bookmarked(&CardId::from("")));
    assert_eq!(store.get_all().len(), 1);
}

// ============================================================================
// Disk Persistence
// ============================================================================

#[test]
fn test_bookmarks_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = BoardConfig::default().with_data_dir(temp_dir.path());

    {
        let mut board = Board::open(&config).unwrap();
        board.show_cards(vec![
            CardFields::mission("m1", "Innovation", "d"),
            CardFields::mission("m2", "Learning", "d"),
        ]);
        board.toggle(&CardId::from("m2")).unwrap();
    }

    let mut board = Board::open(&config).unwrap();
    board.show_cards(vec![
        CardFields::mission("m1", "Innovation", "d"),
        CardFields::mission("m2", "Learning", "d"),
    ]);

    assert!(!board.card(&CardId::from("m1")).unwrap().widget().is_bookmarked());
    assert!(board.card(&CardId::from("m2")).unwrap().widget().is_bookmarked());

    let entries = board.favourite_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id(), "m2");
}

#[test]
fn test_disk_store_delete_from_list() {
    let temp_dir = TempDir::new().unwrap();
    let store = BookmarkStore::open(temp_dir.path().join("bookmarks.redb")).unwrap();
    let bus = EventBus::new();

    let card = CardWidget::attach(
        CardFields::mission("m1", "Innovation", "d"),
        store.clone(),
        bus.clone(),
        HeadlessCardSurface::new(),
    );
    card.toggle_bookmark();

    let list = FavouritesListWidget::attach(store.clone(), bus, HeadlessListSurface::new());
    assert!(list.delete(&CardId::from("m1")));
    assert!(!card.is_bookmarked());
    assert!(store.get_all().is_empty());
}

// ============================================================================
// Empty Catalogue
// ============================================================================

#[test]
fn test_board_with_zero_cards() {
    let mut board = Board::in_memory();
    let spread = Catalogue::default().deal(&mut rand::rng(), 3);

    board.show(&spread);
    assert!(board.cards().is_empty());
    assert!(board.favourite_entries().is_empty());
    assert!(!board.delete_favourite(&CardId::from("m1")));
}
