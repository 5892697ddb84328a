//! Render targets for widgets
//!
//! A surface is whatever owns the visual structure of a widget: a DOM node, a
//! terminal region, or the headless frames below. Widgets only ask it to draw
//! a full view or to patch the bookmark glyph / flipped state in place.

use std::sync::Arc;

use parking_lot::Mutex;

use super::view::{BookmarkGlyph, CardView, FavouriteEntryView};

/// Render target of one card widget
pub trait CardSurface: Send {
    /// Redraw the whole card
    fn render(&mut self, view: &CardView);

    /// Update only the bookmark glyph(s)
    fn set_bookmark_glyph(&mut self, glyph: BookmarkGlyph);

    /// Update only the flipped orientation
    fn set_flipped(&mut self, flipped: bool);
}

/// Render target of the favourites list
pub trait ListSurface: Send {
    /// Replace every displayed entry
    fn render(&mut self, entries: &[FavouriteEntryView]);
}

/// Last state drawn to a [`HeadlessCardSurface`], plus draw counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFrame {
    pub view: Option<CardView>,
    /// Full renders
    pub renders: usize,
    /// In-place glyph updates
    pub glyph_updates: usize,
    /// In-place flip updates
    pub flip_updates: usize,
}

/// Card surface that keeps its frame in memory
///
/// Clones share the frame, so a caller can hand one clone to a widget and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct HeadlessCardSurface {
    frame: Arc<Mutex<CardFrame>>,
}

impl HeadlessCardSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> CardFrame {
        self.frame.lock().clone()
    }

    /// Currently displayed view, if anything was rendered
    pub fn view(&self) -> Option<CardView> {
        self.frame.lock().view.clone()
    }
}

impl CardSurface for HeadlessCardSurface {
    fn render(&mut self, view: &CardView) {
        let mut frame = self.frame.lock();
        frame.view = Some(view.clone());
        frame.renders += 1;
    }

    fn set_bookmark_glyph(&mut self, glyph: BookmarkGlyph) {
        let mut frame = self.frame.lock();
        if let Some(view) = frame.view.as_mut() {
            view.glyph = glyph;
        }
        frame.glyph_updates += 1;
    }

    fn set_flipped(&mut self, flipped: bool) {
        let mut frame = self.frame.lock();
        if let Some(view) = frame.view.as_mut() {
            view.flipped = flipped;
        }
        frame.flip_updates += 1;
    }
}

/// List surface that keeps the displayed entries in memory
#[derive(Debug, Clone, Default)]
pub struct HeadlessListSurface {
    inner: Arc<Mutex<(Vec<FavouriteEntryView>, usize)>>,
}

impl HeadlessListSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<FavouriteEntryView> {
        self.inner.lock().0.clone()
    }

    /// Number of full redraws so far
    pub fn renders(&self) -> usize {
        self.inner.lock().1
    }
}

impl ListSurface for HeadlessListSurface {
    fn render(&mut self, entries: &[FavouriteEntryView]) {
        let mut inner = self.inner.lock();
        inner.0 = entries.to_vec();
        inner.1 += 1;
    }
}
