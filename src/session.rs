//! Interactive session over a single board
//!
//! Keeps cards and the favourites list attached between commands so that
//! bookmark notifications travel between them the way they do on a page.

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use supercards_core::{Board, BookmarkEvent, CardId, Catalogue, Subscription};

pub const HELP: &str = "\
Commands:
  deal            Deal a new spread of cards
  cards           Show the dealt cards
  toggle <id>     Bookmark or un-bookmark a dealt card
  flip <id>       Turn a dealt card over
  favs            Open the favourites list
  delete <id>     Delete an entry from the favourites list
  close           Close the favourites list
  help            Show this help
  quit            Leave the session";

/// Whether the session should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    board: Board,
    catalogue: Catalogue,
    rng: StdRng,
    mission_count: usize,
    notices: Arc<Mutex<Vec<String>>>,
    _subscription: Subscription,
}

impl Session {
    pub fn new(board: Board, catalogue: Catalogue, rng: StdRng, mission_count: usize) -> Self {
        let notices = Arc::new(Mutex::new(Vec::new()));
        let subscription = {
            let notices = notices.clone();
            board
                .bus()
                .subscribe(move |event: &BookmarkEvent| notices.lock().push(describe(event)))
        };

        Self {
            board,
            catalogue,
            rng,
            mission_count,
            notices,
            _subscription: subscription,
        }
    }

    #[cfg(test)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run one input line, writing its output and any notifications it caused
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Flow::Continue);
        };
        let arg = words.next();

        match (command, arg) {
            ("help", _) => writeln!(out, "{}", HELP)?,
            ("quit" | "exit", _) => return Ok(Flow::Quit),
            ("deal", _) => {
                let spread = self.catalogue.deal(&mut self.rng, self.mission_count);
                self.board.show(&spread);
                self.print_cards(out)?;
            }
            ("cards", _) => self.print_cards(out)?,
            ("toggle", Some(id)) => {
                let id = CardId::from(id);
                self.board.toggle(&id)?;
                self.print_card(&id, out)?;
            }
            ("flip", Some(id)) => {
                let id = CardId::from(id);
                self.board.flip(&id)?;
                self.print_card(&id, out)?;
            }
            ("favs" | "favourites", _) => {
                self.board.open_favourites();
                self.print_favourites(out)?;
            }
            ("delete", Some(id)) => {
                let id = CardId::from(id);
                if self.board.delete_favourite(&id) {
                    writeln!(out, "Deleted {}", id)?;
                } else {
                    writeln!(out, "{} is not in favourites", id)?;
                }
                self.print_favourites(out)?;
            }
            ("close", _) => {
                self.board.close_favourites();
                writeln!(out, "Favourites closed")?;
            }
            ("toggle" | "flip" | "delete", None) => bail!("'{}' needs a card id", command),
            _ => bail!("Unknown command '{}'. Type 'help' for commands.", command),
        }

        self.flush_notices(out)?;
        Ok(Flow::Continue)
    }

    fn print_cards(&self, out: &mut impl Write) -> Result<()> {
        if self.board.cards().is_empty() {
            writeln!(out, "No cards dealt.")?;
        }
        for mounted in self.board.cards() {
            writeln!(out, "{}", mounted.view())?;
        }
        Ok(())
    }

    fn print_card(&self, id: &CardId, out: &mut impl Write) -> Result<()> {
        if let Some(mounted) = self.board.card(id) {
            writeln!(out, "{}", mounted.view())?;
        }
        Ok(())
    }

    fn print_favourites(&self, out: &mut impl Write) -> Result<()> {
        print_entries(&self.board, out)
    }

    fn flush_notices(&self, out: &mut impl Write) -> Result<()> {
        for notice in self.notices.lock().drain(..) {
            writeln!(out, "{}", notice)?;
        }
        Ok(())
    }
}

/// Favourites as the list would draw them
pub fn print_entries(board: &Board, out: &mut impl Write) -> Result<()> {
    let entries = board.favourite_entries();
    if entries.is_empty() {
        writeln!(out, "No favourites yet.")?;
        return Ok(());
    }

    writeln!(out, "Favourites ({}):", entries.len())?;
    for entry in entries {
        writeln!(out, "  [{}] {}", entry.id(), entry)?;
    }
    Ok(())
}

fn describe(event: &BookmarkEvent) -> String {
    match event {
        BookmarkEvent::Changed(snapshot) => format!(
            "* {} {}",
            snapshot.id,
            if snapshot.bookmarked {
                "bookmarked"
            } else {
                "unbookmarked"
            }
        ),
        BookmarkEvent::Unfavourited { card_id } => {
            format!("* {} removed from favourites", card_id)
        }
    }
}
