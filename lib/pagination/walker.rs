//! Cursor bookkeeping for a paginated connection view.
//!
//! The walker never talks to the network. It remembers the end cursor of every page that has
//! settled, so stepping back to a page reuses the exact cursor it was first fetched with.

use tracing::debug;

/// Identifies the fetch a response belongs to.
///
/// Taken before a fetch starts and handed back to [`CursorWalker::settle`] once the response
/// arrives, so responses that outlive a [`reset`](CursorWalker::reset) or a page change can be
/// told apart from the one the view is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    generation: u64,
    index: Option<usize>,
}

/// Outcome of [`CursorWalker::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The response is for the page currently shown.
    Current,
    /// Same filter context, different page. The end cursor was kept; the page should not be
    /// displayed.
    Superseded,
    /// The walker was reset after the fetch started. Nothing was recorded.
    Stale,
}

/// Stack of page-boundary cursors plus the position of the page being viewed.
///
/// `cursors[i]` is the end cursor of page `i`, which is the `after` argument of page `i + 1`.
/// `index == None` is the first page, fetched with no cursor.
#[derive(Debug, Clone, Default)]
pub struct CursorWalker {
    cursors: Vec<String>,
    index: Option<usize>,
    generation: u64,
}

impl CursorWalker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The `after` argument for the page at the current index.
    #[must_use]
    pub fn current_cursor(&self) -> Option<&str> {
        self.index
            .and_then(|i| self.cursors.get(i))
            .map(String::as_str)
    }

    /// Record the end cursor of the page at the current index.
    ///
    /// Only the first settle of a page records anything. A refetch of an already visited page
    /// leaves the stack untouched, even if the server hands back a different cursor.
    pub fn on_page_settled(&mut self, end_cursor: Option<&str>) {
        self.record(self.index, end_cursor);
    }

    /// Move to the next page. Returns `false` without moving when the current page has not
    /// settled an end cursor yet.
    pub fn on_next(&mut self) -> bool {
        let next = self.index.map_or(0, |i| i + 1);
        if next >= self.cursors.len() {
            return false;
        }
        self.index = Some(next);
        true
    }

    /// Move to the previous page. Returns `false` on the first page.
    pub fn on_previous(&mut self) -> bool {
        match self.index {
            None => false,
            Some(0) => {
                self.index = None;
                true
            }
            Some(i) => {
                self.index = Some(i - 1);
                true
            }
        }
    }

    /// Forget every cursor and return to the first page.
    ///
    /// Required whenever the filter or sort of the view changes. Outstanding tickets become
    /// stale.
    pub fn reset(&mut self) {
        self.cursors.clear();
        self.index = None;
        self.generation = self.generation.wrapping_add(1);
        debug!(generation = self.generation, "cursor walker reset");
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.index.is_some()
    }

    /// Whether the end cursor of the current page is known, so [`on_next`](Self::on_next)
    /// would succeed.
    #[must_use]
    pub fn has_known_next(&self) -> bool {
        self.index.map_or(0, |i| i + 1) < self.cursors.len()
    }

    /// One-based number of the current page.
    #[must_use]
    pub fn page_number(&self) -> usize {
        self.index.map_or(1, |i| i + 2)
    }

    /// The raw index, with `-1` for the first page.
    #[must_use]
    pub fn index(&self) -> isize {
        self.index
            .and_then(|i| isize::try_from(i).ok())
            .unwrap_or(-1)
    }

    /// Number of recorded cursors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticket for a fetch of the current page.
    #[must_use]
    pub fn ticket(&self) -> PageTicket {
        PageTicket {
            generation: self.generation,
            index: self.index,
        }
    }

    /// Settle the fetch identified by `ticket`.
    ///
    /// Unlike [`on_page_settled`](Self::on_page_settled), this records the cursor against the
    /// page the fetch was issued for rather than the page shown now.
    pub fn settle(&mut self, ticket: PageTicket, end_cursor: Option<&str>) -> Settled {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping response from before reset"
            );
            return Settled::Stale;
        }
        self.record(ticket.index, end_cursor);
        if ticket.index == self.index {
            Settled::Current
        } else {
            Settled::Superseded
        }
    }

    fn record(&mut self, page: Option<usize>, end_cursor: Option<&str>) {
        let Some(end) = end_cursor else {
            return;
        };
        let slot = page.map_or(0, |i| i + 1);
        match self.cursors.get(slot) {
            Some(existing) if existing != end => {
                debug!(slot, kept = %existing, ignored = %end, "page settled again with a different cursor");
            }
            Some(_) => {}
            None if slot == self.cursors.len() => self.cursors.push(end.to_owned()),
            // A page past the frontier settled before its predecessor; its cursor cannot be
            // placed yet.
            None => debug!(slot, len = self.cursors.len(), "ignoring cursor beyond the frontier"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_first_page_without_cursor() {
        let walker = CursorWalker::new();
        assert_eq!(walker.current_cursor(), None);
        assert_eq!(walker.index(), -1);
        assert_eq!(walker.page_number(), 1);
        assert!(!walker.has_previous());
        assert!(!walker.has_known_next());
    }

    #[test]
    fn next_is_refused_until_page_settles() {
        let mut walker = CursorWalker::new();
        assert!(!walker.on_next());
        walker.on_page_settled(Some("A"));
        assert!(walker.on_next());
        assert_eq!(walker.current_cursor(), Some("A"));
        assert!(!walker.on_next());
    }

    #[test]
    fn settle_without_cursor_records_nothing() {
        let mut walker = CursorWalker::new();
        walker.on_page_settled(None);
        assert!(walker.is_empty());
    }

    #[test]
    fn first_cursor_for_a_page_wins() {
        let mut walker = CursorWalker::new();
        walker.on_page_settled(Some("A"));
        walker.on_page_settled(Some("A2"));
        assert_eq!(walker.len(), 1);
        assert!(walker.on_next());
        assert_eq!(walker.current_cursor(), Some("A"));
    }

    #[test]
    fn previous_from_second_page_returns_to_first() {
        let mut walker = CursorWalker::new();
        walker.on_page_settled(Some("A"));
        walker.on_next();
        assert!(walker.on_previous());
        assert_eq!(walker.current_cursor(), None);
        assert!(!walker.on_previous());
    }

    #[test]
    fn superseded_ticket_still_records_cursor() {
        let mut walker = CursorWalker::new();
        let first = walker.ticket();
        walker.on_page_settled(Some("A"));
        walker.on_next();
        let second = walker.ticket();
        walker.on_previous();

        assert_eq!(walker.settle(second, Some("B")), Settled::Superseded);
        assert_eq!(walker.len(), 2);
        assert_eq!(walker.settle(first, Some("A")), Settled::Current);
        assert_eq!(walker.len(), 2);
    }

    #[test]
    fn reset_bumps_generation_and_rejects_old_tickets() {
        let mut walker = CursorWalker::new();
        let ticket = walker.ticket();
        walker.reset();
        assert_eq!(walker.settle(ticket, Some("A")), Settled::Stale);
        assert!(walker.is_empty());
        assert_eq!(walker.generation(), 1);
    }

    #[test]
    fn cursor_beyond_frontier_is_ignored() {
        let mut walker = CursorWalker::new();
        walker.on_page_settled(Some("A"));
        walker.on_next();
        walker.on_page_settled(Some("B"));
        walker.on_next();
        let third = walker.ticket();
        walker.reset();
        walker.on_page_settled(Some("X"));
        walker.on_next();
        let fake = PageTicket {
            generation: walker.generation(),
            ..third
        };
        assert_eq!(walker.settle(fake, Some("C")), Settled::Superseded);
        assert_eq!(walker.len(), 1);
    }
}
