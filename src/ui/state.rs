use crate::net::wish::WishResponse;

/// Overlay state machine.
///
/// ```text
/// Idle ──click──▶ Loading ──resolve──▶ Showing(wish)
///  ▲                 ▲                     │  │
///  └─────close───────┼─────────────────────┘  │
///                    └────────click───────────┘
/// ```
///
/// `resolve` is accepted in every state: the most recently resolved wish is
/// the one shown, whichever click started it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Idle,
    Loading,
    Showing(WishResponse),
}

/// What the overlay should draw for the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayView<'a> {
    Instructions,
    Spinner,
    WishCard { message: &'a str, author: &'a str },
}

pub const INSTRUCTIONS: &str = "TOUCH AN ORNAMENT FOR MAGIC";
pub const LOADING_TEXT: &str = "Summoning Holiday Spirit...";

impl OverlayState {
    /// An ornament was activated: start loading and drop any shown wish.
    pub fn click(&mut self) {
        *self = OverlayState::Loading;
    }

    /// A wish arrived.
    pub fn resolve(&mut self, wish: WishResponse) {
        *self = OverlayState::Showing(wish);
    }

    /// The wish card was closed. Only meaningful while showing.
    pub fn close(&mut self) {
        if let OverlayState::Showing(_) = self {
            *self = OverlayState::Idle;
        }
    }

    pub fn loading(&self) -> bool {
        matches!(self, OverlayState::Loading)
    }

    pub fn current_wish(&self) -> Option<&WishResponse> {
        match self {
            OverlayState::Showing(wish) => Some(wish),
            _ => None,
        }
    }

    pub fn view(&self) -> OverlayView<'_> {
        match self {
            OverlayState::Idle => OverlayView::Instructions,
            OverlayState::Loading => OverlayView::Spinner,
            OverlayState::Showing(wish) => OverlayView::WishCard {
                message: &wish.message,
                author: &wish.author,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wish(text: &str) -> WishResponse {
        WishResponse::new(text, "Elf")
    }

    #[test]
    fn starts_idle_with_instructions() {
        let state = OverlayState::default();
        assert_eq!(state, OverlayState::Idle);
        assert_eq!(state.view(), OverlayView::Instructions);
        assert!(!state.loading());
        assert!(state.current_wish().is_none());
    }

    #[test]
    fn click_resolve_close_cycle() {
        let mut state = OverlayState::default();
        state.click();
        assert!(state.loading());
        assert_eq!(state.view(), OverlayView::Spinner);

        state.resolve(wish("joy"));
        assert!(!state.loading());
        assert_eq!(
            state.view(),
            OverlayView::WishCard {
                message: "joy",
                author: "Elf"
            }
        );

        state.close();
        assert_eq!(state, OverlayState::Idle);
        assert!(state.current_wish().is_none());
        assert_eq!(state.view(), OverlayView::Instructions);
    }

    #[test]
    fn click_while_showing_clears_wish() {
        let mut state = OverlayState::Showing(wish("old"));
        state.click();
        assert!(state.loading());
        assert!(state.current_wish().is_none());
    }

    #[test]
    fn close_is_ignored_unless_showing() {
        let mut state = OverlayState::Loading;
        state.close();
        assert_eq!(state, OverlayState::Loading);
        let mut state = OverlayState::Idle;
        state.close();
        assert_eq!(state, OverlayState::Idle);
    }

    #[test]
    fn last_resolved_wins() {
        let mut state = OverlayState::default();
        state.click();
        state.click();
        state.resolve(wish("second click"));
        state.resolve(wish("first click"));
        assert_eq!(state.current_wish().map(|w| w.message.as_str()), Some("first click"));
    }

    #[test]
    fn loading_and_wish_are_exclusive() {
        let states = [
            OverlayState::Idle,
            OverlayState::Loading,
            OverlayState::Showing(wish("x")),
        ];
        for s in states {
            assert!(!(s.loading() && s.current_wish().is_some()));
        }
    }
}
