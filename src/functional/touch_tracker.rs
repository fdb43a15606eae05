//! Touch state machine.
//!
//! A field starts `Untouched`. Only a blur (or an elapsed autofill grace
//! period) makes it `Touched`; from then on every change is re-validated.
//! Focus and typing alone never touch a field, so errors do not appear on
//! the first keystroke.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchState {
    #[default]
    Untouched,
    Touched,
}

impl TouchState {
    pub fn is_touched(self) -> bool {
        self == TouchState::Touched
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    Focus,
    Blur,
    Change,
    AutofillElapsed,
}

/// What the owner must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEffect {
    None,
    /// Run the validator on the current value and report the result.
    Validate,
}

/// Pure transition function.
///
/// # Examples
///
/// ```
/// let (state, effect) = transition(TouchState::Untouched, TouchEvent::Change);
/// assert_eq!((state, effect), (TouchState::Untouched, TouchEffect::None));
/// let (state, effect) = transition(state, TouchEvent::Blur);
/// assert_eq!((state, effect), (TouchState::Touched, TouchEffect::Validate));
/// ```
pub fn transition(state: TouchState, event: TouchEvent) -> (TouchState, TouchEffect) {
    match (state, event) {
        (state, TouchEvent::Focus) => (state, TouchEffect::None),
        (_, TouchEvent::Blur) | (_, TouchEvent::AutofillElapsed) => {
            (TouchState::Touched, TouchEffect::Validate)
        }
        (TouchState::Touched, TouchEvent::Change) => (TouchState::Touched, TouchEffect::Validate),
        (TouchState::Untouched, TouchEvent::Change) => (TouchState::Untouched, TouchEffect::None),
    }
}

/// Owns a [`TouchState`] and applies events to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchTracker {
    state: TouchState,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TouchState {
        self.state
    }

    pub fn is_touched(&self) -> bool {
        self.state.is_touched()
    }

    pub fn apply(&mut self, event: TouchEvent) -> TouchEffect {
        let (next, effect) = transition(self.state, event);
        if next != self.state {
            log::trace!("touch {:?} -> {:?} on {:?}", self.state, next, event);
        }
        self.state = next;
        effect
    }
}
