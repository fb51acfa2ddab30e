//! Table-driven state machine shared by the line and inline parsers

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{ParseError, ParseResult};

/// A state of a [`StateMachine`]
pub trait MachineState: Copy + Eq + Hash + Debug {
    /// The machine stops when it reaches a terminal state
    fn is_terminal(self) -> bool;
}

/// Handles one state and names the next one
pub type Handler<S, C> = fn(&mut C) -> ParseResult<S>;

/// Runs handlers over an explicit context until a terminal state is reached
pub struct StateMachine<S, C> {
    start: S,
    handlers: HashMap<S, Handler<S, C>>,
}

impl<S: MachineState, C> StateMachine<S, C> {
    #[must_use]
    pub fn new(start: S) -> Self {
        Self {
            start,
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for `state`
    #[must_use]
    pub fn with_state(mut self, state: S, handler: Handler<S, C>) -> Self {
        self.handlers.insert(state, handler);
        self
    }

    /// Drive `ctx` from the start state to a terminal state
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a handler, or
    /// [`ParseError::UnhandledState`] when a non-terminal state has no handler
    pub fn run(&self, ctx: &mut C) -> ParseResult<()> {
        let mut state = self.start;
        while !state.is_terminal() {
            let handler = self
                .handlers
                .get(&state)
                .ok_or_else(|| ParseError::UnhandledState(format!("{state:?}")))?;
            let next = handler(ctx)?;
            log::trace!("{state:?} -> {next:?}");
            state = next;
        }
        Ok(())
    }
}
