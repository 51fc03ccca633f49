//! State machine configuration
//!
//! Configuration is built in memory and consumed by
//! [`super::StateMachine::new`]; the topology cannot change afterwards.

use std::fmt;

use super::mapping::InputMapping;

/// State identifier
pub type StateId = String;

/// Wildcard transition source matching whichever state is current
pub const ANY_STATE: &str = "*";

/// Hook run on enter/exit with the triggering payload
pub type TransitionHook<P> = Box<dyn FnMut(Option<&P>)>;
/// Hook run once per tick while the state is current
pub type UpdateHook = Box<dyn FnMut(f32)>;
/// Hook notified of every fired input action, before the transition attempt
pub type ActionHook<P> = Box<dyn FnMut(&str, Option<&P>)>;
/// Predicate over the event payload
pub type Guard<P> = Box<dyn Fn(Option<&P>) -> bool>;

/// One state: identifier, optional hooks and input mappings
pub struct StateConfig<P = ()> {
    pub(crate) id: StateId,
    pub(crate) on_enter: Option<TransitionHook<P>>,
    pub(crate) on_exit: Option<TransitionHook<P>>,
    pub(crate) on_update: Option<UpdateHook>,
    pub(crate) on_action: Option<ActionHook<P>>,
    pub(crate) input_mappings: Vec<InputMapping<P>>,
}

impl<P> StateConfig<P> {
    /// State without hooks or mappings
    pub fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            on_enter: None,
            on_exit: None,
            on_update: None,
            on_action: None,
            input_mappings: Vec::new(),
        }
    }

    /// Identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run `hook` when the state becomes current
    #[must_use]
    pub fn on_enter(mut self, hook: impl FnMut(Option<&P>) + 'static) -> Self {
        self.on_enter = Some(Box::new(hook));
        self
    }

    /// Run `hook` when the state stops being current
    #[must_use]
    pub fn on_exit(mut self, hook: impl FnMut(Option<&P>) + 'static) -> Self {
        self.on_exit = Some(Box::new(hook));
        self
    }

    /// Run `hook` every tick while current
    #[must_use]
    pub fn on_update(mut self, hook: impl FnMut(f32) + 'static) -> Self {
        self.on_update = Some(Box::new(hook));
        self
    }

    /// Be told about every action fired by this state's input mappings
    #[must_use]
    pub fn on_action(mut self, hook: impl FnMut(&str, Option<&P>) + 'static) -> Self {
        self.on_action = Some(Box::new(hook));
        self
    }

    /// Append an input mapping; mappings are evaluated in the order added
    #[must_use]
    pub fn map_input(mut self, mapping: InputMapping<P>) -> Self {
        self.input_mappings.push(mapping);
        self
    }

    /// The state's input mappings
    pub fn input_mappings(&self) -> &[InputMapping<P>] {
        &self.input_mappings
    }
}

impl<P> fmt::Debug for StateConfig<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateConfig")
            .field("id", &self.id)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_action", &self.on_action.is_some())
            .field("input_mappings", &self.input_mappings.len())
            .finish()
    }
}

/// Where a transition may start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionSource {
    /// Whatever state is current
    Any,
    /// One specific state
    State(StateId),
}

impl TransitionSource {
    /// Parse a source identifier, treating [`ANY_STATE`] as the wildcard
    pub fn parse(id: impl Into<StateId>) -> Self {
        let id = id.into();
        if id == ANY_STATE {
            TransitionSource::Any
        } else {
            TransitionSource::State(id)
        }
    }
}

impl fmt::Display for TransitionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionSource::Any => f.write_str(ANY_STATE),
            TransitionSource::State(id) => f.write_str(id),
        }
    }
}

/// Event-driven edge between two states
pub struct Transition<P = ()> {
    pub(crate) from: TransitionSource,
    pub(crate) to: StateId,
    pub(crate) event: String,
    pub(crate) guard: Option<Guard<P>>,
}

impl<P> Transition<P> {
    /// Transition from `from` (or [`ANY_STATE`]) to `to` on `event`
    pub fn new(from: impl Into<StateId>, to: impl Into<StateId>, event: impl Into<String>) -> Self {
        Self {
            from: TransitionSource::parse(from),
            to: to.into(),
            event: event.into(),
            guard: None,
        }
    }

    /// Transition from any state to `to` on `event`
    pub fn from_any(to: impl Into<StateId>, event: impl Into<String>) -> Self {
        Self::new(ANY_STATE, to, event)
    }

    /// Only take the transition when `guard` accepts the payload
    #[must_use]
    pub fn with_guard(mut self, guard: impl Fn(Option<&P>) -> bool + 'static) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    /// Source state
    pub fn source(&self) -> &TransitionSource {
        &self.from
    }

    /// Target state
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Triggering event
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Guard passes (or there is none)
    pub(crate) fn accepts(&self, payload: Option<&P>) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard(payload))
    }
}

impl<P> fmt::Debug for Transition<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("event", &self.event)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Everything needed to build a state machine
#[derive(Debug)]
pub struct StateMachineConfig<P = ()> {
    /// State entered at construction
    pub initial_state: StateId,
    /// State definitions
    pub states: Vec<StateConfig<P>>,
    /// Transitions, matched in this order
    pub transitions: Vec<Transition<P>>,
}

impl<P> StateMachineConfig<P> {
    /// Empty configuration starting in `initial_state`
    pub fn new(initial_state: impl Into<StateId>) -> Self {
        Self {
            initial_state: initial_state.into(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Add a state
    #[must_use]
    pub fn state(mut self, state: StateConfig<P>) -> Self {
        self.states.push(state);
        self
    }

    /// Add a transition
    #[must_use]
    pub fn transition(mut self, transition: Transition<P>) -> Self {
        self.transitions.push(transition);
        self
    }
}
