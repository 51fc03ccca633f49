//! State machine runtime

use std::collections::HashMap;
use std::fmt;

use super::config::{StateConfig, StateMachineConfig, Transition, TransitionSource};
use super::error::StateMachineError;
use crate::input::InputSnapshot;

/// Transition with its source and target resolved to state indices
struct Edge<P> {
    /// `None` means wildcard
    from: Option<usize>,
    to: usize,
    transition: Transition<P>,
}

impl<P> Edge<P> {
    fn matches(&self, current: usize, event: &str, payload: Option<&P>) -> bool {
        self.from.map_or(true, |from| from == current)
            && self.transition.event == event
            && self.transition.accepts(payload)
    }
}

/// Finite automaton gating input handling and per-tick updates
///
/// Exactly one state is current at any time; the initial state is entered
/// (its enter hook runs with no payload) during [`StateMachine::new`].
pub struct StateMachine<P = ()> {
    states: Vec<StateConfig<P>>,
    index: HashMap<String, usize>,
    edges: Vec<Edge<P>>,
    current: usize,
}

impl<P> StateMachine<P> {
    /// Build a machine and enter the initial state
    ///
    /// Fails if the initial state or any transition target is undefined, or
    /// if a state identifier is used twice.
    pub fn new(config: StateMachineConfig<P>) -> Result<Self, StateMachineError> {
        let StateMachineConfig { initial_state, states, transitions } = config;

        let mut index = HashMap::with_capacity(states.len());
        for (position, state) in states.iter().enumerate() {
            if index.insert(state.id.clone(), position).is_some() {
                return Err(StateMachineError::DuplicateState(state.id.clone()));
            }
        }

        let initial = *index
            .get(&initial_state)
            .ok_or_else(|| StateMachineError::UnknownInitialState(initial_state.clone()))?;

        let mut edges = Vec::with_capacity(transitions.len());
        for transition in transitions {
            let to = *index.get(&transition.to).ok_or_else(|| StateMachineError::UnknownTarget {
                event: transition.event.clone(),
                target: transition.to.clone(),
            })?;
            let from = match &transition.from {
                TransitionSource::Any => None,
                TransitionSource::State(id) => match index.get(id) {
                    Some(&position) => Some(position),
                    None => {
                        log::warn!(
                            "Transition '{}' starts from unknown state '{}' and can never fire",
                            transition.event, id
                        );
                        continue;
                    }
                },
            };
            edges.push(Edge { from, to, transition });
        }

        let mut machine = Self {
            states,
            index,
            edges,
            current: initial,
        };
        log::debug!("State machine starting in '{}'", machine.current_state());
        if let Some(enter) = machine.states[initial].on_enter.as_mut() {
            enter(None);
        }
        Ok(machine)
    }

    /// Fire `event`; returns whether a transition was taken
    ///
    /// Transitions are scanned in registration order and the first one whose
    /// source, event and guard all match wins.
    pub fn trigger(&mut self, event: &str, payload: Option<&P>) -> bool {
        let current = self.current;
        let Some(target) = self
            .edges
            .iter()
            .find(|edge| edge.matches(current, event, payload))
            .map(|edge| edge.to)
        else {
            log::trace!("No transition for '{}' from '{}'", event, self.current_state());
            return false;
        };

        self.change_state(target, event, payload);
        true
    }

    /// Whether [`StateMachine::trigger`] would take a transition, without taking it
    pub fn can_trigger(&self, event: &str, payload: Option<&P>) -> bool {
        self.edges.iter().any(|edge| edge.matches(self.current, event, payload))
    }

    fn change_state(&mut self, target: usize, event: &str, payload: Option<&P>) {
        let source = self.current;
        if let Some(exit) = self.states[source].on_exit.as_mut() {
            exit(payload);
        }

        self.current = target;
        log::debug!(
            "State '{}' --{}--> '{}'",
            self.states[source].id, event, self.states[target].id
        );

        if let Some(enter) = self.states[target].on_enter.as_mut() {
            enter(payload);
        }
    }

    /// Evaluate the current state's input mappings against `input`
    ///
    /// The mapping list is the one of the state that was current when the
    /// call began. Every mapping in it is evaluated in order, even after an
    /// earlier one changed state; for each that fires, the action hook of
    /// that same state runs first, then [`StateMachine::trigger`] is
    /// attempted. Returns the number of transitions taken.
    pub fn process_input(&mut self, input: &dyn InputSnapshot) -> usize {
        let source = self.current;
        let mappings = std::mem::take(&mut self.states[source].input_mappings);

        let mut fired = 0;
        for mapping in &mappings {
            if !mapping.is_triggered(input) {
                continue;
            }
            if let Some(hook) = self.states[source].on_action.as_mut() {
                hook(mapping.action(), mapping.payload());
            }
            if self.trigger(mapping.action(), mapping.payload()) {
                fired += 1;
            }
        }

        self.states[source].input_mappings = mappings;
        fired
    }

    /// Run the current state's update hook
    pub fn update(&mut self, delta_time: f32) {
        if let Some(update) = self.states[self.current].on_update.as_mut() {
            update(delta_time);
        }
    }

    /// Identifier of the current state
    pub fn current_state(&self) -> &str {
        &self.states[self.current].id
    }

    /// Whether `id` is the current state
    pub fn is_in(&self, id: &str) -> bool {
        self.current_state() == id
    }

    /// Whether `id` names a configured state
    pub fn has_state(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All state identifiers in configuration order
    pub fn state_ids(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|state| state.id.as_str())
    }

    /// Events with at least one transition leaving the current state, in registration order
    pub fn available_events(&self) -> Vec<&str> {
        let mut events: Vec<&str> = Vec::new();
        for edge in &self.edges {
            let event = edge.transition.event.as_str();
            if edge.from.map_or(true, |from| from == self.current) && !events.contains(&event) {
                events.push(event);
            }
        }
        events
    }

    /// Number of transitions that can fire
    pub fn transition_count(&self) -> usize {
        self.edges.len()
    }
}

impl<P> fmt::Debug for StateMachine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_state())
            .field("states", &self.states.len())
            .field("transitions", &self.edges.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputState, KeyCode};
    use crate::state::{InputCondition, InputMapping, StateConfig, Transition};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Journal = Rc<RefCell<Vec<String>>>;

    fn journaled(id: &'static str, journal: &Journal) -> StateConfig {
        let enter = Rc::clone(journal);
        let exit = Rc::clone(journal);
        StateConfig::new(id)
            .on_enter(move |_| enter.borrow_mut().push(format!("enter {id}")))
            .on_exit(move |_| exit.borrow_mut().push(format!("exit {id}")))
    }

    fn abc() -> StateMachineConfig {
        StateMachineConfig::new("A")
            .state(StateConfig::new("A"))
            .state(StateConfig::new("B"))
            .state(StateConfig::new("C"))
    }

    #[test]
    fn test_simple_transition() {
        let mut machine = StateMachine::new(abc().transition(Transition::new("A", "B", "go"))).unwrap();
        assert_eq!(machine.current_state(), "A");
        assert!(machine.trigger("go", None));
        assert_eq!(machine.current_state(), "B");
        assert!(!machine.trigger("go", None));
        assert_eq!(machine.current_state(), "B");
    }

    #[test]
    fn test_wildcard_transition_from_every_state() {
        let config = abc()
            .transition(Transition::new("A", "B", "go"))
            .transition(Transition::from_any("C", "abort"));

        let mut from_a = StateMachine::new(config).unwrap();
        assert!(from_a.trigger("abort", None));
        assert!(from_a.is_in("C"));
        // Self-loop through the wildcard
        assert!(from_a.trigger("abort", None));
        assert!(from_a.is_in("C"));

        let config = abc()
            .transition(Transition::new("A", "B", "go"))
            .transition(Transition::from_any("C", "abort"));
        let mut from_b = StateMachine::new(config).unwrap();
        from_b.trigger("go", None);
        assert!(from_b.trigger("abort", None));
        assert!(from_b.is_in("C"));
    }

    #[derive(Debug)]
    struct Check {
        ok: bool,
    }

    #[test]
    fn test_guarded_transition() {
        let config = StateMachineConfig::<Check>::new("A")
            .state(StateConfig::new("A"))
            .state(StateConfig::new("B"))
            .transition(Transition::new("A", "B", "go").with_guard(|payload: Option<&Check>| {
                payload.is_some_and(|check| check.ok)
            }));
        let mut machine = StateMachine::new(config).unwrap();

        assert!(!machine.can_trigger("go", Some(&Check { ok: false })));
        assert!(!machine.trigger("go", Some(&Check { ok: false })));
        assert!(!machine.trigger("go", None));
        assert!(machine.is_in("A"));

        assert!(machine.can_trigger("go", Some(&Check { ok: true })));
        assert!(machine.trigger("go", Some(&Check { ok: true })));
        assert!(machine.is_in("B"));
    }

    #[test]
    fn test_first_matching_transition_wins() {
        let config = StateMachineConfig::<u32>::new("A")
            .state(StateConfig::new("A"))
            .state(StateConfig::new("B"))
            .state(StateConfig::new("C"))
            .transition(Transition::new("A", "B", "go").with_guard(|n: Option<&u32>| n == Some(&1)))
            .transition(Transition::new("A", "C", "go"))
            .transition(Transition::new("A", "B", "go"));

        let mut machine = StateMachine::new(config).unwrap();
        machine.trigger("go", Some(&2));
        assert!(machine.is_in("C"));
    }

    #[test]
    fn test_hooks_run_in_order_with_payload() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let config = StateMachineConfig::new("A")
            .state(journaled("A", &journal))
            .state(journaled("B", &journal))
            .transition(Transition::new("A", "B", "go"));

        let mut machine = StateMachine::new(config).unwrap();
        assert_eq!(*journal.borrow(), vec!["enter A"]);

        machine.trigger("go", None);
        assert_eq!(*journal.borrow(), vec!["enter A", "exit A", "enter B"]);
    }

    #[test]
    fn test_payload_reaches_hooks() {
        let seen: Rc<RefCell<Vec<Option<u32>>>> = Rc::new(RefCell::new(Vec::new()));
        let on_exit = Rc::clone(&seen);
        let on_enter = Rc::clone(&seen);
        let config = StateMachineConfig::<u32>::new("dock")
            .state(StateConfig::<u32>::new("dock").on_exit(move |heading| on_exit.borrow_mut().push(heading.copied())))
            .state(StateConfig::<u32>::new("sea").on_enter(move |heading| on_enter.borrow_mut().push(heading.copied())))
            .transition(Transition::new("dock", "sea", "castOff"));

        let mut machine = StateMachine::new(config).unwrap();
        assert!(machine.trigger("castOff", Some(&270)));
        assert_eq!(*seen.borrow(), vec![Some(270), Some(270)]);
    }

    #[test]
    fn test_update_runs_only_current_state_hook() {
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let a_ticks = Rc::clone(&ticks);
        let b_ticks = Rc::clone(&ticks);
        let config = StateMachineConfig::<()>::new("A")
            .state(StateConfig::new("A").on_update(move |dt| a_ticks.borrow_mut().push(("A", dt))))
            .state(StateConfig::new("B").on_update(move |dt| b_ticks.borrow_mut().push(("B", dt))))
            .transition(Transition::new("A", "B", "go"));

        let mut machine = StateMachine::new(config).unwrap();
        machine.update(0.5);
        machine.trigger("go", None);
        machine.update(0.25);
        assert!(machine.is_in("B"));
        assert_eq!(*ticks.borrow(), vec![("A", 0.5), ("B", 0.25)]);
    }

    #[test]
    fn test_unknown_initial_state_is_fatal() {
        let err = StateMachine::new(abc_with_initial("Z")).unwrap_err();
        assert_eq!(err, StateMachineError::UnknownInitialState("Z".to_string()));
        assert!(err.to_string().contains("'Z'"));
    }

    fn abc_with_initial(initial: &str) -> StateMachineConfig {
        let mut config = abc();
        config.initial_state = initial.to_string();
        config
    }

    #[test]
    fn test_unknown_target_is_fatal() {
        let err = StateMachine::new(abc().transition(Transition::new("A", "Nowhere", "go"))).unwrap_err();
        assert_eq!(
            err,
            StateMachineError::UnknownTarget { event: "go".to_string(), target: "Nowhere".to_string() }
        );
    }

    #[test]
    fn test_duplicate_state_is_fatal() {
        let err = StateMachine::new(abc().state(StateConfig::new("B"))).unwrap_err();
        assert_eq!(err, StateMachineError::DuplicateState("B".to_string()));
    }

    #[test]
    fn test_transition_from_unknown_source_is_dropped() {
        let machine = StateMachine::new(
            abc()
                .transition(Transition::new("Ghost", "B", "go"))
                .transition(Transition::new("A", "B", "go")),
        )
        .unwrap();
        assert_eq!(machine.transition_count(), 1);
    }

    #[test]
    fn test_available_events() {
        let machine = StateMachine::new(
            abc()
                .transition(Transition::new("A", "B", "go"))
                .transition(Transition::new("B", "C", "stop"))
                .transition(Transition::new("A", "C", "go"))
                .transition(Transition::from_any("A", "reset")),
        )
        .unwrap();
        assert_eq!(machine.available_events(), vec!["go", "reset"]);
        assert_eq!(machine.state_ids().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_input_mapping_starts_game() {
        let config = StateMachineConfig::<()>::new("mainMenu")
            .state(
                StateConfig::new("mainMenu")
                    .map_input(InputMapping::new(InputCondition::KeyDown(KeyCode::Enter), "startGame")),
            )
            .state(StateConfig::new("game"))
            .transition(Transition::new("mainMenu", "game", "startGame"));
        let mut machine = StateMachine::new(config).unwrap();

        let idle = InputState::new();
        assert_eq!(machine.process_input(&idle), 0);
        assert!(machine.is_in("mainMenu"));

        let mut input = InputState::new();
        input.key_down(KeyCode::Enter);
        assert_eq!(machine.process_input(&input), 1);
        assert!(machine.is_in("game"));
    }

    #[test]
    fn test_action_hook_runs_before_transition_even_without_one() {
        let actions = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&actions);
        let config = StateMachineConfig::<f32>::new("game")
            .state(
                StateConfig::new("game")
                    .map_input(
                        InputMapping::new(InputCondition::KeyDown(KeyCode::Left), "trimSail").with_payload(-1.0),
                    )
                    .on_action(move |action, payload: Option<&f32>| {
                        recorder.borrow_mut().push((action.to_string(), payload.copied()));
                    }),
            );
        let mut machine = StateMachine::new(config).unwrap();

        let mut input = InputState::new();
        input.key_down(KeyCode::Left);
        assert_eq!(machine.process_input(&input), 0);
        assert_eq!(*actions.borrow(), vec![("trimSail".to_string(), Some(-1.0))]);
    }

    // Mappings captured at the start of the scan keep firing after an
    // earlier mapping moved the machine to another state.
    #[test]
    fn test_all_mappings_of_starting_state_are_evaluated() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let actions = Rc::clone(&journal);
        let config = StateMachineConfig::<()>::new("menu")
            .state(
                StateConfig::new("menu")
                    .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Enter), "start"))
                    .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Escape), "quit"))
                    .on_action(move |action, _| actions.borrow_mut().push(format!("action {action}"))),
            )
            .state(StateConfig::new("game").map_input(InputMapping::new(
                InputCondition::KeyPressed(KeyCode::Escape),
                "pause",
            )))
            .state(StateConfig::new("paused"))
            .state(StateConfig::new("exit"))
            .transition(Transition::new("menu", "game", "start"))
            .transition(Transition::new("game", "paused", "pause"))
            .transition(Transition::from_any("exit", "quit"));
        let mut machine = StateMachine::new(config).unwrap();

        let mut input = InputState::new();
        input.key_down(KeyCode::Enter);
        input.key_down(KeyCode::Escape);

        // "start" moves to game; "quit" still comes from the menu list and
        // matches the wildcard; game's own "pause" mapping is never consulted
        assert_eq!(machine.process_input(&input), 2);
        assert!(machine.is_in("exit"));
        assert_eq!(*journal.borrow(), vec!["action start", "action quit"]);
    }
}
