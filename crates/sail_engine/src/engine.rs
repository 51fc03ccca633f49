//! Core engine implementation

use crate::{
    core::{ConfigError, EngineConfig},
    ecs::{EcsError, World},
    foundation::time::FrameClock,
    input::InputState,
    state::{StateMachine, StateMachineConfig, StateMachineError},
};
use thiserror::Error;

/// Main engine struct
///
/// The engine owns one world, one state machine and one input snapshot and
/// runs the per-tick control flow: input processing, state update, system
/// scheduling. It does not own the display loop; a driver calls
/// [`Engine::frame`] with timestamps or [`Engine::tick`] with deltas.
pub struct Engine<P = ()> {
    /// ECS world containing all entities, components, and systems
    world: World,

    /// Gates input handling and per-tick update hooks
    state_machine: StateMachine<P>,

    /// Input snapshot for the current tick
    input: InputState,

    /// Frame timing
    clock: FrameClock,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,

    /// Ticks executed so far
    frame_count: u64,
}

impl<P> Engine<P> {
    /// Create a new engine instance
    ///
    /// The state machine enters its initial state here.
    pub fn new(config: EngineConfig, machine: StateMachineConfig<P>) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        let state_machine = StateMachine::new(machine)?;
        let clock = FrameClock::new(config.simulation.max_delta);

        log::info!("Engine ready in state '{}'", state_machine.current_state());
        Ok(Self {
            world: World::new(),
            state_machine,
            input: InputState::new(),
            clock,
            config,
            running: true,
            frame_count: 0,
        })
    }

    /// Run one tick with an explicit elapsed time
    pub fn tick(&mut self, delta_time: f32) {
        let delta_time = delta_time.max(0.0);

        let fired = self.state_machine.process_input(&self.input);
        if fired > 0 {
            log::debug!("Input fired {} transition(s), now in '{}'", fired, self.state_machine.current_state());
        }
        self.state_machine.update(delta_time);
        self.world.update(delta_time);
        self.input.end_frame();

        self.frame_count += 1;
    }

    /// Run one tick from a display timestamp in seconds
    ///
    /// The delta is derived by the frame clock (zero on the first frame,
    /// clamped to the configured maximum). Returns the delta used.
    pub fn frame(&mut self, timestamp: f64) -> f32 {
        let delta_time = self.clock.advance(timestamp);
        self.tick(delta_time);
        delta_time
    }

    /// Run up to `frames` ticks at the fixed timestep, stopping early on [`Engine::quit`]
    ///
    /// Returns the number of ticks run.
    pub fn run_fixed(&mut self, frames: u32) -> u32 {
        let step = self.config.simulation.fixed_timestep;
        log::info!("Running {} fixed steps of {:.4}s", frames, step);

        let mut ran = 0;
        while ran < frames && self.running {
            self.tick(step);
            ran += 1;
        }
        ran
    }

    /// Fire a state machine event outside of input processing
    pub fn trigger_state_event(&mut self, event: &str, payload: Option<&P>) -> bool {
        self.state_machine.trigger(event, payload)
    }

    /// Identifier of the current state
    pub fn current_state(&self) -> &str {
        self.state_machine.current_state()
    }

    /// Get the state machine
    pub fn state_machine(&self) -> &StateMachine<P> {
        &self.state_machine
    }

    /// Get the ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get the input snapshot
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Get mutable access to the input snapshot, for the platform layer to feed
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the driver should keep ticking
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks executed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// State machine configuration is invalid
    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// ECS setup failed
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SimulationConfig;
    use crate::ecs::components::{MovementComponent, TransformComponent, Vec2};
    use crate::ecs::systems::MovementSystem;
    use crate::ecs::{Entity, EntityAccessor, Signature, System};
    use crate::input::{InputSnapshot, KeyCode};
    use crate::state::{InputCondition, InputMapping, StateConfig, Transition};
    use approx::assert_relative_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn menu_and_game() -> StateMachineConfig {
        StateMachineConfig::new("mainMenu")
            .state(
                StateConfig::new("mainMenu")
                    .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Enter), "startGame")),
            )
            .state(StateConfig::new("game"))
            .transition(Transition::new("mainMenu", "game", "startGame"))
    }

    #[test]
    fn test_tick_processes_input_then_clears_it() {
        let mut engine = Engine::new(EngineConfig::default(), menu_and_game()).unwrap();
        assert_eq!(engine.current_state(), "mainMenu");

        engine.input_mut().key_down(KeyCode::Enter);
        engine.tick(0.016);
        assert_eq!(engine.current_state(), "game");
        assert!(!engine.input().is_key_pressed(KeyCode::Enter));
        assert!(engine.input().is_key_down(KeyCode::Enter));
        assert_eq!(engine.frame_count(), 1);
    }

    type Journal = Rc<RefCell<Vec<&'static str>>>;

    /// Writes to the journal every time the world runs it
    struct Recorder {
        signature: Signature,
        journal: Journal,
    }

    impl System for Recorder {
        fn signature(&self) -> &Signature {
            &self.signature
        }

        fn update(&mut self, _delta_time: f32, _world: &mut dyn EntityAccessor) {
            self.journal.borrow_mut().push("system");
        }
    }

    #[test]
    fn test_tick_order_is_input_then_state_then_systems() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let on_action = Rc::clone(&journal);
        let on_update = Rc::clone(&journal);
        let config = StateMachineConfig::<()>::new("game").state(
            StateConfig::new("game")
                .map_input(InputMapping::new(InputCondition::KeyDown(KeyCode::Space), "fire"))
                .on_action(move |_, _| on_action.borrow_mut().push("input"))
                .on_update(move |_| on_update.borrow_mut().push("state")),
        );

        let mut engine = Engine::new(EngineConfig::default(), config).unwrap();
        engine.world_mut().add_system(Recorder { signature: Signature::empty(), journal: Rc::clone(&journal) });
        engine.input_mut().key_down(KeyCode::Space);

        engine.tick(0.016);
        engine.tick(0.016);
        assert_eq!(*journal.borrow(), vec!["input", "state", "system", "input", "state", "system"]);
    }

    #[test]
    fn test_tick_advances_state_and_systems() {
        let elapsed = Rc::new(Cell::new(0.0_f32));
        let counter = Rc::clone(&elapsed);
        let config = StateMachineConfig::<()>::new("game")
            .state(StateConfig::new("game").on_update(move |dt| counter.set(counter.get() + dt)));

        let mut engine = Engine::new(EngineConfig::default(), config).unwrap();
        let boat = engine.world_mut().add_entity(
            Entity::new()
                .with_component(TransformComponent::default())
                .with_component(MovementComponent::with_velocity(Vec2::new(2.0, 0.0))),
        );
        engine.world_mut().add_system(MovementSystem::new());

        engine.tick(0.5);
        engine.tick(0.5);

        assert_relative_eq!(elapsed.get(), 1.0);
        let transform = engine.world().entity(boat).unwrap().get_component::<TransformComponent>().unwrap();
        assert_relative_eq!(transform.position.x, 2.0);
    }

    #[test]
    fn test_frame_uses_clamped_clock() {
        let mut engine = Engine::new(EngineConfig::default(), menu_and_game()).unwrap();
        assert_eq!(engine.frame(10.0), 0.0);
        assert_relative_eq!(engine.frame(10.1), 0.1, epsilon = 1e-5);
        assert_relative_eq!(engine.frame(20.0), 0.25);
        assert_eq!(engine.frame_count(), 3);
    }

    #[test]
    fn test_run_fixed_stops_when_quit() {
        let mut engine = Engine::new(EngineConfig::default(), menu_and_game()).unwrap();
        assert_eq!(engine.run_fixed(5), 5);
        engine.quit();
        assert!(!engine.is_running());
        assert_eq!(engine.run_fixed(5), 0);
        assert_eq!(engine.frame_count(), 5);
    }

    #[test]
    fn test_trigger_state_event() {
        let mut engine = Engine::new(EngineConfig::default(), menu_and_game()).unwrap();
        assert!(!engine.trigger_state_event("pause", None));
        assert!(engine.trigger_state_event("startGame", None));
        assert_eq!(engine.current_state(), "game");
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let config = EngineConfig {
            simulation: SimulationConfig { fixed_timestep: 0.0, ..SimulationConfig::default() },
            ..EngineConfig::default()
        };
        assert!(matches!(Engine::new(config, menu_and_game()), Err(EngineError::Config(_))));

        let machine = StateMachineConfig::<()>::new("nowhere").state(StateConfig::new("somewhere"));
        let err = Engine::new(EngineConfig::default(), machine).err().unwrap();
        assert!(matches!(err, EngineError::StateMachine(StateMachineError::UnknownInitialState(_))));
        assert!(err.to_string().contains("nowhere"));
    }
}
