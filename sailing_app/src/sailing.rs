//! Sailing game: components, systems and the state layout

use std::cell::Cell;
use std::rc::Rc;

use sail_engine::prelude::*;

/// Radians per second the sail turns while a trim key is held
pub const TRIM_RATE: f32 = 1.5;

/// Sailing boat driven by the wind
#[derive(Debug, Clone, PartialEq)]
pub struct Boat {
    /// Sail angle in radians, zero along +x
    pub sail_angle: f32,
}

impl Component for Boat {
    const TYPE_ID: &'static str = "boat";
}

/// Wind blowing over the whole lake; lives on a weather entity
#[derive(Debug, Clone, PartialEq)]
pub struct Wind {
    /// Wind speed in units per second
    pub speed: f32,
}

impl Component for Wind {
    const TYPE_ID: &'static str = "wind";
}

/// Controls written by state hooks and read by [`SailingSystem`]
#[derive(Debug, Default)]
pub struct Helm {
    trim: Cell<f32>,
    underway: Cell<bool>,
    exit_requested: Cell<bool>,
}

impl Helm {
    /// Request the sail to turn in `direction` (-1 or 1) this tick
    pub fn trim(&self, direction: f32) {
        self.trim.set((self.trim.get() + direction).clamp(-1.0, 1.0));
    }

    fn take_trim(&self) -> f32 {
        self.trim.replace(0.0)
    }

    /// Whether the game state is current
    pub fn is_underway(&self) -> bool {
        self.underway.get()
    }

    /// Whether the exit state was reached
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.get()
    }
}

/// Turns wind and sail angle into boat velocity
///
/// Boats drift to a stop while the game is not underway (menu, pause).
pub struct SailingSystem {
    boats: Signature,
    weather: Signature,
    helm: Rc<Helm>,
}

impl SailingSystem {
    /// Create a sailing system steered by `helm`
    pub fn new(helm: Rc<Helm>) -> Self {
        Self {
            boats: Signature::of::<(Boat, MovementComponent, TransformComponent)>(),
            weather: Signature::of::<(Wind,)>(),
            helm,
        }
    }
}

impl System for SailingSystem {
    fn name(&self) -> &str {
        "SailingSystem"
    }

    fn signature(&self) -> &Signature {
        &self.boats
    }

    // Velocity must be set before the movement system integrates it
    fn priority(&self) -> i32 {
        -10
    }

    fn update(&mut self, delta_time: f32, world: &mut dyn EntityAccessor) {
        let weather = world.query(&self.weather);
        let wind: f32 = weather
            .iter()
            .filter_map(|&id| world.entity(id))
            .filter(|entity| entity.is_active())
            .filter_map(|entity| entity.get_component::<Wind>())
            .map(|wind| wind.speed)
            .sum();

        let underway = self.helm.is_underway();
        let trim = self.helm.take_trim();

        let boats = world.query(&self.boats);
        for &id in boats.iter() {
            let Some(entity) = world.entity_mut(id) else {
                continue;
            };
            if !entity.is_active() {
                continue;
            }

            let Some(boat) = entity.get_component_mut::<Boat>() else {
                continue;
            };
            if underway {
                boat.sail_angle += trim * TRIM_RATE * delta_time;
            }
            let angle = boat.sail_angle;

            if let Some(transform) = entity.get_component_mut::<TransformComponent>() {
                transform.rotation = angle;
            }
            if let Some(movement) = entity.get_component_mut::<MovementComponent>() {
                movement.velocity = if underway {
                    Vec2::new(angle.cos() * wind, angle.sin() * wind)
                } else {
                    Vec2::zeros()
                };
            }
            log::trace!("Boat {} sail {:.2} rad, wind {:.2}", id, angle, wind);
        }
    }
}

/// States, transitions and input bindings of the game
pub fn state_machine(helm: &Rc<Helm>) -> StateMachineConfig<f32> {
    let trim = Rc::clone(helm);
    let start = Rc::clone(helm);
    let stop = Rc::clone(helm);
    let exit = Rc::clone(helm);

    StateMachineConfig::new("mainMenu")
        .state(
            StateConfig::new("mainMenu")
                .on_enter(|_| log::info!("Press Enter to sail, Escape to quit"))
                .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Enter), "startGame"))
                .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Escape), "exit")),
        )
        .state(
            StateConfig::new("game")
                .on_enter(move |_| start.underway.set(true))
                .on_exit(move |_| stop.underway.set(false))
                .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Escape), "pause"))
                .map_input(InputMapping::new(InputCondition::KeyDown(KeyCode::Left), "trimSail").with_payload(-1.0))
                .map_input(InputMapping::new(InputCondition::KeyDown(KeyCode::Right), "trimSail").with_payload(1.0))
                .on_action(move |action, direction: Option<&f32>| {
                    if action == "trimSail" {
                        trim.trim(direction.copied().unwrap_or(0.0));
                    }
                }),
        )
        .state(
            StateConfig::new("paused")
                .on_enter(|_| log::info!("Paused: Enter resumes, Q quits"))
                .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Enter), "resume"))
                .map_input(InputMapping::new(InputCondition::KeyPressed(KeyCode::Q), "exit")),
        )
        .state(StateConfig::new("exit").on_enter(move |_| exit.exit_requested.set(true)))
        .transition(Transition::new("mainMenu", "game", "startGame"))
        .transition(Transition::new("game", "paused", "pause"))
        .transition(Transition::new("paused", "game", "resume"))
        .transition(Transition::from_any("exit", "exit"))
}

/// Build the engine with a boat at the origin and a steady breeze
pub fn build_engine(config: EngineConfig, wind_speed: f32) -> Result<(Engine<f32>, Rc<Helm>, EntityId), EngineError> {
    let helm = Rc::new(Helm::default());
    let mut engine = Engine::new(config, state_machine(&helm))?;

    let world = engine.world_mut();
    world.register_component::<Boat>()?;
    world.register_component::<Wind>()?;
    world.register_component::<TransformComponent>()?;
    world.register_component::<MovementComponent>()?;

    world.add_system(SailingSystem::new(Rc::clone(&helm)));
    world.add_system(MovementSystem::new());

    world.add_entity(Entity::new().with_tag("weather").with_component(Wind { speed: wind_speed }));
    let boat = world.add_entity(
        Entity::new()
            .with_tag("player")
            .with_component(Boat { sail_angle: 0.0 })
            .with_component(TransformComponent::default())
            .with_component(MovementComponent::new()),
    );

    Ok((engine, helm, boat))
}
