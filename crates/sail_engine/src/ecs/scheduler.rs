//! System scheduling
//!
//! Systems run sequentially in ascending priority. Equal priorities keep
//! registration order, and the ordering is recomputed lazily the first
//! time the scheduler runs after a registration or priority change.

use super::error::EcsError;
use super::system::{EntityAccessor, System};

/// Unique identifier for registered systems, increasing in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub u64);

struct SystemEntry {
    id: SystemId,
    priority: i32,
    system: Box<dyn System>,
}

/// Priority-ordered list of systems
#[derive(Default)]
pub struct SystemScheduler {
    entries: Vec<SystemEntry>,
    next_id: u64,
    dirty: bool,
}

impl SystemScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system using its declared priority
    pub fn add<S: System + 'static>(&mut self, system: S) -> SystemId {
        self.add_boxed(Box::new(system))
    }

    /// Register an already boxed system
    pub fn add_boxed(&mut self, system: Box<dyn System>) -> SystemId {
        let id = SystemId(self.next_id);
        self.next_id += 1;
        let priority = system.priority();
        log::debug!("Registered system {} ({:?}) with priority {}", system.name(), id, priority);
        self.entries.push(SystemEntry { id, priority, system });
        self.dirty = true;
        id
    }

    /// Override the priority of a registered system
    pub fn set_priority(&mut self, id: SystemId, priority: i32) -> Result<(), EcsError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(EcsError::UnknownSystem(id))?;
        if entry.priority != priority {
            entry.priority = priority;
            self.dirty = true;
        }
        Ok(())
    }

    /// Current priority of a registered system
    pub fn priority(&self, id: SystemId) -> Option<i32> {
        self.entries.iter().find(|entry| entry.id == id).map(|entry| entry.priority)
    }

    /// Unregister a system
    pub fn remove(&mut self, id: SystemId) -> Option<Box<dyn System>> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).system)
    }

    /// Sort by (priority, registration order) if anything changed since the last sort
    pub fn sort_if_dirty(&mut self) {
        if self.dirty {
            self.entries.sort_by_key(|entry| (entry.priority, entry.id));
            self.dirty = false;
            log::trace!("System order: {:?}", self.order());
        }
    }

    /// Ids in execution order as of the last sort
    pub fn order(&self) -> Vec<SystemId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Run every system once, in priority order
    pub fn run(&mut self, delta_time: f32, world: &mut dyn EntityAccessor) {
        self.sort_if_dirty();
        for entry in &mut self.entries {
            log::trace!("Running system {} (priority {})", entry.system.name(), entry.priority);
            entry.system.update(delta_time, world);
        }
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no system is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
