/*!
Deferred, cancellable sampling for auto-detected walls.

Hosts often position child nodes over several frames after a subtree mounts or
changes. Sampling bounds right away reads stale layout, so the walk is deferred by a
settle delay and driven by the host's frame clock.

- [`SettleScheduler`] is the bare timer: `schedule` hands out a [`SettleToken`],
  scheduling again supersedes it, `cancel` drops it, and `signal_layout_ready` lets a
  host that knows its layout is final skip the rest of the wait. `finish` retires a
  token once its run has published.
- [`AutoWallObserver`] owns the inputs, the scheduler and the last published walls.
  Changing what gets sampled (enabled flag, name filter) or the subtree's children
  reschedules; changing only how walls are shaped rebuilds them from the cached
  observations.

Nothing here is thread-aware. A superseded run never publishes: completion checks the
token against the latest one. Dropping the observer drops any pending run.
*/

use std::time::Duration;

use nalgebra::Matrix4;

use crate::{
    constants::{DEFAULT_MARGIN, DEFAULT_SETTLE_DELAY},
    scene::{MeshObservation, NameFilter, SceneGraph, observe_meshes, walls_for_observations},
    settings::{SideMask, WallSettings},
    types::WallSegment,
};

/// Identifies one scheduled run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SettleToken(u64);

#[derive(Clone, Copy, Debug)]
struct Pending {
    token: SettleToken,
    remaining: Duration,
    ready: bool,
}

/// Fixed-delay, single-slot scheduler.
#[derive(Clone, Debug)]
pub struct SettleScheduler {
    delay: Duration,
    generation: u64,
    pending: Option<Pending>,
}

impl Default for SettleScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

impl SettleScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start a new run, replacing any pending one.
    pub fn schedule(&mut self) -> SettleToken {
        self.generation += 1;
        let token = SettleToken(self.generation);
        self.pending = Some(Pending {
            token,
            remaining: self.delay,
            ready: false,
        });
        token
    }

    /// Drop the pending run, if any. Its token stops being current.
    pub fn cancel(&mut self) -> Option<SettleToken> {
        let pending = self.pending.take()?;
        self.generation += 1;
        Some(pending.token)
    }

    /// Fire the pending run on the next [`advance`](Self::advance), whatever is left of
    /// the delay.
    pub fn signal_layout_ready(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            pending.ready = true;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether `token` belongs to the most recent, uncancelled schedule.
    pub fn is_current(&self, token: SettleToken) -> bool {
        token.0 == self.generation
    }

    /// Mark the run for `token` as done. A pending run with that token is dropped and the
    /// token stops being current. Returns false for stale or already finished tokens.
    pub fn finish(&mut self, token: SettleToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        if self.pending.is_some_and(|p| p.token == token) {
            self.pending = None;
        }
        self.generation += 1;
        true
    }

    /// Move the clock forward. Returns the pending token once it is due.
    pub fn advance(&mut self, dt: Duration) -> Option<SettleToken> {
        let pending = self.pending.as_mut()?;
        pending.remaining = pending.remaining.saturating_sub(dt);

        if pending.ready || pending.remaining.is_zero() {
            return self.pending.take().map(|p| p.token);
        }
        None
    }
}

/// Inputs of one auto-detected wall set.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoWallConfig {
    pub enabled: bool,
    /// Only nodes whose name passes are sampled.
    pub name_filter: Option<NameFilter>,
    /// Outward growth of each footprint on X and Z (meters).
    pub margin: f32,
    pub sides: SideMask,
    pub settings: WallSettings,
}

impl Default for AutoWallConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name_filter: None,
            margin: DEFAULT_MARGIN,
            sides: SideMask::ALL,
            settings: WallSettings::default(),
        }
    }
}

impl AutoWallConfig {
    /// True when switching from `self` to `other` needs a fresh walk.
    fn resample_needed(&self, other: &AutoWallConfig) -> bool {
        self.enabled != other.enabled || self.name_filter != other.name_filter
    }
}

/// Walk `root` right away and wall every sampled mesh.
///
/// Disabled configs and subtrees without matching drawables give an empty list.
pub fn observe_and_wall<G: SceneGraph>(
    graph: &G,
    root: G::Node,
    parent_world: Matrix4<f32>,
    config: &AutoWallConfig,
) -> Vec<WallSegment> {
    if !config.enabled {
        return Vec::new();
    }
    let observations = observe_meshes(graph, root, parent_world, config.name_filter.as_ref());
    walls_for_observations(&observations, config.sides, config.margin, &config.settings)
}

/// Auto-detected walls for one subtree, sampled after a settle delay.
#[derive(Clone, Debug)]
pub struct AutoWallObserver {
    config: AutoWallConfig,
    scheduler: SettleScheduler,
    observations: Vec<MeshObservation>,
    walls: Vec<WallSegment>,
}

impl AutoWallObserver {
    /// Mount: schedules the first walk if `config` is enabled.
    pub fn new(config: AutoWallConfig, settle_delay: Duration) -> Self {
        let mut observer = Self {
            config,
            scheduler: SettleScheduler::new(settle_delay),
            observations: Vec::new(),
            walls: Vec::new(),
        };
        if observer.config.enabled {
            observer.scheduler.schedule();
        }
        observer
    }

    pub fn config(&self) -> &AutoWallConfig {
        &self.config
    }

    /// Last published walls.
    pub fn walls(&self) -> &[WallSegment] {
        &self.walls
    }

    /// Footprints behind [`walls`](Self::walls).
    pub fn observations(&self) -> &[MeshObservation] {
        &self.observations
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Replace the inputs. Returns true when the published walls changed right away.
    pub fn set_config(&mut self, config: AutoWallConfig) -> bool {
        if config == self.config {
            return false;
        }
        let resample = self.config.resample_needed(&config);
        self.config = config;

        if !self.config.enabled {
            self.scheduler.cancel();
            let had_walls = !self.walls.is_empty();
            self.observations.clear();
            self.walls.clear();
            return had_walls;
        }

        if resample {
            self.scheduler.schedule();
            return false;
        }

        self.rebuild_walls();
        true
    }

    /// The subtree gained or lost nodes. Schedules a fresh walk when enabled.
    pub fn children_changed(&mut self) {
        if self.config.enabled {
            self.scheduler.schedule();
        }
    }

    /// The host reports its layout as final; the pending walk runs on the next tick.
    pub fn signal_layout_ready(&mut self) {
        self.scheduler.signal_layout_ready();
    }

    /// Advance the settle clock and run the walk if it became due.
    ///
    /// Returns true when new walls were published.
    pub fn tick<G: SceneGraph>(
        &mut self,
        dt: Duration,
        graph: &G,
        root: G::Node,
        parent_world: Matrix4<f32>,
    ) -> bool {
        match self.scheduler.advance(dt) {
            Some(token) => self.complete(token, graph, root, parent_world),
            None => false,
        }
    }

    /// Publish the walk for `token`, consuming it. Stale or already used tokens are
    /// ignored.
    pub fn complete<G: SceneGraph>(
        &mut self,
        token: SettleToken,
        graph: &G,
        root: G::Node,
        parent_world: Matrix4<f32>,
    ) -> bool {
        if !self.config.enabled || !self.scheduler.finish(token) {
            return false;
        }
        let filter = self.config.name_filter.as_ref();
        self.observations = observe_meshes(graph, root, parent_world, filter);
        self.rebuild_walls();
        log::debug!(
            "air walls: sampled {} mesh(es) into {} wall(s)",
            self.observations.len(),
            self.walls.len()
        );
        true
    }

    fn rebuild_walls(&mut self) {
        self.walls = walls_for_observations(
            &self.observations,
            self.config.sides,
            self.config.margin,
            &self.config.settings,
        );
    }
}
