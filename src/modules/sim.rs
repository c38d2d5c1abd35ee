use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::modules::action::Action;
use crate::modules::agent::{Agent, Stats};
use crate::modules::config::{ConfigError, SimConfig};
use crate::modules::fire;
use crate::modules::grid::{Cell, Direction, Grid};
use crate::modules::sensor::{self, BatteryLevel, SensorReadings};
use crate::modules::view::{AgentSnapshot, WorldSnapshot};
use crate::modules::world::World;

/// Outcome of applying one action batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Batch exhausted; the run continues.
    Done,
    /// An `end` token was processed.
    End,
    /// The agent burned (now or earlier) or its battery is flat.
    Dead,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Turned { from: Direction, to: Direction },
    Moved { from: Cell, to: Cell },
    Bumped { target: Cell },
    Recharged { recharges: u64 },
    FireExtinguished { cell: Cell },
    MissedPutOut { target: Cell },
    BurnedByFire { cell: Cell },
    Ignored { token: String },
    Ended,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickResult {
    pub tick: u64,
    pub verdict: Verdict,
    pub events: Vec<Event>,
}

/// Owns the whole simulation state and advances it one batch at a time.
#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    world: World,
    agent: Agent,
    stats: Stats,
    tick: u64,
    rng: StdRng,
}

impl Simulation {
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &SimConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = config.grid();
        let mut world = World::new(config.max_fires);
        for cell in &config.initial_fires {
            world.ignite(&grid, *cell)?;
        }
        let agent = Agent::new(grid.base(), config.initial_direction);
        Ok(Self {
            grid,
            world,
            agent,
            stats: Stats::default(),
            tick: 0,
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Number of action batches applied so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Places the agent directly, bypassing movement rules.
    #[cfg(test)]
    pub(crate) fn place_agent(&mut self, location: Cell, direction: Direction) {
        self.agent.location = location;
        self.agent.direction = direction;
    }

    pub fn sensors(&self) -> SensorReadings {
        sensor::read_sensors(&self.grid, &self.world, &self.agent)
    }

    /// Pre-tick fire roll. Returns the newly burning cell, if any.
    pub fn spawn_fire(&mut self) -> Option<Cell> {
        fire::maybe_spawn(&self.grid, &mut self.world, &mut self.rng)
    }

    pub fn apply(&mut self, actions: &[Action]) -> TickResult {
        let mut events = Vec::new();
        if !self.can_act() {
            return TickResult {
                tick: self.tick,
                verdict: Verdict::Dead,
                events,
            };
        }
        self.tick += 1;
        let verdict = self.run_batch(actions, &mut events);
        TickResult {
            tick: self.tick,
            verdict,
            events,
        }
    }

    /// Burned agents and flat batteries both end the agent's ability to act.
    fn can_act(&self) -> bool {
        self.agent.alive
            && !BatteryLevel::from_cycles(self.agent.cycles_from_last_recharge).is_dead()
    }

    fn run_batch(&mut self, actions: &[Action], events: &mut Vec<Event>) -> Verdict {
        for action in actions {
            match action {
                Action::End => {
                    events.push(Event::Ended);
                    return Verdict::End;
                }
                Action::TurnL | Action::TurnR => {
                    self.spend(action);
                    let from = self.agent.direction;
                    let to = if *action == Action::TurnL {
                        from.turn_left()
                    } else {
                        from.turn_right()
                    };
                    self.agent.direction = to;
                    events.push(Event::Turned { from, to });
                }
                Action::Fwd => {
                    self.spend(action);
                    let target = self.agent.front();
                    if self.grid.is_blocked(target) {
                        events.push(Event::Bumped { target });
                        continue;
                    }
                    let from = self.agent.location;
                    self.agent.location = target;
                    events.push(Event::Moved { from, to: target });

                    if self.world.is_fire(target) {
                        self.agent.kill();
                        events.push(Event::BurnedByFire { cell: target });
                        return Verdict::Dead;
                    }
                    if self.grid.is_base(target) {
                        self.stats.recharges += 1;
                        self.agent.recharge();
                        events.push(Event::Recharged {
                            recharges: self.stats.recharges,
                        });
                    }
                }
                Action::PutOut => {
                    self.spend(action);
                    let target = self.agent.front();
                    if self.world.extinguish(target) {
                        self.stats.fires_extinguished += 1;
                        events.push(Event::FireExtinguished { cell: target });
                    } else {
                        events.push(Event::MissedPutOut { target });
                    }
                }
                Action::Unknown(token) => {
                    self.spend(action);
                    events.push(Event::Ignored {
                        token: token.clone(),
                    });
                }
            }
        }
        Verdict::Done
    }

    /// Charges the action's cycles before its effect is applied.
    fn spend(&mut self, action: &Action) {
        self.agent.charge(action.cycle_cost());
        if !self.world.has_fire() {
            self.stats.cycles_without_fire += 1;
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            captured_at: chrono::Utc::now(),
            size: self.grid.size(),
            base: self.grid.base(),
            obstacles: self.grid.obstacles().collect(),
            fires: self.world.fires().collect(),
            max_fires: self.world.max_fires(),
            agent: AgentSnapshot::from(&self.agent),
            stats: self.stats,
        }
    }
}
