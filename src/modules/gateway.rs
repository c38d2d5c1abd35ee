use thiserror::Error;
use tracing::{debug, info, warn};

use crate::modules::channel::{Channel, ChannelError};
use crate::modules::protocol::{self, DecodeError, DecodeMode};
use crate::modules::sensor::SensorReadings;
use crate::modules::sim::{Event, Simulation, TickResult, Verdict};

/// Past this many cycles a battery death is logged as a long, full life.
pub const LONG_LIFE_CYCLES: u64 = 1000;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("tick {tick}: {source}")]
    Decode { tick: u64, source: DecodeError },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The decision process sent `end`.
    Ended,
    /// The robot walked into a fire.
    Burned,
    /// The battery ran flat before the next batch could be requested.
    Starved { long_lived: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub ticks: u64,
}

/// Drives the sense/send/receive/apply loop over a channel.
pub struct Gateway<C> {
    channel: C,
    mode: DecodeMode,
}

impl<C: Channel> Gateway<C> {
    pub fn new(channel: C, mode: DecodeMode) -> Self {
        Self { channel, mode }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Runs until a terminal condition, calling `observe` after every applied batch.
    pub fn run_with<F>(
        &mut self,
        sim: &mut Simulation,
        mut observe: F,
    ) -> Result<RunSummary, GatewayError>
    where
        F: FnMut(&Simulation, &TickResult),
    {
        loop {
            let readings = self.sense(sim);
            if readings.batt.is_dead() {
                let long_lived = sim.agent().cycles_alive > LONG_LIFE_CYCLES;
                if long_lived {
                    info!(
                        cycles_alive = sim.agent().cycles_alive,
                        "battery exhausted after a long service life"
                    );
                } else {
                    warn!(
                        cycles_alive = sim.agent().cycles_alive,
                        "battery exhausted: robot starved far from base"
                    );
                }
                return Ok(RunSummary {
                    outcome: RunOutcome::Starved { long_lived },
                    ticks: sim.tick(),
                });
            }

            let message = protocol::encode_sensors(&readings);
            debug!(payload = %message, "sending sensors");
            self.channel.send(&message)?;

            let reply = self.channel.receive()?;
            debug!(reply = reply.trim_end(), "received actions");
            let actions = protocol::decode_actions(&reply, self.mode).map_err(|source| {
                GatewayError::Decode {
                    tick: sim.tick() + 1,
                    source,
                }
            })?;

            let result = sim.apply(&actions);
            log_events(&result);
            observe(sim, &result);

            match result.verdict {
                Verdict::Done => continue,
                Verdict::End => {
                    info!(tick = result.tick, "decision process ended the run");
                    return Ok(RunSummary {
                        outcome: RunOutcome::Ended,
                        ticks: sim.tick(),
                    });
                }
                Verdict::Dead => {
                    return Ok(RunSummary {
                        outcome: RunOutcome::Burned,
                        ticks: sim.tick(),
                    });
                }
            }
        }
    }

    pub fn run(&mut self, sim: &mut Simulation) -> Result<RunSummary, GatewayError> {
        self.run_with(sim, |_, _| {})
    }

    fn sense(&self, sim: &mut Simulation) -> SensorReadings {
        if let Some(cell) = sim.spawn_fire() {
            info!(
                %cell,
                active = sim.world().active_fires(),
                "fire started"
            );
        }
        let readings = sim.sensors();
        debug!(%readings, "sensors read");
        readings
    }
}

fn log_events(result: &TickResult) {
    for event in &result.events {
        match event {
            Event::Recharged { recharges } => {
                info!(tick = result.tick, recharges, "recharged at base")
            }
            Event::FireExtinguished { cell } => {
                info!(tick = result.tick, %cell, "fire put out")
            }
            Event::BurnedByFire { cell } => {
                warn!(tick = result.tick, %cell, "robot walked into the fire and died")
            }
            Event::Ignored { token } => {
                debug!(tick = result.tick, token = token.as_str(), "ignored unknown action")
            }
            other => debug!(tick = result.tick, event = ?other, "action applied"),
        }
    }
}
