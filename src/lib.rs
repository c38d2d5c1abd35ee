pub mod modules;

pub use modules::action::Action;
pub use modules::agent::{ACTION_CYCLES, Agent, PUT_OUT_EXTRA_CYCLES, Stats};
pub use modules::channel::{Channel, ChannelError, MemoryChannel, PipeChannel, StreamChannel};
pub use modules::config::{ConfigError, SimConfig};
pub use modules::fire::{self, BASE_SPAWN_PROBABILITY, spawn_probability};
pub use modules::gateway::{Gateway, GatewayError, LONG_LIFE_CYCLES, RunOutcome, RunSummary};
pub use modules::grid::{Cell, Direction, Grid};
pub use modules::protocol::{DecodeError, DecodeMode, decode_actions, encode_sensors};
pub use modules::sensor::{
    BatteryLevel, CellReading, LightReading, SensorKind, SensorReadings, TempReading,
    read_sensors,
};
pub use modules::sim::{Event, Simulation, TickResult, Verdict};
pub use modules::view::{
    AgentSnapshot, WorldSnapshot, load_world_snapshot, logbook, render_grid, save_world_snapshot,
};
pub use modules::world::{IgniteError, World};
