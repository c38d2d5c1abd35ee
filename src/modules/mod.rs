pub mod action;
pub mod agent;
pub mod channel;
pub mod config;
pub mod fire;
pub mod gateway;
pub mod grid;
pub mod protocol;
pub mod sensor;
pub mod sim;
pub mod view;
pub mod world;
