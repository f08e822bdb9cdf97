pub mod input;
pub mod local_client;
pub mod ports;
pub mod service;
pub mod wire;
