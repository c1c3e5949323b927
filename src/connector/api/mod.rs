pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig, ModelProvider};
pub use router::Router;
