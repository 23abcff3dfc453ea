// Domain layer: models and ports (async traits implemented by adapters).

pub mod model;
pub mod ports;
