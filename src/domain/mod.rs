// Domain layer: bundle/service models and the ports that sources and sinks implement.

pub mod model;
pub mod ports;
