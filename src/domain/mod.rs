// Domain layer: journal models and ports (interfaces). No HTTP or HTML details here.

pub mod model;
pub mod ports;
