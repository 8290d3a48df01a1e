//! Domain layer

pub mod communication;
pub mod dispatch;
pub mod recipients;
