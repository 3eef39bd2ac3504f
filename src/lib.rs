pub mod journal;
pub mod net;
pub mod report;
pub mod scenario;
pub mod sim;
mod simulation;

pub use simulation::Simulation;

#[cfg(test)]
mod test;
