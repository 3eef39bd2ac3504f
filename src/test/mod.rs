mod report;
mod scenario;
mod simulator;
mod support;
