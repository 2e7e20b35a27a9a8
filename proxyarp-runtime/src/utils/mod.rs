pub mod runner;
pub mod test;
