//! Test helpers shared by unit and integration tests: an in-memory topology, a transport that records what
//! it is asked to send, and frame builders.
pub mod packet_generators;
