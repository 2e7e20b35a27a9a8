/// The network model the proxy reasons about: devices and their ports, the links between them, hosts and the
/// addresses an administrator has bound to boundary ports. Everything in here is owned by the topology provider
/// and is only ever read by this crate, so the types are plain values that are cheap to clone out of a snapshot.
pub mod net;

/// Traits for the collaborators the proxy depends on. The `TopologyService` answers questions about hosts, devices,
/// links and address bindings, and the `PacketService` puts frames back on the wire. Inbound frames arrive wrapped
/// in a `PacketContext`, which records whether a handler has consumed the packet.
pub mod service;

/// Device and link lifecycle notifications, delivered as a single tagged `TopologyEvent` and consumed by anything
/// implementing `TopologyListener`.
pub mod event;

/// Shared mutable state. The `PortTable` holds the Internal/External partition of every known port behind one
/// lock, and only exposes whole transitions so no reader can observe half of a link being moved.
pub mod state;

/// Classifiers answer "what kind of thing is this" without modifying it. The `PortClassifier` keeps the port
/// table in sync with topology events and tells the ARP handler whether a port is part of the fabric or faces
/// the outside world.
pub mod classifier;

/// The proxy ARP handler. Inbound ARP requests are answered on behalf of known hosts or configured gateway
/// addresses, replies are forwarded to the host they are addressed to, and anything that cannot be resolved is
/// flooded out of the edge of the network.
pub mod proxy;

/// Knobs for the runner: worker threads and the depth of the event and packet queues.
pub mod config;

mod error;
pub use self::error::*;

/// Utility module
pub mod utils;
