use crate::net::{ConnectPoint, Device, DeviceId, Host, HostId, Link, Port, PortAddresses, PortNumber};
use proxyarp_packets::{EthernetFrame, IpAddress, PacketData};

/// Read access to the host, device and link inventory.
///
/// Every call returns an owned snapshot; implementations are expected to answer from memory and never block.
pub trait TopologyService: Send + Sync {
    fn hosts_by_ip(&self, addr: IpAddress) -> Vec<Host>;

    fn host(&self, id: &HostId) -> Option<Host>;

    /// Addresses bound to a single port, if any were configured.
    fn address_bindings_for_port(&self, point: &ConnectPoint) -> Option<PortAddresses>;

    fn address_bindings(&self) -> Vec<PortAddresses>;

    fn devices(&self) -> Vec<Device>;

    fn ports(&self, device: &DeviceId) -> Vec<Port>;

    fn links(&self) -> Vec<Link>;
}

/// A frame to put on the wire out of a single port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundPacket {
    pub device_id: DeviceId,
    pub output: PortNumber,
    pub data: PacketData,
}

impl OutboundPacket {
    pub fn new(device_id: DeviceId, output: PortNumber, data: PacketData) -> Self {
        OutboundPacket {
            device_id,
            output,
            data,
        }
    }

    pub fn connect_point(&self) -> ConnectPoint {
        ConnectPoint::new(self.device_id.clone(), self.output)
    }
}

/// The packet transport.
pub trait PacketService: Send + Sync {
    fn emit(&self, packet: OutboundPacket);
}

#[derive(Clone, Debug)]
pub struct InboundPacket {
    received_from: ConnectPoint,
    parsed: EthernetFrame,
}

impl InboundPacket {
    pub fn new(received_from: ConnectPoint, parsed: EthernetFrame) -> Self {
        InboundPacket {
            received_from,
            parsed,
        }
    }

    pub fn received_from(&self) -> &ConnectPoint {
        &self.received_from
    }

    pub fn parsed(&self) -> &EthernetFrame {
        &self.parsed
    }
}

/// An inbound packet on its way through the packet processors. Once a processor blocks the context, the
/// packet is considered handled and nothing downstream should act on it.
#[derive(Clone, Debug)]
pub struct PacketContext {
    in_packet: InboundPacket,
    blocked: bool,
}

impl PacketContext {
    pub fn new(in_packet: InboundPacket) -> Self {
        PacketContext {
            in_packet,
            blocked: false,
        }
    }

    pub fn in_packet(&self) -> &InboundPacket {
        &self.in_packet
    }

    pub fn block(&mut self) {
        self.blocked = true;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}
