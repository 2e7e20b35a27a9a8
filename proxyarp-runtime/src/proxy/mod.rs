mod reply;
pub use self::reply::*;

use crate::classifier::PortClassifier;
use crate::event::{TopologyEvent, TopologyListener};
use crate::net::{ConnectPoint, HostId};
use crate::service::{OutboundPacket, PacketContext, PacketService, TopologyService};
use crate::{ProxyArpError, Result};
use proxyarp_packets::{ArpFrame, ArpOp, EthernetFrame, IpAddress, PacketData, ARP_ETHER_TYPE};
use std::convert::TryFrom;
use std::sync::Arc;
use tracing::{debug, warn};

/// Answers ARP on behalf of the hosts and gateway addresses the controller knows about.
///
/// Every method takes `&self` and may be called from the event feed and the packet feed at the same time. The
/// only shared mutable state is the port classification, which lives in the `PortClassifier`.
pub struct ProxyArp<T: TopologyService, P: PacketService> {
    topology: Arc<T>,
    packets: Arc<P>,
    classifier: PortClassifier<T>,
}

impl<T: TopologyService, P: PacketService> ProxyArp<T, P> {
    pub fn new(topology: Arc<T>, packets: Arc<P>) -> Self {
        ProxyArp {
            classifier: PortClassifier::new(topology.clone()),
            topology,
            packets,
        }
    }

    /// Builds the port classification from the current topology. Call once before feeding events or packets.
    pub fn initialize(&self) {
        self.classifier.initialize();
    }

    pub fn classifier(&self) -> &PortClassifier<T> {
        &self.classifier
    }

    /// Whether any known host owns `addr`.
    pub fn known(&self, addr: IpAddress) -> bool {
        !self.topology.hosts_by_ip(addr).is_empty()
    }

    /// Handles an inbound frame if it is ARP.
    ///
    /// Returns `Ok(false)` for anything else and leaves the context untouched. ARP frames are blocked once
    /// handled, including ones with an opcode this handler does not act on.
    pub fn handle_arp(&self, context: &mut PacketContext) -> Result<bool> {
        let frame = context.in_packet().parsed();
        if frame.ether_type() != ARP_ETHER_TYPE {
            return Ok(false);
        }

        let arp = parse_arp(frame)?;
        match arp.operation() {
            Some(ArpOp::Reply) => self.forward(arp.ethernet())?,
            Some(ArpOp::Request) => self.reply(arp.ethernet(), context.in_packet().received_from())?,
            None => debug!(opcode = arp.opcode(), "ignoring ARP with unknown opcode"),
        }

        context.block();
        Ok(true)
    }

    /// Resolves an ARP request that arrived on `in_port`.
    ///
    /// Requests arriving on a configured boundary port are only ever answered for that port's own addresses.
    /// Requests from a host inside a configured subnet are handed to that subnet's port unchanged. Everything
    /// else is answered from the host inventory, or flooded when either end is unknown.
    pub fn reply(&self, frame: &EthernetFrame, in_port: &ConnectPoint) -> Result<()> {
        let request = parse_arp(frame)?;
        if request.operation() != Some(ArpOp::Request) {
            return Err(ProxyArpError::NotArpRequest);
        }
        let target = request
            .target_ip_addr()
            .map_err(ProxyArpError::MalformedArp)?;

        if self.classifier.is_outside_port(in_port) {
            if let Some(bindings) = self.topology.address_bindings_for_port(in_port) {
                for address in bindings
                    .ip_addresses()
                    .iter()
                    .filter(|address| address.ip_address() == target)
                {
                    let reply = build_arp_reply(address.ip_address(), bindings.mac(), &request)
                        .map_err(ProxyArpError::MalformedArp)?;
                    debug!(%in_port, %target, "answering for boundary address");
                    self.send_to(&reply, in_port);
                }
            }
            return Ok(());
        }

        let sender = request
            .sender_ip_addr()
            .map_err(ProxyArpError::MalformedArp)?;
        let gateway = self.topology.address_bindings().into_iter().find(|bindings| {
            bindings
                .ip_addresses()
                .iter()
                .any(|address| address.subnet_address().contains(&sender))
        });
        if let Some(bindings) = gateway {
            debug!(%sender, out_port = %bindings.connect_point(), "handing request to subnet port");
            self.send_to(frame, bindings.connect_point());
            return Ok(());
        }

        let vlan = frame.vlan_id();
        let dst = self
            .topology
            .hosts_by_ip(target)
            .into_iter()
            .find(|host| host.vlan() == vlan);
        let src = self.topology.host(&HostId::new(frame.src_mac(), vlan));

        let (dst, src) = match (dst, src) {
            (Some(dst), Some(src)) => (dst, src),
            _ => {
                debug!(%target, %vlan, "unresolved request");
                self.flood(frame);
                return Ok(());
            }
        };

        // A multi-homed host answers with whichever of its addresses comes up first
        let address = match dst.ip_addresses().iter().next() {
            Some(address) => *address,
            None => {
                self.flood(frame);
                return Ok(());
            }
        };
        let reply =
            build_arp_reply(address, dst.mac(), &request).map_err(ProxyArpError::MalformedArp)?;
        debug!(%target, host = %dst.id(), out_port = %src.location(), "proxy reply");
        self.send_to(&reply, src.location());
        Ok(())
    }

    /// Delivers an ARP reply to the host it is addressed to, or floods it if that host is unknown.
    pub fn forward(&self, frame: &EthernetFrame) -> Result<()> {
        let arp = parse_arp(frame)?;
        if arp.operation() != Some(ArpOp::Reply) {
            return Err(ProxyArpError::NotArpReply);
        }

        match self
            .topology
            .host(&HostId::new(frame.dest_mac(), frame.vlan_id()))
        {
            Some(host) => {
                debug!(host = %host.id(), out_port = %host.location(), "forwarding reply");
                self.send_to(frame, host.location());
            }
            None => {
                debug!(dst = %frame.dest_mac(), "reply for unknown host");
                self.flood(frame);
            }
        }
        Ok(())
    }

    /// Sends the frame, unmodified, out of every External port that is not a configured boundary port.
    pub fn flood(&self, frame: &EthernetFrame) {
        let data = frame.serialize();
        for point in self.classifier.external_ports() {
            if self.classifier.is_outside_port(&point) {
                continue;
            }
            self.emit(&point, data.clone());
        }
    }

    /// Sends the frame out of `out_port` unless the port is part of the fabric.
    pub fn send_to(&self, frame: &EthernetFrame, out_port: &ConnectPoint) {
        if self.classifier.is_internal(out_port) {
            warn!(%out_port, "not sending ARP out of an internal port");
            return;
        }
        self.emit(out_port, frame.serialize());
    }

    fn emit(&self, point: &ConnectPoint, data: PacketData) {
        self.packets.emit(OutboundPacket::new(
            point.device_id().clone(),
            point.port(),
            data,
        ));
    }
}

impl<T: TopologyService, P: PacketService> TopologyListener for ProxyArp<T, P> {
    fn event(&self, event: &TopologyEvent) {
        self.classifier.event(event);
    }
}

fn parse_arp(frame: &EthernetFrame) -> Result<ArpFrame> {
    if frame.ether_type() != ARP_ETHER_TYPE {
        return Err(ProxyArpError::NotArp);
    }
    ArpFrame::try_from(frame.clone()).map_err(ProxyArpError::MalformedArp)
}
