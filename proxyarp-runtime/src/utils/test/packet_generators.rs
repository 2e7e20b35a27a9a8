use proxyarp_packets::{
    ArpFrame, ArpOp, EthernetFrame, IpAddress, MacAddr, VlanId, IPV4_ETHER_TYPE,
};

/// A broadcast who-has for `target_ip`, sent by `sender_mac`/`sender_ip` on `vlan`.
pub fn arp_request(
    sender_mac: MacAddr,
    sender_ip: IpAddress,
    target_ip: IpAddress,
    vlan: VlanId,
) -> EthernetFrame {
    let mut arp = ArpFrame::default();
    arp.set_opcode(ArpOp::Request as u16);
    arp.set_sender_hardware_addr(sender_mac);
    arp.set_sender_protocol_addr(sender_ip);
    arp.set_target_protocol_addr(target_ip);

    let mut frame = arp.frame();
    frame.set_dest_mac(MacAddr::BROADCAST);
    frame.set_src_mac(sender_mac);
    frame.set_vlan_id(vlan);
    frame
}

/// A unicast is-at from `sender_mac`/`sender_ip` to `target_mac`/`target_ip` on `vlan`.
pub fn arp_reply(
    sender_mac: MacAddr,
    sender_ip: IpAddress,
    target_mac: MacAddr,
    target_ip: IpAddress,
    vlan: VlanId,
) -> EthernetFrame {
    let mut arp = ArpFrame::default();
    arp.set_opcode(ArpOp::Reply as u16);
    arp.set_sender_hardware_addr(sender_mac);
    arp.set_sender_protocol_addr(sender_ip);
    arp.set_target_hardware_addr(target_mac);
    arp.set_target_protocol_addr(target_ip);

    let mut frame = arp.frame();
    frame.set_dest_mac(target_mac);
    frame.set_src_mac(sender_mac);
    frame.set_vlan_id(vlan);
    frame
}

/// An untagged IPv4 frame with a zeroed 20 byte payload. Only the ether type matters to the proxy.
pub fn ipv4_frame(src: MacAddr, dest: MacAddr) -> EthernetFrame {
    let mut frame = EthernetFrame::empty();
    frame.set_dest_mac(dest);
    frame.set_src_mac(src);
    frame.set_ether_type(IPV4_ETHER_TYPE);
    frame.set_payload(&[0; 20]);
    frame
}
