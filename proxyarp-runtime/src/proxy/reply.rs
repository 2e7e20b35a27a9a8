use proxyarp_packets::{ArpFrame, ArpOp, EthernetFrame, IpAddress, MacAddr};

/// Builds the ARP reply to `request` announcing that `src_ip` lives at `src_mac`.
///
/// The reply goes back to whoever sent the request, on the request's VLAN. Fails only if the request does not
/// carry Ethernet/IPv4 sender addresses.
pub fn build_arp_reply(
    src_ip: IpAddress,
    src_mac: MacAddr,
    request: &ArpFrame,
) -> Result<EthernetFrame, &'static str> {
    let requester_mac = request.sender_mac_addr()?;
    let requester_ip = request.sender_ip_addr()?;

    let mut reply = ArpFrame::default();
    reply.set_opcode(ArpOp::Reply as u16);
    reply.set_sender_hardware_addr(src_mac);
    reply.set_sender_protocol_addr(src_ip);
    reply.set_target_hardware_addr(requester_mac);
    reply.set_target_protocol_addr(requester_ip);

    let ethernet = reply.ethernet_mut();
    ethernet.set_dest_mac(request.ethernet().src_mac());
    ethernet.set_src_mac(src_mac);
    ethernet.set_vlan_id(request.ethernet().vlan_id());

    Ok(reply.frame())
}
