use crate::{EthernetFrame, IpAddress, MacAddr, ARP_ETHER_TYPE, IPV4_ETHER_TYPE};
use std::convert::TryFrom;

#[derive(Eq, Clone, Copy, PartialEq, Debug)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

impl TryFrom<u16> for ArpOp {
    type Error = &'static str;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ArpOp::Request),
            2 => Ok(ArpOp::Reply),
            _ => Err("Unknown ARP opcode"),
        }
    }
}

pub enum ArpHardwareType {
    Ethernet = 1,
}

pub const ETHERNET_ADDR_LEN: u8 = 6;
pub const IPV4_ADDR_LEN: u8 = 4;

const HARDWARE_TYPE_RANGE: (usize, usize) = (0, 2);
const PROTOCOL_TYPE_RANGE: (usize, usize) = (2, 4);
const HARDWARE_ADDR_LEN_RANGE: (usize, usize) = (4, 5);
const PROTOCOL_ADDR_LEN_RANGE: (usize, usize) = (5, 6);
const OPCODE_RANGE: (usize, usize) = (6, 8);

///
/// EthernetFrame wrapper with getters/setters for the packet structure described in RFC 826
/// https://tools.ietf.org/html/rfc826
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArpFrame {
    frame: EthernetFrame,
}

impl ArpFrame {
    ///
    /// Constructs a new, untagged frame with the ARP ether type and a zeroed payload big enough
    /// for all ARP fields, given some hardware/protocol address lengths.
    ///
    pub fn new(hardware_addr_len: u8, protocol_addr_len: u8) -> Self {
        let payload_len = 8 + (2 * hardware_addr_len as usize) + (2 * protocol_addr_len as usize);
        let payload: Vec<u8> = vec![0; payload_len];

        let mut frame = EthernetFrame::empty();
        frame.set_ether_type(ARP_ETHER_TYPE);
        frame.set_payload(payload.as_slice());

        let mut arp_frame = ArpFrame { frame };
        arp_frame.set_hardware_addr_len(hardware_addr_len);
        arp_frame.set_protocol_addr_len(protocol_addr_len);
        arp_frame
    }

    pub fn hardware_type(&self) -> u16 {
        let (start, end) = HARDWARE_TYPE_RANGE;
        self.arp_u16(start, end)
    }

    pub fn protocol_type(&self) -> u16 {
        let (start, end) = PROTOCOL_TYPE_RANGE;
        self.arp_u16(start, end)
    }

    pub fn hardware_addr_len(&self) -> u8 {
        let (start, _) = HARDWARE_ADDR_LEN_RANGE;
        self.arp_data(start, start + 1)[0]
    }

    pub fn protocol_addr_len(&self) -> u8 {
        let (start, _) = PROTOCOL_ADDR_LEN_RANGE;
        self.arp_data(start, start + 1)[0]
    }

    pub fn opcode(&self) -> u16 {
        let (start, end) = OPCODE_RANGE;
        self.arp_u16(start, end)
    }

    pub fn operation(&self) -> Option<ArpOp> {
        ArpOp::try_from(self.opcode()).ok()
    }

    pub fn sender_hardware_addr(&self) -> &[u8] {
        let (start, end) = self.sender_hardware_addr_range();
        self.arp_data(start, end)
    }

    pub fn sender_protocol_addr(&self) -> &[u8] {
        let (start, end) = self.sender_protocol_addr_range();
        self.arp_data(start, end)
    }

    pub fn target_hardware_addr(&self) -> &[u8] {
        let (start, end) = self.target_hardware_addr_range();
        self.arp_data(start, end)
    }

    pub fn target_protocol_addr(&self) -> &[u8] {
        let (start, end) = self.target_protocol_addr_range();
        self.arp_data(start, end)
    }

    pub fn sender_mac_addr(&self) -> Result<MacAddr, &'static str> {
        MacAddr::try_from(self.sender_hardware_addr())
    }

    pub fn target_mac_addr(&self) -> Result<MacAddr, &'static str> {
        MacAddr::try_from(self.target_hardware_addr())
    }

    pub fn sender_ip_addr(&self) -> Result<IpAddress, &'static str> {
        self.ipv4_field(self.sender_protocol_addr())
    }

    pub fn target_ip_addr(&self) -> Result<IpAddress, &'static str> {
        self.ipv4_field(self.target_protocol_addr())
    }

    pub fn set_hardware_type(&mut self, htype: u16) {
        let (start, end) = HARDWARE_TYPE_RANGE;
        self.set_arp_data(&htype.to_be_bytes(), start, end);
    }

    pub fn set_protocol_type(&mut self, ptype: u16) {
        let (start, end) = PROTOCOL_TYPE_RANGE;
        self.set_arp_data(&ptype.to_be_bytes(), start, end);
    }

    pub fn set_hardware_addr_len(&mut self, len: u8) {
        let (start, end) = HARDWARE_ADDR_LEN_RANGE;
        self.set_arp_data(&len.to_be_bytes(), start, end);
    }

    pub fn set_protocol_addr_len(&mut self, len: u8) {
        let (start, end) = PROTOCOL_ADDR_LEN_RANGE;
        self.set_arp_data(&len.to_be_bytes(), start, end);
    }

    pub fn set_opcode(&mut self, code: u16) {
        let (start, end) = OPCODE_RANGE;
        self.set_arp_data(&code.to_be_bytes(), start, end);
    }

    // The address setters assume an Ethernet/IPv4 layout (6/4 byte addresses)
    pub fn set_sender_hardware_addr(&mut self, addr: MacAddr) {
        let (start, end) = self.sender_hardware_addr_range();
        self.set_arp_data(&addr.bytes, start, end);
    }

    pub fn set_sender_protocol_addr(&mut self, ip_addr: IpAddress) {
        let (start, end) = self.sender_protocol_addr_range();
        self.set_arp_data(&ip_addr.octets(), start, end);
    }

    pub fn set_target_hardware_addr(&mut self, addr: MacAddr) {
        let (start, end) = self.target_hardware_addr_range();
        self.set_arp_data(&addr.bytes, start, end);
    }

    pub fn set_target_protocol_addr(&mut self, ip_addr: IpAddress) {
        let (start, end) = self.target_protocol_addr_range();
        self.set_arp_data(&ip_addr.octets(), start, end);
    }

    pub fn ethernet(&self) -> &EthernetFrame {
        &self.frame
    }

    pub fn ethernet_mut(&mut self) -> &mut EthernetFrame {
        &mut self.frame
    }

    // Move ownership of the frame back to the caller
    pub fn frame(self) -> EthernetFrame {
        self.frame
    }

    fn ipv4_field(&self, bytes: &[u8]) -> Result<IpAddress, &'static str> {
        if self.protocol_addr_len() != IPV4_ADDR_LEN {
            return Err("ARP protocol address is not an IPv4 address");
        }
        IpAddress::from_slice(bytes, 0)
    }

    fn arp_u16(&self, start: usize, end: usize) -> u16 {
        let bytes = self.arp_data(start, end);
        u16::from_be_bytes([bytes[0], bytes[1]])
    }

    // Returns the bytes in the ethernet frame between start and end, exclusive
    fn arp_data(&self, start: usize, end: usize) -> &[u8] {
        &self.frame.payload()[start..end]
    }

    fn set_arp_data(&mut self, bytes: &[u8], start: usize, end: usize) {
        self.frame.payload_mut()[start..end].copy_from_slice(bytes);
    }

    fn sender_hardware_addr_range(&self) -> (usize, usize) {
        let hlen = self.hardware_addr_len() as usize;

        let start = 8;
        let end = start + hlen;
        (start, end)
    }

    fn sender_protocol_addr_range(&self) -> (usize, usize) {
        let hlen = self.hardware_addr_len() as usize;
        let plen = self.protocol_addr_len() as usize;

        let start = 8 + hlen;
        let end = start + plen;
        (start, end)
    }

    fn target_hardware_addr_range(&self) -> (usize, usize) {
        let hlen = self.hardware_addr_len() as usize;
        let plen = self.protocol_addr_len() as usize;

        let start = 8 + hlen + plen;
        let end = start + hlen;
        (start, end)
    }

    fn target_protocol_addr_range(&self) -> (usize, usize) {
        let hlen = self.hardware_addr_len() as usize;
        let plen = self.protocol_addr_len() as usize;

        let start = 8 + (2 * hlen) + plen;
        let end = start + plen;
        (start, end)
    }
}

/// An Ethernet/IPv4 ARP frame with every fixed field filled in, ready for addresses and an opcode.
impl Default for ArpFrame {
    fn default() -> Self {
        let mut arp_frame = ArpFrame::new(ETHERNET_ADDR_LEN, IPV4_ADDR_LEN);
        arp_frame.set_hardware_type(ArpHardwareType::Ethernet as u16);
        arp_frame.set_protocol_type(IPV4_ETHER_TYPE);
        arp_frame
    }
}

impl TryFrom<EthernetFrame> for ArpFrame {
    type Error = &'static str;

    ///
    /// Decorates the given EthernetFrame with ArpFrame getters/setters.
    /// Validates
    /// - The frame has an ARP ether type
    /// - The frame has a reasonable payload size given the hardware/protocol address lengths
    ///
    /// Trailing bytes past the ARP fields are allowed, since short frames are padded on the wire.
    ///
    fn try_from(frame: EthernetFrame) -> Result<Self, Self::Error> {
        if frame.ether_type() != ARP_ETHER_TYPE {
            return Err("Frame does not have ARP ether type.");
        };

        let arp_frame = ArpFrame { frame };
        let payload_len = arp_frame.frame.payload().len();

        if payload_len < 8 {
            return Err("Frame payload is too small");
        }

        let hlen = arp_frame.hardware_addr_len() as usize;
        let plen = arp_frame.protocol_addr_len() as usize;

        if payload_len < (8 + (2 * hlen) + (2 * plen)) {
            return Err("Frame payload doesn't match address length fields");
        }

        Ok(arp_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VlanId;

    #[test]
    fn generate_empty_arp_frame() {
        let arp_frame = ArpFrame::new(6, 4);
        assert_eq!(arp_frame.ethernet().ether_type(), ARP_ETHER_TYPE);
        assert_eq!(arp_frame.hardware_type(), 0);
        assert_eq!(arp_frame.protocol_type(), 0);
        assert_eq!(arp_frame.hardware_addr_len(), 6);
        assert_eq!(arp_frame.protocol_addr_len(), 4);
        assert_eq!(arp_frame.opcode(), 0);
        assert_eq!(arp_frame.operation(), None);
        assert_eq!(arp_frame.sender_hardware_addr(), [0, 0, 0, 0, 0, 0]);
        assert_eq!(arp_frame.sender_protocol_addr(), [0, 0, 0, 0]);
        assert_eq!(arp_frame.target_hardware_addr(), [0, 0, 0, 0, 0, 0]);
        assert_eq!(arp_frame.target_protocol_addr(), [0, 0, 0, 0]);
    }

    #[test]
    fn arp_frame_from_ethernet() -> Result<(), String> {
        let arp_payload: Vec<u8> = vec![
            0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 1, 2, 3, 4, 5, 6, 10, 0, 0, 1, 10, 9,
            8, 7, 6, 5, 0xff, 0xff, 0xff, 0xff,
        ];
        let mut ethernet_frame = EthernetFrame::empty();
        ethernet_frame.set_payload(&arp_payload);
        ethernet_frame.set_ether_type(ARP_ETHER_TYPE);

        let arp_frame = ArpFrame::try_from(ethernet_frame)?;
        assert_eq!(arp_frame.hardware_type(), ArpHardwareType::Ethernet as u16);
        assert_eq!(arp_frame.protocol_type(), IPV4_ETHER_TYPE);
        assert_eq!(arp_frame.hardware_addr_len(), 6);
        assert_eq!(arp_frame.protocol_addr_len(), 4);
        assert_eq!(arp_frame.operation(), Some(ArpOp::Request));
        assert_eq!(arp_frame.sender_mac_addr()?, MacAddr::new([1, 2, 3, 4, 5, 6]));
        assert_eq!(arp_frame.sender_ip_addr()?, IpAddress::new([10, 0, 0, 1]));
        assert_eq!(arp_frame.target_hardware_addr(), [10, 9, 8, 7, 6, 5]);
        assert_eq!(arp_frame.target_ip_addr()?, IpAddress::new([255, 255, 255, 255]));
        Ok(())
    }

    #[test]
    fn rejects_non_arp_and_short_frames() {
        let mut ipv4 = EthernetFrame::empty();
        ipv4.set_ether_type(IPV4_ETHER_TYPE);
        ipv4.set_payload(&[0; 28]);
        assert!(ArpFrame::try_from(ipv4).is_err());

        let mut short = EthernetFrame::empty();
        short.set_ether_type(ARP_ETHER_TYPE);
        short.set_payload(&[0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 1, 2]);
        assert!(ArpFrame::try_from(short).is_err());
    }

    #[test]
    fn padded_frame_is_accepted() {
        let mut padded = ArpFrame::default().frame();
        let mut payload = padded.payload().to_vec();
        payload.extend_from_slice(&[0; 18]);
        padded.set_payload(&payload);
        assert!(ArpFrame::try_from(padded).is_ok());
    }

    #[test]
    fn vlan_tagged_arp_fields() {
        let mut arp_frame = ArpFrame::default();
        arp_frame.set_opcode(ArpOp::Reply as u16);
        arp_frame.set_sender_protocol_addr(IpAddress::new([192, 168, 0, 1]));
        arp_frame
            .ethernet_mut()
            .set_vlan_id(VlanId::new(20).unwrap());

        let reparsed = ArpFrame::try_from(arp_frame.frame()).unwrap();
        assert_eq!(reparsed.ethernet().vlan_id().id(), 20);
        assert_eq!(reparsed.operation(), Some(ArpOp::Reply));
        assert_eq!(
            reparsed.sender_ip_addr().unwrap(),
            IpAddress::new([192, 168, 0, 1])
        );
    }

    #[test]
    fn non_ipv4_protocol_address() {
        let arp_frame = ArpFrame::new(6, 16);
        assert!(arp_frame.sender_ip_addr().is_err());
    }
}
