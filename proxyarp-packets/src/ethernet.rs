use crate::*;
use std::convert::TryFrom;

const HEADER_LEN: usize = 14;
const VLAN_TAG_LEN: usize = 4;
const TAG_RANGE: (usize, usize) = (12, 16);

#[derive(Clone, Debug)]
pub struct EthernetFrame {
    pub data: PacketData,
    pub payload_offset: usize,
}

impl EthernetFrame {
    pub fn from_buffer(frame: PacketData) -> Result<EthernetFrame, &'static str> {
        // Ethernet II frames must be at least the header, which is 14bytes
        // 0                    6                    12                      14
        // |---6 byte Dest_MAC--|---6 byte Src_MAC---|--2 Byte EtherType---|
        // An 802.1Q tag sits between the source MAC and the EtherType:
        // 12                   14                   16                      18
        // |---2 byte TPID------|---2 byte TCI-------|--2 Byte EtherType---|

        if frame.len() < HEADER_LEN {
            return Err("Frame is less than the minimum of 14 bytes");
        }

        let tpid = u16::from_be_bytes([frame[12], frame[13]]);
        let payload_offset = if tpid == VLAN_ETHER_TYPE {
            if frame.len() < HEADER_LEN + VLAN_TAG_LEN {
                return Err("VLAN tagged frame is less than the minimum of 18 bytes");
            }
            HEADER_LEN + VLAN_TAG_LEN
        } else {
            HEADER_LEN
        };

        Ok(EthernetFrame {
            data: frame,
            payload_offset,
        })
    }

    /// Returns an empty, untagged EthernetFrame where all values are populated with zero.
    pub fn empty() -> EthernetFrame {
        EthernetFrame {
            data: vec![0; HEADER_LEN],
            payload_offset: HEADER_LEN,
        }
    }

    pub fn dest_mac(&self) -> MacAddr {
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&self.data[0..6]);
        MacAddr::new(bytes)
    }

    pub fn src_mac(&self) -> MacAddr {
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&self.data[6..12]);
        MacAddr::new(bytes)
    }

    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        self.data[..6].copy_from_slice(&mac.bytes);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        self.data[6..12].copy_from_slice(&mac.bytes);
    }

    pub fn is_vlan_tagged(&self) -> bool {
        self.payload_offset == HEADER_LEN + VLAN_TAG_LEN
    }

    pub fn vlan_id(&self) -> VlanId {
        if !self.is_vlan_tagged() {
            return VlanId::NONE;
        }
        let tci = u16::from_be_bytes([self.data[14], self.data[15]]);
        // 12 bits always fit
        VlanId::new(tci & 0x0fff).unwrap_or(VlanId::NONE)
    }

    /// Tags, retags or untags the frame. Priority bits of an existing tag are kept.
    pub fn set_vlan_id(&mut self, vlan: VlanId) {
        let (start, end) = TAG_RANGE;
        match (self.is_vlan_tagged(), vlan.is_none()) {
            (false, true) => {}
            (true, true) => {
                self.data.drain(start..end);
                self.payload_offset -= VLAN_TAG_LEN;
            }
            (true, false) => {
                let tci = u16::from_be_bytes([self.data[14], self.data[15]]);
                let tci = (tci & 0xf000) | vlan.id();
                self.data[14..16].copy_from_slice(&tci.to_be_bytes());
            }
            (false, false) => {
                let mut tag = [0u8; VLAN_TAG_LEN];
                tag[..2].copy_from_slice(&VLAN_ETHER_TYPE.to_be_bytes());
                tag[2..].copy_from_slice(&vlan.id().to_be_bytes());
                self.data.splice(start..start, tag.iter().cloned());
                self.payload_offset += VLAN_TAG_LEN;
            }
        }
    }

    pub fn ether_type(&self) -> u16 {
        let offset = self.payload_offset - 2;
        u16::from_be_bytes([self.data[offset], self.data[offset + 1]])
    }

    pub fn set_ether_type(&mut self, ether_type: u16) {
        let offset = self.payload_offset - 2;
        self.data[offset..self.payload_offset].copy_from_slice(&ether_type.to_be_bytes());
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[self.payload_offset..]
    }

    pub fn payload_mut(&mut self) -> &mut [u8] {
        let offset = self.payload_offset;
        &mut self.data[offset..]
    }

    pub fn set_payload(&mut self, payload: &[u8]) {
        self.data.truncate(self.payload_offset);
        self.data.reserve_exact(payload.len());
        self.data.extend_from_slice(payload);
    }

    /// The frame as it goes out on the wire.
    pub fn serialize(&self) -> PacketData {
        self.data.clone()
    }
}

/// EthernetFrames are considered the same if they have the same bytes.
impl PartialEq for EthernetFrame {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for EthernetFrame {}

impl TryFrom<&[u8]> for EthernetFrame {
    type Error = &'static str;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        EthernetFrame::from_buffer(bytes.to_vec())
    }
}

impl TryFrom<PacketData> for EthernetFrame {
    type Error = &'static str;

    fn try_from(data: PacketData) -> Result<Self, Self::Error> {
        EthernetFrame::from_buffer(data)
    }
}

impl From<EthernetFrame> for PacketData {
    fn from(frame: EthernetFrame) -> Self {
        frame.data
    }
}
