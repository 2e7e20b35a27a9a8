use std::convert::TryFrom;
use std::fmt;

/// The common datatype that all packet structures share to represent their data
pub type PacketData = Vec<u8>;

pub const IPV4_ETHER_TYPE: u16 = 0x0800;
pub const ARP_ETHER_TYPE: u16 = 0x0806;
pub const VLAN_ETHER_TYPE: u16 = 0x8100;

// Most significant byte is 0th
#[derive(Eq, Clone, Copy, Hash, PartialEq, PartialOrd, Ord, Default)]
pub struct MacAddr {
    pub bytes: [u8; 6],
}

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr { bytes: [0xff; 6] };

    pub fn new(bytes: [u8; 6]) -> MacAddr {
        MacAddr { bytes }
    }

    pub fn is_broadcast(&self) -> bool {
        *self == MacAddr::BROADCAST
    }
}

impl TryFrom<&[u8]> for MacAddr {
    type Error = &'static str;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 6]>::try_from(bytes)
            .map(MacAddr::new)
            .map_err(|_| "MAC address must be exactly 6 bytes")
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bytes;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// 802.1Q VLAN identifier. Untagged traffic carries `VlanId::NONE`.
#[derive(Eq, Clone, Copy, Hash, PartialEq, PartialOrd, Ord, Debug)]
pub struct VlanId(u16);

impl VlanId {
    pub const NONE: VlanId = VlanId(0xffff);
    pub const MAX: u16 = 4095;

    pub fn new(id: u16) -> Result<VlanId, &'static str> {
        if id > VlanId::MAX {
            return Err("VLAN id must be in the interval [0, 4095]");
        }
        Ok(VlanId(id))
    }

    pub fn is_none(&self) -> bool {
        *self == VlanId::NONE
    }

    pub fn id(&self) -> u16 {
        self.0
    }
}

impl Default for VlanId {
    fn default() -> Self {
        VlanId::NONE
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "None")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
