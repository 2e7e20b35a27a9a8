use std::convert::TryInto;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

#[derive(Eq, Clone, Copy, Hash, PartialEq, Debug)]
pub enum IpVersion {
    Inet,
    Inet6,
}

///
/// An IPv4 address value, stored in network byte order.
///
/// Ordering follows the unsigned integer value of the address, which for big-endian octets is the
/// same as comparing the octets lexicographically.
///
#[derive(Eq, Clone, Copy, Hash, PartialEq, PartialOrd, Ord)]
pub struct IpAddress {
    octets: [u8; 4],
}

impl IpAddress {
    pub const BYTE_LENGTH: usize = 4;
    pub const BIT_LENGTH: u8 = 32;

    pub fn new(octets: [u8; 4]) -> IpAddress {
        IpAddress { octets }
    }

    pub fn from_u32(value: u32) -> IpAddress {
        IpAddress::new(value.to_be_bytes())
    }

    /// Reads an address out of `bytes`, starting at `offset`.
    pub fn from_slice(bytes: &[u8], offset: usize) -> Result<IpAddress, &'static str> {
        if bytes.len() < IpAddress::BYTE_LENGTH {
            return Err("Invalid IPv4 address array: must be at least 4 bytes");
        }
        if offset > bytes.len() - IpAddress::BYTE_LENGTH {
            return Err("Invalid IPv4 address array: offset leaves fewer than 4 bytes");
        }

        let octets: [u8; 4] = bytes[offset..offset + IpAddress::BYTE_LENGTH]
            .try_into()
            .map_err(|_| "Invalid IPv4 address array")?;
        Ok(IpAddress::new(octets))
    }

    /// Network mask with the top `prefix_len` bits set.
    pub fn mask_prefix(prefix_len: u8) -> Result<IpAddress, &'static str> {
        if prefix_len > IpAddress::BIT_LENGTH {
            return Err("Invalid IPv4 prefix length: must be in the interval [0, 32]");
        }

        // A shift by the full width is not defined for u32
        let mask = u32::MAX
            .checked_shl(u32::from(IpAddress::BIT_LENGTH - prefix_len))
            .unwrap_or(0);
        Ok(IpAddress::from_u32(mask))
    }

    /// This address with every bit past `prefix_len` cleared.
    pub fn masked(&self, prefix_len: u8) -> Result<IpAddress, &'static str> {
        let mask = IpAddress::mask_prefix(prefix_len)?;
        Ok(IpAddress::from_u32(self.to_u32() & mask.to_u32()))
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::Inet
    }

    pub fn octets(&self) -> [u8; 4] {
        self.octets
    }

    pub fn to_u32(&self) -> u32 {
        u32::from_be_bytes(self.octets)
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddress::new(addr.octets())
    }
}

impl From<IpAddress> for Ipv4Addr {
    fn from(addr: IpAddress) -> Self {
        Ipv4Addr::from(addr.octets)
    }
}

impl FromStr for IpAddress {
    type Err = &'static str;

    /// Parses dotted-decimal notation, e.g. "10.0.0.1".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != IpAddress::BYTE_LENGTH {
            return Err("Malformed IPv4 address string: must have four decimal values separated by dots");
        }

        let mut octets = [0u8; 4];
        for (octet, part) in octets.iter_mut().zip(parts) {
            *octet = part
                .parse::<u8>()
                .map_err(|_| "Malformed IPv4 address string: each value must be in [0, 255]")?;
        }
        Ok(IpAddress::new(octets))
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.octets;
        write!(f, "{}.{}.{}.{}", o[0], o[1], o[2], o[3])
    }
}

impl fmt::Debug for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A subnet: the masked network address together with its prefix length.
#[derive(Eq, Clone, Copy, Hash, PartialEq, PartialOrd, Ord, Debug)]
pub struct IpPrefix {
    address: IpAddress,
    prefix_len: u8,
}

impl IpPrefix {
    pub fn new(address: IpAddress, prefix_len: u8) -> Result<IpPrefix, &'static str> {
        Ok(IpPrefix {
            address: address.masked(prefix_len)?,
            prefix_len,
        })
    }

    pub fn address(&self) -> IpAddress {
        self.address
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn contains(&self, addr: &IpAddress) -> bool {
        // prefix_len was validated on construction
        match addr.masked(self.prefix_len) {
            Ok(network) => network == self.address,
            Err(_) => false,
        }
    }
}

impl FromStr for IpPrefix {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '/');
        let address = parts.next().unwrap_or_default().parse::<IpAddress>()?;
        let prefix_len = parts
            .next()
            .ok_or("Malformed IPv4 prefix string: missing prefix length")?
            .parse::<u8>()
            .map_err(|_| "Malformed IPv4 prefix string: invalid prefix length")?;
        IpPrefix::new(address, prefix_len)
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}
