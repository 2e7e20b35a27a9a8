use crate::net::ConnectPoint;
use proxyarp_packets::{IpAddress, IpPrefix, MacAddr, VlanId};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Hosts are identified by the MAC address they use on a given VLAN.
#[derive(Eq, Clone, Copy, Hash, PartialEq, Debug)]
pub struct HostId {
    mac: MacAddr,
    vlan: VlanId,
}

impl HostId {
    pub fn new(mac: MacAddr, vlan: VlanId) -> Self {
        HostId { mac, vlan }
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    pub fn vlan(&self) -> VlanId {
        self.vlan
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mac, self.vlan)
    }
}

/// An end-station discovered by the host provider.
///
/// The address set has no defined order, so "the first address" of a multi-homed host is whichever the set
/// yields first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Host {
    id: HostId,
    ip_addresses: HashSet<IpAddress>,
    location: ConnectPoint,
}

impl Host {
    pub fn new<I>(id: HostId, ip_addresses: I, location: ConnectPoint) -> Self
    where
        I: IntoIterator<Item = IpAddress>,
    {
        Host {
            id,
            ip_addresses: ip_addresses.into_iter().collect(),
            location,
        }
    }

    pub fn id(&self) -> HostId {
        self.id
    }

    pub fn mac(&self) -> MacAddr {
        self.id.mac
    }

    pub fn vlan(&self) -> VlanId {
        self.id.vlan
    }

    pub fn ip_addresses(&self) -> &HashSet<IpAddress> {
        &self.ip_addresses
    }

    pub fn location(&self) -> &ConnectPoint {
        &self.location
    }
}

/// An address configured on an interface, together with the subnet it belongs to.
#[derive(Eq, Clone, Copy, Hash, PartialEq, PartialOrd, Ord, Debug)]
pub struct InterfaceIpAddress {
    ip_address: IpAddress,
    subnet_address: IpPrefix,
}

impl InterfaceIpAddress {
    pub fn new(ip_address: IpAddress, prefix_len: u8) -> Result<Self, &'static str> {
        Ok(InterfaceIpAddress {
            ip_address,
            subnet_address: IpPrefix::new(ip_address, prefix_len)?,
        })
    }

    pub fn ip_address(&self) -> IpAddress {
        self.ip_address
    }

    pub fn subnet_address(&self) -> IpPrefix {
        self.subnet_address
    }
}

impl FromStr for InterfaceIpAddress {
    type Err = &'static str;

    /// Parses `a.b.c.d/len`, keeping the host part of the address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, '/');
        let ip_address = parts.next().unwrap_or_default().parse::<IpAddress>()?;
        let prefix_len = parts
            .next()
            .ok_or("interface address is missing a prefix length")?
            .parse::<u8>()
            .map_err(|_| "interface address has an invalid prefix length")?;
        InterfaceIpAddress::new(ip_address, prefix_len)
    }
}

impl fmt::Display for InterfaceIpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip_address, self.subnet_address.prefix_len())
    }
}

/// Addressing an administrator has bound to a boundary port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortAddresses {
    connect_point: ConnectPoint,
    ip_addresses: BTreeSet<InterfaceIpAddress>,
    mac: MacAddr,
}

impl PortAddresses {
    pub fn new<I>(connect_point: ConnectPoint, ip_addresses: I, mac: MacAddr) -> Self
    where
        I: IntoIterator<Item = InterfaceIpAddress>,
    {
        PortAddresses {
            connect_point,
            ip_addresses: ip_addresses.into_iter().collect(),
            mac,
        }
    }

    pub fn connect_point(&self) -> &ConnectPoint {
        &self.connect_point
    }

    pub fn ip_addresses(&self) -> &BTreeSet<InterfaceIpAddress> {
        &self.ip_addresses
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }
}
