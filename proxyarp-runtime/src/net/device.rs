use std::fmt;

/// Opaque identity of an infrastructure device, e.g. `of:0000000000000001`.
#[derive(Eq, Clone, Hash, PartialEq, PartialOrd, Ord, Debug)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        DeviceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Eq, Clone, Copy, Hash, PartialEq, PartialOrd, Ord, Debug)]
pub struct PortNumber(u64);

impl PortNumber {
    pub fn new(number: u64) -> Self {
        PortNumber(number)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PortNumber {
    fn from(number: u64) -> Self {
        PortNumber(number)
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a frame enters or leaves the network: a port on a particular device.
#[derive(Eq, Clone, Hash, PartialEq, PartialOrd, Ord, Debug)]
pub struct ConnectPoint {
    device_id: DeviceId,
    port: PortNumber,
}

impl ConnectPoint {
    pub fn new(device_id: DeviceId, port: PortNumber) -> Self {
        ConnectPoint { device_id, port }
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn port(&self) -> PortNumber {
        self.port
    }
}

impl fmt::Display for ConnectPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.port)
    }
}

#[derive(Eq, Clone, Hash, PartialEq, Debug)]
pub struct Device {
    id: DeviceId,
}

impl Device {
    pub fn new(id: DeviceId) -> Self {
        Device { id }
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }
}

#[derive(Eq, Clone, Copy, Hash, PartialEq, Debug)]
pub struct Port {
    number: PortNumber,
    enabled: bool,
}

impl Port {
    pub fn new(number: PortNumber, enabled: bool) -> Self {
        Port { number, enabled }
    }

    pub fn number(&self) -> PortNumber {
        self.number
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
