use crate::net::{Device, Link, Port};

/// A device or link lifecycle notification from the topology provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyEvent {
    DeviceAdded(Device),
    DeviceUpdated(Device),
    DeviceRemoved(Device),
    DeviceAvailabilityChanged(Device),
    DeviceMastershipChanged(Device),
    DeviceSuspended(Device),
    PortAdded(Device, Port),
    PortUpdated(Device, Port),
    PortRemoved(Device, Port),
    LinkAdded(Link),
    LinkUpdated(Link),
    LinkRemoved(Link),
}

impl TopologyEvent {
    /// Short name of the event kind, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            TopologyEvent::DeviceAdded(_) => "DEVICE_ADDED",
            TopologyEvent::DeviceUpdated(_) => "DEVICE_UPDATED",
            TopologyEvent::DeviceRemoved(_) => "DEVICE_REMOVED",
            TopologyEvent::DeviceAvailabilityChanged(_) => "DEVICE_AVAILABILITY_CHANGED",
            TopologyEvent::DeviceMastershipChanged(_) => "DEVICE_MASTERSHIP_CHANGED",
            TopologyEvent::DeviceSuspended(_) => "DEVICE_SUSPENDED",
            TopologyEvent::PortAdded(..) => "PORT_ADDED",
            TopologyEvent::PortUpdated(..) => "PORT_UPDATED",
            TopologyEvent::PortRemoved(..) => "PORT_REMOVED",
            TopologyEvent::LinkAdded(_) => "LINK_ADDED",
            TopologyEvent::LinkUpdated(_) => "LINK_UPDATED",
            TopologyEvent::LinkRemoved(_) => "LINK_REMOVED",
        }
    }
}

/// Receives topology events. Implementations must tolerate concurrent delivery.
pub trait TopologyListener {
    fn event(&self, event: &TopologyEvent);
}
