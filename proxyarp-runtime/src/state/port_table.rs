use crate::net::{ConnectPoint, DeviceId, Link, PortNumber};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Where a port sits relative to the fabric.
#[derive(Eq, Clone, Copy, Hash, PartialEq, Debug)]
pub enum PortState {
    /// At least one live link ends on this port.
    Internal,
    /// No live link ends on this port. It may or may not face a configured boundary.
    External,
}

type Table = BTreeMap<DeviceId, BTreeMap<PortNumber, PortState>>;

/// The Internal/External partition of every known port.
///
/// Each port has exactly one state, so the two sets can never overlap. Every mutation runs under the write
/// lock as one unit, and every snapshot under the read lock, so both ends of a link always move together.
pub struct PortTable {
    table: RwLock<Table>,
}

impl Default for PortTable {
    fn default() -> Self {
        PortTable::new()
    }
}

impl PortTable {
    /// Creates a new empty PortTable
    pub fn new() -> Self {
        PortTable {
            table: RwLock::new(BTreeMap::new()),
        }
    }

    /// Throws away the current partition and rebuilds it: every given port starts out External, then each link
    /// endpoint that is one of those ports becomes Internal.
    pub fn rebuild<P, L>(&self, ports: P, links: L)
    where
        P: IntoIterator<Item = ConnectPoint>,
        L: IntoIterator<Item = Link>,
    {
        let mut table = self.write();
        table.clear();
        for point in ports {
            set(&mut table, &point, PortState::External);
        }
        for link in links {
            for point in link.endpoints().iter() {
                if let Some(state) = lookup_mut(&mut table, point) {
                    *state = PortState::Internal;
                }
            }
        }
    }

    /// Marks every given point Internal in one step.
    pub fn move_to_internal(&self, points: &[ConnectPoint]) {
        let mut table = self.write();
        for point in points {
            set(&mut table, point, PortState::Internal);
        }
    }

    /// Marks every given point External in one step.
    pub fn move_to_external(&self, points: &[ConnectPoint]) {
        let mut table = self.write();
        for point in points {
            set(&mut table, point, PortState::External);
        }
    }

    pub fn remove_device(&self, device: &DeviceId) {
        self.write().remove(device);
    }

    pub fn remove_port(&self, point: &ConnectPoint) {
        let mut table = self.write();
        if let Some(ports) = table.get_mut(point.device_id()) {
            ports.remove(&point.port());
            if ports.is_empty() {
                table.remove(point.device_id());
            }
        }
    }

    pub fn state(&self, point: &ConnectPoint) -> Option<PortState> {
        self.read()
            .get(point.device_id())
            .and_then(|ports| ports.get(&point.port()))
            .cloned()
    }

    pub fn is_internal(&self, point: &ConnectPoint) -> bool {
        self.state(point) == Some(PortState::Internal)
    }

    /// Point-in-time list of every port in the given state, ordered by device then port.
    pub fn snapshot(&self, wanted: PortState) -> Vec<ConnectPoint> {
        self.read()
            .iter()
            .flat_map(|(device, ports)| {
                ports
                    .iter()
                    .filter(move |(_, state)| **state == wanted)
                    .map(move |(port, _)| ConnectPoint::new(device.clone(), *port))
            })
            .collect()
    }

    /// The ports of one device that are in the given state.
    pub fn ports(&self, device: &DeviceId, wanted: PortState) -> BTreeSet<PortNumber> {
        self.read()
            .get(device)
            .map(|ports| {
                ports
                    .iter()
                    .filter(|(_, state)| **state == wanted)
                    .map(|(port, _)| *port)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.read().values().map(|ports| ports.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every writer replaces whole entries, so a poisoned lock still guards a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn set(table: &mut Table, point: &ConnectPoint, state: PortState) {
    table
        .entry(point.device_id().clone())
        .or_insert_with(BTreeMap::new)
        .insert(point.port(), state);
}

fn lookup_mut<'a>(table: &'a mut Table, point: &ConnectPoint) -> Option<&'a mut PortState> {
    table
        .get_mut(point.device_id())
        .and_then(|ports| ports.get_mut(&point.port()))
}
