use crate::classifier::Classifier;
use crate::event::{TopologyEvent, TopologyListener};
use crate::net::{ConnectPoint, Device, Link, Port};
use crate::service::TopologyService;
use crate::state::{PortState, PortTable};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Keeps the Internal/External partition of every port in step with the topology.
///
/// `initialize` must run once before events are delivered. After that the classifier only changes in
/// response to events, which may arrive from any thread.
pub struct PortClassifier<T: TopologyService> {
    topology: Arc<T>,
    ports: PortTable,
}

impl<T: TopologyService> PortClassifier<T> {
    pub fn new(topology: Arc<T>) -> Self {
        PortClassifier {
            topology,
            ports: PortTable::new(),
        }
    }

    /// Rebuilds the partition from the provider: every enabled port starts External, then both ends of every
    /// link become Internal.
    #[instrument(level = "debug", skip(self))]
    pub fn initialize(&self) {
        let enabled_ports: Vec<ConnectPoint> = self
            .topology
            .devices()
            .iter()
            .flat_map(|device| {
                self.topology
                    .ports(device.id())
                    .into_iter()
                    .filter(Port::is_enabled)
                    .map(move |port| ConnectPoint::new(device.id().clone(), port.number()))
            })
            .collect();

        self.ports.rebuild(enabled_ports, self.topology.links());

        info!(
            internal = self.ports.snapshot(PortState::Internal).len(),
            external = self.ports.snapshot(PortState::External).len(),
            "port classification initialized"
        );
    }

    pub fn link_added(&self, link: &Link) {
        self.ports.move_to_internal(&link.endpoints());
    }

    pub fn link_removed(&self, link: &Link) {
        self.ports.move_to_external(&link.endpoints());
    }

    /// Only the presence of a link matters, not its attributes.
    pub fn link_updated(&self, _link: &Link) {}

    pub fn device_removed(&self, device: &Device) {
        self.ports.remove_device(device.id());
    }

    /// A newly enabled port is treated as an edge port until a link shows up on it. Disabled ports are left
    /// alone; only removal clears them.
    pub fn port_added(&self, device: &Device, port: &Port) {
        if port.is_enabled() {
            self.ports
                .move_to_external(&[ConnectPoint::new(device.id().clone(), port.number())]);
        }
    }

    pub fn port_updated(&self, device: &Device, port: &Port) {
        self.port_added(device, port)
    }

    pub fn port_removed(&self, device: &Device, port: &Port) {
        self.ports
            .remove_port(&ConnectPoint::new(device.id().clone(), port.number()));
    }

    /// Whether an administrator has bound at least one address to this port. This does not look at the
    /// partition at all.
    pub fn is_outside_port(&self, point: &ConnectPoint) -> bool {
        self.topology
            .address_bindings_for_port(point)
            .map_or(false, |bindings| !bindings.ip_addresses().is_empty())
    }

    /// Consistent snapshot of every External port, for flooding.
    pub fn external_ports(&self) -> Vec<ConnectPoint> {
        self.ports.snapshot(PortState::External)
    }

    pub fn is_internal(&self, point: &ConnectPoint) -> bool {
        self.ports.is_internal(point)
    }

    pub fn port_table(&self) -> &PortTable {
        &self.ports
    }
}

impl<T: TopologyService> Classifier for PortClassifier<T> {
    type Subject = ConnectPoint;
    type Class = Option<PortState>;

    fn classify(&self, point: &Self::Subject) -> Self::Class {
        self.ports.state(point)
    }
}

impl<T: TopologyService> TopologyListener for PortClassifier<T> {
    fn event(&self, event: &TopologyEvent) {
        debug!(kind = event.kind(), "topology event");
        match event {
            TopologyEvent::LinkAdded(link) => self.link_added(link),
            TopologyEvent::LinkRemoved(link) => self.link_removed(link),
            TopologyEvent::LinkUpdated(link) => self.link_updated(link),
            TopologyEvent::DeviceRemoved(device) => self.device_removed(device),
            TopologyEvent::PortAdded(device, port) => self.port_added(device, port),
            TopologyEvent::PortUpdated(device, port) => self.port_updated(device, port),
            TopologyEvent::PortRemoved(device, port) => self.port_removed(device, port),
            // Nothing to do; ports are learned when they or their links are reported
            TopologyEvent::DeviceAdded(_)
            | TopologyEvent::DeviceUpdated(_)
            | TopologyEvent::DeviceAvailabilityChanged(_)
            | TopologyEvent::DeviceMastershipChanged(_)
            | TopologyEvent::DeviceSuspended(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{DeviceId, InterfaceIpAddress, PortAddresses, PortNumber};
    use crate::utils::test::topology::StaticTopology;
    use maplit::btreeset;
    use proxyarp_packets::MacAddr;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cp(device: &str, port: u64) -> ConnectPoint {
        ConnectPoint::new(DeviceId::new(device), PortNumber::new(port))
    }

    fn device(id: &str) -> Device {
        Device::new(DeviceId::new(id))
    }

    fn port(number: u64, enabled: bool) -> Port {
        Port::new(PortNumber::new(number), enabled)
    }

    /// D1 has P1 (unlinked) and P2 (linked to D2:P1).
    fn two_switches() -> Arc<StaticTopology> {
        let topology = StaticTopology::new();
        topology.add_device(device("d1"), vec![port(1, true), port(2, true)]);
        topology.add_device(device("d2"), vec![port(1, true), port(2, true)]);
        topology.add_link(Link::new(cp("d1", 2), cp("d2", 1)));
        Arc::new(topology)
    }

    fn assert_disjoint<T: TopologyService>(classifier: &PortClassifier<T>, devices: &[&str]) {
        for id in devices {
            let id = DeviceId::new(*id);
            let internal = classifier.port_table().ports(&id, PortState::Internal);
            let external = classifier.port_table().ports(&id, PortState::External);
            assert!(internal.is_disjoint(&external));
        }
    }

    #[test]
    fn initialize_classifies_linked_ports_internal() {
        let classifier = PortClassifier::new(two_switches());
        classifier.initialize();

        let d1 = DeviceId::new("d1");
        let table = classifier.port_table();
        assert_eq!(table.ports(&d1, PortState::Internal), btreeset! {PortNumber::new(2)});
        assert_eq!(table.ports(&d1, PortState::External), btreeset! {PortNumber::new(1)});
        assert_eq!(classifier.external_ports(), vec![cp("d1", 1), cp("d2", 2)]);
    }

    #[test]
    fn initialize_skips_disabled_ports() {
        let topology = StaticTopology::new();
        topology.add_device(device("d1"), vec![port(1, true), port(2, false)]);
        let classifier = PortClassifier::new(Arc::new(topology));
        classifier.initialize();

        assert_eq!(classifier.classify(&cp("d1", 1)), Some(PortState::External));
        assert_eq!(classifier.classify(&cp("d1", 2)), None);
    }

    #[test]
    fn link_events_move_both_endpoints() {
        let classifier = PortClassifier::new(two_switches());
        classifier.initialize();

        let link = Link::new(cp("d1", 1), cp("d2", 2));
        classifier.event(&TopologyEvent::LinkAdded(link.clone()));
        assert!(classifier.is_internal(&cp("d1", 1)));
        assert!(classifier.is_internal(&cp("d2", 2)));
        assert!(classifier.external_ports().is_empty());

        classifier.event(&TopologyEvent::LinkUpdated(link.clone()));
        assert!(classifier.is_internal(&cp("d1", 1)));

        classifier.event(&TopologyEvent::LinkRemoved(link));
        assert_eq!(classifier.external_ports(), vec![cp("d1", 1), cp("d2", 2)]);
        assert_disjoint(&classifier, &["d1", "d2"]);
    }

    #[test]
    fn device_removal_clears_its_ports() {
        let classifier = PortClassifier::new(two_switches());
        classifier.initialize();

        classifier.event(&TopologyEvent::DeviceRemoved(device("d1")));
        assert_eq!(classifier.classify(&cp("d1", 1)), None);
        assert_eq!(classifier.classify(&cp("d1", 2)), None);
        assert!(classifier.is_internal(&cp("d2", 1)));
    }

    #[test]
    fn port_events() {
        let classifier = PortClassifier::new(two_switches());
        classifier.initialize();

        // Re-enabling a linked port makes it an edge port until the link is reported again
        classifier.event(&TopologyEvent::PortUpdated(device("d1"), port(2, true)));
        assert_eq!(classifier.classify(&cp("d1", 2)), Some(PortState::External));

        classifier.event(&TopologyEvent::PortAdded(device("d1"), port(7, true)));
        assert_eq!(classifier.classify(&cp("d1", 7)), Some(PortState::External));

        // Disabled ports are left as they are
        classifier.event(&TopologyEvent::PortAdded(device("d1"), port(8, false)));
        assert_eq!(classifier.classify(&cp("d1", 8)), None);
        classifier.event(&TopologyEvent::PortUpdated(device("d1"), port(7, false)));
        assert_eq!(classifier.classify(&cp("d1", 7)), Some(PortState::External));

        classifier.event(&TopologyEvent::PortRemoved(device("d1"), port(7, false)));
        assert_eq!(classifier.classify(&cp("d1", 7)), None);
    }

    #[test]
    fn device_lifecycle_events_are_ignored() {
        let classifier = PortClassifier::new(two_switches());
        classifier.initialize();
        let before = classifier.external_ports();

        for event in vec![
            TopologyEvent::DeviceAdded(device("d3")),
            TopologyEvent::DeviceUpdated(device("d1")),
            TopologyEvent::DeviceAvailabilityChanged(device("d1")),
            TopologyEvent::DeviceMastershipChanged(device("d1")),
            TopologyEvent::DeviceSuspended(device("d2")),
        ] {
            classifier.event(&event);
        }

        assert_eq!(classifier.external_ports(), before);
        assert!(classifier.is_internal(&cp("d1", 2)));
    }

    #[test]
    fn outside_port_needs_configured_addresses() {
        let topology = two_switches();
        topology.add_address_binding(PortAddresses::new(
            cp("d1", 1),
            vec!["192.168.1.1/24".parse::<InterfaceIpAddress>().unwrap()],
            MacAddr::new([0, 0, 0, 0, 0, 0xaa]),
        ));
        topology.add_address_binding(PortAddresses::new(
            cp("d2", 2),
            vec![],
            MacAddr::new([0, 0, 0, 0, 0, 0xbb]),
        ));
        let classifier = PortClassifier::new(topology);

        // Independent of the partition, so it works before initialization too
        assert!(classifier.is_outside_port(&cp("d1", 1)));
        assert!(!classifier.is_outside_port(&cp("d2", 2)));
        assert!(!classifier.is_outside_port(&cp("d1", 2)));
    }

    fn random_link_events(rng: &mut StdRng, count: usize) -> Vec<TopologyEvent> {
        (0..count)
            .map(|_| {
                let link = Link::new(
                    cp(&format!("d{}", rng.gen_range(0..4)), rng.gen_range(1..5)),
                    cp(&format!("d{}", rng.gen_range(0..4)), rng.gen_range(1..5)),
                );
                if rng.gen_bool(0.6) {
                    TopologyEvent::LinkAdded(link)
                } else {
                    TopologyEvent::LinkRemoved(link)
                }
            })
            .collect()
    }

    fn grid_topology() -> Arc<StaticTopology> {
        let topology = StaticTopology::new();
        for d in 0..4 {
            topology.add_device(
                device(&format!("d{}", d)),
                (1..5).map(|p| port(p, true)).collect(),
            );
        }
        Arc::new(topology)
    }

    #[test]
    fn replaying_link_events_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let events = random_link_events(&mut rng, 50);

            let first = PortClassifier::new(grid_topology());
            let second = PortClassifier::new(grid_topology());
            first.initialize();
            second.initialize();
            for event in events.iter() {
                first.event(event);
            }
            for event in events.iter() {
                second.event(event);
            }

            assert_eq!(
                first.port_table().snapshot(PortState::Internal),
                second.port_table().snapshot(PortState::Internal)
            );
            assert_eq!(first.external_ports(), second.external_ports());
        }
    }

    #[test]
    fn partition_stays_disjoint_under_random_events() {
        let mut rng = StdRng::seed_from_u64(7);
        let classifier = PortClassifier::new(grid_topology());
        classifier.initialize();

        for event in random_link_events(&mut rng, 200) {
            classifier.event(&event);
            assert_disjoint(&classifier, &["d0", "d1", "d2", "d3"]);
        }
    }

    #[test]
    fn concurrent_link_flaps_never_split_a_link() {
        let classifier = Arc::new(PortClassifier::new(grid_topology()));
        classifier.initialize();
        let link = Link::new(cp("d0", 1), cp("d1", 1));

        let writer = {
            let classifier = classifier.clone();
            let link = link.clone();
            std::thread::spawn(move || {
                for _ in 0..500 {
                    classifier.event(&TopologyEvent::LinkAdded(link.clone()));
                    classifier.event(&TopologyEvent::LinkRemoved(link.clone()));
                }
            })
        };

        for _ in 0..500 {
            let external = classifier.external_ports();
            assert_eq!(
                external.contains(link.src()),
                external.contains(link.dst())
            );
        }
        writer.join().unwrap();
    }
}
