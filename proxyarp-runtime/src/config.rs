/// Runtime settings for driving a `ProxyArp` from its event and packet feeds.
///
/// Built the same way links are, starting from `new()` and chaining setters:
///
/// ```
/// use proxyarp_runtime::config::ProxyArpConfig;
///
/// let config = ProxyArpConfig::new().worker_threads(4).packet_queue_depth(1024);
/// assert_eq!(config.get_worker_threads(), 4);
/// assert_eq!(config.get_event_queue_depth(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxyArpConfig {
    worker_threads: usize,
    event_queue_depth: Option<usize>,
    packet_queue_depth: Option<usize>,
}

impl Default for ProxyArpConfig {
    fn default() -> Self {
        ProxyArpConfig::new()
    }
}

impl ProxyArpConfig {
    /// Two workers, one per feed, and unbounded queues.
    pub fn new() -> Self {
        ProxyArpConfig {
            worker_threads: 2,
            event_queue_depth: None,
            packet_queue_depth: None,
        }
    }

    /// Threads in the tokio runtime. Values below one are raised to one.
    pub fn worker_threads(self, worker_threads: usize) -> Self {
        ProxyArpConfig {
            worker_threads: worker_threads.max(1),
            ..self
        }
    }

    /// Bounds the topology event queue. Senders block while it is full.
    pub fn event_queue_depth(self, depth: usize) -> Self {
        ProxyArpConfig {
            event_queue_depth: Some(depth),
            ..self
        }
    }

    /// Bounds the packet-in queue. Senders block while it is full.
    pub fn packet_queue_depth(self, depth: usize) -> Self {
        ProxyArpConfig {
            packet_queue_depth: Some(depth),
            ..self
        }
    }

    pub fn get_worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn get_event_queue_depth(&self) -> Option<usize> {
        self.event_queue_depth
    }

    pub fn get_packet_queue_depth(&self) -> Option<usize> {
        self.packet_queue_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProxyArpConfig::default();
        assert_eq!(config.get_worker_threads(), 2);
        assert_eq!(config.get_event_queue_depth(), None);
        assert_eq!(config.get_packet_queue_depth(), None);
    }

    #[test]
    fn builder_sets_fields() {
        let config = ProxyArpConfig::new()
            .worker_threads(0)
            .event_queue_depth(16)
            .packet_queue_depth(0);
        assert_eq!(config.get_worker_threads(), 1);
        assert_eq!(config.get_event_queue_depth(), Some(16));
        assert_eq!(config.get_packet_queue_depth(), Some(0));
    }
}
