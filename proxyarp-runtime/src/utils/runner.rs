use crate::config::ProxyArpConfig;
use crate::event::{TopologyEvent, TopologyListener};
use crate::proxy::ProxyArp;
use crate::service::{PacketContext, PacketService, TopologyService};
use crate::Result;
use crossbeam::channel::{self, Receiver, Sender};
use futures::future;
use std::sync::Arc;
use tokio::runtime;
use tokio::task;
use tracing::{debug, warn};

/// The sending halves of the two feeds. Dropping both closes the feeds and lets the runner return.
pub struct FeedSenders {
    pub events: Sender<TopologyEvent>,
    pub packets: Sender<PacketContext>,
}

pub struct FeedReceivers {
    pub events: Receiver<TopologyEvent>,
    pub packets: Receiver<PacketContext>,
}

/// How much work the runner did before its feeds closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub packets: usize,
}

/// Creates the event and packet feeds, bounded or not depending on the config.
pub fn channels(config: &ProxyArpConfig) -> (FeedSenders, FeedReceivers) {
    let (event_sender, event_receiver) = match config.get_event_queue_depth() {
        Some(depth) => channel::bounded(depth),
        None => channel::unbounded(),
    };
    let (packet_sender, packet_receiver) = match config.get_packet_queue_depth() {
        Some(depth) => channel::bounded(depth),
        None => channel::unbounded(),
    };

    (
        FeedSenders {
            events: event_sender,
            packets: packet_sender,
        },
        FeedReceivers {
            events: event_receiver,
            packets: packet_receiver,
        },
    )
}

/// Runner drives an initialized proxy from both feeds until both are closed.
///
/// Each feed gets its own worker on a multi-threaded tokio runtime, so topology events and packets are
/// processed concurrently, just as the controller would deliver them. A packet the proxy rejects is logged and
/// skipped; it does not stop the worker.
pub fn runner<T, P>(
    config: &ProxyArpConfig,
    proxy: Arc<ProxyArp<T, P>>,
    feeds: FeedReceivers,
) -> Result<RunSummary>
where
    T: TopologyService + 'static,
    P: PacketService + 'static,
{
    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(config.get_worker_threads())
        .build()?;

    let FeedReceivers { events, packets } = feeds;
    let (events, packets) = runtime.block_on(async move {
        let event_proxy = proxy.clone();
        let event_worker = task::spawn_blocking(move || drain_events(&*event_proxy, events));
        let packet_worker = task::spawn_blocking(move || drain_packets(&*proxy, packets));

        future::try_join(event_worker, packet_worker).await
    })?;

    debug!(events, packets, "feeds closed");
    Ok(RunSummary { events, packets })
}

fn drain_events<L: TopologyListener>(listener: &L, events: Receiver<TopologyEvent>) -> usize {
    let mut count = 0;
    for event in events.iter() {
        listener.event(&event);
        count += 1;
    }
    count
}

fn drain_packets<T, P>(proxy: &ProxyArp<T, P>, packets: Receiver<PacketContext>) -> usize
where
    T: TopologyService,
    P: PacketService,
{
    let mut count = 0;
    for mut context in packets.iter() {
        if let Err(error) = proxy.handle_arp(&mut context) {
            warn!(%error, in_port = %context.in_packet().received_from(), "dropping packet");
        }
        count += 1;
    }
    count
}
