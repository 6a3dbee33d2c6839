//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::future::Future;

use derive_new::new;
use ospf_utils::ibus::{IbusChannelsTx, IbusMsg, IbusReceiver};
use ospf_utils::protocol::Protocol;
#[cfg(feature = "testing")]
use tokio::sync::mpsc;
#[cfg(feature = "testing")]
use tokio::sync::mpsc::Sender;

/// A trait for protocol instances.
///
/// This is the seam between the generic engine scaffolding below (channel
/// plumbing, event loop) and the OSPF-specific instance logic in
/// `instance::Instance`.
pub trait ProtocolInstance
where
    Self: Send,
{
    /// Protocol type.
    const PROTOCOL: Protocol;

    type ProtocolInputMsg: Send + std::fmt::Debug;
    #[cfg(feature = "testing")]
    type ProtocolOutputMsg: Send + std::fmt::Debug;
    type ProtocolInputChannelsTx;
    type ProtocolInputChannelsRx: MessageReceiver<Self::ProtocolInputMsg>;

    /// Creates the protocol instance.
    fn new(name: String, shared: InstanceShared, tx: InstanceChannelsTx<Self>) -> Self;

    /// Optional protocol instance initialization routine.
    fn init(&mut self) {}

    /// Optional protocol instance shutdown routine.
    fn shutdown(self) {}

    /// Processes an ibus message.
    fn process_ibus_msg(&mut self, msg: IbusMsg);

    /// Processes a protocol message.
    fn process_protocol_msg(&mut self, msg: Self::ProtocolInputMsg);

    /// Creates the channels for all protocol input events.
    fn protocol_input_channels()
    -> (Self::ProtocolInputChannelsTx, Self::ProtocolInputChannelsRx);
}

/// Data shared among all protocol instances hosted by the same process.
#[derive(Clone, Debug, Default)]
pub struct InstanceShared {
    /// System hostname, as learned through the southbound channel.
    pub hostname: Option<String>,
}

/// Instance output channels.
#[derive(Debug, new)]
pub struct InstanceChannelsTx<P: ProtocolInstance + ?Sized> {
    /// Southbound (RIB-client) channel.
    pub sb: IbusChannelsTx,
    /// Protocol-specific input channels.
    pub protocol_input: P::ProtocolInputChannelsTx,
    #[cfg(feature = "testing")]
    pub protocol_output: Sender<P::ProtocolOutputMsg>,
}

/// Instance input channels.
#[derive(Debug, new)]
pub struct InstanceChannelsRx<P: ProtocolInstance + ?Sized> {
    /// Southbound (RIB-client) channel.
    pub sb: IbusReceiver,
    /// Protocol-specific input channels.
    pub protocol_input: P::ProtocolInputChannelsRx,
}

/// A receiver able to wait for the next message of its associated protocol
/// input channel set (a `tokio::select!` over however many underlying
/// channels make up the protocol's input events).
pub trait MessageReceiver<T: Send>
where
    Self: Send,
{
    fn recv(&mut self) -> impl Future<Output = Option<T>> + Send;
}

// ===== helper functions =====

async fn event_loop<P>(
    instance: &mut P,
    mut rx: InstanceChannelsRx<P>,
) where
    P: ProtocolInstance,
{
    loop {
        tokio::select! {
            biased;
            msg = rx.sb.recv() => {
                match msg {
                    Some(msg) => instance.process_ibus_msg(msg),
                    None => return,
                }
            }
            msg = rx.protocol_input.recv() => {
                match msg {
                    Some(msg) => instance.process_protocol_msg(msg),
                    None => return,
                }
            }
        }
    }
}

async fn run<P>(
    name: String,
    sb_tx: IbusChannelsTx,
    sb_rx: IbusReceiver,
    shared: InstanceShared,
) where
    P: ProtocolInstance,
{
    // Start protocol channels.
    let (proto_input_tx, proto_input_rx) = P::protocol_input_channels();
    #[cfg(feature = "testing")]
    let (proto_output_tx, _proto_output_rx) = mpsc::channel(4);

    // Create instance Tx/Rx channels.
    let instance_tx = InstanceChannelsTx::new(
        sb_tx.clone(),
        proto_input_tx,
        #[cfg(feature = "testing")]
        proto_output_tx,
    );
    let instance_rx = InstanceChannelsRx::new(sb_rx, proto_input_rx);

    // Create protocol instance.
    let mut instance = P::new(name, shared, instance_tx);
    instance.init();

    // Run event loop.
    event_loop(&mut instance, instance_rx).await;

    // Cancel southbound subscriptions.
    sb_tx.disconnect();

    // Ensure instance is shut down before exiting.
    instance.shutdown();
}

// ===== global functions =====

/// Spawns a protocol instance as a background task, returning as soon as the
/// task has been scheduled.
pub fn spawn_protocol_task<P>(
    name: String,
    sb_tx: &IbusChannelsTx,
    sb_instance_tx: ospf_utils::ibus::IbusSender,
    sb_instance_rx: IbusReceiver,
    shared: InstanceShared,
) where
    P: ProtocolInstance + 'static,
{
    let sb_tx = IbusChannelsTx::with_subscriber(sb_tx, sb_instance_tx);
    let fut = async move {
        run::<P>(name, sb_tx, sb_instance_rx, shared).await;
    };

    // In production, processing individual events may take longer than is
    // appropriate for async tasks. To avoid starving other tasks on the
    // cooperative scheduler, protocol instances are spawned as blocking
    // tasks backed by OS threads, relying on the OS for preemptive
    // scheduling.
    #[cfg(not(feature = "testing"))]
    tokio::task::spawn_blocking(|| {
        tokio::runtime::Handle::current().block_on(fut)
    });
    #[cfg(feature = "testing")]
    tokio::spawn(fut);
}
