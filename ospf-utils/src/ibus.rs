//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};

use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::ip::AddressFamily;
use crate::southbound::{AddressMsg, InterfaceUpdateMsg, RouteKeyMsg, RouteMsg};

// Useful type definition(s).
pub type IbusReceiver = UnboundedReceiver<IbusMsg>;
pub type IbusSender = UnboundedSender<IbusMsg>;

/// Transmit channels for sending [`IbusMsg`] messages to each external
/// collaborator (interface feed, RIB client, routing core).
#[derive(Clone, Debug)]
pub struct IbusChannelsTx {
    subscriber: Option<IbusSubscriber>,
    routing: UnboundedSender<IbusMsg>,
    interface: UnboundedSender<IbusMsg>,
}

/// Receive channels for receiving [`IbusMsg`] messages from each external
/// collaborator.
#[derive(Debug)]
pub struct IbusChannelsRx {
    pub routing: UnboundedReceiver<IbusMsg>,
    pub interface: UnboundedReceiver<IbusMsg>,
}

/// Subscriber to [`IbusMsg`] messages.
#[derive(Clone, Debug)]
pub struct IbusSubscriber {
    /// Unique identifier for the subscriber.
    pub id: usize,
    /// Channel for sending messages to the subscriber.
    pub tx: IbusSender,
}

/// Ibus message for communication with the engine's external collaborators:
/// the interface feed and the RIB client.
#[derive(Clone, Debug)]
#[derive(Deserialize, Serialize)]
pub enum IbusMsg {
    /// Request a subscription to hostname update notifications.
    HostnameSub {
        #[serde(skip)]
        subscriber: Option<IbusSubscriber>,
    },
    /// Hostname update notification.
    HostnameUpdate(Option<String>),
    /// Request a subscription to interface update notifications, optionally
    /// filtered by interface name.
    InterfaceSub {
        #[serde(skip)]
        subscriber: Option<IbusSubscriber>,
        ifname: Option<String>,
        af: Option<AddressFamily>,
    },
    /// Cancel a previously requested subscription to interface updates.
    InterfaceUnsub {
        #[serde(skip)]
        subscriber: Option<IbusSubscriber>,
        ifname: Option<String>,
    },
    /// Interface update notification.
    InterfaceUpd(InterfaceUpdateMsg),
    /// Interface delete notification.
    InterfaceDel(String),
    /// Interface address addition notification.
    InterfaceAddressAdd(AddressMsg),
    /// Interface address delete notification.
    InterfaceAddressDel(AddressMsg),
    /// Request a subscription to Router ID update notifications.
    RouterIdSub {
        #[serde(skip)]
        subscriber: Option<IbusSubscriber>,
    },
    /// Router ID update notification.
    RouterIdUpdate(Option<Ipv4Addr>),
    /// Request to install an IPv4 route in the RIB.
    RouteIpAdd(RouteMsg),
    /// Request to uninstall an IPv4 route from the RIB.
    RouteIpDel(RouteKeyMsg),
    /// Requests a subscription to redistributed routes for a specific
    /// protocol.
    RouteRedistributeSub {
        #[serde(skip)]
        subscriber: Option<IbusSubscriber>,
        protocol: crate::protocol::Protocol,
        af: Option<AddressFamily>,
    },
    /// Cancel a previously requested subscription to redistributed routes.
    RouteRedistributeUnsub {
        #[serde(skip)]
        subscriber: Option<IbusSubscriber>,
        protocol: crate::protocol::Protocol,
        af: Option<AddressFamily>,
    },
    /// Route redistribute update notification.
    RouteRedistributeAdd(RouteMsg),
    /// Route redistribute delete notification.
    RouteRedistributeDel(RouteKeyMsg),
    /// Cancel all previously requested subscriptions.
    Disconnect {
        #[serde(skip)]
        subscriber: Option<IbusSubscriber>,
    },
}

// ===== impl IbusChannelsTx =====

impl IbusChannelsTx {
    /// Creates a new `IbusChannelsTx` with the provided subscriber.
    pub fn with_subscriber(
        tx: &IbusChannelsTx,
        subscriber_tx: UnboundedSender<IbusMsg>,
    ) -> Self {
        IbusChannelsTx {
            subscriber: Some(IbusSubscriber::new(subscriber_tx)),
            ..tx.clone()
        }
    }

    /// Sends an [`IbusMsg::HostnameSub`] message.
    pub fn hostname_sub(&self) {
        let msg = IbusMsg::HostnameSub {
            subscriber: self.subscriber.clone(),
        };
        let _ = self.interface.send(msg);
    }

    /// Sends an [`IbusMsg::InterfaceSub`] message.
    pub fn interface_sub(
        &self,
        ifname: Option<String>,
        af: Option<AddressFamily>,
    ) {
        let msg = IbusMsg::InterfaceSub {
            subscriber: self.subscriber.clone(),
            ifname,
            af,
        };
        let _ = self.interface.send(msg);
    }

    /// Sends an [`IbusMsg::InterfaceUnsub`] message.
    pub fn interface_unsub(&self, ifname: Option<String>) {
        let msg = IbusMsg::InterfaceUnsub {
            subscriber: self.subscriber.clone(),
            ifname,
        };
        let _ = self.interface.send(msg);
    }

    /// Sends an [`IbusMsg::RouterIdSub`] message.
    pub fn router_id_sub(&self) {
        let msg = IbusMsg::RouterIdSub {
            subscriber: self.subscriber.clone(),
        };
        let _ = self.interface.send(msg);
    }

    /// Sends an [`IbusMsg::RouteIpAdd`] message to the RIB client.
    pub fn route_ip_add(&self, route: RouteMsg) {
        let msg = IbusMsg::RouteIpAdd(route);
        let _ = self.routing.send(msg);
    }

    /// Sends an [`IbusMsg::RouteIpDel`] message to the RIB client.
    pub fn route_ip_del(&self, route: RouteKeyMsg) {
        let msg = IbusMsg::RouteIpDel(route);
        let _ = self.routing.send(msg);
    }

    /// Sends an [`IbusMsg::RouteRedistributeSub`] message.
    pub fn route_redistribute_sub(
        &self,
        protocol: crate::protocol::Protocol,
        af: Option<AddressFamily>,
    ) {
        let msg = IbusMsg::RouteRedistributeSub {
            subscriber: self.subscriber.clone(),
            protocol,
            af,
        };
        let _ = self.routing.send(msg);
    }

    /// Sends an [`IbusMsg::RouteRedistributeUnsub`] message.
    pub fn route_redistribute_unsub(
        &self,
        protocol: crate::protocol::Protocol,
        af: Option<AddressFamily>,
    ) {
        let msg = IbusMsg::RouteRedistributeUnsub {
            subscriber: self.subscriber.clone(),
            protocol,
            af,
        };
        let _ = self.routing.send(msg);
    }

    /// Sends an [`IbusMsg::Disconnect`] message to all collaborators.
    pub fn disconnect(&self) {
        for tx in &[&self.routing, &self.interface] {
            let msg = IbusMsg::Disconnect {
                subscriber: self.subscriber.clone(),
            };
            let _ = tx.send(msg);
        }
    }
}

// ===== impl IbusSubscriber =====

impl IbusSubscriber {
    fn new(tx: IbusSender) -> Self {
        static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
        IbusSubscriber {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            tx,
        }
    }
}

// ===== global functions =====

/// Creates the pair of Ibus communication channels used by the engine: one
/// toward the RIB client, one toward the interface feed.
pub fn ibus_channels() -> ((IbusChannelsTx, IbusChannelsTx), IbusChannelsRx) {
    let (routing_tx, routing_rx) = mpsc::unbounded_channel();
    let (interface_tx, interface_rx) = mpsc::unbounded_channel();

    let tx = IbusChannelsTx {
        subscriber: None,
        routing: routing_tx,
        interface: interface_tx,
    };
    let rx = IbusChannelsRx {
        routing: routing_rx,
        interface: interface_rx,
    };

    let tx_routing = IbusChannelsTx::with_subscriber(&tx, tx.routing.clone());
    let tx_interface =
        IbusChannelsTx::with_subscriber(&tx, tx.interface.clone());

    ((tx_routing, tx_interface), rx)
}
