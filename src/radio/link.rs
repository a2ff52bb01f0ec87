/// MQTT bridge to the LoRa radio frontend
///
/// The SX127x frontend on the Raspberry Pi publishes every received frame
/// base64-encoded on `receive/<node-address>` and transmits whatever is
/// published on `command/<gateway-address>`. This module hides the broker
/// plumbing behind a receive/reply pair.
use base64::prelude::*;
use log::{debug, error, warn};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::time::{sleep, Duration};

use crate::packets::{TTAddress, TTPacket};

const KEEP_ALIVE_SECS: u64 = 30;
const RECONNECT_WAIT_SECS: u64 = 1;
const EVENT_CAPACITY: usize = 10;
const RECEIVE_TOPICS: &str = "receive/#";

/// The broker holds no subscriptions for a fresh clean session, so every
/// acknowledged (re)connect must be answered with a new SUBSCRIBE
fn connection_acknowledged(event: &Event) -> bool {
    matches!(event, Event::Incoming(Packet::ConnAck(_)))
}

pub struct RadioLink {
    client: AsyncClient,
    event_loop: EventLoop,
    command_topic: String,
}

impl RadioLink {
    /// Connect to the broker
    ///
    /// The receive subscription is issued from the poll loop on every
    /// CONNACK, so it also survives broker-side reconnects.
    pub async fn connect(
        host: &str,
        port: u16,
        gateway_address: TTAddress,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut options = MqttOptions::new("ttcloud", host, port);
        options.set_keep_alive(Duration::from_secs(KEEP_ALIVE_SECS));

        let (client, event_loop) = AsyncClient::new(options, EVENT_CAPACITY);

        Ok(RadioLink {
            client,
            event_loop,
            command_topic: format!("command/{}", gateway_address),
        })
    }

    /// Wait for the next valid packet from the radio
    ///
    /// Broker hiccups and undecodable payloads are logged and skipped, the
    /// loop never gives up on the link.
    pub async fn next_packet(&mut self) -> TTPacket {
        loop {
            let event = match self.event_loop.poll().await {
                Ok(event) => event,
                Err(e) => {
                    error!("MQTT connection error: {}", e);
                    sleep(Duration::from_secs(RECONNECT_WAIT_SECS)).await;
                    continue;
                }
            };

            if connection_acknowledged(&event) {
                debug!("Broker acknowledged connection, subscribing");
                if let Err(e) = self.client.subscribe(RECEIVE_TOPICS, QoS::AtMostOnce).await {
                    error!("Failed to subscribe to {}: {}", RECEIVE_TOPICS, e);
                }
                continue;
            }

            let publish = match event {
                Event::Incoming(Packet::Publish(publish)) => publish,
                other => {
                    debug!("MQTT notification: {:?}", other);
                    continue;
                }
            };

            let raw = match BASE64_STANDARD.decode(&publish.payload) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "Undecodable base64 payload on {}: {}",
                        publish.topic, e
                    );
                    continue;
                }
            };

            match TTPacket::unmarshal(&raw) {
                Ok(packet) => {
                    debug!("Received packet on {}: {:?}", publish.topic, packet);
                    return packet;
                }
                Err(e) => {
                    warn!("Unparsable frame on {}: {}", publish.topic, e);
                }
            }
        }
    }

    /// Hand a reply packet to the radio for transmission
    pub async fn send_reply(&self, packet: &TTPacket) -> Result<(), Box<dyn std::error::Error>> {
        let payload = BASE64_STANDARD.encode(packet.marshal());
        self.client
            .publish(&self.command_topic, QoS::AtLeastOnce, false, payload)
            .await?;
        debug!("Queued reply for {}: {:?}", packet.receiver(), packet);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rumqttc::{ConnAck, ConnectReturnCode};

    #[test]
    fn connack_triggers_subscription() {
        let event = Event::Incoming(Packet::ConnAck(ConnAck {
            session_present: false,
            code: ConnectReturnCode::Success,
        }));
        assert!(connection_acknowledged(&event));
    }

    #[test]
    fn other_events_leave_subscription_alone() {
        assert!(!connection_acknowledged(&Event::Incoming(Packet::PingResp)));
        assert!(!connection_acknowledged(&Event::Outgoing(
            rumqttc::Outgoing::PingReq
        )));
    }
}
