mod calibration;
mod config;
mod database;
mod packets;
mod policy;
mod radio;

use log::{debug, error, info, warn};
use time::OffsetDateTime;

use calibration::{battery_voltage_rev_3_1, battery_voltage_rev_3_2};
use config::GatewayConfig;
use database::{
    recent_gravity_means, recent_voltages, store_data_rev31, store_data_rev32, store_light,
};
use packets::{TTAddress, TTPacket};
use policy::{DataObservation, DecisionEngine, NodeHistory};
use radio::RadioLink;

/// Fetch the recent archive rows the policy needs for one node
///
/// A missing history only degrades the decision to defaults, so fetch
/// failures are logged and swallowed.
async fn node_history(node: TTAddress, database_url: &str) -> NodeHistory {
    let voltages = match recent_voltages(node, database_url).await {
        Ok(voltages) => voltages,
        Err(e) => {
            warn!("Failed to fetch voltage history for {}: {}", node, e);
            Vec::new()
        }
    };
    let gravity_means = match recent_gravity_means(node, database_url).await {
        Ok(means) => means,
        Err(e) => {
            warn!("Failed to fetch gravity history for {}: {}", node, e);
            Vec::new()
        }
    };

    NodeHistory {
        voltages,
        gravity_means,
    }
}

async fn main_loop(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Starting TreeTalker gateway service as {}",
        config.gateway_address
    );

    let engine = DecisionEngine::new(config.gateway_address);
    let mut link = RadioLink::connect(
        &config.broker_host,
        config.broker_port,
        config.gateway_address,
    )
    .await?;

    loop {
        let packet = link.next_packet().await;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let reply = match &packet {
            TTPacket::Helo(p) => {
                info!(
                    "HELO #{} from node {} ({})",
                    p.packet_number,
                    p.sender,
                    config.node_name(p.sender)
                );
                Some(engine.on_helo(p, now))
            }
            TTPacket::DataRev31(p) => {
                let name = config.node_name(p.sender);
                info!(
                    "Data packet rev 3.1 #{} from node {} ({})",
                    p.packet_number, p.sender, name
                );

                if let Err(e) = store_data_rev31(p, &name, &config.database_url).await {
                    error!("Failed to archive data from {}: {}", p.sender, e);
                } else {
                    info!("Archived data from node {}", p.sender);
                }

                let observation = DataObservation {
                    sender: p.sender,
                    air_temperature: p.air_temperature,
                    gravity_mean: (p.gravity_x_mean, p.gravity_y_mean, p.gravity_z_mean),
                    battery_millivolts: battery_voltage_rev_3_1(p.voltage),
                };
                let history = node_history(p.sender, &config.database_url).await;
                let (_, reply) = engine.on_data(&observation, &history, now);
                Some(reply)
            }
            TTPacket::DataRev32(p) => {
                let name = config.node_name(p.sender);
                info!(
                    "Data packet rev 3.2 #{} from node {} ({})",
                    p.packet_number, p.sender, name
                );

                if let Err(e) = store_data_rev32(p, &name, &config.database_url).await {
                    error!("Failed to archive data from {}: {}", p.sender, e);
                } else {
                    info!("Archived data from node {}", p.sender);
                }

                let observation = DataObservation {
                    sender: p.sender,
                    air_temperature: p.air_temperature,
                    gravity_mean: (p.gravity_x_mean, p.gravity_y_mean, p.gravity_z_mean),
                    battery_millivolts: battery_voltage_rev_3_2(p.adc_volt_bat, p.adc_bandgap),
                };
                let history = node_history(p.sender, &config.database_url).await;
                let (_, reply) = engine.on_data(&observation, &history, now);
                Some(reply)
            }
            TTPacket::LightSensor(p) => {
                let name = config.node_name(p.sender);
                info!(
                    "Light sensor packet #{} from node {} ({})",
                    p.packet_number, p.sender, name
                );

                if let Err(e) = store_light(p, &name, &config.database_url).await {
                    error!("Failed to archive light data from {}: {}", p.sender, e);
                } else {
                    info!("Archived light data from node {}", p.sender);
                }

                Some(engine.on_light(p, now))
            }
            // Gateway-originated types looping back over the broker
            TTPacket::CloudHelo(_) | TTPacket::Command1(_) | TTPacket::Command2(_) => {
                debug!("Ignoring echoed packet type {}", packet.packet_type());
                None
            }
        };

        if let Some(reply) = reply {
            if let Err(e) = link.send_reply(&reply).await {
                error!("Failed to queue reply for {}: {}", reply.receiver(), e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match GatewayConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
