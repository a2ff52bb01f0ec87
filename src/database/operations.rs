/// Archive operations: one row per measurement group, mirroring what the
/// sensors report, raw readings next to their calibrated values
use time::OffsetDateTime;

use crate::calibration;
use crate::database::connection::execute_with_retry;
use crate::packets::{DataPacketRev31, DataPacketRev32, LightSensorPacket, TTAddress};

/// How far back the policy queries look
const ANALYSIS_WINDOW_DAYS: i64 = 2;

/// Store a rev 3.1 data packet across the measurement tables
pub async fn store_data_rev31(
    packet: &DataPacketRev31,
    node_name: &str,
    database_url: &str,
) -> Result<(), String> {
    let packet = packet.clone();
    let node = packet.sender.0 as i64;
    let name = node_name.to_string();
    let time = OffsetDateTime::now_utc();
    let millivolts = calibration::battery_voltage_rev_3_1(packet.voltage);

    execute_with_retry(database_url, move |client| {
        let packet = packet.clone();
        let name = name.clone();
        async move {
            let mut client = client;
            let transaction = client.transaction().await?;
            transaction
                .execute(
                    "INSERT INTO stem_temperature(node, name, heating, reference_cold, reference_hot, heat_cold, heat_hot, \
                     reference_cold_celsius, reference_hot_celsius, heat_cold_celsius, heat_hot_celsius, time)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
                    &[
                        &node,
                        &name,
                        &false,
                        &(packet.temperature_reference_cold as i64),
                        &(packet.temperature_reference_hot as i64),
                        &(packet.temperature_heat_cold as i64),
                        &(packet.temperature_heat_hot as i64),
                        &calibration::stem_temperature(packet.temperature_reference_cold as f64),
                        &calibration::stem_temperature(packet.temperature_reference_hot as f64),
                        &calibration::stem_temperature(packet.temperature_heat_cold as f64),
                        &calibration::stem_temperature(packet.temperature_heat_hot as f64),
                        &time,
                    ],
                )
                .await?;
            transaction
                .execute(
                    "INSERT INTO growth(node, name, distance, time) VALUES ($1, $2, $3, $4)",
                    &[&node, &name, &(packet.growth_sensor as i64), &time],
                )
                .await?;
            transaction
                .execute(
                    "INSERT INTO power(node, name, voltage_raw, bandgap, millivolts, time)
                     VALUES ($1, $2, $3, $4, $5, $6)",
                    &[
                        &node,
                        &name,
                        &(packet.voltage as i64),
                        &Option::<i64>::None,
                        &millivolts,
                        &time,
                    ],
                )
                .await?;
            transaction
                .execute(
                    "INSERT INTO stem_water(node, name, content, time) VALUES ($1, $2, $3, $4)",
                    &[&node, &name, &(packet.moisture as i64), &time],
                )
                .await?;
            transaction
                .execute(
                    "INSERT INTO air(node, name, temperature, humidity, time)
                     VALUES ($1, $2, $3, $4, $5)",
                    &[
                        &node,
                        &name,
                        &calibration::air_temperature(packet.air_temperature),
                        &(packet.air_relative_humidity as i32),
                        &time,
                    ],
                )
                .await?;
            store_gravity(
                &transaction,
                node,
                &name,
                (
                    packet.gravity_x_mean,
                    packet.gravity_x_derivation,
                    packet.gravity_y_mean,
                    packet.gravity_y_derivation,
                    packet.gravity_z_mean,
                    packet.gravity_z_derivation,
                ),
                time,
            )
            .await?;
            transaction.commit().await
        }
    })
    .await
}

/// Store a rev 3.2 data packet across the measurement tables
pub async fn store_data_rev32(
    packet: &DataPacketRev32,
    node_name: &str,
    database_url: &str,
) -> Result<(), String> {
    let packet = packet.clone();
    let node = packet.sender.0 as i64;
    let name = node_name.to_string();
    let time = OffsetDateTime::now_utc();
    let millivolts =
        calibration::battery_voltage_rev_3_2(packet.adc_volt_bat, packet.adc_bandgap);

    execute_with_retry(database_url, move |client| {
        let packet = packet.clone();
        let name = name.clone();
        async move {
            let mut client = client;
            let transaction = client.transaction().await?;
            transaction
                .execute(
                    "INSERT INTO stem_temperature(node, name, heating, reference_cold, reference_hot, heat_cold, heat_hot, \
                     reference_cold_celsius, reference_hot_celsius, heat_cold_celsius, heat_hot_celsius, time)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
                    &[
                        &node,
                        &name,
                        &true,
                        &(packet.temperature_reference.0 as i64),
                        &(packet.temperature_reference.1 as i64),
                        &(packet.temperature_heat.0 as i64),
                        &(packet.temperature_heat.1 as i64),
                        &calibration::stem_temperature(packet.temperature_reference.0 as f64),
                        &calibration::stem_temperature(packet.temperature_reference.1 as f64),
                        &calibration::stem_temperature(packet.temperature_heat.0 as f64),
                        &calibration::stem_temperature(packet.temperature_heat.1 as f64),
                        &time,
                    ],
                )
                .await?;
            transaction
                .execute(
                    "INSERT INTO growth(node, name, distance, time) VALUES ($1, $2, $3, $4)",
                    &[&node, &name, &(packet.growth_sensor as i64), &time],
                )
                .await?;
            transaction
                .execute(
                    "INSERT INTO power(node, name, voltage_raw, bandgap, millivolts, time)
                     VALUES ($1, $2, $3, $4, $5, $6)",
                    &[
                        &node,
                        &name,
                        &(packet.adc_volt_bat as i64),
                        &Some(packet.adc_bandgap as i64),
                        &millivolts,
                        &time,
                    ],
                )
                .await?;
            transaction
                .execute(
                    "INSERT INTO stem_water(node, name, content, time) VALUES ($1, $2, $3, $4)",
                    &[&node, &name, &(packet.stem_water_content as i64), &time],
                )
                .await?;
            transaction
                .execute(
                    "INSERT INTO air(node, name, temperature, humidity, time)
                     VALUES ($1, $2, $3, $4, $5)",
                    &[
                        &node,
                        &name,
                        &calibration::air_temperature(packet.air_temperature),
                        &(packet.air_relative_humidity as i32),
                        &time,
                    ],
                )
                .await?;
            store_gravity(
                &transaction,
                node,
                &name,
                (
                    packet.gravity_x_mean,
                    packet.gravity_x_derivation,
                    packet.gravity_y_mean,
                    packet.gravity_y_derivation,
                    packet.gravity_z_mean,
                    packet.gravity_z_derivation,
                ),
                time,
            )
            .await?;
            transaction.commit().await
        }
    })
    .await
}

async fn store_gravity(
    transaction: &tokio_postgres::Transaction<'_>,
    node: i64,
    name: &str,
    gravity: (i16, i16, i16, i16, i16, i16),
    time: OffsetDateTime,
) -> Result<u64, tokio_postgres::Error> {
    transaction
        .execute(
            "INSERT INTO gravity(node, name, x_mean, x_derivation, y_mean, y_derivation, z_mean, z_derivation, time)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            &[
                &node,
                &name,
                &(gravity.0 as i32),
                &(gravity.1 as i32),
                &(gravity.2 as i32),
                &(gravity.3 as i32),
                &(gravity.4 as i32),
                &(gravity.5 as i32),
                &time,
            ],
        )
        .await
}

/// Store the twelve spectrometer channels of a light-sensor packet
pub async fn store_light(
    packet: &LightSensorPacket,
    node_name: &str,
    database_url: &str,
) -> Result<(), String> {
    let packet = packet.clone();
    let node = packet.sender.0 as i64;
    let name = node_name.to_string();
    let time = OffsetDateTime::now_utc();

    execute_with_retry(database_url, move |client| {
        let packet = packet.clone();
        let name = name.clone();
        async move {
            client
                .execute(
                    "INSERT INTO light(node, name, \
                     as7263_610, as7263_680, as7263_730, as7263_760, as7263_810, as7263_860, \
                     as7262_450, as7262_500, as7262_550, as7262_570, as7262_600, as7262_650, \
                     integration_time, gain, time)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
                    &[
                        &node,
                        &name,
                        &(packet.as7263[0] as f64),
                        &(packet.as7263[1] as f64),
                        &(packet.as7263[2] as f64),
                        &(packet.as7263[3] as f64),
                        &(packet.as7263[4] as f64),
                        &(packet.as7263[5] as f64),
                        &(packet.as7262[0] as f64),
                        &(packet.as7262[1] as f64),
                        &(packet.as7262[2] as f64),
                        &(packet.as7262[3] as f64),
                        &(packet.as7262[4] as f64),
                        &(packet.as7262[5] as f64),
                        &(packet.integration_time as i32),
                        &(packet.gain as i32),
                        &time,
                    ],
                )
                .await?;
            Ok(())
        }
    })
    .await
}

/// Battery voltages of one node inside the analysis window, oldest first
pub async fn recent_voltages(
    node: TTAddress,
    database_url: &str,
) -> Result<Vec<(i64, f64)>, String> {
    let node = node.0 as i64;
    let cutoff = OffsetDateTime::now_utc() - time::Duration::days(ANALYSIS_WINDOW_DAYS);

    execute_with_retry(database_url, move |client| async move {
        let rows = client
            .query(
                "SELECT time, millivolts FROM power WHERE node = $1 AND time > $2 ORDER BY time",
                &[&node, &cutoff],
            )
            .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let time: OffsetDateTime = row.get(0);
                let millivolts: f64 = row.get(1);
                (time.unix_timestamp(), millivolts)
            })
            .collect())
    })
    .await
}

/// Gravity axis means of one node inside the analysis window
pub async fn recent_gravity_means(
    node: TTAddress,
    database_url: &str,
) -> Result<Vec<(f64, f64, f64)>, String> {
    let node = node.0 as i64;
    let cutoff = OffsetDateTime::now_utc() - time::Duration::days(ANALYSIS_WINDOW_DAYS);

    execute_with_retry(database_url, move |client| async move {
        let rows = client
            .query(
                "SELECT x_mean, y_mean, z_mean FROM gravity WHERE node = $1 AND time > $2",
                &[&node, &cutoff],
            )
            .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let x: i32 = row.get(0);
                let y: i32 = row.get(1);
                let z: i32 = row.get(2);
                (x as f64, y as f64, z as f64)
            })
            .collect())
    })
    .await
}
