/// Per-packet decision engine
///
/// Every telemetry packet is answered with a command packet that retunes
/// the node. The sleep interval follows the battery trend; anomalies drop
/// it to the minimum so the node reports more often while something looks
/// wrong.
use log::{debug, info};

use crate::calibration;
use crate::packets::{
    CloudHeloPacket, Command1Packet, Command2Packet, HeloPacket, LightSensorPacket, TTAddress,
    TTPacket,
};

pub const COMMAND_CLOUD_HELO: u8 = 190;
pub const COMMAND_DATA_REPLY: u8 = 32;
pub const COMMAND_LIGHT_REPLY: u8 = 33;

const SLEEP_INTERVAL_MIN: f64 = 300.0;
const SLEEP_INTERVAL_MAX: f64 = 7200.0;
const SLEEP_INTERVAL_DEFAULT: f64 = 600.0;
const HEATING_SECS: u16 = 30;
const TIME_SLOT_LENGTH: u8 = 45;
const TIME_SLOT: u8 = 1;
const INTEGRATION_TIME: u8 = 50;
const GAIN: u8 = 3;

/// Reaction strength of the battery policy
const RDE: f64 = 1.0;
/// Standard deviations a gravity mean may stray from the node's history
const CONFIDENCE: f64 = 3.0;
/// Air temperature above this many degrees Celsius is an anomaly
const CRITICAL_AIR_TEMPERATURE: f64 = 50.0;
/// Sleep intervals steer towards keeping the battery above this level
const VOLTAGE_FLOOR_MILLIVOLTS: f64 = 3700.0;
/// How far ahead the battery trend is extrapolated
const PREDICTION_HORIZON_SECS: i64 = 48 * 3600;

/// The policy-relevant view of a data packet, same for both revisions
#[derive(Debug, Clone)]
pub struct DataObservation {
    pub sender: TTAddress,
    pub air_temperature: i16,
    pub gravity_mean: (i16, i16, i16),
    pub battery_millivolts: f64,
}

/// Recent archived readings of one node, fetched before evaluation
#[derive(Debug, Clone, Default)]
pub struct NodeHistory {
    /// (epoch seconds, millivolts)
    pub voltages: Vec<(i64, f64)>,
    /// (x, y, z) gravity means
    pub gravity_means: Vec<(f64, f64, f64)>,
}

pub struct DecisionEngine {
    address: TTAddress,
}

impl DecisionEngine {
    pub fn new(address: TTAddress) -> Self {
        DecisionEngine { address }
    }

    /// Greet a waking node and hand it the current time
    pub fn on_helo(&self, packet: &HeloPacket, now: i64) -> TTPacket {
        TTPacket::CloudHelo(CloudHeloPacket {
            receiver: packet.sender,
            sender: self.address,
            command: COMMAND_CLOUD_HELO,
            time: now as u32,
        })
    }

    /// Evaluate a data packet against the node's history
    ///
    /// Returns whether an anomaly was found together with the reply.
    pub fn on_data(
        &self,
        observation: &DataObservation,
        history: &NodeHistory,
        now: i64,
    ) -> (bool, TTPacket) {
        let air_anomaly = air_temperature_anomaly(observation.air_temperature);
        let position_anomaly =
            position_anomaly(&history.gravity_means, observation.gravity_mean);
        let anomaly = air_anomaly || position_anomaly;

        let sleep_interval = if anomaly {
            info!(
                "Anomaly for node {}: [air: {}, position: {}]",
                observation.sender, air_anomaly, position_anomaly
            );
            SLEEP_INTERVAL_MIN as u16
        } else {
            battery_sleep_interval(
                &history.voltages,
                now,
                observation.battery_millivolts,
            )
        };

        debug!(
            "Sleep interval for node {}: {}s",
            observation.sender, sleep_interval
        );

        let reply = TTPacket::Command1(Command1Packet {
            receiver: observation.sender,
            sender: self.address,
            command: COMMAND_DATA_REPLY,
            time: now as u32,
            sleep_interval,
            unknown: 0,
            heating: HEATING_SECS,
            time_slot_length: TIME_SLOT_LENGTH,
            time_slot: TIME_SLOT,
        });

        (anomaly, reply)
    }

    /// Keep the spectrometer at the default integration time and gain
    pub fn on_light(&self, packet: &LightSensorPacket, now: i64) -> TTPacket {
        TTPacket::Command2(Command2Packet {
            receiver: packet.sender,
            sender: self.address,
            command: COMMAND_LIGHT_REPLY,
            time: now as u32,
            integration_time: INTEGRATION_TIME,
            gain: GAIN,
        })
    }
}

fn air_temperature_anomaly(air_temperature: i16) -> bool {
    calibration::air_temperature(air_temperature) >= CRITICAL_AIR_TEMPERATURE
}

/// Any axis mean straying more than CONFIDENCE standard deviations from
/// the node's recent history counts as a position change (fallen tree,
/// tilted mount). Too little history means no verdict.
fn position_anomaly(history: &[(f64, f64, f64)], observed: (i16, i16, i16)) -> bool {
    if history.len() < 2 {
        debug!("Only {} historical gravity readings", history.len());
        return false;
    }

    let xs: Vec<f64> = history.iter().map(|g| g.0).collect();
    let ys: Vec<f64> = history.iter().map(|g| g.1).collect();
    let zs: Vec<f64> = history.iter().map(|g| g.2).collect();

    axis_anomaly(&xs, observed.0 as f64)
        || axis_anomaly(&ys, observed.1 as f64)
        || axis_anomaly(&zs, observed.2 as f64)
}

fn axis_anomaly(values: &[f64], observed: f64) -> bool {
    let mean = mean(values);
    let stdev = stdev(values, mean);
    (observed - mean).abs() > stdev * CONFIDENCE
}

/// Derive the next sleep interval from the battery voltage trend
///
/// Fits a line through the recent voltages plus the fresh reading and
/// extrapolates 48 hours ahead: the further the prediction falls below
/// the floor, the longer the node is told to sleep.
fn battery_sleep_interval(voltages: &[(i64, f64)], now: i64, current_millivolts: f64) -> u16 {
    let mut points: Vec<(f64, f64)> = voltages
        .iter()
        .map(|&(t, mv)| (t as f64, mv))
        .collect();
    points.push((now as f64, current_millivolts));

    let (slope, intercept) = match linear_regression(&points) {
        Some(fit) => fit,
        None => return SLEEP_INTERVAL_DEFAULT as u16,
    };

    let predicted = slope * ((now + PREDICTION_HORIZON_SECS) as f64) + intercept;
    debug!(
        "Battery fit: slope {:.6}, predicted {:.1} mV",
        slope, predicted
    );

    let interval =
        SLEEP_INTERVAL_DEFAULT + RDE * (VOLTAGE_FLOOR_MILLIVOLTS - predicted);
    interval.clamp(SLEEP_INTERVAL_MIN, SLEEP_INTERVAL_MAX) as u16
}

/// Least-squares fit, None for fewer than two points or a degenerate x range
pub fn linear_regression(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn stdev(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATEWAY: TTAddress = TTAddress(0xc2030118);
    const NODE: TTAddress = TTAddress(0x52030152);

    fn observation() -> DataObservation {
        DataObservation {
            sender: NODE,
            air_temperature: 203,
            gravity_mean: (0, 10, 1000),
            battery_millivolts: 4100.0,
        }
    }

    fn steady_gravity() -> Vec<(f64, f64, f64)> {
        vec![
            (1.0, 9.0, 1002.0),
            (-2.0, 11.0, 998.0),
            (0.0, 10.0, 1001.0),
            (2.0, 12.0, 999.0),
        ]
    }

    #[test]
    fn helo_gets_cloud_helo_with_time() {
        let engine = DecisionEngine::new(GATEWAY);
        let helo = HeloPacket {
            receiver: GATEWAY,
            sender: NODE,
            packet_number: 1,
        };

        let reply = engine.on_helo(&helo, 1615386706);
        match reply {
            TTPacket::CloudHelo(p) => {
                assert_eq!(p.receiver, NODE);
                assert_eq!(p.sender, GATEWAY);
                assert_eq!(p.command, COMMAND_CLOUD_HELO);
                assert_eq!(p.time, 1615386706);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn quiet_node_gets_default_reply_fields() {
        let engine = DecisionEngine::new(GATEWAY);
        let history = NodeHistory {
            voltages: Vec::new(),
            gravity_means: steady_gravity(),
        };

        let (anomaly, reply) = engine.on_data(&observation(), &history, 1615386764);
        assert!(!anomaly);
        match reply {
            TTPacket::Command1(p) => {
                assert_eq!(p.command, COMMAND_DATA_REPLY);
                assert_eq!(p.heating, 30);
                assert_eq!(p.time_slot_length, 45);
                // no voltage history -> single-point fit is degenerate
                assert_eq!(p.sleep_interval, 600);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn hot_air_is_an_anomaly() {
        let engine = DecisionEngine::new(GATEWAY);
        let mut hot = observation();
        hot.air_temperature = 512; // 51.2 degrees

        let (anomaly, reply) = engine.on_data(&hot, &NodeHistory::default(), 0);
        assert!(anomaly);
        match reply {
            TTPacket::Command1(p) => assert_eq!(p.sleep_interval, 300),
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn position_change_is_an_anomaly() {
        let engine = DecisionEngine::new(GATEWAY);
        let mut tilted = observation();
        tilted.gravity_mean = (500, 10, 800);
        let history = NodeHistory {
            voltages: Vec::new(),
            gravity_means: steady_gravity(),
        };

        let (anomaly, _) = engine.on_data(&tilted, &history, 0);
        assert!(anomaly);
    }

    #[test]
    fn draining_battery_lengthens_sleep() {
        // 100 mV lost over two days, prediction keeps falling
        let day = 86400;
        let voltages = vec![(0, 3800.0), (day, 3750.0)];
        let interval = battery_sleep_interval(&voltages, 2 * day, 3700.0);
        assert!(interval > 600, "got {}", interval);
    }

    #[test]
    fn full_battery_shortens_sleep() {
        let day = 86400;
        let voltages = vec![(0, 4150.0), (day, 4150.0)];
        let interval = battery_sleep_interval(&voltages, 2 * day, 4150.0);
        assert_eq!(interval, 300);
    }

    #[test]
    fn regression_recovers_a_line() {
        let points = vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
        let (slope, intercept) = linear_regression(&points).unwrap();
        assert!((slope - 2.0).abs() < 1e-9);
        assert!((intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn regression_rejects_degenerate_input() {
        assert!(linear_regression(&[(1.0, 2.0)]).is_none());
        assert!(linear_regression(&[(1.0, 2.0), (1.0, 4.0)]).is_none());
    }

    #[test]
    fn light_reply_uses_defaults() {
        let engine = DecisionEngine::new(GATEWAY);
        let packet = LightSensorPacket {
            receiver: GATEWAY,
            sender: NODE,
            packet_number: 3,
            timestamp: 14400,
            as7263: [0.0; 6],
            as7262: [0.0; 6],
            integration_time: 40,
            gain: 1,
        };

        match engine.on_light(&packet, 1615389065) {
            TTPacket::Command2(p) => {
                assert_eq!(p.command, COMMAND_LIGHT_REPLY);
                assert_eq!(p.integration_time, 50);
                assert_eq!(p.gain, 3);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }
}
