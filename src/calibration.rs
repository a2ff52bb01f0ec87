/// Conversion of raw ADC readings into physical units

/// Convert a stem temperature probe reading to degrees Celsius
///
/// Cubic calibration polynomial from the TreeTalker firmware notes,
/// rounded to 2 decimal places. Valid for both probe pairs of the rev 3.1
/// and rev 3.2 data packets.
pub fn stem_temperature(measurement: f64) -> f64 {
    let celsius = 127.6 - (6.045e-3 * measurement) + (1.26e-7 * measurement.powi(2))
        - (1.15e-12 * measurement.powi(3));
    (celsius * 100.0).round() / 100.0
}

/// Battery voltage in millivolts for rev 3.2 packets
///
/// The node samples both the battery divider and the internal 1.1 V
/// bandgap reference, so the ratio cancels the ADC supply out.
pub fn battery_voltage_rev_3_2(adc_volt_bat: u32, adc_bandgap: u32) -> f64 {
    if adc_bandgap == 0 {
        return 0.0;
    }
    let millivolts = 1100.0 * 2.0 * (adc_volt_bat as f64 / adc_bandgap as f64);
    (millivolts * 10.0).round() / 10.0
}

/// Battery voltage in millivolts for rev 3.1 packets
///
/// Rev 3.1 reports a single pre-scaled reading in tenths of a millivolt.
pub fn battery_voltage_rev_3_1(voltage: u32) -> f64 {
    voltage as f64 / 10.0
}

/// Air temperature field is tenths of a degree Celsius
pub fn air_temperature(measurement: i16) -> f64 {
    measurement as f64 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_temperature_in_plausible_range() {
        // Probe reading from the rev 3.2 sample packet, roughly room temperature
        let celsius = stem_temperature(34167.0);
        assert!(celsius > 20.0 && celsius < 25.0, "got {}", celsius);
    }

    #[test]
    fn stem_temperature_is_rounded() {
        let celsius = stem_temperature(34167.0);
        assert_eq!((celsius * 100.0).round() / 100.0, celsius);
    }

    #[test]
    fn battery_voltage_rev_3_2_sample() {
        // adc_volt_bat/adc_bandgap pair from the rev 3.2 sample packet,
        // a healthy single-cell battery
        let millivolts = battery_voltage_rev_3_2(82757, 43585);
        assert!(millivolts > 4100.0 && millivolts < 4250.0, "got {}", millivolts);
    }

    #[test]
    fn battery_voltage_rev_3_2_zero_bandgap() {
        assert_eq!(battery_voltage_rev_3_2(82757, 0), 0.0);
    }

    #[test]
    fn battery_voltage_rev_3_1_scales_to_millivolts() {
        assert_eq!(battery_voltage_rev_3_1(41099), 4109.9);
    }

    #[test]
    fn air_temperature_tenths() {
        assert_eq!(air_temperature(203), 20.3);
        assert_eq!(air_temperature(-15), -1.5);
    }
}
