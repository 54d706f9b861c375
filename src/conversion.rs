//! Raw ratio code to resistance and temperature conversion.
//!
//! The chip reports the RTD resistance as a 15-bit fraction of the reference
//! resistor. Two independent conversions of that code are provided: the
//! Callendar-Van Dusen solution most front-end libraries use, and a direct
//! polynomial fit carried over from PT100 lookup practice. Both can be run on
//! the same reading and cross-checked against each other.

use libm::sqrtf;

// Callendar-Van Dusen coefficients for standard platinum elements.
const CVD_A: f32 = 3.9083e-3;
const CVD_B: f32 = -5.775e-7;

// Full-scale divisor of the 15-bit ratio code.
const RATIO_SCALE: f32 = 32768.0;

/// A converted measurement together with its intermediate quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Ratio of RTD resistance to the reference resistor, in `[0, 1)`.
    pub ratio: f32,
    /// RTD resistance in ohms.
    pub resistance: f32,
    /// Temperature in degrees Celsius.
    pub temperature: f32,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Measurement {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Measurement {{ ratio: {}, resistance: {} ohm, temperature: {} C }}",
            self.ratio,
            self.resistance,
            self.temperature
        );
    }
}

/// Converts a raw ratio code with the Callendar-Van Dusen equation.
///
/// Above 0 °C the quadratic form is solved directly. Below 0 °C the equation
/// has no closed-form inverse and a fifth-order polynomial in the normalized
/// resistance is evaluated instead; the direct solution doubles as the branch
/// test, so the polynomial never runs for non-negative temperatures.
pub fn callendar_van_dusen(raw: u16, ref_resistor: f32, rtd_nominal: f32) -> Measurement {
    let ratio = raw as f32 / RATIO_SCALE;
    let resistance = ratio * ref_resistor;

    let z1 = -CVD_A;
    let z2 = CVD_A * CVD_A - 4.0 * CVD_B;
    let z3 = 4.0 * CVD_B / rtd_nominal;
    let z4 = 2.0 * CVD_B;

    let mut temperature = (sqrtf(z2 + z3 * resistance) + z1) / z4;
    if temperature < 0.0 {
        // The polynomial is fitted on a 100 ohm basis.
        let normalized = resistance / rtd_nominal * 100.0;
        let mut power = normalized;

        temperature = -242.02;
        temperature += 2.2228 * power;
        power *= normalized;
        temperature += 2.5859e-3 * power;
        power *= normalized;
        temperature -= 4.8260e-6 * power;
        power *= normalized;
        temperature -= 2.8183e-8 * power;
        power *= normalized;
        temperature += 1.5243e-10 * power;
    }

    Measurement {
        ratio,
        resistance,
        temperature,
    }
}

/// Converts a raw ratio code with the direct PT100 polynomial fit.
///
/// The fit is anchored at 100 ohms by construction and reads temperature off
/// the absolute resistance, so for elements other than PT100 its output
/// diverges from [`callendar_van_dusen`]. Above the anchor two terms are
/// evaluated, at or below it four.
pub fn pt100_polynomial(raw: u16, ref_resistor: f32) -> Measurement {
    let ratio = raw as f32 / RATIO_SCALE;
    let resistance = ratio * ref_resistor;

    let a1 = resistance - 100.0;
    let a2 = a1 * a1;

    let temperature = if a1 > 0.0 {
        2.558959 * a1 + 0.00105387 * a2
    } else {
        let a3 = a1 * a2;
        let a4 = a1 * a3;
        2.558959 * a1 + 0.00105387 * a2 + 1.1252e-5 * a3 + 4.261676e-7 * a4
    };

    Measurement {
        ratio,
        resistance,
        temperature,
    }
}
