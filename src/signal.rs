//! Source waveform evaluation.
//!
//! Evaluates DC, damped SIN and PULSE waveforms at a given time t.

use crate::Scalar;
use std::f64::consts::PI;

/// Time-dependent value driving an independent source.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// `DC value`
    Constant(Scalar),
    /// `SIN offset amplitude freq delay damping phase cycles`
    DampedSinusoid {
        offset: Scalar,
        amplitude: Scalar,
        freq_hz: Scalar,
        delay: Scalar,
        damping: Scalar,
        phase_deg: Scalar,
        cycles: u32,
    },
    /// `PULSE initial pulsed delay rise fall width period cycles`
    PulseTrain {
        initial: Scalar,
        pulsed: Scalar,
        delay: Scalar,
        rise: Scalar,
        fall: Scalar,
        width: Scalar,
        period: Scalar,
        cycles: u32,
    },
}

impl Signal {
    /// Evaluate the waveform at time t.
    pub fn value(&self, t: Scalar) -> Scalar {
        match *self {
            Signal::Constant(value) => value,
            Signal::DampedSinusoid {
                offset,
                amplitude,
                freq_hz,
                delay,
                damping,
                phase_deg,
                cycles,
            } => eval_sin(offset, amplitude, freq_hz, delay, damping, phase_deg, cycles, t),
            Signal::PulseTrain {
                initial,
                pulsed,
                delay,
                rise,
                fall,
                width,
                period,
                cycles,
            } => eval_pulse(initial, pulsed, delay, rise, fall, width, period, cycles, t),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn eval_sin(
    offset: Scalar,
    amplitude: Scalar,
    freq_hz: Scalar,
    delay: Scalar,
    damping: Scalar,
    phase_deg: Scalar,
    cycles: u32,
    t: Scalar,
) -> Scalar {
    let elapsed = t - delay;
    if elapsed < 0.0 || elapsed * freq_hz > cycles as Scalar {
        return 0.0;
    }
    let phase = phase_deg.to_radians();
    offset + amplitude * (-damping * elapsed).exp() * (2.0 * PI * freq_hz * elapsed + phase).sin()
}

#[allow(clippy::too_many_arguments)]
fn eval_pulse(
    initial: Scalar,
    pulsed: Scalar,
    delay: Scalar,
    rise: Scalar,
    fall: Scalar,
    width: Scalar,
    period: Scalar,
    cycles: u32,
    t: Scalar,
) -> Scalar {
    if t > period * cycles as Scalar {
        return 0.0;
    }
    let mut t_rel = if period > 0.0 { t % period } else { t };

    if t_rel < delay {
        return initial;
    }
    t_rel -= delay;
    if t_rel < rise {
        return initial + (pulsed - initial) * t_rel / rise;
    }
    t_rel -= rise;
    if t_rel < width {
        return pulsed;
    }
    t_rel -= width;
    if t_rel < fall {
        return pulsed + (initial - pulsed) * t_rel / fall;
    }
    initial
}
