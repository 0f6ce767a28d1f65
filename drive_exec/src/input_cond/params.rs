//! Parameters structure for InputCond

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use super::{InputCondError, NUM_AXES};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Calibration parameters for input conditioning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Params {

    /// Reading of each axis (left, right) when the stick is at rest.
    ///
    /// Units: axis units, [-1, 1]
    pub bias: [f64; NUM_AXES],

    /// Sense of each axis relative to the forward-positive convention.
    pub invert: [Sense; NUM_AXES],

    /// Global speed limiter applied to both axes. 1.0 allows the full range of
    /// the actuators.
    ///
    /// Units: fraction, (0, 1]
    pub scale: f64,

    /// How the encoder reset button generates reset requests.
    #[serde(default)]
    pub reset_trigger: ResetTrigger,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The sense of an input axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    /// Multiply by +1.
    Normal,
    /// Multiply by -1.
    Inverted,
}

/// How a held reset button is turned into reset requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetTrigger {
    /// Request a reset on every cycle the button is held.
    Level,
    /// Request a reset only on the cycle the button is first pressed.
    Edge,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Sense {
    /// The sign multiplier for this sense.
    pub fn sign(self) -> f64 {
        match self {
            Sense::Normal => 1.0,
            Sense::Inverted => -1.0,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Params {
            bias: [0.0; NUM_AXES],
            invert: [Sense::Normal; NUM_AXES],
            scale: 1.0,
            reset_trigger: ResetTrigger::default(),
        }
    }
}

impl Default for ResetTrigger {
    fn default() -> Self {
        ResetTrigger::Level
    }
}

impl Params {
    /// Check the calibration is usable.
    pub fn validate(&self) -> Result<(), InputCondError> {
        for (axis, bias) in self.bias.iter().enumerate() {
            if !bias.is_finite() {
                return Err(InputCondError::InvalidBias { axis, bias: *bias });
            }
        }

        // NaN fails both comparisons and is rejected here too
        if !(self.scale > 0.0 && self.scale <= 1.0) {
            return Err(InputCondError::InvalidScale(self.scale));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        Params {
            bias: [-0.007813, -0.007813],
            invert: [Sense::Inverted, Sense::Inverted],
            scale: 0.3,
            reset_trigger: ResetTrigger::Level,
        }
    }

    #[test]
    fn test_validate() {
        assert!(params().validate().is_ok());

        let mut p = params();
        p.scale = 1.0;
        assert!(p.validate().is_ok());

        for bad_scale in [0.0, -0.3, 1.01, f64::NAN].iter() {
            let mut p = params();
            p.scale = *bad_scale;
            assert!(matches!(p.validate(), Err(InputCondError::InvalidScale(_))));
        }

        let mut p = params();
        p.bias[1] = f64::INFINITY;
        assert!(matches!(
            p.validate(), 
            Err(InputCondError::InvalidBias { axis: 1, .. })
        ));
    }

    #[test]
    fn test_deserialise() {
        let p: Params = toml::from_str(
            "bias = [0.1, -0.2]\ninvert = [\"normal\", \"inverted\"]\nscale = 0.5\n"
        ).unwrap();

        assert_eq!(p.bias, [0.1, -0.2]);
        assert_eq!(p.invert, [Sense::Normal, Sense::Inverted]);
        assert_eq!(p.reset_trigger, ResetTrigger::Level);
        assert_eq!(Sense::Inverted.sign(), -1.0);
    }
}
