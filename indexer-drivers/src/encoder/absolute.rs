//! Absolute carriage encoder
//!
//! The encoder reports shaft rotations in `[0, 1)`. Conversion to carriage
//! radians and the sign convention come from [`EncoderConfig`] and are
//! fixed at construction.

use indexer_core::config::EncoderConfig;
use indexer_core::traits::{AngleSensor, FaultKind};

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read the raw conversion result
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Raw absolute shaft position source
pub trait AbsoluteSource {
    /// Shaft position in rotations, `[0, 1)`
    fn rotations(&mut self) -> Result<f32, FaultKind>;

    /// Shaft speed in RPM
    fn rpm(&mut self) -> Result<f32, FaultKind>;
}

/// Analog-output absolute encoder sampled at a fixed period
///
/// [`sample`](Self::sample) takes a conversion and must be called once per
/// sample period; speed is the wrapped difference between the last two
/// samples. `rotations()` returns the latest sample, so several reads
/// within one period agree with each other.
pub struct AnalogSource<ADC> {
    adc: ADC,
    /// Full-scale ADC count
    adc_max: u16,
    sample_period_ms: u32,
    latest: Option<Result<f32, FaultKind>>,
    last_good: Option<f32>,
    rpm: f32,
}

impl<ADC: AdcReader> AnalogSource<ADC> {
    /// # Arguments
    /// - `adc`: ADC channel wired to the encoder's analog output
    /// - `adc_max`: count at full scale (4095 for a 12-bit converter)
    /// - `sample_period_ms`: time between `sample()` calls
    pub fn new(adc: ADC, adc_max: u16, sample_period_ms: u32) -> Self {
        Self {
            adc,
            adc_max,
            sample_period_ms,
            latest: None,
            last_good: None,
            rpm: 0.0,
        }
    }

    /// Take a new conversion and update the speed estimate
    pub fn sample(&mut self) -> Result<f32, FaultKind> {
        let result = self.convert();
        if let Ok(turns) = result {
            if let Some(prev) = self.last_good {
                let mut delta = turns - prev;
                if delta >= 0.5 {
                    delta -= 1.0;
                } else if delta < -0.5 {
                    delta += 1.0;
                }
                if self.sample_period_ms > 0 {
                    self.rpm = delta * 60_000.0 / self.sample_period_ms as f32;
                }
            }
            self.last_good = Some(turns);
        }
        self.latest = Some(result);
        result
    }

    fn convert(&mut self) -> Result<f32, FaultKind> {
        let raw = self.adc.read().map_err(|_| FaultKind::Unavailable)?;
        if self.adc_max == 0 || raw > self.adc_max {
            return Err(FaultKind::InvalidReading);
        }

        let turns = raw as f32 / self.adc_max as f32;
        Ok(if turns >= 1.0 { 0.0 } else { turns })
    }
}

impl<ADC: AdcReader> AbsoluteSource for AnalogSource<ADC> {
    fn rotations(&mut self) -> Result<f32, FaultKind> {
        match self.latest {
            Some(result) => result,
            None => self.sample(),
        }
    }

    fn rpm(&mut self) -> Result<f32, FaultKind> {
        match self.latest {
            Some(Err(kind)) => Err(kind),
            _ => Ok(self.rpm),
        }
    }
}

/// Carriage angle sensor over an absolute source
pub struct AbsoluteEncoder<S> {
    source: S,
    config: EncoderConfig,
}

impl<S: AbsoluteSource> AbsoluteEncoder<S> {
    pub fn new(source: S, config: EncoderConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: AbsoluteSource> AngleSensor for AbsoluteEncoder<S> {
    fn position(&mut self) -> Result<f32, FaultKind> {
        let turns = self.source.rotations()?;
        if !turns.is_finite() {
            return Err(FaultKind::InvalidReading);
        }

        let turns = if self.config.inverted && turns > 0.0 {
            1.0 - turns
        } else {
            turns
        };
        Ok(turns * self.config.position_factor)
    }

    fn velocity(&mut self) -> Result<f32, FaultKind> {
        let rpm = self.source.rpm()?;
        if !rpm.is_finite() {
            return Err(FaultKind::InvalidReading);
        }

        let velocity = rpm * self.config.velocity_factor;
        Ok(if self.config.inverted { -velocity } else { velocity })
    }
}
