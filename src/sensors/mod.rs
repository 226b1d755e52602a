//! Sensor subsystem — the two analog drivers and the [`SensorHub`] that
//! reads them together once per tick.

pub mod light;
pub mod soil;

use crate::app::ports::RawSample;
use light::LightSensor;
use soil::SoilProbe;

/// Owns both sensor drivers and produces one [`RawSample`] per tick.
pub struct SensorHub {
    pub soil: SoilProbe,
    pub light: LightSensor,
}

impl SensorHub {
    /// Construct a new hub. Drivers are built in main where peripheral
    /// ownership is established.
    pub fn new(soil: SoilProbe, light: LightSensor) -> Self {
        Self { soil, light }
    }

    /// Read both channels back to back.
    pub fn read_all(&mut self) -> RawSample {
        RawSample {
            soil: self.soil.read_raw(),
            light: self.light.read_raw(),
        }
    }
}
