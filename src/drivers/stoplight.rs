//! Tri-colour stoplight driver.
//!
//! Three discrete LEDs on GPIO outputs, active HIGH.  Generic over the
//! `embedded-hal` pin and delay traits so the same driver runs on the Pi
//! (`rppal`) and against mock pins in tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::app::ports::IndicatorPort;
use crate::error::ActuatorError;
use crate::indicator::{Colour, ColourSet};

pub struct StopLight<R, Y, G, D> {
    red: R,
    yellow: Y,
    green: G,
    delay: D,
    lit: ColourSet,
}

impl<R, Y, G, D> StopLight<R, Y, G, D>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
    D: DelayNs,
{
    pub fn new(red: R, yellow: Y, green: G, delay: D) -> Self {
        Self {
            red,
            yellow,
            green,
            delay,
            lit: ColourSet::NONE,
        }
    }

    /// Lamps currently driven HIGH.
    pub fn lit(&self) -> ColourSet {
        self.lit
    }

    /// Give the pins back.
    pub fn release(self) -> (R, Y, G) {
        (self.red, self.yellow, self.green)
    }

    fn write(&mut self, colour: Colour, on: bool) -> Result<(), ActuatorError> {
        match colour {
            Colour::Red => drive(&mut self.red, on)?,
            Colour::Yellow => drive(&mut self.yellow, on)?,
            Colour::Green => drive(&mut self.green, on)?,
        }
        self.lit = if on {
            self.lit.with(colour.into())
        } else {
            self.lit.without(colour.into())
        };
        Ok(())
    }
}

fn drive(pin: &mut impl OutputPin, on: bool) -> Result<(), ActuatorError> {
    let result = if on { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| ActuatorError::GpioWriteFailed)
}

impl<R, Y, G, D> IndicatorPort for StopLight<R, Y, G, D>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
    D: DelayNs,
{
    fn set(&mut self, colours: ColourSet, on: bool) -> Result<(), ActuatorError> {
        for colour in colours.iter() {
            self.write(colour, on)?;
        }
        Ok(())
    }

    fn blink(
        &mut self,
        colours: ColourSet,
        times: u32,
        on_ms: u32,
        off_ms: u32,
    ) -> Result<(), ActuatorError> {
        self.set(ColourSet::ALL, false)?;
        for _ in 0..times {
            self.set(colours, true)?;
            self.delay.delay_ms(on_ms);
            self.set(ColourSet::ALL, false)?;
            self.delay.delay_ms(off_ms);
        }
        Ok(())
    }
}
