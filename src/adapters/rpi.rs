//! Raspberry Pi backend: builds the hardware adapter on `rppal` GPIO.
//!
//! Every pin goes through [`Session::claim`] first, so BOARD numbering is
//! translated and a line can't be handed out twice.  `rppal` restores each
//! line to its previous mode when the pin is dropped.

use log::{error, info};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use rppal::hal::Delay;

use crate::config::SystemConfig;
use crate::drivers::stoplight::StopLight;
use crate::error::Error;
use crate::sensors::pir::MotionSensor;
use crate::sensors::ultrasonic::Hcsr04;
use crate::sensors::SensorHub;
use crate::session::Session;

use super::hardware::HardwareAdapter;

pub type RpiStopLight = StopLight<OutputPin, OutputPin, OutputPin, Delay>;
pub type RpiSensors = SensorHub<InputPin, OutputPin, InputPin, Delay>;
pub type RpiHardware = HardwareAdapter<RpiStopLight, RpiSensors>;

fn gpio_line(gpio: &Gpio, session: &mut Session, pin: u8) -> Result<rppal::gpio::Pin, Error> {
    let bcm = session.claim(pin)?;
    gpio.get(bcm).map_err(|e| {
        error!("GPIO{} unavailable: {}", bcm, e);
        Error::Init("GPIO line unavailable")
    })
}

/// Claim every configured pin, then warm up the PIR and settle the ranger.
///
/// Blocks for `motion_warmup_ms + ranger_settle_ms`.
pub fn open_hardware(session: &mut Session, config: &SystemConfig) -> Result<RpiHardware, Error> {
    let gpio = Gpio::new().map_err(|e| {
        error!("Failed to open GPIO: {}", e);
        Error::Init("GPIO peripheral unavailable")
    })?;
    let pins = &config.pins;

    let light = StopLight::new(
        gpio_line(&gpio, session, pins.red)?.into_output_low(),
        gpio_line(&gpio, session, pins.yellow)?.into_output_low(),
        gpio_line(&gpio, session, pins.green)?.into_output_low(),
        Delay::new(),
    );
    info!("Stoplight on {} pins {}/{}/{}", session.mode(), pins.red, pins.yellow, pins.green);

    let mut motion = MotionSensor::new(gpio_line(&gpio, session, pins.motion)?.into_input());
    motion.warm_up(&mut Delay::new(), config.motion_warmup_ms);

    let mut ranger = Hcsr04::new(
        gpio_line(&gpio, session, pins.trigger)?.into_output_low(),
        gpio_line(&gpio, session, pins.echo)?.into_input(),
        Delay::new(),
    );
    ranger.settle(config.ranger_settle_ms)?;

    Ok(HardwareAdapter::new(light, SensorHub::new(motion, ranger)))
}
