//! Transformer output stage.
//!
//! A PWM channel sets the drive intensity, a polarity relay selects the
//! direction, and an enable pin switches the DC/DC converter feeding the
//! bridge.
//!
//! | power      | duty    | relay |
//! |------------|---------|-------|
//! | `0`        | 0 %     | low   |
//! | `p > 0`    | `p` %   | low   |
//! | `p < 0`    | `|p|` % | high  |
//!
//! Hardware errors are logged and swallowed: the control loop must keep
//! running, and the fault monitor catches a stage that does not respond.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::OutputPort;
use crate::knob::FULL_SCALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerState {
    Off,
    Driving { duty: u8, dir: Direction },
}

pub struct TransformerDriver<P, R, S>
where
    P: SetDutyCycle,
    R: OutputPin,
    S: OutputPin,
{
    pwm: P,
    relay: R,
    supply: S,
    supply_enabled: bool,
    power: i32,
    state: TransformerState,
}

impl<P, R, S> TransformerDriver<P, R, S>
where
    P: SetDutyCycle,
    R: OutputPin,
    S: OutputPin,
{
    /// Take the pins and drive everything to the safe state: duty 0,
    /// relay forward, supply off.
    pub fn new(pwm: P, relay: R, supply: S) -> Self {
        let mut driver = Self {
            pwm,
            relay,
            supply,
            supply_enabled: false,
            power: 0,
            state: TransformerState::Off,
        };
        driver.set_supply(false);
        driver.set_power(0);
        driver
    }

    pub fn state(&self) -> TransformerState {
        self.state
    }

    pub fn is_driving(&self) -> bool {
        !matches!(self.state, TransformerState::Off)
    }

    /// Release the pins.
    pub fn release(self) -> (P, R, S) {
        (self.pwm, self.relay, self.supply)
    }

    fn set_direction_hw(&mut self, dir: Direction) {
        let result = match dir {
            Direction::Forward => self.relay.set_low(),
            Direction::Reverse => self.relay.set_high(),
        };
        if let Err(e) = result {
            warn!("transformer: relay write failed: {:?}", e);
        }
    }

    fn set_duty_hw(&mut self, duty: u8) {
        if let Err(e) = self.pwm.set_duty_cycle_percent(duty) {
            warn!("transformer: pwm write failed: {:?}", e);
        }
    }
}

impl<P, R, S> OutputPort for TransformerDriver<P, R, S>
where
    P: SetDutyCycle,
    R: OutputPin,
    S: OutputPin,
{
    fn set_supply(&mut self, enabled: bool) {
        let result = if enabled {
            self.supply.set_high()
        } else {
            self.supply.set_low()
        };
        if let Err(e) = result {
            warn!("transformer: supply enable write failed: {:?}", e);
        }
        self.supply_enabled = enabled;
    }

    fn supply_enabled(&self) -> bool {
        self.supply_enabled
    }

    fn set_power(&mut self, power: i32) {
        let power = power.clamp(-FULL_SCALE, FULL_SCALE);
        // |power| <= 100 after the clamp.
        let duty = power.unsigned_abs() as u8;
        let dir = if power < 0 {
            Direction::Reverse
        } else {
            Direction::Forward
        };

        self.set_duty_hw(duty);
        self.set_direction_hw(dir);

        self.power = power;
        self.state = if duty == 0 {
            TransformerState::Off
        } else {
            TransformerState::Driving { duty, dir }
        };
    }

    fn power(&self) -> i32 {
        self.power
    }
}
