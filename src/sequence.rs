//! LED animation used by the hardware test.
//!
//! Drives an RGB LED on PORT0 (red), PORT1 (green) and PORT2 (blue)
//! through every output feature of the chip: per-port PWM, hardware
//! blinking and common-PWM fading. The animation is a plain state
//! machine value; the caller owns the clock and calls
//! [`LedSequence::tick`] from its main loop.
//!
//! ```text
//! Start -> AllOn -> AllDim -> RedOn -> YellowOn -> GreenOn
//!       -> BlinkRedSlow -> BlinkGreenFast -> BlinkDone
//!       -> FadeStart -> (FadeUp -> FadeDown) x3 -> AllOff -> AllOn ...
//! ```
//!
//! Every action state finishes in [`LedState::Wait`], which hands over to
//! the scheduled next state once the deadline passes.

use embassy_time::{Duration, Instant};
use embedded_hal::i2c::I2c;

use crate::config::{BlinkOnTime, BlinkPeriod, FadeTime};
use crate::error::Max7360Error;
use crate::max7360::Max7360;

pub const RED_PORT: u8 = 0;
pub const GREEN_PORT: u8 = 1;
pub const BLUE_PORT: u8 = 2;

const RGB_PORTS: [u8; 3] = [RED_PORT, GREEN_PORT, BLUE_PORT];

/// Ports 0–2 as outputs.
const RGB_DIRECTION: u8 = 0b0000_0111;

const FULL: u8 = 0xFF;
const DIM: u8 = 0x40;
const OFF: u8 = 0x00;

const STEP_TIME: Duration = Duration::from_secs(2);
const BLINK_TIME: Duration = Duration::from_secs(6);
const FADE: FadeTime = FadeTime::Ms2048;
const FADE_HALF_CYCLE: Duration = Duration::from_millis(FADE.millis());
const FADE_CYCLES: u8 = 3;

/// Animation steps.
///
/// Colour states are named for the colour shown with PORT0/1/2 wired
/// red/green/blue: `YellowOn` lights red and green, and the green steps
/// drive PORT1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    Start,
    /// Idle until the deadline, then enter the scheduled state.
    Wait,
    AllOn,
    AllDim,
    RedOn,
    YellowOn,
    GreenOn,
    BlinkRedSlow,
    BlinkGreenFast,
    BlinkDone,
    FadeStart,
    FadeUp,
    FadeDown,
    AllOff,
}

/// RGB LED animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedSequence {
    state: LedState,
    next: LedState,
    deadline: Instant,
    fade_count: u8,
}

impl LedSequence {
    /// A sequence that starts on the first tick at or after `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            state: LedState::Start,
            next: LedState::Start,
            deadline: now,
            fade_count: 0,
        }
    }

    pub fn state(&self) -> LedState {
        self.state
    }

    /// State entered once the current wait expires.
    pub fn next_state(&self) -> LedState {
        self.next
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Completed fade cycles in the current fade block.
    pub fn fade_count(&self) -> u8 {
        self.fade_count
    }

    /// Advance the animation by at most one transition.
    ///
    /// A failed register write leaves the state unchanged, so the same
    /// step is retried on the next tick.
    ///
    /// # Errors
    /// * [`Max7360Error::I2c`] if a register access fails
    pub fn tick<I2C: I2c>(
        &mut self,
        now: Instant,
        chip: &mut Max7360<'_, I2C>,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        if self.state == LedState::Wait {
            if now >= self.deadline {
                self.enter(self.next);
            }
            return Ok(());
        }

        match self.step(now, chip) {
            Ok(()) => Ok(()),
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("LED sequence step {} failed", self.state);
                Err(e)
            }
        }
    }

    fn step<I2C: I2c>(
        &mut self,
        now: Instant,
        chip: &mut Max7360<'_, I2C>,
    ) -> Result<(), Max7360Error<I2C::Error>> {
        match self.state {
            LedState::Start => {
                chip.set_gpio_enabled(true)?;
                chip.set_gpio_outputs(RGB_DIRECTION, true)?;
                set_rgb(chip, OFF, OFF, OFF)?;
                self.wait(now, Duration::from_ticks(0), LedState::AllOn);
            }
            LedState::Wait => {}
            LedState::AllOn => {
                set_rgb(chip, FULL, FULL, FULL)?;
                self.wait(now, STEP_TIME, LedState::AllDim);
            }
            LedState::AllDim => {
                set_rgb(chip, DIM, DIM, DIM)?;
                self.wait(now, STEP_TIME, LedState::RedOn);
            }
            LedState::RedOn => {
                set_rgb(chip, FULL, OFF, OFF)?;
                self.wait(now, STEP_TIME, LedState::YellowOn);
            }
            LedState::YellowOn => {
                set_rgb(chip, FULL, FULL, OFF)?;
                self.wait(now, STEP_TIME, LedState::GreenOn);
            }
            LedState::GreenOn => {
                set_rgb(chip, OFF, FULL, OFF)?;
                self.wait(now, STEP_TIME, LedState::BlinkRedSlow);
            }
            LedState::BlinkRedSlow => {
                set_rgb(chip, FULL, OFF, OFF)?;
                chip.set_blink_on_time(RED_PORT, BlinkOnTime::Percent50)?;
                chip.set_blink_period(RED_PORT, BlinkPeriod::Ms1024)?;
                self.wait(now, BLINK_TIME, LedState::BlinkGreenFast);
            }
            LedState::BlinkGreenFast => {
                chip.set_blink_period(RED_PORT, BlinkPeriod::Off)?;
                set_rgb(chip, OFF, FULL, OFF)?;
                chip.set_blink_on_time(GREEN_PORT, BlinkOnTime::Percent25)?;
                chip.set_blink_period(GREEN_PORT, BlinkPeriod::Ms256)?;
                self.wait(now, BLINK_TIME, LedState::BlinkDone);
            }
            LedState::BlinkDone => {
                for port in RGB_PORTS {
                    chip.set_blink_period(port, BlinkPeriod::Off)?;
                    chip.set_blink_on_time(port, BlinkOnTime::Percent50)?;
                }
                self.wait(now, Duration::from_ticks(0), LedState::FadeStart);
            }
            LedState::FadeStart => {
                chip.set_common_pwm_ratio(OFF)?;
                chip.set_fade_time(FADE)?;
                for port in RGB_PORTS {
                    chip.set_port_pwm_ratio(port, FULL)?;
                    chip.set_common_pwm_mode(port, true)?;
                }
                self.fade_count = 0;
                self.wait(now, Duration::from_ticks(0), LedState::FadeUp);
            }
            LedState::FadeUp => {
                chip.set_common_pwm_ratio(FULL)?;
                self.wait(now, FADE_HALF_CYCLE, LedState::FadeDown);
            }
            LedState::FadeDown => {
                chip.set_common_pwm_ratio(OFF)?;
                self.fade_count += 1;
                let next = if self.fade_count < FADE_CYCLES {
                    LedState::FadeUp
                } else {
                    LedState::AllOff
                };
                self.wait(now, FADE_HALF_CYCLE, next);
            }
            LedState::AllOff => {
                for port in RGB_PORTS {
                    chip.set_common_pwm_mode(port, false)?;
                }
                chip.set_fade_time(FadeTime::Disabled)?;
                set_rgb(chip, OFF, OFF, OFF)?;
                self.wait(now, STEP_TIME, LedState::AllOn);
            }
        }
        Ok(())
    }

    fn wait(&mut self, now: Instant, duration: Duration, next: LedState) {
        self.deadline = now + duration;
        self.next = next;
        self.state = LedState::Wait;
    }

    fn enter(&mut self, state: LedState) {
        #[cfg(feature = "defmt")]
        defmt::info!("LED sequence -> {}", state);

        self.state = state;
    }
}

fn set_rgb<I2C: I2c>(
    chip: &mut Max7360<'_, I2C>,
    red: u8,
    green: u8,
    blue: u8,
) -> Result<(), Max7360Error<I2C::Error>> {
    chip.set_port_pwm_ratio(RED_PORT, red)?;
    chip.set_port_pwm_ratio(GREEN_PORT, green)?;
    chip.set_port_pwm_ratio(BLUE_PORT, blue)
}
