//! MAX7360 hardware test
//!
//! Exercises the max7360-driver crate on the Raspberry Pi Pico 2: logs key
//! events from a 4×3 phone keypad, the level of a push button on PORT5 and
//! rotary encoder clicks on PORT6/PORT7, while an RGB LED on PORT0–PORT2
//! runs through the PWM, blink and fade features.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                                  |
//! |-----------|------------|----------------------------------------|
//! | I2C0 SDA  | GP20       | AD0 tied to GND (address 0x38)         |
//! | I2C0 SCL  | GP21       |                                        |
//! | ROW0–3    |            | Keypad rows, COL0–COL2 keypad columns  |
//! | PORT0–2   |            | RGB LED cathodes (red, green, blue)    |
//! | PORT5     |            | Push button to GND                     |
//! | PORT6/7   |            | Rotary encoder A/B                     |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_time::{Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

use max7360_driver::registers::PORT5_MASK;
use max7360_driver::{
    GpoMode, LedSequence, Max7360, Max7360Config, DEFAULT_ADDRESS, PHONE_KEYPAD,
};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

const BUTTON_PORT: u8 = 5;
const POLL_INTERVAL_MS: u64 = 10;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- I2C bus (GP20 = SDA, GP21 = SCL) ---
    let i2c = I2c::new_blocking(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        i2c::Config::default(),
    );

    // --- MAX7360 ---
    let mut keypad = Max7360::new(i2c, DEFAULT_ADDRESS).with_key_mapping(&PHONE_KEYPAD);

    keypad
        .reset_register_defaults()
        .expect("Failed to reset MAX7360");

    let config = Max7360Config {
        gpo_mode: GpoMode::Disabled,
        // Key-down events only.
        key_release: false,
        gpio_enabled: true,
        rotary_encoder: true,
        gpio_direction: 0b0000_0111,
        ..Max7360Config::default()
    };
    keypad.configure(&config).expect("Failed to configure MAX7360");

    if let Err(e) = keypad.set_port_interrupt(BUTTON_PORT, true, true) {
        error!("Failed to enable button interrupt: {}", e);
    }

    info!("MAX7360 hardware test started at {=u8:#04x}", keypad.address());

    let mut sequence = LedSequence::new(Instant::now());
    let mut button_down = false;
    let mut rotary_total: i32 = 0;

    loop {
        match keypad.drain_key_fifo() {
            Ok(events) => {
                for event in events.iter() {
                    if event.is_overflow() {
                        warn!("Key FIFO overflow");
                    } else {
                        info!("Key: {}", event);
                    }
                }
            }
            Err(e) => error!("FIFO read failed: {}", e),
        }

        match keypad.read_gpio_inputs() {
            Ok(inputs) => {
                // Button pulls the port low.
                let down = inputs & PORT5_MASK == 0;
                if down != button_down {
                    button_down = down;
                    info!("Button {}", if down { "pressed" } else { "released" });
                }
            }
            Err(e) => error!("GPIO read failed: {}", e),
        }

        match keypad.read_rotary_count() {
            Ok(0) => {}
            Ok(delta) => {
                rotary_total += i32::from(delta);
                info!("Rotary: count={} delta={}", rotary_total, delta);
            }
            Err(e) => error!("Rotary read failed: {}", e),
        }

        if let Err(e) = sequence.tick(Instant::now(), &mut keypad) {
            error!("LED sequence failed: {}", e);
        }

        Timer::after_millis(POLL_INTERVAL_MS).await;
    }
}
