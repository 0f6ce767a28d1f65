//! Gamepad input through gilrs
//!
//! Axis and button ids follow the numbering a Logitech-style gamepad reports
//! in DirectInput mode, so the same parameter files work with or without the
//! `gamepad` feature:
//!
//! | id | axis          | id | button        |
//! |----|---------------|----|---------------|
//! | 0  | left stick X  | 1  | west (X)      |
//! | 1  | left stick Y  | 2  | south (A)     |
//! | 2  | right stick X | 3  | east (B)      |
//! | 3  | right stick Y | 4  | north (Y)     |
//! | 4  | left trigger  | 5  | left bumper   |
//! | 5  | right trigger | 6  | right bumper  |
//! |    |               | 7  | left trigger  |
//! |    |               | 8  | right trigger |
//! |    |               | 9  | back          |
//! |    |               | 10 | start         |
//!
//! Y axes are negated so that pushing a stick forward reads negative, as
//! joystick drivers report it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use gilrs::{Axis, Button, GamepadId, Gilrs};
use log::{info, warn};

use super::{EqptError, InputSource};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const DEVICE_NAME: &str = "Gamepad";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Driver input read from the first connected gamepad.
pub struct GamepadInput {
    gilrs: Gilrs,
    active: Option<GamepadId>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GamepadInput {
    /// Initialise gilrs and pick the first connected gamepad, if any.
    pub fn new() -> Result<Self, EqptError> {
        let gilrs = Gilrs::new()
            .map_err(|e| EqptError::Disconnected(format!("{} ({})", DEVICE_NAME, e)))?;

        let active = gilrs.gamepads().next().map(|(id, gamepad)| {
            info!("Using gamepad {}: {}", id, gamepad.name());
            id
        });

        if active.is_none() {
            warn!("No gamepad connected, waiting for one");
        }

        Ok(Self { gilrs, active })
    }

    fn connected_id(&self) -> Result<GamepadId, EqptError> {
        match self.active {
            Some(id) if self.gilrs.gamepad(id).is_connected() => Ok(id),
            _ => Err(EqptError::Disconnected(DEVICE_NAME.to_string()))
        }
    }
}

impl InputSource for GamepadInput {
    fn refresh(&mut self) {
        // Drain pending events so gilrs updates its cached state, adopting
        // whichever gamepad produced input if none is active
        while let Some(event) = self.gilrs.next_event() {
            let active_connected = self.active
                .map(|id| self.gilrs.gamepad(id).is_connected())
                .unwrap_or(false);

            if !active_connected {
                info!("Switching to gamepad {}", event.id);
                self.active = Some(event.id);
            }
        }
    }

    fn axis(&mut self, id: u32) -> Result<f64, EqptError> {
        let (axis, sign) = match id {
            0 => (Axis::LeftStickX, 1.0),
            1 => (Axis::LeftStickY, -1.0),
            2 => (Axis::RightStickX, 1.0),
            3 => (Axis::RightStickY, -1.0),
            4 => (Axis::LeftZ, 1.0),
            5 => (Axis::RightZ, 1.0),
            _ => return Err(EqptError::NoSuchAxis { device: DEVICE_NAME.to_string(), id })
        };

        let gamepad_id = self.connected_id()?;
        let value = self.gilrs.gamepad(gamepad_id).value(axis);

        Ok(sign * f64::from(value))
    }

    fn button(&mut self, id: u32) -> Result<bool, EqptError> {
        let button = match id {
            1 => Button::West,
            2 => Button::South,
            3 => Button::East,
            4 => Button::North,
            5 => Button::LeftTrigger,
            6 => Button::RightTrigger,
            7 => Button::LeftTrigger2,
            8 => Button::RightTrigger2,
            9 => Button::Select,
            10 => Button::Start,
            _ => return Err(EqptError::NoSuchButton { device: DEVICE_NAME.to_string(), id })
        };

        let gamepad_id = self.connected_id()?;

        Ok(self.gilrs.gamepad(gamepad_id).is_pressed(button))
    }
}
