//! GPIO pin assignments for the parking assistant.
//!
//! Single source of truth for default pin numbers.  All defaults are BCM
//! numbers; [`board_to_bcm`] translates physical 40-pin header positions for
//! sessions opened in `BOARD` mode.

// ---------------------------------------------------------------------------
// Stoplight fixture
// ---------------------------------------------------------------------------

/// Primary stoplight header: red, yellow, green.
pub const LIGHT_PRIMARY: [u8; 3] = [9, 10, 11];
/// Second stoplight header position: red, yellow, green.
pub const LIGHT_SECONDARY: [u8; 3] = [19, 13, 26];

pub const RED_GPIO: u8 = LIGHT_PRIMARY[0];
pub const YELLOW_GPIO: u8 = LIGHT_PRIMARY[1];
pub const GREEN_GPIO: u8 = LIGHT_PRIMARY[2];

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// PIR motion sensor output.  HIGH = motion.
pub const MOTION_GPIO: u8 = 14;

/// HC-SR04 trigger (output).
pub const TRIGGER_GPIO: u8 = 18;
/// HC-SR04 echo (input, via level shifter).
pub const ECHO_GPIO: u8 = 15;

// ---------------------------------------------------------------------------
// Numbering schemes
// ---------------------------------------------------------------------------

/// Highest BCM GPIO line exposed on the 40-pin header.
pub const MAX_BCM_GPIO: u8 = 27;

/// Physical header position → BCM GPIO number.  Power and ground positions
/// are absent.
const BOARD_TO_BCM: [(u8, u8); 28] = [
    (3, 2),
    (5, 3),
    (7, 4),
    (8, 14),
    (10, 15),
    (11, 17),
    (12, 18),
    (13, 27),
    (15, 22),
    (16, 23),
    (18, 24),
    (19, 10),
    (21, 9),
    (22, 25),
    (23, 11),
    (24, 8),
    (26, 7),
    (27, 0),
    (28, 1),
    (29, 5),
    (31, 6),
    (32, 12),
    (33, 13),
    (35, 19),
    (36, 16),
    (37, 26),
    (38, 20),
    (40, 21),
];

/// Translate a physical header position into its BCM GPIO number.
pub fn board_to_bcm(board: u8) -> Option<u8> {
    BOARD_TO_BCM
        .iter()
        .find(|(pos, _)| *pos == board)
        .map(|(_, bcm)| *bcm)
}

/// Whether `bcm` names a GPIO line on the header.
pub fn is_header_gpio(bcm: u8) -> bool {
    bcm <= MAX_BCM_GPIO
}
