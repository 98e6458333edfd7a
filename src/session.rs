//! Pin-numbering session.
//!
//! The pin-numbering mode is process-wide: it can be chosen at most once
//! while a session is open.  [`Session`] makes that lifecycle explicit.  It
//! is opened before any peripheral is built, resolves configured pin numbers
//! to BCM lines, and is closed exactly once when the process ends: by
//! [`Session::close`], or by `Drop` if the caller unwinds first.
//!
//! ```text
//!   open(mode) ──▶ claim(pin)… ──▶ close()
//!        │
//!        ├─ same mode already open   → warn, non-owning handle
//!        └─ different mode open      → SessionError::ModeConflict
//! ```

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::pins;

/// Process-wide mode slot: 0 = unset, otherwise [`PinMode::code`].
static ACTIVE_MODE: AtomicU8 = AtomicU8::new(0);

/// Pin-numbering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinMode {
    /// Broadcom GPIO numbers.
    #[default]
    Bcm,
    /// Physical 40-pin header positions.
    Board,
}

impl PinMode {
    const fn code(self) -> u8 {
        match self {
            Self::Bcm => 1,
            Self::Board => 2,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Bcm),
            2 => Some(Self::Board),
            _ => None,
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bcm => write!(f, "BCM"),
            Self::Board => write!(f, "BOARD"),
        }
    }
}

/// The pin mode currently held by an open session, if any.
pub fn active_mode() -> Option<PinMode> {
    PinMode::from_code(ACTIVE_MODE.load(Ordering::Acquire))
}

/// Handle on the process-wide pin-numbering session.
#[derive(Debug)]
pub struct Session {
    mode: PinMode,
    /// Only the owning handle releases the mode on close.
    owner: bool,
    claimed: Vec<u8>,
    closed: bool,
}

impl Session {
    /// Open a session in `mode`.
    pub fn open(mode: PinMode) -> Result<Self, SessionError> {
        let owner = match ACTIVE_MODE.compare_exchange(
            0,
            mode.code(),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                info!("Set GPIO mode to: {}", mode);
                true
            }
            Err(current) if current == mode.code() => {
                warn!("GPIO mode already set to {}", mode);
                false
            }
            Err(current) => {
                return Err(SessionError::ModeConflict {
                    active: PinMode::from_code(current).unwrap_or(mode),
                    requested: mode,
                });
            }
        };

        Ok(Self {
            mode,
            owner,
            claimed: Vec::new(),
            closed: false,
        })
    }

    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Whether this handle set the process-wide mode.
    pub fn is_owner(&self) -> bool {
        self.owner
    }

    /// Translate `pin` (in this session's numbering) to a BCM GPIO line.
    pub fn resolve(&self, pin: u8) -> Result<u8, SessionError> {
        let bcm = match self.mode {
            PinMode::Bcm => Some(pin).filter(|p| pins::is_header_gpio(*p)),
            PinMode::Board => pins::board_to_bcm(pin),
        };
        bcm.ok_or(SessionError::InvalidPin {
            mode: self.mode,
            pin,
        })
    }

    /// Resolve `pin` and reserve its BCM line for one peripheral.
    pub fn claim(&mut self, pin: u8) -> Result<u8, SessionError> {
        let bcm = self.resolve(pin)?;
        if self.claimed.contains(&bcm) {
            return Err(SessionError::PinInUse(bcm));
        }
        self.claimed.push(bcm);
        Ok(bcm)
    }

    /// BCM lines claimed so far, in claim order.
    pub fn claimed(&self) -> &[u8] {
        &self.claimed
    }

    /// End the session and release the process-wide mode.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if self.owner {
            ACTIVE_MODE.store(0, Ordering::Release);
        }
        if self.claimed.is_empty() {
            info!("All GPIO pins cleaned");
        } else {
            info!("Cleaned the following channels: {:?}", self.claimed);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}
