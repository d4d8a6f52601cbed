//! USB cable detection for the download gadget.
//!
//! On boards with an STUSB1600 Type-C controller the CC attach status is read
//! over I²C. Other boards rely on the OTG controller's B-session-valid
//! comparator.

use embedded_hal::i2c::I2c;

/// STUSB1600 `CC_CONNECTION_STATUS` register.
pub const STUSB1600_CC_CONNECTION_STATUS: u8 = 0x0E;

/// `CC_CONNECTION_STATUS.CC_ATTACH`.
pub const STUSB1600_CC_ATTACH: u8 = 1 << 0;

/// Read the STUSB1600 attach bit. A failed transfer reads as detached.
pub fn stusb1600_cable_connected<I: I2c>(i2c: &mut I, addr: u8) -> bool {
    let mut status = [0u8; 1];
    if i2c
        .write_read(addr, &[STUSB1600_CC_CONNECTION_STATUS], &mut status)
        .is_err()
    {
        debug!("STUSB1600 @ {:#x}: status read failed", addr);
        return false;
    }
    status[0] & STUSB1600_CC_ATTACH != 0
}

/// Whether a USB cable is plugged.
///
/// Uses the STUSB1600 when the board has one (`stusb1600` is the controller
/// bus and address), otherwise `b_session_valid` from the OTG core.
pub fn usb_cable_connected<I: I2c>(stusb1600: Option<(&mut I, u8)>, b_session_valid: bool) -> bool {
    match stusb1600 {
        Some((i2c, addr)) => stusb1600_cable_connected(i2c, addr),
        None => b_session_valid,
    }
}
