//! Fuse and regulator reads
//!
//! Single blocking reads, no retries. Every failure comes back as a
//! [`ReadError`] and it is up to the caller to degrade.

use platform::otp::{bsec_shadow, HW_WORD_0_PRODUCT_BELOW_2V5, OTP_BOARD_WORD, OTP_HW_WORD_0};
use platform::{FuseStorage, Microvolts, Pmic};

use crate::error::ReadError;

/// Read OTP word `word` from the BSEC shadow area.
pub fn read_otp_word<F: FuseStorage>(fuses: &mut F, word: u32) -> Result<u32, ReadError> {
    let offset = bsec_shadow(word).ok_or(ReadError::InvalidValue(i64::from(word)))?;
    let mut buf = [0u8; 4];
    let n = fuses.read(offset, &mut buf).map_err(|_| ReadError::Transfer)?;
    if n != buf.len() {
        return Err(ReadError::ShortRead {
            expected: buf.len(),
            actual: n,
        });
    }
    Ok(u32::from_le_bytes(buf))
}

/// `product_below_2v5` from HW word 0: the chip is declared for VDD < 2.5 V
/// only.
pub fn read_fuse_safety_bit<F: FuseStorage>(fuses: Option<&mut F>) -> Result<bool, ReadError> {
    let fuses = fuses.ok_or(ReadError::DeviceNotPresent)?;
    let word = read_otp_word(fuses, OTP_HW_WORD_0)?;
    Ok(word & HW_WORD_0_PRODUCT_BELOW_2V5 != 0)
}

/// Board identification word (OTP 59). Zero means unprogrammed.
pub fn read_board_otp<F: FuseStorage>(fuses: Option<&mut F>) -> Result<u32, ReadError> {
    let fuses = fuses.ok_or(ReadError::DeviceNotPresent)?;
    read_otp_word(fuses, OTP_BOARD_WORD)
}

/// Output voltage of the regulator bound to `supply`, in µV.
///
/// Negative values are regulator error codes and come back as
/// [`ReadError::InvalidValue`].
pub fn read_regulator_uv<P: Pmic>(pmic: Option<&mut P>, supply: &str) -> Result<i64, ReadError> {
    let pmic = pmic.ok_or(ReadError::DeviceNotPresent)?;
    let uv = pmic
        .supply_microvolts(supply)
        .map_err(|_| ReadError::Transfer)?;
    let uv = Microvolts::from_reading(uv).ok_or(ReadError::InvalidValue(i64::from(uv)))?;
    Ok(i64::from(uv.get()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::{MockError, MockFuses, MockPmic};
    use platform::power::VDD_SUPPLY;

    #[test]
    fn safety_bit_reads_word_18_bit_13() {
        let mut fuses = MockFuses::new().with_word(18, 0x0000_2000);
        assert_eq!(read_fuse_safety_bit(Some(&mut fuses)), Ok(true));
        assert_eq!(fuses.reads(), &[72]);

        let mut clear = MockFuses::new().with_word(18, 0xFFFF_DFFF);
        assert_eq!(read_fuse_safety_bit(Some(&mut clear)), Ok(false));
    }

    #[test]
    fn missing_bsec_is_reported() {
        assert_eq!(
            read_fuse_safety_bit(None::<&mut MockFuses>),
            Err(ReadError::DeviceNotPresent)
        );
    }

    #[test]
    fn transfer_and_short_reads_are_errors() {
        let mut failing = MockFuses::new().failing(MockError::Transfer);
        assert_eq!(read_fuse_safety_bit(Some(&mut failing)), Err(ReadError::Transfer));

        let mut short = MockFuses::new().short_reads(3);
        assert_eq!(
            read_board_otp(Some(&mut short)),
            Err(ReadError::ShortRead {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn regulator_reading() {
        let mut pmic = MockPmic::new().with_supply(VDD_SUPPLY, 1_800_000);
        assert_eq!(read_regulator_uv(Some(&mut pmic), VDD_SUPPLY), Ok(1_800_000));
        assert_eq!(
            read_regulator_uv(Some(&mut pmic), "vdd_usb"),
            Err(ReadError::Transfer)
        );
        assert_eq!(
            read_regulator_uv(None::<&mut MockPmic>, VDD_SUPPLY),
            Err(ReadError::DeviceNotPresent)
        );
    }

    #[test]
    fn negative_regulator_reading_is_invalid() {
        let mut pmic = MockPmic::new().with_supply(VDD_SUPPLY, -22);
        assert_eq!(
            read_regulator_uv(Some(&mut pmic), VDD_SUPPLY),
            Err(ReadError::InvalidValue(-22))
        );
    }

    #[test]
    fn regulator_reading_boundary_at_zero() {
        let mut pmic = MockPmic::new().with_supply(VDD_SUPPLY, 0);
        assert_eq!(read_regulator_uv(Some(&mut pmic), VDD_SUPPLY), Ok(0));

        let mut pmic = MockPmic::new().with_supply(VDD_SUPPLY, -1);
        assert_eq!(
            read_regulator_uv(Some(&mut pmic), VDD_SUPPLY),
            Err(ReadError::InvalidValue(-1))
        );
    }
}
