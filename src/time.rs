//! # Time-system utilities
//!
//! Julian dates and sidereal time for the frame transforms.
//!
//! - [`julian_date`] builds the `julianDateUT1` input from a calendar date (the host
//!   usually feeds it the current UTC time; the UT1−UTC difference is below one second
//!   and is ignored here).
//! - [`gmst`] returns the Greenwich Mean Sidereal Time used to rotate TEME into the
//!   Earth-fixed frame.
//! - [`minutes_since_epoch`] converts an absolute Julian date into the time offset
//!   expected by a [`Propagator`](crate::propagator::Propagator).
//!
//! Calendar arithmetic is delegated to [`hifitime`].

use hifitime::Epoch;
use std::str::FromStr;

use crate::constants::{JulianDate, Minutes, Radian, DPI, JDTOMJD, MINUTES_PER_DAY, MJD, T2000};
use crate::groundtrack_errors::GroundTrackError;

/// Julian date of a UTC calendar instant.
///
/// Arguments
/// ---------
/// * `year`, `month` (1–12), `day` (1–31), `hour` (0–23), `minute` (0–59).
/// * `second`: seconds with fractional part, in `[0, 60)`.
///
/// Return
/// ------
/// * The Julian date (days) of the instant.
///
/// Errors
/// ------
/// * [`GroundTrackError::InvalidDate`] when a field is out of range or the day does not
///   exist in that month (e.g. 30 February).
pub fn julian_date(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: f64,
) -> Result<JulianDate, GroundTrackError> {
    let stamp = format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second}");
    if !(0.0..61.0).contains(&second) {
        return Err(GroundTrackError::InvalidDate(format!(
            "'{stamp}': second out of range"
        )));
    }
    let whole = second.trunc();
    let nanos = ((second - whole) * 1e9).round().min(999_999_999.0) as u32;
    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, whole as u8, nanos)
        .map(|epoch| epoch.to_jde_utc_days())
        .map_err(|e| GroundTrackError::InvalidDate(format!("'{stamp}': {e}")))
}

/// Julian date of an ISO-8601 date string (`YYYY-MM-ddTHH:mm:ss`, UTC).
pub fn julian_date_from_str(date: &str) -> Result<JulianDate, GroundTrackError> {
    Epoch::from_str(date)
        .map(|epoch| epoch.to_jde_utc_days())
        .map_err(|e| GroundTrackError::InvalidDate(format!("'{date}': {e}")))
}

/// Julian date → Modified Julian Date.
pub fn jd_to_mjd(jd: JulianDate) -> MJD {
    jd - JDTOMJD
}

/// Modified Julian Date → Julian date.
pub fn mjd_to_jd(mjd: MJD) -> JulianDate {
    mjd + JDTOMJD
}

/// Minutes elapsed between a propagator epoch and an absolute Julian date.
///
/// Negative when `jd` precedes `epoch`.
pub fn minutes_since_epoch(jd: JulianDate, epoch: JulianDate) -> Minutes {
    (jd - epoch) * MINUTES_PER_DAY
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `jd_ut1` - Julian Date (UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # Details
/// The GMST is computed in two steps:
/// 1. Use a cubic polynomial (coefficients C0–C3) to get GMST at 0h UT1
///    in seconds for the given date.
/// 2. Add the contribution of Earth's rotation during the fractional day
///    using the factor `RAP`, which converts solar days to sidereal days.
///
/// The day is split on the MJD boundary (0h UT1) so that the polynomial is
/// evaluated on an integer day count.
///
/// # References
/// * IAU 1982, IERS Conventions 1996/2000.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(jd_ut1: JulianDate) -> Radian {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let tjm = jd_to_mjd(jd_ut1);

    // Integer MJD (0h UT1) and centuries since J2000.0
    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / 86400.0;

    // Fraction of the current day, scaled to sidereal rotation
    let h = (tjm - itjm) * DPI;
    let gmst = gmst0 + h * RAP;

    gmst.rem_euclid(DPI)
}
