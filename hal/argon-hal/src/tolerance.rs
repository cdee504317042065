//! Compile-time tolerance checks
//!
//! Baud rates and similar settings are produced by dividing a fixed clock,
//! so only a discrete ladder of values is achievable. Bindings compute the
//! closest achievable value in a `const` context and check it here; an
//! out-of-tolerance request fails the build instead of producing a silently
//! mistuned peripheral.
//!
//! All arithmetic is integer (parts per thousand), so it is usable in
//! `const` evaluation and never needs floating point.

/// Check whether `available` lies within `tolerance` parts per thousand of
/// `requested`
///
/// Holds iff `|available - requested| * 1000 <= requested * tolerance`.
/// A request of zero is only satisfied by exactly zero.
pub const fn is_value_in_tolerance(available: u32, requested: u32, tolerance: u16) -> bool {
    let available = available as u64;
    let requested = requested as u64;
    let difference = if available > requested {
        available - requested
    } else {
        requested - available
    };
    difference * 1000 <= requested * tolerance as u64
}

/// Relative deviation of `available` from `requested` in parts per
/// thousand, rounded up
///
/// Returns `u32::MAX` for a zero request with a non-zero available value.
pub const fn relative_error_ppt(available: u32, requested: u32) -> u32 {
    let available = available as u64;
    let requested = requested as u64;
    let difference = if available > requested {
        available - requested
    } else {
        requested - available
    };
    if difference == 0 {
        return 0;
    }
    if requested == 0 {
        return u32::MAX;
    }
    let ppt = (difference * 1000 + requested - 1) / requested;
    if ppt > u32::MAX as u64 {
        u32::MAX
    } else {
        ppt as u32
    }
}

/// Abort const evaluation if `available` is not within tolerance
///
/// Call from an inline `const { }` block so the failure surfaces at build
/// time. The compiler's error names the instantiation that failed, which
/// carries the requested value.
pub const fn assert_in_tolerance(available: u32, requested: u32, tolerance: u16) {
    assert!(
        is_value_in_tolerance(available, requested, tolerance),
        "The closest available value exceeds the tolerance of the requested value!"
    );
}

/// Compile-time baud rate check for explicit numbers
///
/// Referencing [`BaudrateTolerance::CHECK`] forces evaluation; it fails to
/// compile when `AVAILABLE` is out of tolerance of `REQUESTED`, and the
/// error message names all three parameters.
///
/// ```
/// use argon_hal::tolerance::BaudrateTolerance;
///
/// let () = BaudrateTolerance::<115_200, 115_384, 10>::CHECK;
/// ```
///
/// ```compile_fail
/// use argon_hal::tolerance::BaudrateTolerance;
///
/// let () = BaudrateTolerance::<9_600, 10_000, 5>::CHECK;
/// ```
pub struct BaudrateTolerance<const AVAILABLE: u32, const REQUESTED: u32, const TOLERANCE: u16>;

impl<const AVAILABLE: u32, const REQUESTED: u32, const TOLERANCE: u16>
    BaudrateTolerance<AVAILABLE, REQUESTED, TOLERANCE>
{
    /// Evaluates to `()` or fails the build
    pub const CHECK: () = assert!(
        is_value_in_tolerance(AVAILABLE, REQUESTED, TOLERANCE),
        "The closest available baudrate exceeds the tolerance of the requested baudrate!"
    );
}
