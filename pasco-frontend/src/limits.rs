// Integers are 32-bit signed.
pub const MAXINT: i64 = i32::MAX as i64;
pub const MININT: i64 = i32::MIN as i64;
