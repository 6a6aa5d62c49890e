//! Exit codes of the `pulumi-crd` binary

/// Success - CRD written
pub const SUCCESS: u8 = 0;

/// User error - bad flags, unreadable or invalid input, selection, preflight,
/// identity, or nothing left to translate
pub const USAGE_ERROR: u8 = 2;

/// Unsupported construct that cannot be skipped (cyclic ref, enum type mismatch)
pub const UNSUPPORTED: u8 = 3;

/// Output error - serialization or write failure, or cancelled while loading
pub const OUTPUT_ERROR: u8 = 4;
