/// Error code registry for parmap
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 4000-4999: Execution errors
/// - 7000-7999: Validation errors
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;
    pub const CONFIG_PATH_ERROR: u16 = 1006;
    pub const CONFIG_SERIALIZE_ERROR: u16 = 1007;

    // Execution errors (4000-4999)
    pub const EXEC_GENERIC: u16 = 4000;
    pub const EXEC_TRANSFORM_FAILED: u16 = 4001;
    pub const EXEC_WORKER_PANICKED: u16 = 4002;
    pub const EXEC_IO_ERROR: u16 = 4004;
    pub const EXEC_OUTPUT_ERROR: u16 = 4008;

    // Validation errors (7000-7999)
    pub const VALIDATION_GENERIC: u16 = 7000;
    pub const VALIDATION_OUT_OF_RANGE: u16 = 7003;
    pub const VALIDATION_OUTPUT_MISMATCH: u16 = 7010;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid TOML syntax in configuration",
        1005 => "Invalid value in configuration",
        1006 => "Configuration path error",
        1007 => "Failed to serialize configuration",

        // Execution errors
        4000 => "Generic execution error",
        4001 => "Transform failed on an element",
        4002 => "Transform panicked inside a worker",
        4004 => "I/O error during execution",
        4008 => "Failed to write command output",

        // Validation errors
        7000 => "Generic validation error",
        7003 => "Value out of range",
        7010 => "Parallel output diverged from sequential baseline",

        // Other errors
        9000 => "Generic error",

        _ => match code {
            1000..=1999 => "Configuration error",
            4000..=4999 => "Execution error",
            7000..=7999 => "Validation error",
            _ => "Unknown error",
        },
    }
}
