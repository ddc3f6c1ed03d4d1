/// Record layout
pub const FIELD_SEPARATOR: u8 = b';';
pub const LINE_TERMINATOR: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024; // 1MB
pub const QUEUE_DEPTH_PER_WORKER: usize = 2;
pub const DEFAULT_TABLE_CAPACITY: usize = 1024;

/// Largest digit count the fast decimal path handles exactly (10^15 < 2^53)
pub const MAX_FAST_PATH_DIGITS: usize = 15;

/// Report layout
pub const REPORT_OPEN: &str = "{";
pub const REPORT_CLOSE: &str = "}";
pub const REPORT_ENTRY_SEPARATOR: &str = ", ";
