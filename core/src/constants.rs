/// Format family text at the start of every `.rm` v6 file.
/// The header field is fixed width; the version digits follow `HEADER_PREFIX`
/// and the remainder is padded with ASCII spaces.
pub const HEADER_PREFIX: &[u8] = b"reMarkable .lines file, version=";
pub const HEADER_LEN: usize = 43;
pub const FORMAT_VERSION: u8 = 6;

/// Reserved identifiers.
/// - `(0, 0)` means "no parent" / "none".
/// - `(0, 1)` is the fixed scene root.
pub const NONE_AUTHOR: u32 = 0;
pub const NONE_COUNTER: u64 = 0;
pub const ROOT_AUTHOR: u32 = 0;
pub const ROOT_COUNTER: u64 = 1;

/// First counter handed out by a fresh allocator (0 and 1 are reserved).
pub const FIRST_COUNTER: u64 = 2;

/// Author id registered in the author table of a freshly built document.
pub const DEFAULT_AUTHOR: u32 = 1;

/// Block tag identifiers (one byte on the wire).
pub mod tags {
    pub const ROOT: u8             = 0x01;
    pub const GROUP: u8            = 0x02;
    pub const GROUP_MEMBERSHIP: u8 = 0x03;
    pub const STROKE: u8           = 0x04;
    pub const AUTHOR_IDS: u8       = 0x05;
    pub const PAGE_INFO: u8        = 0x06;
    pub const HIGHLIGHT: u8        = 0x07;
}

/// Fixed-point scales for point records.
/// Same resolution the tablet uses for its compact point encoding.
pub mod scales {
    /// pressure in [0, 1] -> u8
    pub const PRESSURE: f64 = 255.0;
    /// speed >= 0 -> u16
    pub const SPEED: f64 = 4.0;
    /// width > 0 -> u16
    pub const WIDTH: f64 = 4.0;
    /// one full turn -> 256 steps (u8)
    pub const DIRECTION_STEPS: f64 = 256.0;
}

/// Point record size on the wire: x f32, y f32, pressure u8, speed u16,
/// direction u8, width u16.
pub const POINT_RECORD_LEN: usize = 4 + 4 + 1 + 2 + 1 + 2;

/// LEB128 encodings of a u64 never exceed 10 bytes.
pub const MAX_VARINT_LEN: usize = 10;
