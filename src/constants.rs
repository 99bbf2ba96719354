// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;
pub const WS_PATH: &str = "ws";

// Landing page served at / from the static directory
pub const STATIC_INDEX_FILE: &str = "welcome.html";

// Outbox and reporting defaults
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;
pub const DEFAULT_STATS_INTERVAL_SECS: u64 = 10;

// Name given to participants who connect without one
pub const DEFAULT_DISPLAY_NAME: &str = "Stranger";

// Wire tags
pub const STOP_COMMAND: &str = "[STOP]";
pub const TAG_COUNT: &str = "[COUNT]:";
pub const TAG_CONNECT: &str = "[CONNECT]:";
pub const TAG_WAIT: &str = "[WAIT]:";
pub const TAG_PARTNER_LEFT: &str = "[NOTI1]:";
pub const TAG_MESSAGE: &str = "[MSG]:";
