pub const SYSCLK_HZ: u32 = 16_000_000;
pub const MODULE_BAUD_RATE: u32 = 9600;

pub const DEBOUNCE_MS: u32 = 20;
pub const IDLE_DELAY_MS: u32 = 10;
pub const RESPONSE_TIMEOUT_MS: u32 = 500;
pub const CONNECT_ATTEMPTS: u8 = 5;

pub const EVENT_QUEUE_CAPACITY: usize = 32;
// heapless spsc keeps one slot free
pub const EVENT_QUEUE_SLOTS: usize = EVENT_QUEUE_CAPACITY + 1;

pub const LINE_LEN: usize = 128;
pub const DEV_EUI_GROUP_LEN: usize = 4;
pub const DEV_EUI_OCTETS: usize = 8;

// LoRa-E5 AT command set
pub const CMD_AT: &str = "AT\r\n";
pub const CMD_VERSION: &str = "AT+VER\r\n";
pub const CMD_DEV_EUI: &str = "AT+ID=DevEui\r\n";

pub const TOKEN_OK: &str = "OK";
pub const TOKEN_VERSION: &str = "VER";
pub const TOKEN_DEV_EUI: &str = "DevEui";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    pub connect_attempts: u8,
    pub response_timeout_ms: u32,
}

impl SessionConfig {
    pub const fn new(connect_attempts: u8, response_timeout_ms: u32) -> SessionConfig {
        SessionConfig {
            connect_attempts,
            response_timeout_ms,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::new(CONNECT_ATTEMPTS, RESPONSE_TIMEOUT_MS)
    }
}
