pub mod bytes;
pub mod crc;
pub mod error;
pub mod info_display;
pub mod logger;
