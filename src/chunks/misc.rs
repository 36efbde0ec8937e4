use std::time::SystemTime;

use crate::chunks::{warn_trailing, Chunk, ChunkType, DecodeChunk};
use crate::utils::bytes::{ByteReader, ByteWriter};
use crate::utils::error::{ApngError, ApngResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalUnit {
    Unknown = 0,
    Meter = 1,
}

/// pHYs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalDimensions {
    pub pixels_per_unit_x: u32,
    pub pixels_per_unit_y: u32,
    pub unit: PhysicalUnit,
}

impl Chunk for PhysicalDimensions {
    const TYPE: ChunkType = ChunkType::PHYS;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u32(self.pixels_per_unit_x)
            .write_u32(self.pixels_per_unit_y)
            .write_u8(self.unit as u8);
    }
}

impl DecodeChunk for PhysicalDimensions {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let pixels_per_unit_x = reader.read_u32()?;
        let pixels_per_unit_y = reader.read_u32()?;
        let unit = match reader.read_u8()? {
            0 => PhysicalUnit::Unknown,
            1 => PhysicalUnit::Meter,
            value => return Err(ApngError::InvalidEnumeration { field: "pHYs unit", value }),
        };
        warn_trailing(&reader, Self::TYPE);

        Ok(PhysicalDimensions { pixels_per_unit_x, pixels_per_unit_y, unit })
    }
}

/// tIME, always in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Timestamp {
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self::from_unix_seconds(secs)
    }

    pub fn from_unix_seconds(secs: u64) -> Self {
        let days = secs / 86400;
        let rem = secs % 86400;
        let (year, month, day) = civil_from_days(days);

        Timestamp {
            year: year as u16,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: (rem / 60 % 60) as u8,
            second: (rem % 60) as u8,
        }
    }
}

// Days since 1970-01-01 to a proleptic Gregorian date, counting in 400-year
// eras that start on March 1st.
fn civil_from_days(days: u64) -> (u64, u8, u8) {
    let z = days + 719468;
    let era = z / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);

    (year, month as u8, day as u8)
}

impl Chunk for Timestamp {
    const TYPE: ChunkType = ChunkType::TIME;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_u16(self.year)
            .write_u8(self.month)
            .write_u8(self.day)
            .write_u8(self.hour)
            .write_u8(self.minute)
            .write_u8(self.second);
    }
}

impl DecodeChunk for Timestamp {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let time = Timestamp {
            year: reader.read_u16()?,
            month: reader.read_u8()?,
            day: reader.read_u8()?,
            hour: reader.read_u8()?,
            minute: reader.read_u8()?,
            second: reader.read_u8()?,
        };
        warn_trailing(&reader, Self::TYPE);

        // Leap seconds make 60 legal.
        if !(1..=12).contains(&time.month)
            || !(1..=31).contains(&time.day)
            || time.hour > 23
            || time.minute > 59
            || time.second > 60
        {
            log::warn!("tIME chunk holds an out-of-range date: {:?}", time);
        }

        Ok(time)
    }
}
