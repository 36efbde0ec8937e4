const CRC_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            if c & 1 == 1 {
                c = 0xedb88320u32 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
};

/// Incremental CRC-32 (reflected, polynomial 0xEDB88320) as used by PNG chunks.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    register: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    pub fn new() -> Self {
        Crc32 { register: 0xffffffff }
    }

    pub fn update(&mut self, buf: &[u8]) -> &mut Self {
        let mut c = self.register;
        for &b in buf {
            c = CRC_TABLE[((c ^ u32::from(b)) & 0xff) as usize] ^ (c >> 8);
        }
        self.register = c;
        self
    }

    pub fn finish(&self) -> u32 {
        self.register ^ 0xffffffff
    }
}

/// Computes the CRC over several slices as if they were one contiguous buffer.
pub fn crc32(parts: &[&[u8]]) -> u32 {
    let mut crc = Crc32::new();
    for part in parts {
        crc.update(part);
    }
    crc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_known_values() {
        assert_eq!(crc32(&[b""]), 0);
        assert_eq!(crc32(&[b"123456789"]), 0xcbf43926);
        assert_eq!(crc32(&[b"IEND"]), 0xae426082);
    }

    #[test]
    pub fn test_split_input() {
        assert_eq!(crc32(&[b"IHDR", b"\x00\x00\x00\x01"]), crc32(&[b"IHDR\x00\x00\x00\x01"]));
    }
}
