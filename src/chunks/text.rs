use crate::chunks::colorimetry::{deflate, inflate};
use crate::chunks::{validate_keyword, Chunk, ChunkType, DecodeChunk};
use crate::utils::bytes::{latin1_to_string, string_to_latin1, ByteReader, ByteWriter};
use crate::utils::error::{ApngError, ApngResult};

/// tEXt: a keyword and uncompressed Latin-1 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub keyword: String,
    pub text: String,
}

impl Text {
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Text { keyword: keyword.into(), text: text.into() }
    }
}

impl Chunk for Text {
    const TYPE: ChunkType = ChunkType::TEXT;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_null_terminated(&string_to_latin1(&self.keyword))
            .write_bytes(&string_to_latin1(&self.text));
    }
}

impl DecodeChunk for Text {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let keyword = validate_keyword(Self::TYPE, reader.read_null_terminated()?)?;
        let text = latin1_to_string(reader.read_rest());

        Ok(Text { keyword, text })
    }
}

/// zTXt. The compressed bytes are kept as read so the chunk is written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedText {
    pub keyword: String,
    pub compression_method: u8,
    pub compressed_text: Vec<u8>,
}

impl CompressedText {
    pub fn new(keyword: impl Into<String>, text: &str) -> ApngResult<Self> {
        Ok(CompressedText {
            keyword: keyword.into(),
            compression_method: 0,
            compressed_text: deflate(&string_to_latin1(text))?,
        })
    }

    pub fn text(&self) -> ApngResult<String> {
        let bytes = inflate(Self::TYPE, self.compression_method, &self.compressed_text)?;
        Ok(latin1_to_string(&bytes))
    }
}

impl Chunk for CompressedText {
    const TYPE: ChunkType = ChunkType::ZTXT;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_null_terminated(&string_to_latin1(&self.keyword))
            .write_u8(self.compression_method)
            .write_bytes(&self.compressed_text);
    }
}

impl DecodeChunk for CompressedText {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let keyword = validate_keyword(Self::TYPE, reader.read_null_terminated()?)?;
        let compression_method = reader.read_u8()?;
        let compressed_text = reader.read_rest().to_vec();

        Ok(CompressedText { keyword, compression_method, compressed_text })
    }
}

/// iTXt. `text_bytes` holds the UTF-8 text, deflated when
/// `compressed` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternationalText {
    pub keyword: String,
    pub compressed: bool,
    pub compression_method: u8,
    pub language_tag: String,
    pub translated_keyword: String,
    pub text_bytes: Vec<u8>,
}

impl InternationalText {
    pub fn new(
        keyword: impl Into<String>,
        language_tag: impl Into<String>,
        translated_keyword: impl Into<String>,
        text: &str,
        compressed: bool,
    ) -> ApngResult<Self> {
        let text_bytes = if compressed {
            deflate(text.as_bytes())?
        } else {
            text.as_bytes().to_vec()
        };

        Ok(InternationalText {
            keyword: keyword.into(),
            compressed,
            compression_method: 0,
            language_tag: language_tag.into(),
            translated_keyword: translated_keyword.into(),
            text_bytes,
        })
    }

    pub fn text(&self) -> ApngResult<String> {
        let bytes = if self.compressed {
            inflate(Self::TYPE, self.compression_method, &self.text_bytes)?
        } else {
            self.text_bytes.clone()
        };

        String::from_utf8(bytes).map_err(|_| ApngError::invalid_data(Self::TYPE, "text is not valid UTF-8"))
    }
}

impl Chunk for InternationalText {
    const TYPE: ChunkType = ChunkType::ITXT;

    fn write_payload(&self, out: &mut ByteWriter) {
        out.write_null_terminated(&string_to_latin1(&self.keyword))
            .write_u8(self.compressed as u8)
            .write_u8(self.compression_method)
            .write_null_terminated(self.language_tag.as_bytes())
            .write_null_terminated(self.translated_keyword.as_bytes())
            .write_bytes(&self.text_bytes);
    }
}

impl DecodeChunk for InternationalText {
    fn decode(data: &[u8]) -> ApngResult<Self> {
        let mut reader = ByteReader::new(data);

        let keyword = validate_keyword(Self::TYPE, reader.read_null_terminated()?)?;
        let compressed = match reader.read_u8()? {
            0 => false,
            1 => true,
            value => return Err(ApngError::InvalidEnumeration { field: "iTXt compression flag", value }),
        };
        let compression_method = reader.read_u8()?;

        let language_tag = reader.read_null_terminated()?;
        if !language_tag.is_ascii() {
            return Err(ApngError::invalid_data(Self::TYPE, "language tag is not ASCII"));
        }
        let language_tag = latin1_to_string(language_tag);

        let translated_keyword = String::from_utf8(reader.read_null_terminated()?.to_vec())
            .map_err(|_| ApngError::invalid_data(Self::TYPE, "translated keyword is not valid UTF-8"))?;
        let text_bytes = reader.read_rest().to_vec();

        Ok(InternationalText {
            keyword,
            compressed,
            compression_method,
            language_tag,
            translated_keyword,
            text_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_latin1() -> Result<(), Box<dyn std::error::Error>> {
        let text = Text::decode(b"Author\0Andr\xe9")?;

        assert_eq!(text.keyword, "Author");
        assert_eq!(text.text, "Andr\u{e9}");
        assert_eq!(text.to_raw().data(), b"Author\0Andr\xe9");

        Ok(())
    }

    #[test]
    fn test_text_requires_keyword_terminator() {
        assert!(matches!(Text::decode(b"Author"), Err(ApngError::BufferTooShort { .. })));
    }

    #[test]
    fn test_compressed_text() -> Result<(), Box<dyn std::error::Error>> {
        let ztxt = CompressedText::new("Comment", "made by a test")?;
        let decoded = CompressedText::decode(ztxt.to_raw().data())?;

        assert_eq!(decoded.keyword, "Comment");
        assert_eq!(decoded.text()?, "made by a test");

        Ok(())
    }

    #[test]
    fn test_international_text() -> Result<(), Box<dyn std::error::Error>> {
        for compressed in [false, true] {
            let itxt = InternationalText::new("Title", "ja", "\u{984c}\u{540d}", "\u{732b}", compressed)?;
            let decoded = InternationalText::decode(itxt.to_raw().data())?;

            assert_eq!(decoded, itxt);
            assert_eq!(decoded.text()?, "\u{732b}");
            assert_eq!(decoded.translated_keyword, "\u{984c}\u{540d}");
        }

        Ok(())
    }

    #[test]
    fn test_international_text_bad_flag() {
        assert!(matches!(
            InternationalText::decode(b"Title\0\x02\0\0\0"),
            Err(ApngError::InvalidEnumeration { value: 2, .. })
        ));
    }
}
