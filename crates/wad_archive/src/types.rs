//! Base types for the structure of a WAD file.

use binrw::{BinRead, BinWrite};

/// Size of the fixed file header in bytes.
pub const HEADER_SIZE: u32 = 12;

/// Size of one descriptor table entry in bytes.
pub const DESCRIPTOR_SIZE: u32 = 16;

/// WAD file header
///
/// All data is stored in little endian format. The magic bytes are not
/// validated: whatever identifier the file carries is kept and written back
/// verbatim on save.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct WadHeader {
    /// The 4-byte ASCII identifier, typically `IWAD` or `PWAD`
    pub magic: [u8; 4],

    /// The number of entries in the descriptor table
    pub lump_count: u32,

    /// The absolute offset of the descriptor table from the start of the file
    pub directory_offset: u32,
}

impl Default for WadHeader {
    fn default() -> Self {
        Self {
            magic: [0; 4],
            lump_count: 0,
            directory_offset: HEADER_SIZE,
        }
    }
}

/// WAD descriptor
///
/// One entry of the descriptor table, describing a single lump.
#[derive(BinRead, BinWrite, Debug, Clone, Default, PartialEq)]
#[brw(little)]
pub struct WadDescriptor {
    /// The absolute offset of the lump's data from the start of the file
    pub offset: u32,

    /// The size of the lump's data in bytes; marker lumps carry zero
    pub length: u32,

    /// The lump's name, decoded from the 8-byte name field
    #[br(map = LumpName::decode)]
    #[bw(map = LumpName::encode)]
    pub name: LumpName,
}

/// True for names of the `E<digit>M<digit>` map marker shape.
pub(crate) fn is_map_marker(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 4
        && bytes[0] == b'E'
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'M'
        && bytes[3].is_ascii_digit()
}

/// Decoded form of the 8-byte lump name field.
///
/// Decoding trims trailing NUL and space bytes. A historical archive variant
/// stores a trailing `/`; it is dropped from the text and kept on a flag so
/// that encoding can reproduce the original bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LumpName {
    text: String,
    trailing_slash: bool,
}

impl LumpName {
    /// A name with the given text and no trailing-slash flag.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            trailing_slash: false,
        }
    }

    /// Decode a raw 8-byte name field.
    pub fn decode(raw: [u8; 8]) -> Self {
        let mut len = raw.len();
        while len > 0 && (raw[len - 1] == 0 || raw[len - 1] == b' ') {
            len -= 1;
        }
        let trailing_slash = len > 0 && raw[len - 1] == b'/';
        if trailing_slash {
            len -= 1;
        }
        Self {
            text: String::from_utf8_lossy(&raw[..len]).into_owned(),
            trailing_slash,
        }
    }

    /// Encode back into the 8-byte field: text truncated to 8 bytes, the
    /// preserved `/` re-appended when a byte of room remains, NUL padding.
    pub fn encode(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        let bytes = self.text.as_bytes();
        let len = bytes.len().min(out.len());
        out[..len].copy_from_slice(&bytes[..len]);
        if self.trailing_slash && len < out.len() {
            out[len] = b'/';
        }
        out
    }

    /// The decoded text, marker suffixes included.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the raw field carried a trailing `/`.
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// True for `<DIR>_START` namespace openers.
    pub fn is_namespace_start(&self) -> bool {
        self.text.len() > 6 && self.text.ends_with("_START")
    }

    /// True for `<DIR>_END` namespace closers.
    pub fn is_namespace_end(&self) -> bool {
        self.text.len() > 4 && self.text.ends_with("_END")
    }

    /// True for the `E<digit>M<digit>` map marker shape.
    pub fn is_map_marker(&self) -> bool {
        is_map_marker(&self.text)
    }

    /// The name with any `_START`/`_END` suffix stripped; map markers and
    /// regular names are returned verbatim.
    pub fn clean(&self) -> &str {
        if self.is_namespace_start() {
            &self.text[..self.text.len() - 6]
        } else if self.is_namespace_end() {
            &self.text[..self.text.len() - 4]
        } else {
            &self.text
        }
    }
}
