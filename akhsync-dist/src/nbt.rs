//! Little-endian NBT, as used by Bedrock `level.dat`.
//!
//! The file on disk is an 8-byte header (`i32` storage version, `i32` payload
//! length, both little-endian) followed by one named root compound. Only what
//! the world-name patch needs is exposed; every tag is decoded so the rest of
//! the file re-encodes unchanged.

use thiserror::Error;

/// Storage version written into the header.
pub const LEVEL_DAT_STORAGE_VERSION: i32 = 10;

/// Key of the world's display name in the root compound.
pub const LEVEL_NAME_KEY: &str = "LevelName";

const HEADER_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NbtError {
    #[error("unexpected end of data at byte {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unknown tag id {id} at byte {offset}")]
    UnknownTag { id: u8, offset: usize },

    #[error("invalid UTF-8 string at byte {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("negative length {len} at byte {offset}")]
    NegativeLength { len: i32, offset: usize },

    #[error("root tag must be a compound, found id {id}")]
    RootNotCompound { id: u8 },

    #[error("{0} is too large to encode")]
    TooLarge(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    /// Element type id plus elements. The id survives empty lists.
    List(u8, Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn id(&self) -> u8 {
        match self {
            Tag::Byte(_) => 1,
            Tag::Short(_) => 2,
            Tag::Int(_) => 3,
            Tag::Long(_) => 4,
            Tag::Float(_) => 5,
            Tag::Double(_) => 6,
            Tag::ByteArray(_) => 7,
            Tag::String(_) => 8,
            Tag::List(..) => 9,
            Tag::Compound(_) => 10,
            Tag::IntArray(_) => 11,
            Tag::LongArray(_) => 12,
        }
    }
}

/// Named tags in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound(pub Vec<(String, Tag)>);

impl Compound {
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Replace the value of `key` in place, or append it.
    pub fn insert(&mut self, key: &str, value: Tag) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key.to_string(), value)),
        }
    }
}

/// The root of an NBT document.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtRoot {
    pub name: String,
    pub compound: Compound,
}

// ---------------------------------------------------------------------------
// level.dat
// ---------------------------------------------------------------------------

/// Strip the level.dat header if `bytes` starts with one.
pub fn strip_header(bytes: &[u8]) -> &[u8] {
    if bytes.len() > HEADER_LEN {
        let declared = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if usize::try_from(declared).ok() == Some(bytes.len() - HEADER_LEN) {
            return &bytes[HEADER_LEN..];
        }
    }
    bytes
}

/// `[storage version][payload length]` followed by `payload`.
pub fn with_header(payload: &[u8]) -> Result<Vec<u8>, NbtError> {
    let len = i32::try_from(payload.len()).map_err(|_| NbtError::TooLarge("level.dat"))?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&LEVEL_DAT_STORAGE_VERSION.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Decode a level.dat (with or without header), set `LevelName`, and
/// re-encode it with a fresh header.
pub fn set_level_name(level_dat: &[u8], name: &str) -> Result<Vec<u8>, NbtError> {
    let mut root = decode(strip_header(level_dat))?;
    root.compound
        .insert(LEVEL_NAME_KEY, Tag::String(name.to_string()));
    with_header(&encode(&root)?)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], NbtError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(NbtError::UnexpectedEof { offset: self.pos })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], NbtError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u8(&mut self) -> Result<u8, NbtError> {
        Ok(self.take(1)?[0])
    }

    fn i8(&mut self) -> Result<i8, NbtError> {
        Ok(i8::from_le_bytes(self.array()?))
    }

    fn i16(&mut self) -> Result<i16, NbtError> {
        Ok(i16::from_le_bytes(self.array()?))
    }

    fn i32(&mut self) -> Result<i32, NbtError> {
        Ok(i32::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> Result<i64, NbtError> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn len(&mut self) -> Result<usize, NbtError> {
        let offset = self.pos;
        let len = self.i32()?;
        usize::try_from(len).map_err(|_| NbtError::NegativeLength { len, offset })
    }

    fn string(&mut self) -> Result<String, NbtError> {
        let len = u16::from_le_bytes(self.array()?) as usize;
        let offset = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| NbtError::InvalidUtf8 { offset })
    }

    fn payload(&mut self, id: u8) -> Result<Tag, NbtError> {
        let offset = self.pos;
        let tag = match id {
            1 => Tag::Byte(self.i8()?),
            2 => Tag::Short(self.i16()?),
            3 => Tag::Int(self.i32()?),
            4 => Tag::Long(self.i64()?),
            5 => Tag::Float(f32::from_le_bytes(self.array()?)),
            6 => Tag::Double(f64::from_le_bytes(self.array()?)),
            7 => {
                let len = self.len()?;
                Tag::ByteArray(self.take(len)?.iter().map(|&b| b as i8).collect())
            }
            8 => Tag::String(self.string()?),
            9 => {
                let element = self.u8()?;
                let len = self.len()?;
                let mut items = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    items.push(self.payload(element)?);
                }
                Tag::List(element, items)
            }
            10 => Tag::Compound(self.compound()?),
            11 => {
                let len = self.len()?;
                let mut items = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    items.push(self.i32()?);
                }
                Tag::IntArray(items)
            }
            12 => {
                let len = self.len()?;
                let mut items = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    items.push(self.i64()?);
                }
                Tag::LongArray(items)
            }
            id => return Err(NbtError::UnknownTag { id, offset }),
        };
        Ok(tag)
    }

    fn compound(&mut self) -> Result<Compound, NbtError> {
        let mut entries = Vec::new();
        loop {
            let id = self.u8()?;
            if id == 0 {
                return Ok(Compound(entries));
            }
            let name = self.string()?;
            entries.push((name, self.payload(id)?));
        }
    }
}

/// Decode a header-less document.
pub fn decode(data: &[u8]) -> Result<NbtRoot, NbtError> {
    let mut reader = Reader { data, pos: 0 };
    let id = reader.u8()?;
    if id != 10 {
        return Err(NbtError::RootNotCompound { id });
    }
    let name = reader.string()?;
    let compound = reader.compound()?;
    Ok(NbtRoot { name, compound })
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn put_len(out: &mut Vec<u8>, len: usize) -> Result<(), NbtError> {
    let len = i32::try_from(len).map_err(|_| NbtError::TooLarge("array"))?;
    out.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn put_string(out: &mut Vec<u8>, s: &str) -> Result<(), NbtError> {
    let len = u16::try_from(s.len()).map_err(|_| NbtError::TooLarge("string"))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

fn put_payload(out: &mut Vec<u8>, tag: &Tag) -> Result<(), NbtError> {
    match tag {
        Tag::Byte(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Short(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Int(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Long(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::Double(v) => out.extend_from_slice(&v.to_le_bytes()),
        Tag::ByteArray(items) => {
            put_len(out, items.len())?;
            out.extend(items.iter().map(|&b| b as u8));
        }
        Tag::String(s) => put_string(out, s)?,
        Tag::List(element, items) => {
            out.push(*element);
            put_len(out, items.len())?;
            for item in items {
                put_payload(out, item)?;
            }
        }
        Tag::Compound(compound) => put_compound(out, compound)?,
        Tag::IntArray(items) => {
            put_len(out, items.len())?;
            for v in items {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        Tag::LongArray(items) => {
            put_len(out, items.len())?;
            for v in items {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    Ok(())
}

fn put_compound(out: &mut Vec<u8>, compound: &Compound) -> Result<(), NbtError> {
    for (name, tag) in &compound.0 {
        out.push(tag.id());
        put_string(out, name)?;
        put_payload(out, tag)?;
    }
    out.push(0);
    Ok(())
}

/// Encode a header-less document.
pub fn encode(root: &NbtRoot) -> Result<Vec<u8>, NbtError> {
    let mut out = vec![10];
    put_string(&mut out, &root.name)?;
    put_compound(&mut out, &root.compound)?;
    Ok(out)
}
