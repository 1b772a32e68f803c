//! Field tag lookup.
//!
//! A tag is the conventional `key:"value" key2:"value2"` string attached to a
//! struct field. Parsing follows Go's `reflect.StructTag` grammar, so a tag
//! that `go vet` would flag simply stops yielding keys past the bad spot.

/// Borrowed view over a raw tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructTag<'a>(&'a str);

impl<'a> StructTag<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self(raw)
    }

    /// Value stored under `key`, or `None` when the key is absent or the
    /// encoding breaks before it is reached. The first occurrence wins.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut tag: &str = self.0;

        while !tag.is_empty() {
            tag = tag.trim_start_matches(' ');
            if tag.is_empty() {
                break;
            }

            // Key: non-space, non-control, no colon or quote.
            let bytes = tag.as_bytes();
            let mut i = 0;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                break;
            }
            let name: &str = &tag[..i];
            tag = &tag[i + 1..];

            // Quoted value, honouring backslash escapes.
            let bytes = tag.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            let quoted: &str = &tag[..=i];
            tag = &tag[i + 1..];

            if name == key {
                return unquote(quoted);
            }
        }

        None
    }
}

/// Removes Go string literal quoting.
///
/// Accepts raw (`` `...` ``) and interpreted (`"..."`) literals. Returns
/// `None` for anything Go itself would reject.
pub fn unquote(literal: &str) -> Option<String> {
    let len = literal.len();
    if len < 2 {
        return None;
    }

    let body: &str = &literal[1..len - 1];
    match (literal.as_bytes()[0], literal.as_bytes()[len - 1]) {
        (b'`', b'`') => {
            if body.contains('`') {
                return None;
            }
            Some(body.replace('\r', ""))
        }
        (b'"', b'"') => unescape(body),
        _ => None,
    }
}

fn unescape(body: &str) -> Option<String> {
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escape = chars.next()?;
                match escape {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    'x' => out.push(hex_value(&mut chars, 2)? as u8),
                    'u' => push_char(&mut out, char::from_u32(hex_value(&mut chars, 4)?)?),
                    'U' => push_char(&mut out, char::from_u32(hex_value(&mut chars, 8)?)?),
                    '0'..='7' => {
                        let mut value: u32 = escape.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        if value > 0xff {
                            return None;
                        }
                        out.push(value as u8);
                    }
                    _ => return None,
                }
            }
            _ => push_char(&mut out, c),
        }
    }

    // \x and octal escapes may spell arbitrary bytes.
    Some(String::from_utf8_lossy(&out).into_owned())
}

fn hex_value(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<u32> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}
