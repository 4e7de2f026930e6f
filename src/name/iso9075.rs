//! ISO 9075 encoding of names that are not valid XML names.
//!
//! Invalid characters are written as `_xHHHH_`; an underscore that would
//! itself be read as the start of such a sequence is encoded as `_x005F_`.

use std::borrow::Cow;

/// Encode a (possibly qualified) name for use as an XML element or attribute
/// name. The namespace prefix is kept; only the local part is encoded.
///
/// # Examples
///
/// ```
/// use contentpack::name::iso9075;
/// assert_eq!(iso9075::encode("jcr:title"), "jcr:title");
/// assert_eq!(iso9075::encode("0abc"), "_x0030_abc");
/// assert_eq!(iso9075::encode("abc#def"), "abc_x0023_def");
/// ```
pub fn encode(name: &str) -> Cow<'_, str> {
    if let Some((prefix, local)) = name.split_once(':')
        && !prefix.is_empty()
        && is_ncname(prefix)
    {
        return match encode_local(local) {
            Cow::Borrowed(_) => Cow::Borrowed(name),
            Cow::Owned(encoded) => Cow::Owned(format!("{}:{}", prefix, encoded)),
        };
    }
    encode_local(name)
}

fn encode_local(name: &str) -> Cow<'_, str> {
    if name.is_empty() || (is_ncname(name) && !name.contains("_x")) {
        return Cow::Borrowed(name);
    }
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 8);
    for (i, &c) in chars.iter().enumerate() {
        let valid = if i == 0 {
            is_name_start_char(c)
        } else {
            is_name_char(c)
        };
        if !valid || c == ':' {
            push_encoded(&mut out, c);
        } else if c == '_' && looks_encoded(&chars[i..]) {
            push_encoded(&mut out, '_');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Decode `_xHHHH_` sequences.
///
/// # Examples
///
/// ```
/// use contentpack::name::iso9075;
/// assert_eq!(iso9075::decode("_x0030_abc"), "0abc");
/// assert_eq!(iso9075::decode("jcr:content"), "jcr:content");
/// ```
pub fn decode(name: &str) -> Cow<'_, str> {
    if !name.contains("_x") {
        return Cow::Borrowed(name);
    }
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '_' && looks_encoded(&chars[i..]) {
            let hex: String = chars[i + 2..i + 6].iter().collect();
            if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                out.push(decoded);
                i += 7;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    Cow::Owned(out)
}

/// `_xHHHH_` at the start of `chars`.
fn looks_encoded(chars: &[char]) -> bool {
    chars.len() >= 7
        && chars[0] == '_'
        && chars[1] == 'x'
        && chars[2..6].iter().all(char::is_ascii_hexdigit)
        && chars[6] == '_'
}

fn push_encoded(out: &mut String, c: char) {
    out.push_str(&format!("_x{:04X}_", c as u32));
}

fn is_ncname(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first != ':' && is_name_start_char(first) => {
            chars.all(|c| c != ':' && is_name_char(c))
        },
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}
