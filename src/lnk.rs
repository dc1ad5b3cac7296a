//! Pure Rust reader for Windows Shell Link (`.lnk`) files.
//!
//! Only the parts needed to find the link target are parsed: the header, the
//! LinkInfo structure and, as a fallback, the relative path string.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::shortcut::ShortcutResolver;

const HEADER_SIZE: u32 = 0x4C;

const LINK_CLSID: [u8; 16] = [
    0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
];

// LinkFlags
const HAS_LINK_TARGET_ID_LIST: u32 = 0x0000_0001;
const HAS_LINK_INFO: u32 = 0x0000_0002;
const HAS_NAME: u32 = 0x0000_0004;
const HAS_RELATIVE_PATH: u32 = 0x0000_0008;
const IS_UNICODE: u32 = 0x0000_0080;

// LinkInfoFlags
const VOLUME_ID_AND_LOCAL_BASE_PATH: u32 = 0x0000_0001;
const COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX: u32 = 0x0000_0002;

/// LinkInfo headers at least this large carry the Unicode offsets.
const LINK_INFO_UNICODE_HEADER_SIZE: u32 = 0x24;

/// Resolves shortcut targets by parsing the `.lnk` file on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct LnkShortcutResolver;

impl ShortcutResolver for LnkShortcutResolver {
    fn resolve_target(&self, shortcut_path: &Path) -> Result<String> {
        let data = fs::read(shortcut_path)
            .with_context(|| format!("Failed to read shortcut {}", shortcut_path.display()))?;

        let target = parse_link_target(&data)
            .with_context(|| format!("Malformed shortcut {}", shortcut_path.display()))?;

        Ok(match target {
            LinkTarget::Absolute(path) => path,
            LinkTarget::Relative(relative) => match shortcut_path.parent() {
                Some(dir) => dir.join(relative).to_string_lossy().into_owned(),
                None => relative,
            },
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LinkTarget {
    Absolute(String),
    /// Relative to the directory holding the shortcut.
    Relative(String),
}

/// Little-endian view over the shortcut bytes with bounds-checked reads.
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn u16_at(&self, offset: usize) -> Result<u16> {
        let bytes = self.slice(offset, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32_at(&self, offset: usize) -> Result<u32> {
        let bytes = self.slice(offset, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .with_context(|| format!("unexpected end of data at offset {offset:#x}"))
    }

    /// NUL-terminated single-byte string, decoded as Latin-1.
    fn ansi_string_at(&self, offset: usize) -> Result<String> {
        let rest = self
            .data
            .get(offset..)
            .with_context(|| format!("string offset {offset:#x} out of range"))?;
        let end = rest
            .iter()
            .position(|&b| b == 0)
            .context("unterminated string")?;
        Ok(rest[..end].iter().map(|&b| char::from(b)).collect())
    }

    /// NUL-terminated UTF-16LE string.
    fn unicode_string_at(&self, offset: usize) -> Result<String> {
        let mut units = Vec::new();
        let mut pos = offset;
        loop {
            let unit = self.u16_at(pos)?;
            if unit == 0 {
                break;
            }
            units.push(unit);
            pos += 2;
        }
        Ok(String::from_utf16_lossy(&units))
    }
}

fn parse_link_target(data: &[u8]) -> Result<LinkTarget> {
    let reader = Reader { data };

    if reader.u32_at(0)? != HEADER_SIZE {
        bail!("invalid shell link header size");
    }
    if reader.slice(4, 16)? != LINK_CLSID {
        bail!("invalid shell link CLSID");
    }

    let flags = reader.u32_at(0x14)?;
    let mut offset = HEADER_SIZE as usize;

    if flags & HAS_LINK_TARGET_ID_LIST != 0 {
        let id_list_size = reader.u16_at(offset)? as usize;
        offset += 2 + id_list_size;
    }

    if flags & HAS_LINK_INFO != 0 {
        let link_info_size = reader.u32_at(offset)? as usize;
        if let Some(target) = parse_link_info(&reader, offset)? {
            return Ok(LinkTarget::Absolute(target));
        }
        offset += link_info_size;
    }

    if flags & HAS_RELATIVE_PATH != 0 {
        let unicode = flags & IS_UNICODE != 0;
        if flags & HAS_NAME != 0 {
            let (_, next) = read_string_data(&reader, offset, unicode)?;
            offset = next;
        }
        let (relative, _) = read_string_data(&reader, offset, unicode)?;
        if !relative.is_empty() {
            return Ok(LinkTarget::Relative(relative));
        }
    }

    bail!("shortcut does not contain a target path")
}

fn parse_link_info(reader: &Reader<'_>, start: usize) -> Result<Option<String>> {
    let header_size = reader.u32_at(start + 4)?;
    let info_flags = reader.u32_at(start + 8)?;
    let local_base_path_offset = reader.u32_at(start + 16)? as usize;
    let network_link_offset = reader.u32_at(start + 20)? as usize;
    let suffix_offset = reader.u32_at(start + 24)? as usize;

    let has_unicode = header_size >= LINK_INFO_UNICODE_HEADER_SIZE;
    let unicode_base_offset = if has_unicode {
        reader.u32_at(start + 28)? as usize
    } else {
        0
    };
    let unicode_suffix_offset = if has_unicode {
        reader.u32_at(start + 32)? as usize
    } else {
        0
    };

    let suffix = if unicode_suffix_offset != 0 {
        reader.unicode_string_at(start + unicode_suffix_offset)?
    } else if suffix_offset != 0 {
        reader.ansi_string_at(start + suffix_offset)?
    } else {
        String::new()
    };

    if info_flags & VOLUME_ID_AND_LOCAL_BASE_PATH != 0 {
        let base = if unicode_base_offset != 0 {
            reader.unicode_string_at(start + unicode_base_offset)?
        } else {
            reader.ansi_string_at(start + local_base_path_offset)?
        };
        return Ok(Some(join_windows_path(&base, &suffix)));
    }

    if info_flags & COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX != 0 {
        let link_start = start + network_link_offset;
        let net_name_offset = reader.u32_at(link_start + 8)? as usize;
        let net_name = reader.ansi_string_at(link_start + net_name_offset)?;
        return Ok(Some(join_windows_path(&net_name, &suffix)));
    }

    Ok(None)
}

/// Reads a StringData entry; returns the string and the offset after it.
fn read_string_data(reader: &Reader<'_>, offset: usize, unicode: bool) -> Result<(String, usize)> {
    let count = reader.u16_at(offset)? as usize;
    let start = offset + 2;
    if unicode {
        let bytes = reader.slice(start, count * 2)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok((String::from_utf16_lossy(&units), start + count * 2))
    } else {
        let bytes = reader.slice(start, count)?;
        Ok((bytes.iter().map(|&b| char::from(b)).collect(), start + count))
    }
}

fn join_windows_path(base: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        base.to_string()
    } else if base.ends_with('\\') {
        format!("{base}{suffix}")
    } else {
        format!("{base}\\{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(flags: u32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&HEADER_SIZE.to_le_bytes());
        data.extend_from_slice(&LINK_CLSID);
        data.extend_from_slice(&flags.to_le_bytes());
        data.resize(HEADER_SIZE as usize, 0);
        data
    }

    fn link_info_local(base: &str, suffix: &str) -> Vec<u8> {
        const INFO_HEADER: u32 = 0x1C;
        let volume_id = [0x10u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x10, 0, 0, 0, 0];
        let base_offset = INFO_HEADER as usize + volume_id.len();
        let suffix_offset = base_offset + base.len() + 1;
        let size = suffix_offset + suffix.len() + 1;

        let mut info = Vec::new();
        for value in [
            size as u32,
            INFO_HEADER,
            VOLUME_ID_AND_LOCAL_BASE_PATH,
            INFO_HEADER,
            base_offset as u32,
            0,
            suffix_offset as u32,
        ] {
            info.extend_from_slice(&value.to_le_bytes());
        }
        info.extend_from_slice(&volume_id);
        info.extend_from_slice(base.as_bytes());
        info.push(0);
        info.extend_from_slice(suffix.as_bytes());
        info.push(0);
        info
    }

    #[test]
    fn test_local_base_path() {
        let mut data = header(HAS_LINK_INFO);
        data.extend(link_info_local(r"C:\Program Files\App\App.exe", ""));

        let target = parse_link_target(&data).unwrap();
        assert_eq!(
            target,
            LinkTarget::Absolute(r"C:\Program Files\App\App.exe".to_string())
        );
    }

    #[test]
    fn test_id_list_is_skipped_and_suffix_joined() {
        let mut data = header(HAS_LINK_TARGET_ID_LIST | HAS_LINK_INFO);
        data.extend_from_slice(&4u16.to_le_bytes());
        data.extend_from_slice(&[0xAA, 0xBB, 0, 0]);
        data.extend(link_info_local(r"C:\Tools", "Help.chm"));

        let target = parse_link_target(&data).unwrap();
        assert_eq!(target, LinkTarget::Absolute(r"C:\Tools\Help.chm".to_string()));
    }

    fn utf16z(text: &str) -> Vec<u8> {
        text.encode_utf16()
            .chain([0])
            .flat_map(u16::to_le_bytes)
            .collect()
    }

    fn u32_fields(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_network_share_with_suffix() {
        const INFO_HEADER: u32 = 0x1C;
        let net_name = b"\\\\server\\share\0";
        // CommonNetworkRelativeLink: size, flags, net name offset, device name offset, provider.
        let network_link_len = 20 + net_name.len();
        let suffix = b"App\\App.exe\0";
        let suffix_offset = INFO_HEADER as usize + network_link_len;
        let size = suffix_offset + suffix.len();

        let mut data = header(HAS_LINK_INFO);
        data.extend(u32_fields(&[
            size as u32,
            INFO_HEADER,
            COMMON_NETWORK_RELATIVE_LINK_AND_PATH_SUFFIX,
            0,
            0,
            INFO_HEADER,
            suffix_offset as u32,
        ]));
        data.extend(u32_fields(&[network_link_len as u32, 0, 20, 0, 0]));
        data.extend_from_slice(net_name);
        data.extend_from_slice(suffix);

        let target = parse_link_target(&data).unwrap();
        assert_eq!(
            target,
            LinkTarget::Absolute(r"\\server\share\App\App.exe".to_string())
        );
    }

    #[test]
    fn test_unicode_link_info_is_preferred() {
        const INFO_HEADER: u32 = 0x24;
        let volume_id = [0x10u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x10, 0, 0, 0, 0];
        let ansi_base = b"C:\\PROGRA~1\0";
        let unicode_base = utf16z(r"C:\Programme\Café");
        let unicode_suffix = utf16z("App.exe");

        let ansi_base_offset = INFO_HEADER as usize + volume_id.len();
        let ansi_suffix_offset = ansi_base_offset + ansi_base.len();
        let unicode_base_offset = ansi_suffix_offset + 1;
        let unicode_suffix_offset = unicode_base_offset + unicode_base.len();
        let size = unicode_suffix_offset + unicode_suffix.len();

        let mut data = header(HAS_LINK_INFO);
        data.extend(u32_fields(&[
            size as u32,
            INFO_HEADER,
            VOLUME_ID_AND_LOCAL_BASE_PATH,
            INFO_HEADER,
            ansi_base_offset as u32,
            0,
            ansi_suffix_offset as u32,
            unicode_base_offset as u32,
            unicode_suffix_offset as u32,
        ]));
        data.extend_from_slice(&volume_id);
        data.extend_from_slice(ansi_base);
        data.push(0);
        data.extend(unicode_base);
        data.extend(unicode_suffix);

        let target = parse_link_target(&data).unwrap();
        assert_eq!(
            target,
            LinkTarget::Absolute(r"C:\Programme\Café\App.exe".to_string())
        );
    }

    #[test]
    fn test_relative_path_fallback() {
        let mut data = header(HAS_NAME | HAS_RELATIVE_PATH | IS_UNICODE);
        for text in ["Launch the app", r"..\App\App.exe"] {
            let units: Vec<u16> = text.encode_utf16().collect();
            data.extend_from_slice(&(units.len() as u16).to_le_bytes());
            for unit in units {
                data.extend_from_slice(&unit.to_le_bytes());
            }
        }

        let target = parse_link_target(&data).unwrap();
        assert_eq!(target, LinkTarget::Relative(r"..\App\App.exe".to_string()));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_link_target(b"not a shortcut").is_err());

        let mut data = header(0);
        data[4] = 0xFF;
        assert!(parse_link_target(&data).is_err());

        // Valid header but no target information at all.
        assert!(parse_link_target(&header(0)).is_err());

        // LinkInfo flag set but the data is truncated.
        let mut truncated = header(HAS_LINK_INFO);
        truncated.extend_from_slice(&[0x40, 0, 0]);
        assert!(parse_link_target(&truncated).is_err());
    }

    #[test]
    fn test_resolver_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("App.lnk");
        let mut data = header(HAS_LINK_INFO);
        data.extend(link_info_local(r"C:\Prog\App.exe", ""));
        fs::write(&path, data).unwrap();

        let target = LnkShortcutResolver.resolve_target(&path).unwrap();
        assert_eq!(target, r"C:\Prog\App.exe");

        assert!(LnkShortcutResolver
            .resolve_target(&dir.path().join("Missing.lnk"))
            .is_err());
    }
}
