//! Wallpaper catalog parsing.
//!
//! The catalog is the `backgrounds.xml` file the GNOME Appearance dialog keeps
//! its wallpaper list in:
//!
//! ```xml
//! <wallpapers>
//!   <wallpaper deleted="false">
//!     <name>Dunes</name>
//!     <filename>/usr/share/backgrounds/dunes.jpg</filename>
//!     <options>zoom</options>
//!   </wallpaper>
//! </wallpapers>
//! ```

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::entry::{CatalogRecord, DeletedFlag};
use crate::error::CatalogError;
use crate::Result;

pub const DEFAULT_CATALOG_FILE: &str = "~/.gnome2/backgrounds.xml";

/// The default catalog location with `~` expanded for the current user.
pub fn default_catalog_path() -> Result<PathBuf> {
    if dirs::home_dir().is_none() {
        return Err(CatalogError::NoHomeDir.into());
    }
    Ok(expand_tilde(DEFAULT_CATALOG_FILE))
}

/// Expands a leading `~` or `~/` to the home directory. Anything else,
/// including `~user`, is returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

pub fn parse(path: &Path) -> Result<Vec<CatalogRecord>> {
    if !path.exists() {
        return Err(CatalogError::NotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let records = parse_str(&content)?;
    log::info!("Parsed {} catalog records from {:?}", records.len(), path);
    Ok(records)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Filename,
    Options,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"name" => Some(Field::Name),
            b"filename" => Some(Field::Filename),
            b"options" => Some(Field::Options),
            _ => None,
        }
    }
}

/// A `<wallpaper>` element being read.
#[derive(Default)]
struct PartialRecord {
    deleted: DeletedFlag,
    name: Option<String>,
    filename: Option<String>,
    options: Option<String>,
    field: Option<Field>,
    text: String,
}

impl PartialRecord {
    fn start(element: &BytesStart) -> Result<Self> {
        let deleted = match element.try_get_attribute("deleted")? {
            Some(attr) => DeletedFlag::Text(attr.unescape_value()?.into_owned()),
            None => DeletedFlag::default(),
        };

        Ok(Self {
            deleted,
            ..Self::default()
        })
    }

    // First occurrence wins when a child is repeated
    fn set_field(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Filename => &mut self.filename,
            Field::Options => &mut self.options,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    /// Deleted records are skipped before their children are looked at, and
    /// `<options>` only matters for a record that can be applied.
    fn finish(self, index: usize) -> Result<CatalogRecord> {
        let missing = |child: &str| -> crate::WallshufError {
            CatalogError::Parse {
                message: format!("wallpaper record {} has no <{}> element", index, child),
            }
            .into()
        };

        let has_filename = self.filename.is_some();
        let has_options = self.options.is_some();
        let record = CatalogRecord {
            deleted: self.deleted,
            name: self.name,
            filename: self.filename.unwrap_or_default(),
            options: self.options.unwrap_or_default(),
        };

        if record.deleted.is_set() {
            return Ok(record);
        }
        if !has_filename {
            return Err(missing("filename"));
        }
        if !has_options && record.is_selectable() {
            return Err(missing("options"));
        }
        Ok(record)
    }
}

/// Parses catalog XML. Only `<wallpaper>` elements directly under the root
/// element are records. Element text is kept exactly as written.
pub fn parse_str(xml: &str) -> Result<Vec<CatalogRecord>> {
    let mut reader = Reader::from_str(xml);

    let mut records = Vec::new();
    let mut current: Option<PartialRecord> = None;
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| CatalogError::Parse {
            message: format!("at byte {}: {}", reader.buffer_position(), e),
        })?;

        match event {
            Event::Start(ref e) => {
                depth += 1;
                match depth {
                    1 => {
                        if seen_root {
                            return Err(parse_error("more than one root element"));
                        }
                        seen_root = true;
                    }
                    2 if e.name().as_ref() == b"wallpaper" => {
                        current = Some(PartialRecord::start(e)?);
                    }
                    3 => {
                        if let Some(record) = current.as_mut() {
                            record.field = Field::from_tag(e.name().as_ref());
                            record.text.clear();
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(ref e) => match depth + 1 {
                1 => {
                    if seen_root {
                        return Err(parse_error("more than one root element"));
                    }
                    seen_root = true;
                }
                2 if e.name().as_ref() == b"wallpaper" => {
                    let record = PartialRecord::start(e)?;
                    records.push(record.finish(records.len())?);
                }
                3 => {
                    if let (Some(record), Some(field)) =
                        (current.as_mut(), Field::from_tag(e.name().as_ref()))
                    {
                        record.set_field(field, String::new());
                    }
                }
                _ => {}
            },
            Event::Text(ref t) if depth == 3 => {
                if let Some(record) = current.as_mut().filter(|r| r.field.is_some()) {
                    record.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(ref c) if depth == 3 => {
                if let Some(record) = current.as_mut().filter(|r| r.field.is_some()) {
                    record.text.push_str(&String::from_utf8_lossy(c));
                }
            }
            Event::End(_) => {
                match depth {
                    3 => {
                        if let Some(record) = current.as_mut() {
                            if let Some(field) = record.field.take() {
                                let text = std::mem::take(&mut record.text);
                                record.set_field(field, text);
                            }
                        }
                    }
                    2 => {
                        if let Some(record) = current.take() {
                            records.push(record.finish(records.len())?);
                        }
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(parse_error("document has no root element"));
    }
    if depth != 0 {
        return Err(parse_error("unexpected end of document"));
    }

    log::debug!("Catalog contains {} wallpaper records", records.len());
    Ok(records)
}

fn parse_error(message: &str) -> crate::WallshufError {
    CatalogError::Parse {
        message: message.to_string(),
    }
    .into()
}
