//! Appfilter normalization.
//!
//! An icon pack's `appfilter.xml` maps launcher components to drawables:
//!
//! ```xml
//! <resources>
//!   <item component="ComponentInfo{com.android.chrome/com.google.android.apps.chrome.Main}"
//!         name="Chrome" drawable="chrome"/>
//! </resources>
//! ```
//!
//! HyperOS themes key icons by package instead of component, so the table is
//! reduced to one row per package and written as `icon_mapper.xml`:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <resources>
//!   <item name="Chrome" package="com.android.chrome" drawable="chrome"/>
//! </resources>
//! ```

use crate::{
    bail,
    pipeline::{
        error::{Context, ErrorExt, Result},
        report::{MappingReport, MappingSkip, MappingSkipReason},
    },
};
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, Event},
};
use regex::Regex;
use std::{
    collections::BTreeMap,
    path::Path,
    sync::LazyLock,
};

static COMPONENT_INFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ComponentInfo\{([^/]+)/.*?\}").expect("component pattern is valid")
});

/// One `item` row of the source appfilter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceItem {
    pub component: String,
    pub name: String,
    pub drawable: String,
}

/// One row of the normalized mapping.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MappingEntry {
    /// Display name of the application.
    pub name: String,
    /// Android package, the deduplication key.
    pub package: String,
    /// Drawable resource name; the SVG is `<drawable>.svg`.
    pub drawable: String,
}

/// Extracts the package from `ComponentInfo{<package>/<class>}`.
pub fn parse_component_info(component: &str) -> Option<String> {
    COMPONENT_INFO
        .captures(component)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Reduces appfilter rows to one entry per package.
///
/// Rows without a component or drawable, or whose component does not parse,
/// are returned as skips. When several rows share a package the one that
/// appears last in the source wins. The result is sorted by package.
pub fn dedup_items(items: &[SourceItem]) -> (Vec<MappingEntry>, Vec<MappingSkip>) {
    let mut unique: BTreeMap<String, MappingEntry> = BTreeMap::new();
    let mut skipped = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let reason = if item.component.is_empty() {
            Some(MappingSkipReason::MissingComponent)
        } else if item.drawable.is_empty() {
            Some(MappingSkipReason::MissingDrawable)
        } else {
            None
        };

        let package = match reason {
            Some(reason) => Err(reason),
            None => parse_component_info(&item.component)
                .ok_or(MappingSkipReason::UnparseableComponent),
        };

        match package {
            Ok(package) => {
                unique.insert(
                    package.clone(),
                    MappingEntry {
                        name: item.name.clone(),
                        package,
                        drawable: item.drawable.clone(),
                    },
                );
            }
            Err(reason) => skipped.push(MappingSkip {
                index,
                component: item.component.clone(),
                drawable: item.drawable.clone(),
                reason,
            }),
        }
    }

    (unique.into_values().collect(), skipped)
}

/// Reads the attributes of every `item` element directly under the root.
///
/// Fails if the document is not well-formed, has no root element, or ends
/// before the root is closed.
fn read_item_rows(xml: &str) -> Result<Vec<BTreeMap<String, String>>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rows = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 0 {
                    if seen_root {
                        bail!("document has more than one root element");
                    }
                    seen_root = true;
                } else if depth == 1 && e.name().as_ref() == b"item" {
                    rows.push(read_attributes(&e)?);
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 0 {
                    if seen_root {
                        bail!("document has more than one root element");
                    }
                    seen_root = true;
                } else if depth == 1 && e.name().as_ref() == b"item" {
                    rows.push(read_attributes(&e)?);
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(text) if depth == 0 && !text.is_empty() => {
                bail!("unexpected text outside the root element")
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        bail!("document has no root element");
    }
    if depth != 0 {
        bail!("document ended before the root element was closed");
    }

    Ok(rows)
}

fn read_attributes(element: &BytesStart<'_>) -> Result<BTreeMap<String, String>> {
    let mut attrs = BTreeMap::new();
    for attr in element.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// Parses the `item` rows of an appfilter document.
///
/// Missing attributes read as empty strings.
pub fn parse_appfilter(xml: &str) -> Result<Vec<SourceItem>> {
    Ok(read_item_rows(xml)?
        .into_iter()
        .map(|mut attrs| SourceItem {
            component: attrs.remove("component").unwrap_or_default(),
            name: attrs.remove("name").unwrap_or_default(),
            drawable: attrs.remove("drawable").unwrap_or_default(),
        })
        .collect())
}

/// Serializes the normalized mapping.
///
/// Attribute order is fixed (`name`, `package`, `drawable`) and indentation
/// is two spaces, so identical input always yields identical bytes.
pub fn render_icon_mapper(entries: &[MappingEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("resources")))?;
    for entry in entries {
        let mut item = BytesStart::new("item");
        item.push_attribute(("name", entry.name.as_str()));
        item.push_attribute(("package", entry.package.as_str()));
        item.push_attribute(("drawable", entry.drawable.as_str()));
        writer.write_event(Event::Empty(item))?;
    }
    writer.write_event(Event::End(BytesEnd::new("resources")))?;

    let mut xml = String::from_utf8(writer.into_inner()).context("icon mapper is not UTF-8")?;
    xml.push('\n');
    Ok(xml)
}

/// Reads a normalized mapping back.
///
/// Rows without a `package` or `drawable` are ignored.
pub async fn read_icon_mapper(path: &Path) -> Result<Vec<MappingEntry>> {
    let xml = tokio::fs::read_to_string(path)
        .await
        .fs_context("reading icon mapper", path)?;

    Ok(read_item_rows(&xml)?
        .into_iter()
        .filter_map(|mut attrs| {
            let package = attrs.remove("package").filter(|p| !p.is_empty())?;
            let drawable = attrs.remove("drawable").filter(|d| !d.is_empty())?;
            Some(MappingEntry {
                name: attrs.remove("name").unwrap_or_default(),
                package,
                drawable,
            })
        })
        .collect())
}

/// Normalizes `input` (an appfilter) into `output` (an icon mapper).
///
/// A missing or malformed source is fatal; malformed rows are skipped,
/// logged, and listed in the returned report.
pub async fn convert_icon_mapper(input: &Path, output: &Path) -> Result<MappingReport> {
    log::info!("  (1/4) Found appfilter ({})", input.display());
    let xml = tokio::fs::read_to_string(input)
        .await
        .fs_context("reading appfilter", input)?;
    let items = parse_appfilter(&xml)?;

    log::info!("  (2/4) Deduplicating {} appfilter items", items.len());
    let (entries, skipped) = dedup_items(&items);
    for skip in &skipped {
        log::warn!(
            "    skipped item #{} ({:?}): component={:?} drawable={:?}",
            skip.index,
            skip.reason,
            skip.component,
            skip.drawable
        );
    }

    log::info!("  (3/4) Writing icon mapper with {} packages", entries.len());
    let rendered = render_icon_mapper(&entries)?;
    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .fs_context("creating icon mapper directory", parent)?;
    }
    tokio::fs::write(output, rendered)
        .await
        .fs_context("writing icon mapper", output)?;
    log::info!("  (4/4) Icon mapper written ({})", output.display());

    Ok(MappingReport {
        items_read: items.len(),
        packages: entries.len(),
        skipped,
    })
}
