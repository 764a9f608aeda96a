//! Best-effort reader for `nvidia-smi -q -x` output.
//!
//! The document is first read into a small element tree, then each field is
//! looked up by its tag path. A tag that is missing or has an unexpected
//! shape yields an empty string for that field only. When a tag repeats, the
//! last occurrence wins. Text is taken from the element's own character data,
//! never from its children. Only markup that is not well-formed fails.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::document::{
    Clocks, DeviceRecord, Document, MemoryUsage, Power, Temperature, Utilization,
};
use crate::error::ParseError;

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    /// Text of the last element at `path` below this one.
    ///
    /// Repeated containers merge: `<temperature>` twice is searched from the
    /// last one back until the leaf is found.
    fn find(&self, path: &[&str]) -> Option<&str> {
        let (first, rest) = path.split_first()?;
        let mut candidates = self.children.iter().rev().filter(|c| c.name == *first);
        if rest.is_empty() {
            return candidates.next().map(|c| c.text.as_str());
        }
        candidates.find_map(|c| c.find(rest))
    }

    fn text(&self, path: &[&str]) -> String {
        self.find(path).unwrap_or_default().to_string()
    }
}

fn read_tree(raw: &[u8]) -> Result<Element, ParseError> {
    let mut reader = Reader::from_reader(raw);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => stack.push(Element::named(e.name().as_ref())),
            Event::Empty(e) => {
                let element = Element::named(e.name().as_ref());
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(ParseError::NoRoot)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => {
                return Err(match stack.pop() {
                    Some(open) => ParseError::Unclosed(open.name),
                    None => ParseError::NoRoot,
                })
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Parse raw tool output, reporting a malformed document as an error.
pub fn try_parse_document(raw: &[u8]) -> Result<Document, ParseError> {
    let root = read_tree(raw)?;
    let doc = Document {
        driver_version: root.text(&["driver_version"]),
        attached_device_count: root.text(&["attached_gpus"]),
        devices: root
            .children
            .iter()
            .filter(|c| c.name == "gpu")
            .map(device)
            .collect(),
    };
    debug!(devices = doc.devices.len(), "Parsed diagnostic document");
    Ok(doc)
}

/// Parse raw tool output. Never fails: a document that is not well-formed
/// comes back as [`Document::default`].
pub fn parse_document(raw: &[u8]) -> Document {
    try_parse_document(raw).unwrap_or_else(|e| {
        warn!("{}; exporting zero values", e);
        Document::default()
    })
}

fn device(gpu: &Element) -> DeviceRecord {
    DeviceRecord {
        uuid: gpu.text(&["uuid"]),
        product_name: gpu.text(&["product_name"]),
        product_brand: gpu.text(&["product_brand"]),
        pci_bus: gpu.text(&["pci", "pci_bus"]),
        fan_speed: gpu.text(&["fan_speed"]),
        memory: MemoryUsage {
            total: gpu.text(&["fb_memory_usage", "total"]),
            used: gpu.text(&["fb_memory_usage", "used"]),
            free: gpu.text(&["fb_memory_usage", "free"]),
        },
        utilization: Utilization {
            gpu: gpu.text(&["utilization", "gpu_util"]),
            memory: gpu.text(&["utilization", "memory_util"]),
        },
        temperature: Temperature {
            current: gpu.text(&["temperature", "gpu_temp"]),
            max_threshold: gpu.text(&["temperature", "gpu_temp_max_threshold"]),
            slow_threshold: gpu.text(&["temperature", "gpu_temp_slow_threshold"]),
        },
        power: power(gpu),
        clocks: clocks(gpu, "clocks"),
        max_clocks: clocks(gpu, "max_clocks"),
    }
}

fn clocks(gpu: &Element, section: &str) -> Clocks {
    Clocks {
        graphics: gpu.text(&[section, "graphics_clock"]),
        sm: gpu.text(&[section, "sm_clock"]),
        mem: gpu.text(&[section, "mem_clock"]),
        video: gpu.text(&[section, "video_clock"]),
    }
}

/// Newer drivers moved power under `gpu_power_readings` and renamed the
/// limit to `current_power_limit`; the legacy layout wins when present.
fn power(gpu: &Element) -> Power {
    Power {
        draw: first_non_empty(gpu, &[
            &["power_readings", "power_draw"],
            &["gpu_power_readings", "power_draw"],
        ]),
        limit: first_non_empty(gpu, &[
            &["power_readings", "power_limit"],
            &["power_readings", "current_power_limit"],
            &["gpu_power_readings", "power_limit"],
            &["gpu_power_readings", "current_power_limit"],
        ]),
    }
}

fn first_non_empty(gpu: &Element, paths: &[&[&str]]) -> String {
    paths
        .iter()
        .filter_map(|path| gpu.find(path))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}
