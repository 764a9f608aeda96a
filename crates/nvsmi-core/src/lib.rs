// Pipeline stages, leaf first
pub mod coerce;
pub mod version;
pub mod document;
pub mod parser;
pub mod exposition;

// Acquisition and orchestration
pub mod config;
pub mod error;
pub mod scrape;
pub mod source;

pub use coerce::coerce_numeric;
pub use config::{AcquisitionMode, Config};
pub use document::{Clocks, DeviceRecord, Document, MemoryUsage, Power, Temperature, Utilization};
pub use error::{AcquisitionError, ConfigError, ParseError};
pub use exposition::render;
pub use parser::{parse_document, try_parse_document};
pub use scrape::Scraper;
pub use source::{DiagnosticSource, FixtureFile, SmiCommand};
pub use version::{decompose_version, DriverVersion};
