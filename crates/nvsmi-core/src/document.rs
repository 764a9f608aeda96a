//! One nvidia-smi snapshot, fields kept exactly as the tool reported them.
//!
//! Nothing here is numeric yet: `"75 C"` stays `"75 C"` and an absent tag is
//! an empty string. Coercion happens once, in [`crate::exposition`].

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub driver_version: String,
    pub attached_device_count: String,
    /// In the order the devices appear in the source document.
    pub devices: Vec<DeviceRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRecord {
    pub uuid: String,
    pub product_name: String,
    pub product_brand: String,
    pub pci_bus: String,
    pub fan_speed: String,
    pub memory: MemoryUsage,
    pub utilization: Utilization,
    pub temperature: Temperature,
    pub power: Power,
    pub clocks: Clocks,
    pub max_clocks: Clocks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    pub total: String,
    pub used: String,
    pub free: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Utilization {
    pub gpu: String,
    pub memory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Temperature {
    pub current: String,
    pub max_threshold: String,
    pub slow_threshold: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Power {
    pub draw: String,
    pub limit: String,
}

/// Clock speeds, used for both current and maximum-rated readings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clocks {
    pub graphics: String,
    pub sm: String,
    pub mem: String,
    pub video: String,
}
