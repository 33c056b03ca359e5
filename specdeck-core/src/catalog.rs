//! Metric catalog: the fixed, ordered registry of comparable fields.
//!
//! The order of [`list`] is the display order. Categories are contiguous so
//! the view can emit a divider whenever a definition's category differs from
//! the previous one, without a separate grouping pass.

use serde::{Deserialize, Serialize};

macro_rules! metric_keys {
    ($($variant:ident => $key:literal),+ $(,)?) => {
        /// Closed set of specification keys known to the catalog.
        ///
        /// Includes secondary keys (such as the vertical resolution axis) that
        /// are stored in records but have no row of their own.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum MetricKey {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl MetricKey {
            /// Every key, in declaration order.
            pub const ALL: &'static [MetricKey] = &[$(MetricKey::$variant),+];

            /// The wire/record name of this key.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(MetricKey::$variant => $key,)+
                }
            }
        }

        impl std::str::FromStr for MetricKey {
            type Err = UnknownMetricKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok(MetricKey::$variant),)+
                    other => Err(UnknownMetricKey(other.to_string())),
                }
            }
        }
    };
}

metric_keys! {
    CpuName => "cpu_name",
    CpuArchitecture => "cpu_architecture",
    CpuCores => "cpu_cores",
    CpuThreads => "cpu_threads",
    CpuBoostClockGhz => "cpu_boost_clock_ghz",
    ProcessNodeNm => "process_node_nm",
    TdpMaxWatts => "tdp_max_watts",
    GpuName => "gpu_name",
    GpuComputeUnits => "gpu_compute_units",
    GpuClockMhz => "gpu_clock_mhz",
    GpuTflops => "gpu_tflops",
    RamGb => "ram_gb",
    RamType => "ram_type",
    RamSpeedMts => "ram_speed_mts",
    StorageGb => "storage_gb",
    StorageType => "storage_type",
    SdCardSlot => "sd_card_slot",
    ScreenSizeInches => "screen_size_inches",
    ScreenResolutionX => "screen_resolution_x",
    ScreenResolutionY => "screen_resolution_y",
    ScreenType => "screen_type",
    RefreshRateHz => "refresh_rate_hz",
    VariableRefreshRate => "variable_refresh_rate",
    PeakBrightnessNits => "peak_brightness_nits",
    PixelDensityPpi => "pixel_density_ppi",
    Touchscreen => "touchscreen",
    Hdr => "hdr",
    BatteryWh => "battery_wh",
    BatteryMah => "battery_mah",
    ChargingWatts => "charging_watts",
    BatteryLifeHours => "battery_life_hours",
    WifiStandard => "wifi_standard",
    BluetoothVersion => "bluetooth_version",
    UsbCPorts => "usb_c_ports",
    Usb4 => "usb4",
    VideoOutput => "video_output",
    HeadphoneJack => "headphone_jack",
    Cellular => "cellular",
    HallEffectSticks => "hall_effect_sticks",
    Trackpads => "trackpads",
    BackButtons => "back_buttons",
    Gyroscope => "gyroscope",
    Haptics => "haptics",
    WeightGrams => "weight_grams",
    ThicknessMm => "thickness_mm",
    Dimensions => "dimensions",
    Cooling => "cooling",
    Speakers => "speakers",
    OperatingSystem => "operating_system",
    LaunchPriceUsd => "launch_price_usd",
    CurrentPriceUsd => "current_price_usd",
}

impl MetricKey {
    /// The second axis stored alongside a resolution metric.
    pub fn paired_axis(self) -> Option<MetricKey> {
        match self {
            MetricKey::ScreenResolutionX => Some(MetricKey::ScreenResolutionY),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record key that is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric key: {0}")]
pub struct UnknownMetricKey(pub String);

/// How a metric's raw value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    String,
    Boolean,
    Currency,
    Resolution,
}

impl ValueType {
    /// Types whose winner is decided by numeric comparison.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueType::Number | ValueType::Currency | ValueType::Resolution
        )
    }
}

/// Section a metric is displayed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Processor,
    Graphics,
    MemoryStorage,
    Display,
    BatteryPower,
    Connectivity,
    Controls,
    Build,
    Software,
    Pricing,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Processor => "Processor",
            Category::Graphics => "Graphics",
            Category::MemoryStorage => "Memory & Storage",
            Category::Display => "Display",
            Category::BatteryPower => "Battery & Power",
            Category::Connectivity => "Connectivity",
            Category::Controls => "Controls",
            Category::Build => "Build",
            Category::Software => "Software",
            Category::Pricing => "Pricing",
        };
        f.write_str(label)
    }
}

/// One comparable field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDefinition {
    pub key: MetricKey,
    pub label: &'static str,
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub lower_is_better: bool,
    pub category: Category,
}

const fn metric(
    key: MetricKey,
    label: &'static str,
    value_type: ValueType,
    unit: Option<&'static str>,
    lower_is_better: bool,
    category: Category,
) -> MetricDefinition {
    MetricDefinition {
        key,
        label,
        value_type,
        unit,
        lower_is_better,
        category,
    }
}

use Category as C;
use MetricKey as K;
use ValueType as T;

static CATALOG: [MetricDefinition; 50] = [
    metric(K::CpuName, "CPU", T::String, None, false, C::Processor),
    metric(K::CpuArchitecture, "Architecture", T::String, None, false, C::Processor),
    metric(K::CpuCores, "CPU Cores", T::Number, None, false, C::Processor),
    metric(K::CpuThreads, "CPU Threads", T::Number, None, false, C::Processor),
    metric(K::CpuBoostClockGhz, "Boost Clock", T::Number, Some("GHz"), false, C::Processor),
    metric(K::ProcessNodeNm, "Process Node", T::Number, Some("nm"), true, C::Processor),
    metric(K::TdpMaxWatts, "Max TDP", T::Number, Some("W"), false, C::Processor),
    metric(K::GpuName, "GPU", T::String, None, false, C::Graphics),
    metric(K::GpuComputeUnits, "Compute Units", T::Number, None, false, C::Graphics),
    metric(K::GpuClockMhz, "GPU Clock", T::Number, Some("MHz"), false, C::Graphics),
    metric(K::GpuTflops, "FP32 Throughput", T::Number, Some(" TFLOPS"), false, C::Graphics),
    metric(K::RamGb, "RAM", T::Number, Some("GB"), false, C::MemoryStorage),
    metric(K::RamType, "RAM Type", T::String, None, false, C::MemoryStorage),
    metric(K::RamSpeedMts, "RAM Speed", T::Number, Some(" MT/s"), false, C::MemoryStorage),
    metric(K::StorageGb, "Storage", T::Number, Some("GB"), false, C::MemoryStorage),
    metric(K::StorageType, "Storage Type", T::String, None, false, C::MemoryStorage),
    metric(K::SdCardSlot, "microSD Slot", T::Boolean, None, false, C::MemoryStorage),
    metric(K::ScreenSizeInches, "Screen Size", T::Number, Some("\""), false, C::Display),
    metric(K::ScreenResolutionX, "Resolution", T::Resolution, None, false, C::Display),
    metric(K::ScreenType, "Panel", T::String, None, false, C::Display),
    metric(K::RefreshRateHz, "Refresh Rate", T::Number, Some("Hz"), false, C::Display),
    metric(K::VariableRefreshRate, "Variable Refresh Rate", T::Boolean, None, false, C::Display),
    metric(K::PeakBrightnessNits, "Peak Brightness", T::Number, Some(" nits"), false, C::Display),
    metric(K::PixelDensityPpi, "Pixel Density", T::Number, Some(" ppi"), false, C::Display),
    metric(K::Touchscreen, "Touchscreen", T::Boolean, None, false, C::Display),
    metric(K::Hdr, "HDR", T::Boolean, None, false, C::Display),
    metric(K::BatteryWh, "Battery Capacity", T::Number, Some("Wh"), false, C::BatteryPower),
    metric(K::BatteryMah, "Battery (mAh)", T::Number, Some("mAh"), false, C::BatteryPower),
    metric(K::ChargingWatts, "Charging", T::Number, Some("W"), false, C::BatteryPower),
    metric(K::BatteryLifeHours, "Battery Life", T::Number, Some("h"), false, C::BatteryPower),
    metric(K::WifiStandard, "Wi-Fi", T::String, None, false, C::Connectivity),
    metric(K::BluetoothVersion, "Bluetooth", T::Number, None, false, C::Connectivity),
    metric(K::UsbCPorts, "USB-C Ports", T::Number, None, false, C::Connectivity),
    metric(K::Usb4, "USB4", T::Boolean, None, false, C::Connectivity),
    metric(K::VideoOutput, "Video Output", T::String, None, false, C::Connectivity),
    metric(K::HeadphoneJack, "Headphone Jack", T::Boolean, None, false, C::Connectivity),
    metric(K::Cellular, "Cellular", T::Boolean, None, false, C::Connectivity),
    metric(K::HallEffectSticks, "Hall Effect Sticks", T::Boolean, None, false, C::Controls),
    metric(K::Trackpads, "Trackpads", T::Number, None, false, C::Controls),
    metric(K::BackButtons, "Back Buttons", T::Number, None, false, C::Controls),
    metric(K::Gyroscope, "Gyroscope", T::Boolean, None, false, C::Controls),
    metric(K::Haptics, "Haptics", T::String, None, false, C::Controls),
    metric(K::WeightGrams, "Weight", T::Number, Some("g"), true, C::Build),
    metric(K::ThicknessMm, "Thickness", T::Number, Some("mm"), true, C::Build),
    metric(K::Dimensions, "Dimensions", T::String, None, false, C::Build),
    metric(K::Cooling, "Cooling", T::String, None, false, C::Build),
    metric(K::Speakers, "Speakers", T::String, None, false, C::Build),
    metric(K::OperatingSystem, "Operating System", T::String, None, false, C::Software),
    metric(K::LaunchPriceUsd, "Launch Price", T::Currency, None, true, C::Pricing),
    metric(K::CurrentPriceUsd, "Current Price", T::Currency, None, true, C::Pricing),
];

/// All metric definitions in display order.
pub fn list() -> &'static [MetricDefinition] {
    &CATALOG
}

/// Look up the definition for a key. Secondary axis keys have none.
pub fn get(key: MetricKey) -> Option<&'static MetricDefinition> {
    CATALOG.iter().find(|m| m.key == key)
}
