//! 设备档案模型。
//!
//! 入站报文是一个扁平 JSON 对象：`device_id` 与 `platform` 为必填，
//! 其余字段按平台（Android/iOS/Web）各自可选。内部表示将平台相关
//! 字段收敛为封闭的 [`PlatformInfo`] 枚举，平台判定只发生在
//! 反序列化一处，后续展示名/摘要均按变体分派。

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::ValidationError;

/// Android 平台字段集。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AndroidInfo {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub device: Option<String>,
    pub product: Option<String>,
    pub fingerprint: Option<String>,
    pub android_version: Option<String>,
    pub sdk: Option<i64>,
    pub hardware: Option<String>,
    pub board: Option<String>,
    pub bootloader: Option<String>,
    pub display: Option<String>,
    pub host: Option<String>,
    pub tags: Option<String>,
    #[serde(rename = "type")]
    pub build_type: Option<String>,
    pub is_physical_device: Option<bool>,
    pub supported_abis: Option<Vec<String>>,
    pub supported_32bit_abis: Option<Vec<String>>,
    pub supported_64bit_abis: Option<Vec<String>>,
}

/// iOS 平台字段集。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IosInfo {
    pub name: Option<String>,
    pub model: Option<String>,
    pub system_name: Option<String>,
    pub system_version: Option<String>,
    pub is_physical_device: Option<bool>,
    pub utsname_machine: Option<String>,
    pub utsname_sysname: Option<String>,
    pub utsname_release: Option<String>,
    pub utsname_version: Option<String>,
}

/// Web 平台字段集。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebInfo {
    pub browser_name: Option<String>,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub user_agent: Option<String>,
    pub vendor: Option<String>,
    pub language: Option<String>,
}

/// 平台相关字段的封闭变体。
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformInfo {
    Android(AndroidInfo),
    Ios(IosInfo),
    Web(WebInfo),
    /// 未识别平台：仅保留通用字段。
    Other,
}

/// 设备档案记录。
///
/// `platform` 保存规范化（小写）形式；原始大小写在入库时丢弃。
/// 以扁平 JSON 形式序列化，与入站报文同构。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DeviceRecordWire", into = "DeviceRecordWire")]
pub struct DeviceRecord {
    pub device_id: String,
    pub platform: String,
    pub platform_version: Option<String>,
    pub locale: Option<String>,
    pub info: PlatformInfo,
}

impl DeviceRecord {
    /// 校验必填约束（device_id 非空）。
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.device_id.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        Ok(())
    }

    /// 人类可读的展示名。
    pub fn display_name(&self) -> String {
        match &self.info {
            PlatformInfo::Android(info) => format!(
                "{} {}",
                info.manufacturer.as_deref().unwrap_or("Unknown"),
                info.model.as_deref().unwrap_or("Device"),
            ),
            PlatformInfo::Ios(info) => format!(
                "{} ({})",
                info.name.as_deref().unwrap_or("iOS Device"),
                info.model.as_deref().unwrap_or("Unknown"),
            ),
            PlatformInfo::Web(info) => info
                .browser_name
                .clone()
                .unwrap_or_else(|| "Web Browser".to_string()),
            PlatformInfo::Other => format!("{} Device", self.platform),
        }
    }

    /// 平台相关的摘要视图（设备列表/详情接口使用的缩减字段集）。
    pub fn summary(&self) -> serde_json::Value {
        let mut summary = json!({
            "platform": self.platform,
            "platform_version": self.platform_version,
            "locale": self.locale,
        });
        let fields = summary.as_object_mut().unwrap_or_else(|| unreachable!());
        match &self.info {
            PlatformInfo::Android(info) => {
                fields.insert("manufacturer".to_string(), json!(info.manufacturer));
                fields.insert("model".to_string(), json!(info.model));
                fields.insert("android_version".to_string(), json!(info.android_version));
                fields.insert("sdk".to_string(), json!(info.sdk));
                fields.insert(
                    "is_physical_device".to_string(),
                    json!(info.is_physical_device),
                );
            }
            PlatformInfo::Ios(info) => {
                fields.insert("name".to_string(), json!(info.name));
                fields.insert("model".to_string(), json!(info.model));
                fields.insert("system_version".to_string(), json!(info.system_version));
                fields.insert(
                    "is_physical_device".to_string(),
                    json!(info.is_physical_device),
                );
            }
            PlatformInfo::Web(info) => {
                fields.insert("browser".to_string(), json!(info.browser_name));
                fields.insert("user_agent".to_string(), json!(info.user_agent));
            }
            PlatformInfo::Other => {}
        }
        summary
    }
}

/// 扁平线格式：所有平台字段都在顶层，与入站报文/存储 blob 同构。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DeviceRecordWire {
    device_id: String,
    platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale: Option<String>,

    // Android
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    android_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sdk: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hardware: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bootloader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    build_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_physical_device: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supported_abis: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supported_32bit_abis: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supported_64bit_abis: Option<Vec<String>>,

    // iOS
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    utsname_machine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    utsname_sysname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    utsname_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    utsname_version: Option<String>,

    // Web
    #[serde(skip_serializing_if = "Option::is_none")]
    browser_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl From<DeviceRecordWire> for DeviceRecord {
    fn from(wire: DeviceRecordWire) -> Self {
        let platform = wire.platform.to_lowercase();
        let info = match platform.as_str() {
            "android" => PlatformInfo::Android(AndroidInfo {
                manufacturer: wire.manufacturer,
                model: wire.model,
                brand: wire.brand,
                device: wire.device,
                product: wire.product,
                fingerprint: wire.fingerprint,
                android_version: wire.android_version,
                sdk: wire.sdk,
                hardware: wire.hardware,
                board: wire.board,
                bootloader: wire.bootloader,
                display: wire.display,
                host: wire.host,
                tags: wire.tags,
                build_type: wire.build_type,
                is_physical_device: wire.is_physical_device,
                supported_abis: wire.supported_abis,
                supported_32bit_abis: wire.supported_32bit_abis,
                supported_64bit_abis: wire.supported_64bit_abis,
            }),
            "ios" => PlatformInfo::Ios(IosInfo {
                name: wire.name,
                model: wire.model,
                system_name: wire.system_name,
                system_version: wire.system_version,
                is_physical_device: wire.is_physical_device,
                utsname_machine: wire.utsname_machine,
                utsname_sysname: wire.utsname_sysname,
                utsname_release: wire.utsname_release,
                utsname_version: wire.utsname_version,
            }),
            "web" | "web browser" => PlatformInfo::Web(WebInfo {
                browser_name: wire.browser_name,
                app_name: wire.app_name,
                app_version: wire.app_version,
                user_agent: wire.user_agent,
                vendor: wire.vendor,
                language: wire.language,
            }),
            _ => PlatformInfo::Other,
        };
        Self {
            device_id: wire.device_id,
            platform,
            platform_version: wire.platform_version,
            locale: wire.locale,
            info,
        }
    }
}

impl From<DeviceRecord> for DeviceRecordWire {
    fn from(record: DeviceRecord) -> Self {
        let mut wire = DeviceRecordWire {
            device_id: record.device_id,
            platform: record.platform,
            platform_version: record.platform_version,
            locale: record.locale,
            ..DeviceRecordWire::default()
        };
        match record.info {
            PlatformInfo::Android(info) => {
                wire.manufacturer = info.manufacturer;
                wire.model = info.model;
                wire.brand = info.brand;
                wire.device = info.device;
                wire.product = info.product;
                wire.fingerprint = info.fingerprint;
                wire.android_version = info.android_version;
                wire.sdk = info.sdk;
                wire.hardware = info.hardware;
                wire.board = info.board;
                wire.bootloader = info.bootloader;
                wire.display = info.display;
                wire.host = info.host;
                wire.tags = info.tags;
                wire.build_type = info.build_type;
                wire.is_physical_device = info.is_physical_device;
                wire.supported_abis = info.supported_abis;
                wire.supported_32bit_abis = info.supported_32bit_abis;
                wire.supported_64bit_abis = info.supported_64bit_abis;
            }
            PlatformInfo::Ios(info) => {
                wire.name = info.name;
                wire.model = info.model;
                wire.system_name = info.system_name;
                wire.system_version = info.system_version;
                wire.is_physical_device = info.is_physical_device;
                wire.utsname_machine = info.utsname_machine;
                wire.utsname_sysname = info.utsname_sysname;
                wire.utsname_release = info.utsname_release;
                wire.utsname_version = info.utsname_version;
            }
            PlatformInfo::Web(info) => {
                wire.browser_name = info.browser_name;
                wire.app_name = info.app_name;
                wire.app_version = info.app_version;
                wire.user_agent = info.user_agent;
                wire.vendor = info.vendor;
                wire.language = info.language;
            }
            PlatformInfo::Other => {}
        }
        wire
    }
}
