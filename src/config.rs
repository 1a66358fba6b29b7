use std::str::FromStr;

use crate::{cli::RunOptions, logger::LogLevel, Error, Result};

pub const DEFAULT_UPDATE_SECS: f64 = 2.0;
pub const DEFAULT_MOUNT: &str = "/";
pub const DEFAULT_I2C_BUS: u8 = 1;
pub const DEFAULT_I2C_ADDR: u8 = 0x3c;
pub const DEFAULT_CONTRAST: u8 = 0xff;

const ENV_UPDATE_SECS: &str = "OLEDSTAT_UPDATE_SECS";
const ENV_MOUNT: &str = "OLEDSTAT_MOUNT";
const ENV_IFACE: &str = "OLEDSTAT_IFACE";
const ENV_HOST_IP: &str = "OLEDSTAT_HOST_IP";
const ENV_FONT: &str = "OLEDSTAT_FONT";
const ENV_I2C_BUS: &str = "OLEDSTAT_I2C_BUS";
const ENV_I2C_ADDR: &str = "OLEDSTAT_I2C_ADDR";
const ENV_CONTRAST: &str = "OLEDSTAT_CONTRAST";
const ENV_LOG_LEVEL: &str = "OLEDSTAT_LOG_LEVEL";
const ENV_LOG_PATH: &str = "OLEDSTAT_LOG_PATH";

/// Built-in monospace font selection for the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontName {
    Font5x8,
    #[default]
    Font6x10,
    Font7x13,
}

impl FromStr for FontName {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "5x8" => Ok(FontName::Font5x8),
            "6x10" => Ok(FontName::Font6x10),
            "7x13" => Ok(FontName::Font7x13),
            _ => Err(()),
        }
    }
}

/// Immutable process configuration, read once at startup and passed by
/// reference into the components that need it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub update_secs: f64,
    pub mount: String,
    pub iface: Option<String>,
    pub host_ip: Option<String>,
    pub font: FontName,
    pub i2c_bus: u8,
    pub i2c_addr: u8,
    pub contrast: u8,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_secs: DEFAULT_UPDATE_SECS,
            mount: DEFAULT_MOUNT.to_string(),
            iface: None,
            host_ip: None,
            font: FontName::default(),
            i2c_bus: DEFAULT_I2C_BUS,
            i2c_addr: DEFAULT_I2C_ADDR,
            contrast: DEFAULT_CONTRAST,
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a key lookup; the daemon calls this with the
    /// process environment once, tests call it with closures.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Config::default();

        if let Some(raw) = lookup(ENV_UPDATE_SECS) {
            cfg.update_secs = parse_update_secs(&raw)?;
        }
        if let Some(raw) = lookup(ENV_MOUNT) {
            if !raw.trim().is_empty() {
                cfg.mount = raw.trim().to_string();
            }
        }
        cfg.iface = lookup(ENV_IFACE).filter(|v| !v.trim().is_empty());
        cfg.host_ip = lookup(ENV_HOST_IP).filter(|v| !v.trim().is_empty());
        if let Some(raw) = lookup(ENV_FONT) {
            cfg.font = parse_font(&raw)?;
        }
        if let Some(raw) = lookup(ENV_I2C_BUS) {
            cfg.i2c_bus = raw.trim().parse().map_err(|_| {
                Error::InvalidArgs(format!("{ENV_I2C_BUS} must be a bus number, got '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup(ENV_I2C_ADDR) {
            cfg.i2c_addr = parse_u8_maybe_hex(&raw).ok_or_else(|| {
                Error::InvalidArgs(format!("{ENV_I2C_ADDR} must be an address like 0x3c"))
            })?;
        }
        if let Some(raw) = lookup(ENV_CONTRAST) {
            cfg.contrast = raw.trim().parse().map_err(|_| {
                Error::InvalidArgs(format!("{ENV_CONTRAST} must be 0-255, got '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            cfg.log_level = LogLevel::from_str(&raw).map_err(|_| {
                Error::InvalidArgs(format!("{ENV_LOG_LEVEL} must be error|warn|info|debug|trace"))
            })?;
        }
        cfg.log_file = lookup(ENV_LOG_PATH).filter(|v| !v.trim().is_empty());

        Ok(cfg)
    }

    /// Environment config with command-line flags layered on top.
    pub fn from_sources(opts: &RunOptions) -> Result<Self> {
        let mut cfg = Self::from_env()?;

        if let Some(interval) = opts.interval {
            cfg.update_secs = validate_update_secs(interval)?;
        }
        if let Some(mount) = &opts.mount {
            cfg.mount = mount.clone();
        }
        if opts.iface.is_some() {
            cfg.iface = opts.iface.clone();
        }
        if opts.host_ip.is_some() {
            cfg.host_ip = opts.host_ip.clone();
        }
        if let Some(font) = &opts.font {
            cfg.font = parse_font(font)?;
        }
        if let Some(bus) = opts.i2c_bus {
            cfg.i2c_bus = bus;
        }
        if let Some(addr) = opts.i2c_addr {
            cfg.i2c_addr = addr;
        }
        if let Some(contrast) = opts.contrast {
            cfg.contrast = contrast;
        }
        if let Some(level) = &opts.log_level {
            cfg.log_level = LogLevel::from_str(level)
                .map_err(|_| Error::InvalidArgs("log level must be error|warn|info|debug|trace".into()))?;
        }
        if opts.log_file.is_some() {
            cfg.log_file = opts.log_file.clone();
        }

        Ok(cfg)
    }
}

fn parse_update_secs(raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        Error::InvalidArgs(format!("{ENV_UPDATE_SECS} must be a number of seconds, got '{raw}'"))
    })?;
    validate_update_secs(value)
}

fn validate_update_secs(value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidArgs(
            "update interval must be a positive number of seconds".into(),
        ))
    }
}

fn parse_font(raw: &str) -> Result<FontName> {
    FontName::from_str(raw)
        .map_err(|_| Error::InvalidArgs(format!("unknown font '{raw}', expected 5x8, 6x10 or 7x13")))
}

/// Accepts `0x3c` style hex or plain decimal.
pub(crate) fn parse_u8_maybe_hex(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else {
        raw.parse().ok()
    }
}
