//! Serial port transport built on the `serialport` crate

use super::byte_source::{ByteSource, SourceOpener};
use crate::config::SerialSettings;
use crate::error::{MonitorError, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use std::io::Read;
use std::time::Duration;

/// Information about an enumerated serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Device path or name (e.g. `/dev/ttyUSB0`, `COM3`)
    pub name: String,
    /// Port kind ("USB", "Bluetooth", "PCI", "Unknown")
    pub kind: String,
    /// Manufacturer/product text for USB ports
    pub description: Option<String>,
}

impl std::fmt::Display for PortInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "{} ({})", self.name, desc),
            None => write!(f, "{}", self.name),
        }
    }
}

/// List the serial ports present on this machine
///
/// Enumeration failures are logged and yield an empty list.
pub fn list_ports() -> Vec<PortInfo> {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            tracing::warn!("Failed to enumerate serial ports: {}", e);
            return Vec::new();
        }
    };

    ports
        .into_iter()
        // On macOS only the /dev/cu.* callout devices are useful for outgoing connections
        .filter(|_p| {
            #[cfg(target_os = "macos")]
            {
                !_p.port_name.starts_with("/dev/tty.")
            }
            #[cfg(not(target_os = "macos"))]
            {
                true
            }
        })
        .map(|p| {
            let (kind, description) = match p.port_type {
                SerialPortType::UsbPort(info) => {
                    let desc = match (info.manufacturer, info.product) {
                        (Some(m), Some(p)) => Some(format!("{} {}", m, p)),
                        (Some(m), None) => Some(m),
                        (None, Some(p)) => Some(p),
                        (None, None) => Some(format!("{:04x}:{:04x}", info.vid, info.pid)),
                    };
                    ("USB", desc)
                }
                SerialPortType::BluetoothPort => ("Bluetooth", None),
                SerialPortType::PciPort => ("PCI", None),
                SerialPortType::Unknown => ("Unknown", None),
            };
            PortInfo {
                name: p.port_name,
                kind: kind.to_string(),
                description,
            }
        })
        .collect()
}

/// A serial port opened at 8-N-1
pub struct SerialByteSource {
    name: String,
    port: Option<Box<dyn SerialPort>>,
    timeout: Duration,
}

impl SerialByteSource {
    /// Open `port_name` with the given settings
    pub fn open(port_name: &str, settings: &SerialSettings) -> Result<Self> {
        let port = serialport::new(port_name, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(settings.read_timeout)
            .open()?;

        tracing::info!(
            "Opened {} at {} baud (8-N-1, timeout {:?})",
            port_name,
            settings.baud_rate,
            settings.read_timeout
        );

        Ok(Self {
            name: port_name.to_string(),
            port: Some(port),
            timeout: settings.read_timeout,
        })
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(MonitorError::NotConnected)
    }
}

impl ByteSource for SerialByteSource {
    fn available_bytes(&mut self) -> Result<usize> {
        Ok(self.port_mut()?.bytes_to_read()? as usize)
    }

    fn read_up_to(&mut self, max: usize, timeout: Duration) -> Result<Vec<u8>> {
        if timeout != self.timeout {
            self.port_mut()?.set_timeout(timeout)?;
            self.timeout = timeout;
        }

        let mut buf = vec![0u8; max.max(1)];
        match self.port_mut()?.read(&mut buf) {
            Ok(n) => {
                buf.truncate(n);
                Ok(buf)
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            tracing::info!("Closed {}", self.name);
        }
    }
}

/// Opens real serial ports
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialOpener;

impl SourceOpener for SerialOpener {
    fn open(&self, port: &str, settings: &SerialSettings) -> Result<Box<dyn ByteSource>> {
        Ok(Box::new(SerialByteSource::open(port, settings)?))
    }
}
