//! Test doubles for shell tests.
//!
//! [`RecordingDisplay`] records every draw call; [`MockPlatform`] implements
//! every service with state the test can inspect and failure switches it can
//! flip.

use orchid_types::color::Color;
use orchid_types::error::{OrchidError, Result};

use crate::display::Display;
use crate::services::{
    AccessPoint, AudioService, AuthMode, NetworkService, PingStats, Platform, PowerService,
    SpaceInfo, StorageService, SystemTime, TimeService, WifiStatus,
};

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Render {
        text: String,
        x: i32,
        y: i32,
        fg: Color,
        bg: Color,
    },
    Fill(Color),
    Backlight(bool),
    Brightness(u8),
}

/// A display that records all draw calls for assertions.
#[derive(Debug)]
pub struct RecordingDisplay {
    pub calls: Vec<DrawCall>,
    backlight: bool,
    pub fail_renders: bool,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            backlight: true,
            fail_renders: false,
        }
    }

    /// Texts of all `Render` calls, in order.
    pub fn rendered_texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Render { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The most recent `Render` call at row `y`.
    pub fn last_render_at(&self, y: i32) -> Option<&DrawCall> {
        self.calls
            .iter()
            .rev()
            .find(|c| matches!(c, DrawCall::Render { y: ry, .. } if *ry == y))
    }

    /// Whether any render contains `needle`.
    pub fn rendered_contains(&self, needle: &str) -> bool {
        self.rendered_texts().iter().any(|t| t.contains(needle))
    }

    /// Count of `Fill` calls.
    pub fn fill_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Fill(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordingDisplay {
    fn render(&mut self, text: &str, x: i32, y: i32, fg: Color, bg: Color) -> Result<()> {
        if self.fail_renders {
            return Err(OrchidError::Display("render failed".into()));
        }
        self.calls.push(DrawCall::Render {
            text: text.to_string(),
            x,
            y,
            fg,
            bg,
        });
        Ok(())
    }

    fn fill(&mut self, color: Color) -> Result<()> {
        self.calls.push(DrawCall::Fill(color));
        Ok(())
    }

    fn backlight(&self) -> bool {
        self.backlight
    }

    fn set_backlight(&mut self, on: bool) -> Result<()> {
        self.backlight = on;
        self.calls.push(DrawCall::Backlight(on));
        Ok(())
    }

    fn set_brightness(&mut self, percent: u8) -> Result<()> {
        self.calls.push(DrawCall::Brightness(percent));
        Ok(())
    }
}

/// A platform with inspectable state.
#[derive(Debug)]
pub struct MockPlatform {
    pub battery_uv: Option<u32>,
    pub cpu_mhz: u32,
    pub sd_present: bool,
    pub sd_mounted: bool,
    pub access_points: Vec<AccessPoint>,
    pub wifi: WifiStatus,
    pub portal_ssid: Option<String>,
    pub volume: u8,
    pub played: Vec<usize>,
    pub now: SystemTime,
    pub uptime: u64,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            battery_uv: Some(3_900_000),
            cpu_mhz: 240,
            sd_present: true,
            sd_mounted: false,
            access_points: vec![
                AccessPoint {
                    ssid: "garden".into(),
                    bssid: [0x10, 0x20, 0x30, 0x40, 0x50, 0x60],
                    channel: 11,
                    rssi: -71,
                    auth: AuthMode::Open,
                    hidden: false,
                },
                AccessPoint {
                    ssid: "orchid-lab".into(),
                    bssid: [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
                    channel: 6,
                    rssi: -42,
                    auth: AuthMode::Wpa2Psk,
                    hidden: false,
                },
            ],
            wifi: WifiStatus::default(),
            portal_ssid: None,
            volume: 50,
            played: Vec::new(),
            now: SystemTime {
                year: 2024,
                month: 5,
                day: 17,
                hour: 13,
                minute: 37,
                second: 0,
            },
            uptime: 3725,
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerService for MockPlatform {
    fn battery_microvolts(&self) -> Result<Option<u32>> {
        Ok(self.battery_uv)
    }

    fn cpu_mhz(&self) -> Result<u32> {
        Ok(self.cpu_mhz)
    }

    fn set_cpu_mhz(&mut self, mhz: u32) -> Result<()> {
        self.cpu_mhz = mhz;
        Ok(())
    }
}

impl TimeService for MockPlatform {
    fn now(&self) -> Result<SystemTime> {
        Ok(self.now)
    }

    fn uptime_secs(&self) -> Result<u64> {
        Ok(self.uptime)
    }
}

impl StorageService for MockPlatform {
    fn is_mounted(&self) -> bool {
        self.sd_mounted
    }

    fn mount(&mut self) -> Result<()> {
        if !self.sd_present {
            return Err(OrchidError::Storage("no card in slot".into()));
        }
        self.sd_mounted = true;
        Ok(())
    }

    fn unmount(&mut self) -> Result<()> {
        self.sd_mounted = false;
        Ok(())
    }

    fn space_info(&self) -> Result<SpaceInfo> {
        if !self.sd_mounted {
            return Err(OrchidError::Storage("SD card not mounted".into()));
        }
        Ok(SpaceInfo {
            block_size: 4096,
            total_blocks: 348,
            free_blocks: 329,
        })
    }
}

impl NetworkService for MockPlatform {
    fn scan(&mut self) -> Result<Vec<AccessPoint>> {
        Ok(self.access_points.clone())
    }

    fn connect(&mut self, ssid: &str, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(OrchidError::Network("authentication failed".into()));
        }
        self.wifi = WifiStatus {
            connected: true,
            ssid: Some(ssid.to_string()),
            ip_address: Some("192.168.4.20".to_string()),
        };
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.wifi = WifiStatus::default();
        Ok(())
    }

    fn status(&self) -> Result<WifiStatus> {
        Ok(self.wifi.clone())
    }

    fn start_captive_portal(&mut self, ssid: &str) -> Result<()> {
        self.wifi = WifiStatus::default();
        self.portal_ssid = Some(ssid.to_string());
        Ok(())
    }

    fn ping(&mut self, _host: &str, count: u32) -> Result<PingStats> {
        if !self.wifi.connected {
            return Err(OrchidError::Network("not connected".into()));
        }
        Ok(PingStats {
            sent: count,
            received: count,
            avg_ms: 12,
        })
    }
}

impl AudioService for MockPlatform {
    fn volume(&self) -> u8 {
        self.volume
    }

    fn set_volume(&mut self, percent: u8) -> Result<()> {
        self.volume = percent;
        Ok(())
    }

    fn play_wav(&mut self, data: &[u8]) -> Result<()> {
        self.played.push(data.len());
        Ok(())
    }
}

impl Platform for MockPlatform {
    fn name(&self) -> &str {
        "mock"
    }
}
