//! Platform service traits and desktop implementation.

use std::fmt;

use serde::Serialize;

use orchid_types::error::{OrchidError, Result};

// ---------------------------------------------------------------------------
// Power service
// ---------------------------------------------------------------------------

/// Abstraction over battery sensing and CPU clocking.
pub trait PowerService {
    /// Battery voltage in microvolts, or `None` when running from wall power.
    fn battery_microvolts(&self) -> Result<Option<u32>>;

    /// Current CPU frequency in MHz.
    fn cpu_mhz(&self) -> Result<u32>;

    /// Change the CPU frequency.
    fn set_cpu_mhz(&mut self, mhz: u32) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Time service
// ---------------------------------------------------------------------------

/// A simple wall-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl fmt::Display for SystemTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

/// Abstraction over the real-time clock.
pub trait TimeService {
    /// Current wall-clock time.
    fn now(&self) -> Result<SystemTime>;

    /// Seconds since boot.
    fn uptime_secs(&self) -> Result<u64>;
}

// ---------------------------------------------------------------------------
// Storage service (SD card)
// ---------------------------------------------------------------------------

/// Where the SD card appears in the file tree once mounted.
pub const SD_MOUNT_POINT: &str = "/sd";

/// Filesystem capacity, as reported by `statvfs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceInfo {
    pub block_size: u64,
    pub total_blocks: u64,
    pub free_blocks: u64,
}

impl SpaceInfo {
    pub fn total_bytes(&self) -> u64 {
        self.block_size * self.total_blocks
    }

    pub fn free_bytes(&self) -> u64 {
        self.block_size * self.free_blocks
    }

    pub fn used_bytes(&self) -> u64 {
        self.total_bytes().saturating_sub(self.free_bytes())
    }
}

/// Abstraction over the removable SD card slot.
pub trait StorageService {
    /// Whether the card is currently mounted at [`SD_MOUNT_POINT`].
    fn is_mounted(&self) -> bool;

    /// Mount the card.
    fn mount(&mut self) -> Result<()>;

    /// Unmount the card.
    fn unmount(&mut self) -> Result<()>;

    /// Capacity of the mounted card.
    fn space_info(&self) -> Result<SpaceInfo>;
}

// ---------------------------------------------------------------------------
// Network service
// ---------------------------------------------------------------------------

/// Wi-Fi authentication mode reported by a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthMode {
    Open,
    Wep,
    WpaPsk,
    Wpa2Psk,
    WpaWpa2Psk,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "Open",
            Self::Wep => "WEP",
            Self::WpaPsk => "WPA-PSK",
            Self::Wpa2Psk => "WPA2-PSK",
            Self::WpaWpa2Psk => "WPA/WPA2-PSK",
        })
    }
}

/// One access point found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessPoint {
    pub ssid: String,
    pub bssid: [u8; 6],
    pub channel: u8,
    pub rssi: i16,
    pub auth: AuthMode,
    pub hidden: bool,
}

impl AccessPoint {
    /// BSSID as `aa:bb:cc:dd:ee:ff`.
    pub fn bssid_string(&self) -> String {
        let b = &self.bssid;
        format!(
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

/// Station connection status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiStatus {
    pub connected: bool,
    pub ssid: Option<String>,
    pub ip_address: Option<String>,
}

/// Result of a ping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingStats {
    pub sent: u32,
    pub received: u32,
    pub avg_ms: u32,
}

/// Abstraction over the Wi-Fi radio.
pub trait NetworkService {
    /// Scan for nearby access points.
    fn scan(&mut self) -> Result<Vec<AccessPoint>>;

    /// Join a network.
    fn connect(&mut self, ssid: &str, password: &str) -> Result<()>;

    /// Leave the current network.
    fn disconnect(&mut self) -> Result<()>;

    /// Current station status.
    fn status(&self) -> Result<WifiStatus>;

    /// Drop any station connection and serve a captive portal as an
    /// access point named `ssid`.
    fn start_captive_portal(&mut self, _ssid: &str) -> Result<()> {
        Err(OrchidError::Network(
            "captive portal not supported on this platform".into(),
        ))
    }

    /// Send `count` echo requests to `host`.
    fn ping(&mut self, _host: &str, _count: u32) -> Result<PingStats> {
        Err(OrchidError::Network(
            "ping not supported on this platform".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Audio service
// ---------------------------------------------------------------------------

/// Abstraction over the speaker.
pub trait AudioService {
    /// Current volume, 0-100.
    fn volume(&self) -> u8;

    /// Set volume, 0-100.
    fn set_volume(&mut self, percent: u8) -> Result<()>;

    /// Play a WAV file from raw bytes.
    fn play_wav(&mut self, _data: &[u8]) -> Result<()> {
        Err(OrchidError::Platform(
            "audio playback not supported on this platform".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Unified platform trait
// ---------------------------------------------------------------------------

/// Aggregate trait providing access to all platform services.
pub trait Platform:
    PowerService + TimeService + StorageService + NetworkService + AudioService
{
    /// Human-readable platform name for `system`.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Desktop implementation
// ---------------------------------------------------------------------------

/// Platform implementation for running the shell on a desktop.
///
/// There is no battery or radio. The SD card is simulated: it mounts and
/// unmounts and reports a fixed 8 GiB capacity.
pub struct DesktopPlatform {
    start_time: std::time::Instant,
    cpu_mhz: u32,
    sd_mounted: bool,
    volume: u8,
}

impl DesktopPlatform {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            cpu_mhz: 240,
            sd_mounted: false,
            volume: 50,
        }
    }
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerService for DesktopPlatform {
    fn battery_microvolts(&self) -> Result<Option<u32>> {
        Ok(None)
    }

    fn cpu_mhz(&self) -> Result<u32> {
        Ok(self.cpu_mhz)
    }

    fn set_cpu_mhz(&mut self, mhz: u32) -> Result<()> {
        log::info!("CPU clock {} -> {} MHz", self.cpu_mhz, mhz);
        self.cpu_mhz = mhz;
        Ok(())
    }
}

impl TimeService for DesktopPlatform {
    fn now(&self) -> Result<SystemTime> {
        use std::time::SystemTime as StdTime;
        let secs = StdTime::now()
            .duration_since(StdTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        // UTC only; the device has no timezone setting.
        let time_of_day = secs % 86400;
        let (year, month, day) = days_to_ymd(secs / 86400);
        Ok(SystemTime {
            year,
            month,
            day,
            hour: (time_of_day / 3600) as u8,
            minute: ((time_of_day % 3600) / 60) as u8,
            second: (time_of_day % 60) as u8,
        })
    }

    fn uptime_secs(&self) -> Result<u64> {
        Ok(self.start_time.elapsed().as_secs())
    }
}

impl StorageService for DesktopPlatform {
    fn is_mounted(&self) -> bool {
        self.sd_mounted
    }

    fn mount(&mut self) -> Result<()> {
        if self.sd_mounted {
            return Err(OrchidError::Storage("already mounted".into()));
        }
        self.sd_mounted = true;
        Ok(())
    }

    fn unmount(&mut self) -> Result<()> {
        if !self.sd_mounted {
            return Err(OrchidError::Storage("not mounted".into()));
        }
        self.sd_mounted = false;
        Ok(())
    }

    fn space_info(&self) -> Result<SpaceInfo> {
        if !self.sd_mounted {
            return Err(OrchidError::Storage("SD card not mounted".into()));
        }
        Ok(SpaceInfo {
            block_size: 4096,
            total_blocks: 2 * 1024 * 1024,
            free_blocks: 2 * 1024 * 1024 - 348,
        })
    }
}

impl NetworkService for DesktopPlatform {
    fn scan(&mut self) -> Result<Vec<AccessPoint>> {
        Err(OrchidError::Network("no Wi-Fi radio".into()))
    }

    fn connect(&mut self, _ssid: &str, _password: &str) -> Result<()> {
        Err(OrchidError::Network("no Wi-Fi radio".into()))
    }

    fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }

    fn status(&self) -> Result<WifiStatus> {
        Ok(WifiStatus::default())
    }
}

impl AudioService for DesktopPlatform {
    fn volume(&self) -> u8 {
        self.volume
    }

    fn set_volume(&mut self, percent: u8) -> Result<()> {
        self.volume = percent.min(100);
        Ok(())
    }
}

impl Platform for DesktopPlatform {
    fn name(&self) -> &str {
        "desktop"
    }
}

// ---------------------------------------------------------------------------
// Date helper
// ---------------------------------------------------------------------------

/// Convert days since Unix epoch to (year, month, day).
pub(crate) fn days_to_ymd(mut days: u64) -> (u16, u8, u8) {
    let mut year = 1970u16;
    loop {
        let year_days = if is_leap(year) { 366 } else { 365 };
        if days < year_days {
            break;
        }
        days -= year_days;
        year += 1;
    }
    let feb = if is_leap(year) { 29 } else { 28 };
    let month_days: [u64; 12] = [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 12u8;
    for (i, &md) in month_days.iter().enumerate() {
        if days < md {
            month = (i + 1) as u8;
            break;
        }
        days -= md;
    }
    (year, month, (days + 1) as u8)
}

pub(crate) fn is_leap(y: u16) -> bool {
    (y.is_multiple_of(4) && !y.is_multiple_of(100)) || y.is_multiple_of(400)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_has_no_battery() {
        let p = DesktopPlatform::new();
        assert_eq!(p.battery_microvolts().unwrap(), None);
    }

    #[test]
    fn desktop_cpu_clock_is_settable() {
        let mut p = DesktopPlatform::new();
        p.set_cpu_mhz(160).unwrap();
        assert_eq!(p.cpu_mhz().unwrap(), 160);
    }

    #[test]
    fn desktop_sd_mount_cycle() {
        let mut p = DesktopPlatform::new();
        assert!(!p.is_mounted());
        assert!(p.space_info().is_err());
        p.mount().unwrap();
        assert!(p.is_mounted());
        assert!(p.mount().is_err());
        let info = p.space_info().unwrap();
        assert_eq!(info.used_bytes(), 348 * 4096);
        p.unmount().unwrap();
        assert!(p.unmount().is_err());
    }

    #[test]
    fn desktop_network_defaults() {
        let mut p = DesktopPlatform::new();
        assert!(p.scan().is_err());
        assert!(!p.status().unwrap().connected);
        assert!(p.ping("example.com", 3).is_err());
        assert!(p.start_captive_portal("orchid").is_err());
    }

    #[test]
    fn desktop_volume_clamped() {
        let mut p = DesktopPlatform::new();
        p.set_volume(250).unwrap();
        assert_eq!(p.volume(), 100);
        assert!(p.play_wav(b"RIFF").is_err());
    }

    #[test]
    fn space_info_math() {
        let info = SpaceInfo {
            block_size: 4096,
            total_blocks: 348,
            free_blocks: 329,
        };
        assert_eq!(info.total_bytes(), 4096 * 348);
        assert_eq!(info.free_bytes(), 4096 * 329);
        assert_eq!(info.used_bytes(), 4096 * 19);
    }

    #[test]
    fn auth_mode_display() {
        assert_eq!(AuthMode::Wpa2Psk.to_string(), "WPA2-PSK");
        assert_eq!(AuthMode::WpaWpa2Psk.to_string(), "WPA/WPA2-PSK");
    }

    #[test]
    fn bssid_formatting() {
        let ap = AccessPoint {
            ssid: "x".into(),
            bssid: [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
            channel: 6,
            rssi: -40,
            auth: AuthMode::Open,
            hidden: false,
        };
        assert_eq!(ap.bssid_string(), "de:ad:be:ef:00:01");
        let json = serde_json::to_string(&ap).unwrap();
        assert!(json.contains("\"channel\":6"));
    }

    #[test]
    fn epoch_is_1970_01_01() {
        assert_eq!(days_to_ymd(0), (1970, 1, 1));
    }

    #[test]
    fn leap_day_2024() {
        // 2024-02-29 is day 19782 since the epoch.
        assert_eq!(days_to_ymd(19782), (2024, 2, 29));
    }

    #[test]
    fn system_time_display() {
        let t = SystemTime {
            year: 2024,
            month: 3,
            day: 9,
            hour: 7,
            minute: 5,
            second: 1,
        };
        assert_eq!(t.to_string(), "2024-03-09 07:05:01");
    }
}
