//! Wi-Fi commands: scan, scandump, net, captive, ping.

use serde::Serialize;

use orchid_platform::{AccessPoint, SD_MOUNT_POINT};
use orchid_types::error::{OrchidError, Result};

use crate::environment::Environment;
use crate::interpreter::{Arity, Command, CommandOutput, CommandRegistry, arg};

/// Register network commands into a registry.
pub fn register_network_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(ScanCmd))?;
    reg.register(Box::new(ScanDumpCmd))?;
    reg.register(Box::new(NetCmd))?;
    reg.register(Box::new(CaptiveCmd))?;
    reg.register(Box::new(PingCmd))?;
    Ok(())
}

/// Where `scandump` writes its report.
pub const SCAN_REPORT_PATH: &str = "/sd/scan.json";

const MAX_PING_COUNT: u32 = 100;

/// Join the saved network and describe the result.
pub(crate) fn connect_saved(env: &mut Environment<'_>) -> Result<String> {
    let (ssid, password) = env.wifi_credentials.clone().ok_or_else(|| {
        OrchidError::Network("no saved network (set ssid and password in config)".into())
    })?;
    env.platform.connect(&ssid, &password)?;
    let status = env.platform.status()?;
    log::info!("Joined Wi-Fi network {ssid}");
    Ok(match status.ip_address {
        Some(ip) => format!("connected to {ssid}\nip={ip}"),
        None => format!("connected to {ssid}"),
    })
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

struct ScanCmd;
impl Command for ScanCmd {
    fn name(&self) -> &str {
        "scan"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Scan Wi-Fi and show the strongest network"
    }
    fn usage(&self) -> &str {
        "scan"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let aps = env.platform.scan()?;
        let Some(best) = aps.iter().max_by_key(|ap| ap.rssi) else {
            return Ok(CommandOutput::Text("No networks found".to_string()));
        };
        let lines = [
            format!("* {} (of {})", best.ssid, aps.len()),
            format!(
                "  Auth: {}{}",
                best.auth,
                if best.hidden { " (hidden)" } else { "" }
            ),
            format!("  Channel: {}", best.channel),
            format!("  RSSI: {}", best.rssi),
            format!("  BSSID: {}", best.bssid_string()),
        ];
        Ok(CommandOutput::Highlight(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// scandump
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ScanReport<'a> {
    scanned_at: String,
    networks: &'a [AccessPoint],
}

struct ScanDumpCmd;
impl Command for ScanDumpCmd {
    fn name(&self) -> &str {
        "scandump"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Scan Wi-Fi and save the results to /sd/scan.json"
    }
    fn usage(&self) -> &str {
        "scandump"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if !env.platform.is_mounted() {
            return Err(OrchidError::Storage("SD card not mounted".into()));
        }
        let mut aps = env.platform.scan()?;
        aps.sort_by(|a, b| b.rssi.cmp(&a.rssi));
        let report = ScanReport {
            scanned_at: env.platform.now()?.to_string(),
            networks: &aps,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| OrchidError::Command(format!("scan report: {e}")))?;
        env.vfs.mkdir(SD_MOUNT_POINT)?;
        env.vfs.write(SCAN_REPORT_PATH, json.as_bytes())?;
        Ok(CommandOutput::Text(format!(
            "{} networks -> {SCAN_REPORT_PATH}",
            aps.len()
        )))
    }
}

// ---------------------------------------------------------------------------
// net
// ---------------------------------------------------------------------------

struct NetCmd;
impl Command for NetCmd {
    fn name(&self) -> &str {
        "net"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Connect, disconnect or show Wi-Fi status"
    }
    fn usage(&self) -> &str {
        "net <connect|con|disconnect|dis|status|stat>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let action = arg(args, 0)?.to_ascii_lowercase();
        match action.as_str() {
            "connect" | "con" => Ok(CommandOutput::Text(connect_saved(env)?)),
            "disconnect" | "dis" => {
                env.platform.disconnect()?;
                Ok(CommandOutput::Text("Wi-Fi disconnected".to_string()))
            },
            "status" | "stat" => {
                let status = env.platform.status()?;
                let text = if status.connected {
                    format!(
                        "wifi=up\nssid={}\nip={}",
                        status.ssid.unwrap_or_default(),
                        status.ip_address.unwrap_or_else(|| "-".to_string())
                    )
                } else {
                    "wifi=down".to_string()
                };
                Ok(CommandOutput::Highlight(text))
            },
            _ => Err(OrchidError::Command(format!(
                "unknown action {action}: use connect, disconnect or status"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// captive
// ---------------------------------------------------------------------------

struct CaptiveCmd;
impl Command for CaptiveCmd {
    fn name(&self) -> &str {
        "captive"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Drop Wi-Fi and serve a captive portal"
    }
    fn usage(&self) -> &str {
        "captive <ssid>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let ssid = arg(args, 0)?;
        env.platform.start_captive_portal(ssid)?;
        log::info!("Captive portal up as {ssid}");
        Ok(CommandOutput::Text(format!("portal={ssid}")))
    }
}

// ---------------------------------------------------------------------------
// ping
// ---------------------------------------------------------------------------

struct PingCmd;
impl Command for PingCmd {
    fn name(&self) -> &str {
        "ping"
    }
    fn arity(&self) -> Arity {
        Arity::Two
    }
    fn description(&self) -> &str {
        "Ping a host a number of times"
    }
    fn usage(&self) -> &str {
        "ping <host> <count>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let host = arg(args, 0)?;
        let count: u32 = arg(args, 1)?
            .parse()
            .ok()
            .filter(|n| (1..=MAX_PING_COUNT).contains(n))
            .ok_or_else(|| {
                OrchidError::Command(format!("count must be 1-{MAX_PING_COUNT}"))
            })?;
        let stats = env.platform.ping(host, count)?;
        Ok(CommandOutput::Text(format!(
            "{host}: {}/{} avg {}ms",
            stats.received, stats.sent, stats.avg_ms
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Rig, run, text};
    use orchid_vfs::Vfs;

    fn rig_with_wifi() -> Rig {
        let mut rig = Rig::new();
        rig.config.ssid = Some("orchid-lab".into());
        rig.config.password = Some("hunter22".into());
        rig
    }

    #[test]
    fn scan_shows_strongest() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        let out = run(&disp, &mut env, "scan");
        let s = text(&out);
        assert!(s.starts_with("* orchid-lab (of 2)"));
        assert!(s.contains("Auth: WPA2-PSK"));
        assert!(s.contains("Channel: 6"));
        assert!(s.contains("RSSI: -42"));
        assert!(s.contains("BSSID: aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn scan_with_nothing_around() {
        let mut rig = Rig::new();
        rig.platform.access_points.clear();
        let (disp, mut env) = rig.split();
        assert_eq!(text(&run(&disp, &mut env, "scan")), "No networks found");
    }

    #[test]
    fn scandump_writes_json() {
        let mut rig = Rig::new();
        {
            let (disp, mut env) = rig.split();
            assert!(matches!(
                run(&disp, &mut env, "scandump"),
                CommandOutput::Error(_)
            ));
            run(&disp, &mut env, "mount");
            assert_eq!(
                text(&run(&disp, &mut env, "scandump")),
                "2 networks -> /sd/scan.json"
            );
        }
        let raw = rig.vfs.read(SCAN_REPORT_PATH).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["scanned_at"], "2024-05-17 13:37:00");
        assert_eq!(json["networks"][0]["ssid"], "orchid-lab");
        assert_eq!(json["networks"][1]["channel"], 11);
    }

    #[test]
    fn net_actions() {
        let mut rig = rig_with_wifi();
        let (disp, mut env) = rig.split();
        assert_eq!(text(&run(&disp, &mut env, "net stat")), "wifi=down");
        assert_eq!(
            text(&run(&disp, &mut env, "net con")),
            "connected to orchid-lab\nip=192.168.4.20"
        );
        assert_eq!(
            text(&run(&disp, &mut env, "net status")),
            "wifi=up\nssid=orchid-lab\nip=192.168.4.20"
        );
        assert_eq!(text(&run(&disp, &mut env, "net dis")), "Wi-Fi disconnected");
        assert!(matches!(
            run(&disp, &mut env, "net reboot"),
            CommandOutput::Error(_)
        ));
    }

    #[test]
    fn net_connect_without_credentials() {
        let mut rig = Rig::new();
        let (disp, mut env) = rig.split();
        let out = run(&disp, &mut env, "net connect");
        assert!(text(&out).contains("no saved network"));
    }

    #[test]
    fn captive_portal() {
        let mut rig = Rig::new();
        {
            let (disp, mut env) = rig.split();
            assert_eq!(text(&run(&disp, &mut env, "captive orchid")), "portal=orchid");
        }
        assert_eq!(rig.platform.portal_ssid.as_deref(), Some("orchid"));
    }

    #[test]
    fn ping_requires_connection_and_valid_count() {
        let mut rig = rig_with_wifi();
        let (disp, mut env) = rig.split();
        assert!(matches!(
            run(&disp, &mut env, "ping 10.0.0.1 4"),
            CommandOutput::Error(_)
        ));
        run(&disp, &mut env, "net connect");
        assert_eq!(
            text(&run(&disp, &mut env, "ping 10.0.0.1 4")),
            "10.0.0.1: 4/4 avg 12ms"
        );
        assert!(matches!(
            run(&disp, &mut env, "ping 10.0.0.1 zero"),
            CommandOutput::Error(_)
        ));
        assert!(matches!(
            run(&disp, &mut env, "ping 10.0.0.1 0"),
            CommandOutput::Error(_)
        ));
    }
}
