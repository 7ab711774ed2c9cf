//! System commands: batt, clock, system, speed, vol, sound, env_get,
//! env_set.

use orchid_types::error::{OrchidError, Result};

use crate::display_commands::parse_percent;
use crate::environment::Environment;
use crate::interpreter::{Arity, Command, CommandOutput, CommandRegistry, arg};

/// Register system commands into a registry.
pub fn register_system_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(BattCmd))?;
    reg.register(Box::new(ClockCmd))?;
    reg.register(Box::new(SystemCmd))?;
    reg.register(Box::new(SpeedCmd))?;
    reg.register(Box::new(VolCmd))?;
    reg.register(Box::new(SoundCmd))?;
    reg.register(Box::new(EnvGetCmd))?;
    reg.register(Box::new(EnvSetCmd))?;
    Ok(())
}

/// LiPo cell voltage treated as empty.
const BATTERY_EMPTY_UV: u32 = 3_300_000;
/// LiPo cell voltage treated as full.
const BATTERY_FULL_UV: u32 = 4_200_000;

const CPU_FAST_MHZ: u32 = 240;
const CPU_SLOW_MHZ: u32 = 160;

// ---------------------------------------------------------------------------
// batt
// ---------------------------------------------------------------------------

struct BattCmd;
impl Command for BattCmd {
    fn name(&self) -> &str {
        "batt"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Show battery voltage and charge"
    }
    fn usage(&self) -> &str {
        "batt"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(uv) = env.platform.battery_microvolts()? else {
            return Ok(CommandOutput::Text("batt=none (wall power)".to_string()));
        };
        let span = BATTERY_FULL_UV - BATTERY_EMPTY_UV;
        let percent = uv.clamp(BATTERY_EMPTY_UV, BATTERY_FULL_UV) - BATTERY_EMPTY_UV;
        let percent = percent as u64 * 100 / span as u64;
        Ok(CommandOutput::Text(format!(
            "batt={}.{:02}V {percent}%",
            uv / 1_000_000,
            uv / 10_000 % 100
        )))
    }
}

// ---------------------------------------------------------------------------
// clock
// ---------------------------------------------------------------------------

struct ClockCmd;
impl Command for ClockCmd {
    fn name(&self) -> &str {
        "clock"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Show date, time and uptime"
    }
    fn usage(&self) -> &str {
        "clock"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let now = env.platform.now()?;
        let up = env.platform.uptime_secs()?;
        Ok(CommandOutput::Text(format!(
            "{now}\nup {}h {}m {}s",
            up / 3600,
            up % 3600 / 60,
            up % 60
        )))
    }
}

// ---------------------------------------------------------------------------
// system
// ---------------------------------------------------------------------------

struct SystemCmd;
impl Command for SystemCmd {
    fn name(&self) -> &str {
        "system"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Show hardware and shell information"
    }
    fn usage(&self) -> &str {
        "system"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let platform = &*env.platform;
        let wifi = match platform.status() {
            Ok(status) if status.connected => status.ssid.unwrap_or_default(),
            Ok(_) => "down".to_string(),
            Err(_) => "n/a".to_string(),
        };
        let lines = [
            format!("orchid {} on {}", env!("CARGO_PKG_VERSION"), platform.name()),
            format!("cpu={}MHz", platform.cpu_mhz()?),
            format!(
                "sd={}",
                if platform.is_mounted() { "mounted" } else { "unmounted" }
            ),
            format!("wifi={wifi}"),
            format!("vol={}%", platform.volume()),
        ];
        Ok(CommandOutput::Highlight(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// speed
// ---------------------------------------------------------------------------

struct SpeedCmd;
impl Command for SpeedCmd {
    fn name(&self) -> &str {
        "speed"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Set CPU clock"
    }
    fn usage(&self) -> &str {
        "speed <fast|240|slow|160>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mode = arg(args, 0)?.to_ascii_lowercase();
        let mhz = match mode.as_str() {
            "fast" | "240" => CPU_FAST_MHZ,
            "slow" | "160" => CPU_SLOW_MHZ,
            _ => {
                return Err(OrchidError::Command(format!(
                    "unknown speed {mode}: use fast/240 or slow/160"
                )));
            },
        };
        env.platform.set_cpu_mhz(mhz)?;
        log::info!("CPU clock set to {mhz} MHz");
        Ok(CommandOutput::Text(format!("speed={mhz}MHz")))
    }
}

// ---------------------------------------------------------------------------
// vol
// ---------------------------------------------------------------------------

struct VolCmd;
impl Command for VolCmd {
    fn name(&self) -> &str {
        "vol"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Set speaker volume"
    }
    fn usage(&self) -> &str {
        "vol <0-100>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let percent = parse_percent(arg(args, 0)?, "volume")?;
        env.platform.set_volume(percent)?;
        Ok(CommandOutput::Text(format!("vol={percent}%")))
    }
}

// ---------------------------------------------------------------------------
// sound
// ---------------------------------------------------------------------------

struct SoundCmd;
impl Command for SoundCmd {
    fn name(&self) -> &str {
        "sound"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Play a WAV file"
    }
    fn usage(&self) -> &str {
        "sound <file.wav>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(arg(args, 0)?);
        let data = env.vfs.read(&path)?;
        if !is_wav(&data) {
            return Err(OrchidError::Command(format!("{path} is not a WAV file")));
        }
        env.platform.play_wav(&data)?;
        Ok(CommandOutput::Text(format!("played {path}")))
    }
}

fn is_wav(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE"
}

// ---------------------------------------------------------------------------
// env_get / env_set
// ---------------------------------------------------------------------------

struct EnvGetCmd;
impl Command for EnvGetCmd {
    fn name(&self) -> &str {
        "env_get"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Show a variable"
    }
    fn usage(&self) -> &str {
        "env_get <var>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let name = arg(args, 0)?;
        let value = env
            .variables
            .get(name)
            .ok_or_else(|| OrchidError::Command(format!("{name} is not set")))?;
        Ok(CommandOutput::Text(format!("{name}={value}")))
    }
}

struct EnvSetCmd;
impl Command for EnvSetCmd {
    fn name(&self) -> &str {
        "env_set"
    }
    fn arity(&self) -> Arity {
        Arity::Two
    }
    fn description(&self) -> &str {
        "Set a variable"
    }
    fn usage(&self) -> &str {
        "env_set <var> <value>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let name = arg(args, 0)?;
        let value = arg(args, 1)?;
        env.variables.insert(name.to_string(), value.to_string());
        Ok(CommandOutput::Text(format!("{name}={value}")))
    }
}
