//! SD card commands: mount, umount, space.

use orchid_platform::SD_MOUNT_POINT;
use orchid_types::color::Color;
use orchid_types::error::Result;

use crate::environment::Environment;
use crate::interpreter::{Arity, Command, CommandOutput, CommandRegistry};

/// Register SD card commands into a registry.
pub fn register_storage_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(MountCmd))?;
    reg.register(Box::new(UmountCmd))?;
    reg.register(Box::new(SpaceCmd))?;
    Ok(())
}

/// Mount the card and make its mount point visible in the VFS.
pub(crate) fn mount_sd(env: &mut Environment<'_>) -> Result<()> {
    env.platform.mount()?;
    env.vfs.mkdir(SD_MOUNT_POINT)?;
    log::info!("SD card mounted at {SD_MOUNT_POINT}");
    Ok(())
}

/// Format a byte count with a binary unit.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

// ---------------------------------------------------------------------------
// mount
// ---------------------------------------------------------------------------

struct MountCmd;
impl Command for MountCmd {
    fn name(&self) -> &str {
        "mount"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Mount the SD card at /sd"
    }
    fn usage(&self) -> &str {
        "mount"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if env.platform.is_mounted() {
            return Ok(CommandOutput::Text("SD already mounted".to_string()));
        }
        mount_sd(env)?;
        Ok(CommandOutput::Colored {
            text: "SD Mounted!".to_string(),
            color: Color::BLUE,
        })
    }
}

// ---------------------------------------------------------------------------
// umount
// ---------------------------------------------------------------------------

struct UmountCmd;
impl Command for UmountCmd {
    fn name(&self) -> &str {
        "umount"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Unmount the SD card"
    }
    fn usage(&self) -> &str {
        "umount"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        if !env.platform.is_mounted() {
            return Ok(CommandOutput::Error("SD was not mounted!".to_string()));
        }
        env.platform.unmount()?;
        if env.cwd == SD_MOUNT_POINT || env.cwd.starts_with(&format!("{SD_MOUNT_POINT}/")) {
            env.cwd = "/".to_string();
        }
        log::info!("SD card unmounted");
        Ok(CommandOutput::Colored {
            text: "SD Unmounted!".to_string(),
            color: Color::BLUE,
        })
    }
}

// ---------------------------------------------------------------------------
// space
// ---------------------------------------------------------------------------

struct SpaceCmd;
impl Command for SpaceCmd {
    fn name(&self) -> &str {
        "space"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Show SD card total, free and used space"
    }
    fn usage(&self) -> &str {
        "space"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let info = env.platform.space_info()?;
        Ok(CommandOutput::Highlight(format!(
            "total={}\nfree={}\nused={}",
            format_bytes(info.total_bytes()),
            format_bytes(info.free_bytes()),
            format_bytes(info.used_bytes()),
        )))
    }
}
