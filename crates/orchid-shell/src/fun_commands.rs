//! Games of chance: flip, roll.

use rand::Rng;

use orchid_types::color::Color;
use orchid_types::error::{OrchidError, Result};

use crate::environment::Environment;
use crate::interpreter::{Arity, Command, CommandOutput, CommandRegistry, arg};

/// Register fun commands into a registry.
pub fn register_fun_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(FlipCmd))?;
    reg.register(Box::new(RollCmd))?;
    Ok(())
}

/// Dice that `roll` knows.
pub const DIE_FACES: [u32; 8] = [2, 4, 6, 8, 10, 12, 20, 100];

/// Most dice thrown at once; more would not fit on screen.
pub const MAX_DICE: u32 = 20;

// ---------------------------------------------------------------------------
// flip
// ---------------------------------------------------------------------------

struct FlipCmd;
impl Command for FlipCmd {
    fn name(&self) -> &str {
        "flip"
    }
    fn arity(&self) -> Arity {
        Arity::Zero
    }
    fn description(&self) -> &str {
        "Flip a coin"
    }
    fn usage(&self) -> &str {
        "flip"
    }
    fn execute(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let side = if env.rng.gen_bool(0.5) { "Heads" } else { "Tails" };
        Ok(CommandOutput::Text(side.to_string()))
    }
}

// ---------------------------------------------------------------------------
// roll
// ---------------------------------------------------------------------------

struct RollCmd;
impl Command for RollCmd {
    fn name(&self) -> &str {
        "roll"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Roll N dice with F faces (d2-d100)"
    }
    fn usage(&self) -> &str {
        "roll <NdF>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let spec = arg(args, 0)?;
        let (count, faces) = parse_dice(spec)?;
        let rolls: Vec<u32> = (0..count).map(|_| env.rng.gen_range(1..=faces)).collect();
        let total: u32 = rolls.iter().sum();
        let shown: Vec<String> = rolls.iter().map(u32::to_string).collect();
        Ok(CommandOutput::Colored {
            text: format!("{}: {} = {total}", spec.to_ascii_lowercase(), shown.join(" ")),
            color: Color::GREEN,
        })
    }
}

/// Parse `NdF` (`d20` means one die).
fn parse_dice(spec: &str) -> Result<(u32, u32)> {
    let invalid = || OrchidError::Command(format!("expected NdF like 2d6, got {spec}"));
    let lower = spec.to_ascii_lowercase();
    let (count, faces) = lower.split_once('d').ok_or_else(invalid)?;
    let count = if count.is_empty() {
        1
    } else {
        count.parse::<u32>().map_err(|_| invalid())?
    };
    let faces = faces.parse::<u32>().map_err(|_| invalid())?;
    if !DIE_FACES.contains(&faces) {
        return Err(OrchidError::Command(format!("no such die: d{faces}")));
    }
    if count == 0 || count > MAX_DICE {
        return Err(OrchidError::Command(format!(
            "can roll 1-{MAX_DICE} dice at once"
        )));
    }
    Ok((count, faces))
}
