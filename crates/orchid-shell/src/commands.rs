//! Built-in command table.

use orchid_types::error::Result;

use crate::interpreter::{Builtin, CommandRegistry};

/// Register all built-in commands into a registry.
///
/// Fails only if a name is registered twice, which would mean two handlers
/// claim the same command.
pub fn register_builtins(reg: &mut CommandRegistry) -> Result<()> {
    for builtin in Builtin::ALL {
        reg.register_builtin(builtin)?;
    }
    crate::display_commands::register_display_commands(reg)?;
    crate::file_commands::register_file_commands(reg)?;
    crate::system_commands::register_system_commands(reg)?;
    crate::storage_commands::register_storage_commands(reg)?;
    crate::network_commands::register_network_commands(reg)?;
    crate::fun_commands::register_fun_commands(reg)?;
    log::debug!("Registered {} commands", reg.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registering_twice_fails() {
        let mut reg = CommandRegistry::new();
        register_builtins(&mut reg).unwrap();
        assert!(register_builtins(&mut reg).is_err());
    }
}
