//! File system commands: chdir, list, mkdir, mkfile, rmdir, copy, redir.

use orchid_types::error::{OrchidError, Result};
use orchid_vfs::EntryKind;

use crate::environment::Environment;
use crate::interpreter::{Arity, Command, CommandOutput, CommandRegistry, arg};

/// Register file system commands into a registry.
pub fn register_file_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(ChdirCmd))?;
    reg.register(Box::new(ListCmd))?;
    reg.register(Box::new(MkdirCmd))?;
    reg.register(Box::new(MkfileCmd))?;
    reg.register(Box::new(RmdirCmd))?;
    reg.register(Box::new(CopyCmd))?;
    reg.register(Box::new(RedirCmd))?;
    Ok(())
}

fn is_dir(env: &Environment<'_>, path: &str) -> bool {
    env.vfs
        .stat(path)
        .is_ok_and(|meta| meta.kind == EntryKind::Directory)
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// ---------------------------------------------------------------------------
// chdir
// ---------------------------------------------------------------------------

struct ChdirCmd;
impl Command for ChdirCmd {
    fn name(&self) -> &str {
        "chdir"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Change working directory"
    }
    fn usage(&self) -> &str {
        "chdir <path>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(arg(args, 0)?);
        if !is_dir(env, &path) {
            return Err(OrchidError::Vfs(format!("not a directory: {path}")));
        }
        env.cwd = path;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

struct ListCmd;
impl Command for ListCmd {
    fn name(&self) -> &str {
        "list"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "List a directory ('cur' for the working directory)"
    }
    fn usage(&self) -> &str {
        "list <path|cur>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let target = arg(args, 0)?;
        let path = if target.eq_ignore_ascii_case("cur") || target.eq_ignore_ascii_case("current")
        {
            env.cwd.clone()
        } else {
            env.resolve(target)
        };
        let entries = env.vfs.readdir(&path)?;
        if entries.is_empty() {
            return Ok(CommandOutput::Text("(empty)".to_string()));
        }
        let lines: Vec<String> = entries
            .iter()
            .map(|e| match e.kind {
                EntryKind::Directory => format!("{}/", e.name),
                EntryKind::File => format!("{} {}", e.name, e.size),
            })
            .collect();
        Ok(CommandOutput::Highlight(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Create a directory"
    }
    fn usage(&self) -> &str {
        "mkdir <path>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(arg(args, 0)?);
        if env.vfs.exists(&path) {
            return Err(OrchidError::Vfs(format!("already exists: {path}")));
        }
        env.vfs.mkdir(&path)?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// mkfile
// ---------------------------------------------------------------------------

struct MkfileCmd;
impl Command for MkfileCmd {
    fn name(&self) -> &str {
        "mkfile"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Create an empty file (truncates an existing one)"
    }
    fn usage(&self) -> &str {
        "mkfile <path>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(arg(args, 0)?);
        env.vfs.write(&path, &[])?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// rmdir
// ---------------------------------------------------------------------------

struct RmdirCmd;
impl Command for RmdirCmd {
    fn name(&self) -> &str {
        "rmdir"
    }
    fn arity(&self) -> Arity {
        Arity::One
    }
    fn description(&self) -> &str {
        "Remove a file or an empty directory"
    }
    fn usage(&self) -> &str {
        "rmdir <path>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let path = env.resolve(arg(args, 0)?);
        if path == env.cwd || env.cwd.starts_with(&format!("{path}/")) {
            return Err(OrchidError::Vfs(format!("{path} is in use")));
        }
        env.vfs.remove(&path)?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// copy
// ---------------------------------------------------------------------------

struct CopyCmd;
impl Command for CopyCmd {
    fn name(&self) -> &str {
        "copy"
    }
    fn arity(&self) -> Arity {
        Arity::Two
    }
    fn description(&self) -> &str {
        "Copy a file"
    }
    fn usage(&self) -> &str {
        "copy <src> <dst>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let src = env.resolve(arg(args, 0)?);
        let mut dst = env.resolve(arg(args, 1)?);
        if is_dir(env, &dst) {
            dst = env.resolve(&format!("{dst}/{}", file_name(&src)));
        }
        let data = env.vfs.read(&src)?;
        env.vfs.write(&dst, &data)?;
        Ok(CommandOutput::Text(format!("{} bytes -> {dst}", data.len())))
    }
}

// ---------------------------------------------------------------------------
// redir
// ---------------------------------------------------------------------------

struct RedirCmd;
impl Command for RedirCmd {
    fn name(&self) -> &str {
        "redir"
    }
    fn arity(&self) -> Arity {
        Arity::Two
    }
    fn description(&self) -> &str {
        "Rename a file or directory"
    }
    fn usage(&self) -> &str {
        "redir <old> <new>"
    }
    fn execute(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let from = env.resolve(arg(args, 0)?);
        let to = env.resolve(arg(args, 1)?);
        env.vfs.rename(&from, &to)?;
        if env.cwd == from || env.cwd.starts_with(&format!("{from}/")) {
            env.cwd = format!("{to}{}", &env.cwd[from.len()..]);
        }
        Ok(CommandOutput::None)
    }
}
