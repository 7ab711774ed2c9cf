use orchid_types::error::Result;
use orchid_vfs::{MemoryVfs, Vfs};

/// Create the starting file tree: the home directory, a readme and a demo
/// script for `exe`.
pub fn populate_vfs(vfs: &mut MemoryVfs, home: &str) -> Result<()> {
    vfs.mkdir(home)?;
    vfs.mkdir("/etc")?;
    vfs.mkdir("/scripts")?;
    vfs.write("/etc/hostname", b"cardputer")?;
    vfs.write(
        "/readme.txt",
        b"Welcome to Orchid!\nType 'help all' for the command list.",
    )?;
    vfs.write(
        "/scripts/hello.sh",
        b"# run with: exe /scripts/hello.sh\nenv_set greeting hello\nenv_get greeting\nclock\n",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_has_home_and_demo_script() {
        let mut vfs = MemoryVfs::new();
        populate_vfs(&mut vfs, "/home/orchid").unwrap();
        assert!(vfs.exists("/home/orchid"));
        assert!(vfs.exists("/scripts/hello.sh"));
    }

    #[test]
    fn root_home_is_fine() {
        let mut vfs = MemoryVfs::new();
        populate_vfs(&mut vfs, "/").unwrap();
        assert!(vfs.exists("/readme.txt"));
    }
}
