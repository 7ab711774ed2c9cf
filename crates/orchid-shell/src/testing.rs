//! Shared fixtures for unit tests.

use rand::SeedableRng;
use rand::rngs::StdRng;

use orchid_platform::test_utils::MockPlatform;
use orchid_types::config::OrchidConfig;
use orchid_vfs::MemoryVfs;

use crate::dispatcher::{DispatchResult, Dispatcher};
use crate::environment::Environment;
use crate::interpreter::{CommandOutput, CommandRegistry};

/// Owns everything an [`Environment`] borrows.
pub(crate) struct Rig {
    pub config: OrchidConfig,
    pub vfs: MemoryVfs,
    pub platform: MockPlatform,
    pub rng: StdRng,
    pub registry: CommandRegistry,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            config: OrchidConfig::default(),
            vfs: MemoryVfs::new(),
            platform: MockPlatform::new(),
            rng: StdRng::seed_from_u64(7),
            registry: CommandRegistry::with_builtins().unwrap(),
        }
    }

    /// Borrow an environment plus the dispatcher over the rig's registry.
    pub fn split(&mut self) -> (Dispatcher<'_>, Environment<'_>) {
        let env = Environment::new(
            &self.config,
            &mut self.vfs,
            &mut self.platform,
            &mut self.rng,
        );
        (Dispatcher::new(&self.registry), env)
    }
}

/// Dispatch and unwrap the handler output, panicking on user errors.
pub(crate) fn run(disp: &Dispatcher<'_>, env: &mut Environment<'_>, line: &str) -> CommandOutput {
    match disp.dispatch(line, env) {
        DispatchResult::Invoked { output, .. } => output,
        other => panic!("{line}: {other:?}"),
    }
}

/// The text of a text-like output.
pub(crate) fn text(output: &CommandOutput) -> &str {
    match output {
        CommandOutput::Text(s) | CommandOutput::Highlight(s) | CommandOutput::Error(s) => s,
        CommandOutput::Colored { text, .. } => text,
        other => panic!("expected text, got {other:?}"),
    }
}
