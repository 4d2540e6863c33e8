use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use tsync_core::Invocation;

use crate::runner::{CommandOutput, CommandRunner};

type Effect = Box<dyn Fn(&Invocation) + Send + Sync>;

#[derive(Clone, Debug)]
enum Reply {
    Output(CommandOutput),
    NotFound,
}

/// Scripted runner for tests. Replies are keyed by subcommand (first arg);
/// unscripted subcommands succeed with empty output. Every call is recorded.
#[derive(Default)]
pub struct FakeRunner {
    inner: Mutex<Inner>,
    effects: HashMap<String, Effect>,
}

#[derive(Default)]
struct Inner {
    queued: HashMap<String, VecDeque<Reply>>,
    sticky: HashMap<String, Reply>,
    calls: Vec<Invocation>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `output` to every call of `subcommand` not covered by a queued reply.
    pub fn respond(self, subcommand: &str, output: CommandOutput) -> Self {
        self.inner.lock().unwrap().sticky.insert(subcommand.to_string(), Reply::Output(output));
        self
    }

    /// Reply once with `output`; queued replies are consumed before the sticky one.
    pub fn respond_once(self, subcommand: &str, output: CommandOutput) -> Self {
        self.inner
            .lock()
            .unwrap()
            .queued
            .entry(subcommand.to_string())
            .or_default()
            .push_back(Reply::Output(output));
        self
    }

    /// Behave as if the executable is not on PATH.
    pub fn missing_executable(self) -> Self {
        self.inner.lock().unwrap().sticky.insert(String::new(), Reply::NotFound);
        self
    }

    /// Run `effect` on every successful call of `subcommand`, e.g. to write files.
    pub fn on_success(mut self, subcommand: &str, effect: impl Fn(&Invocation) + Send + Sync + 'static) -> Self {
        self.effects.insert(subcommand.to_string(), Box::new(effect));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, subcommand: &str) -> Vec<Invocation> {
        self.calls().into_iter().filter(|c| c.subcommand() == Some(subcommand)).collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        let sub = invocation.subcommand().unwrap_or("").to_string();
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(invocation.clone());
            let queued = inner.queued.get_mut(&sub).and_then(|q| q.pop_front());
            let reply = match queued {
                Some(r) => r,
                None => inner
                    .sticky
                    .get(&sub)
                    .or_else(|| inner.sticky.get(""))
                    .cloned()
                    .unwrap_or_else(|| Reply::Output(CommandOutput::ok(""))),
            };
            reply
        };
        match reply {
            Reply::NotFound => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: not found", invocation.program),
            )),
            Reply::Output(out) => {
                if out.success() {
                    if let Some(effect) = self.effects.get(&sub) {
                        effect(invocation);
                    }
                }
                Ok(out)
            }
        }
    }
}
