//! Helper binary invoked by `pg_embedded_setup_unpriv` when the repository
//! tests run as root.
//!
//! Arguments are an operation (`setup`, `start` or `stop`) and the path to a
//! JSON [`pg_embedded_setup_unpriv::worker::WorkerPayload`].

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Report, Result, eyre};
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
use postgresql_embedded::PostgreSQL;
use tokio::runtime::Builder;

fn main() -> Result<()> {
    color_eyre::install()?;
    let invocation = Invocation::parse(env::args_os())?;
    let payload = read_payload(&invocation.payload_path)?;
    invocation.operation.execute(payload)
}

/// Parsed command line.
#[derive(Debug)]
struct Invocation {
    operation: Operation,
    payload_path: OsString,
}

impl Invocation {
    fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let _program = args.next();
        let operation = args
            .next()
            .ok_or_else(|| eyre!("usage: pg_worker <setup|start|stop> <payload.json>"))
            .and_then(|raw| Operation::parse(&raw))?;
        let payload_path = args
            .next()
            .ok_or_else(|| eyre!("missing payload path after `{operation}`"))?;
        match args.next() {
            Some(extra) => Err(eyre!(
                "unexpected extra argument: {}",
                extra.to_string_lossy()
            )),
            None => Ok(Self {
                operation,
                payload_path,
            }),
        }
    }
}

fn read_payload(path: impl AsRef<Path>) -> Result<WorkerPayload> {
    let path = path.as_ref();
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn apply_environment(environment: Vec<(String, Option<PlainSecret>)>) {
    for (key, value) in environment {
        // SAFETY: no other threads exist yet.
        match value {
            Some(value) => unsafe { env::set_var(&key, value.expose()) },
            None => unsafe { env::remove_var(&key) },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    Setup,
    Start,
    Stop,
}

impl Operation {
    fn parse(raw: &OsStr) -> Result<Self> {
        match raw.to_string_lossy().as_ref() {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(eyre!(
                "unknown pg_worker operation '{other}'; expected setup, start or stop"
            )),
        }
    }

    fn execute(self, payload: WorkerPayload) -> Result<()> {
        let settings = payload
            .settings
            .into_settings()
            .map_err(|err| Report::new(err).wrap_err("invalid postgres settings in payload"))?;
        apply_environment(payload.environment);

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .wrap_err("failed to build pg_worker runtime")?;
        let mut postgres = PostgreSQL::new(settings);
        runtime
            .block_on(async move {
                match self {
                    Self::Setup => postgres.setup().await,
                    Self::Start => postgres.start().await,
                    Self::Stop => postgres.stop().await,
                }
            })
            .with_context(|| format!("embedded postgres {self} failed"))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        })
    }
}
