//! Runs embedded `PostgreSQL` lifecycle steps on behalf of the test harness.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <payload.json>
//! ```
//!
//! The payload is a serialised `WorkerPayload` holding the cluster settings
//! and environment overrides. When launched as root the worker re-executes
//! itself as `nobody`, because `initdb` and `postgres` refuse to run as root.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::ffi::CString;
#[cfg(unix)]
use std::io::{self, Read};
#[cfg(unix)]
use std::process::{Command, ExitStatus};
#[cfg(unix)]
use std::{env, fmt};
#[cfg(unix)]
use thiserror::Error;

#[cfg(unix)]
const REEXEC_MARKER: &str = "PG_WORKER_REEXEC";
#[cfg(unix)]
const TRUSTED_PATH: &str = "/usr/sbin:/usr/bin:/sbin:/bin";
#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("usage: pg_worker <setup|start|stop> <payload.json>: {0}")]
    Usage(String),
    #[error("cannot read payload: {0}")]
    Payload(#[source] BoxError),
    #[error("cannot parse payload: {0}")]
    PayloadFormat(#[from] serde_json::Error),
    #[error("invalid cluster settings: {0}")]
    Settings(String),
    #[error("cannot build runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("cannot drop privileges: {0}")]
    Privileges(String),
    #[error("postgres {step} failed: {reason}")]
    Postgres {
        step: Step,
        reason: String,
    },
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Step {
    fn parse(raw: &str) -> Result<Self, WorkerError> {
        match raw {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::Usage(format!("unknown step '{other}'"))),
        }
    }

    fn failed(self, err: &impl fmt::Display) -> WorkerError {
        WorkerError::Postgres {
            step: self,
            reason: err.to_string(),
        }
    }
}

#[cfg(unix)]
impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        })
    }
}

#[cfg(unix)]
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    step: Step,
    payload: Utf8PathBuf,
}

#[cfg(unix)]
fn parse_invocation(args: &[String]) -> Result<Invocation, WorkerError> {
    match args {
        [_, step, payload] => Ok(Invocation {
            step: Step::parse(step)?,
            payload: Utf8PathBuf::from(payload),
        }),
        [_, _] | [_] | [] => Err(WorkerError::Usage("missing arguments".to_owned())),
        _ => Err(WorkerError::Usage("too many arguments".to_owned())),
    }
}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    let args = env::args_os()
        .map(|arg| {
            arg.into_string()
                .map_err(|_| WorkerError::Usage("arguments must be UTF-8".to_owned()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let invocation = parse_invocation(&args)?;
    if Uid::effective().is_root() && env::var_os(REEXEC_MARKER).is_none() {
        let status = reexec_unprivileged(&args)?;
        std::process::exit(status.code().unwrap_or(1));
    }
    run(&invocation)?;
    Ok(())
}

#[cfg(unix)]
fn run(invocation: &Invocation) -> Result<(), WorkerError> {
    let payload = load_payload(&invocation.payload)?;
    drop_privileges(UNPRIVILEGED_USER)?;
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::Settings(err.to_string()))?;
    apply_environment(&payload.environment);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)?;
    let mut postgres = PostgreSQL::new(settings);
    let step = invocation.step;
    runtime.block_on(async move {
        match step {
            Step::Setup => {
                postgres.setup().await.map_err(|err| step.failed(&err))?;
                ensure_started(&mut postgres, step).await
            }
            Step::Start => {
                ensure_started(&mut postgres, step).await?;
                // The server must outlive this process.
                std::mem::forget(postgres);
                Ok(())
            }
            Step::Stop => postgres.stop().await.map_err(|err| step.failed(&err)),
        }
    })
}

#[cfg(unix)]
async fn ensure_started(postgres: &mut PostgreSQL, step: Step) -> Result<(), WorkerError> {
    if matches!(postgres.status(), Status::Started) {
        return Ok(());
    }
    postgres.start().await.map_err(|err| step.failed(&err))
}

#[cfg(unix)]
fn load_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let read = || -> Result<Vec<u8>, BoxError> {
        let (dir, relative) = ambient_dir_and_path(path)?;
        let mut file = dir.open(relative.as_std_path())?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    };
    let bytes = read().map_err(WorkerError::Payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(unix)]
fn reexec_unprivileged(args: &[String]) -> Result<ExitStatus, WorkerError> {
    let exe = env::current_exe().map_err(|err| WorkerError::Privileges(err.to_string()))?;
    let forwarded = args.get(1..).unwrap_or_default();
    let via_runuser = Command::new("runuser")
        .arg("-u")
        .arg(UNPRIVILEGED_USER)
        .arg("--")
        .arg(&exe)
        .args(forwarded)
        .env(REEXEC_MARKER, "1")
        .env("PATH", TRUSTED_PATH)
        .status();
    match via_runuser {
        Ok(status) => Ok(status),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut script = format!(
                "{REEXEC_MARKER}=1 exec {}",
                shell_quote(&exe.to_string_lossy())
            );
            for arg in forwarded {
                script.push(' ');
                script.push_str(&shell_quote(arg));
            }
            Command::new("/bin/su")
                .args(["-s", "/bin/sh", UNPRIVILEGED_USER, "-c"])
                .arg(script)
                .env("PATH", TRUSTED_PATH)
                .status()
                .map_err(|su_err| WorkerError::Privileges(su_err.to_string()))
        }
        Err(err) => Err(WorkerError::Privileges(err.to_string())),
    }
}

/// Wraps `value` in single quotes for `/bin/sh -c`.
#[cfg(unix)]
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(unix)]
fn drop_privileges(username: &str) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }
    let user = User::from_name(username)
        .map_err(|err| WorkerError::Privileges(err.to_string()))?
        .ok_or_else(|| WorkerError::Privileges(format!("user '{username}' not found")))?;
    let name = CString::new(user.name.clone())
        .map_err(|err| WorkerError::Privileges(err.to_string()))?;
    initgroups(&name, user.gid).map_err(|err| WorkerError::Privileges(err.to_string()))?;
    setgid(user.gid).map_err(|err| WorkerError::Privileges(err.to_string()))?;
    setuid(user.uid).map_err(|err| WorkerError::Privileges(err.to_string()))?;

    // SAFETY: the worker is single-threaded at this point.
    unsafe {
        env::set_var("HOME", &user.dir);
        env::set_var("USER", &user.name);
        env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: the worker is single-threaded and no runtime exists yet.
        unsafe {
            match value {
                Some(secret) => env::set_var(key, secret.expose()),
                None => env::remove_var(key),
            }
        }
    }
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker only runs on Unix".into())
}
