//! Process environment overrides used while bootstrapping the cluster.

use super::worker::stage_worker;
use camino::Utf8Path;
use pg_embedded_setup_unpriv::{ExecutionPrivileges, detect_execution_privileges};
use std::ffi::{OsStr, OsString};
use std::net::TcpListener;
use std::sync::{Mutex, MutexGuard, PoisonError};

type EnvChange = (OsString, Option<OsString>);

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Applies environment overrides and restores the previous values on drop.
///
/// The guard holds a process-wide lock so overlapping overrides serialise.
pub struct ScopedEnv {
    previous: Vec<EnvChange>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    pub fn apply(changes: &[EnvChange]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = changes
            .iter()
            .map(|(key, _)| (key.clone(), std::env::var_os(key)))
            .collect();
        for (key, value) in changes {
            write_var(key, value.as_deref());
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.previous.iter().rev() {
            write_var(key, value.as_deref());
        }
    }
}

fn write_var(key: &OsStr, value: Option<&OsStr>) {
    // SAFETY: writers hold ENV_LOCK and no test reads these keys concurrently.
    unsafe {
        match value {
            Some(present) => std::env::set_var(key, present),
            None => std::env::remove_var(key),
        }
    }
}

/// Converts bootstrap environment pairs into overrides for [`ScopedEnv`].
pub fn as_overrides(vars: &[(String, Option<String>)]) -> Vec<EnvChange> {
    vars.iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

/// Overrides needed before `bootstrap_for_tests` runs.
///
/// A free port is reserved unless `PG_PORT` is already set. Root runs also
/// need `PG_EMBEDDED_WORKER` pointing at a worker `nobody` can execute.
pub fn bootstrap_overrides() -> eyre::Result<Vec<EnvChange>> {
    let mut changes = Vec::new();
    if std::env::var_os("PG_PORT").is_none() {
        changes.push((OsString::from("PG_PORT"), Some(free_port()?.into())));
    }
    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os("PG_EMBEDDED_WORKER").is_none()
    {
        let staged = stage_worker(Utf8Path::new(env!("CARGO_BIN_EXE_pg_worker")))?;
        changes.push((
            OsString::from("PG_EMBEDDED_WORKER"),
            Some(OsString::from(staged.as_str())),
        ));
    }
    Ok(changes)
}

fn free_port() -> eyre::Result<String> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port.to_string())
}

#[cfg(test)]
mod tests {
    use super::ScopedEnv;
    use std::ffi::OsString;

    #[test]
    fn overrides_are_restored_on_drop() {
        let key = OsString::from("DIARISTLINK_SCOPED_ENV_CHECK");
        {
            let _scope = ScopedEnv::apply(&[(key.clone(), Some(OsString::from("set")))]);
            assert_eq!(std::env::var_os(&key), Some(OsString::from("set")));
        }
        assert_eq!(std::env::var_os(&key), None);
    }
}
