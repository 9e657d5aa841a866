//! Stages the `pg_worker` binary where the unprivileged user can run it.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Permissions, PermissionsExt};
use cap_std::fs_utf8::Dir;
use eyre::{WrapErr, eyre};
use std::io::{ErrorKind, Write};

/// Copies `worker` into the temp directory behind a `runuser` wrapper.
///
/// Build outputs often live under `/root`, which `nobody` cannot traverse.
pub fn stage_worker(worker: &Utf8Path) -> eyre::Result<Utf8PathBuf> {
    let temp = Utf8PathBuf::try_from(std::env::temp_dir())
        .map_err(|err| eyre!("temp directory is not UTF-8: {err}"))?;
    let stem = format!("diaristlink_pg_worker_{}", std::process::id());
    let binary = temp.join(format!("{stem}.bin"));
    let wrapper = temp.join(&stem);

    let (source_dir, source_name) = open_parent(worker)?;
    let staging = Dir::open_ambient_dir(&temp, ambient_authority())
        .wrap_err_with(|| format!("cannot open {temp}"))?;
    let binary_name = format!("{stem}.bin");
    remove_if_present(&staging, &binary_name)?;
    remove_if_present(&staging, &stem)?;

    source_dir
        .copy(source_name, &staging, &binary_name)
        .wrap_err_with(|| format!("cannot copy {worker} to {binary}"))?;
    staging
        .create(&stem)?
        .write_all(wrapper_script(&binary).as_bytes())?;
    for name in [binary_name.as_str(), stem.as_str()] {
        staging.set_permissions(name, Permissions::from_mode(0o755))?;
    }
    Ok(wrapper)
}

fn wrapper_script(binary: &Utf8Path) -> String {
    format!(
        concat!(
            "#!/bin/sh\n",
            "if [ \"$(id -u)\" -eq 0 ]; then\n",
            "  exec /usr/sbin/runuser -u nobody -- '{binary}' \"$@\"\n",
            "fi\n",
            "exec '{binary}' \"$@\"\n",
        ),
        binary = binary.as_str()
    )
}

fn remove_if_present(dir: &Dir, name: &str) -> eyre::Result<()> {
    match dir.remove_file(name) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
        _ => Ok(()),
    }
}

/// Opens the directory containing `path` and returns it with the file name.
pub fn open_parent(path: &Utf8Path) -> eyre::Result<(Dir, &str)> {
    let name = path
        .file_name()
        .ok_or_else(|| eyre!("{path} has no file name"))?;
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("cannot open {parent}"))?;
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::wrapper_script;
    use camino::Utf8Path;

    #[test]
    fn wrapper_drops_to_nobody_only_as_root() {
        let script = wrapper_script(Utf8Path::new("/tmp/worker.bin"));

        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("runuser -u nobody -- '/tmp/worker.bin' \"$@\""));
        assert!(script.ends_with("exec '/tmp/worker.bin' \"$@\"\n"));
    }
}
