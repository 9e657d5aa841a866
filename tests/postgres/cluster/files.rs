//! Reads back state the server writes into its data directory.

use super::worker::open_parent;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use postgresql_embedded::Settings;
use std::io::ErrorKind;

/// Replaces the configured password with the one written to `password_file`.
pub fn sync_password(settings: &mut Settings) -> eyre::Result<()> {
    let path = settings.password_file.to_string_lossy().into_owned();
    let (dir, name) = open_parent(Utf8Path::new(&path))?;
    match dir.read_to_string(name) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// Adopts the port recorded in `postmaster.pid`, if the server wrote one.
pub fn sync_port(settings: &mut Settings) -> eyre::Result<()> {
    let data_dir = settings.data_dir.to_string_lossy().into_owned();
    let dir = Dir::open_ambient_dir(&data_dir, ambient_authority())?;
    let contents = match dir.read_to_string("postmaster.pid") {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    if let Some(port) = postmaster_port(&contents) {
        settings.port = port;
    }
    Ok(())
}

/// The fourth line of `postmaster.pid` holds the listening port.
fn postmaster_port(contents: &str) -> Option<u16> {
    contents.lines().nth(3)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::postmaster_port;
    use rstest::rstest;

    #[rstest]
    #[case("4242\n/var/lib/pg\n1760000000\n54329\n/tmp\n", Some(54_329))]
    #[case("4242\n/var/lib/pg\n1760000000\n", None)]
    #[case("4242\n/var/lib/pg\n1760000000\nnot-a-port\n", None)]
    fn port_comes_from_the_fourth_line(#[case] contents: &str, #[case] expected: Option<u16>) {
        assert_eq!(postmaster_port(contents), expected);
    }
}
