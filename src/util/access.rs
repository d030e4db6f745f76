use nix::unistd::{AccessFlags, access};
use std::path::Path;

/* A control script counts as present only when it is executable; a plain
 * file with the right name does not. */
pub fn exec_exists(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}
