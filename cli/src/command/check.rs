use sitemirror::supervisor;

use crate::GeneralOptions;

use super::*;

/// Report whether the configured mirror tool can be found, without starting
/// anything.
pub fn check(general_options: &GeneralOptions) -> Result<(), CommandError> {
    let config = load_mirror_config(general_options)?.resolve()?;

    match supervisor::find_binary(&config.binary) {
        Some(path) => {
            println!("Found mirror tool '{}' at {}.", config.binary, path.display());

            Ok(())
        }
        None => Err(CommandError::new(
            CommandErrorKind::Tool,
            format!(
                "Mirror tool '{}' was not found on the search path. Install wget2 before mirroring.",
                config.binary
            ),
        )),
    }
}
