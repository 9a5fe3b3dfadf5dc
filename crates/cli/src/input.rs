use anyhow::Context;
use scheme_core::models::Profile;
use std::io::Read;
use std::path::Path;

/// Reads a profile JSON document from a file, or from stdin when `source` is `-`.
pub fn load_profile(source: &str) -> anyhow::Result<Profile> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read profile from stdin")?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("read profile file {source}"))?
    };
    Ok(Profile::from_json_str(&raw)?)
}
