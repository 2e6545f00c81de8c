//! Terraform output lookup
//!
//! Used only to default configuration values (bucket name, domain)
//! from infrastructure outputs. Absence of a value never crashes the
//! core - callers fall back or raise their own configuration error.

use std::path::PathBuf;
use std::process::Command;

/// Key -> string lookup over infrastructure outputs
pub trait OutputLookup {
    /// Read an output value; `None` when the output doesn't exist
    fn read_output_value(&self, name: &str) -> Option<String>;
}

/// Reads outputs by shelling out to `terraform output -raw`
pub struct TerraformOutputs {
    directory: PathBuf,
}

impl TerraformOutputs {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl OutputLookup for TerraformOutputs {
    fn read_output_value(&self, name: &str) -> Option<String> {
        if !self.directory.is_dir() {
            return None;
        }

        let output = Command::new("terraform")
            .arg("output")
            .arg("-raw")
            .arg(name)
            .current_dir(&self.directory)
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                eprintln!("warning: terraform output -raw {name} failed: {e}");
                return None;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if stdout.is_empty() || stdout.contains("No outputs found") {
            if stdout.is_empty() && !output.stderr.is_empty() {
                eprintln!(
                    "warning: terraform output -raw {name}: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }
            return None;
        }

        Some(stdout)
    }
}

/// Resolve the deploy bucket from an explicit override or the
/// `bucket_name` infrastructure output
///
/// Raised at configuration time, before any network activity.
pub fn resolve_bucket(
    explicit: Option<String>,
    lookup: &dyn OutputLookup,
) -> crate::BakeryResult<String> {
    explicit
        .or_else(|| lookup.read_output_value("bucket_name"))
        .ok_or(crate::BakeryError::BucketUnresolved)
}
