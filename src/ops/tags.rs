use super::{optional_name, require_name, RepoHandle};
use crate::core::error::Result;

impl RepoHandle<'_> {
    /// Create tag `name`, annotated when `message` is non-blank and
    /// lightweight otherwise, at `commit` or HEAD.
    pub fn create_tag(&self, name: &str, message: Option<&str>, commit: Option<&str>) -> Result<()> {
        let name = require_name("Tag name", name)?;
        let message = message.map(str::trim).filter(|m| !m.is_empty());
        let commit = optional_name("Commit", commit)?;

        let mut args = vec!["tag"];
        match message {
            Some(message) => args.extend(["-a", name, "-m", message]),
            None => args.push(name),
        }
        args.extend(commit);
        self.write(|| self.run_checked("tag", &args).map(|_| ()))
    }

    pub fn delete_tag(&self, name: &str) -> Result<()> {
        let name = require_name("Tag name", name)?;
        self.write(|| self.run_checked("tag delete", &["tag", "-d", name]).map(|_| ()))
    }

    pub fn tags(&self) -> Result<Vec<String>> {
        self.read(|| {
            let stdout = self.run_checked("tag list", &["tag", "--list"])?;
            Ok(stdout
                .lines()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect())
        })
    }
}
