use super::RepoHandle;
use crate::core::error::Result;
use crate::core::outcome::{RemoteEntry, RemoteRefs};

impl RepoHandle<'_> {
    pub fn remotes(&self) -> Result<Vec<RemoteEntry>> {
        self.read(|| {
            let stdout = self.run_checked("remote", &["remote", "-v"])?;
            Ok(parse_remotes(&stdout))
        })
    }
}

/// Group `remote -v` lines (`name<TAB>url (fetch|push)`) by remote, keeping
/// the order in which remotes first appear.
fn parse_remotes(output: &str) -> Vec<RemoteEntry> {
    let mut remotes: Vec<RemoteEntry> = Vec::new();
    for line in output.lines() {
        let Some((name, rest)) = line.split_once('\t') else {
            continue;
        };
        let (url, direction) = match rest.rsplit_once(' ') {
            Some((url, direction)) => (url.trim(), direction.trim()),
            None => (rest.trim(), ""),
        };

        let position = match remotes.iter().position(|r| r.name == name) {
            Some(position) => position,
            None => {
                remotes.push(RemoteEntry {
                    name: name.to_string(),
                    refs: RemoteRefs::default(),
                });
                remotes.len() - 1
            }
        };
        let refs = &mut remotes[position].refs;
        match direction {
            "(push)" => refs.push = Some(url.to_string()),
            _ => refs.fetch = Some(url.to_string()),
        }
    }
    remotes
}
