/// The files staged for one commit attempt.
///
/// Paths are repository-relative and `/`-separated, in the order git
/// reported them. The set is never modified once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitChangeSet {
    paths: Vec<String>,
}

impl CommitChangeSet {
    /// Build a change set from explicit paths (leading `./` and backslashes are normalized)
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|p| normalize(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect();
        Self { paths }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn normalize(raw: &str) -> String {
    let mut path = raw.trim().replace('\\', "/");
    while let Some(rest) = path.strip_prefix("./") {
        path = rest.to_string();
    }
    path
}
