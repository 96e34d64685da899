use crate::error::{BoardError, BoardResult};
use crate::task::Task;
use serde::Deserialize;
use std::{fs, path::Path};

const BUILTIN_SEED: &str = include_str!("../data/tasks.json");

#[derive(Debug, Deserialize)]
struct SeedFile {
    tasks: Vec<Task>,
}

/// Where the board gets its tasks when nothing has been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Builtin,
    File(std::path::PathBuf),
    Tasks(Vec<Task>),
}

impl Seed {
    pub fn load(&self) -> BoardResult<Vec<Task>> {
        match self {
            Seed::Builtin => parse(BUILTIN_SEED),
            Seed::File(path) => load_file(path),
            Seed::Tasks(tasks) => Ok(tasks.clone()),
        }
    }
}

fn load_file(path: &Path) -> BoardResult<Vec<Task>> {
    let data = fs::read_to_string(path).map_err(|source| BoardError::Seed {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&data)
}

fn parse(data: &str) -> BoardResult<Vec<Task>> {
    let seed: SeedFile = serde_json::from_str(data)?;
    Ok(seed.tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_seed_parses_with_known_statuses() {
        let tasks = Seed::Builtin.load().unwrap();
        assert!(!tasks.is_empty());
        assert!(tasks.iter().all(|t| t.status.is_known()));
    }

    #[test]
    fn seed_file_overrides_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tasks":[{{"id":"x","title":"Only","status":"reject"}}]}}"#
        )
        .unwrap();

        let tasks = Seed::File(file.path().to_path_buf()).load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "x");
    }

    #[test]
    fn missing_seed_file_reports_path() {
        let err = Seed::File("/nonexistent/seed.json".into()).load().unwrap_err();
        assert!(matches!(err, BoardError::Seed { .. }));
    }
}
