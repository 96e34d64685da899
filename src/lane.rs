use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pill {
    pub text: &'static str,
    pub bg_color: &'static str,
    pub text_color: &'static str,
}

/// One board column. The table is fixed at startup; a task whose status
/// has no entry here is never shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneConfig {
    pub id: TaskStatus,
    pub title: &'static str,
    pub pill: Option<Pill>,
}

pub fn lane_configs() -> [LaneConfig; 4] {
    [
        LaneConfig {
            id: TaskStatus::Todo,
            title: "To Do",
            pill: None,
        },
        LaneConfig {
            id: TaskStatus::InProgress,
            title: "In Progress",
            pill: Some(Pill {
                text: "In Progress",
                bg_color: "bg-orange-400",
                text_color: "text-white",
            }),
        },
        LaneConfig {
            id: TaskStatus::Approved,
            title: "Approved",
            pill: Some(Pill {
                text: "Approved",
                bg_color: "bg-green-500",
                text_color: "text-white",
            }),
        },
        LaneConfig {
            id: TaskStatus::Reject,
            title: "Reject",
            pill: Some(Pill {
                text: "Reject",
                bg_color: "bg-red-500",
                text_color: "text-white",
            }),
        },
    ]
}

/// A lane together with the tasks of the current view that belong to it.
#[derive(Debug, Clone)]
pub struct Lane<'a> {
    pub config: LaneConfig,
    pub tasks: Vec<&'a Task>,
}

/// Splits `tasks` into the configured lanes, keeping collection order
/// inside each lane. Tasks with an unknown status land nowhere.
pub fn partition(tasks: &[Task]) -> Vec<Lane<'_>> {
    lane_configs()
        .into_iter()
        .map(|config| {
            let lane_tasks = tasks.iter().filter(|t| t.status == config.id).collect();
            Lane {
                config,
                tasks: lane_tasks,
            }
        })
        .collect()
}
