//! Static sample data used to seed an empty local store.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::model::{Project, Task, TaskStatus};
use crate::storage::Snapshot;

/// The deterministic starter dataset: two projects, tasks in every column,
/// contiguous per-column ordering.
#[must_use]
pub fn snapshot() -> Snapshot {
    let website_created = Utc
        .with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .unwrap_or_default();
    let mobile_created = Utc
        .with_ymd_and_hms(2026, 1, 12, 14, 30, 0)
        .single()
        .unwrap_or_default();

    let projects = vec![
        Project {
            id: "p-website".to_string(),
            name: "Website relaunch".to_string(),
            description: Some("New marketing site for the spring launch".to_string()),
            created_at: website_created,
        },
        Project {
            id: "p-mobile".to_string(),
            name: "Mobile app".to_string(),
            description: None,
            created_at: mobile_created,
        },
    ];

    let tasks = vec![
        task(
            "t-ia",
            "p-website",
            "Draft information architecture",
            Some("mira"),
            TaskStatus::Todo,
            NaiveDate::from_ymd_opt(2026, 2, 20),
            1,
        ),
        task(
            "t-assets",
            "p-website",
            "Collect brand assets",
            None,
            TaskStatus::Todo,
            None,
            2,
        ),
        task(
            "t-landing",
            "p-website",
            "Design landing page",
            Some("jonas"),
            TaskStatus::InProgress,
            NaiveDate::from_ymd_opt(2026, 3, 1),
            1,
        ),
        task(
            "t-kickoff",
            "p-website",
            "Kick-off meeting",
            None,
            TaskStatus::Done,
            None,
            1,
        ),
        task(
            "t-onboarding",
            "p-mobile",
            "Sketch onboarding flow",
            None,
            TaskStatus::Todo,
            None,
            1,
        ),
    ];

    Snapshot { projects, tasks }
}

fn task(
    id: &str,
    project_id: &str,
    title: &str,
    assignee: Option<&str>,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    order: u32,
) -> Task {
    Task {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: title.to_string(),
        assignee: assignee.map(str::to_string),
        status,
        due_date,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::snapshot;
    use crate::model::TaskStatus;

    #[test]
    fn sample_is_deterministic() {
        assert_eq!(snapshot(), snapshot());
    }

    #[test]
    fn sample_tasks_reference_existing_projects() {
        let snap = snapshot();
        for t in &snap.tasks {
            assert!(
                snap.projects.iter().any(|p| p.id == t.project_id),
                "task {} points at unknown project {}",
                t.id,
                t.project_id
            );
        }
    }

    #[test]
    fn sample_columns_are_contiguous_from_one() {
        let snap = snapshot();
        for project in &snap.projects {
            for status in TaskStatus::ALL {
                let mut orders: Vec<u32> = snap
                    .tasks
                    .iter()
                    .filter(|t| t.in_column(&project.id, status))
                    .map(|t| t.order)
                    .collect();
                orders.sort_unstable();
                let expected: Vec<u32> = (1..=u32::try_from(orders.len()).unwrap()).collect();
                assert_eq!(orders, expected, "column {}/{status}", project.id);
            }
        }
    }

    #[test]
    fn sample_covers_every_column() {
        let snap = snapshot();
        for status in TaskStatus::ALL {
            assert!(snap.tasks.iter().any(|t| t.status == status));
        }
    }
}
