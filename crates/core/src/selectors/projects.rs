//! Project selectors.

use serde::Serialize;

use super::{Counts, count_by, filter_by, find_by_id, percentage, search};
use crate::filter::Filter;
use crate::model::{Project, Task};
use crate::types::TaskStatus;

pub fn project_by_id<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
    find_by_id(projects, id)
}

pub fn projects_by_status<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
    status: &Filter<TaskStatus>,
) -> Vec<&'a Project> {
    filter_by(projects, status, |p| p.status.as_ref())
}

pub fn project_status_counts<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
) -> Counts<TaskStatus> {
    count_by(projects, |p| p.status)
}

fn project_search_fields(project: &Project) -> [Option<&str>; 2] {
    [project.name.as_deref(), project.description.as_deref()]
}

pub fn search_projects<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
    query: &str,
) -> Vec<&'a Project> {
    search(projects, query, project_search_fields)
}

/// A project joined with its tasks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithTasks<'a> {
    pub project: &'a Project,
    pub tasks: Vec<&'a Task>,
    pub task_counts: Counts<TaskStatus>,
    /// Completed tasks as a percentage of all tasks, `0` with no tasks.
    pub progress: f64,
}

fn join<'a>(project: &'a Project, tasks: &'a [Task]) -> ProjectWithTasks<'a> {
    let own: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.project_id.as_ref() == Some(&project.id))
        .collect();
    let task_counts = count_by(own.iter().copied(), |t| t.status);
    let progress = percentage(task_counts.get(TaskStatus::Completed), task_counts.total());
    ProjectWithTasks {
        project,
        tasks: own,
        task_counts,
        progress,
    }
}

/// Join one project with its tasks. `None` when the project is unknown.
pub fn project_with_tasks<'a>(
    projects: &'a [Project],
    tasks: &'a [Task],
    project_id: &str,
) -> Option<ProjectWithTasks<'a>> {
    find_by_id(projects, project_id).map(|project| join(project, tasks))
}

/// Join every project with its tasks.
pub fn projects_with_tasks<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
    tasks: &'a [Task],
) -> Vec<ProjectWithTasks<'a>> {
    projects.into_iter().map(|p| join(p, tasks)).collect()
}
