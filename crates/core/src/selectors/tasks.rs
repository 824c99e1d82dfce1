//! Task selectors.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use super::{Counts, count_by, dates, filter_by, find_by_id, percentage, search};
use crate::filter::Filter;
use crate::model::Task;
use crate::types::{Priority, ProjectId, TaskStatus, UserId};

pub fn task_by_id<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    find_by_id(tasks, id)
}

pub fn tasks_by_status<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    status: &Filter<TaskStatus>,
) -> Vec<&'a Task> {
    filter_by(tasks, status, |t| t.status.as_ref())
}

pub fn tasks_by_priority<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    priority: &Filter<Priority>,
) -> Vec<&'a Task> {
    filter_by(tasks, priority, |t| t.priority.as_ref())
}

pub fn tasks_by_project<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    project: &Filter<ProjectId>,
) -> Vec<&'a Task> {
    filter_by(tasks, project, |t| t.project_id.as_ref())
}

pub fn tasks_by_assignee<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    assignee: &Filter<UserId>,
) -> Vec<&'a Task> {
    filter_by(tasks, assignee, |t| t.assignee_id.as_ref())
}

pub fn task_status_counts<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Counts<TaskStatus> {
    count_by(tasks, |t| t.status)
}

pub fn task_priority_counts<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Counts<Priority> {
    count_by(tasks, |t| t.priority)
}

/// Tasks due inside the inclusive range. With both bounds open every task
/// is returned.
pub fn tasks_by_date_range<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    start: Option<&DateTime<Tz>>,
    end: Option<&DateTime<Tz>>,
) -> Vec<&'a Task> {
    if start.is_none() && end.is_none() {
        return tasks.into_iter().collect();
    }
    tasks
        .into_iter()
        .filter(|t| t.due_date.as_ref().is_some_and(|d| dates::in_range(d, start, end)))
        .collect()
}

/// Tasks due on the calendar day of `now`.
pub fn todays_tasks<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    now: &DateTime<Tz>,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|t| t.due_date.as_ref().is_some_and(|d| dates::is_same_day(d, now)))
        .collect()
}

/// Tasks due in the Sunday-to-Saturday week of `now`.
pub fn this_weeks_tasks<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    now: &DateTime<Tz>,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|t| t.due_date.as_ref().is_some_and(|d| dates::is_in_week(d, now)))
        .collect()
}

fn is_overdue<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> bool {
    !task.is_closed() && task.due_date.as_ref().is_some_and(|d| dates::is_before(d, now))
}

/// Open tasks whose due date has passed.
pub fn overdue_tasks<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    now: &DateTime<Tz>,
) -> Vec<&'a Task> {
    tasks.into_iter().filter(|t| is_overdue(t, now)).collect()
}

fn task_search_fields(task: &Task) -> [Option<&str>; 2] {
    [task.title.as_deref(), task.description.as_deref()]
}

pub fn search_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, query: &str) -> Vec<&'a Task> {
    search(tasks, query, task_search_fields)
}

/// Tasks held by one assignee.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeWorkload {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub high_priority: usize,
    pub overdue: usize,
    pub completion_rate: f64,
}

/// Workload per assignee. Unassigned tasks are skipped.
pub fn assignee_workload<'a, Tz: TimeZone>(
    tasks: impl IntoIterator<Item = &'a Task>,
    now: &DateTime<Tz>,
) -> BTreeMap<UserId, AssigneeWorkload> {
    let mut workload: BTreeMap<UserId, AssigneeWorkload> = BTreeMap::new();
    for task in tasks {
        let Some(assignee) = task.assignee_id.as_ref() else {
            continue;
        };
        let entry = workload.entry(assignee.clone()).or_default();
        entry.total += 1;
        match task.status {
            Some(TaskStatus::Todo) => entry.todo += 1,
            Some(TaskStatus::InProgress) => entry.in_progress += 1,
            Some(TaskStatus::Completed) => entry.completed += 1,
            Some(TaskStatus::Cancelled) => entry.cancelled += 1,
            None => {}
        }
        if task.priority == Some(Priority::High) {
            entry.high_priority += 1;
        }
        if is_overdue(task, now) {
            entry.overdue += 1;
        }
    }
    for entry in workload.values_mut() {
        entry.completion_rate = percentage(entry.completed, entry.total);
    }
    workload
}
