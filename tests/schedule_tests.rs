use cpm_core::{
    Dependency, ProjectSchedule, ScheduleError, Task, TaskId, TaskSchedule, schedule,
    sort_or_fail, would_create_cycle,
};

fn deps(pairs: &[(TaskId, TaskId)]) -> Vec<Dependency> {
    pairs.iter().map(|&(f, t)| Dependency::new(f, t)).collect()
}

fn timing(plan: &ProjectSchedule, id: TaskId) -> (i64, i64, i64, i64, i64) {
    let e: &TaskSchedule = plan.task(id).unwrap();
    (e.early_start, e.early_finish, e.late_start, e.late_finish, e.slack)
}

#[test]
fn linear_chain_is_fully_critical() {
    let tasks = vec![Task::new(1, "A", 2), Task::new(2, "B", 3), Task::new(3, "C", 1)];
    let plan = schedule(&tasks, &deps(&[(1, 2), (2, 3)])).unwrap();

    assert_eq!(timing(&plan, 1), (0, 2, 0, 2, 0));
    assert_eq!(timing(&plan, 2), (2, 5, 2, 5, 0));
    assert_eq!(timing(&plan, 3), (5, 6, 5, 6, 0));
    assert_eq!(plan.project_duration_days, 6);
    assert!(plan.tasks.iter().all(|e| e.is_critical));
    assert_eq!(plan.critical_path, vec![1, 2, 3]);
}

#[test]
fn parallel_branches_leave_slack_on_short_branch() {
    let tasks = vec![
        Task::new(1, "A", 1),
        Task::new(2, "B", 4),
        Task::new(3, "C", 1),
        Task::new(4, "D", 1),
    ];
    let plan = schedule(&tasks, &deps(&[(1, 2), (1, 3), (2, 4), (3, 4)])).unwrap();

    assert_eq!(timing(&plan, 1), (0, 1, 0, 1, 0));
    assert_eq!(timing(&plan, 2), (1, 5, 1, 5, 0));
    assert_eq!(timing(&plan, 3), (1, 2, 4, 5, 3));
    assert_eq!(timing(&plan, 4), (5, 6, 5, 6, 0));
    assert_eq!(plan.project_duration_days, 6);

    let mut critical: Vec<TaskId> = plan.critical_ids().into_iter().collect();
    critical.sort_unstable();
    assert_eq!(critical, vec![1, 2, 4]);
    assert_eq!(plan.critical_path, vec![1, 2, 4]);
}

#[test]
fn isolated_zero_duration_task_is_critical() {
    let plan = schedule(&[Task::new(7, "milestone", 0)], &[]).unwrap();
    assert_eq!(timing(&plan, 7), (0, 0, 0, 0, 0));
    assert_eq!(plan.project_duration_days, 0);
    assert!(plan.task(7).unwrap().is_critical);
    assert_eq!(plan.critical_path, vec![7]);
}

#[test]
fn single_task_spans_its_duration() {
    let plan = schedule(&[Task::new(1, "solo", 4)], &[]).unwrap();
    assert_eq!(timing(&plan, 1), (0, 4, 0, 4, 0));
    assert_eq!(plan.project_duration_days, 4);
}

#[test]
fn empty_graph_yields_empty_schedule() {
    let plan = schedule(&[], &[]).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.project_duration_days, 0);
    assert!(plan.critical_path.is_empty());
}

#[test]
fn disconnected_chains_share_the_project_anchor() {
    let tasks = vec![
        Task::new(1, "long-1", 5),
        Task::new(2, "long-2", 5),
        Task::new(3, "short-1", 1),
        Task::new(4, "short-2", 2),
    ];
    let plan = schedule(&tasks, &deps(&[(1, 2), (3, 4)])).unwrap();

    assert_eq!(plan.project_duration_days, 10);
    assert_eq!(timing(&plan, 3), (0, 1, 7, 8, 7));
    assert_eq!(timing(&plan, 4), (1, 3, 8, 10, 7));
    assert!(!plan.task(3).unwrap().is_critical);
    assert_eq!(plan.critical_path, vec![1, 2]);
}

#[test]
fn results_keep_caller_task_order() {
    let tasks = vec![Task::new(3, "C", 1), Task::new(1, "A", 1), Task::new(2, "B", 1)];
    let plan = schedule(&tasks, &deps(&[(1, 2), (2, 3)])).unwrap();
    let ids: Vec<TaskId> = plan.tasks.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(plan.task(3).unwrap().early_start, 2);
    assert_eq!(plan.task(3).unwrap().title, "C");
}

#[test]
fn duplicate_edge_does_not_change_schedule() {
    let tasks = vec![Task::new(1, "A", 3), Task::new(2, "B", 2), Task::new(3, "C", 1)];
    let once = schedule(&tasks, &deps(&[(1, 2), (1, 3)])).unwrap();
    let twice = schedule(&tasks, &deps(&[(1, 2), (1, 2), (1, 3)])).unwrap();
    assert_eq!(once, twice);
    assert_eq!(
        sort_or_fail(&tasks, &deps(&[(1, 2), (1, 2)])).unwrap(),
        vec![1, 2, 3]
    );
}

#[test]
fn cycles_fail_sort_and_schedule() {
    let tasks = vec![Task::new(1, "A", 1), Task::new(2, "B", 1), Task::new(3, "C", 1)];

    let direct = deps(&[(1, 2), (2, 1)]);
    assert!(sort_or_fail(&tasks, &direct).unwrap_err().is_cycle());
    assert!(schedule(&tasks, &direct).unwrap_err().is_cycle());

    let longer = deps(&[(1, 2), (2, 3), (3, 1)]);
    assert_eq!(
        schedule(&tasks, &longer).unwrap_err(),
        ScheduleError::CycleDetected {
            blocked: vec![1, 2, 3]
        }
    );
}

#[test]
fn would_create_cycle_flags_exactly_closing_edges() {
    let tasks = vec![
        Task::new(1, "A", 1),
        Task::new(2, "B", 1),
        Task::new(3, "C", 1),
        Task::new(4, "D", 1),
    ];
    let committed = deps(&[(1, 2), (2, 3)]);

    assert!(would_create_cycle(&tasks, &committed, Dependency::new(3, 1)).unwrap());
    assert!(would_create_cycle(&tasks, &committed, Dependency::new(3, 2)).unwrap());
    assert!(!would_create_cycle(&tasks, &committed, Dependency::new(1, 3)).unwrap());
    assert!(!would_create_cycle(&tasks, &committed, Dependency::new(4, 1)).unwrap());
    assert!(!would_create_cycle(&tasks, &committed, Dependency::new(3, 4)).unwrap());
    // Re-adding a committed edge is a duplicate, not a cycle.
    assert!(!would_create_cycle(&tasks, &committed, Dependency::new(1, 2)).unwrap());
}

#[test]
fn dangling_dependency_fails_fast() {
    let tasks = vec![Task::new(1, "A", 1)];
    let err = schedule(&tasks, &deps(&[(1, 2)])).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::UnknownTaskReference {
            from: 1,
            to: 2,
            missing: 2
        }
    );
    assert_eq!(
        err.to_string(),
        "dependency 1 -> 2 references unknown task 2"
    );
}

#[test]
fn duplicate_task_ids_fail_fast() {
    let tasks = vec![Task::new(1, "A", 1), Task::new(1, "again", 2)];
    assert_eq!(
        schedule(&tasks, &[]).unwrap_err(),
        ScheduleError::DuplicateTaskId(1)
    );
}

#[test]
fn schedule_is_send_and_sync_and_callable_concurrently() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProjectSchedule>();

    let tasks = vec![Task::new(1, "A", 2), Task::new(2, "B", 3)];
    let dependencies = deps(&[(1, 2)]);
    let expected = schedule(&tasks, &dependencies).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| schedule(&tasks, &dependencies).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
