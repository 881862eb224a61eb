//! 公開ユースケースをインメモリのスケジューラで通しで確認する。

use lt_composition::task::{FailurePlan, InMemoryTaskScheduler};
use lt_composition::{service_for, DomainError, LogonTaskUseCase, RunLevel, SchedulerConfig};
use lt_domain::model::{TaskAction, TaskTrigger};

#[test]
fn updater_lifecycle() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);

    assert_eq!(tasks.add_task("Updater", "/opt/app/updater", RunLevel::Lowest), Ok(true));
    assert!(tasks.is_task_active("/opt/app/updater"));
    assert!(tasks.remove_task("/opt/app/updater"));
    assert!(!tasks.is_task_active("/opt/app/updater"));
    assert_eq!(host.task_count(), 0);
    assert_eq!(host.open_sessions(), 0);
}

#[test]
fn highest_run_level_is_recorded() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);
    assert_eq!(tasks.add_task("App", r"C:\bin\app.exe", RunLevel::Highest), Ok(true));
    let def = host.definition_of("\\App").unwrap();
    assert_eq!(def.run_level, RunLevel::Highest);
    assert!(tasks.is_task_active(r"C:\bin\app.exe"));
}

#[test]
fn same_name_twice_keeps_one_task() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);
    tasks.add_task("App", r"C:\bin\app.exe", RunLevel::Lowest).unwrap();
    tasks.add_task("App", r"C:\bin\app.exe", RunLevel::Highest).unwrap();
    assert_eq!(host.task_paths(), vec!["\\App".to_string()]);
    assert_eq!(host.definition_of("\\App").unwrap().run_level, RunLevel::Highest);
}

#[test]
fn reserved_characters_in_name_do_not_block_registration() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);
    assert_eq!(
        tasks.add_task("Contoso: App/Updater?", r"C:\bin\app.exe", RunLevel::Lowest),
        Ok(true)
    );
    assert_eq!(host.task_paths(), vec!["\\Contoso  App Updater ".to_string()]);
}

#[test]
fn named_rejection_falls_back_to_unnamed_registration() {
    let host = InMemoryTaskScheduler::new();
    host.set_failures(FailurePlan {
        reject_named: true,
        ..FailurePlan::default()
    });
    let tasks = service_for(&host);
    assert_eq!(tasks.add_task("Updater", "/opt/app/updater", RunLevel::Lowest), Ok(true));
    let paths = host.task_paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].starts_with("\\{"));
    assert!(tasks.is_task_active("/opt/app/updater"));
}

#[test]
fn both_rejections_return_false_without_error() {
    let host = InMemoryTaskScheduler::new();
    host.set_failures(FailurePlan {
        reject_named: true,
        reject_unnamed: true,
        ..FailurePlan::default()
    });
    let tasks = service_for(&host);
    assert_eq!(tasks.add_task("Updater", "/opt/app/updater", RunLevel::Lowest), Ok(false));
    assert_eq!(host.task_count(), 0);
}

#[test]
fn refused_connection_surfaces_as_registration_failure() {
    let host = InMemoryTaskScheduler::new();
    host.set_failures(FailurePlan {
        fail_open: true,
        ..FailurePlan::default()
    });
    let tasks = service_for(&host);
    let err = tasks
        .add_task("Updater", "/opt/app/updater", RunLevel::Lowest)
        .unwrap_err();
    assert!(matches!(err.cause(), DomainError::ServiceUnavailable(_)));
    assert_eq!(host.sessions_opened(), 0);
}

#[test]
fn trigger_build_failure_surfaces_as_registration_failure() {
    let host = InMemoryTaskScheduler::new();
    host.set_failures(FailurePlan {
        fail_build: true,
        ..FailurePlan::default()
    });
    let tasks = service_for(&host);
    let err = tasks
        .add_task("Updater", "/opt/app/updater", RunLevel::Lowest)
        .unwrap_err();
    assert!(matches!(err.cause(), DomainError::HostCall { .. }));
    assert_eq!(host.task_count(), 0);
    assert_eq!(host.open_sessions(), 0);
}

#[test]
fn empty_executable_path_is_rejected_by_host() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);
    assert_eq!(tasks.add_task("Updater", "", RunLevel::Lowest), Ok(false));
    assert_eq!(host.task_count(), 0);
    assert_eq!(host.sessions_opened(), 1);
}

#[test]
fn remove_on_unregistered_executable_is_false() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);
    assert!(!tasks.remove_task(r"C:\bin\never.exe"));
    assert_eq!(host.open_sessions(), 0);
}

#[test]
fn matching_uses_basename_and_ignores_directory() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);
    tasks.add_task("App", r"C:\bin\app.exe", RunLevel::Lowest).unwrap();

    assert!(!tasks.is_task_active(r"C:\other\myapp.exe"));
    assert!(!tasks.remove_task(r"C:\other\myapp.exe"));
    assert!(tasks.is_task_active(r"D:\bin\app.exe"));
    assert!(tasks.remove_task(r"D:\bin\app.exe"));
    assert_eq!(host.task_count(), 0);
}

#[test]
fn structurally_foreign_tasks_are_ignored() {
    let host = InMemoryTaskScheduler::new();
    host.insert_raw(
        "\\TwoActions",
        vec![
            TaskAction::Exec {
                path: r"C:\bin\app.exe".into(),
            },
            TaskAction::Exec {
                path: r"C:\bin\helper.exe".into(),
            },
        ],
        vec![TaskTrigger::logon()],
    );
    host.insert_raw(
        "\\TwoTriggers",
        vec![TaskAction::Exec {
            path: r"C:\bin\app.exe".into(),
        }],
        vec![TaskTrigger::logon(), TaskTrigger::logon()],
    );
    let tasks = service_for(&host);
    assert!(!tasks.is_task_active(r"C:\bin\app.exe"));
    assert!(!tasks.remove_task(r"C:\bin\app.exe"));
    assert_eq!(host.task_count(), 2);
}

#[test]
fn disabled_trigger_reports_inactive_but_is_removed() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);
    tasks.add_task("App", r"C:\bin\app.exe", RunLevel::Lowest).unwrap();
    assert!(host.set_trigger_enabled("\\App", false));
    assert!(!tasks.is_task_active(r"C:\bin\app.exe"));
    assert!(tasks.remove_task(r"C:\bin\app.exe"));
    assert_eq!(host.task_count(), 0);
}

#[test]
fn unreadable_task_does_not_hide_later_match() {
    let host = InMemoryTaskScheduler::new();
    host.insert_raw(
        "\\Broken",
        vec![TaskAction::Exec {
            path: r"C:\bin\app.exe".into(),
        }],
        vec![TaskTrigger::logon()],
    );
    let tasks = service_for(&host);
    tasks.add_task("App", r"C:\bin\app.exe", RunLevel::Lowest).unwrap();
    host.set_failures(FailurePlan {
        unreadable: vec!["\\Broken".into()],
        ..FailurePlan::default()
    });
    assert!(tasks.is_task_active(r"C:\bin\app.exe"));
    assert!(tasks.remove_task(r"C:\bin\app.exe"));
    assert_eq!(host.task_paths(), vec!["\\Broken".to_string()]);
}

#[test]
fn enumeration_failure_reads_as_absent() {
    let host = InMemoryTaskScheduler::new();
    let tasks = service_for(&host);
    tasks.add_task("App", r"C:\bin\app.exe", RunLevel::Lowest).unwrap();
    host.set_failures(FailurePlan {
        fail_enumerate: true,
        ..FailurePlan::default()
    });
    assert!(!tasks.is_task_active(r"C:\bin\app.exe"));
    assert!(!tasks.remove_task(r"C:\bin\app.exe"));
    assert_eq!(host.task_count(), 1);
    assert_eq!(host.open_sessions(), 0);
}

#[test]
fn tasks_in_configured_folder_are_found_and_removed() {
    let host = InMemoryTaskScheduler::with_config(SchedulerConfig {
        task_folder: "\\Contoso".into(),
        include_hidden: true,
    });
    let tasks = service_for(&host);
    tasks.add_task("Updater", "/opt/app/updater", RunLevel::Lowest).unwrap();
    assert_eq!(host.task_paths(), vec!["\\Contoso\\Updater".to_string()]);
    assert!(tasks.remove_task("/opt/app/updater"));
    assert_eq!(host.task_count(), 0);
}
