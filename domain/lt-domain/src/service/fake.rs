//! サービステスト用のスケジューラスタブ

use crate::model::{RegisteredTask, TaskDefinition, TaskDescriptor, TaskHandle};
use crate::port::driven::{SchedulerSession, TaskDraft, TaskSchedulerHost};
use crate::DomainError;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeHost {
    pub fail_open: bool,
    pub fail_enumerate: bool,
    pub fail_build: bool,
    pub reject_named: bool,
    pub reject_unnamed: bool,
    pub fail_delete: bool,
    pub tasks: Mutex<Vec<(TaskHandle, Result<TaskDefinition, DomainError>)>>,
    pub registrations: Mutex<Vec<Option<String>>>,
    pub deleted: Mutex<Vec<TaskHandle>>,
    pub opened: Mutex<usize>,
    pub closed: Mutex<usize>,
    pub built: Mutex<usize>,
}

impl FakeHost {
    pub fn with_task(self, path: &str, definition: TaskDefinition) -> Self {
        self.push(path, Ok(definition));
        self
    }

    pub fn with_broken_task(self, path: &str) -> Self {
        self.push(
            path,
            Err(DomainError::host_call("Definition failed", "corrupt task")),
        );
        self
    }

    fn push(&self, path: &str, definition: Result<TaskDefinition, DomainError>) {
        let name = path.rsplit('\\').next().unwrap_or(path).to_string();
        self.tasks
            .lock()
            .unwrap()
            .push((TaskHandle::new(name, path), definition));
    }

    pub fn opened(&self) -> usize {
        *self.opened.lock().unwrap()
    }

    pub fn closed(&self) -> usize {
        *self.closed.lock().unwrap()
    }

    pub fn built(&self) -> usize {
        *self.built.lock().unwrap()
    }
}

impl TaskSchedulerHost for FakeHost {
    fn open_session(&self) -> Result<Box<dyn SchedulerSession + '_>, DomainError> {
        if self.fail_open {
            return Err(DomainError::ServiceUnavailable("connect refused".into()));
        }
        *self.opened.lock().unwrap() += 1;
        Ok(Box::new(FakeSession { host: self }))
    }
}

struct FakeSession<'a> {
    host: &'a FakeHost,
}

impl Drop for FakeSession<'_> {
    fn drop(&mut self) {
        *self.host.closed.lock().unwrap() += 1;
    }
}

impl SchedulerSession for FakeSession<'_> {
    fn tasks(&self) -> Result<Vec<TaskHandle>, DomainError> {
        if self.host.fail_enumerate {
            return Err(DomainError::host_call("GetTasks failed", "rpc error"));
        }
        Ok(self
            .host
            .tasks
            .lock()
            .unwrap()
            .iter()
            .map(|(handle, _)| handle.clone())
            .collect())
    }

    fn definition(&self, task: &TaskHandle) -> Result<TaskDefinition, DomainError> {
        self.host
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|(handle, _)| handle == task)
            .map(|(_, definition)| definition.clone())
            .unwrap_or_else(|| Err(DomainError::TaskNotFound(task.path.clone())))
    }

    fn build(&self, descriptor: &TaskDescriptor) -> Result<Box<dyn TaskDraft + '_>, DomainError> {
        *self.host.built.lock().unwrap() += 1;
        if self.host.fail_build {
            return Err(DomainError::host_call("Create trigger failed", "out of memory"));
        }
        Ok(Box::new(FakeDraft {
            host: self.host,
            definition: descriptor.to_definition(),
        }))
    }

    fn delete(&self, task: &TaskHandle) -> Result<(), DomainError> {
        if self.host.fail_delete {
            return Err(DomainError::host_call("DeleteTask failed", "access denied"));
        }
        self.host
            .tasks
            .lock()
            .unwrap()
            .retain(|(handle, _)| handle != task);
        self.host.deleted.lock().unwrap().push(task.clone());
        Ok(())
    }
}

struct FakeDraft<'a> {
    host: &'a FakeHost,
    definition: TaskDefinition,
}

impl TaskDraft for FakeDraft<'_> {
    fn register(&self, name: Option<&str>) -> Result<RegisteredTask, DomainError> {
        self.host
            .registrations
            .lock()
            .unwrap()
            .push(name.map(str::to_string));
        let rejected = match name {
            Some(_) => self.host.reject_named,
            None => self.host.reject_unnamed,
        };
        if rejected {
            return Err(DomainError::host_call(
                "RegisterTaskDefinition failed",
                "rejected",
            ));
        }
        if self.definition.actions.iter().any(|a| a.exec_path() == Some("")) {
            return Err(DomainError::host_call(
                "RegisterTaskDefinition failed",
                "action path is required",
            ));
        }
        let name = name.unwrap_or("{generated}").to_string();
        let path = format!("\\{name}");
        let mut tasks = self.host.tasks.lock().unwrap();
        tasks.retain(|(handle, _)| handle.path != path);
        let handle = TaskHandle::new(name, path);
        tasks.push((handle.clone(), Ok(self.definition.clone())));
        Ok(RegisteredTask { handle })
    }
}
