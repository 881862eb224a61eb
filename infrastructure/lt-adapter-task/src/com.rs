//! Windows タスクスケジューラ（ITaskService）アダプタ。
//! 1セッション = COM初期化 + ITaskService接続。drop で解放する。

use lt_domain::model::SchedulerConfig;
use lt_domain::port::driven::{SchedulerSession, TaskSchedulerHost};
use lt_domain::DomainError;

/// Windows タスクスケジューラアダプター
#[derive(Debug, Clone, Default)]
pub struct WindowsTaskScheduler {
    config: SchedulerConfig,
}

impl WindowsTaskScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl TaskSchedulerHost for WindowsTaskScheduler {
    fn open_session(&self) -> Result<Box<dyn SchedulerSession + '_>, DomainError> {
        #[cfg(windows)]
        {
            let session = imp::ComSession::connect(&self.config)?;
            Ok(Box::new(session))
        }

        #[cfg(not(windows))]
        {
            Err(DomainError::ServiceUnavailable(
                "Windows Task Scheduler is not available on this platform".into(),
            ))
        }
    }
}

#[cfg(windows)]
mod imp {
    use lt_domain::model::{
        RegisteredTask, RunLevel, SchedulerConfig, TaskAction, TaskDefinition, TaskDescriptor,
        TaskHandle, TaskTrigger, TriggerKind,
    };
    use lt_domain::port::driven::{SchedulerSession, TaskDraft};
    use lt_domain::DomainError;
    use tracing::debug;
    use windows::core::{Interface, BSTR};
    use windows::Win32::Foundation::{RPC_E_CHANGED_MODE, S_FALSE, S_OK, VARIANT_BOOL};
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_INPROC_SERVER,
        COINIT_MULTITHREADED,
    };
    use windows::Win32::System::TaskScheduler::{
        IExecAction, ITaskDefinition, ITaskFolder, ITaskService, TaskScheduler as TASKSERVICE_CLSID,
        TASK_ACTION_EXEC, TASK_CREATE_OR_UPDATE, TASK_ENUM_HIDDEN, TASK_LOGON_NONE,
        TASK_RUNLEVEL_HIGHEST, TASK_RUNLEVEL_LUA, TASK_RUNLEVEL_TYPE, TASK_TRIGGER_LOGON,
        TASK_TRIGGER_TYPE2,
    };
    use windows::Win32::System::Variant::{VARIANT, VT_I4};

    fn com_error(context: &str, err: windows::core::Error) -> DomainError {
        DomainError::host_call(context, err.message().to_string())
    }

    fn is_not_found_error(err: &windows::core::Error) -> bool {
        matches!(err.code().0 as u32, 0x80070002 | 0x80070003)
    }

    /// コレクションの添字（1始まり）を VT_I4 の VARIANT にする
    fn index_variant(index: i32) -> VARIANT {
        let mut variant = VARIANT::default();
        unsafe {
            let inner = &mut *variant.Anonymous.Anonymous;
            inner.vt = VT_I4;
            inner.Anonymous.lVal = index;
        }
        variant
    }

    // 対応する Uninitialize を呼ぶ
    struct CoUninit(bool);
    impl Drop for CoUninit {
        fn drop(&mut self) {
            if self.0 {
                unsafe { CoUninitialize() }
            }
        }
    }

    /// 接続済みセッション。フィールド順に drop されるので ITaskService が先に解放される。
    pub(super) struct ComSession<'a> {
        service: ITaskService,
        config: &'a SchedulerConfig,
        _com: CoUninit,
    }

    impl<'a> ComSession<'a> {
        pub(super) fn connect(config: &'a SchedulerConfig) -> Result<Self, DomainError> {
            unsafe {
                // COM初期化（同一スレッドでの呼び出しを想定）
                let hr = CoInitializeEx(None, COINIT_MULTITHREADED);
                let did_init = if hr == S_OK || hr == S_FALSE {
                    true
                } else if hr == RPC_E_CHANGED_MODE {
                    // 既に別モデルで初期化済み。この場合はUninitializeしない。
                    false
                } else {
                    return Err(DomainError::ServiceUnavailable(format!(
                        "COM init failed: 0x{:08x}",
                        hr.0 as u32
                    )));
                };
                let com = CoUninit(did_init);

                let service: ITaskService =
                    CoCreateInstance(&TASKSERVICE_CLSID, None, CLSCTX_INPROC_SERVER).map_err(
                        |e| DomainError::ServiceUnavailable(format!("CoCreateInstance(TaskScheduler) failed: {}", e.message())),
                    )?;
                service
                    .Connect(&VARIANT::default(), &VARIANT::default(), &VARIANT::default(), &VARIANT::default())
                    .map_err(|e| DomainError::ServiceUnavailable(format!("ITaskService::Connect failed: {}", e.message())))?;

                Ok(Self {
                    service,
                    config,
                    _com: com,
                })
            }
        }

        fn folder(&self, path: &str) -> Result<ITaskFolder, DomainError> {
            unsafe {
                self.service
                    .GetFolder(&BSTR::from(path))
                    .map_err(|e| com_error(&format!("GetFolder({path}) failed"), e))
            }
        }

        /// 登録先フォルダ。なければルート直下から作る。
        fn registration_folder(&self) -> Result<ITaskFolder, DomainError> {
            let path = self.config.task_folder.as_str();
            match unsafe { self.service.GetFolder(&BSTR::from(path)) } {
                Ok(folder) => Ok(folder),
                Err(e) if is_not_found_error(&e) => {
                    let root = self.folder("\\")?;
                    unsafe {
                        root.CreateFolder(&BSTR::from(path), &VARIANT::default())
                            .map_err(|e| com_error(&format!("CreateFolder({path}) failed"), e))
                    }
                }
                Err(e) => Err(com_error(&format!("GetFolder({path}) failed"), e)),
            }
        }

        /// フォルダ配下を再帰的に列挙。サブフォルダの失敗は読み飛ばす。
        fn collect_tasks(&self, folder: &ITaskFolder, out: &mut Vec<TaskHandle>) -> Result<(), DomainError> {
            let flags = if self.config.include_hidden {
                TASK_ENUM_HIDDEN.0
            } else {
                0
            };
            unsafe {
                let tasks = folder
                    .GetTasks(flags)
                    .map_err(|e| com_error("GetTasks failed", e))?;
                let count = tasks.Count().map_err(|e| com_error("Count failed", e))?;
                for index in 1..=count {
                    let task = match tasks.get_Item(&index_variant(index)) {
                        Ok(task) => task,
                        Err(e) => {
                            debug!(index, error = %e.message(), "skipping unreadable task entry");
                            continue;
                        }
                    };
                    match (task.Name(), task.Path()) {
                        (Ok(name), Ok(path)) => out.push(TaskHandle::new(name.to_string(), path.to_string())),
                        _ => debug!(index, "skipping task without name or path"),
                    }
                }

                let folders = folder
                    .GetFolders(0)
                    .map_err(|e| com_error("GetFolders failed", e))?;
                let count = folders.Count().map_err(|e| com_error("Count failed", e))?;
                for index in 1..=count {
                    let sub = match folders.get_Item(&index_variant(index)) {
                        Ok(sub) => sub,
                        Err(e) => {
                            debug!(index, error = %e.message(), "skipping unreadable folder entry");
                            continue;
                        }
                    };
                    if let Err(e) = self.collect_tasks(&sub, out) {
                        debug!(error = %e, "skipping unreadable folder");
                    }
                }
            }
            Ok(())
        }
    }

    impl SchedulerSession for ComSession<'_> {
        fn tasks(&self) -> Result<Vec<TaskHandle>, DomainError> {
            let root = self.folder("\\")?;
            let mut out = Vec::new();
            self.collect_tasks(&root, &mut out)?;
            Ok(out)
        }

        fn definition(&self, task: &TaskHandle) -> Result<TaskDefinition, DomainError> {
            let folder = self.folder(task.folder_path())?;
            unsafe {
                let registered = folder
                    .GetTask(&BSTR::from(task.name.as_str()))
                    .map_err(|e| com_error(&format!("GetTask({}) failed", task.path), e))?;
                let def = registered
                    .Definition()
                    .map_err(|e| com_error("Definition failed", e))?;

                let collection = def.Actions().map_err(|e| com_error("Actions failed", e))?;
                let mut count = 0i32;
                collection
                    .Count(&mut count)
                    .map_err(|e| com_error("Actions.Count failed", e))?;
                let mut actions = Vec::with_capacity(count.max(0) as usize);
                for index in 1..=count {
                    let action = collection
                        .get_Item(index)
                        .map_err(|e| com_error("Actions.Item failed", e))?;
                    match action.cast::<IExecAction>() {
                        Ok(exec) => {
                            let mut path = BSTR::new();
                            exec.Path(&mut path)
                                .map_err(|e| com_error("IExecAction::Path failed", e))?;
                            actions.push(TaskAction::Exec {
                                path: path.to_string(),
                            });
                        }
                        Err(_) => actions.push(TaskAction::Other),
                    }
                }

                let collection = def.Triggers().map_err(|e| com_error("Triggers failed", e))?;
                let mut count = 0i32;
                collection
                    .Count(&mut count)
                    .map_err(|e| com_error("Triggers.Count failed", e))?;
                let mut triggers = Vec::with_capacity(count.max(0) as usize);
                for index in 1..=count {
                    let trigger = collection
                        .get_Item(index)
                        .map_err(|e| com_error("Triggers.Item failed", e))?;
                    let mut kind = TASK_TRIGGER_TYPE2::default();
                    trigger
                        .Type(&mut kind)
                        .map_err(|e| com_error("ITrigger::Type failed", e))?;
                    let mut enabled = VARIANT_BOOL::default();
                    trigger
                        .Enabled(&mut enabled)
                        .map_err(|e| com_error("ITrigger::Enabled failed", e))?;
                    triggers.push(TaskTrigger {
                        kind: if kind == TASK_TRIGGER_LOGON {
                            TriggerKind::Logon
                        } else {
                            TriggerKind::Other
                        },
                        enabled: enabled.0 != 0,
                    });
                }

                let principal = def.Principal().map_err(|e| com_error("Principal failed", e))?;
                let mut run_level_value = TASK_RUNLEVEL_LUA;
                principal
                    .RunLevel(&mut run_level_value)
                    .map_err(|e| com_error("IPrincipal::RunLevel failed", e))?;
                let run_level = if run_level_value == TASK_RUNLEVEL_HIGHEST {
                    RunLevel::Highest
                } else {
                    RunLevel::Lowest
                };

                Ok(TaskDefinition {
                    actions,
                    triggers,
                    run_level,
                })
            }
        }

        fn build(&self, descriptor: &TaskDescriptor) -> Result<Box<dyn TaskDraft + '_>, DomainError> {
            unsafe {
                let task_def = self
                    .service
                    .NewTask(0)
                    .map_err(|e| com_error("NewTask failed", e))?;

                let run_level: TASK_RUNLEVEL_TYPE = match descriptor.run_level() {
                    RunLevel::Lowest => TASK_RUNLEVEL_LUA,
                    RunLevel::Highest => TASK_RUNLEVEL_HIGHEST,
                };
                let principal = task_def
                    .Principal()
                    .map_err(|e| com_error("Principal failed", e))?;
                principal
                    .SetRunLevel(run_level)
                    .map_err(|e| com_error("SetRunLevel failed", e))?;

                let triggers = task_def
                    .Triggers()
                    .map_err(|e| com_error("Triggers failed", e))?;
                triggers
                    .Create(TASK_TRIGGER_LOGON)
                    .map_err(|e| com_error("Create trigger failed", e))?;

                let actions = task_def
                    .Actions()
                    .map_err(|e| com_error("Actions failed", e))?;
                let action = actions
                    .Create(TASK_ACTION_EXEC)
                    .map_err(|e| com_error("Create action failed", e))?;
                let exec: IExecAction = action
                    .cast()
                    .map_err(|e| com_error("Cast to IExecAction failed", e))?;
                exec.SetPath(&BSTR::from(descriptor.executable_path()))
                    .map_err(|e| com_error("SetPath failed", e))?;

                Ok(Box::new(ComDraft {
                    session: self,
                    definition: task_def,
                }))
            }
        }

        fn delete(&self, task: &TaskHandle) -> Result<(), DomainError> {
            let folder = self.folder(task.folder_path())?;
            unsafe {
                match folder.DeleteTask(&BSTR::from(task.name.as_str()), 0) {
                    Ok(()) => Ok(()),
                    Err(e) if is_not_found_error(&e) => Err(DomainError::TaskNotFound(task.path.clone())),
                    Err(e) => Err(com_error("DeleteTask failed", e)),
                }
            }
        }
    }

    /// NewTask で組み立てた未登録の定義。登録のたびに同じ定義を渡す。
    struct ComDraft<'s> {
        session: &'s ComSession<'s>,
        definition: ITaskDefinition,
    }

    impl TaskDraft for ComDraft<'_> {
        fn register(&self, name: Option<&str>) -> Result<RegisteredTask, DomainError> {
            let folder = self.session.registration_folder()?;
            // 空の BSTR は NULL 扱いになり、スケジューラが名前を生成する
            let name = match name {
                Some(n) => BSTR::from(n),
                None => BSTR::new(),
            };
            unsafe {
                let registered = folder
                    .RegisterTaskDefinition(
                        &name,
                        &self.definition,
                        TASK_CREATE_OR_UPDATE.0,
                        &VARIANT::default(),
                        &VARIANT::default(),
                        TASK_LOGON_NONE,
                        &VARIANT::default(),
                    )
                    .map_err(|e| com_error("RegisterTaskDefinition failed", e))?;

                let name = registered
                    .Name()
                    .map_err(|e| com_error("Name failed", e))?
                    .to_string();
                let path = registered
                    .Path()
                    .map_err(|e| com_error("Path failed", e))?
                    .to_string();
                Ok(RegisteredTask {
                    handle: TaskHandle::new(name, path),
                })
            }
        }
    }
}
