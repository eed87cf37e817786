use tokio::sync::watch;
use tracing::{debug, error, warn};

use crate::model::task::{Task, TaskDraft, TaskId};
use crate::store::RemoteTaskStore;

/// Local mirror of the task server.
///
/// The collection only changes after the server has confirmed a call:
/// `refresh` replaces it wholesale, `create` appends the server's record,
/// `delete` filters by id and `toggle_complete` re-fetches after writing.
/// A failed call is logged and leaves both the collection and the draft as
/// they were. Commands report whether their transition went through.
///
/// Nothing orders concurrently issued commands. If a toggle's follow-up
/// refresh is answered after a delete for the same task has been applied
/// locally, the refresh brings the deleted task back into view.
pub struct TaskService<S: RemoteTaskStore> {
    store: S,
    tasks: watch::Sender<Vec<Task>>,
    draft: watch::Sender<TaskDraft>,
}

impl<S: RemoteTaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: watch::Sender::new(Vec::new()),
            draft: watch::Sender::new(TaskDraft::default()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Change notifications for the collection. The receiver always sees the
    /// latest value, never intermediate ones.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.subscribe()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    pub fn find(&self, id: TaskId) -> Option<Task> {
        self.tasks.borrow().iter().find(|t| t.id == id).cloned()
    }

    pub fn draft(&self) -> TaskDraft {
        self.draft.borrow().clone()
    }

    pub fn subscribe_draft(&self) -> watch::Receiver<TaskDraft> {
        self.draft.subscribe()
    }

    pub fn edit_draft(&self, edit: impl FnOnce(&mut TaskDraft)) {
        self.draft.send_modify(edit);
    }

    pub async fn refresh(&self) -> bool {
        match self.store.list().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "task list refreshed");
                self.tasks.send_replace(tasks);
                true
            }
            Err(err) => {
                error!(error = %err, "Error fetching tasks");
                false
            }
        }
    }

    pub async fn create(&self, draft: TaskDraft) -> bool {
        match self.store.create(&draft.to_new_task()).await {
            Ok(created) => {
                debug!(id = %created.id, "task created");
                self.tasks.send_modify(|tasks| tasks.push(created));
                self.draft.send_replace(TaskDraft::default());
                true
            }
            Err(err) => {
                error!(error = %err, "Error adding task");
                false
            }
        }
    }

    /// Creates a task from the current draft.
    pub async fn submit_draft(&self) -> bool {
        let draft = self.draft();
        self.create(draft).await
    }

    pub async fn toggle_complete(&self, id: TaskId) -> bool {
        let Some(task) = self.find(id) else {
            warn!(%id, "toggle requested for a task that is not in the local list");
            return false;
        };
        let replacement = task.toggled();
        if let Err(err) = self.store.update(&replacement).await {
            error!(error = %err, %id, "Error updating task");
            return false;
        }
        self.refresh().await
    }

    pub async fn delete(&self, id: TaskId) -> bool {
        match self.store.delete(id).await {
            Ok(()) => {
                debug!(%id, "task deleted");
                self.tasks.send_modify(|tasks| tasks.retain(|t| t.id != id));
                true
            }
            Err(err) => {
                error!(error = %err, %id, "Error deleting task");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Operation, RemoteCallFailed};
    use crate::model::task::NewTask;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// In-memory task server with switchable failures.
    #[derive(Default)]
    struct MockStore {
        tasks: Mutex<Vec<Task>>,
        failing: Mutex<HashSet<Operation>>,
        updates: Mutex<Vec<Task>>,
        list_calls: Mutex<usize>,
        // When set, `list` snapshots the server state and then waits here.
        list_gate: Option<Notify>,
    }

    impl MockStore {
        fn with_tasks(tasks: Vec<Task>) -> Self {
            Self {
                tasks: Mutex::new(tasks),
                ..Default::default()
            }
        }

        fn fail(&self, op: Operation) {
            self.failing.lock().unwrap().insert(op);
        }

        fn check(&self, op: Operation) -> Result<(), RemoteCallFailed> {
            if self.failing.lock().unwrap().contains(&op) {
                Err(RemoteCallFailed::new(op, "simulated failure"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RemoteTaskStore for MockStore {
        async fn list(&self) -> Result<Vec<Task>, RemoteCallFailed> {
            self.check(Operation::List)?;
            *self.list_calls.lock().unwrap() += 1;
            let snapshot = self.tasks.lock().unwrap().clone();
            if let Some(gate) = &self.list_gate {
                gate.notified().await;
            }
            Ok(snapshot)
        }

        async fn create(&self, task: &NewTask) -> Result<Task, RemoteCallFailed> {
            self.check(Operation::Create)?;
            let mut tasks = self.tasks.lock().unwrap();
            let next = tasks.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
            let created = task.clone().into_task(TaskId(next));
            tasks.push(created.clone());
            Ok(created)
        }

        async fn update(&self, task: &Task) -> Result<(), RemoteCallFailed> {
            self.check(Operation::Update)?;
            self.updates.lock().unwrap().push(task.clone());
            let mut tasks = self.tasks.lock().unwrap();
            if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
                *existing = task.clone();
            }
            Ok(())
        }

        async fn delete(&self, id: TaskId) -> Result<(), RemoteCallFailed> {
            self.check(Operation::Delete)?;
            self.tasks.lock().unwrap().retain(|t| t.id != id);
            if let Some(gate) = &self.list_gate {
                gate.notify_one();
            }
            Ok(())
        }
    }

    fn task(id: i64, title: &str, completed: bool) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            description: format!("{title} details"),
            completed,
        }
    }

    #[tokio::test]
    async fn test_scenario_create_toggle_delete() {
        let service = TaskService::new(MockStore::default());
        assert!(service.tasks().is_empty());

        assert!(service.create(TaskDraft::new("A", "")).await);
        let expected = Task {
            id: TaskId(1),
            title: "A".to_string(),
            description: String::new(),
            completed: false,
        };
        assert_eq!(service.tasks(), vec![expected.clone()]);

        assert!(service.toggle_complete(TaskId(1)).await);
        assert_eq!(
            service.tasks(),
            vec![Task {
                completed: true,
                ..expected
            }]
        );

        assert!(service.delete(TaskId(1)).await);
        assert!(service.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_sends_full_replacement() {
        let original = task(4, "Report", false);
        let service = TaskService::new(MockStore::with_tasks(vec![original.clone()]));
        assert!(service.refresh().await);

        assert!(service.toggle_complete(TaskId(4)).await);
        let updates = service.store().updates.lock().unwrap().clone();
        assert_eq!(
            updates,
            vec![Task {
                completed: true,
                ..original
            }]
        );
    }

    #[tokio::test]
    async fn test_toggle_refetches_instead_of_patching() {
        let service = TaskService::new(MockStore::with_tasks(vec![task(1, "A", false)]));
        assert!(service.refresh().await);
        // Another client adds a task; the follow-up refresh picks it up.
        service.store().tasks.lock().unwrap().push(task(2, "B", false));

        assert!(service.toggle_complete(TaskId(1)).await);
        assert_eq!(*service.store().list_calls.lock().unwrap(), 2);
        assert_eq!(
            service.tasks(),
            vec![task(1, "A", true), task(2, "B", false)]
        );
    }

    #[tokio::test]
    async fn test_create_appends_server_record_and_clears_draft() {
        let service = TaskService::new(MockStore::with_tasks(vec![task(10, "Old", false)]));
        assert!(service.refresh().await);
        service.edit_draft(|d| {
            d.title = "New".to_string();
            d.description = "fresh".to_string();
        });

        assert!(service.submit_draft().await);
        let tasks = service.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0], task(10, "Old", false));
        // The id comes from the server, never from the client.
        assert_eq!(
            tasks[1],
            Task {
                id: TaskId(11),
                title: "New".to_string(),
                description: "fresh".to_string(),
                completed: false,
            }
        );
        assert_eq!(service.draft(), TaskDraft::default());
    }

    #[tokio::test]
    async fn test_delete_filters_and_keeps_order() {
        let tasks = vec![task(1, "A", false), task(2, "B", true), task(3, "C", false)];
        let service = TaskService::new(MockStore::with_tasks(tasks));
        assert!(service.refresh().await);

        assert!(service.delete(TaskId(2)).await);
        assert_eq!(service.tasks(), vec![task(1, "A", false), task(3, "C", false)]);
    }

    #[tokio::test]
    async fn test_delete_removes_every_duplicate() {
        let tasks = vec![task(1, "A", false), task(2, "B", false), task(1, "A again", false)];
        let service = TaskService::new(MockStore::with_tasks(tasks));
        assert!(service.refresh().await);

        assert!(service.delete(TaskId(1)).await);
        assert_eq!(service.tasks(), vec![task(2, "B", false)]);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_draft_and_list() {
        let service = TaskService::new(MockStore::with_tasks(vec![task(1, "A", false)]));
        assert!(service.refresh().await);
        service.store().fail(Operation::Create);
        service.edit_draft(|d| d.title = "Unsaved".to_string());
        let before = service.tasks();

        assert!(!service.submit_draft().await);
        assert_eq!(service.tasks(), before);
        assert_eq!(service.draft().title, "Unsaved");
    }

    #[tokio::test]
    async fn test_failed_toggle_is_noop() {
        let service = TaskService::new(MockStore::with_tasks(vec![task(1, "A", false)]));
        assert!(service.refresh().await);
        service.store().fail(Operation::Update);
        let before = service.tasks();

        assert!(!service.toggle_complete(TaskId(1)).await);
        assert_eq!(service.tasks(), before);
        assert_eq!(*service.store().list_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_is_noop() {
        let service = TaskService::new(MockStore::with_tasks(vec![task(1, "A", false)]));
        assert!(service.refresh().await);
        service.store().fail(Operation::Delete);
        let before = service.tasks();

        assert!(!service.delete(TaskId(1)).await);
        assert_eq!(service.tasks(), before);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_list() {
        let service = TaskService::new(MockStore::with_tasks(vec![task(1, "A", false)]));
        assert!(service.refresh().await);
        service.store().fail(Operation::List);
        service.store().tasks.lock().unwrap().clear();

        assert!(!service.refresh().await);
        assert_eq!(service.tasks(), vec![task(1, "A", false)]);
    }

    #[tokio::test]
    async fn test_refresh_discards_local_only_content() {
        let service = TaskService::new(MockStore::with_tasks(vec![task(1, "A", false)]));
        service.tasks.send_modify(|tasks| {
            tasks.push(task(99, "Stale", true));
            tasks.push(task(1, "Outdated", true));
        });

        assert!(service.refresh().await);
        assert_eq!(service.tasks(), vec![task(1, "A", false)]);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_sends_nothing() {
        let service = TaskService::new(MockStore::default());
        assert!(!service.toggle_complete(TaskId(5)).await);
        assert!(service.store().updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let service = TaskService::new(MockStore::with_tasks(vec![task(1, "A", false)]));
        let mut rx = service.subscribe();
        assert!(service.refresh().await);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), vec![task(1, "A", false)]);
    }

    #[tokio::test]
    async fn test_late_refresh_after_delete_reintroduces_task() {
        let store = MockStore {
            tasks: Mutex::new(vec![task(1, "A", false)]),
            list_gate: Some(Notify::new()),
            ..Default::default()
        };
        let service = TaskService::new(store);
        // Prime the local list without going through the gated `list`.
        service.tasks.send_replace(vec![task(1, "A", false)]);

        // The toggle's refresh snapshots the server before the delete lands and
        // is answered only after the delete has been applied locally.
        let (toggled, deleted) = tokio::join!(
            service.toggle_complete(TaskId(1)),
            service.delete(TaskId(1))
        );
        assert!(toggled);
        assert!(deleted);
        assert!(service.store().tasks.lock().unwrap().is_empty());
        assert_eq!(service.tasks(), vec![task(1, "A", true)]);
    }
}
